//! Analysis orchestration.
//!
//! Runs locate -> (fetch policy) -> prompt -> score -> parse in strict
//! sequence, stopping at the first failure. Each run produces exactly one
//! outcome and no step is retried.

mod message;

pub use message::{AnalyzeRequest, AnalyzeResponse, ANALYZE_PAGE};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AnalysisError, Result};
use crate::llm::{build_prompt, parse_analysis, truncate_content, AnalysisResult, ScoringBackend};
use crate::locator::{self, DetectionRules, ExtractionResult, LinkHeuristic, PageSnapshot};
use crate::page::{PageSource, PolicyFetcher, Target};
use crate::storage::CredentialStore;

/// Below this many characters the extracted text is probably not a policy.
pub const DEFAULT_SHORT_TEXT_WARNING: usize = 100;

/// Pipeline stage, used for progress logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Locating,
    FetchingPolicy,
    Prompting,
    Scoring,
    Parsing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Locating => "locating",
            Stage::FetchingPolicy => "fetching_policy",
            Stage::Prompting => "prompting",
            Stage::Scoring => "scoring",
            Stage::Parsing => "parsing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Chooses the document to score for a loaded page.
pub trait DocumentLocator: Send + Sync {
    fn locate(&self, page: &PageSnapshot) -> ExtractionResult;
}

/// [`DocumentLocator`] driven by a [`LinkHeuristic`].
pub struct HeuristicLocator {
    heuristic: Arc<dyn LinkHeuristic>,
}

impl HeuristicLocator {
    pub fn new(heuristic: Arc<dyn LinkHeuristic>) -> Self {
        Self { heuristic }
    }
}

impl Default for HeuristicLocator {
    fn default() -> Self {
        Self::new(Arc::new(DetectionRules::default()))
    }
}

impl DocumentLocator for HeuristicLocator {
    fn locate(&self, page: &PageSnapshot) -> ExtractionResult {
        locator::locate(page, self.heuristic.as_ref())
    }
}

/// Tunables for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Max document bytes embedded in the prompt (0 = unlimited).
    pub max_content_chars: usize,
    /// Warn when extracted text is shorter than this.
    pub short_text_warning: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_content_chars: 0,
            short_text_warning: DEFAULT_SHORT_TEXT_WARNING,
        }
    }
}

/// Sequences the analysis steps over pluggable collaborators.
pub struct Orchestrator {
    pages: Arc<dyn PageSource>,
    policies: Arc<dyn PolicyFetcher>,
    locator: Arc<dyn DocumentLocator>,
    scorer: Arc<dyn ScoringBackend>,
    credentials: Arc<dyn CredentialStore>,
    options: PipelineOptions,
}

impl Orchestrator {
    pub fn new(
        pages: Arc<dyn PageSource>,
        policies: Arc<dyn PolicyFetcher>,
        scorer: Arc<dyn ScoringBackend>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            pages,
            policies,
            locator: Arc::new(HeuristicLocator::default()),
            scorer,
            credentials,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_locator(mut self, locator: Arc<dyn DocumentLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle an inbound message, always producing exactly one response.
    pub async fn handle(
        &self,
        request: &AnalyzeRequest,
        default_target: Option<&Target>,
    ) -> AnalyzeResponse {
        if !request.is_analyze_page() {
            warn!("Ignoring unknown action: {}", request.action);
            return AnalyzeResponse::failure(format!("Unknown action: {}", request.action));
        }

        let target = match request.target.as_deref() {
            Some(raw) => match Target::parse(raw, None) {
                Ok(target) => Some(target),
                Err(e) => return AnalyzeResponse::failure(e.to_string()),
            },
            None => default_target.cloned(),
        };

        self.run(target.as_ref()).await.into()
    }

    /// Run a full analysis for the target.
    pub async fn run(&self, target: Option<&Target>) -> Result<AnalysisResult> {
        debug!("Pipeline stage: {}", Stage::Idle);
        match self.run_stages(target).await {
            Ok(result) => {
                enter(Stage::Done);
                info!("Analysis successful: score {}", result.score);
                Ok(result)
            }
            Err(e) => {
                enter(Stage::Failed);
                warn!("Analysis failed ({}): {}", e.kind(), e);
                Err(e)
            }
        }
    }

    /// Locate the document to score, following a registration page to its policy.
    pub async fn locate_document(&self, target: Option<&Target>) -> Result<String> {
        enter(Stage::Locating);
        if let Some(target) = target {
            info!("Analyzing {}", target);
        }
        let page = self.pages.load(target).await?;

        match self.locator.locate(&page) {
            ExtractionResult::RegistrationRedirect { privacy_url } => {
                enter(Stage::FetchingPolicy);
                self.policies.fetch(&privacy_url).await
            }
            ExtractionResult::PlainText(text) => {
                let chars = text.chars().count();
                info!("Extracted text length: {}", chars);
                if is_short_text(chars, self.options.short_text_warning) {
                    warn!("Extracted text seems too short");
                }
                Ok(text)
            }
        }
    }

    /// Build the scoring prompt for a located document, truncating it if needed.
    pub fn prompt_for(&self, document_text: &str) -> String {
        let embedded = truncate_content(document_text, self.options.max_content_chars);
        if embedded.len() < document_text.len() {
            info!(
                "Truncated document from {} to {} bytes",
                document_text.len(),
                embedded.len()
            );
        }
        build_prompt(embedded)
    }

    async fn run_stages(&self, target: Option<&Target>) -> Result<AnalysisResult> {
        let document_text = self.locate_document(target).await?;

        enter(Stage::Prompting);
        let prompt = self.prompt_for(&document_text);
        let api_key = self
            .credentials
            .api_key()
            .await
            .map_err(|e| AnalysisError::CredentialStore(e.to_string()))?;

        enter(Stage::Scoring);
        let raw = self.scorer.score(&prompt, api_key.as_deref()).await?;

        enter(Stage::Parsing);
        parse_analysis(&raw)
    }
}

fn is_short_text(chars: usize, threshold: usize) -> bool {
    chars < threshold
}

fn enter(stage: Stage) {
    debug!("Pipeline stage: {}", stage);
}
