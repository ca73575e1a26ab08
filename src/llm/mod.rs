//! LLM integration for policy scoring.
//!
//! Builds the rubric prompt, calls Gemini, and validates the generated JSON.

pub mod client;
mod parse;

pub use client::{
    build_prompt, rating_label, truncate_content, GeminiClient, ScoringBackend, ScoringConfig,
    RUBRIC_VERSION,
};
pub use parse::{parse_analysis, AnalysisResult};
