//! Ethiscan - privacy policy scoring.
//!
//! Finds the privacy policy behind a page (or the page itself), asks a
//! generative language model to grade it against a fixed rubric, and returns
//! a validated score with a short summary.

pub mod config;
pub mod error;
pub mod http_client;
pub mod llm;
pub mod locator;
pub mod page;
pub mod pipeline;
pub mod storage;

pub use error::{AnalysisError, Result};
