#![deny(unsafe_code)]
//! # coevo-cognition
//!
//! The two external collaborators of the evolution controller: a symbolic
//! function-pair generator and a report summarizer, both backed by the Gemini
//! `generateContent` API with simulated and failing counterparts for tests
//! and offline use.
//!
//! Neither collaborator retries; each call is attempted once and the caller
//! substitutes local fallbacks on failure.

pub mod error;
pub mod gemini;
pub mod generator;
pub mod prompt;
pub mod summarizer;

pub use error::CognitionError;
pub use gemini::{GeminiClient, AUTH_ENV_VAR, DEFAULT_MODEL};
pub use generator::{
    fallback_pairs, FailingPairGenerator, GeminiPairGenerator, PairGenerator,
    SimulatedPairGenerator, SymbolicPair,
};
pub use prompt::PromptBuilder;
pub use summarizer::{
    FailingSummarizer, GeminiSummarizer, ReportSummarizer, SimulatedSummarizer, FALLBACK_SUMMARY,
};
