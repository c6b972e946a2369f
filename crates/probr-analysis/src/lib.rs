//! # probr-analysis
//!
//! Text analysis for Probr: sentence splitting, readability statistics and
//! grammar checking through an external LanguageTool server.
//!
//! - [`sentences`]: English sentence splitting
//! - [`readability`]: readability formulas and word counts
//! - [`report`]: the per-document / per-sentence statistics report
//! - [`grammar`]: [`GrammarChecker`] seam and the LanguageTool client
//! - [`adapter`]: [`Analyzer`], which turns a request into a response

#![deny(unsafe_code)]

pub mod adapter;
pub mod errors;
pub mod grammar;
pub mod metrics;
pub mod readability;
pub mod report;
pub mod sentences;

pub use adapter::{AnalysisRequest, AnalysisResponse, Analyzer};
pub use errors::{AnalysisError, Result};
pub use grammar::{GrammarChecker, LanguageToolClient, Match};
pub use report::TextStatistics;
pub use sentences::split_sentences;
