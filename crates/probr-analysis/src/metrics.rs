//! Names of the metrics recorded by the analysis pipeline.

/// Time to produce an analysis response (histogram).
pub const ANALYSIS_DURATION_SECONDS: &str = "analysis_duration_seconds";
/// LanguageTool round-trip time (histogram).
pub const GRAMMAR_CHECK_DURATION_SECONDS: &str = "grammar_check_duration_seconds";
