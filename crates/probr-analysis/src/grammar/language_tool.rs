//! LanguageTool HTTP API client (`POST /v2/check`).

use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use probr_settings::LanguageToolSettings;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{GrammarChecker, Match};
use crate::errors::{AnalysisError, Result};
use crate::metrics::GRAMMAR_CHECK_DURATION_SECONDS;

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    message: String,
    #[serde(default)]
    replacements: Vec<WireReplacement>,
    offset: usize,
    length: usize,
    context: WireContext,
    #[serde(default)]
    sentence: String,
    rule: WireRule,
}

#[derive(Debug, Deserialize)]
struct WireReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WireContext {
    text: String,
    offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRule {
    id: String,
    #[serde(default)]
    issue_type: String,
    category: WireCategory,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    id: String,
}

impl From<WireMatch> for Match {
    fn from(m: WireMatch) -> Self {
        Self {
            rule_id: m.rule.id,
            message: m.message,
            replacements: m.replacements.into_iter().map(|r| r.value).collect(),
            offset_in_context: m.context.offset,
            context: m.context.text,
            offset: m.offset,
            error_length: m.length,
            category: m.rule.category.id,
            rule_issue_type: m.rule.issue_type,
            sentence: m.sentence,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Grammar checker backed by a LanguageTool server.
pub struct LanguageToolClient {
    client: reqwest::Client,
    check_url: String,
    language: String,
    disabled_rules: Option<String>,
}

impl LanguageToolClient {
    /// Build a client from settings. The HTTP client is reused across checks.
    pub fn new(settings: &LanguageToolSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| AnalysisError::Internal(format!("failed to build HTTP client: {e}")))?;
        let disabled_rules =
            (!settings.disabled_rules.is_empty()).then(|| settings.disabled_rules.join(","));
        Ok(Self {
            client,
            check_url: format!("{}/v2/check", settings.url.trim_end_matches('/')),
            language: settings.language.clone(),
            disabled_rules,
        })
    }

    /// Endpoint this client posts to.
    pub fn check_url(&self) -> &str {
        &self.check_url
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolClient {
    #[instrument(skip_all, fields(chars = text.len(), language = %self.language))]
    async fn check(&self, text: &str) -> Result<Vec<Match>> {
        let mut form = vec![("text", text), ("language", self.language.as_str())];
        if let Some(rules) = &self.disabled_rules {
            form.push(("disabledRules", rules.as_str()));
        }

        let started = Instant::now();
        let response = self.client.post(&self.check_url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "LanguageTool returned an error");
            return Err(AnalysisError::GrammarCheck(format!(
                "LanguageTool returned {status}: {body}"
            )));
        }

        let parsed: CheckResponse = response.json().await?;
        histogram!(GRAMMAR_CHECK_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        debug!(matches = parsed.matches.len(), "grammar check finished");
        Ok(parsed.matches.into_iter().map(Match::from).collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
