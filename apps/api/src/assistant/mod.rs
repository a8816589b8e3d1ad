//! AI resume assistant. Rewrites a resume section and proposes improvements.
//!
//! `AppState` holds an `Option<Arc<dyn Rewriter>>`: `None` when no API key is
//! configured. Tests swap in a canned implementation.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;

use crate::assistant::prompts::{
    improve_prompt, suggestions_prompt, CAREER_COACH_SYSTEM, IMPROVE_MAX_TOKENS,
    SUGGESTIONS_MAX_TOKENS, SUGGESTION_COUNT,
};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Returns an improved version of `content`.
    async fn improve(&self, section: &str, content: &str) -> Result<String, AppError>;

    /// Returns short, actionable improvement suggestions.
    async fn suggest(&self, section: &str, content: &str) -> Result<Vec<String>, AppError>;
}

/// Rewriter backed by the Claude Messages API.
pub struct LlmRewriter(pub LlmClient);

#[async_trait]
impl Rewriter for LlmRewriter {
    async fn improve(&self, section: &str, content: &str) -> Result<String, AppError> {
        self.0
            .call_text(
                &improve_prompt(section, content),
                CAREER_COACH_SYSTEM,
                IMPROVE_MAX_TOKENS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Section rewrite failed: {e}")))
    }

    async fn suggest(&self, section: &str, content: &str) -> Result<Vec<String>, AppError> {
        let text = self
            .0
            .call_text(
                &suggestions_prompt(section, content),
                CAREER_COACH_SYSTEM,
                SUGGESTIONS_MAX_TOKENS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Suggestion generation failed: {e}")))?;
        Ok(parse_suggestions(&text, SUGGESTION_COUNT))
    }
}

/// Splits a bulleted LLM answer into clean suggestion lines.
/// Bullet glyphs and `1.` / `1)` numbering are removed; blank lines dropped.
pub fn parse_suggestions(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_owned)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(&['-', '*', '•', '–'][..]).trim_start();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggestions_strips_markers() {
        let text = "- Add metrics\n* Use action verbs\n\n• Trim filler\n1. Lead with impact\n2) Mention tools";
        assert_eq!(
            parse_suggestions(text, 10),
            vec![
                "Add metrics",
                "Use action verbs",
                "Trim filler",
                "Lead with impact",
                "Mention tools"
            ]
        );
    }

    #[test]
    fn test_parse_suggestions_respects_limit() {
        let text = "- one\n- two\n- three\n- four\n- five";
        assert_eq!(parse_suggestions(text, 4).len(), 4);
    }

    #[test]
    fn test_leading_numbers_without_marker_are_kept() {
        assert_eq!(
            parse_suggestions("3 years of Rust is a strength", 4),
            vec!["3 years of Rust is a strength"]
        );
    }
}
