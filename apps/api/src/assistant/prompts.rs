// Prompt templates for the AI resume assistant.
// Placeholders: {section}, {content}.

pub const CAREER_COACH_SYSTEM: &str = "You are a professional career coach who writes \
    concise, high-impact resume content. Respond with plain text only. \
    Do NOT add preambles, explanations, or markdown code fences.";

pub const IMPROVE_PROMPT_TEMPLATE: &str = "Improve this resume {section} section to be \
    high-impact, professional, and result-oriented. Use action verbs, numbers, and metrics. \
    Do not invent employers, titles, or figures that are not implied by the original. \
    Return only the improved text:\n\n\"{content}\"";

pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = "Provide {count} specific suggestions to \
    improve this resume {section} section. Format them as bullet points, one per line:\n\n\
    \"{content}\"";

/// Token budget for the rewritten section.
pub const IMPROVE_MAX_TOKENS: u32 = 1024;
/// Token budget for the suggestion list.
pub const SUGGESTIONS_MAX_TOKENS: u32 = 500;
pub const SUGGESTION_COUNT: usize = 4;

pub fn improve_prompt(section: &str, content: &str) -> String {
    IMPROVE_PROMPT_TEMPLATE
        .replace("{section}", section)
        .replace("{content}", content)
}

pub fn suggestions_prompt(section: &str, content: &str) -> String {
    SUGGESTIONS_PROMPT_TEMPLATE
        .replace("{count}", &SUGGESTION_COUNT.to_string())
        .replace("{section}", section)
        .replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_fill_every_placeholder() {
        let improve = improve_prompt("summary", "I write code");
        let suggest = suggestions_prompt("summary", "I write code");
        for prompt in [&improve, &suggest] {
            assert!(prompt.contains("summary"));
            assert!(prompt.contains("\"I write code\""));
            assert!(!prompt.contains('{'));
        }
        assert!(suggest.contains("4 specific suggestions"));
    }
}
