//! ATS Scorer: deterministic resume / job-description compatibility score.
//!
//! Four independent heuristics are summed into a 0 – 100 score:
//! 1. Keyword match (40): JD tokens longer than 3 chars found in the resume
//! 2. Formatting (30): penalties for images, tables and overlong resumes
//! 3. Structure (20): presence of experience / education / skill / summary
//! 4. Content (10): penalties for very short resumes and missing metrics
//!
//! `score` is pure: no I/O, no shared state. Safe to call from any task.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Constants
// ────────────────────────────────────────────────────────────────────────────

pub const KEYWORD_MAX: f64 = 40.0;
pub const FORMATTING_MAX: u32 = 30;
pub const STRUCTURE_MAX: u32 = 20;
pub const CONTENT_MAX: u32 = 10;
pub const ATS_MAX: u32 = 100;

/// Tokens must be strictly longer than this (in chars) to count as keywords.
const MIN_KEYWORD_CHARS: usize = 3;
const MISSING_KEYWORD_LIMIT: usize = 5;

const FORMATTING_PENALTY: u32 = 10;
const IMAGE_MARKERS: &[&str] = &["image", "[img]"];
const TABLE_MARKERS: &[&str] = &["table", "[table]"];
const MAX_RESUME_CHARS: usize = 2000;

const SECTION_POINTS: u32 = 5;

const MIN_RESUME_CHARS: usize = 200;
const SHORT_RESUME_PENALTY: u32 = 5;
const NO_METRICS_PENALTY: u32 = 2;

/// Keyword scores below this share of the maximum trigger a keyword recommendation.
const KEYWORD_RECOMMENDATION_RATIO: f64 = 0.75;

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("{0} must not be empty")]
    InvalidInput(&'static str),
}

/// Validated scorer input. Both texts are guaranteed to contain non-whitespace.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    resume_text: &'a str,
    job_description: &'a str,
}

impl<'a> ScoreInput<'a> {
    pub fn new(resume_text: &'a str, job_description: &'a str) -> Result<Self, ScoreError> {
        if resume_text.trim().is_empty() {
            return Err(ScoreError::InvalidInput("resume text"));
        }
        if job_description.trim().is_empty() {
            return Err(ScoreError::InvalidInput("job description"));
        }
        Ok(Self {
            resume_text,
            job_description,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordReport {
    pub score: u32, // 0 – 40
    pub matches: usize,
    pub total_keywords: usize,
    pub missing_keywords: Vec<String>,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingReport {
    pub score: u32, // 0 – 30
    pub issues: Vec<String>,
    pub analysis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPresence {
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub has_summary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    pub score: u32, // 0 – 20
    pub sections: SectionPresence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReport {
    pub score: u32, // 0 – 10
    pub word_count: usize,
    pub char_count: usize,
    pub has_numbers: bool,
}

/// Full ATS report. Built once per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub ats_score: u32, // 0 – 100
    pub keyword: KeywordReport,
    pub formatting: FormattingReport,
    pub structure: StructureReport,
    pub content: ContentReport,
    pub recommendations: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume against a job description.
///
/// The unrounded keyword score feeds the aggregate, so
/// `ats_score == round(keyword_raw + formatting + structure + content)`.
pub fn score(input: &ScoreInput<'_>) -> ScoreReport {
    let resume = input.resume_text;
    let resume_lower = resume.to_lowercase();
    let char_count = resume.chars().count();

    let keywords = extract_keywords(input.job_description);
    let (keyword_raw, keyword) = score_keywords(&resume_lower, &keywords);
    let formatting = score_formatting(resume, char_count);
    let structure = score_structure(&resume_lower);
    let content = score_content(resume, char_count);

    let total = keyword_raw + f64::from(formatting.score + structure.score + content.score);
    let ats_score = (total.round().max(0.0) as u32).min(ATS_MAX);

    let recommendations = build_recommendations(&keyword, &structure, &content);

    ScoreReport {
        ats_score,
        keyword,
        formatting,
        structure,
        content,
        recommendations,
    }
}

/// Splits the JD on whitespace, lower-cases it, and keeps tokens longer than 3 chars.
/// Duplicates are kept: every occurrence counts toward the match ratio.
pub fn extract_keywords(job_description: &str) -> Vec<String> {
    job_description
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_owned)
        .collect()
}

fn score_keywords(resume_lower: &str, keywords: &[String]) -> (f64, KeywordReport) {
    let mut matches = 0usize;
    let mut missing_keywords: Vec<String> = Vec::new();
    let mut seen_missing: HashSet<&str> = HashSet::new();

    for keyword in keywords {
        if resume_lower.contains(keyword.as_str()) {
            matches += 1;
        } else if missing_keywords.len() < MISSING_KEYWORD_LIMIT
            && seen_missing.insert(keyword.as_str())
        {
            missing_keywords.push(keyword.clone());
        }
    }

    // An empty keyword list scores 0 rather than dividing by zero.
    let raw = if keywords.is_empty() {
        0.0
    } else {
        (matches as f64 / keywords.len() as f64 * KEYWORD_MAX).min(KEYWORD_MAX)
    };

    let analysis = if keywords.is_empty() {
        "The job description has no keywords longer than 3 characters to match.".to_string()
    } else {
        format!(
            "Matched {matches} of {} job description keywords.",
            keywords.len()
        )
    };

    (
        raw,
        KeywordReport {
            score: raw.round() as u32,
            matches,
            total_keywords: keywords.len(),
            missing_keywords,
            analysis,
        },
    )
}

/// Marker checks are case-sensitive against the original text.
fn score_formatting(resume: &str, char_count: usize) -> FormattingReport {
    let mut issues = Vec::new();

    if IMAGE_MARKERS.iter().any(|m| resume.contains(m)) {
        issues.push("Remove images: most ATS parsers cannot read them.".to_string());
    }
    if TABLE_MARKERS.iter().any(|m| resume.contains(m)) {
        issues.push("Replace tables with plain text sections.".to_string());
    }
    if char_count > MAX_RESUME_CHARS {
        issues.push(format!(
            "Shorten the resume to at most {MAX_RESUME_CHARS} characters (currently {char_count})."
        ));
    }

    let penalty = FORMATTING_PENALTY * issues.len() as u32;
    let score = FORMATTING_MAX.saturating_sub(penalty);

    let analysis = if issues.is_empty() {
        "Good formatting.".to_string()
    } else {
        format!("{} formatting issue(s) may confuse ATS parsers.", issues.len())
    };

    FormattingReport {
        score,
        issues,
        analysis,
    }
}

fn score_structure(resume_lower: &str) -> StructureReport {
    let sections = SectionPresence {
        has_experience: resume_lower.contains("experience"),
        has_education: resume_lower.contains("education"),
        has_skills: resume_lower.contains("skill"),
        has_summary: resume_lower.contains("summary"),
    };

    let present = [
        sections.has_experience,
        sections.has_education,
        sections.has_skills,
        sections.has_summary,
    ]
    .iter()
    .filter(|&&p| p)
    .count() as u32;

    StructureReport {
        score: (present * SECTION_POINTS).min(STRUCTURE_MAX),
        sections,
    }
}

fn score_content(resume: &str, char_count: usize) -> ContentReport {
    let has_numbers = resume.chars().any(|c| c.is_ascii_digit());

    let mut score = CONTENT_MAX;
    if char_count < MIN_RESUME_CHARS {
        score = score.saturating_sub(SHORT_RESUME_PENALTY);
    }
    if !has_numbers {
        score = score.saturating_sub(NO_METRICS_PENALTY);
    }

    ContentReport {
        score,
        word_count: resume.split_whitespace().count(),
        char_count,
        has_numbers,
    }
}

/// Builds human-readable hints from the sub-scores. Never affects the score.
fn build_recommendations(
    keyword: &KeywordReport,
    structure: &StructureReport,
    content: &ContentReport,
) -> Vec<String> {
    let mut recs = Vec::new();

    if f64::from(keyword.score) < KEYWORD_MAX * KEYWORD_RECOMMENDATION_RATIO
        && !keyword.missing_keywords.is_empty()
    {
        recs.push(format!(
            "Work these job description keywords into your resume: {}.",
            keyword.missing_keywords.join(", ")
        ));
    }

    let sections = &structure.sections;
    for (present, name) in [
        (sections.has_summary, "Summary"),
        (sections.has_experience, "Experience"),
        (sections.has_education, "Education"),
        (sections.has_skills, "Skills"),
    ] {
        if !present {
            recs.push(format!("Add a clearly labelled {name} section."));
        }
    }

    if !content.has_numbers {
        recs.push("Quantify achievements with numbers and metrics.".to_string());
    }
    if content.char_count < MIN_RESUME_CHARS {
        recs.push(format!(
            "Expand your resume to at least {MIN_RESUME_CHARS} characters."
        ));
    }

    if recs.is_empty() {
        recs.push("Your resume is well aligned with this job description.".to_string());
    }
    recs
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RESUME: &str = "Experienced software engineer with 5 years experience. \
        Skills: Python, Go. Education: BS Computer Science. Summary: results-driven.";
    const PADDING: &str = " Led the migration of 12 services to Kubernetes, cutting deploy \
        time by 40 percent across three product teams.";
    const JD: &str = "Looking for software engineer with python experience and cloud skills";

    fn run(resume: &str, jd: &str) -> ScoreReport {
        score(&ScoreInput::new(resume, jd).unwrap())
    }

    #[test]
    fn test_extract_keywords_keeps_long_tokens_and_duplicates() {
        let kws = extract_keywords("Rust and RUST for the Team team");
        assert_eq!(kws, vec!["rust", "rust", "team", "team"]);
    }

    #[test]
    fn test_extract_keywords_counts_chars_not_bytes() {
        // "café" is 4 chars but 5 bytes; "été" is 3 chars.
        let kws = extract_keywords("café été");
        assert_eq!(kws, vec!["café"]);
    }

    #[test]
    fn test_example_scenario_short_resume() {
        let report = run(RESUME, JD);
        assert_eq!(report.keyword.total_keywords, 8);
        assert_eq!(report.keyword.matches, 6);
        assert_eq!(report.keyword.score, 30);
        assert_eq!(report.keyword.missing_keywords, vec!["looking", "cloud"]);
        assert_eq!(report.formatting.score, 30);
        assert_eq!(report.structure.score, 20);
        // 131 chars: short-resume penalty applies
        assert_eq!(report.content.score, 5);
        assert_eq!(report.ats_score, 85);
    }

    #[test]
    fn test_example_scenario_padded_resume_hits_full_content() {
        let resume = format!("{RESUME}{PADDING}");
        assert!(resume.chars().count() >= 200);
        let report = run(&resume, JD);
        assert_eq!(report.structure.score, 20);
        assert_eq!(report.formatting.score, 30);
        assert_eq!(report.content.score, 10);
        assert_eq!(report.keyword.score, 30);
        assert_eq!(report.ats_score, 90);
    }

    #[test]
    fn test_long_resume_with_img_marker_loses_twenty_formatting_points() {
        let resume = format!("[img] {}", "x".repeat(2494));
        assert_eq!(resume.chars().count(), 2500);
        let report = run(&resume, JD);
        assert_eq!(report.formatting.score, 10);
        assert_eq!(report.formatting.issues.len(), 2);
    }

    #[test]
    fn test_all_formatting_penalties_floor_at_zero() {
        let resume = format!("image table {}", "y".repeat(2100));
        let report = run(&resume, JD);
        assert_eq!(report.formatting.score, 0);
    }

    #[test]
    fn test_formatting_markers_are_case_sensitive() {
        let report = run("IMAGE TABLE resume", JD);
        assert_eq!(report.formatting.score, 30);
        assert!(report.formatting.issues.is_empty());
    }

    #[test]
    fn test_structure_none_present_is_zero() {
        let report = run("Jane Doe, backend developer.", JD);
        assert_eq!(report.structure.score, 0);
        assert!(!report.structure.sections.has_experience);
    }

    #[test]
    fn test_structure_markers_are_case_insensitive() {
        let report = run("EXPERIENCE EDUCATION SKILLS SUMMARY", JD);
        assert_eq!(report.structure.score, 20);
    }

    #[test]
    fn test_content_short_without_digits_is_three() {
        let report = run("short resume", JD);
        assert_eq!(report.content.score, 3);
        assert!(!report.content.has_numbers);
        assert_eq!(report.content.word_count, 2);
    }

    #[test]
    fn test_length_penalty_starts_after_two_thousand_chars() {
        let at_limit = run(&"x".repeat(2000), JD);
        assert_eq!(at_limit.formatting.score, 30);
        assert!(at_limit.formatting.issues.is_empty());

        let over_limit = run(&"x".repeat(2001), JD);
        assert_eq!(over_limit.formatting.score, 20);
        assert_eq!(over_limit.formatting.issues.len(), 1);
    }

    #[test]
    fn test_short_penalty_stops_at_two_hundred_chars() {
        let below = run(&format!("1{}", "x".repeat(198)), JD);
        assert_eq!(below.content.char_count, 199);
        assert_eq!(below.content.score, 5);

        let at_min = run(&format!("1{}", "x".repeat(199)), JD);
        assert_eq!(at_min.content.char_count, 200);
        assert_eq!(at_min.content.score, 10);
    }

    #[test]
    fn test_length_thresholds_count_chars_not_bytes() {
        // 2000 chars, 4000 bytes: within the formatting limit.
        let wide = run(&"é".repeat(2000), JD);
        assert_eq!(wide.formatting.score, 30);
        assert_eq!(wide.content.char_count, 2000);

        // 150 chars, 300 bytes: still short.
        let short = run(&"é".repeat(150), JD);
        assert_eq!(short.content.score, 3);
    }

    #[test]
    fn test_jd_without_qualifying_tokens_scores_zero_keywords() {
        let report = run(RESUME, "a an the of to be");
        assert_eq!(report.keyword.score, 0);
        assert_eq!(report.keyword.matches, 0);
        assert_eq!(report.keyword.total_keywords, 0);
        assert!(report.keyword.missing_keywords.is_empty());
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert_eq!(
            ScoreInput::new(RESUME, "").unwrap_err(),
            ScoreError::InvalidInput("job description")
        );
        assert_eq!(
            ScoreInput::new("   \n", JD).unwrap_err(),
            ScoreError::InvalidInput("resume text")
        );
    }

    #[test]
    fn test_missing_keywords_are_distinct_ordered_and_capped() {
        let jd = "kafka kafka spark flink beam storm pulsar";
        let report = run("nothing relevant here", jd);
        assert_eq!(
            report.keyword.missing_keywords,
            vec!["kafka", "spark", "flink", "beam", "storm"]
        );
        // Duplicates still count toward the denominator.
        assert_eq!(report.keyword.total_keywords, 7);
    }

    #[test]
    fn test_aggregate_uses_unrounded_keyword_score() {
        // 1 of 3 keywords: raw 13.33, rounds to 13.
        let report = run("rust", "rust golang java");
        assert_eq!(report.keyword.score, 13);
        let expected = 13 + report.formatting.score + report.structure.score + report.content.score;
        assert_eq!(report.ats_score, expected);
    }

    #[test]
    fn test_recommendations_mention_missing_keywords_and_sections() {
        let report = run("rust developer", "kubernetes terraform");
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("kubernetes") && r.contains("terraform")));
        assert!(report.recommendations.iter().any(|r| r.contains("Summary")));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = run(RESUME, JD);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("atsScore").is_some());
        assert!(json["keyword"].get("missingKeywords").is_some());
        assert!(json["structure"]["sections"].get("hasSkills").is_some());
        assert!(json["content"].get("wordCount").is_some());
    }

    proptest! {
        #[test]
        fn prop_scores_stay_within_bounds(resume in "\\PC{1,400}", jd in "\\PC{1,200}") {
            prop_assume!(!resume.trim().is_empty() && !jd.trim().is_empty());
            let report = run(&resume, &jd);
            prop_assert!(report.ats_score <= ATS_MAX);
            prop_assert!(f64::from(report.keyword.score) <= KEYWORD_MAX);
            prop_assert!(report.formatting.score <= FORMATTING_MAX);
            prop_assert!(report.structure.score <= STRUCTURE_MAX);
            prop_assert!(report.content.score <= CONTENT_MAX);
        }

        #[test]
        fn prop_scoring_is_idempotent(resume in "[a-z0-9 ]{1,300}", jd in "[a-z ]{1,120}") {
            prop_assume!(!resume.trim().is_empty() && !jd.trim().is_empty());
            prop_assert_eq!(run(&resume, &jd), run(&resume, &jd));
        }

        #[test]
        fn prop_adding_jd_keywords_never_lowers_keyword_score(
            base in "[a-z ]{1,120}",
            jd in "[a-z]{4,9}( [a-z]{4,9}){1,8}",
            take in 0usize..9,
        ) {
            prop_assume!(!base.trim().is_empty());
            let before = run(&base, &jd).keyword.score;
            let extra: Vec<&str> = jd.split_whitespace().take(take).collect();
            let enriched = format!("{base} {}", extra.join(" "));
            let after = run(&enriched, &jd).keyword.score;
            prop_assert!(after >= before, "before={} after={}", before, after);
        }
    }
}
