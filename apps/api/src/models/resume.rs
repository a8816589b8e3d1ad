use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled Resume";
pub const DEFAULT_TEMPLATE: &str = "modern";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    #[serde(rename = "resumeId")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub personal_info: Value,
    pub experience: Value,
    pub education: Value,
    pub skills: Value,
    pub projects: Value,
    pub certifications: Value,
    pub languages: Value,
    pub content: Value,
    pub ats_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// A blank resume. Blank titles and templates fall back to the defaults.
    pub fn new(user_id: Uuid, title: Option<&str>, template: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: non_blank(title).unwrap_or(DEFAULT_TITLE).to_string(),
            template: non_blank(template).unwrap_or(DEFAULT_TEMPLATE).to_string(),
            personal_info: json!({}),
            experience: json!([]),
            education: json!([]),
            skills: json!([]),
            projects: json!([]),
            certifications: json!([]),
            languages: json!([]),
            content: Value::Null,
            ats_score: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every content section with the update. Title and template
    /// only change when the update carries a non-blank value.
    pub fn apply(&mut self, update: &ResumeUpdate) {
        if let Some(title) = non_blank(update.title.as_deref()) {
            self.title = title.to_string();
        }
        if let Some(template) = non_blank(update.template.as_deref()) {
            self.template = template.to_string();
        }
        self.personal_info = update.personal_info.clone();
        self.experience = update.experience.clone();
        self.education = update.education.clone();
        self.skills = update.skills.clone();
        self.projects = update.projects.clone();
        self.certifications = update.certifications.clone();
        self.languages = update.languages.clone();
        self.content = update.content.clone();
        self.updated_at = Utc::now();
    }
}

/// Full-replacement payload for a resume's content sections.
/// Missing or `null` sections become empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdate {
    pub title: Option<String>,
    pub template: Option<String>,
    #[serde(default)]
    pub personal_info: Value,
    #[serde(default)]
    pub experience: Value,
    #[serde(default)]
    pub education: Value,
    #[serde(default)]
    pub skills: Value,
    #[serde(default)]
    pub projects: Value,
    #[serde(default)]
    pub certifications: Value,
    #[serde(default)]
    pub languages: Value,
    #[serde(default)]
    pub content: Value,
}

impl ResumeUpdate {
    /// Normalizes `null` sections and checks their JSON shape.
    /// `personalInfo` must be an object; list sections must be arrays.
    pub fn normalize(mut self) -> Result<Self, String> {
        if self.personal_info.is_null() {
            self.personal_info = json!({});
        }
        if !self.personal_info.is_object() {
            return Err("personalInfo must be an object".to_string());
        }

        for (name, section) in [
            ("experience", &mut self.experience),
            ("education", &mut self.education),
            ("skills", &mut self.skills),
            ("projects", &mut self.projects),
            ("certifications", &mut self.certifications),
            ("languages", &mut self.languages),
        ] {
            if section.is_null() {
                *section = json!([]);
            }
            if !section.is_array() {
                return Err(format!("{name} must be an array"));
            }
        }
        Ok(self)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
