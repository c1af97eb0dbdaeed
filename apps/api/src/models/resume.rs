use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_TEMPLATE_ID: &str = "modern-executive";
pub const UNTITLED_RESUME: &str = "Untitled Resume";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    #[default]
    Draft,
    Final,
}

impl ResumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::Draft => "draft",
            ResumeStatus::Final => "final",
        }
    }

    pub fn from_db(raw: &str) -> Self {
        match raw {
            "final" => ResumeStatus::Final,
            _ => ResumeStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub linkedin: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub id: String,
    pub role: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBreakdown {
    #[serde(deserialize_with = "score_value")]
    pub quality: u32,
    #[serde(deserialize_with = "score_value")]
    pub relevance: u32,
    #[serde(deserialize_with = "score_value")]
    pub skills: u32,
    #[serde(deserialize_with = "score_value")]
    pub clarity: u32,
    #[serde(deserialize_with = "score_value")]
    pub ats: u32,
}

/// ATS-style score, every number on a 0–100 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeScore {
    #[serde(deserialize_with = "score_value")]
    pub overall: u32,
    pub breakdown: ScoreBreakdown,
    pub feedback: Vec<String>,
}

/// Accepts any JSON number, rounds it and clamps it to 0–100.
fn score_value<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u32)
}

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub status: String,
    pub thumbnail: Option<String>,
    pub personal_info: Json<PersonalInfo>,
    pub experience: Json<Vec<ExperienceItem>>,
    pub education: Json<Vec<EducationItem>>,
    pub skills: Vec<String>,
    pub score: Option<Json<ResumeScore>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resume as returned over the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub status: ResumeStatus,
    pub thumbnail: Option<String>,
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub score: Option<ResumeScore>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            template_id: row.template_id,
            status: ResumeStatus::from_db(&row.status),
            thumbnail: row.thumbnail,
            personal_info: row.personal_info.0,
            experience: row.experience.0,
            education: row.education.0,
            skills: row.skills,
            score: row.score.map(|s| s.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Writable resume fields. Absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInput {
    pub title: Option<String>,
    pub template_id: Option<String>,
    pub status: Option<ResumeStatus>,
    pub thumbnail: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<ExperienceItem>>,
    pub education: Option<Vec<EducationItem>>,
    pub skills: Option<Vec<String>>,
}
