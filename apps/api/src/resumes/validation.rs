//! Input checks for resume writes. Only what the database cannot express
//! cleanly lives here: non-blank titles and catalog membership.

use crate::errors::AppError;
use crate::models::resume::ResumeInput;
use crate::templates::is_known_template;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_SKILLS: usize = 100;

/// Trims text fields in place and drops blank skills.
pub fn normalize(input: &mut ResumeInput) {
    if let Some(title) = input.title.as_mut() {
        *title = title.trim().to_string();
    }
    if let Some(template_id) = input.template_id.as_mut() {
        *template_id = template_id.trim().to_string();
    }
    if let Some(skills) = input.skills.as_mut() {
        skills.iter_mut().for_each(|s| *s = s.trim().to_string());
        skills.retain(|s| !s.is_empty());
    }
}

/// Checks the fields that are present.
pub fn validate_fields(input: &ResumeInput) -> Result<(), AppError> {
    if let Some(title) = &input.title {
        if title.is_empty() {
            return Err(AppError::Validation("Resume title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "Resume title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
    }
    if let Some(template_id) = &input.template_id {
        if !is_known_template(template_id) {
            return Err(AppError::Validation(format!(
                "Unknown template '{template_id}'"
            )));
        }
    }
    if let Some(skills) = &input.skills {
        if skills.len() > MAX_SKILLS {
            return Err(AppError::Validation(format!(
                "A resume can list at most {MAX_SKILLS} skills"
            )));
        }
    }
    Ok(())
}

/// Creation additionally requires a title. Returns it.
pub fn require_title(input: &ResumeInput) -> Result<&str, AppError> {
    input
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Resume title is required".to_string()))
}
