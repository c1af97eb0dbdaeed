//! The catalog of resume layouts the browser can render.

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

pub const TEMPLATES: [TemplateInfo; 10] = [
    TemplateInfo {
        id: "modern-executive",
        name: "Modern Executive",
        category: "Professional",
        description: "Bold headers and high-contrast layout for leadership roles.",
    },
    TemplateInfo {
        id: "minimalist",
        name: "Clean Minimalist",
        category: "Minimalist",
        description: "Maximum whitespace and elegant typography for a clean look.",
    },
    TemplateInfo {
        id: "creative-pro",
        name: "Creative Pro",
        category: "Creative",
        description: "Vibrant sidebar and modern accents for design and marketing.",
    },
    TemplateInfo {
        id: "classic-blue",
        name: "Classic Blue",
        category: "Corporate",
        description: "Conservative, formal layout with a professional blue color palette.",
    },
    TemplateInfo {
        id: "tech-focused",
        name: "Tech Focused",
        category: "Technical",
        description: "Monospaced elements and code-like syntax for software engineers.",
    },
    TemplateInfo {
        id: "elegant-serif",
        name: "Elegant Serif",
        category: "Professional",
        description: "Sophisticated serif fonts for a classic, high-end feel.",
    },
    TemplateInfo {
        id: "ats-optimized",
        name: "ATS Optimized",
        category: "Minimalist",
        description: "Simple single-column structure designed for machine readability.",
    },
    TemplateInfo {
        id: "student-entry",
        name: "Student Entry",
        category: "Student",
        description: "Education-first layout optimized for new graduates and interns.",
    },
    TemplateInfo {
        id: "compact-column",
        name: "Compact Column",
        category: "Corporate",
        description: "Dense information display perfect for long career histories.",
    },
    TemplateInfo {
        id: "freelancer-showcase",
        name: "Freelancer Showcase",
        category: "Creative",
        description: "Highlighting skills and achievements for independent contractors.",
    },
];

pub fn is_known_template(id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.id == id)
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Category `All` (or none) matches everything; `q` matches name or category, case-insensitively.
pub fn filter_templates(filter: &TemplateFilter) -> Vec<TemplateInfo> {
    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
    let needle = filter
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .unwrap_or_default();

    TEMPLATES
        .iter()
        .filter(|t| category.map_or(true, |c| t.category.eq_ignore_ascii_case(c)))
        .filter(|t| {
            needle.is_empty()
                || t.name.to_lowercase().contains(&needle)
                || t.category.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

/// GET /api/templates
pub async fn handle_list_templates(Query(filter): Query<TemplateFilter>) -> Json<Vec<TemplateInfo>> {
    Json(filter_templates(&filter))
}
