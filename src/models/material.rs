use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course material: one uploaded document.
///
/// `raw_text` is the extracted full text (pages joined with a page-break
/// marker); `structure_json` is the serialized `DocumentStructure` blob
/// produced at ingest. Both are optional — a material whose extraction
/// failed still exists and simply contributes nothing to the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub raw_text: Option<String>,
    pub structure_json: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

impl Material {
    pub fn new(course_id: &Uuid, title: &str, raw_text: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id: *course_id,
            title: title.to_string(),
            raw_text,
            structure_json: None,
            uploaded_at: chrono::Utc::now().naive_utc(),
        }
    }
}
