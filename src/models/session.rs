use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scheduled study session — the planner's output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub material_id: Option<Uuid>,
}

impl StudySession {
    pub fn new(course_id: &Uuid, date: NaiveDate, title: &str, description: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id: *course_id,
            date,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            material_id: None,
        }
    }
}
