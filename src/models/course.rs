use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::scheduler::ScheduleWindow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub exam_date: Option<NaiveDate>,
}

impl Course {
    pub fn new(
        name: &str,
        term_start: NaiveDate,
        term_end: NaiveDate,
        exam_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            term_start,
            term_end,
            exam_date,
        }
    }

    /// The scheduling window for this course's term.
    ///
    /// Inverted endpoints are normalized by the window constructor.
    pub fn term_window(&self) -> ScheduleWindow {
        ScheduleWindow::new(self.term_start, self.term_end, self.exam_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_window_swaps_inverted_endpoints() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let course = Course::new("Algorithms", start, end, None);

        let window = course.term_window();
        assert!(window.start <= window.end);
        assert_eq!(window.start, end);
        assert_eq!(window.end, start);
    }
}
