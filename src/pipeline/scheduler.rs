//! Session date scheduling — spaced-repetition date distribution.
//!
//! Two policies: an exam-aware two-phase split (evenly spaced early
//! sessions, then a denser prep phase inside the two weeks before the
//! exam) and an exponential fallback whose 1.5 exponent concentrates
//! sessions toward the end of the window. Pure date arithmetic, no I/O.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// Length of the intensive prep phase before an exam.
const PREP_WINDOW_DAYS: i64 = 14;

/// Minimum rest between the last early session and the first prep session.
const PREP_LEAD_GAP_DAYS: i64 = 3;

/// Exam-aware two-phase treatment needs more sessions than this.
const EXAM_AWARE_MIN_SESSIONS: usize = 4;

/// Exponent of the fallback curve; >1 compresses early offsets.
const CURVE_EXPONENT: f64 = 1.5;

/// Adjacent dates further apart than this qualify for midpoint gap-filling.
const GAP_FILL_MIN_DAYS: i64 = 2;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// The calendar window sessions are drawn from. End is inclusive; the exam
/// date, when present, need not fall inside the window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub exam_date: Option<NaiveDate>,
}

impl ScheduleWindow {
    /// Build a window, swapping inverted endpoints rather than erroring.
    pub fn new(start: NaiveDate, end: NaiveDate, exam_date: Option<NaiveDate>) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self {
            start,
            end,
            exam_date,
        }
    }

    /// Inclusive length of the window in days (always >= 1).
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// ═══════════════════════════════════════════════════════════
// Scheduling
// ═══════════════════════════════════════════════════════════

/// Produce a sorted, duplicate-free sequence of session dates.
///
/// Returns at most `count` dates inside `[start, end]`; a single-day window
/// returns exactly `[start]` regardless of count. In exam-aware mode every
/// prep-phase date is strictly before the exam.
pub fn schedule_sessions(window: &ScheduleWindow, count: usize) -> Vec<NaiveDate> {
    let count = count.max(1);
    let total_days = window.total_days();
    if total_days <= 1 {
        return vec![window.start];
    }

    let exam_aware = window.exam_date.filter(|_| count > EXAM_AWARE_MIN_SESSIONS);

    let mut dates = match exam_aware {
        Some(exam) => two_phase_dates(window, count, exam),
        None => exponential_dates(window, count),
    };

    dates.sort_unstable();
    dates.dedup();
    fill_gaps(&mut dates, count);

    // Re-clamp: gap-filling and prep windows can drift outside the term or
    // past the exam; such dates are dropped rather than kept.
    dates.retain(|d| *d >= window.start && *d <= window.end);
    if let Some(exam) = exam_aware {
        if exam > window.start {
            dates.retain(|d| *d < exam);
        }
    }
    fill_gaps(&mut dates, count);

    dates.truncate(count);

    tracing::debug!(
        count,
        produced = dates.len(),
        exam_aware = exam_aware.is_some(),
        "session dates scheduled"
    );

    dates
}

/// Evenly spaced early sessions, then a denser prep phase ending the day
/// before the exam.
fn two_phase_dates(window: &ScheduleWindow, count: usize, exam: NaiveDate) -> Vec<NaiveDate> {
    let early_count = (count / 2).max(1);
    let prep_count = count - early_count;

    let mut dates = Vec::with_capacity(count);

    let early_end = (exam - Duration::days(PREP_WINDOW_DAYS + 1)).max(window.start);
    let early_days = (early_end - window.start).num_days() + 1;
    if early_days > 0 {
        let step = (early_days / early_count as i64).max(1);
        for i in 0..early_count as i64 {
            let date = window.start + Duration::days(i * step);
            if date <= early_end {
                dates.push(date);
            }
        }
    }

    let prep_start = match dates.last() {
        Some(last) => (*last + Duration::days(PREP_LEAD_GAP_DAYS))
            .max(exam - Duration::days(PREP_WINDOW_DAYS)),
        None => exam - Duration::days(PREP_WINDOW_DAYS),
    };
    let prep_end = exam - Duration::days(1);
    let prep_days = (prep_end - prep_start).num_days() + 1;
    if prep_days > 0 && prep_count > 0 {
        let step = (prep_days / prep_count as i64).max(1);
        for i in 0..prep_count as i64 {
            let date = prep_start + Duration::days(i * step);
            if date < exam && !dates.contains(&date) {
                dates.push(date);
            }
        }
    }

    dates
}

/// Exponential fallback: offsets follow `total_days * progress^1.5`, so
/// sessions bunch toward the end of the window.
fn exponential_dates(window: &ScheduleWindow, count: usize) -> Vec<NaiveDate> {
    let total_days = window.total_days();
    let mut dates = Vec::with_capacity(count);
    for i in 0..count {
        let progress = (i + 1) as f64 / count as f64;
        let offset = ((total_days as f64 * progress.powf(CURVE_EXPONENT)) as i64)
            .min(total_days - 1);
        let date = window.start + Duration::days(offset);
        if !dates.contains(&date) {
            dates.push(date);
        }
    }
    dates
}

/// Insert midpoints of wide adjacent gaps until the target count is reached
/// or no gap qualifies. Input must be sorted and distinct; stays so.
fn fill_gaps(dates: &mut Vec<NaiveDate>, count: usize) {
    while dates.len() < count {
        let mut inserted = false;
        let mut i = 1;
        while i < dates.len() && dates.len() < count {
            let gap = (dates[i] - dates[i - 1]).num_days();
            if gap > GAP_FILL_MIN_DAYS {
                dates.insert(i, dates[i - 1] + Duration::days(gap / 2));
                inserted = true;
                i += 2;
            } else {
                i += 1;
            }
        }
        if !inserted {
            break;
        }
    }
}
