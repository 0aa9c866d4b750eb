//! Plan assembly: turns a course and its ingested materials into a dated,
//! titled list of study sessions.
//!
//! The assembler pulls everything the earlier stages produced — topics and
//! key terms from raw text, sections from stored structure blobs — into one
//! [`CourseDigest`], partitions the sections into chunks, schedules dates,
//! and then picks one archetype per position: overview, exam-prep,
//! content-based, topic-based, or review. An optional [`PlanEnhancer`] may
//! rewrite titles and descriptions afterwards; it never changes dates or
//! session count, and any failure leaves the heuristic text in place.

use std::collections::HashSet;

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::repository::{get_course, list_materials_by_course, replace_sessions_for_course};
use crate::models::{Course, Material, StudySession};
use crate::pipeline::analyzer::{DocumentStructure, Section};
use crate::pipeline::enhance::PlanEnhancer;
use crate::pipeline::partitioner::{split_for_sessions, ContentChunk};
use crate::pipeline::patterns::{extract_key_terms, extract_topics};
use crate::pipeline::scheduler::schedule_sessions;
use crate::pipeline::PlanError;

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// Separator between activity clauses in a session description.
const ACTIVITY_SEPARATOR: &str = " • ";

/// A session this close to the exam (in days) is an exam-prep candidate.
const NEAR_EXAM_DAYS: i64 = 7;

/// Minimum progress through the plan before exam-prep archetypes apply.
const EXAM_PREP_PROGRESS: f64 = 0.7;

/// Topics listed in overview and review descriptions.
const PREVIEW_TOPIC_COUNT: usize = 3;

/// Topic-based session titles are cut at this many characters.
const TOPIC_TITLE_MAX_CHARS: usize = 50;

// ═══════════════════════════════════════════════════════════
// Course digest
// ═══════════════════════════════════════════════════════════

/// Accumulated extraction results across all of a course's materials.
///
/// Topics and key terms are deduplicated case-insensitively in first-seen
/// order. Sections keep document order per material and are tagged with the
/// material they came from so sessions can link back to it.
#[derive(Debug, Default)]
pub struct CourseDigest {
    pub topics: Vec<String>,
    pub key_terms: Vec<String>,
    pub sections: Vec<Section>,
    seen_topics: HashSet<String>,
    seen_terms: HashSet<String>,
}

impl CourseDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one material into the digest.
    ///
    /// A structure blob that fails to parse is logged and skipped; the
    /// material's raw-text topics and terms are still collected.
    pub fn absorb(&mut self, material: &Material) {
        if let Some(text) = &material.raw_text {
            for topic in extract_topics(text) {
                if self.seen_topics.insert(topic.to_lowercase()) {
                    self.topics.push(topic);
                }
            }
            for term in extract_key_terms(text) {
                if self.seen_terms.insert(term.to_lowercase()) {
                    self.key_terms.push(term);
                }
            }
        }

        if let Some(blob) = &material.structure_json {
            match serde_json::from_str::<DocumentStructure>(blob) {
                Ok(structure) => {
                    for mut section in structure.sections {
                        section.material_id = Some(material.id);
                        section.material_title = Some(material.title.clone());
                        self.sections.push(section);
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        material_id = %material.id,
                        error = %error,
                        "skipping unparseable document structure"
                    );
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Plan generation
// ═══════════════════════════════════════════════════════════

/// Number of study sessions for a term of the given length.
///
/// Short terms get near-daily coverage; longer terms thin out to roughly
/// weekly, capped so no plan exceeds 16 sessions.
pub fn session_count_for(total_days: i64) -> usize {
    let count = if total_days <= 7 {
        total_days.min(3)
    } else if total_days <= 30 {
        (total_days / 3).min(8)
    } else if total_days <= 60 {
        (total_days / 5).min(12)
    } else {
        (total_days / 7).min(16)
    };
    count.max(1) as usize
}

/// Generate a study plan for a course without persisting it.
pub fn generate_plan(
    conn: &Connection,
    course_id: &Uuid,
    enhancer: Option<&dyn PlanEnhancer>,
) -> Result<Vec<StudySession>, PlanError> {
    let course = get_course(conn, course_id)?
        .ok_or_else(|| PlanError::CourseNotFound(course_id.to_string()))?;

    let mut digest = CourseDigest::new();
    let materials = list_materials_by_course(conn, course_id)?;
    for material in &materials {
        digest.absorb(material);
    }

    let window = course.term_window();
    let mut count = session_count_for(window.total_days());

    let chunks = split_for_sessions(&digest.sections, count);
    if !chunks.is_empty() {
        // One session per chunk: the partitioner may close early when the
        // content runs out, and empty sessions help nobody.
        count = chunks.len();
    }

    let dates = schedule_sessions(&window, count);
    let mut sessions = assemble_sessions(&course, &dates, &digest, &chunks);

    if let Some(enhancer) = enhancer {
        if let Some(enhanced) =
            enhancer.attempt(&course, &digest.topics, &digest.sections, sessions.len())
        {
            for (session, replacement) in sessions.iter_mut().zip(enhanced) {
                session.title = replacement.title;
                session.description = replacement.description;
            }
        }
    }

    tracing::info!(
        course_id = %course.id,
        materials = materials.len(),
        sections = digest.sections.len(),
        sessions = sessions.len(),
        "generated study plan"
    );

    Ok(sessions)
}

/// Generate a plan and atomically replace the course's stored sessions.
pub fn generate_and_store_plan(
    conn: &Connection,
    course_id: &Uuid,
    enhancer: Option<&dyn PlanEnhancer>,
) -> Result<Vec<StudySession>, PlanError> {
    let sessions = generate_plan(conn, course_id, enhancer)?;
    replace_sessions_for_course(conn, course_id, &sessions)?;
    Ok(sessions)
}

// ═══════════════════════════════════════════════════════════
// Archetype selection
// ═══════════════════════════════════════════════════════════

fn assemble_sessions(
    course: &Course,
    dates: &[chrono::NaiveDate],
    digest: &CourseDigest,
    chunks: &[ContentChunk],
) -> Vec<StudySession> {
    let total = dates.len();
    let mut sessions = Vec::with_capacity(total);

    for (i, &date) in dates.iter().enumerate() {
        let progress = (i as f64 + 1.0) / total as f64;
        let near_exam = course
            .exam_date
            .is_some_and(|exam| (exam - date).num_days() <= NEAR_EXAM_DAYS);
        let chunk = chunks.get(i);

        let (title, description) = if i == 0 {
            (
                "Course Overview & Initial Review".to_string(),
                overview_description(course, &digest.topics, chunk),
            )
        } else if near_exam && progress > EXAM_PREP_PROGRESS {
            exam_prep_session(&digest.topics, i, total, chunk)
        } else if let Some(chunk) = chunk {
            (
                chunk.title.clone(),
                content_description(chunk, progress),
            )
        } else if i < digest.topics.len() {
            let topic = &digest.topics[i];
            (
                format!("Study: {}", truncate_chars(topic, TOPIC_TITLE_MAX_CHARS)),
                topic_description(topic, progress, &digest.key_terms),
            )
        } else {
            let preview = &digest.topics[..digest.topics.len().min(PREVIEW_TOPIC_COUNT)];
            (
                format!("Review Session {}", i + 1),
                review_description(preview, progress),
            )
        };

        let mut session = StudySession::new(&course.id, date, &title, &description);
        session.material_id = chunk
            .and_then(|c| c.sections.first())
            .and_then(|s| s.material_id);
        sessions.push(session);
    }

    sessions
}

fn overview_description(course: &Course, topics: &[String], chunk: Option<&ContentChunk>) -> String {
    let mut parts = Vec::new();

    if let Some(first) = chunk.and_then(|c| c.sections.first()) {
        if let (Some(&lo), Some(&hi)) = (first.page_numbers.first(), first.page_numbers.last()) {
            let page_range = if lo == hi {
                format!("page {lo}")
            } else {
                format!("pages {lo}-{hi}")
            };
            let material_title = first.material_title.as_deref().unwrap_or("course materials");
            parts.push(format!("Read {page_range} of {material_title}"));
            if !first.title.is_empty() {
                parts.push(format!("Focus on: {}", first.title));
            }
        }
    }

    if !topics.is_empty() {
        let preview = topics[..topics.len().min(PREVIEW_TOPIC_COUNT)].join(", ");
        parts.push(format!("Familiarize yourself with key topics: {preview}"));
    }

    if parts.is_empty() {
        parts.push(format!(
            "Review course syllabus and materials for {}",
            course.name
        ));
    }
    parts.push("Set up study schedule and create initial notes structure".to_string());

    parts.join(ACTIVITY_SEPARATOR)
}

fn content_description(chunk: &ContentChunk, progress: f64) -> String {
    let mut parts = Vec::new();

    let mut titles: Vec<String> = chunk
        .sections
        .iter()
        .take(3)
        .map(|s| s.title.clone())
        .collect();
    if chunk.sections.len() > 3 {
        titles.push(format!("+ {} more", chunk.sections.len() - 3));
    }
    parts.push(format!("Study: {}", titles.join(", ")));

    if !chunk.pages.is_empty() {
        let material_title = chunk.sections[0]
            .material_title
            .as_deref()
            .unwrap_or("course materials");
        parts.push(format!(
            "Pages {} of {material_title}",
            format_page_range(&chunk.pages)
        ));
    }

    if progress > 0.3 {
        parts.push("Take notes on key concepts".to_string());
    }
    if progress > 0.5 {
        parts.push("Complete practice problems".to_string());
    }
    if progress > 0.7 {
        parts.push("Self-test understanding".to_string());
    }

    parts.join(ACTIVITY_SEPARATOR)
}

fn topic_description(topic: &str, progress: f64, key_terms: &[String]) -> String {
    let mut parts = vec![format!("Study and take notes on: {topic}")];

    if progress > 0.3 {
        parts.push("Review previous topics".to_string());
    }
    if progress > 0.5 && !key_terms.is_empty() {
        let sample = key_terms[..key_terms.len().min(PREVIEW_TOPIC_COUNT)].join(", ");
        parts.push(format!("Practice concepts: {sample}"));
    }
    if progress > 0.7 {
        parts.push("Complete practice problems or exercises".to_string());
    }

    parts.join(ACTIVITY_SEPARATOR)
}

fn review_description(topics: &[String], progress: f64) -> String {
    let mut parts = if topics.is_empty() {
        vec!["Review course materials".to_string()]
    } else {
        vec![format!("Review: {}", topics.join(", "))]
    };

    if progress > 0.6 {
        parts.push("Practice problems".to_string());
        parts.push("Self-test on key concepts".to_string());
    }
    if progress > 0.8 {
        parts.push("Focus on areas needing improvement".to_string());
    }

    parts.join(ACTIVITY_SEPARATOR)
}

fn exam_prep_session(
    topics: &[String],
    position: usize,
    total: usize,
    chunk: Option<&ContentChunk>,
) -> (String, String) {
    let mut parts = Vec::new();

    if let Some(chunk) = chunk {
        let titles: Vec<&str> = chunk
            .sections
            .iter()
            .take(2)
            .map(|s| s.title.as_str())
            .collect();
        if !titles.is_empty() {
            parts.push(format!("Review: {}", titles.join(", ")));
        }
        if !chunk.pages.is_empty() {
            parts.push(format!("Pages {}", format_page_range(&chunk.pages)));
        }
    }

    let title = if position == total.saturating_sub(2) {
        if parts.is_empty() {
            if topics.is_empty() {
                parts.push("Comprehensive review of all course materials".to_string());
            } else {
                let preview = topics[..topics.len().min(5)].join(", ");
                parts.push(format!("Comprehensive review of all topics: {preview}"));
            }
        }
        parts.push("Practice problems".to_string());
        parts.push("Review notes".to_string());
        parts.push("Identify weak areas".to_string());
        "Final Review & Practice"
    } else if position == total - 1 {
        if parts.is_empty() {
            parts.push("Review key concepts, formulas, and definitions".to_string());
        }
        parts.push("Organize notes for quick reference".to_string());
        parts.push("Get adequate rest before the exam".to_string());
        "Final Exam Preparation"
    } else {
        if parts.is_empty() {
            if topics.is_empty() {
                parts.push("Review course materials".to_string());
            } else {
                parts.push(format!("Focus on: {}", topics[position % topics.len()]));
            }
        }
        parts.push("Practice problems".to_string());
        parts.push("Self-test".to_string());
        parts.push("Identify questions to clarify".to_string());
        "Exam Prep Session"
    };

    (title.to_string(), parts.join(ACTIVITY_SEPARATOR))
}

/// Render a page set compactly: one page as-is, up to three listed, more
/// collapsed to a min-max range.
fn format_page_range(pages: &[u32]) -> String {
    let mut sorted: Vec<u32> = pages.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    match sorted.len() {
        0 => String::new(),
        1 => sorted[0].to_string(),
        2 | 3 => sorted
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!("{}-{}", sorted[0], sorted[sorted.len() - 1]),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
