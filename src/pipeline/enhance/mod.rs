//! Optional LLM enhancement of session titles and descriptions.
//!
//! The enhancer is best-effort decoration over the heuristic planner: it
//! may substitute titles/descriptions but never changes the date sequence
//! or session count, and any failure — connection, timeout, malformed
//! output — degrades to the heuristic text instead of failing the plan.

pub mod ollama;

use serde::Deserialize;
use thiserror::Error;

use super::analyzer::Section;
use crate::models::Course;

/// How many topics/sections are surfaced in the prompt.
const PROMPT_TOPIC_LIMIT: usize = 15;
const PROMPT_SECTION_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Cannot connect to LLM backend at {0}")]
    Connection(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// Minimal LLM access contract; implemented by the Ollama client and the
/// test mock.
pub trait LlmClient: Send + Sync {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, EnhanceError>;
}

/// One generated session: title + description, dates stay heuristic.
#[derive(Debug, Clone, Deserialize)]
pub struct EnhancedSession {
    pub title: String,
    pub description: String,
}

/// Capability-checked enhancement strategy: `attempt` either produces
/// usable sessions or `None`, never an error the caller must handle.
pub trait PlanEnhancer: Send + Sync {
    fn attempt(
        &self,
        course: &Course,
        topics: &[String],
        sections: &[Section],
        session_count: usize,
    ) -> Option<Vec<EnhancedSession>>;
}

/// LLM-backed enhancer over any `LlmClient`.
pub struct LlmPlanEnhancer<C: LlmClient> {
    client: C,
    model: String,
}

impl<C: LlmClient> LlmPlanEnhancer<C> {
    pub fn new(client: C, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl<C: LlmClient> PlanEnhancer for LlmPlanEnhancer<C> {
    fn attempt(
        &self,
        course: &Course,
        topics: &[String],
        sections: &[Section],
        session_count: usize,
    ) -> Option<Vec<EnhancedSession>> {
        let prompt = build_plan_prompt(course, topics, sections, session_count);

        let response = match self.client.generate(&self.model, &prompt, SYSTEM_PROMPT) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "plan enhancement call failed, using heuristic text");
                return None;
            }
        };

        match parse_sessions(&response, session_count) {
            Ok(sessions) if !sessions.is_empty() => Some(sessions),
            Ok(_) => {
                tracing::warn!("plan enhancement returned no sessions, using heuristic text");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "plan enhancement response unusable, using heuristic text");
                None
            }
        }
    }
}

const SYSTEM_PROMPT: &str = "You are an academic tutor that creates effective, \
personalized study plans. Always return valid JSON only.";

/// Build the study-plan prompt from course context.
fn build_plan_prompt(
    course: &Course,
    topics: &[String],
    sections: &[Section],
    session_count: usize,
) -> String {
    let mut context = Vec::new();
    if !topics.is_empty() {
        let preview: Vec<&str> = topics
            .iter()
            .take(PROMPT_TOPIC_LIMIT)
            .map(String::as_str)
            .collect();
        context.push(format!("Key topics: {}", preview.join(", ")));
    }
    if !sections.is_empty() {
        let listing: Vec<String> = sections
            .iter()
            .take(PROMPT_SECTION_LIMIT)
            .map(|s| format!("- {}: pages {}-{}", s.title, s.start_page, s.end_page))
            .collect();
        context.push(format!("Course sections:\n{}", listing.join("\n")));
    }
    let context = if context.is_empty() {
        "No specific course content available.".to_string()
    } else {
        context.join("\n")
    };

    let exam = course
        .exam_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    format!(
        "Create a detailed study plan for {name}.\n\n\
         Course Details:\n\
         - Term: {start} to {end}\n\
         - Exam Date: {exam}\n\
         - Number of study sessions: {count}\n\n\
         Course Content:\n{context}\n\n\
         Generate {count} study sessions with a clear, specific title and a \
         detailed description of study activities. Distribute effort using \
         spaced repetition (more frequent near the exam).\n\n\
         Return ONLY a JSON array of objects, each with \"title\" and \
         \"description\" fields. No other text.",
        name = course.name,
        start = course.term_start,
        end = course.term_end,
        exam = exam,
        count = session_count,
        context = context,
    )
}

/// Parse the model's JSON array, tolerating markdown code fences, and
/// truncate to the requested session count.
fn parse_sessions(response: &str, session_count: usize) -> Result<Vec<EnhancedSession>, EnhanceError> {
    let cleaned = strip_code_fences(response);
    let mut sessions: Vec<EnhancedSession> = serde_json::from_str(cleaned)
        .map_err(|e| EnhanceError::ResponseParsing(e.to_string()))?;
    sessions.truncate(session_count);
    Ok(sessions)
}

fn strip_code_fences(response: &str) -> &str {
    let mut text = response.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
