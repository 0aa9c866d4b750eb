//! Heuristic text pattern extraction — topic and key-term detection.
//!
//! A layered cascade of regular-expression rules pulls topic-shaped and
//! term-shaped phrases out of raw extracted text. The heading rules are
//! shared with the structure analyzer, evaluated in priority order with
//! first-match-wins semantics per line so each rule stays independently
//! testable.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// Inputs shorter than this (stripped) carry no usable structure.
const MIN_TEXT_LEN: usize = 100;

/// When more topics survive dedup, sample down to preserve coverage.
const MAX_TOPICS: usize = 15;

/// Leading topics kept verbatim when sampling down.
const TOPICS_KEPT_VERBATIM: usize = 5;

/// Topics stride-sampled from the remainder when sampling down.
const TOPICS_SAMPLED: usize = 10;

/// Key-term result cap.
const MAX_KEY_TERMS: usize = 20;

/// Key-term scan is bounded to the head of the text.
const KEY_TERM_SCAN_CHARS: usize = 5000;

/// All-caps lines that are document furniture, never section titles.
const STRUCTURAL_SKIP_WORDS: &[&str] = &[
    "TABLE OF CONTENTS",
    "PAGE",
    "CHAPTER",
    "APPENDIX",
    "BIBLIOGRAPHY",
    "REFERENCES",
];

/// Administrative headers that are never study topics.
const ADMIN_SKIP_WORDS: &[&str] = &[
    "SYLLABUS",
    "OBJECTIVES",
    "REQUIREMENTS",
    "GRADING",
    "SCHEDULE",
    "ASSIGNMENTS",
    "TEXTBOOK",
    "REFERENCES",
    "COURSE",
];

/// Generic academic words excluded from key terms.
const GENERIC_TERM_WORDS: &[&str] = &[
    "Course",
    "Students",
    "Instructor",
    "Required",
    "Optional",
    "Assignment",
    "Project",
    "Exam",
    "Final",
    "Midterm",
];

// ═══════════════════════════════════════════════════════════
// Heading cascade
// ═══════════════════════════════════════════════════════════

static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?i:chapter|section|part)\s*)?\d+[.:]\s+([A-Z][^\r\n]{5,80})")
        .expect("invalid numbered heading regex")
});

static TITLE_CASE_COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,5}:\s*$").expect("invalid title-colon regex")
});

static SYLLABUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i:week|unit|module)\s+\d+[:\-]\s*([A-Z][^\r\n]{10,60})")
            .expect("invalid week/unit/module regex"),
        Regex::new(r"(?i:topic)\s+\d+[:\-]\s*([A-Z][^\r\n]{10,60})")
            .expect("invalid topic regex"),
    ]
});

/// One rule of the heading cascade: a line predicate/extractor pair plus
/// the length bounds a candidate must satisfy to count as a topic.
pub(crate) struct HeadingRule {
    pub name: &'static str,
    extract: fn(&str) -> Option<String>,
    topic_min: usize,
    topic_max: usize,
}

pub(crate) static HEADING_RULES: LazyLock<Vec<HeadingRule>> = LazyLock::new(|| {
    vec![
        HeadingRule {
            name: "numbered",
            extract: extract_numbered,
            topic_min: 10,
            topic_max: 100,
        },
        HeadingRule {
            name: "all_caps",
            extract: extract_all_caps,
            topic_min: 5,
            topic_max: 60,
        },
        HeadingRule {
            name: "title_colon",
            extract: extract_title_colon,
            topic_min: 5,
            topic_max: 80,
        },
    ]
});

fn extract_numbered(line: &str) -> Option<String> {
    NUMBERED_HEADING
        .captures(line)
        .map(|cap| cap[1].trim().to_string())
}

fn extract_all_caps(line: &str) -> Option<String> {
    if !is_all_caps(line) || line.len() <= 5 || line.len() >= 60 {
        return None;
    }
    if STRUCTURAL_SKIP_WORDS.iter().any(|w| line.contains(w)) {
        return None;
    }
    Some(to_title_case(line))
}

fn extract_title_colon(line: &str) -> Option<String> {
    if TITLE_CASE_COLON.is_match(line) {
        Some(line.trim_end_matches(|c: char| c == ':' || c.is_whitespace()).to_string())
    } else {
        None
    }
}

/// Detect a section heading in a single line, first matching rule wins.
pub(crate) fn detect_heading(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    HEADING_RULES.iter().find_map(|rule| (rule.extract)(line))
}

// ═══════════════════════════════════════════════════════════
// Topics
// ═══════════════════════════════════════════════════════════

/// Extract an ordered, case-insensitively deduplicated list of topic-like
/// phrases from a block of text. Near-empty input yields an empty list.
pub fn extract_topics(text: &str) -> Vec<String> {
    if text.trim().len() < MIN_TEXT_LEN {
        return Vec::new();
    }

    let mut candidates = Vec::new();

    // Layers 1-3: the heading cascade, line by line.
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for rule in HEADING_RULES.iter() {
            if let Some(raw) = (rule.extract)(line) {
                let topic = collapse_whitespace(&raw);
                if topic.len() >= rule.topic_min && topic.len() <= rule.topic_max {
                    candidates.push(topic);
                }
                break;
            }
        }
    }

    // Layer 4: syllabus-style "Week/Unit/Module N: Title" patterns.
    for pattern in SYLLABUS_PATTERNS.iter() {
        for cap in pattern.captures_iter(text) {
            let topic = collapse_whitespace(cap[1].trim());
            if (10..=100).contains(&topic.len()) {
                candidates.push(topic);
            }
        }
    }

    candidates.retain(|t| {
        let upper = t.to_uppercase();
        !ADMIN_SKIP_WORDS.iter().any(|w| upper.contains(w))
    });

    let unique = dedup_case_insensitive(candidates);
    if unique.len() > MAX_TOPICS {
        sample_spread(unique)
    } else {
        unique
    }
}

/// Keep the first few topics verbatim and stride-sample the remainder so a
/// long document still yields a small, document-wide spread.
fn sample_spread(topics: Vec<String>) -> Vec<String> {
    let step = (topics.len() / TOPICS_SAMPLED).max(1);
    let mut kept: Vec<String> = topics.iter().take(TOPICS_KEPT_VERBATIM).cloned().collect();
    kept.extend(
        topics
            .iter()
            .skip(TOPICS_KEPT_VERBATIM)
            .step_by(step)
            .take(TOPICS_SAMPLED)
            .cloned(),
    );
    kept
}

// ═══════════════════════════════════════════════════════════
// Key terms
// ═══════════════════════════════════════════════════════════

static KEY_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3}\b").expect("invalid key term regex")
});

/// Extract key-term-like phrases: 2-4 consecutive capitalized words,
/// excluding generic academic vocabulary. Bounded to the head of the text.
pub fn extract_key_terms(text: &str) -> Vec<String> {
    if text.trim().len() < MIN_TEXT_LEN {
        return Vec::new();
    }

    let scan = match text.char_indices().nth(KEY_TERM_SCAN_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    };

    let mut terms = Vec::new();
    for m in KEY_TERM.find_iter(scan) {
        let term = collapse_whitespace(m.as_str());
        if term.len() > 5
            && term.len() < 40
            && !GENERIC_TERM_WORDS
                .iter()
                .any(|w| term.split_whitespace().any(|part| part == *w))
        {
            terms.push(term);
        }
    }

    let mut unique = dedup_case_insensitive(terms);
    unique.truncate(MAX_KEY_TERMS);
    unique
}

// ═══════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════

/// At least one cased character and none lowercase.
fn is_all_caps(line: &str) -> bool {
    line.chars().any(|c| c.is_alphabetic()) && !line.chars().any(|c| c.is_lowercase())
}

pub(crate) fn to_title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deduplicate preserving first-seen order, comparing case-insensitively.
pub(crate) fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        if seen.insert(item.to_lowercase()) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILLER: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
        Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

    fn with_filler(body: &str) -> String {
        format!("{body}\n{FILLER}\n")
    }

    #[test]
    fn numbered_headings_become_topics() {
        let text = with_filler(
            "1. Introduction to Thermodynamics\nChapter 2: Entropy and Disorder\n",
        );
        let topics = extract_topics(&text);
        assert!(topics.contains(&"Introduction to Thermodynamics".to_string()));
        assert!(topics.contains(&"Entropy and Disorder".to_string()));
    }

    #[test]
    fn all_caps_lines_recased() {
        let text = with_filler("WAVE PARTICLE DUALITY\n");
        let topics = extract_topics(&text);
        assert!(topics.contains(&"Wave Particle Duality".to_string()));
    }

    #[test]
    fn structural_caps_lines_skipped() {
        let text = with_filler("TABLE OF CONTENTS\nBIBLIOGRAPHY AND SOURCES\n");
        let topics = extract_topics(&text);
        assert!(topics.is_empty(), "structural lines leaked: {topics:?}");
    }

    #[test]
    fn title_case_colon_lines_detected() {
        let text = with_filler("Quantum Field Theory:\n");
        let topics = extract_topics(&text);
        assert!(topics.contains(&"Quantum Field Theory".to_string()));
    }

    #[test]
    fn syllabus_week_patterns_detected() {
        let text = with_filler("Week 3: Linear Transformations and Matrices\n");
        let topics = extract_topics(&text);
        assert!(topics.contains(&"Linear Transformations and Matrices".to_string()));
    }

    #[test]
    fn admin_headers_are_not_topics() {
        let text = with_filler("Grading Policy:\nCourse Requirements:\n");
        let topics = extract_topics(&text);
        assert!(topics.is_empty(), "admin headers leaked: {topics:?}");
    }

    #[test]
    fn duplicate_topics_deduplicated_case_insensitively() {
        let text = with_filler("1. Differential Equations\n2. DIFFERENTIAL EQUATIONS\n");
        let topics = extract_topics(&text);
        let matches = topics
            .iter()
            .filter(|t| t.eq_ignore_ascii_case("differential equations"))
            .count();
        assert_eq!(matches, 1);
    }

    #[test]
    fn many_topics_sampled_down() {
        let mut body = String::new();
        for i in 1..=40 {
            body.push_str(&format!("{i}. Topic Number {i:02} In Depth\n"));
        }
        let topics = extract_topics(&with_filler(&body));
        assert!(topics.len() <= TOPICS_KEPT_VERBATIM + TOPICS_SAMPLED);
        // first few kept verbatim
        assert_eq!(topics[0], "Topic Number 01 In Depth");
        assert_eq!(topics[4], "Topic Number 05 In Depth");
        // sampled tail reaches past the head of the document
        assert!(topics[5..].iter().any(|t| !t.contains("Number 0")));
    }

    #[test]
    fn near_empty_input_yields_nothing() {
        assert!(extract_topics("short").is_empty());
        assert!(extract_key_terms("   \n  ").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = with_filler("1. Introduction to Thermodynamics\nWEEK OVERVIEW\n");
        assert_eq!(extract_topics(&text), extract_topics(&text));
        assert_eq!(extract_key_terms(&text), extract_key_terms(&text));
    }

    #[test]
    fn key_terms_capture_capitalized_runs() {
        let text = with_filler(
            "Signal analysis leans on the Fourier Transform. Aliasing is bounded by the Nyquist Sampling Theorem in practice.",
        );
        let terms = extract_key_terms(&text);
        assert!(terms.contains(&"Fourier Transform".to_string()));
        assert!(terms.contains(&"Nyquist Sampling Theorem".to_string()));
    }

    #[test]
    fn generic_academic_terms_excluded() {
        let text = with_filler("The Final Exam covers the Course Overview material.");
        let terms = extract_key_terms(&text);
        assert!(terms.iter().all(|t| !t.contains("Exam")), "{terms:?}");
        assert!(terms.iter().all(|t| !t.contains("Course")), "{terms:?}");
    }

    #[test]
    fn heading_cascade_first_match_wins() {
        // Matches both the numbered rule and (after the number) nothing else;
        // the numbered rule must claim it.
        let heading = detect_heading("Chapter 3: Thermodynamic Cycles").unwrap();
        assert_eq!(heading, "Thermodynamic Cycles");

        let caps = detect_heading("ENERGY AND WORK").unwrap();
        assert_eq!(caps, "Energy And Work");

        assert!(detect_heading("plain body text continues here").is_none());
    }
}
