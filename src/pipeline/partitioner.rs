//! Content partitioning — groups sections into balanced study chunks.
//!
//! Greedy walk over sections in document order: a chunk is closed once
//! adding the next section would push it past 1.5x the per-session target,
//! provided the chunk is non-empty and the chunk budget allows another.
//! Sections are never split, so the final chunk may exceed the target.

use serde::{Deserialize, Serialize};

use super::analyzer::Section;

/// Closing threshold as a multiple of the per-session word target.
const OVERFLOW_FACTOR: f64 = 1.5;

/// A group of sections assigned to a single study session. Immutable once
/// built — the planner only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentChunk {
    pub sections: Vec<Section>,
    pub pages: Vec<u32>,
    pub total_words: usize,
    pub title: String,
}

impl ContentChunk {
    fn from_sections(sections: Vec<Section>) -> Self {
        let title = match sections.len() {
            1 => sections[0].title.clone(),
            _ => format!("{} & More", sections[0].title),
        };
        let mut pages: Vec<u32> = sections
            .iter()
            .flat_map(|s| s.page_numbers.iter().copied())
            .collect();
        pages.sort_unstable();
        pages.dedup();
        let total_words = sections.iter().map(Section::word_count).sum();
        Self {
            sections,
            pages,
            total_words,
            title,
        }
    }
}

/// Partition sections into at most `num_sessions` word-balanced chunks.
///
/// The concatenation of all chunks' sections reproduces the input sequence
/// exactly. Zero sections yield zero chunks.
pub fn split_for_sessions(sections: &[Section], num_sessions: usize) -> Vec<ContentChunk> {
    if sections.is_empty() {
        return Vec::new();
    }
    let num_sessions = num_sessions.max(1);

    let total_words: usize = sections.iter().map(Section::word_count).sum();
    let target = total_words as f64 / num_sessions as f64;

    let mut chunks: Vec<ContentChunk> = Vec::new();
    let mut pending: Vec<Section> = Vec::new();
    let mut pending_words = 0usize;

    for section in sections {
        let section_words = section.word_count();

        let would_overflow = (pending_words + section_words) as f64 > target * OVERFLOW_FACTOR;
        if would_overflow && !pending.is_empty() && chunks.len() < num_sessions - 1 {
            chunks.push(ContentChunk::from_sections(std::mem::take(&mut pending)));
            pending_words = 0;
        }

        pending.push(section.clone());
        pending_words += section_words;
    }

    if !pending.is_empty() {
        chunks.push(ContentChunk::from_sections(pending));
    }

    tracing::debug!(
        sections = sections.len(),
        sessions = num_sessions,
        chunks = chunks.len(),
        "content partitioned"
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str, words: usize, pages: Vec<u32>) -> Section {
        Section {
            title: title.to_string(),
            start_page: pages[0],
            end_page: *pages.last().unwrap(),
            page_numbers: pages,
            content: vec!["word"; words].join(" "),
            topics: Vec::new(),
            key_terms: Vec::new(),
            material_id: None,
            material_title: None,
        }
    }

    #[test]
    fn empty_sections_yield_no_chunks() {
        assert!(split_for_sessions(&[], 4).is_empty());
    }

    #[test]
    fn never_exceeds_session_count() {
        let sections: Vec<Section> = (0..20)
            .map(|i| section(&format!("S{i}"), 500, vec![i as u32 + 1]))
            .collect();
        for n in 1..=6 {
            assert!(split_for_sessions(&sections, n).len() <= n);
        }
    }

    #[test]
    fn chunks_preserve_section_order_exactly() {
        let sections: Vec<Section> = (0..7)
            .map(|i| section(&format!("S{i}"), 100 + i * 50, vec![i as u32 + 1]))
            .collect();
        let chunks = split_for_sessions(&sections, 3);

        let flattened: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.sections.iter().map(|s| s.title.clone()))
            .collect();
        let expected: Vec<String> = sections.iter().map(|s| s.title.clone()).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn single_section_chunk_keeps_its_title() {
        let sections = vec![section("Thermodynamics", 300, vec![1, 2])];
        let chunks = split_for_sessions(&sections, 3);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title, "Thermodynamics");
    }

    #[test]
    fn multi_section_chunk_titled_with_more_suffix() {
        let sections = vec![
            section("Kinematics", 100, vec![1]),
            section("Dynamics", 100, vec![2]),
        ];
        let chunks = split_for_sessions(&sections, 1);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title, "Kinematics & More");
    }

    #[test]
    fn pages_merged_sorted_and_deduplicated() {
        let sections = vec![
            section("A", 100, vec![3, 4]),
            section("B", 100, vec![4, 5, 1]),
        ];
        let chunks = split_for_sessions(&sections, 1);
        assert_eq!(chunks[0].pages, vec![1, 3, 4, 5]);
    }

    #[test]
    fn final_chunk_may_exceed_target() {
        // One small section then one huge one: the huge section lands in the
        // last chunk whole rather than being split.
        let sections = vec![
            section("Small", 100, vec![1]),
            section("Huge", 5000, vec![2]),
        ];
        let chunks = split_for_sessions(&sections, 2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].total_words, 5000);
    }

    #[test]
    fn word_counts_accumulate() {
        let sections = vec![
            section("A", 120, vec![1]),
            section("B", 80, vec![2]),
        ];
        let chunks = split_for_sessions(&sections, 1);
        assert_eq!(chunks[0].total_words, 200);
    }
}
