//! Document structure analysis — recovers sections with page ranges from
//! raw per-page text.
//!
//! Pages are scanned in order; the first heading found in a page's leading
//! lines closes the current section and opens a new one. Documents with no
//! detectable headings fall back to fixed-size page chunks. Every emitted
//! section is enriched with topics and key terms.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patterns;

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// How many leading non-blank lines of a page are inspected for a heading.
const HEADER_SCAN_LINES: usize = 10;

/// Pages per chunk when no headings are detected anywhere.
const FALLBACK_CHUNK_PAGES: usize = 5;

/// Length bounds for a synthesized title taken from a page's first lines.
const TITLE_MIN_LEN: usize = 10;
const TITLE_MAX_LEN: usize = 80;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Extracted text of a single document page (1-based page numbers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub page: u32,
    pub text: String,
    pub word_count: usize,
}

impl PageText {
    pub fn new(page: u32, text: &str) -> Self {
        Self {
            page,
            word_count: text.split_whitespace().count(),
            text: text.to_string(),
        }
    }
}

/// A titled, contiguous page-range unit of a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    pub page_numbers: Vec<u32>,
    pub content: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub material_id: Option<Uuid>,
    #[serde(default)]
    pub material_title: Option<String>,
}

impl Section {
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// The analyzer's output: sections plus aggregate totals. This is the one
/// structure blob serialized per document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStructure {
    pub total_pages: usize,
    pub total_words: usize,
    pub sections: Vec<Section>,
}

// ═══════════════════════════════════════════════════════════
// Analysis
// ═══════════════════════════════════════════════════════════

/// Partition an ordered page sequence into titled sections.
///
/// Invariant: the union of all sections' page numbers equals the input page
/// range, in order, with no gaps or overlaps. Zero pages yield an empty
/// structure, not an error.
pub fn analyze_pages(pages: &[PageText]) -> DocumentStructure {
    if pages.is_empty() {
        return DocumentStructure::default();
    }

    let headers: Vec<Option<String>> = pages.iter().map(|p| first_header(&p.text)).collect();

    let mut sections = if headers.iter().any(|h| h.is_some()) {
        scan_sections(pages, &headers)
    } else {
        page_chunks(pages, FALLBACK_CHUNK_PAGES)
    };

    for section in &mut sections {
        section.topics = patterns::extract_topics(&section.content);
        section.key_terms = patterns::extract_key_terms(&section.content);
    }

    let structure = DocumentStructure {
        total_pages: pages.len(),
        total_words: pages.iter().map(|p| p.word_count).sum(),
        sections,
    };

    tracing::debug!(
        pages = structure.total_pages,
        words = structure.total_words,
        sections = structure.sections.len(),
        "document structure analyzed"
    );

    structure
}

/// Inspect a page's leading non-blank lines for a section heading.
fn first_header(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(HEADER_SCAN_LINES)
        .find_map(patterns::detect_heading)
}

/// Accumulator for the section being built during the page scan.
struct SectionBuilder {
    title: Option<String>,
    pages: Vec<u32>,
    content: Vec<String>,
}

impl SectionBuilder {
    fn open(title: Option<String>, page: &PageText) -> Self {
        Self {
            title,
            pages: vec![page.page],
            content: vec![page.text.clone()],
        }
    }

    fn push(&mut self, page: &PageText) {
        self.pages.push(page.page);
        self.content.push(page.text.clone());
    }

    fn build(self) -> Section {
        let (start, end) = (self.pages[0], *self.pages.last().unwrap());
        let title = self
            .title
            .unwrap_or_else(|| format!("Pages {start}-{end}"));
        Section {
            title,
            start_page: start,
            end_page: end,
            page_numbers: self.pages,
            content: self.content.join("\n"),
            topics: Vec::new(),
            key_terms: Vec::new(),
            material_id: None,
            material_title: None,
        }
    }
}

fn scan_sections(pages: &[PageText], headers: &[Option<String>]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<SectionBuilder> = None;

    for (page, header) in pages.iter().zip(headers) {
        match (header, current.as_mut()) {
            (Some(title), Some(_)) => {
                // Heading closes the running section and opens a new one.
                sections.push(current.take().unwrap().build());
                current = Some(SectionBuilder::open(Some(title.clone()), page));
            }
            (Some(title), None) => {
                current = Some(SectionBuilder::open(Some(title.clone()), page));
            }
            (None, Some(builder)) => builder.push(page),
            (None, None) => {
                // Pages before the first heading form an untitled preamble;
                // its "Pages X-Y" title is synthesized at build time.
                current = Some(SectionBuilder::open(None, page));
            }
        }
    }

    if let Some(builder) = current {
        sections.push(builder.build());
    }
    sections
}

/// Fixed-size page chunking for documents with no detectable headings.
fn page_chunks(pages: &[PageText], chunk_size: usize) -> Vec<Section> {
    pages
        .chunks(chunk_size)
        .map(|chunk| {
            let numbers: Vec<u32> = chunk.iter().map(|p| p.page).collect();
            let (start, end) = (numbers[0], *numbers.last().unwrap());
            let title = title_from_page(&chunk[0].text)
                .unwrap_or_else(|| format!("Pages {start}-{end}"));
            Section {
                title,
                start_page: start,
                end_page: end,
                page_numbers: numbers,
                content: chunk
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
                topics: Vec::new(),
                key_terms: Vec::new(),
                material_id: None,
                material_title: None,
            }
        })
        .collect()
}

/// Pull a plausible title out of a page's first lines: mixed-case, starts
/// with a capital, reasonable length.
fn title_from_page(text: &str) -> Option<String> {
    text.lines()
        .take(5)
        .map(str::trim)
        .find(|line| {
            line.len() > TITLE_MIN_LEN
                && line.len() < TITLE_MAX_LEN
                && line.chars().next().is_some_and(|c| c.is_uppercase())
                && line.chars().any(|c| c.is_lowercase())
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(page: u32) -> String {
        format!("plain body text of page {page} with nothing heading-like in it\n")
    }

    fn make_pages(texts: &[String]) -> Vec<PageText> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageText::new(i as u32 + 1, t))
            .collect()
    }

    fn all_page_numbers(structure: &DocumentStructure) -> Vec<u32> {
        structure
            .sections
            .iter()
            .flat_map(|s| s.page_numbers.iter().copied())
            .collect()
    }

    #[test]
    fn empty_document_yields_empty_structure() {
        let structure = analyze_pages(&[]);
        assert_eq!(structure.total_pages, 0);
        assert_eq!(structure.total_words, 0);
        assert!(structure.sections.is_empty());
    }

    #[test]
    fn headings_split_sections() {
        let pages = make_pages(&[
            format!("1. Introduction to Calculus\n{}", body(1)),
            body(2),
            format!("2. Limits and Continuity\n{}", body(3)),
            body(4),
        ]);
        let structure = analyze_pages(&pages);

        assert_eq!(structure.sections.len(), 2);
        assert_eq!(structure.sections[0].title, "Introduction to Calculus");
        assert_eq!(structure.sections[0].page_numbers, vec![1, 2]);
        assert_eq!(structure.sections[1].title, "Limits and Continuity");
        assert_eq!(structure.sections[1].page_numbers, vec![3, 4]);
    }

    #[test]
    fn sections_cover_every_page_exactly_once() {
        let pages = make_pages(&[
            body(1),
            body(2),
            format!("WAVES AND OPTICS\n{}", body(3)),
            body(4),
            format!("3. Advanced Material Here\n{}", body(5)),
        ]);
        let structure = analyze_pages(&pages);

        assert_eq!(all_page_numbers(&structure), vec![1, 2, 3, 4, 5]);
        for section in &structure.sections {
            assert!(section.page_numbers.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(section.start_page, section.page_numbers[0]);
            assert_eq!(section.end_page, *section.page_numbers.last().unwrap());
        }
    }

    #[test]
    fn preamble_pages_get_synthesized_title() {
        let pages = make_pages(&[
            body(1),
            format!("1. The First Real Section\n{}", body(2)),
        ]);
        let structure = analyze_pages(&pages);

        assert_eq!(structure.sections.len(), 2);
        assert_eq!(structure.sections[0].title, "Pages 1-1");
        assert_eq!(structure.sections[1].title, "The First Real Section");
    }

    #[test]
    fn headerless_twelve_pages_chunk_as_five_five_two() {
        let pages = make_pages(&(1..=12).map(body).collect::<Vec<_>>());
        let structure = analyze_pages(&pages);

        let sizes: Vec<usize> = structure.sections.iter().map(|s| s.page_numbers.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(structure.sections[0].page_numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(structure.sections[2].page_numbers, vec![11, 12]);
        assert_eq!(all_page_numbers(&structure), (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn fallback_chunk_titles_from_first_line_or_page_range() {
        let mut texts: Vec<String> = (1..=6).map(body).collect();
        texts[0] = format!("An Opening Chapter About Light\n{}", body(1));
        // Second chunk's first page has no usable title line
        texts[5] = format!("NOTES\n\n\n{}", body(6));
        let pages = make_pages(&texts);
        let structure = analyze_pages(&pages);

        assert_eq!(structure.sections.len(), 2);
        assert_eq!(structure.sections[0].title, "An Opening Chapter About Light");
        assert_eq!(structure.sections[1].title, "Pages 6-6");
    }

    #[test]
    fn totals_aggregate_all_pages() {
        let pages = make_pages(&[body(1), body(2)]);
        let structure = analyze_pages(&pages);

        assert_eq!(structure.total_pages, 2);
        assert_eq!(
            structure.total_words,
            pages.iter().map(|p| p.word_count).sum::<usize>()
        );
    }

    #[test]
    fn sections_enriched_with_topics() {
        let long_body: String = body(1).repeat(4);
        let pages = make_pages(&[format!(
            "1. Neural Network Fundamentals\n{long_body}"
        )]);
        let structure = analyze_pages(&pages);

        assert_eq!(structure.sections.len(), 1);
        assert!(structure.sections[0]
            .topics
            .contains(&"Neural Network Fundamentals".to_string()));
    }

    #[test]
    fn structure_blob_round_trips_through_json() {
        let pages = make_pages(&[format!("1. Serialization Basics Here\n{}", body(1))]);
        let structure = analyze_pages(&pages);

        let json = serde_json::to_string(&structure).unwrap();
        let parsed: DocumentStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_pages, structure.total_pages);
        assert_eq!(parsed.sections.len(), structure.sections.len());
        assert_eq!(parsed.sections[0].title, structure.sections[0].title);
    }
}
