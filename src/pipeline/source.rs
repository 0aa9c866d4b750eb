//! Document text source — the extraction collaborator boundary.
//!
//! The core never parses PDFs itself; something upstream extracts per-page
//! text and this module turns it into `PageText` sequences. Ingest runs
//! the structure analyzer once per material and persists the resulting
//! blob on the material row.

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use super::analyzer::{self, DocumentStructure, PageText};
use crate::db::{self, DatabaseError};
use crate::models::Material;

/// Marker separating page texts inside a stored full-text blob.
pub const PAGE_BREAK_MARKER: &str = "--- Page Break ---";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Structure serialization failed: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Material not found: {0}")]
    MaterialNotFound(String),
}

/// Supplies the ordered per-page text of a material.
pub trait DocumentTextSource: Send + Sync {
    fn pages(&self, material: &Material) -> Result<Vec<PageText>, IngestError>;
}

/// Text source over the material's stored `raw_text`.
///
/// Splits on form feeds (native PDF extractors) or on the page-break
/// marker (pre-joined blobs); text with neither becomes a single page.
pub struct StoredTextSource;

impl DocumentTextSource for StoredTextSource {
    fn pages(&self, material: &Material) -> Result<Vec<PageText>, IngestError> {
        let raw = material
            .raw_text
            .as_deref()
            .ok_or_else(|| IngestError::Extraction(format!(
                "material {} has no extracted text",
                material.id
            )))?;

        let parts: Vec<&str> = if raw.contains('\u{0c}') {
            raw.split('\u{0c}').collect()
        } else if raw.contains(PAGE_BREAK_MARKER) {
            raw.split(PAGE_BREAK_MARKER).collect()
        } else {
            vec![raw]
        };

        Ok(parts
            .iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i as u32 + 1, text.trim_matches('\n')))
            .collect())
    }
}

/// Analyze one material and persist its structure blob.
///
/// Returns the structure so callers can inspect it without re-parsing.
pub fn ingest_material(
    conn: &Connection,
    material_id: &Uuid,
    source: &dyn DocumentTextSource,
) -> Result<DocumentStructure, IngestError> {
    let material = db::get_material(conn, material_id)?
        .ok_or_else(|| IngestError::MaterialNotFound(material_id.to_string()))?;

    let pages = source.pages(&material)?;
    let structure = analyzer::analyze_pages(&pages);

    let blob = serde_json::to_string(&structure)
        .map_err(|e| IngestError::Serialization(e.to_string()))?;
    db::update_material_structure(conn, material_id, &blob)?;

    tracing::info!(
        material_id = %material_id,
        pages = structure.total_pages,
        sections = structure.sections.len(),
        "material ingested"
    );

    Ok(structure)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::{insert_course, insert_material, open_memory_database};
    use crate::models::Course;

    fn material_with_text(text: &str) -> Material {
        Material {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            title: "Lecture Notes".into(),
            raw_text: Some(text.into()),
            structure_json: None,
            uploaded_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn splits_on_form_feed() {
        let material = material_with_text("page one text\u{0c}page two text\u{0c}page three");
        let pages = StoredTextSource.pages(&material).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[2].text, "page three");
    }

    #[test]
    fn splits_on_page_break_marker() {
        let material = material_with_text("first\n--- Page Break ---\nsecond");
        let pages = StoredTextSource.pages(&material).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text, "first");
        assert_eq!(pages[1].text, "second");
    }

    #[test]
    fn unmarked_text_is_one_page() {
        let material = material_with_text("just a single block of text");
        let pages = StoredTextSource.pages(&material).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].word_count, 6);
    }

    #[test]
    fn missing_raw_text_is_an_extraction_error() {
        let mut material = material_with_text("");
        material.raw_text = None;
        let err = StoredTextSource.pages(&material).unwrap_err();
        assert!(matches!(err, IngestError::Extraction(_)));
    }

    #[test]
    fn ingest_persists_structure_blob() {
        let conn = open_memory_database().unwrap();
        let course = Course::new(
            "Physics",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            None,
        );
        insert_course(&conn, &course).unwrap();

        let material = Material::new(
            &course.id,
            "Textbook",
            Some("1. Mechanics and Motion\nbody text\u{0c}more body text".into()),
        );
        insert_material(&conn, &material).unwrap();

        let structure = ingest_material(&conn, &material.id, &StoredTextSource).unwrap();
        assert_eq!(structure.total_pages, 2);

        let stored = crate::db::get_material(&conn, &material.id)
            .unwrap()
            .unwrap();
        let parsed: DocumentStructure =
            serde_json::from_str(stored.structure_json.as_deref().unwrap()).unwrap();
        assert_eq!(parsed.total_pages, 2);
        assert_eq!(parsed.sections.len(), structure.sections.len());
    }

    #[test]
    fn ingest_unknown_material_errors() {
        let conn = open_memory_database().unwrap();
        let err = ingest_material(&conn, &Uuid::new_v4(), &StoredTextSource).unwrap_err();
        assert!(matches!(err, IngestError::MaterialNotFound(_)));
    }
}
