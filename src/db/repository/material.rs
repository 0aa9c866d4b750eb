use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Material;

pub fn insert_material(conn: &Connection, material: &Material) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO materials (id, course_id, title, raw_text, structure_json, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            material.id.to_string(),
            material.course_id.to_string(),
            material.title,
            material.raw_text,
            material.structure_json,
            material.uploaded_at.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_material(conn: &Connection, id: &Uuid) -> Result<Option<Material>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, title, raw_text, structure_json, uploaded_at
         FROM materials WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], map_material_row);

    match result {
        Ok(row) => Ok(Some(material_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_materials_by_course(
    conn: &Connection,
    course_id: &Uuid,
) -> Result<Vec<Material>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, title, raw_text, structure_json, uploaded_at
         FROM materials WHERE course_id = ?1 ORDER BY uploaded_at ASC",
    )?;

    let rows = stmt.query_map(params![course_id.to_string()], map_material_row)?;

    let mut materials = Vec::new();
    for row in rows {
        materials.push(material_from_row(row?)?);
    }
    Ok(materials)
}

/// Store the serialized `DocumentStructure` blob produced at ingest.
pub fn update_material_structure(
    conn: &Connection,
    id: &Uuid,
    structure_json: &str,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE materials SET structure_json = ?2 WHERE id = ?1",
        params![id.to_string(), structure_json],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Material".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_material(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM materials WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Material".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

struct MaterialRow {
    id: String,
    course_id: String,
    title: String,
    raw_text: Option<String>,
    structure_json: Option<String>,
    uploaded_at: String,
}

fn map_material_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MaterialRow> {
    Ok(MaterialRow {
        id: row.get::<_, String>(0)?,
        course_id: row.get::<_, String>(1)?,
        title: row.get::<_, String>(2)?,
        raw_text: row.get::<_, Option<String>>(3)?,
        structure_json: row.get::<_, Option<String>>(4)?,
        uploaded_at: row.get::<_, String>(5)?,
    })
}

fn material_from_row(row: MaterialRow) -> Result<Material, DatabaseError> {
    Ok(Material {
        id: parse_uuid("materials.id", &row.id)?,
        course_id: parse_uuid("materials.course_id", &row.course_id)?,
        title: row.title,
        raw_text: row.raw_text,
        structure_json: row.structure_json,
        uploaded_at: parse_datetime("materials.uploaded_at", &row.uploaded_at)?,
    })
}
