use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_date, parse_uuid};
use crate::db::DatabaseError;
use crate::models::StudySession;

pub fn insert_session(conn: &Connection, session: &StudySession) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO study_sessions (id, course_id, date, title, description, completed, material_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            session.id.to_string(),
            session.course_id.to_string(),
            session.date.to_string(),
            session.title,
            session.description,
            session.completed as i32,
            session.material_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn list_sessions_by_course(
    conn: &Connection,
    course_id: &Uuid,
) -> Result<Vec<StudySession>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, date, title, description, completed, material_id
         FROM study_sessions WHERE course_id = ?1 ORDER BY date ASC",
    )?;

    let rows = stmt.query_map(params![course_id.to_string()], |row| {
        Ok(SessionRow {
            id: row.get::<_, String>(0)?,
            course_id: row.get::<_, String>(1)?,
            date: row.get::<_, String>(2)?,
            title: row.get::<_, String>(3)?,
            description: row.get::<_, String>(4)?,
            completed: row.get::<_, i32>(5)?,
            material_id: row.get::<_, Option<String>>(6)?,
        })
    })?;

    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(session_from_row(row?)?);
    }
    Ok(sessions)
}

pub fn delete_sessions_by_course(conn: &Connection, course_id: &Uuid) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM study_sessions WHERE course_id = ?1",
        params![course_id.to_string()],
    )?;
    Ok(deleted)
}

/// Replace all sessions for a course in one transaction.
///
/// Regenerating a plan is a "replace" contract: callers must never observe
/// a partially-replaced session set, so the delete and inserts commit
/// together or not at all.
pub fn replace_sessions_for_course(
    conn: &Connection,
    course_id: &Uuid,
    sessions: &[StudySession],
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM study_sessions WHERE course_id = ?1",
        params![course_id.to_string()],
    )?;
    for session in sessions {
        insert_session(&tx, session)?;
    }
    tx.commit()?;
    Ok(())
}

struct SessionRow {
    id: String,
    course_id: String,
    date: String,
    title: String,
    description: String,
    completed: i32,
    material_id: Option<String>,
}

fn session_from_row(row: SessionRow) -> Result<StudySession, DatabaseError> {
    Ok(StudySession {
        id: parse_uuid("study_sessions.id", &row.id)?,
        course_id: parse_uuid("study_sessions.course_id", &row.course_id)?,
        date: parse_date("study_sessions.date", &row.date)?,
        title: row.title,
        description: row.description,
        completed: row.completed != 0,
        material_id: row
            .material_id
            .map(|id| parse_uuid("study_sessions.material_id", &id))
            .transpose()?,
    })
}
