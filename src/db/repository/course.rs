use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_date, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Course;

pub fn insert_course(conn: &Connection, course: &Course) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO courses (id, name, term_start, term_end, exam_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            course.id.to_string(),
            course.name,
            course.term_start.to_string(),
            course.term_end.to_string(),
            course.exam_date.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_course(conn: &Connection, id: &Uuid) -> Result<Option<Course>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, term_start, term_end, exam_date FROM courses WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok(CourseRow {
            id: row.get::<_, String>(0)?,
            name: row.get::<_, String>(1)?,
            term_start: row.get::<_, String>(2)?,
            term_end: row.get::<_, String>(3)?,
            exam_date: row.get::<_, Option<String>>(4)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(course_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_course(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM courses WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Course".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

struct CourseRow {
    id: String,
    name: String,
    term_start: String,
    term_end: String,
    exam_date: Option<String>,
}

fn course_from_row(row: CourseRow) -> Result<Course, DatabaseError> {
    Ok(Course {
        id: parse_uuid("courses.id", &row.id)?,
        name: row.name,
        term_start: parse_date("courses.term_start", &row.term_start)?,
        term_end: parse_date("courses.term_end", &row.term_end)?,
        exam_date: row
            .exam_date
            .map(|d| parse_date("courses.exam_date", &d))
            .transpose()?,
    })
}
