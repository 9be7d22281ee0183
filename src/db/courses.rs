use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
}

/// A student together with the courses they are enrolled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDetail {
    pub id: i64,
    pub name: String,
    pub courses: Vec<Course>,
}

fn exists(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<bool> {
    Ok(conn
        .query_row(sql, params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

impl Database {
    pub fn create_student(&self, name: &str) -> Result<Student> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO student (name) VALUES (?1)", params![name])?;
        Ok(Student {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub fn create_course(&self, title: &str) -> Result<Course> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO course (title) VALUES (?1)", params![title])?;
        Ok(Course {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
        })
    }

    pub fn list_students(&self) -> Result<Vec<Student>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM student ORDER BY id")?;
        let students = stmt
            .query_map([], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    pub fn list_courses(&self) -> Result<Vec<Course>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, title FROM course ORDER BY id")?;
        let courses = stmt
            .query_map([], |row| {
                Ok(Course {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }

    /// Look up a student along with their courses
    pub fn get_student(&self, id: i64) -> Result<Option<StudentDetail>> {
        let conn = self.conn.lock();
        let name: Option<String> = conn
            .query_row("SELECT name FROM student WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT c.id, c.title FROM course c
             JOIN student_course sc ON sc.course_id = c.id
             WHERE sc.student_id = ?1
             ORDER BY c.id",
        )?;
        let courses = stmt
            .query_map(params![id], |row| {
                Ok(Course {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(StudentDetail { id, name, courses }))
    }

    /// Students enrolled in a course
    pub fn students_in_course(&self, course_id: i64) -> Result<Vec<Student>> {
        let conn = self.conn.lock();
        if !exists(&conn, "SELECT 1 FROM course WHERE id = ?1", course_id)? {
            return Err(Error::NotFound(format!("Course {}", course_id)));
        }

        let mut stmt = conn.prepare(
            "SELECT s.id, s.name FROM student s
             JOIN student_course sc ON sc.student_id = s.id
             WHERE sc.course_id = ?1
             ORDER BY s.id",
        )?;
        let students = stmt
            .query_map(params![course_id], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    /// Enroll a student in a course. Enrolling twice is a no-op.
    pub fn enroll(&self, student_id: i64, course_id: i64) -> Result<()> {
        let conn = self.conn.lock();
        if !exists(&conn, "SELECT 1 FROM student WHERE id = ?1", student_id)? {
            return Err(Error::NotFound(format!("Student {}", student_id)));
        }
        if !exists(&conn, "SELECT 1 FROM course WHERE id = ?1", course_id)? {
            return Err(Error::NotFound(format!("Course {}", course_id)));
        }

        conn.execute(
            "INSERT OR IGNORE INTO student_course (student_id, course_id) VALUES (?1, ?2)",
            params![student_id, course_id],
        )?;
        Ok(())
    }
}
