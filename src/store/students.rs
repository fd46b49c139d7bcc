use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};

use super::{delete_row, ensure_exists, Entity, Store, StoreError, StoreResult};
use crate::model::{Class, NewStudent, Student, StudentPatch};

pub(super) const STUDENT_COLUMNS: &str = "s.id, s.name, c.id, c.name";
const STUDENT_JOIN: &str = "students s JOIN classes c ON c.id = s.class_id";

/// Reads the four `STUDENT_COLUMNS` starting at `offset`.
pub(super) fn student_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        in_class: Class {
            id: row.get(offset + 2)?,
            name: row.get(offset + 3)?,
        },
    })
}

impl Store {
    pub fn create_student(&self, new: &NewStudent) -> StoreResult<Student> {
        self.write(|tx| {
            tx.execute(
                "INSERT INTO students(name, class_id) VALUES(?, ?)",
                (&new.name, new.class_id),
            )?;
            load_student(tx, tx.last_insert_rowid())
        })
    }

    pub fn get_student(&self, id: i64) -> StoreResult<Student> {
        self.read(|tx| load_student(tx, id))
    }

    pub fn update_student(&self, id: i64, patch: &StudentPatch) -> StoreResult<Student> {
        self.write(|tx| {
            ensure_exists(tx, Entity::Student, id)?;

            let mut set_parts: Vec<&str> = Vec::new();
            let mut bind_values: Vec<Value> = Vec::new();
            if let Some(name) = &patch.name {
                set_parts.push("name = ?");
                bind_values.push(Value::Text(name.clone()));
            }
            if let Some(class_id) = patch.class_id {
                set_parts.push("class_id = ?");
                bind_values.push(Value::Integer(class_id));
            }

            if !set_parts.is_empty() {
                bind_values.push(Value::Integer(id));
                let sql = format!("UPDATE students SET {} WHERE id = ?", set_parts.join(", "));
                tx.execute(&sql, rusqlite::params_from_iter(bind_values))?;
            }
            load_student(tx, id)
        })
    }

    /// Removes the student and every attendance row recorded for them.
    pub fn delete_student(&self, id: i64) -> StoreResult<()> {
        self.write(|tx| delete_row(tx, Entity::Student, id))
    }

    pub fn list_students(&self) -> StoreResult<Vec<Student>> {
        self.read(|tx| {
            let sql = format!("SELECT {STUDENT_COLUMNS} FROM {STUDENT_JOIN} ORDER BY s.id");
            let mut stmt = tx.prepare(&sql)?;
            let students = stmt
                .query_map([], |r| student_from_row(r, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(students)
        })
    }
}

fn load_student(conn: &Connection, id: i64) -> StoreResult<Student> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM {STUDENT_JOIN} WHERE s.id = ?");
    conn.query_row(&sql, [id], |r| student_from_row(r, 0))
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: Entity::Student,
            id,
        })
}
