use rusqlite::{Connection, OptionalExtension, Row};

use super::students::{student_from_row, STUDENT_COLUMNS};
use super::{delete_row, ensure_exists, Entity, Store, StoreError, StoreResult};
use crate::model::{Attendance, AttendancePatch, NewAttendance};

fn attendance_from_row(row: &Row<'_>) -> rusqlite::Result<Attendance> {
    Ok(Attendance {
        id: row.get(0)?,
        present: row.get(1)?,
        date: row.get(2)?,
        student: student_from_row(row, 3)?,
    })
}

fn select_sql(filter: &str) -> String {
    format!(
        "SELECT a.id, a.present, a.date, {STUDENT_COLUMNS}
         FROM attendance a
         JOIN students s ON s.id = a.student_id
         JOIN classes c ON c.id = s.class_id
         {filter}"
    )
}

impl Store {
    /// Records one day for one student.
    ///
    /// A second record for the same `(date, student)` fails with a unique
    /// [`StoreError::ConstraintViolation`] and the insert is rolled back.
    pub fn create_attendance(&self, new: &NewAttendance) -> StoreResult<Attendance> {
        self.write(|tx| {
            tx.execute(
                "INSERT INTO attendance(present, date, student_id) VALUES(?, ?, ?)",
                (new.present, new.date, new.student_id),
            )?;
            load_attendance(tx, tx.last_insert_rowid())
        })
    }

    pub fn get_attendance(&self, id: i64) -> StoreResult<Attendance> {
        self.read(|tx| load_attendance(tx, id))
    }

    pub fn update_attendance(&self, id: i64, patch: &AttendancePatch) -> StoreResult<Attendance> {
        self.write(|tx| {
            ensure_exists(tx, Entity::Attendance, id)?;
            if let Some(present) = patch.present {
                tx.execute(
                    "UPDATE attendance SET present = ? WHERE id = ?",
                    (present, id),
                )?;
            }
            load_attendance(tx, id)
        })
    }

    pub fn delete_attendance(&self, id: i64) -> StoreResult<()> {
        self.write(|tx| delete_row(tx, Entity::Attendance, id))
    }

    pub fn list_attendance(&self) -> StoreResult<Vec<Attendance>> {
        self.read(|tx| {
            let mut stmt = tx.prepare(&select_sql("ORDER BY a.id"))?;
            let rows = stmt
                .query_map([], attendance_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn load_attendance(conn: &Connection, id: i64) -> StoreResult<Attendance> {
    conn.query_row(&select_sql("WHERE a.id = ?"), [id], attendance_from_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: Entity::Attendance,
            id,
        })
}
