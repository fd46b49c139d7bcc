use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension};

use super::{delete_row, ensure_exists, Entity, Store, StoreError, StoreResult};
use crate::model::{Class, ClassPatch, NewClass, Roster, StudentSummary};

impl Store {
    pub fn create_class(&self, new: &NewClass) -> StoreResult<Roster> {
        self.write(|tx| {
            tx.execute("INSERT INTO classes(name) VALUES(?)", [&new.name])?;
            load_roster(tx, tx.last_insert_rowid())
        })
    }

    pub fn get_class(&self, id: i64) -> StoreResult<Roster> {
        self.read(|tx| load_roster(tx, id))
    }

    pub fn update_class(&self, id: i64, patch: &ClassPatch) -> StoreResult<Roster> {
        self.write(|tx| {
            ensure_exists(tx, Entity::Class, id)?;
            if let Some(name) = &patch.name {
                tx.execute("UPDATE classes SET name = ? WHERE id = ?", (name, id))?;
            }
            load_roster(tx, id)
        })
    }

    /// Removes the class; its students and their attendance go with it.
    pub fn delete_class(&self, id: i64) -> StoreResult<()> {
        self.write(|tx| delete_row(tx, Entity::Class, id))
    }

    pub fn list_classes(&self) -> StoreResult<Vec<Roster>> {
        self.read(|tx| {
            let mut by_class: HashMap<i64, Vec<StudentSummary>> = HashMap::new();
            let mut stmt = tx.prepare("SELECT id, name, class_id FROM students ORDER BY id")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(2)?,
                    StudentSummary {
                        id: r.get(0)?,
                        name: r.get(1)?,
                    },
                ))
            })?;
            for row in rows {
                let (class_id, summary) = row?;
                by_class.entry(class_id).or_default().push(summary);
            }

            let mut stmt = tx.prepare("SELECT id, name FROM classes ORDER BY id")?;
            let classes = stmt
                .query_map([], |r| {
                    Ok(Class {
                        id: r.get(0)?,
                        name: r.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(classes
                .into_iter()
                .map(|class| Roster {
                    students: by_class.remove(&class.id).unwrap_or_default(),
                    class,
                })
                .collect())
        })
    }
}

fn load_roster(conn: &Connection, id: i64) -> StoreResult<Roster> {
    let class = conn
        .query_row("SELECT id, name FROM classes WHERE id = ?", [id], |r| {
            Ok(Class {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: Entity::Class,
            id,
        })?;

    let mut stmt = conn.prepare("SELECT id, name FROM students WHERE class_id = ? ORDER BY id")?;
    let students = stmt
        .query_map([id], |r| {
            Ok(StudentSummary {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Roster { class, students })
}
