//! Entity values as loaded from the store.
//!
//! Reads come back already joined to the depth the API projects: a class with
//! its roster, a student with its class, an attendance row with its student.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: i64,
    pub name: String,
}

/// A class together with the students currently assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub class: Class,
    pub students: Vec<StudentSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub in_class: Class,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub id: i64,
    pub present: bool,
    pub date: NaiveDate,
    pub student: Student,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub class_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub student_id: i64,
    pub date: NaiveDate,
    pub present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendancePatch {
    pub present: Option<bool>,
}

impl ClassPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.class_id.is_none()
    }
}

impl AttendancePatch {
    pub fn is_empty(&self) -> bool {
        self.present.is_none()
    }
}
