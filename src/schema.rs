//! Payload validation and the wire shapes of each entity.
//!
//! Inputs are checked field by field before any store call is made; all field
//! problems in a payload are reported together. Outputs are fixed-depth
//! projections: a class lists its students by id and name only, a student
//! embeds its class, an attendance row embeds its student.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{
    Attendance, AttendancePatch, Class, ClassPatch, NewAttendance, NewClass, NewStudent, Roster,
    Student, StudentPatch, StudentSummary,
};

pub const NOT_PROVIDED: &str = "Data not provided.";
/// Day/month/year, e.g. `25/12/2023`.
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "invalid payload ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<FieldError> for ValidationError {
    fn from(err: FieldError) -> Self {
        Self { errors: vec![err] }
    }
}

impl ValidationError {
    fn collect(errors: impl IntoIterator<Item = Option<FieldError>>) -> Self {
        Self {
            errors: errors.into_iter().flatten().collect(),
        }
    }

    pub fn body(message: impl Into<String>) -> Self {
        FieldError::new("body", message).into()
    }
}

pub type Payload = Map<String, Value>;

pub fn as_payload(body: &Value) -> Result<&Payload, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::body("request body must be a JSON object"))
}

fn text(field: &'static str, v: &Value) -> Result<String, FieldError> {
    let s = v
        .as_str()
        .ok_or_else(|| FieldError::new(field, "Not a valid string."))?
        .trim();
    if s.is_empty() {
        return Err(FieldError::new(field, NOT_PROVIDED));
    }
    Ok(s.to_string())
}

fn required_text(p: &Payload, field: &'static str) -> Result<String, FieldError> {
    match p.get(field) {
        Some(v) if !v.is_null() => text(field, v),
        _ => Err(FieldError::new(field, NOT_PROVIDED)),
    }
}

fn optional_text(p: &Payload, field: &'static str) -> Result<Option<String>, FieldError> {
    p.get(field).map(|v| text(field, v)).transpose()
}

fn id_ref(field: &'static str, v: &Value) -> Result<i64, FieldError> {
    v.as_i64()
        .ok_or_else(|| FieldError::new(field, "Not a valid integer id."))
}

fn required_id(p: &Payload, field: &'static str) -> Result<i64, FieldError> {
    match p.get(field) {
        Some(v) if !v.is_null() => id_ref(field, v),
        _ => Err(FieldError::new(field, NOT_PROVIDED)),
    }
}

fn optional_id(p: &Payload, field: &'static str) -> Result<Option<i64>, FieldError> {
    p.get(field).map(|v| id_ref(field, v)).transpose()
}

fn optional_bool(p: &Payload, field: &'static str) -> Result<Option<bool>, FieldError> {
    p.get(field)
        .map(|v| {
            v.as_bool()
                .ok_or_else(|| FieldError::new(field, "Not a valid boolean."))
        })
        .transpose()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(raw.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| FieldError::new("date", "Not a valid date, expected dd/mm/yyyy."))
}

fn required_date(p: &Payload, field: &'static str) -> Result<NaiveDate, FieldError> {
    match p.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => parse_date(s),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(FieldError::new(field, NOT_PROVIDED))
        }
        Some(_) => Err(FieldError::new(field, "Not a valid date, expected dd/mm/yyyy.")),
    }
}

// `id` is dump-only; any value supplied in a payload is ignored.

pub fn class_input(body: &Value) -> Result<NewClass, ValidationError> {
    let p = as_payload(body)?;
    Ok(NewClass {
        name: required_text(p, "name")?,
    })
}

pub fn class_patch(body: &Value) -> Result<ClassPatch, ValidationError> {
    let p = as_payload(body)?;
    Ok(ClassPatch {
        name: optional_text(p, "name")?,
    })
}

pub fn student_input(body: &Value) -> Result<NewStudent, ValidationError> {
    let p = as_payload(body)?;
    match (required_text(p, "name"), required_id(p, "in_class")) {
        (Ok(name), Ok(class_id)) => Ok(NewStudent { name, class_id }),
        (name, class_id) => Err(ValidationError::collect([name.err(), class_id.err()])),
    }
}

pub fn student_patch(body: &Value) -> Result<StudentPatch, ValidationError> {
    let p = as_payload(body)?;
    match (optional_text(p, "name"), optional_id(p, "in_class")) {
        (Ok(name), Ok(class_id)) => Ok(StudentPatch { name, class_id }),
        (name, class_id) => Err(ValidationError::collect([name.err(), class_id.err()])),
    }
}

pub fn attendance_input(body: &Value) -> Result<NewAttendance, ValidationError> {
    let p = as_payload(body)?;
    match (
        required_id(p, "student"),
        required_date(p, "date"),
        optional_bool(p, "present"),
    ) {
        (Ok(student_id), Ok(date), Ok(present)) => Ok(NewAttendance {
            student_id,
            date,
            present: present.unwrap_or(false),
        }),
        (student, date, present) => Err(ValidationError::collect([
            student.err(),
            date.err(),
            present.err(),
        ])),
    }
}

/// Only `present` can change once a day has been recorded.
pub fn attendance_patch(body: &Value) -> Result<AttendancePatch, ValidationError> {
    let p = as_payload(body)?;
    Ok(AttendancePatch {
        present: optional_bool(p, "present")?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassOut {
    pub id: i64,
    pub name: String,
    pub student: Vec<StudentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentOut {
    pub id: i64,
    pub name: String,
    pub in_class: ClassRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceOut {
    pub id: i64,
    pub present: bool,
    pub date: String,
    pub student: StudentOut,
}

impl From<&Class> for ClassRef {
    fn from(c: &Class) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

impl From<&StudentSummary> for StudentRef {
    fn from(s: &StudentSummary) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
        }
    }
}

impl From<&Roster> for ClassOut {
    fn from(r: &Roster) -> Self {
        Self {
            id: r.class.id,
            name: r.class.name.clone(),
            student: r.students.iter().map(StudentRef::from).collect(),
        }
    }
}

impl From<&Student> for StudentOut {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            in_class: ClassRef::from(&s.in_class),
        }
    }
}

impl From<&Attendance> for AttendanceOut {
    fn from(a: &Attendance) -> Self {
        Self {
            id: a.id,
            present: a.present,
            date: a.date.format(OUTPUT_DATE_FORMAT).to_string(),
            student: StudentOut::from(&a.student),
        }
    }
}

pub fn dump_many<'a, T, O>(items: &'a [T]) -> Vec<O>
where
    O: From<&'a T>,
{
    items.iter().map(O::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(err: &ValidationError) -> Vec<&'static str> {
        err.errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn blank_or_missing_names_are_not_provided() {
        for body in [json!({}), json!({"name": ""}), json!({"name": "   "}), json!({"name": null})] {
            let err = class_input(&body).expect_err("blank name");
            assert_eq!(err.errors, vec![FieldError::new("name", NOT_PROVIDED)]);
        }
        let ok = class_input(&json!({"name": "  Grade 1 ", "id": 55})).expect("valid");
        assert_eq!(ok.name, "Grade 1");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = class_input(&json!(["Grade 1"])).expect_err("array body");
        assert_eq!(fields(&err), vec!["body"]);
    }

    #[test]
    fn student_input_reports_every_bad_field() {
        let err = student_input(&json!({"in_class": "one"})).expect_err("two problems");
        assert_eq!(fields(&err), vec!["name", "in_class"]);

        let ok = student_input(&json!({"name": "Alice", "in_class": 1})).expect("valid");
        assert_eq!(
            ok,
            NewStudent {
                name: "Alice".into(),
                class_id: 1
            }
        );
    }

    #[test]
    fn patches_only_carry_supplied_fields() {
        let patch = student_patch(&json!({"name": "Alicia"})).expect("name only");
        assert_eq!(patch.name.as_deref(), Some("Alicia"));
        assert_eq!(patch.class_id, None);

        assert!(class_patch(&json!({})).expect("empty").is_empty());
        assert!(class_patch(&json!({"name": " "})).is_err());

        let patch = attendance_patch(&json!({"present": true, "date": "nope"})).expect("present");
        assert_eq!(patch.present, Some(true));
        assert!(attendance_patch(&json!({"present": "yes"})).is_err());
    }

    #[test]
    fn attendance_dates_are_day_month_year() {
        let new = attendance_input(&json!({"student": 1, "date": "25/12/2023"})).expect("valid");
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2023, 12, 25).expect("date"));
        assert!(!new.present);

        for bad in ["2023-12-25", "31/02/2023", "12/25/2023", "yesterday"] {
            let err = attendance_input(&json!({"student": 1, "date": bad})).expect_err(bad);
            assert_eq!(fields(&err), vec!["date"]);
        }
        let err = attendance_input(&json!({"present": 1})).expect_err("missing");
        assert_eq!(fields(&err), vec!["student", "date", "present"]);
    }

    #[test]
    fn projections_have_fixed_depth() {
        let class = Class {
            id: 1,
            name: "Grade 1".into(),
        };
        let student = Student {
            id: 1,
            name: "Alice".into(),
            in_class: class.clone(),
        };
        let roster = Roster {
            class,
            students: vec![StudentSummary {
                id: 1,
                name: "Alice".into(),
            }],
        };
        let row = Attendance {
            id: 3,
            present: true,
            date: NaiveDate::from_ymd_opt(2023, 9, 1).expect("date"),
            student: student.clone(),
        };

        assert_eq!(
            serde_json::to_value(ClassOut::from(&roster)).expect("class"),
            json!({"id": 1, "name": "Grade 1", "student": [{"id": 1, "name": "Alice"}]})
        );
        assert_eq!(
            serde_json::to_value(StudentOut::from(&student)).expect("student"),
            json!({"id": 1, "name": "Alice", "in_class": {"id": 1, "name": "Grade 1"}})
        );
        assert_eq!(
            serde_json::to_value(AttendanceOut::from(&row)).expect("attendance"),
            json!({
                "id": 3,
                "present": true,
                "date": "2023-09-01",
                "student": {"id": 1, "name": "Alice", "in_class": {"id": 1, "name": "Grade 1"}}
            })
        );
    }
}
