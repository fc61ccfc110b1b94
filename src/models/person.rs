use super::person_kind::PersonKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    /// External code, also the QR payload.
    pub student_id: String,
    pub name: String,
    pub class: String,
    pub parent_phone: String,
    pub photo: Option<String>,
    pub academic_year_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    /// External code, also the QR payload.
    pub teacher_id: String,
    pub name: String,
    pub id_card_number: String,
    pub phone: String,
    pub sex: String,
    pub photo: Option<String>,
    pub created_at: String,
}

/// A resolved scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Person {
    Student(Student),
    Teacher(Teacher),
}

impl Person {
    pub fn kind(&self) -> PersonKind {
        match self {
            Person::Student(_) => PersonKind::Student,
            Person::Teacher(_) => PersonKind::Teacher,
        }
    }

    /// Internal row id (unique only within its kind).
    pub fn id(&self) -> i64 {
        match self {
            Person::Student(s) => s.id,
            Person::Teacher(t) => t.id,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Person::Student(s) => &s.student_id,
            Person::Teacher(t) => &t.teacher_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Person::Student(s) => &s.name,
            Person::Teacher(t) => &t.name,
        }
    }

    /// Class label; teachers have none.
    pub fn class(&self) -> Option<&str> {
        match self {
            Person::Student(s) => Some(&s.class),
            Person::Teacher(_) => None,
        }
    }
}

/// Registration payload for a student. The code is generated, never supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub parent_phone: String,
    #[serde(default)]
    pub photo: Option<String>,
    /// Defaults to the active year when absent.
    #[serde(default)]
    pub academic_year_id: Option<i64>,
}

/// Partial edit of a student; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub class: Option<String>,
    pub parent_phone: Option<String>,
    pub photo: Option<String>,
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTeacher {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id_card_number: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherUpdate {
    pub name: Option<String>,
    pub id_card_number: Option<String>,
    pub phone: Option<String>,
    pub sex: Option<String>,
    pub photo: Option<String>,
}
