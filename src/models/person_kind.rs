use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Student,
    Teacher,
}

impl PersonKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PersonKind::Student => "student",
            PersonKind::Teacher => "teacher",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(PersonKind::Student),
            "teacher" => Some(PersonKind::Teacher),
            _ => None,
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, PersonKind::Student)
    }
}
