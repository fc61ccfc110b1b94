use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearStatus {
    Active,
    Inactive,
}

impl YearStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            YearStatus::Active => "active",
            YearStatus::Inactive => "inactive",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(YearStatus::Active),
            "inactive" => Some(YearStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: i64,
    pub name: String,
    pub start_year: i32,
    pub end_year: i32,
    pub status: YearStatus,
    pub created_at: String,
}

impl AcademicYear {
    pub fn is_active(&self) -> bool {
        self.status == YearStatus::Active
    }
}

/// Which students a query covers. Resolved once per request or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearScope {
    All,
    Year(i64),
}

impl YearScope {
    pub fn year_id(&self) -> Option<i64> {
        match self {
            YearScope::All => None,
            YearScope::Year(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAcademicYear {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_year: i32,
    #[serde(default)]
    pub end_year: i32,
    #[serde(default)]
    pub status: Option<YearStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcademicYearUpdate {
    pub name: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub status: Option<YearStatus>,
}
