use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub created_at: String,
}

/// Create/edit payload for a class.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}
