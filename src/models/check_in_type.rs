use serde::{Deserialize, Serialize};

/// Kind of a check-in event. A person has at most one of each per day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckInType {
    Arrival,
    Departure,
}

impl CheckInType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CheckInType::Arrival => "arrival",
            CheckInType::Departure => "departure",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "arrival" => Some(CheckInType::Arrival),
            "departure" => Some(CheckInType::Departure),
            _ => None,
        }
    }

    /// Human label used by CLI tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            CheckInType::Arrival => "Arrival",
            CheckInType::Departure => "Departure",
        }
    }

    pub fn is_arrival(&self) -> bool {
        matches!(self, CheckInType::Arrival)
    }

    pub fn is_departure(&self) -> bool {
        matches!(self, CheckInType::Departure)
    }
}
