use serde::{Deserialize, Serialize};

use super::EntityId;

/// Kind of organizational subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Department,
    Division,
    Subsidiary,
    Branch,
    Facility,
    Region,
    Other,
    #[serde(other)]
    Unrecognized,
}

impl UnitType {
    pub const ALL: [UnitType; 7] = [
        UnitType::Department,
        UnitType::Division,
        UnitType::Subsidiary,
        UnitType::Branch,
        UnitType::Facility,
        UnitType::Region,
        UnitType::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            UnitType::Department => "DEPARTMENT",
            UnitType::Division => "DIVISION",
            UnitType::Subsidiary => "SUBSIDIARY",
            UnitType::Branch => "BRANCH",
            UnitType::Facility => "FACILITY",
            UnitType::Region => "REGION",
            UnitType::Other => "OTHER",
            UnitType::Unrecognized => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitType::Department => "Department",
            UnitType::Division => "Division",
            UnitType::Subsidiary => "Subsidiary",
            UnitType::Branch => "Branch",
            UnitType::Facility => "Facility",
            UnitType::Region => "Region",
            UnitType::Other => "Other",
            UnitType::Unrecognized => "Unknown",
        }
    }
}

/// A subdivision of a company against which metrics are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessUnit {
    pub id: EntityId,
    /// Owning company id. Integrity is enforced by the server.
    pub company: EntityId,
    pub name: String,
    pub unit_type: UnitType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl BusinessUnit {
    pub fn active_display(&self) -> &'static str {
        if self.is_active {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Payload for `POST /business-units/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBusinessUnit {
    pub company: EntityId,
    pub name: String,
    pub unit_type: UnitType,
    pub location: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessUnitSortColumn {
    Company,
    Name,
    Type,
    Location,
    Active,
}
