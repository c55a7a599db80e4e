use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::utils::format::parse_iso_date;

/// Industry sector of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Technology,
    Healthcare,
    Finance,
    Energy,
    Manufacturing,
    Retail,
    Agriculture,
    Transportation,
    RealEstate,
    Utilities,
    Other,
    /// A code this client does not know about.
    #[serde(other)]
    Unrecognized,
}

impl Sector {
    /// Choices offered by the company form, in server order.
    pub const ALL: [Sector; 11] = [
        Sector::Technology,
        Sector::Healthcare,
        Sector::Finance,
        Sector::Energy,
        Sector::Manufacturing,
        Sector::Retail,
        Sector::Agriculture,
        Sector::Transportation,
        Sector::RealEstate,
        Sector::Utilities,
        Sector::Other,
    ];

    /// The wire code, as shown in tables.
    pub fn code(&self) -> &'static str {
        match self {
            Sector::Technology => "TECHNOLOGY",
            Sector::Healthcare => "HEALTHCARE",
            Sector::Finance => "FINANCE",
            Sector::Energy => "ENERGY",
            Sector::Manufacturing => "MANUFACTURING",
            Sector::Retail => "RETAIL",
            Sector::Agriculture => "AGRICULTURE",
            Sector::Transportation => "TRANSPORTATION",
            Sector::RealEstate => "REAL_ESTATE",
            Sector::Utilities => "UTILITIES",
            Sector::Other => "OTHER",
            Sector::Unrecognized => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::Finance => "Finance",
            Sector::Energy => "Energy",
            Sector::Manufacturing => "Manufacturing",
            Sector::Retail => "Retail",
            Sector::Agriculture => "Agriculture",
            Sector::Transportation => "Transportation",
            Sector::RealEstate => "Real Estate",
            Sector::Utilities => "Utilities",
            Sector::Other => "Other",
            Sector::Unrecognized => "Unknown",
        }
    }
}

/// An organization reporting ESG data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    pub sector: Sector,
    #[serde(default)]
    pub location: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub reporting_period_start: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub reporting_period_end: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Company {
    /// Parsed end of the reporting period, if the server sent a valid date.
    pub fn period_end_date(&self) -> Option<chrono::NaiveDate> {
        parse_iso_date(&self.reporting_period_end)
    }
}

/// Payload for `POST /companies/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCompany {
    pub name: String,
    pub sector: Sector,
    pub location: String,
    pub reporting_period_start: String,
    pub reporting_period_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Sortable columns of the companies table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySortColumn {
    Name,
    Sector,
    Location,
    Start,
    End,
}
