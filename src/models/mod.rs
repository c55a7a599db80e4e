//! Data models for ESG reporting entities.
//!
//! This module contains the records exchanged with the reporting API:
//!
//! - `Company`: a reporting organization and its reporting period
//! - `BusinessUnit`: a subdivision of a company
//! - `Metric`: a single ESG data point recorded against a business unit
//!
//! Each record has a matching `New*` payload type used when creating it.
//! Choice fields are modelled as enums that serialize to the server's
//! upper-case codes.

pub mod business_unit;
pub mod company;
pub mod metric;

pub use business_unit::{BusinessUnit, BusinessUnitSortColumn, NewBusinessUnit, UnitType};
pub use company::{Company, CompanySortColumn, NewCompany, Sector};
pub use metric::{EsgCategory, MeasurementUnit, Metric, MetricSortColumn, NewMetric};

/// Identifier assigned by the reporting API.
pub type EntityId = i64;

/// A record ready to be submitted to the API.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum NewRecord {
    Company(NewCompany),
    BusinessUnit(NewBusinessUnit),
    Metric(NewMetric),
}

impl NewRecord {
    pub fn resource(&self) -> crate::api::Resource {
        use crate::api::Resource;
        match self {
            NewRecord::Company(_) => Resource::Companies,
            NewRecord::BusinessUnit(_) => Resource::BusinessUnits,
            NewRecord::Metric(_) => Resource::Metrics,
        }
    }

    /// Display name recorded in the audit trail.
    pub fn name(&self) -> &str {
        match self {
            NewRecord::Company(c) => &c.name,
            NewRecord::BusinessUnit(b) => &b.name,
            NewRecord::Metric(m) => &m.name,
        }
    }
}
