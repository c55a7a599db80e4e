use serde::{Deserialize, Deserializer, Serialize};

use super::EntityId;

/// ESG pillar a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EsgCategory {
    Environmental,
    Social,
    Governance,
    #[serde(other)]
    Unrecognized,
}

impl EsgCategory {
    pub const ALL: [EsgCategory; 3] = [
        EsgCategory::Environmental,
        EsgCategory::Social,
        EsgCategory::Governance,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EsgCategory::Environmental => "ENVIRONMENTAL",
            EsgCategory::Social => "SOCIAL",
            EsgCategory::Governance => "GOVERNANCE",
            EsgCategory::Unrecognized => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EsgCategory::Environmental => "Environmental",
            EsgCategory::Social => "Social",
            EsgCategory::Governance => "Governance",
            EsgCategory::Unrecognized => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementUnit {
    Kwh,
    Tonnes,
    Liters,
    Hours,
    Percentage,
    Count,
    Ratio,
    Currency,
    Other,
    #[serde(other)]
    Unrecognized,
}

impl MeasurementUnit {
    pub const ALL: [MeasurementUnit; 9] = [
        MeasurementUnit::Kwh,
        MeasurementUnit::Tonnes,
        MeasurementUnit::Liters,
        MeasurementUnit::Hours,
        MeasurementUnit::Percentage,
        MeasurementUnit::Count,
        MeasurementUnit::Ratio,
        MeasurementUnit::Currency,
        MeasurementUnit::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MeasurementUnit::Kwh => "KWH",
            MeasurementUnit::Tonnes => "TONNES",
            MeasurementUnit::Liters => "LITERS",
            MeasurementUnit::Hours => "HOURS",
            MeasurementUnit::Percentage => "PERCENTAGE",
            MeasurementUnit::Count => "COUNT",
            MeasurementUnit::Ratio => "RATIO",
            MeasurementUnit::Currency => "CURRENCY",
            MeasurementUnit::Other => "OTHER",
            MeasurementUnit::Unrecognized => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementUnit::Kwh => "Kilowatt Hours",
            MeasurementUnit::Tonnes => "Tonnes",
            MeasurementUnit::Liters => "Liters",
            MeasurementUnit::Hours => "Hours",
            MeasurementUnit::Percentage => "Percentage",
            MeasurementUnit::Count => "Count",
            MeasurementUnit::Ratio => "Ratio",
            MeasurementUnit::Currency => "Currency",
            MeasurementUnit::Other => "Other",
            MeasurementUnit::Unrecognized => "Unknown",
        }
    }
}

/// A single measured ESG data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: EntityId,
    /// Owning business unit id.
    pub business_unit: EntityId,
    pub name: String,
    pub esg_category: EsgCategory,
    #[serde(default)]
    pub metric_type: String,
    pub unit_of_measurement: MeasurementUnit,
    // Decimal fields arrive as strings ("12.5000") from the default serializer
    #[serde(deserialize_with = "deserialize_decimal")]
    pub value: f64,
    pub reporting_year: i32,
    #[serde(default = "default_reporting_period")]
    pub reporting_period: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
}

impl Metric {
    pub fn verified_display(&self) -> &'static str {
        if self.is_verified {
            "Yes"
        } else {
            "No"
        }
    }

    /// Value without trailing zeros, e.g. `12.5` rather than `12.5000`.
    pub fn value_display(&self) -> String {
        let formatted = format!("{:.4}", self.value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Payload for `POST /metrics/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMetric {
    pub business_unit: EntityId,
    pub name: String,
    pub esg_category: EsgCategory,
    pub metric_type: String,
    pub unit_of_measurement: MeasurementUnit,
    pub value: f64,
    pub reporting_year: i32,
    pub reporting_period: String,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSortColumn {
    BusinessUnit,
    Name,
    Category,
    Value,
    Unit,
    Year,
    Verified,
}

pub const DEFAULT_REPORTING_PERIOD: &str = "ANNUAL";

fn default_reporting_period() -> String {
    DEFAULT_REPORTING_PERIOD.to_string()
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(n),
        Decimal::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal {:?}: {}", s, e))),
    }
}
