use chrono::{Datelike, Local};

use super::{Field, Form, FormError};
use crate::models::metric::DEFAULT_REPORTING_PERIOD;
use crate::models::{BusinessUnit, Company, EntityId, EsgCategory, MeasurementUnit, NewMetric};
use crate::store::resolve::business_unit_label;

/// Accepted reporting years, matching the year picker bounds.
const MIN_REPORTING_YEAR: i32 = 2000;
const MAX_REPORTING_YEAR: i32 = 2100;

#[derive(Debug, Clone)]
pub struct MetricForm {
    pub form: Form,
    /// Ids behind the business unit choices, in option order.
    unit_ids: Vec<EntityId>,
}

impl MetricForm {
    pub fn new(units: &[BusinessUnit], companies: &[Company]) -> Self {
        let categories = EsgCategory::ALL.iter().map(|c| c.label().to_string()).collect();
        let measures = MeasurementUnit::ALL
            .iter()
            .map(|u| u.label().to_string())
            .collect();
        let mut this = Self {
            form: Form::new(vec![
                Field::choice("business_unit", "Business Unit", Vec::new())
                    .required("Select business unit"),
                Field::text("name", "Metric Name").required("Enter metric name"),
                Field::choice("esg_category", "ESG Category", categories)
                    .required("Select ESG category"),
                Field::text("metric_type", "Metric Type").required("Enter metric type"),
                Field::choice("unit_of_measurement", "Unit", measures).required("Select unit"),
                Field::text("value", "Value").required("Enter value"),
                Field::text("reporting_year", "Reporting Year")
                    .required("Enter reporting year")
                    .placeholder("YYYY"),
                Field::text("reporting_period", "Reporting Period")
                    .with_text(DEFAULT_REPORTING_PERIOD),
                Field::text("description", "Description"),
                Field::text("data_source", "Data Source"),
                Field::toggle("is_verified", "Verified", false),
            ]),
            unit_ids: Vec::new(),
        };
        this.set_business_units(units, companies);
        this
    }

    /// Refresh the business unit choices, labelled with their company.
    pub fn set_business_units(&mut self, units: &[BusinessUnit], companies: &[Company]) {
        let previous = self
            .form
            .selected("business_unit")
            .and_then(|i| self.unit_ids.get(i).copied());
        self.unit_ids = units.iter().map(|u| u.id).collect();
        let labels = units
            .iter()
            .map(|u| business_unit_label(units, companies, u.id))
            .collect();
        self.form.set_options("business_unit", labels);
        match previous.and_then(|id| self.unit_ids.iter().position(|&u| u == id)) {
            Some(index) => self.form.select("business_unit", index),
            None => self.form.clear_choice("business_unit"),
        }
    }

    pub fn build(&self) -> Result<NewMetric, FormError> {
        self.build_for_year(Local::now().year())
    }

    /// Build the payload, rejecting reporting years after `current_year`.
    pub fn build_for_year(&self, current_year: i32) -> Result<NewMetric, FormError> {
        let form = &self.form;
        let business_unit = self
            .unit_ids
            .get(form.required_choice("business_unit")?)
            .copied()
            .ok_or(FormError::Missing {
                field: "business_unit",
                message: "Select business unit",
            })?;
        let name = form.required_text("name")?;
        let esg_category = EsgCategory::ALL[form.required_choice("esg_category")?];
        let metric_type = form.required_text("metric_type")?;
        let unit_of_measurement =
            MeasurementUnit::ALL[form.required_choice("unit_of_measurement")?];
        let value = parse_value(&form.required_text("value")?)?;
        let reporting_year = parse_year(&form.required_text("reporting_year")?, current_year)?;

        Ok(NewMetric {
            business_unit,
            name,
            esg_category,
            metric_type,
            unit_of_measurement,
            value,
            reporting_year,
            reporting_period: form
                .optional_text("reporting_period")
                .unwrap_or_else(|| DEFAULT_REPORTING_PERIOD.to_string()),
            is_verified: form.toggled("is_verified"),
            description: form.optional_text("description"),
            data_source: form.optional_text("data_source"),
        })
    }
}

fn parse_value(raw: &str) -> Result<f64, FormError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| FormError::invalid("value", format!("'{}' is not a number", raw)))?;
    if !value.is_finite() {
        return Err(FormError::invalid("value", format!("'{}' is not a number", raw)));
    }
    if value < 0.0 {
        return Err(FormError::invalid("value", "Value cannot be negative"));
    }
    Ok(value)
}

fn parse_year(raw: &str, current_year: i32) -> Result<i32, FormError> {
    let year: i32 = raw
        .parse()
        .map_err(|_| FormError::invalid("reporting_year", format!("'{}' is not a year", raw)))?;
    if !(MIN_REPORTING_YEAR..=MAX_REPORTING_YEAR).contains(&year) {
        return Err(FormError::invalid(
            "reporting_year",
            format!(
                "Reporting year must be between {} and {}",
                MIN_REPORTING_YEAR, MAX_REPORTING_YEAR
            ),
        ));
    }
    if year > current_year {
        return Err(FormError::invalid(
            "reporting_year",
            "Reporting year cannot be in the future",
        ));
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sector, UnitType};

    fn fixtures() -> (Vec<BusinessUnit>, Vec<Company>) {
        let companies = vec![Company {
            id: 1,
            name: "Acme".to_string(),
            sector: Sector::ALL[0],
            location: "Oslo".to_string(),
            reporting_period_start: "2024-01-01".to_string(),
            reporting_period_end: "2024-12-31".to_string(),
            description: None,
        }];
        let units = vec![BusinessUnit {
            id: 7,
            company: 1,
            name: "Plant".to_string(),
            unit_type: UnitType::ALL[0],
            location: "Bergen".to_string(),
            is_active: true,
            description: None,
        }];
        (units, companies)
    }

    fn filled() -> MetricForm {
        let (units, companies) = fixtures();
        let mut f = MetricForm::new(&units, &companies);
        f.form.select("business_unit", 0);
        f.form.set_text("name", "Scope 1 emissions");
        f.form.select("esg_category", 0);
        f.form.set_text("metric_type", "Emissions");
        f.form.select("unit_of_measurement", 0);
        f.form.set_text("value", "12.5");
        f.form.set_text("reporting_year", "2024");
        f
    }

    #[test]
    fn test_business_unit_options_are_labelled_with_company() {
        let f = filled();
        assert_eq!(f.form.fields[0].display_value(), "Plant (Acme)");
    }

    #[test]
    fn test_builds_payload_with_defaults() {
        let payload = filled().build_for_year(2025).unwrap();
        assert_eq!(payload.business_unit, 7);
        assert_eq!(payload.value, 12.5);
        assert_eq!(payload.reporting_year, 2024);
        assert_eq!(payload.reporting_period, "ANNUAL");
        assert!(!payload.is_verified);
        assert_eq!(payload.data_source, None);
    }

    #[test]
    fn test_blank_period_falls_back_to_annual() {
        let mut f = filled();
        f.form.set_text("reporting_period", "  ");
        assert_eq!(f.build_for_year(2025).unwrap().reporting_period, "ANNUAL");
    }

    #[test]
    fn test_required_messages() {
        let (units, companies) = fixtures();
        let mut f = MetricForm::new(&units, &companies);
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Select business unit");
        f.form.select("business_unit", 0);
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Enter metric name");
        f.form.set_text("name", "Water");
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Select ESG category");
        f.form.select("esg_category", 0);
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Enter metric type");
        f.form.set_text("metric_type", "Usage");
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Select unit");
        f.form.select("unit_of_measurement", 0);
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Enter value");
        f.form.set_text("value", "3");
        assert_eq!(f.build_for_year(2025).unwrap_err().to_string(), "Enter reporting year");
    }

    #[test]
    fn test_value_rules() {
        let mut f = filled();
        f.form.set_text("value", "abc");
        assert_eq!(f.build_for_year(2025).unwrap_err().field(), "value");
        f.form.set_text("value", "-1");
        assert_eq!(
            f.build_for_year(2025).unwrap_err().to_string(),
            "Value cannot be negative"
        );
        f.form.set_text("value", "0");
        assert_eq!(f.build_for_year(2025).unwrap().value, 0.0);
    }

    #[test]
    fn test_year_rules() {
        let mut f = filled();
        f.form.set_text("reporting_year", "1999");
        assert_eq!(f.build_for_year(2025).unwrap_err().field(), "reporting_year");
        f.form.set_text("reporting_year", "2026");
        assert_eq!(
            f.build_for_year(2025).unwrap_err().to_string(),
            "Reporting year cannot be in the future"
        );
        f.form.set_text("reporting_year", "2025");
        assert_eq!(f.build_for_year(2025).unwrap().reporting_year, 2025);
    }
}
