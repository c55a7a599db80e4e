use chrono::NaiveDate;

use super::{Field, Form, FormError};
use crate::models::{NewCompany, Sector};
use crate::utils::format::{format_iso_date, ISO_DATE_FORMAT};

/// Shortest accepted company name.
const MIN_NAME_LENGTH: usize = 2;

#[derive(Debug, Clone)]
pub struct CompanyForm {
    pub form: Form,
}

impl Default for CompanyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyForm {
    pub fn new() -> Self {
        let sectors = Sector::ALL.iter().map(|s| s.label().to_string()).collect();
        Self {
            form: Form::new(vec![
                Field::text("name", "Company Name").required("Please enter company name"),
                Field::choice("sector", "Sector", sectors).required("Please select sector"),
                Field::text("location", "Location").required("Please enter location"),
                Field::text("reporting_period_start", "Reporting Period Start")
                    .required("Please select start date")
                    .placeholder("YYYY-MM-DD"),
                Field::text("reporting_period_end", "Reporting Period End")
                    .required("Please select end date")
                    .placeholder("YYYY-MM-DD"),
                Field::text("description", "Description"),
            ]),
        }
    }

    pub fn build(&self) -> Result<NewCompany, FormError> {
        let form = &self.form;
        let name = form.required_text("name")?;
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(FormError::invalid(
                "name",
                "Company name must be at least 2 characters",
            ));
        }
        let sector = Sector::ALL[form.required_choice("sector")?];
        let location = form.required_text("location")?;
        let start = parse_date(form, "reporting_period_start")?;
        let end = parse_date(form, "reporting_period_end")?;
        if end <= start {
            return Err(FormError::invalid(
                "reporting_period_end",
                "Reporting period end date must be after start date",
            ));
        }

        Ok(NewCompany {
            name,
            sector,
            location,
            reporting_period_start: format_iso_date(start),
            reporting_period_end: format_iso_date(end),
            description: form.optional_text("description"),
        })
    }
}

fn parse_date(form: &Form, key: &'static str) -> Result<NaiveDate, FormError> {
    let raw = form.required_text(key)?;
    NaiveDate::parse_from_str(&raw, ISO_DATE_FORMAT)
        .map_err(|_| FormError::invalid(key, format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}
