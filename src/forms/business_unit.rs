use super::{Field, Form, FormError};
use crate::models::{Company, EntityId, NewBusinessUnit, UnitType};

#[derive(Debug, Clone)]
pub struct BusinessUnitForm {
    pub form: Form,
    /// Ids behind the company choices, in option order.
    company_ids: Vec<EntityId>,
}

impl BusinessUnitForm {
    pub fn new(companies: &[Company]) -> Self {
        let unit_types = UnitType::ALL.iter().map(|t| t.label().to_string()).collect();
        let mut this = Self {
            form: Form::new(vec![
                Field::choice("company", "Company", Vec::new()).required("Select company"),
                Field::text("name", "Business Unit Name").required("Enter business unit name"),
                Field::choice("unit_type", "Unit Type", unit_types).required("Select unit type"),
                Field::text("location", "Location").required("Enter location"),
                Field::text("description", "Description"),
                Field::toggle("is_active", "Active", true),
            ]),
            company_ids: Vec::new(),
        };
        this.set_companies(companies);
        this
    }

    /// Refresh the company choices from the latest store contents, keeping
    /// the current pick when it still exists.
    pub fn set_companies(&mut self, companies: &[Company]) {
        let previous = self
            .form
            .selected("company")
            .and_then(|i| self.company_ids.get(i).copied());
        self.company_ids = companies.iter().map(|c| c.id).collect();
        self.form
            .set_options("company", companies.iter().map(|c| c.name.clone()).collect());
        match previous.and_then(|id| self.company_ids.iter().position(|&c| c == id)) {
            Some(index) => self.form.select("company", index),
            None => self.form.clear_choice("company"),
        }
    }

    pub fn build(&self) -> Result<NewBusinessUnit, FormError> {
        let form = &self.form;
        let company = self
            .company_ids
            .get(form.required_choice("company")?)
            .copied()
            .ok_or(FormError::Missing {
                field: "company",
                message: "Select company",
            })?;
        let name = form.required_text("name")?;
        let unit_type = UnitType::ALL[form.required_choice("unit_type")?];
        let location = form.required_text("location")?;

        Ok(NewBusinessUnit {
            company,
            name,
            unit_type,
            location,
            is_active: form.toggled("is_active"),
            description: form.optional_text("description"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sector;

    fn company(id: EntityId, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            sector: Sector::ALL[0],
            location: "Oslo".to_string(),
            reporting_period_start: "2024-01-01".to_string(),
            reporting_period_end: "2024-12-31".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_builds_payload_with_company_id() {
        let companies = vec![company(4, "Acme"), company(9, "Globex")];
        let mut f = BusinessUnitForm::new(&companies);
        f.form.select("company", 1);
        f.form.set_text("name", "Plant North");
        f.form.select("unit_type", 0);
        f.form.set_text("location", "Bergen");

        let payload = f.build().unwrap();
        assert_eq!(payload.company, 9);
        assert_eq!(payload.unit_type, UnitType::ALL[0]);
        assert!(payload.is_active);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn test_required_messages() {
        let mut f = BusinessUnitForm::new(&[company(1, "Acme")]);
        assert_eq!(f.build().unwrap_err().to_string(), "Select company");
        f.form.select("company", 0);
        assert_eq!(f.build().unwrap_err().to_string(), "Enter business unit name");
        f.form.set_text("name", "Plant");
        assert_eq!(f.build().unwrap_err().to_string(), "Select unit type");
        f.form.select("unit_type", 1);
        assert_eq!(f.build().unwrap_err().to_string(), "Enter location");
    }

    #[test]
    fn test_inactive_toggle() {
        let mut f = BusinessUnitForm::new(&[company(1, "Acme")]);
        f.form.select("company", 0);
        f.form.set_text("name", "Plant");
        f.form.select("unit_type", 1);
        f.form.set_text("location", "Bergen");
        f.form.focus_key("is_active");
        f.form.toggle_focused();
        assert!(!f.build().unwrap().is_active);
    }

    #[test]
    fn test_set_companies_keeps_selection_by_id() {
        let mut f = BusinessUnitForm::new(&[company(1, "Acme"), company(2, "Globex")]);
        f.form.select("company", 1);
        f.set_companies(&[company(0, "Initech"), company(1, "Acme"), company(2, "Globex")]);
        assert_eq!(f.form.selected("company"), Some(2));

        f.set_companies(&[company(1, "Acme")]);
        assert_eq!(f.form.selected("company"), None);
    }
}
