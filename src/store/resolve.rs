//! Cross-reference lookups used only for display.
//!
//! Collections are small, so lookups are a linear scan taking the first
//! record whose id matches.

use crate::models::{BusinessUnit, Company, EntityId};

/// Name of the company with `id`, or the raw id when unresolved.
pub fn company_name(companies: &[Company], id: EntityId) -> String {
    companies
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// `"<business unit name> (<company name>)"` for the unit with `id`.
///
/// The company part is empty when the owning company is unknown; the raw id
/// is returned when the business unit itself is unknown.
pub fn business_unit_label(units: &[BusinessUnit], companies: &[Company], id: EntityId) -> String {
    match units.iter().find(|u| u.id == id) {
        Some(unit) => {
            let company = companies
                .iter()
                .find(|c| c.id == unit.company)
                .map(|c| c.name.as_str())
                .unwrap_or("");
            format!("{} ({})", unit.name, company)
        }
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sector, UnitType};

    fn company(id: EntityId, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            sector: Sector::Energy,
            location: "Oslo".to_string(),
            reporting_period_start: "2024-01-01".to_string(),
            reporting_period_end: "2024-12-31".to_string(),
            description: None,
        }
    }

    fn unit(id: EntityId, company: EntityId, name: &str) -> BusinessUnit {
        BusinessUnit {
            id,
            company,
            name: name.to_string(),
            unit_type: UnitType::Branch,
            location: "Oslo".to_string(),
            is_active: true,
            description: None,
        }
    }

    #[test]
    fn test_company_name_resolves() {
        let companies = vec![company(1, "Acme"), company(2, "Globex")];
        assert_eq!(company_name(&companies, 2), "Globex");
    }

    #[test]
    fn test_company_name_falls_back_to_raw_id() {
        let companies = vec![company(1, "Acme")];
        assert_eq!(company_name(&companies, 99), "99");
        assert_eq!(company_name(&[], 5), "5");
    }

    #[test]
    fn test_business_unit_label() {
        let companies = vec![company(1, "Acme")];
        let units = vec![unit(10, 1, "Plant"), unit(11, 77, "Orphan")];
        assert_eq!(business_unit_label(&units, &companies, 10), "Plant (Acme)");
        assert_eq!(business_unit_label(&units, &companies, 11), "Orphan ()");
        assert_eq!(business_unit_label(&units, &companies, 12), "12");
    }
}
