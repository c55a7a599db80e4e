/// The three collections exposed by the reporting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Companies,
    BusinessUnits,
    Metrics,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Companies, Resource::BusinessUnits, Resource::Metrics];

    /// URL path segment of the collection.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::BusinessUnits => "business-units",
            Resource::Metrics => "metrics",
        }
    }

    /// Singular entity name used in audit entries and notifications.
    pub fn entity_name(&self) -> &'static str {
        match self {
            Resource::Companies => "Company",
            Resource::BusinessUnits => "Business Unit",
            Resource::Metrics => "Metric",
        }
    }

    /// Lowercase plural used in error alerts, e.g. "Failed to fetch companies".
    pub fn plural_name(&self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::BusinessUnits => "business units",
            Resource::Metrics => "metrics",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Companies.path(), "companies");
        assert_eq!(Resource::BusinessUnits.path(), "business-units");
        assert_eq!(Resource::Metrics.path(), "metrics");
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(Resource::BusinessUnits.entity_name(), "Business Unit");
        assert_eq!(Resource::BusinessUnits.plural_name(), "business units");
    }
}
