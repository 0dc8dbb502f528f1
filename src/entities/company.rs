// 🏢 Company Entity - a tenant of a business center
//
// KT clients carry the list of subscribed telecom services and an accruals
// (revenue) figure. Absent accruals count as zero in every aggregate.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

// ============================================================================
// COMPANY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub organization_name: String,

    /// Business identification number, opaque
    pub bin: String,

    pub address: String,

    pub is_kt_client: bool,

    /// Non-negative revenue figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accruals: Option<f64>,

    /// Subscribed services; always empty for non-clients
    #[serde(default)]
    pub services: Vec<String>,
}

impl Company {
    /// Create a non-client company without accruals
    pub fn new(organization_name: &str, bin: &str, address: &str) -> Self {
        Company {
            organization_name: organization_name.to_string(),
            bin: bin.to_string(),
            address: address.to_string(),
            is_kt_client: false,
            accruals: None,
            services: Vec::new(),
        }
    }

    /// Mark as KT client with the given services
    pub fn kt_client(mut self, services: Vec<String>) -> Self {
        self.is_kt_client = true;
        self.services = services;
        self
    }

    pub fn with_accruals(mut self, accruals: f64) -> Self {
        self.accruals = Some(accruals);
        self
    }

    /// Accruals with the missing-means-zero rule applied
    pub fn revenue(&self) -> f64 {
        self.accruals.unwrap_or(0.0)
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

// ============================================================================
// RAW COMPANY (as read from the dataset)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCompany {
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_kt_client: Option<bool>,
    #[serde(default)]
    pub accruals: Option<f64>,
    #[serde(default)]
    pub services: Option<Vec<String>>,
}

impl RawCompany {
    /// Validate into a `Company`.
    ///
    /// `record` labels the owning center and `index` the company position, so
    /// errors read like `[Talan Towers] companies[3].accruals: ...`.
    pub fn validate(self, record: &str, index: usize) -> Result<Company, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let field = |name: &str| format!("companies[{}].{}", index, name);

        let organization_name = match self.organization_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                errors.push(ValidationError::missing(record, &field("organization_name")));
                String::new()
            }
        };

        if let Some(accruals) = self.accruals {
            if !accruals.is_finite() {
                errors.push(ValidationError::new(
                    record,
                    &field("accruals"),
                    "Must be a finite number",
                ));
            } else if accruals < 0.0 {
                errors.push(ValidationError::new(
                    record,
                    &field("accruals"),
                    &format!("Must be non-negative, got {}", accruals),
                ));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let is_kt_client = self.is_kt_client.unwrap_or(false);
        let services = if is_kt_client {
            self.services.unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Company {
            organization_name,
            bin: self.bin.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            is_kt_client,
            accruals: self.accruals,
            services,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawCompany {
        RawCompany {
            organization_name: Some(name.to_string()),
            bin: Some("123456789012".to_string()),
            address: Some("пр. Мангилик Ел, 55".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_company_revenue_defaults_to_zero() {
        let company = Company::new("ТОО Астана Софт", "1", "addr");
        assert_eq!(company.revenue(), 0.0);
        assert_eq!(company.with_accruals(1500.0).revenue(), 1500.0);
    }

    #[test]
    fn test_kt_client_builder() {
        let company = Company::new("ТОО Степь", "2", "addr")
            .kt_client(vec!["Internet".to_string(), "IP-TV".to_string()]);

        assert!(company.is_kt_client);
        assert_eq!(company.service_count(), 2);
    }

    #[test]
    fn test_validate_fills_optional_defaults() {
        let company = RawCompany {
            organization_name: Some("ТОО Пример".to_string()),
            ..Default::default()
        }
        .validate("BC", 0)
        .unwrap();

        assert_eq!(company.bin, "");
        assert_eq!(company.address, "");
        assert!(!company.is_kt_client);
        assert_eq!(company.accruals, None);
        assert!(company.services.is_empty());
    }

    #[test]
    fn test_validate_missing_name() {
        let errors = RawCompany::default().validate("Talan Towers", 3).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].record, "Talan Towers");
        assert_eq!(errors[0].field, "companies[3].organization_name");
    }

    #[test]
    fn test_validate_rejects_negative_accruals() {
        let mut company = raw("ТОО Минус");
        company.accruals = Some(-10.0);

        let errors = company.validate("BC", 1).unwrap_err();
        assert_eq!(errors[0].field, "companies[1].accruals");
    }

    #[test]
    fn test_validate_rejects_non_finite_accruals() {
        let mut company = raw("ТОО NaN");
        company.accruals = Some(f64::NAN);

        assert!(company.validate("BC", 0).is_err());
    }

    #[test]
    fn test_services_dropped_for_non_clients() {
        let mut company = raw("ТОО Не клиент");
        company.is_kt_client = Some(false);
        company.services = Some(vec!["Internet".to_string()]);

        let company = company.validate("BC", 0).unwrap();
        assert!(company.services.is_empty());
    }

    #[test]
    fn test_services_kept_for_clients() {
        let mut company = raw("ТОО Клиент");
        company.is_kt_client = Some(true);
        company.accruals = Some(250000.0);
        company.services = Some(vec!["Internet".to_string()]);

        let company = company.validate("BC", 0).unwrap();
        assert!(company.is_kt_client);
        assert_eq!(company.services, vec!["Internet".to_string()]);
        assert_eq!(company.revenue(), 250000.0);
    }
}
