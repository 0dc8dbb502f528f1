// 🏙️ Business Center Entity - a geolocated building and its tenants
//
// A center owns its companies exclusively. Company order is display order
// only; no aggregate depends on it except as a tie-breaker.

use super::company::{Company, RawCompany};
use super::validation::ValidationError;
use crate::geo::LatLng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// BUSINESS CENTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessCenter {
    /// Stable record key derived from name and position
    pub key: String,
    pub business_center_name: String,
    pub district: String,
    pub building_purpose: String,
    pub latitude: f64,
    pub longitude: f64,
    pub companies: Vec<Company>,
}

impl BusinessCenter {
    pub fn new(
        business_center_name: &str,
        district: &str,
        building_purpose: &str,
        latitude: f64,
        longitude: f64,
        companies: Vec<Company>,
    ) -> Self {
        BusinessCenter {
            key: compute_key(business_center_name, latitude, longitude),
            business_center_name: business_center_name.to_string(),
            district: district.to_string(),
            building_purpose: building_purpose.to_string(),
            latitude,
            longitude,
            companies,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    pub fn kt_client_count(&self) -> usize {
        self.companies.iter().filter(|c| c.is_kt_client).count()
    }

    /// Sum of accruals, missing accruals counted as zero
    pub fn total_revenue(&self) -> f64 {
        self.companies.iter().map(Company::revenue).sum()
    }

    /// True iff at least one company is a KT client.
    /// A center without companies has none.
    pub fn has_kt_clients(&self) -> bool {
        self.companies.iter().any(|c| c.is_kt_client)
    }
}

/// Stable key: first 16 hex chars of SHA-256 over `name|lat|lng`.
pub fn compute_key(name: &str, latitude: f64, longitude: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}", name, latitude, longitude));
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

// ============================================================================
// RAW BUSINESS CENTER (as read from the dataset)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBusinessCenter {
    #[serde(default)]
    pub business_center_name: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub building_purpose: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub companies: Option<Vec<RawCompany>>,
}

impl RawBusinessCenter {
    /// Validate into a `BusinessCenter`, collecting every error found.
    ///
    /// `position` is the index in the source array and labels records whose
    /// name is missing.
    pub fn validate(self, position: usize) -> Result<BusinessCenter, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let name = non_empty(self.business_center_name);
        let record = name
            .clone()
            .unwrap_or_else(|| format!("#{}", position));

        if name.is_none() {
            errors.push(ValidationError::missing(&record, "business_center_name"));
        }

        let district = non_empty(self.district);
        if district.is_none() {
            errors.push(ValidationError::missing(&record, "district"));
        }

        let building_purpose = non_empty(self.building_purpose);
        if building_purpose.is_none() {
            errors.push(ValidationError::missing(&record, "building_purpose"));
        }

        let latitude = check_coordinate(&record, "latitude", self.latitude, 90.0, &mut errors);
        let longitude = check_coordinate(&record, "longitude", self.longitude, 180.0, &mut errors);

        let raw_companies = self.companies.unwrap_or_default();
        let mut companies = Vec::with_capacity(raw_companies.len());
        for (index, raw) in raw_companies.into_iter().enumerate() {
            match raw.validate(&record, index) {
                Ok(company) => companies.push(company),
                Err(company_errors) => errors.extend(company_errors),
            }
        }

        match (name, district, building_purpose, latitude, longitude) {
            (Some(name), Some(district), Some(purpose), Some(lat), Some(lng)) if errors.is_empty() => {
                Ok(BusinessCenter::new(&name, &district, &purpose, lat, lng, companies))
            }
            _ => Err(errors),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_coordinate(
    record: &str,
    field: &str,
    value: Option<f64>,
    limit: f64,
    errors: &mut Vec<ValidationError>,
) -> Option<f64> {
    match value {
        None => {
            errors.push(ValidationError::missing(record, field));
            None
        }
        Some(v) if !v.is_finite() => {
            errors.push(ValidationError::new(record, field, "Must be a finite number"));
            None
        }
        Some(v) if v.abs() > limit => {
            errors.push(ValidationError::new(
                record,
                field,
                &format!("Must be within ±{}, got {}", limit, v),
            ));
            None
        }
        Some(v) => Some(v),
    }
}

// ============================================================================
// TESTS
// ============================================================================
