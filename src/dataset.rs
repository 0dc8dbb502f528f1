// 🗂️ Record Index - the in-memory dataset of business centers
//
// Loaded once per session, read-only afterwards. Every filter is a pure
// predicate over the source order, so filters compose in any order.

use crate::entities::validation::describe;
use crate::entities::{BusinessCenter, Company, RawBusinessCenter, ValidationError};
use crate::geo::GeoBounds;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

// ============================================================================
// CLIENT CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientCategory {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "kt")]
    KtClient,
    #[serde(rename = "non-kt")]
    NonKtClient,
}

impl ClientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientCategory::All => "all",
            ClientCategory::KtClient => "kt",
            ClientCategory::NonKtClient => "non-kt",
        }
    }

    /// Category predicate.
    ///
    /// `NonKtClient` keeps centers where no company is a client, which
    /// includes centers with zero companies.
    pub fn matches(&self, center: &BusinessCenter) -> bool {
        match self {
            ClientCategory::All => true,
            ClientCategory::KtClient => center.has_kt_clients(),
            ClientCategory::NonKtClient => !center.has_kt_clients(),
        }
    }
}

impl FromStr for ClientCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(ClientCategory::All),
            "kt" => Ok(ClientCategory::KtClient),
            "non-kt" => Ok(ClientCategory::NonKtClient),
            other => Err(anyhow!(
                "Unknown client category: {} (expected all, kt or non-kt)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FILTERS (free functions over any record subset)
// ============================================================================

/// Accept owned records and references alike
pub(crate) fn as_center<B: Borrow<BusinessCenter>>(record: &B) -> &BusinessCenter {
    <B as Borrow<BusinessCenter>>::borrow(record)
}

/// Centers whose position lies inside `bounds`, in source order
pub fn filter_by_bounds<'a, B: Borrow<BusinessCenter>>(
    records: &'a [B],
    bounds: &GeoBounds,
) -> Vec<&'a BusinessCenter> {
    records
        .iter()
        .map(as_center)
        .filter(|bc| bounds.contains(bc.latitude, bc.longitude))
        .collect()
}

pub fn filter_by_client_category<'a, B: Borrow<BusinessCenter>>(
    records: &'a [B],
    category: ClientCategory,
) -> Vec<&'a BusinessCenter> {
    records
        .iter()
        .map(as_center)
        .filter(|bc| category.matches(bc))
        .collect()
}

/// Exact, case-sensitive district match; `None` keeps everything
pub fn filter_by_district<'a, B: Borrow<BusinessCenter>>(
    records: &'a [B],
    district: Option<&str>,
) -> Vec<&'a BusinessCenter> {
    records
        .iter()
        .map(as_center)
        .filter(|bc| district.map_or(true, |d| bc.district == d))
        .collect()
}

pub fn filter_by_building_type<'a, B: Borrow<BusinessCenter>>(
    records: &'a [B],
    building_type: Option<&str>,
) -> Vec<&'a BusinessCenter> {
    records
        .iter()
        .map(as_center)
        .filter(|bc| building_type.map_or(true, |t| bc.building_purpose == t))
        .collect()
}

// ============================================================================
// LOADING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Abort the whole load on the first invalid record
    Strict,
    /// Drop invalid records and report them
    #[default]
    SkipInvalid,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<ValidationError>,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        format!(
            "{} business centers loaded, {} validation errors",
            self.loaded,
            self.rejected.len()
        )
    }
}

/// Structured reference to one company, used for click delegation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyRef {
    pub center_key: String,
    pub company_index: usize,
}

// ============================================================================
// RECORD INDEX
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    records: Vec<BusinessCenter>,
    by_key: HashMap<String, usize>,
}

impl RecordIndex {
    /// Wrap already-validated records.
    ///
    /// A key already taken by an earlier record gets a `-2`, `-3`, ... suffix,
    /// so every record stays reachable by key.
    pub fn load(mut records: Vec<BusinessCenter>) -> Self {
        let mut by_key = HashMap::with_capacity(records.len());
        for (i, bc) in records.iter_mut().enumerate() {
            if by_key.contains_key(&bc.key) {
                let base = bc.key.clone();
                let mut n = 2;
                while by_key.contains_key(&format!("{}-{}", base, n)) {
                    n += 1;
                }
                bc.key = format!("{}-{}", base, n);
                warn!(record = %bc.business_center_name, key = %bc.key, "Repeated center key");
            }
            by_key.insert(bc.key.clone(), i);
        }
        RecordIndex { records, by_key }
    }

    /// Validate raw records under `policy`
    pub fn from_raw(raw: Vec<RawBusinessCenter>, policy: LoadPolicy) -> Result<(Self, LoadReport)> {
        Self::from_decoded(raw.into_iter().map(Ok).collect(), policy)
    }

    /// Parse a JSON array, decoding each element on its own so one badly
    /// shaped record is subject to `policy` instead of failing the document.
    pub fn from_json_str(json: &str, policy: LoadPolicy) -> Result<(Self, LoadReport)> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).context("Failed to parse business center JSON")?;

        let decoded = values
            .into_iter()
            .enumerate()
            .map(|(position, value)| decode_record(position, value))
            .collect();

        Self::from_decoded(decoded, policy)
    }

    fn from_decoded(
        decoded: Vec<std::result::Result<RawBusinessCenter, ValidationError>>,
        policy: LoadPolicy,
    ) -> Result<(Self, LoadReport)> {
        let mut records = Vec::with_capacity(decoded.len());
        let mut report = LoadReport::default();

        for (position, raw_center) in decoded.into_iter().enumerate() {
            let result = match raw_center {
                Ok(raw_center) => raw_center.validate(position),
                Err(shape_error) => Err(vec![shape_error]),
            };

            match result {
                Ok(bc) => records.push(bc),
                Err(errors) => {
                    if policy == LoadPolicy::Strict {
                        return Err(anyhow!(
                            "Invalid record #{}: {}",
                            position,
                            describe(&errors)
                        ));
                    }
                    for e in &errors {
                        warn!(record = %e.record, field = %e.field, "Rejected record: {}", e.message);
                    }
                    report.rejected.extend(errors);
                }
            }
        }

        report.loaded = records.len();
        info!("{}", report.summary());

        Ok((Self::load(records), report))
    }

    pub fn from_file<P: AsRef<Path>>(path: P, policy: LoadPolicy) -> Result<(Self, LoadReport)> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read dataset file: {:?}", path.as_ref()))?;

        Self::from_json_str(&content, policy)
            .with_context(|| format!("Failed to load dataset: {:?}", path.as_ref()))
    }

    pub fn records(&self) -> &[BusinessCenter] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&BusinessCenter> {
        self.by_key.get(key).map(|&i| &self.records[i])
    }

    /// Resolve a click reference; `None` if either part is stale
    pub fn company(&self, company_ref: &CompanyRef) -> Option<(&BusinessCenter, &Company)> {
        let center = self.get(&company_ref.center_key)?;
        let company = center.companies.get(company_ref.company_index)?;
        Some((center, company))
    }

    pub fn filter_by_bounds(&self, bounds: &GeoBounds) -> Vec<&BusinessCenter> {
        filter_by_bounds(&self.records, bounds)
    }

    pub fn filter_by_client_category(&self, category: ClientCategory) -> Vec<&BusinessCenter> {
        filter_by_client_category(&self.records, category)
    }

    pub fn filter_by_district(&self, district: Option<&str>) -> Vec<&BusinessCenter> {
        filter_by_district(&self.records, district)
    }

    pub fn filter_by_building_type(&self, building_type: Option<&str>) -> Vec<&BusinessCenter> {
        filter_by_building_type(&self.records, building_type)
    }

    /// Distinct districts in first-seen order
    pub fn districts(&self) -> Vec<String> {
        distinct(self.records.iter().map(|bc| bc.district.as_str()))
    }

    /// Distinct building purposes in first-seen order
    pub fn building_types(&self) -> Vec<String> {
        distinct(self.records.iter().map(|bc| bc.building_purpose.as_str()))
    }
}

/// Decode one array element; a shape mismatch becomes a `record` error
/// labelled by the name when one is readable.
fn decode_record(
    position: usize,
    value: serde_json::Value,
) -> std::result::Result<RawBusinessCenter, ValidationError> {
    let label = value
        .get("business_center_name")
        .and_then(serde_json::Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", position));

    serde_json::from_value(value)
        .map_err(|e| ValidationError::new(&label, "record", &e.to_string()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(|v| v.to_string())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
