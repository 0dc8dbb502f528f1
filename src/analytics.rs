// 📊 Aggregator - grouped statistics and top-N rankings
//
// Every function takes any record subset (owned or borrowed) and makes a
// single pass over it. Groups come out in first-appearance order, rankings
// are stable sorts so ties keep input order.

use crate::dataset::{as_center, filter_by_building_type, filter_by_district};
use crate::entities::BusinessCenter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;

/// Default length of top-N rankings
pub const DEFAULT_TOP_LIMIT: usize = 10;

// ============================================================================
// PERCENTAGES
// ============================================================================

/// `part / whole * 100`, or `None` when `whole` is zero.
///
/// `None` is the division-by-zero sentinel; renderers show it as a dash.
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

// ============================================================================
// TOTALS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub business_center_count: usize,
    pub company_count: usize,
    pub kt_client_count: usize,
    pub total_revenue: f64,
}

impl Totals {
    fn add(&mut self, bc: &BusinessCenter) {
        self.business_center_count += 1;
        self.company_count += bc.company_count();
        self.kt_client_count += bc.kt_client_count();
        self.total_revenue += bc.total_revenue();
    }

    /// KT clients as a share of all companies
    pub fn kt_share_percent(&self) -> Option<f64> {
        percentage(self.kt_client_count, self.company_count)
    }

    pub fn summary(&self) -> String {
        let share = match self.kt_share_percent() {
            Some(p) => format!("{:.1}%", p),
            None => "—".to_string(),
        };
        format!(
            "{} business centers, {} companies, {} KT clients ({}), revenue {:.0}",
            self.business_center_count,
            self.company_count,
            self.kt_client_count,
            share,
            self.total_revenue
        )
    }
}

pub fn basic_totals<B: Borrow<BusinessCenter>>(records: &[B]) -> Totals {
    let mut totals = Totals::default();
    for bc in records.iter().map(as_center) {
        totals.add(bc);
    }
    totals
}

// ============================================================================
// GROUPINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictStats {
    pub district: String,
    pub business_centers: usize,
    pub companies: usize,
    pub kt_clients: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingTypeStats {
    #[serde(rename = "type")]
    pub building_type: String,
    pub count: usize,
    pub companies: usize,
    pub kt_clients: usize,
}

/// Group by an exact string key, keeping first-appearance order
fn group_by<'a, B, K>(records: &'a [B], key: K) -> Vec<(String, Totals)>
where
    B: Borrow<BusinessCenter>,
    K: Fn(&'a BusinessCenter) -> &'a str,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Totals)> = Vec::new();

    for bc in records.iter().map(as_center) {
        let k = key(bc);
        let slot = *slots.entry(k).or_insert_with(|| {
            groups.push((k.to_string(), Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(bc);
    }

    groups
}

pub fn group_by_district<B: Borrow<BusinessCenter>>(records: &[B]) -> Vec<DistrictStats> {
    group_by(records, |bc| bc.district.as_str())
        .into_iter()
        .map(|(district, t)| DistrictStats {
            district,
            business_centers: t.business_center_count,
            companies: t.company_count,
            kt_clients: t.kt_client_count,
            revenue: t.total_revenue,
        })
        .collect()
}

pub fn group_by_building_type<B: Borrow<BusinessCenter>>(records: &[B]) -> Vec<BuildingTypeStats> {
    group_by(records, |bc| bc.building_purpose.as_str())
        .into_iter()
        .map(|(building_type, t)| BuildingTypeStats {
            building_type,
            count: t.business_center_count,
            companies: t.company_count,
            kt_clients: t.kt_client_count,
        })
        .collect()
}

// ============================================================================
// RANKINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBusinessCenter {
    pub name: String,
    pub company_count: usize,
    pub kt_client_count: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedKtClient {
    pub name: String,
    pub revenue: f64,
    pub service_count: usize,
    pub business_center_name: String,
}

/// Centers by company count, descending; ties keep input order.
/// A `limit` of zero yields nothing.
pub fn top_business_centers_by_company_count<B: Borrow<BusinessCenter>>(
    records: &[B],
    limit: usize,
) -> Vec<RankedBusinessCenter> {
    let mut ranked: Vec<RankedBusinessCenter> = records
        .iter()
        .map(as_center)
        .map(|bc| RankedBusinessCenter {
            name: bc.business_center_name.clone(),
            company_count: bc.company_count(),
            kt_client_count: bc.kt_client_count(),
            revenue: bc.total_revenue(),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.company_count.cmp(&a.company_count));
    ranked.truncate(limit);
    ranked
}

/// Every KT client across all centers by revenue, descending; ties keep
/// flatten order (center order, then company order).
pub fn top_kt_clients_by_revenue<B: Borrow<BusinessCenter>>(
    records: &[B],
    limit: usize,
) -> Vec<RankedKtClient> {
    let mut clients: Vec<RankedKtClient> = records
        .iter()
        .map(as_center)
        .flat_map(|bc| {
            bc.companies
                .iter()
                .filter(|c| c.is_kt_client)
                .map(move |c| RankedKtClient {
                    name: c.organization_name.clone(),
                    revenue: c.revenue(),
                    service_count: c.service_count(),
                    business_center_name: bc.business_center_name.clone(),
                })
        })
        .collect();

    // Revenue is finite and non-negative after validation
    clients.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    clients.truncate(limit);
    clients
}

// ============================================================================
// ANALYTICS REPORT
// ============================================================================

/// District and building-type scope of a report; `None` means all
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsFilter {
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
}

impl AnalyticsFilter {
    /// Build from user-surface values where the literal `all` means no filter
    pub fn from_selection(district: Option<&str>, building_type: Option<&str>) -> Self {
        let pick = |v: Option<&str>| v.filter(|s| *s != "all" && !s.is_empty()).map(str::to_string);
        AnalyticsFilter {
            district: pick(district),
            building_type: pick(building_type),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub filter: AnalyticsFilter,
    pub totals: Totals,
    pub kt_share_percent: Option<f64>,
    pub districts: Vec<DistrictStats>,
    pub building_types: Vec<BuildingTypeStats>,
    pub top_business_centers: Vec<RankedBusinessCenter>,
    pub top_kt_clients: Vec<RankedKtClient>,
}

/// District filter first, then building type, then every aggregate
pub fn build_report<B: Borrow<BusinessCenter>>(
    records: &[B],
    filter: &AnalyticsFilter,
    limit: usize,
) -> AnalyticsReport {
    let by_district = filter_by_district(records, filter.district.as_deref());
    let scoped = filter_by_building_type(&by_district, filter.building_type.as_deref());

    let totals = basic_totals(&scoped);

    AnalyticsReport {
        generated_at: Utc::now(),
        filter: filter.clone(),
        kt_share_percent: totals.kt_share_percent(),
        totals,
        districts: group_by_district(&scoped),
        building_types: group_by_building_type(&scoped),
        top_business_centers: top_business_centers_by_company_count(&scoped, limit),
        top_kt_clients: top_kt_clients_by_revenue(&scoped, limit),
    }
}

// ============================================================================
// TESTS
// ============================================================================
