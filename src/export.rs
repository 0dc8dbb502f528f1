// 📤 Export rows - one flat row per business center
// The row shape is the contract; file format and encoding belong to the caller.

use crate::dataset::as_center;
use crate::entities::BusinessCenter;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub business_center_name: String,
    pub district: String,
    pub building_purpose: String,
    pub company_count: usize,
    pub kt_client_count: usize,
    pub total_revenue: f64,
}

impl From<&BusinessCenter> for ExportRow {
    fn from(bc: &BusinessCenter) -> Self {
        ExportRow {
            business_center_name: bc.business_center_name.clone(),
            district: bc.district.clone(),
            building_purpose: bc.building_purpose.clone(),
            company_count: bc.company_count(),
            kt_client_count: bc.kt_client_count(),
            total_revenue: bc.total_revenue(),
        }
    }
}

/// Rows in source order, unfiltered
pub fn export_rows<B: Borrow<BusinessCenter>>(records: &[B]) -> Vec<ExportRow> {
    records.iter().map(as_center).map(ExportRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Company;

    #[test]
    fn test_export_rows() {
        let records = vec![
            BusinessCenter::new(
                "Москва",
                "Есильский",
                "Офисное",
                51.12,
                71.43,
                vec![
                    Company::new("A", "1", "a").kt_client(vec![]).with_accruals(700.0),
                    Company::new("B", "2", "b").with_accruals(300.0),
                ],
            ),
            BusinessCenter::new("Пустой", "Сарыаркинский", "Смешанное", 51.18, 71.41, vec![]),
        ];

        let rows = export_rows(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            ExportRow {
                business_center_name: "Москва".to_string(),
                district: "Есильский".to_string(),
                building_purpose: "Офисное".to_string(),
                company_count: 2,
                kt_client_count: 1,
                total_revenue: 1000.0,
            }
        );
        assert_eq!(rows[1].company_count, 0);
        assert_eq!(rows[1].total_revenue, 0.0);
    }
}
