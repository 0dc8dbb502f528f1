// 🗺️ Map View - declarative scene derivation for the map page
//
// The renderer never adds or removes layers by hand. It asks for the full
// scene for the current state and reconciles against the previous one.

use crate::analytics::{basic_totals, Totals};
use crate::dataset::{CompanyRef, ClientCategory, RecordIndex};
use crate::entities::{BusinessCenter, Company};
use crate::geo::{GeoBounds, LatLng};
use crate::selection::{ZoneEvent, ZoneSelection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Revenue that maps to a heat intensity of 1.0
const HEAT_REVENUE_SCALE: f64 = 1_000_000.0;
/// Heat contributed per KT client
const HEAT_PER_KT_CLIENT: f64 = 0.1;

/// Heat layer weight of one center
pub fn heat_intensity(bc: &BusinessCenter) -> f64 {
    let by_clients = bc.kt_client_count() as f64 * HEAT_PER_KT_CLIENT;
    let by_revenue = bc.total_revenue() / HEAT_REVENUE_SCALE;
    by_clients.max(by_revenue)
}

// ============================================================================
// VIEW STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub category: ClientCategory,
    pub show_heatmap: bool,
    pub show_clusters: bool,
    pub zone: ZoneSelection,
}

impl Default for MapView {
    fn default() -> Self {
        MapView {
            category: ClientCategory::All,
            show_heatmap: false,
            show_clusters: true,
            zone: ZoneSelection::Disabled,
        }
    }
}

// ============================================================================
// SCENE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: String,
    pub position: LatLng,
    pub has_kt_clients: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub position: LatLng,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub markers: Vec<Marker>,
    pub heat_points: Vec<HeatPoint>,
    pub clustered: bool,
    pub zone_outline: Option<GeoBounds>,
    pub draft_outline: Option<GeoBounds>,
}

/// Marker keys to add and remove between two scenes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl MapScene {
    pub fn diff(&self, previous: &MapScene) -> SceneDiff {
        let before: HashSet<&str> = previous.markers.iter().map(|m| m.key.as_str()).collect();
        let after: HashSet<&str> = self.markers.iter().map(|m| m.key.as_str()).collect();

        SceneDiff {
            added: self
                .markers
                .iter()
                .filter(|m| !before.contains(m.key.as_str()))
                .map(|m| m.key.clone())
                .collect(),
            removed: previous
                .markers
                .iter()
                .filter(|m| !after.contains(m.key.as_str()))
                .map(|m| m.key.clone())
                .collect(),
        }
    }
}

pub fn derive_scene(index: &RecordIndex, view: &MapView) -> MapScene {
    let visible = index.filter_by_client_category(view.category);

    let markers = visible
        .iter()
        .map(|bc| Marker {
            key: bc.key.clone(),
            position: bc.position(),
            has_kt_clients: bc.has_kt_clients(),
        })
        .collect();

    let heat_points = if view.show_heatmap {
        visible
            .iter()
            .map(|bc| HeatPoint {
                position: bc.position(),
                intensity: heat_intensity(bc),
            })
            .collect()
    } else {
        Vec::new()
    };

    MapScene {
        markers,
        heat_points,
        clustered: view.show_clusters,
        zone_outline: view.zone.committed(),
        draft_outline: view.zone.draft(),
    }
}

// ============================================================================
// MAP SESSION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    SetCategory(ClientCategory),
    ToggleHeatmap,
    ToggleClusters,
    Zone(ZoneEvent),
    /// A company link inside a center popup was clicked
    OpenOrganization(CompanyRef),
    CloseOrganization,
}

/// Organization card contents, copied out of the index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationCard {
    pub business_center_name: String,
    pub company: Company,
}

/// Interactive state of the map page
#[derive(Debug, Clone, Default)]
pub struct MapSession {
    pub view: MapView,
    pub card: Option<OrganizationCard>,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, index: &RecordIndex, event: UiEvent) {
        match event {
            UiEvent::SetCategory(category) => self.view.category = category,
            UiEvent::ToggleHeatmap => self.view.show_heatmap = !self.view.show_heatmap,
            UiEvent::ToggleClusters => self.view.show_clusters = !self.view.show_clusters,
            UiEvent::Zone(zone_event) => self.view.zone = self.view.zone.handle(zone_event),
            UiEvent::OpenOrganization(company_ref) => {
                self.card = index.company(&company_ref).map(|(bc, company)| OrganizationCard {
                    business_center_name: bc.business_center_name.clone(),
                    company: company.clone(),
                });
            }
            UiEvent::CloseOrganization => self.card = None,
        }
    }

    pub fn scene(&self, index: &RecordIndex) -> MapScene {
        derive_scene(index, &self.view)
    }

    /// Totals over every center in the committed zone, whatever the category
    pub fn zone_totals(&self, index: &RecordIndex) -> Option<Totals> {
        let bounds = self.view.zone.committed()?;
        Some(basic_totals(&index.filter_by_bounds(&bounds)))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> RecordIndex {
        RecordIndex::load(vec![
            BusinessCenter::new(
                "BC1",
                "Есильский",
                "Офисное",
                51.10,
                71.40,
                vec![
                    Company::new("Альфа", "1", "a")
                        .kt_client(vec!["Internet".to_string()])
                        .with_accruals(500000.0),
                    Company::new("Бета", "2", "b"),
                ],
            ),
            BusinessCenter::new(
                "BC2",
                "Алматинский",
                "Торговое",
                51.20,
                71.50,
                vec![Company::new("Гамма", "3", "c")],
            ),
        ])
    }

    fn draw(session: &mut MapSession, index: &RecordIndex, a: LatLng, b: LatLng) {
        session.handle(index, UiEvent::Zone(ZoneEvent::ToggleMode));
        session.handle(index, UiEvent::Zone(ZoneEvent::Press(a)));
        session.handle(index, UiEvent::Zone(ZoneEvent::Release(b)));
    }

    #[test]
    fn test_heat_intensity() {
        let idx = index();
        // max(1 * 0.1, 500000 / 1e6)
        assert_eq!(heat_intensity(&idx.records()[0]), 0.5);
        assert_eq!(heat_intensity(&idx.records()[1]), 0.0);

        let many_clients = BusinessCenter::new(
            "Many",
            "D",
            "P",
            51.0,
            71.0,
            (0..8).map(|i| Company::new(&i.to_string(), "0", "a").kt_client(vec![])).collect(),
        );
        assert!((heat_intensity(&many_clients) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_default_scene() {
        let idx = index();
        let scene = MapSession::new().scene(&idx);

        assert_eq!(scene.markers.len(), 2);
        assert!(scene.heat_points.is_empty());
        assert!(scene.clustered);
        assert_eq!(scene.zone_outline, None);
        assert_eq!(scene.draft_outline, None);
    }

    #[test]
    fn test_scene_follows_category_and_toggles() {
        let idx = index();
        let mut session = MapSession::new();

        session.handle(&idx, UiEvent::SetCategory(ClientCategory::KtClient));
        session.handle(&idx, UiEvent::ToggleHeatmap);
        session.handle(&idx, UiEvent::ToggleClusters);

        let scene = session.scene(&idx);
        assert_eq!(scene.markers.len(), 1);
        assert!(scene.markers[0].has_kt_clients);
        assert_eq!(scene.heat_points.len(), 1);
        assert_eq!(scene.heat_points[0].intensity, 0.5);
        assert!(!scene.clustered);
    }

    #[test]
    fn test_scene_diff() {
        let idx = index();
        let mut session = MapSession::new();
        let all = session.scene(&idx);

        session.handle(&idx, UiEvent::SetCategory(ClientCategory::NonKtClient));
        let non_kt = session.scene(&idx);

        let diff = non_kt.diff(&all);
        assert!(diff.added.is_empty());
        assert_eq!(diff.removed, vec![idx.records()[0].key.clone()]);

        let back = all.diff(&non_kt);
        assert_eq!(back.added, vec![idx.records()[0].key.clone()]);
        assert!(all.diff(&all).is_empty());
    }

    #[test]
    fn test_zone_totals_ignore_category() {
        let idx = index();
        let mut session = MapSession::new();
        assert_eq!(session.zone_totals(&idx), None);

        session.handle(&idx, UiEvent::SetCategory(ClientCategory::NonKtClient));
        draw(&mut session, &idx, LatLng::new(51.15, 71.45), LatLng::new(51.05, 71.35));

        let totals = session.zone_totals(&idx).unwrap();
        assert_eq!(totals.business_center_count, 1);
        assert_eq!(totals.company_count, 2);
        assert_eq!(totals.kt_client_count, 1);
        assert_eq!(totals.total_revenue, 500000.0);

        let scene = session.scene(&idx);
        assert_eq!(scene.zone_outline, Some(GeoBounds::new(51.15, 51.05, 71.45, 71.35)));
    }

    #[test]
    fn test_draft_outline_while_drawing() {
        let idx = index();
        let mut session = MapSession::new();
        session.handle(&idx, UiEvent::Zone(ZoneEvent::ToggleMode));
        session.handle(&idx, UiEvent::Zone(ZoneEvent::Press(LatLng::new(51.0, 71.0))));
        session.handle(&idx, UiEvent::Zone(ZoneEvent::Move(LatLng::new(51.1, 71.1))));

        let scene = session.scene(&idx);
        assert_eq!(scene.draft_outline, Some(GeoBounds::new(51.1, 51.0, 71.1, 71.0)));
        assert_eq!(scene.zone_outline, None);
        assert_eq!(session.zone_totals(&idx), None);
    }

    #[test]
    fn test_organization_card_via_company_ref() {
        let idx = index();
        let mut session = MapSession::new();
        let key = idx.records()[0].key.clone();

        session.handle(
            &idx,
            UiEvent::OpenOrganization(CompanyRef { center_key: key.clone(), company_index: 0 }),
        );
        let card = session.card.clone().unwrap();
        assert_eq!(card.business_center_name, "BC1");
        assert_eq!(card.company.organization_name, "Альфа");
        assert_eq!(card.company.services, vec!["Internet".to_string()]);

        session.handle(&idx, UiEvent::CloseOrganization);
        assert!(session.card.is_none());

        session.handle(
            &idx,
            UiEvent::OpenOrganization(CompanyRef { center_key: key, company_index: 5 }),
        );
        assert!(session.card.is_none());
    }
}
