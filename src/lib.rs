// Business Center Atlas - Core Library
// Zone selection, filtering and aggregation over business centers and their
// companies. Used by the CLI, the API server, and tests.

pub mod geo;
pub mod entities;
pub mod dataset;
pub mod analytics;
pub mod export;
pub mod selection;
pub mod view;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use geo::{GeoBounds, LatLng};
pub use entities::{
    BusinessCenter, Company, RawBusinessCenter, RawCompany, ValidationError,
};
pub use dataset::{
    ClientCategory, CompanyRef, LoadPolicy, LoadReport, RecordIndex,
    filter_by_bounds, filter_by_building_type, filter_by_client_category, filter_by_district,
};
pub use analytics::{
    AnalyticsFilter, AnalyticsReport, BuildingTypeStats, DistrictStats,
    RankedBusinessCenter, RankedKtClient, Totals,
    basic_totals, build_report, group_by_building_type, group_by_district, percentage,
    top_business_centers_by_company_count, top_kt_clients_by_revenue, DEFAULT_TOP_LIMIT,
};
pub use export::{export_rows, ExportRow};
pub use selection::{ZoneEvent, ZoneSelection};
pub use view::{
    derive_scene, heat_intensity, HeatPoint, MapScene, MapSession, MapView, Marker,
    OrganizationCard, SceneDiff, UiEvent,
};
pub use config::AtlasConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
