use anyhow::{bail, Context, Result};
use std::env;

use business_center_atlas::{
    basic_totals, build_report, export_rows, logging, AnalyticsFilter, AtlasConfig, GeoBounds,
    RecordIndex,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("❌ {:?}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = AtlasConfig::load(None)?;
    logging::init(&config.log_level);

    let args: Vec<String> = env::args().skip(1).collect();

    let (index, report) = RecordIndex::from_file(&config.dataset_path, config.load_policy)?;
    if !report.rejected.is_empty() {
        eprintln!("⚠️  {}", report.summary());
    }

    match args.first().map(String::as_str) {
        None | Some("summary") => run_summary(&index, &config),
        Some("zone") => run_zone(&index, &args[1..]),
        Some("export") => run_export(&index),
        Some(other) => bail!("Unknown command: {} (expected summary, zone or export)", other),
    }
}

fn run_summary(index: &RecordIndex, config: &AtlasConfig) -> Result<()> {
    let report = build_report(index.records(), &AnalyticsFilter::default(), config.top_limit);

    println!("📊 Business Center Analytics");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", report.totals.summary());

    println!("\n🏙️  By district:");
    for d in &report.districts {
        println!(
            "   {:<24} {:>4} centers {:>5} companies {:>4} KT  {:>14.0}",
            d.district, d.business_centers, d.companies, d.kt_clients, d.revenue
        );
    }

    println!("\n🏢 By building type:");
    for t in &report.building_types {
        println!(
            "   {:<24} {:>4} centers {:>5} companies {:>4} KT",
            t.building_type, t.count, t.companies, t.kt_clients
        );
    }

    println!("\n🔝 Top business centers by companies:");
    for (i, bc) in report.top_business_centers.iter().enumerate() {
        println!("   {:>2}. {} ({} companies, {} KT)", i + 1, bc.name, bc.company_count, bc.kt_client_count);
    }

    println!("\n💰 Top KT clients by revenue:");
    for (i, c) in report.top_kt_clients.iter().enumerate() {
        println!(
            "   {:>2}. {} - {:.0} ({} services, {})",
            i + 1,
            c.name,
            c.revenue,
            c.service_count,
            c.business_center_name
        );
    }

    Ok(())
}

fn run_zone(index: &RecordIndex, args: &[String]) -> Result<()> {
    if args.len() != 4 {
        bail!("Usage: business-center-atlas zone <north> <south> <east> <west>");
    }

    let edges = args
        .iter()
        .map(|a| a.parse::<f64>().with_context(|| format!("Not a coordinate: {}", a)))
        .collect::<Result<Vec<f64>>>()?;
    let bounds = GeoBounds::new(edges[0], edges[1], edges[2], edges[3]);

    let selected = index.filter_by_bounds(&bounds);
    let totals = basic_totals(&selected);

    println!("🔲 Zone N {:.5} S {:.5} E {:.5} W {:.5}", bounds.north, bounds.south, bounds.east, bounds.west);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", totals.summary());
    for bc in &selected {
        println!("   • {} ({})", bc.business_center_name, bc.district);
    }

    Ok(())
}

fn run_export(index: &RecordIndex) -> Result<()> {
    let rows = export_rows(index.records());
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
