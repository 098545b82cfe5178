use crate::infra::{parse_month, InMemoryMetricsRepository};
use clap::Args;
use sitesafe::error::AppError;
use sitesafe::scoring::bulk::parse_csv_rows;
use sitesafe::scoring::{
    MetricsService, MetricsSubmission, Month, ParameterCatalog, ParameterKey, SiteId, TargetActual,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Site identifier for the demo records
    #[arg(long, default_value = "DEMO-01")]
    pub(crate) site: String,
    /// Reporting year
    #[arg(long, default_value_t = 2025)]
    pub(crate) year: i32,
    /// Month to score when no CSV file is given
    #[arg(long, default_value = "January", value_parser = parse_month)]
    pub(crate) month: Month,
    /// Bulk-import CSV file in the template layout
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        site,
        year,
        month,
        csv,
    } = args;

    let site = SiteId(site);
    let repository = Arc::new(InMemoryMetricsRepository::default());
    let service = Arc::new(MetricsService::new(
        repository,
        ParameterCatalog::standard(),
    ));

    println!("Safety KPI scoring demo");

    if let Some(path) = csv {
        return run_csv_demo(&service, &site, year, path);
    }

    let parameters = sample_parameters();
    let scored = service.engine().score(&parameters);

    println!("\nParameter breakdown for {month} {year}");
    for parameter in &scored.parameters {
        println!(
            "  - {:<24} target {:>8.1} | actual {:>8.1} | {:.2} points",
            parameter.key.column_label(),
            parameter.target,
            parameter.actual,
            parameter.points
        );
    }
    println!(
        "Total: {:.2} / 100 ({})",
        scored.summary.total_score,
        scored.summary.rating.label()
    );

    let submission = MetricsSubmission {
        site_id: site.clone(),
        month,
        year,
        parameters,
    };
    if let Err(err) = service.upsert(submission) {
        println!("  Submission rejected: {err}");
        return Ok(());
    }

    match service.get(&site, year, month) {
        Ok(view) => {
            println!("\nDerived KPIs");
            println!("  TRIR: {:.2}", view.kpis.trir);
            println!("  LTIFR: {:.2}", view.kpis.ltifr);
            println!("  Near-miss rate: {:.2}", view.kpis.near_miss_rate);
            println!(
                "  Inspection completion: {:.2}%",
                view.kpis.safety_inspection_completion
            );
            println!("  PPE compliance: {:.2}%", view.kpis.ppe_compliance_rate);

            match serde_json::to_string_pretty(&view) {
                Ok(json) => println!("\nStored record payload:\n{json}"),
                Err(err) => println!("  Record payload unavailable: {err}"),
            }
        }
        Err(err) => println!("  Lookup unavailable: {err}"),
    }

    Ok(())
}

fn run_csv_demo(
    service: &MetricsService<InMemoryMetricsRepository>,
    site: &SiteId,
    year: i32,
    path: PathBuf,
) -> Result<(), AppError> {
    let file = std::fs::File::open(path)?;
    let rows = parse_csv_rows(file)?;
    let row_count = rows.len();

    let result = match service.bulk_import(site, year, rows) {
        Ok(result) => result,
        Err(err) => {
            println!("  Import rejected: {err}");
            return Ok(());
        }
    };

    println!(
        "\nImported {} of {} rows for {} / {}",
        result.success, row_count, site, year
    );
    if !result.errors.is_empty() {
        println!("Rejected rows:");
        for error in &result.errors {
            println!("  - {}: {}", error.month, error.error);
        }
    }

    match service.list(site, year) {
        Ok(records) => {
            println!("\nScored months");
            for record in records {
                println!(
                    "  - {:<10} {:.2} / 100 ({})",
                    record.month.name(),
                    record.total_score,
                    record.rating.label()
                );
            }
        }
        Err(err) => println!("  Listing unavailable: {err}"),
    }

    Ok(())
}

fn sample_parameters() -> BTreeMap<ParameterKey, TargetActual> {
    let mut parameters = BTreeMap::new();
    let mut put = |key: ParameterKey, target: f64, actual: f64| {
        parameters.insert(key, TargetActual { target, actual });
    };

    put(ParameterKey::ManDays, 1000.0, 950.0);
    put(ParameterKey::SafeWorkHours, 8000.0, 7600.0);
    put(ParameterKey::SafetyInduction, 20.0, 18.0);
    put(ParameterKey::ToolBoxTalk, 12.0, 11.0);
    put(ParameterKey::FormalSafetyInspection, 4.0, 4.0);
    put(ParameterKey::NearMissReport, 4.0, 5.0);
    put(ParameterKey::FirstAidInjury, 0.0, 0.0);
    put(ParameterKey::MedicalTreatmentInjury, 0.0, 0.0);
    put(ParameterKey::LostTimeInjury, 0.0, 0.0);
    put(ParameterKey::RecordableIncidents, 0.0, 0.0);
    put(ParameterKey::PpeComplianceRate, 100.0, 97.5);
    put(ParameterKey::WasteGenerated, 500.0, 600.0);
    put(ParameterKey::EnergyConsumption, 1200.0, 1100.0);
    put(ParameterKey::HealthCheckupCompliance, 100.0, 100.0);

    parameters
}
