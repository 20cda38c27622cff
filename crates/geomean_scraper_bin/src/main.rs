use geomean_sweep::{
    LogProgress, ProgressSink, SweepSummary, TerminalProgress, export_csv, fetch_date_range,
    sort_by_date,
};
use harga_model::inclusive_day_count;
use log::{error, info};
use panelharga_api::api::{PanelHargaAPI, ReqwestTransport};
use std::process::exit;

mod config;

use config::{Config, ProgressMode};

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let transport = match ReqwestTransport::new(config.timeout) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Could not create HTTP client: {}", e);
            exit(1);
        }
    };
    let api = PanelHargaAPI::new(transport)
        .with_base_url(&config.base_url)
        .with_commodity_id(config.commodity_id);

    info!(
        "Fetching geomean for province_id {} commodity {} from {} to {} ({} dates)",
        config.province_id,
        config.commodity_id,
        config.start_date,
        config.end_date,
        inclusive_day_count(config.start_date, config.end_date)
    );

    let mut terminal_progress = TerminalProgress::new();
    let mut log_progress = LogProgress::new();
    let progress: Option<&mut dyn ProgressSink> = match config.progress {
        ProgressMode::Bar => Some(&mut terminal_progress),
        ProgressMode::Log => Some(&mut log_progress),
        ProgressMode::Off => None,
    };

    let mut records = fetch_date_range(
        &api,
        config.start_date,
        config.end_date,
        config.province_id,
        progress,
    )
    .await;

    let summary = SweepSummary::from_records(&records);
    info!(
        "Fetched {} dates | found: {} | no data: {} | not found: {} | failed: {}",
        summary.total(),
        summary.found,
        summary.no_data,
        summary.not_found,
        summary.failed
    );

    sort_by_date(&mut records);

    if let Err(e) = export_csv(&config.output, &records, &config.commodity_label) {
        error!("Could not write {}: {}", config.output.display(), e);
        exit(1);
    }

    info!(
        "CSV file \"{}\" has been created successfully.",
        config.output.display()
    );
}
