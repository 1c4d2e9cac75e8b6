use std::error::Error;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use alphaquery::config::Settings;
use alphaquery::utils::{output_dir, save_api_result, write_records_csv};
use alphaquery::AlphaVantage;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let settings = Settings::new()?;
    let request = settings
        .request
        .ok_or("no [request] section configured (set it in config.toml or APP__REQUEST__FUNCTION)")?;

    let client = AlphaVantage::from_settings(&settings.client)?;
    let response = client
        .call(&request.function, request.params(), request.format)
        .await?;

    if let Some(cut) = response.truncation {
        warn!(
            "{} of {} symbols were dropped",
            cut.requested - cut.kept,
            cut.requested
        );
    }

    let dir = output_dir(&request.output_dir, response.function);
    let raw_path = save_api_result(&response, &dir)?;
    info!("{} saved to {}", response.function, raw_path.display());

    if request.decode_csv {
        if let Some(records) = response.csv_records() {
            let records = records?;
            let records_path = dir.join("records.csv");
            write_records_csv(&records, &records_path)?;
            info!("{} rows written to {}", records.len(), records_path.display());
        }
    }
    Ok(())
}
