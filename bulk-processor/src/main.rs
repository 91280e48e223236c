use std::env;
use std::process::ExitCode;

use bulk_processor::{indexer, BulkIndexerError, Dependencies, Settings};
use bulk_processor_repository::GenericBulkProcessor;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run() -> Result<(), BulkIndexerError> {
    let settings = Settings::from_env()?;
    let dependencies = Dependencies::new(&settings).await?;
    let processor = dependencies.processor;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    let result = indexer::run(&processor, BufReader::new(tokio::io::stdin()), shutdown).await;

    processor.close().await?;
    info!(processor = %processor.name(), "Bulk processor closed");

    result.map(|_| ())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Bulk indexer failed");
            ExitCode::FAILURE
        }
    }
}
