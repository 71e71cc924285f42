//! capwatch - Terminal monitoring dashboard for bottle-cap inspection logs.

use std::sync::Arc;

use tracing::{error, info};

use capwatch::cli::Cli;
use capwatch::config::{Config, ServiceSettings};
use capwatch::dashboard::{sample_service, Dashboard};
use capwatch::error::Result;
use capwatch::service::{HttpQueryService, QueryService};
use capwatch::{headless, logging, tui};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    // File logging in TUI mode keeps the terminal clean; headless runs log
    // to stderr.
    if cli.headless {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    // Precedence: CLI arguments over config file over environment variables.
    let mut service_config = config.service.clone();
    service_config.merge(&cli.to_service_config());
    service_config.apply_env_defaults();

    let mut dashboard_config = config.dashboard.clone();
    cli.apply_dashboard_overrides(&mut dashboard_config);

    let (service, settings, connection): (Arc<dyn QueryService>, ServiceSettings, String) =
        if cli.mock_service {
            let settings = ServiceSettings {
                endpoint: "mock://local".to_string(),
                region: service_config.region.clone(),
                database: "sample".to_string(),
                output_location: "mock://results/".to_string(),
            };
            (
                Arc::new(sample_service()),
                settings,
                "sample data (mock service)".to_string(),
            )
        } else {
            let settings = service_config.resolve()?;
            (
                Arc::new(HttpQueryService::new(&settings)),
                settings,
                service_config.display_string(),
            )
        };

    info!("Service: {connection}");
    let dashboard = Dashboard::new(service, &settings, dashboard_config);

    if cli.headless {
        headless::run(&dashboard).await
    } else {
        tui::run(dashboard, connection).await
    }
}
