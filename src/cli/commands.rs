use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::dashboard::{DashboardClient, FranceDashboard, UsaDashboard};
use crate::error::Result;
use crate::models::QueryParams;
use crate::processors::QueryService;
use crate::readers::DataSource;
use crate::server::{self, AppState};
use crate::store::{load_france, load_usa};
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvExport, CsvWriter};

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };
    init_logging(&level, cli.log_file.as_deref())?;
    debug!("Settings: {settings:?}");

    match cli.command {
        Commands::Serve { bind, port, source } => {
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(source) = source {
                settings.france.source = DataSource::parse(&source);
            }

            let progress = ProgressReporter::new_spinner("Loading France dataset...", cli.quiet);
            let dataset = load_france(&settings.france).await?;
            progress.finish_with_message(&format!("Loaded {} rows", dataset.len()));

            server::serve(&settings.server, AppState::new(dataset)).await?;
        }

        Commands::Query {
            region,
            start_date,
            end_date,
            output,
            source,
        } => {
            if let Some(source) = source {
                settings.france.source = DataSource::parse(&source);
            }

            let progress = ProgressReporter::new_spinner("Loading France dataset...", cli.quiet);
            let dataset = load_france(&settings.france).await?;
            progress.finish_and_clear();

            let service = QueryService::new(Arc::new(dataset));
            let rows = service.query_params(QueryParams {
                region_code: region,
                start_date,
                end_date,
            })?;
            info!("Query matched {} rows", rows.len());

            match output {
                Some(path) => export(&rows, &path)?,
                None => print_json(&rows)?,
            }
        }

        Commands::France {
            start_date,
            end_date,
            api_url,
            no_map,
            export: export_path,
        } => {
            let api_url = api_url.unwrap_or_else(|| settings.dashboard.api_url.clone());
            let client = DashboardClient::new(api_url, &settings.cache);

            let mut dashboard = FranceDashboard::new(&client);
            if !no_map {
                dashboard = dashboard.with_boundaries(&settings.france.boundaries_url);
            }

            let progress = ProgressReporter::new_spinner("Fetching France data...", cli.quiet);
            let report = dashboard.render(start_date, end_date).await?;
            progress.finish_and_clear();

            if let Some(path) = export_path {
                export(&report.subset, &path)?;
            }
            print_json(&report)?;
        }

        Commands::Usa {
            start_date,
            end_date,
            source,
            unmapped,
            export: export_path,
        } => {
            if let Some(source) = source {
                settings.usa.source = DataSource::parse(&source);
            }
            if let Some(policy) = unmapped {
                settings.usa.unmapped = policy;
            }

            let progress = ProgressReporter::new_spinner("Loading USA dataset...", cli.quiet);
            let dataset = load_usa(&settings.usa).await?;
            progress.finish_and_clear();

            let dashboard = UsaDashboard::new(Arc::new(dataset), settings.dashboard.rolling_window);
            let report = dashboard.render(start_date, end_date)?;

            if let Some(path) = export_path {
                export(&report.subset, &path)?;
            }
            print_json(&report)?;
        }

        Commands::Info { source } => {
            if let Some(source) = source {
                settings.france.source = DataSource::parse(&source);
            }

            let progress = ProgressReporter::new_spinner("Loading France dataset...", cli.quiet);
            let dataset = load_france(&settings.france).await?;
            progress.finish_and_clear();

            let summary = DatasetAnalyzer::new().analyze(&dataset);
            println!("Source: {}", settings.france.source);
            println!("\n{}", summary.detailed_summary());
        }
    }

    Ok(())
}

fn export<T: CsvExport>(rows: &[T], path: &Path) -> Result<()> {
    let info = CsvWriter::new().write_records(rows, path)?;
    println!("{}", info.summary());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
