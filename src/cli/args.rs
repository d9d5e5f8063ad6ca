use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::readers::UnmappedPolicy;

#[derive(Parser)]
#[command(name = "epi-dashboard")]
#[command(about = "Filtered epidemiological query service and dashboard aggregates")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML or YAML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the France dataset and serve filtered queries over HTTP
    Serve {
        #[arg(long, help = "Bind address [default: from config]")]
        bind: Option<String>,

        #[arg(short, long, help = "Listen port [default: from config]")]
        port: Option<u16>,

        #[arg(short, long, help = "Dataset URL or file path [default: from config]")]
        source: Option<String>,
    },

    /// Run one filtered query against a freshly loaded France dataset
    Query {
        #[arg(short, long, help = "Department code, or 'All'")]
        region: Option<String>,

        #[arg(long)]
        start_date: Option<String>,

        #[arg(long)]
        end_date: Option<String>,

        #[arg(short, long, help = "Write the subset as CSV instead of printing JSON")]
        output: Option<PathBuf>,

        #[arg(short, long, help = "Dataset URL or file path [default: from config]")]
        source: Option<String>,
    },

    /// Build the France dashboard data through the query service
    France {
        #[arg(long)]
        start_date: Option<NaiveDate>,

        #[arg(long)]
        end_date: Option<NaiveDate>,

        #[arg(long, help = "Query service base URL [default: from config]")]
        api_url: Option<String>,

        #[arg(long, help = "Skip fetching department boundaries")]
        no_map: bool,

        #[arg(short, long, help = "Export the filtered subset as CSV")]
        export: Option<PathBuf>,
    },

    /// Build the USA dashboard data from the state dataset
    Usa {
        #[arg(long)]
        start_date: Option<NaiveDate>,

        #[arg(long)]
        end_date: Option<NaiveDate>,

        #[arg(short, long, help = "Dataset URL or file path [default: from config]")]
        source: Option<String>,

        #[arg(long, value_enum, help = "Handling of state names without a code")]
        unmapped: Option<UnmappedPolicy>,

        #[arg(short, long, help = "Export the filtered subset as CSV")]
        export: Option<PathBuf>,
    },

    /// Summarize the France dataset
    Info {
        #[arg(short, long, help = "Dataset URL or file path [default: from config]")]
        source: Option<String>,
    },
}
