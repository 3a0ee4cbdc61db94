//! HospDB CLI
//!
//! Command-line interface for the hospital database

use clap::{Parser, Subcommand};
use hospdb_core::logging_facility::{self, Profile};
use hospdb_engine::ClinicService;
use hospdb_store::ConnectionConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hospdb")]
#[command(about = "HospDB - patients, wards and hospital stays", long_about = None)]
struct Cli {
    /// Database location (sqlite::memory:, sqlite://<path> or a plain path)
    #[arg(long, env = "HOSPDB_URL", default_value = "hospdb.sqlite", global = true)]
    url: String,

    #[arg(long, env = "HOSPDB_USER", default_value = "", global = true)]
    user: String,

    #[arg(
        long,
        env = "HOSPDB_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    password: String,

    /// Logging profile: dev, prod or test
    #[arg(long, env = "HOSPDB_LOG", default_value = "dev", global = true)]
    log: Profile,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the schema (idempotent)
    Init,
    /// Ward operations
    Ward(commands::ward::WardArgs),
    /// Patient operations
    Patient(commands::patient::PatientArgs),
    /// Hospital stay operations
    Stay(commands::stay::StayArgs),
    /// Free and allocated beds, average stay duration
    Beds(commands::beds::BedsArgs),
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConnectionConfig::new(cli.url, cli.user, cli.password);
    let mut service = ClinicService::connect(config)?;
    let output = commands::Output { json: cli.json };

    let result = match cli.command {
        Commands::Init => commands::init::execute(&mut service, &output),
        Commands::Ward(args) => commands::ward::execute(args, &mut service, &output),
        Commands::Patient(args) => commands::patient::execute(args, &mut service, &output),
        Commands::Stay(args) => commands::stay::execute(args, &mut service, &output),
        Commands::Beds(args) => commands::beds::execute(args, &mut service, &output),
    };

    service.close()?;
    result
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging_facility::init(cli.log);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
