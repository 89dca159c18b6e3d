use crate::report::AllocationTable;
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vaccine_planner::config::AppConfig;
use vaccine_planner::error::AppError;
use vaccine_planner::ingest::{CsvDemographicStore, DistrictDatasetImporter};
use vaccine_planner::CampaignPlanner;

#[derive(Parser, Debug)]
#[command(
    name = "Vaccine Campaign Planner",
    about = "Score districts, size campaigns, and allocate a vaccine dose budget",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute an allocation table from statistics files and print it
    Plan(PlanArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct PlanArgs {
    /// COVID statistics CSV (DISTRICTS, NUM_VACCINATED, NUM_CASES, MIN_TO_ADMIN_VACC, NUM_STAFF)
    #[arg(long)]
    pub(crate) covid_csv: PathBuf,
    /// General statistics CSV (DISTRICTS, PERCENT_POP_60+, NUM_VACCINE_SITES)
    #[arg(long)]
    pub(crate) general_csv: PathBuf,
    /// State file: [country, total_doses, [[district, finished], ...]]
    #[arg(long)]
    pub(crate) state: PathBuf,
    /// Directory with demographic extracts (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Plan(args) => run_plan(args),
    }
}

fn run_plan(args: PlanArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = CsvDemographicStore::new(args.data_dir.unwrap_or(config.data.directory));

    let inputs = DistrictDatasetImporter::new(&store).from_paths(
        &args.covid_csv,
        &args.general_csv,
        &args.state,
    )?;
    let plan = CampaignPlanner::new(config.planning).plan(&inputs.districts, inputs.total_doses)?;

    print!("{}", AllocationTable::new(inputs.country, &plan));
    Ok(())
}
