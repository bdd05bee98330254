use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    CategoriesCommand, ConfigCommand, IngredientsCommand, PantryCommand, RecipeCommand,
    SearchCommand, StatusCommand,
};
use what2cook::config::Config;
use what2cook::store::LocalStore;
use what2cook::sync::SyncCoordinator;

#[derive(Parser)]
#[command(name = "what2cook")]
#[command(version)]
#[command(about = "Find something to cook with what you have", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe(RecipeCommand),

    /// Find recipes by ingredient
    Search(SearchCommand),

    /// Manage the ingredients on hand
    Pantry(PantryCommand),

    /// List recipe categories
    Categories(CategoriesCommand),

    /// List known ingredient names
    Ingredients(IngredientsCommand),

    /// Show remote sync status
    Status(StatusCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "what2cook=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let local = LocalStore::new(&config.data_dir.value);
    if local.ensure_seed_data() {
        tracing::info!("Seeded starter recipes in {}", local.data_dir().display());
    }

    let coordinator = SyncCoordinator::connect(&config, local);
    let hydration = coordinator.spawn_hydration();

    let result = match command {
        Commands::Recipe(cmd) => cmd.run(&coordinator).await,
        Commands::Search(cmd) => cmd.run(&coordinator),
        Commands::Pantry(cmd) => cmd.run(&coordinator),
        Commands::Categories(cmd) => cmd.run(&coordinator),
        Commands::Ingredients(cmd) => cmd.run(&coordinator),
        Commands::Status(cmd) => cmd.run(&coordinator, &config).await,
        Commands::Config(_) => Ok(()),
    };

    // Let the startup read finish so its notice and any seed upload are not lost
    if let Err(e) = hydration.await {
        tracing::warn!("Hydration task failed: {}", e);
    }
    if let Some(notice) = coordinator.take_notice() {
        eprintln!("{}", notice);
    }
    coordinator.shutdown().await;

    result
}
