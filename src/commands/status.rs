//! Sync status of the running coordinator.

use clap::Args;

use what2cook::config::Config;
use what2cook::sync::SyncCoordinator;

/// Show remote sync status
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Wait for the startup read of the remote to finish first
    #[arg(long, short)]
    pub wait: bool,
}

impl StatusCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.wait {
            coordinator.wait_ready().await;
        }

        let status = coordinator.status();
        println!("Sync Status");
        println!("===========");
        println!();
        print!("{}", status);
        println!("Recipes: {}", coordinator.recipes().len());
        println!("Data dir: {}", coordinator.local().data_dir().display());

        if let Some(banner) = status.banner() {
            println!();
            println!("{}", banner);
            if !config.remote.is_configured() {
                println!();
                println!("To enable sync, add to your config file:");
                println!();
                println!("  remote:");
                println!("    url: \"https://your-project.supabase.co\"");
                println!("    key: \"your-anon-key\"");
                println!();
                println!("Or set environment variables:");
                println!("  W2C_REMOTE_URL");
                println!("  W2C_REMOTE_KEY");
            }
        } else {
            println!("Table: {}", config.remote.table);
        }

        Ok(())
    }
}
