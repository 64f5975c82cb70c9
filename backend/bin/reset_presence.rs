use anyhow::Result;
use clap::{Arg, Command};
use social_presence::db::{get_db_pool, presence, DatabaseConfig};
use social_presence::utils::init_logging;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("reset-presence")
        .about("Delete every user_status row, marking all users offline")
        .arg(
            Arg::new("confirm")
                .long("confirm")
                .help("Confirm the reset (required; without it only the row count is shown)")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;
    info!("Connected to database");

    let count_before = presence::count_statuses(&pool).await?;
    info!("Presence rows before reset: {}", count_before);

    if !matches.get_flag("confirm") {
        warn!("Reset not confirmed. Use --confirm to delete all presence rows.");
        return Ok(());
    }

    let deleted = presence::delete_all_statuses(&pool).await?;
    info!("Deleted {} presence rows", deleted);

    let count_after = presence::count_statuses(&pool).await?;
    if count_after != 0 {
        // clients connecting mid-reset re-insert their rows
        error!("{} presence rows present after reset", count_after);
    }

    Ok(())
}
