//! Chore Wheel sweep driver.
//!
//! Run from cron. Loads configuration, connects to PostgreSQL, optionally
//! applies migrations, then runs one governance sweep for every house.
//!
//! Usage:
//!   chore-wheel [RFC3339 timestamp]
//!
//! The sweep runs at the given instant, or at the current time if omitted.
//! Configuration comes from `CHORE_WHEEL__*` environment variables (and
//! `.env`), e.g. `CHORE_WHEEL__DATABASE__URL`.

use chrono::{DateTime, Utc};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chore_wheel::adapters::postgres;
use chore_wheel::application::handlers::RunGovernanceSweepCommand;
use chore_wheel::config::AppConfig;
use chore_wheel::domain::foundation::Timestamp;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let registry = tracing_subscriber::registry().with(config.runtime.env_filter()?);
    if config.runtime.use_json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let now = match std::env::args().nth(1) {
        Some(raw) => {
            Timestamp::from_datetime(DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc))
        }
        None => Timestamp::now(),
    };

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let state = postgres::governance_state(pool, config.governance.clone());
    let sweep = state.run_governance_sweep_handler();

    let houses = state.houses.list().await?;
    info!(houses = houses.len(), now = %now, "Starting governance sweep");

    let mut failures = 0usize;
    for house in houses {
        let result = sweep
            .handle(RunGovernanceSweepCommand {
                house_id: house.id.clone(),
                now,
            })
            .await;
        if let Err(err) = result {
            failures += 1;
            error!(house_id = %house.id, error = %err, "Governance sweep failed");
        }
    }

    if failures > 0 {
        return Err(format!("governance sweep failed for {} house(s)", failures).into());
    }
    Ok(())
}
