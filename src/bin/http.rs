use std::net::SocketAddr;

use ward_calendar::{
    AppConfig, WardRoster, load_roster_from_json,
    http_api::{self, AppState, ViewCounts},
    observability,
};

fn load_roster(config: &AppConfig) -> Result<WardRoster, Box<dyn std::error::Error>> {
    if let Some(path) = &config.storage.json_path {
        tracing::info!(path = %path.display(), "loading roster from json");
        return Ok(load_roster_from_json(path)?);
    }
    #[cfg(feature = "sqlite")]
    if let Some(path) = &config.storage.sqlite_path {
        use ward_calendar::{SqliteWardStore, WardStore};
        tracing::info!(path = %path.display(), "loading roster from sqlite");
        let store = SqliteWardStore::new(path)?;
        return match store.load_roster()? {
            Some(roster) => Ok(roster),
            None => {
                let roster = WardRoster::seeded();
                store.save_roster(&roster)?;
                tracing::info!(
                    wards = roster.len(),
                    "sqlite store was empty, seeded default wards"
                );
                Ok(roster)
            }
        };
    }
    tracing::info!("no storage configured, using default wards");
    Ok(WardRoster::seeded())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("WARD_CALENDAR_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref())?;
    observability::init_tracing(&config.log).map_err(|err| err.to_string())?;

    let addr: SocketAddr = config.http.addr.parse()?;
    let roster = load_roster(&config)?;
    let state = AppState::new(roster, config.schedule.clock()).with_counts(ViewCounts {
        summary: config.schedule.summary_count,
        detail: config.schedule.detail_count,
    });

    println!("ward-calendar HTTP API listening on http://{addr}");
    http_api::serve(addr, state).await?;
    Ok(())
}
