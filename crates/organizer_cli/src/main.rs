//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the store configured by `ORGANIZER_*` variables (or the path given
//!   as the first argument) and print a short health summary.
//! - Keep output deterministic for quick local sanity checks.

use organizer_core::{MetaRepository, Store, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut config = StoreConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.db_path = Some(path.into());
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("organizer error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("organizer_core ping={}", organizer_core::ping());
    println!("organizer_core version={}", organizer_core::core_version());

    let mut store = Store::open_with(config)?;
    if let Some((level, dir)) = organizer_core::logging_status() {
        println!("log level={level} dir={}", dir.display());
    }
    let location = config
        .db_path
        .as_ref()
        .map_or_else(|| ":memory:".to_string(), |path| path.display().to_string());
    println!("db path={location}");
    println!("db schema_version={}", store.schema_version()?);

    let created_at = store.meta().database_created_at()?;
    println!("db created_at={}", created_at.as_deref().unwrap_or("unknown"));

    let snapshot = store.export_snapshot()?;
    println!(
        "db people={} tasks={} appointments={} cash={} documents={}",
        snapshot.people.len(),
        snapshot.tasks.len(),
        snapshot.appointments.len(),
        snapshot.cash.len(),
        snapshot.documents.len()
    );

    let last_open = store.meta().get_meta("lastCliOpen")?;
    if let Some(value) = last_open {
        println!("cli last_open={value}");
    }
    store
        .meta()
        .set_meta("lastCliOpen", &organizer_core::now_iso().into())?;
    Ok(())
}
