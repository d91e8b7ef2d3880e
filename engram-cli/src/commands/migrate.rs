use std::path::Path;

use engram_storage::Migrator;

use crate::context::AppContext;

fn migrator_for(dir: Option<&Path>) -> anyhow::Result<Migrator> {
    Ok(match dir {
        Some(dir) => Migrator::from_dir(dir)?,
        None => Migrator::builtin(),
    })
}

/// `engram migrate` — apply pending migrations.
pub fn run(ctx: &AppContext, dir: Option<&Path>) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let migrator = migrator_for(dir)?;

    let before = store.migration_status(&migrator)?.current_version;
    let applied = store.run_migrations(&migrator)?;
    let after = store.migration_status(&migrator)?.current_version;

    if applied == 0 {
        println!("no pending migrations (schema version {before})");
    } else {
        println!("applied {applied} migration(s), schema version {before} -> {after}");
    }
    Ok(())
}

/// `engram migrate status` — applied and pending migrations.
pub fn status(ctx: &AppContext, dir: Option<&Path>) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let migrator = migrator_for(dir)?;
    let status = store.migration_status(&migrator)?;

    println!("current schema version: {}", status.current_version);
    if !status.applied.is_empty() {
        println!("\napplied migrations:");
        for row in &status.applied {
            println!("  {}: {} ({})", row.version, row.applied_at, row.checksum);
        }
    }
    if status.pending.is_empty() {
        println!("\nno pending migrations");
    } else {
        println!("\npending migrations: {}", status.pending.len());
        for (version, name) in &status.pending {
            println!("  {version}: {name}");
        }
    }
    Ok(())
}
