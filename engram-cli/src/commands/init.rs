use crate::context::AppContext;

/// `engram init` — create the database (schema via migrations) and the
/// vector collection.
pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let _store = ctx.open_store()?;
    println!(
        "database initialized at {}",
        ctx.config.database_path(&ctx.agents_home).display()
    );

    let vectors = ctx.vector_store();
    let stats = vectors.stats();
    if stats.available {
        println!("vector collection initialized at {}", stats.path);
    } else {
        eprintln!(
            "vector collection unavailable ({}); continuing in keyword-only mode",
            stats.error.unwrap_or_default()
        );
    }
    Ok(())
}
