use serde_json::json;

use crate::context::AppContext;

/// `engram status` — provider, vector collection, and database health.
pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let embedder = ctx.embedding_engine();
    let vectors = ctx.vector_store();

    let report = json!({
        "embeddings": embedder.status(),
        "vectors": vectors.stats(),
        "memories": store.count()?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
