use std::path::Path;

use chrono::Utc;

use engram_ingest::IngestPipeline;
use engram_maintenance::RuleBasedSynthesizer;

use crate::context::AppContext;

/// `engram prune` — delete old low-value auto-extracted memories.
pub fn prune(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let vectors = ctx.vector_store();
    let report = engram_maintenance::prune(&store, &vectors, Utc::now())?;
    println!("pruned {} old low-value memories", report.pruned);
    Ok(())
}

/// `engram reindex` — rebuild the vector collection from the memory rows.
pub fn reindex(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let vectors = ctx.vector_store();
    let embedder = ctx.embedding_engine();
    let report = engram_maintenance::reindex(&store, &vectors, &embedder)?;
    println!("reindexed: {} success, {} failed", report.success, report.failed);
    Ok(())
}

/// `engram import-markdown <dir>` — one-shot legacy import.
pub fn import_markdown(ctx: &AppContext, dir: &Path) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let vectors = ctx.vector_store();
    let embedder = ctx.embedding_engine();
    let pipeline = IngestPipeline::new(&store, &vectors, &embedder);

    let migrated = pipeline.import_markdown(dir, Utc::now())?;
    println!("migrated {migrated} memories from markdown files");
    Ok(())
}

/// `engram digest` — regenerate the MEMORY.md working-memory document.
pub fn digest(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let synthesizer = RuleBasedSynthesizer;
    match engram_maintenance::regenerate_digest(
        &store,
        &synthesizer,
        &ctx.memory_md_path(),
        Utc::now(),
    )? {
        Some(chars) => println!("regenerated MEMORY.md ({chars} chars)"),
        None => println!("nothing to synthesize, keeping existing MEMORY.md"),
    }
    Ok(())
}
