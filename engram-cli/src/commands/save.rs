use anyhow::bail;
use chrono::Utc;

use engram_core::traits::NullExtractor;
use engram_ingest::IngestPipeline;

use crate::context::AppContext;

/// First characters of the content echoed back in acknowledgements.
const ACK_PREFIX_LEN: usize = 50;

/// `engram save explicit` — content from `--content` or stdin.
pub fn explicit(
    ctx: &AppContext,
    who: &str,
    project: Option<&str>,
    content: Option<String>,
) -> anyhow::Result<()> {
    let input = match content {
        Some(c) => c.trim().to_string(),
        None => super::read_stdin()?,
    };
    if input.is_empty() {
        bail!("no content provided");
    }

    let store = ctx.open_store()?;
    let vectors = ctx.vector_store();
    let embedder = ctx.embedding_engine();
    let pipeline = IngestPipeline::new(&store, &vectors, &embedder);

    let outcome = pipeline.save_explicit(&input, who, project, Utc::now())?;
    let preview: String = outcome.memory.content.chars().take(ACK_PREFIX_LEN).collect();
    if outcome.embedded {
        println!("saved + embedded: {preview}...");
    } else {
        println!("saved (no embedding): {preview}...");
    }
    Ok(())
}

/// `engram save auto` — hook envelope JSON on stdin. Every failure path is
/// silent; the hook must never break a session teardown.
pub fn auto(ctx: &AppContext) -> anyhow::Result<()> {
    let input = super::read_stdin()?;
    if input.is_empty() {
        return Ok(());
    }

    let store = ctx.open_store()?;
    let vectors = ctx.vector_store();
    let embedder = ctx.embedding_engine();
    let pipeline = IngestPipeline::new(&store, &vectors, &embedder);

    // The transcript extractor is an external collaborator; without one
    // configured, the null extractor keeps this path a silent no-op.
    let extractor = NullExtractor;
    let saved = pipeline.save_auto(&input, &extractor, Utc::now())?;
    tracing::debug!(saved, "auto-save finished");
    Ok(())
}
