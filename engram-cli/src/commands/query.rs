use chrono::Utc;

use engram_retrieval::{HybridSearcher, SearchResult, Source};

use crate::context::AppContext;

/// `engram query <search>` — hybrid retrieval, human or JSON output.
pub fn run(ctx: &AppContext, search: &str, limit: usize, json: bool) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let vectors = ctx.vector_store();
    let embedder = ctx.embedding_engine();

    let searcher = HybridSearcher::new(&store, &vectors, &embedder, ctx.config.search.clone());
    let results = searcher.search(search, limit, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("no memories found");
        return Ok(());
    }
    for r in &results {
        print_result(r);
    }
    Ok(())
}

fn print_result(r: &SearchResult) {
    let tags = r
        .memory
        .tags
        .as_deref()
        .map(|t| format!(" [{t}]"))
        .unwrap_or_default();
    let pinned = if r.memory.pinned { " [pinned]" } else { "" };
    let source = match r.source {
        Source::Hybrid => "hybrid",
        Source::Vector => "vector",
        Source::Keyword => "keyword",
    };

    println!(
        "[{:.2}|{}] {}{}{}",
        r.hybrid_score, source, r.memory.content, tags, pinned
    );
    println!(
        "       type: {} | who: {} | project: {}",
        r.memory.memory_type,
        r.memory.who,
        r.memory.project.as_deref().unwrap_or("global")
    );
    println!(
        "       scores: vec={:.2} bm25={:.2} eff={:.2}",
        r.vector_score, r.bm25_score, r.eff_score
    );
    println!();
}
