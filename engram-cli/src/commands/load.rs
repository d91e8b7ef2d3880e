use chrono::Utc;

use engram_session::{PromptContextLoader, SessionStartLoader};

use crate::context::AppContext;

/// `engram load session-start` — emit the session-start context block.
pub fn session_start(ctx: &AppContext, project: Option<&str>) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let loader = SessionStartLoader::new(&store, &ctx.memory_md_path());
    let block = loader.load(project, Utc::now())?;
    println!("{block}");
    Ok(())
}

/// `engram load prompt` — emit per-prompt context from hook JSON on stdin.
/// Nothing relevant means no output at all.
pub fn prompt(ctx: &AppContext, project: Option<&str>) -> anyhow::Result<()> {
    let input = super::read_stdin()?;
    if input.is_empty() {
        return Ok(());
    }

    let store = ctx.open_store()?;
    let loader = PromptContextLoader::new(&store);
    if let Some(block) = loader.load(&input, project, Utc::now())? {
        println!("{block}");
    }
    Ok(())
}
