use super::config::{CliConfig, Command, TokenKind};
use anyhow::{Context, bail};
use core::time::Duration;
use forum_id::{
    CursorWindow, Generator, Identifier, IdentifierGenerator, MemoryStore, MonotonicClock,
    SliceQuery, ThreadRandom, TokenGenerator,
};
use serde_json::json;
use std::io::Write;

/// Runs the configured subcommand, writing its output to `out`.
///
/// # Errors
///
/// Any generator, cursor, or pagination error, plus I/O errors from `out`.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Mint { count } => mint(config, *count, out),
        Command::Token { kind } => token(config, *kind, out),
        Command::Inspect { cursor } => inspect(config, cursor, out),
        Command::Page {
            rows,
            limit,
            after,
            before,
        } => page(config, *rows, *limit, after.clone(), before.clone(), out),
    }
}

fn identifier_generator(
    config: &CliConfig,
) -> anyhow::Result<IdentifierGenerator<MonotonicClock, ThreadRandom>> {
    let clock = MonotonicClock::with_epoch(config.epoch);
    IdentifierGenerator::with_layout(config.layout, config.unit, clock, ThreadRandom)
        .context("failed to build identifier generator")
}

fn mint(config: &CliConfig, count: usize, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = identifier_generator(config)?;
    for _ in 0..count {
        let id = generator.next()?;
        writeln!(out, "{id}")?;
    }
    tracing::debug!(count, "minted identifiers");
    Ok(())
}

fn token(config: &CliConfig, kind: TokenKind, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = match kind {
        TokenKind::Session => TokenGenerator::session(MonotonicClock::with_epoch(config.epoch))?,
        TokenKind::SignIn => TokenGenerator::sign_in_code()?,
        TokenKind::Anonymous => TokenGenerator::anonymous_handle()?,
    };
    writeln!(out, "{}", generator.next()?)?;
    Ok(())
}

fn inspect(config: &CliConfig, cursor: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let id = Identifier::parse(cursor).with_context(|| format!("malformed cursor {cursor:?}"))?;

    let layout = config.layout;
    let total = layout.total_bits();
    if total < u64::BITS && id.to_raw() >> total != 0 {
        bail!("cursor {cursor:?} sets bits above the {total}-bit layout");
    }

    let timestamp = layout.timestamp(id);
    let unit_ms = config.unit.as_millis() as u64;
    let created_at = config.epoch + Duration::from_millis(timestamp.saturating_mul(unit_ms));

    let fields = json!({
        "cursor": id,
        "raw": id.to_raw(),
        "timestamp": timestamp,
        "counter": layout.counter(id),
        "random": layout.random(id),
        "createdAtMs": created_at.as_millis() as u64,
    });
    serde_json::to_writer_pretty(&mut *out, &fields)?;
    writeln!(out)?;
    Ok(())
}

fn page(
    config: &CliConfig,
    rows: usize,
    limit: usize,
    after: Option<String>,
    before: Option<String>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let generator = identifier_generator(config)?;
    let store = (0..rows)
        .map(|_| generator.next())
        .collect::<Result<MemoryStore<Identifier>, _>>()?;

    // No cursor at all means "start from the newest row".
    let after = if after.is_none() && before.is_none() {
        Some(String::new())
    } else {
        after
    };
    let query = SliceQuery {
        before,
        after,
        limit,
    };

    tracing::info!(rows = store.len(), ?query, "fetching page");
    let page = CursorWindow::new().fetch(&store, &query)?;

    serde_json::to_writer_pretty(&mut *out, &page)?;
    writeln!(out)?;
    Ok(())
}
