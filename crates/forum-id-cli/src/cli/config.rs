use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use core::time::Duration;
use forum_id::{DEFAULT_EPOCH, Layout};

/// Runtime configuration for the `forum-id` binary.
///
/// The layout and clock settings must match the ones the backend mints with,
/// otherwise `inspect` decodes the right integer into the wrong fields. All
/// values are parsed from CLI arguments or environment variables (a `.env`
/// file is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "forum-id",
    version,
    about = "Mint forum identifiers and tokens, inspect cursors, and page through them"
)]
pub struct CliArgs {
    /// Epoch identifiers count ticks from, in milliseconds since 1970-01-01
    /// UTC.
    ///
    /// Environment variable: `FORUM_ID_EPOCH_MS`
    #[arg(long, global = true, env = "FORUM_ID_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Length of one timestamp tick in milliseconds.
    ///
    /// Environment variable: `FORUM_ID_UNIT_MS`
    #[arg(long, global = true, env = "FORUM_ID_UNIT_MS", default_value_t = 1)]
    pub unit_ms: u64,

    /// Width of the timestamp field in bits.
    ///
    /// Environment variable: `FORUM_ID_TIMESTAMP_BITS`
    #[arg(long, global = true, env = "FORUM_ID_TIMESTAMP_BITS", default_value_t = Layout::DEFAULT.timestamp_bits())]
    pub timestamp_bits: u32,

    /// Width of the per-tick counter field in bits.
    ///
    /// Environment variable: `FORUM_ID_COUNTER_BITS`
    #[arg(long, global = true, env = "FORUM_ID_COUNTER_BITS", default_value_t = Layout::DEFAULT.counter_bits())]
    pub counter_bits: u32,

    /// Width of the random tail in bits.
    ///
    /// Environment variable: `FORUM_ID_RANDOM_BITS`
    #[arg(long, global = true, env = "FORUM_ID_RANDOM_BITS", default_value_t = Layout::DEFAULT.random_bits())]
    pub random_bits: u32,

    /// Emit logs as JSON lines instead of human-readable text.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, global = true, env = "LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint identifiers and print one cursor per line.
    Mint {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Mint one opaque token.
    Token {
        #[arg(value_enum)]
        kind: TokenKind,
    },
    /// Decode a cursor into its layout fields.
    Inspect { cursor: String },
    /// Mint `rows` identifiers into an in-memory store and fetch one page.
    ///
    /// Without a cursor the page starts at the newest row.
    Page {
        #[arg(long, default_value_t = 10)]
        rows: usize,
        #[arg(long, default_value_t = 3)]
        limit: usize,
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        before: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Time-prefixed session token (31 symbols).
    Session,
    /// One-time sign-in code (8 symbols).
    SignIn,
    /// Anonymous per-thread handle (6 symbols).
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub epoch: Duration,
    pub unit: Duration,
    pub layout: Layout,
    pub log_json: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.unit_ms == 0 {
            bail!("FORUM_ID_UNIT_MS must be greater than 0");
        }

        let layout = Layout::new(args.timestamp_bits, args.counter_bits, args.random_bits)
            .with_context(|| {
                format!(
                    "invalid identifier layout {}/{}/{}",
                    args.timestamp_bits, args.counter_bits, args.random_bits
                )
            })?;

        if let Command::Page { rows, limit, .. } = &args.command {
            if *limit == 0 {
                bail!("--limit must be greater than 0");
            }
            if *rows > MAX_DEMO_ROWS {
                bail!("--rows ({rows}) exceeds the demo store size (max = {MAX_DEMO_ROWS})");
            }
        }

        Ok(Self {
            epoch: Duration::from_millis(args.epoch_ms),
            unit: Duration::from_millis(args.unit_ms),
            layout,
            log_json: args.log_json,
            command: args.command,
        })
    }
}

/// Upper bound on the rows `page` mints into memory.
pub const MAX_DEMO_ROWS: usize = 1_000_000;
