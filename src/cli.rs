//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`LogLevel`] - Log verbosity for the tracing subscriber
//! - [`parse_channel_id`] - Channel link/id parsing shared with library users
//!
//! Anything not given on the command line (credentials, channel, directory
//! name) is prompted for interactively by the binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{ApiConfig, DEFAULT_API_BASE_URL, ExportConfig};
use crate::error::{ExportError, Result};
use crate::gateway::MESSAGES_PAGE_LIMIT;
use crate::snowflake::Snowflake;

/// Export a Discord channel's messages, member names, emojis, stickers and
/// attachments into a local directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdump")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatdump
    chatdump https://discord.com/channels/81384788765712384/381887113391505410
    chatdump 381887113391505410 --name rust-help -o ./archive
    chatdump 381887113391505410 --token \"$DISCORD_TOKEN\" --no-input")]
pub struct Args {
    /// Channel link or channel id (prompted for when omitted)
    pub channel: Option<String>,

    /// Directory under which the export folder is created
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Name of the export folder (default: the channel id)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Account login (email or phone); prompted for when omitted
    #[arg(short, long)]
    pub login: Option<String>,

    /// Use an existing session token instead of logging in
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Messages requested per page
    #[arg(long, value_name = "N", default_value_t = MESSAGES_PAGE_LIMIT,
          value_parser = clap::value_parser!(u8).range(1..=MESSAGES_PAGE_LIMIT as i64))]
    pub page_size: u8,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Never prompt; fail when a required value is missing
    #[arg(long)]
    pub no_input: bool,

    /// Log level for diagnostic output on stderr
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Suppress progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the export configuration from the parsed flags.
    pub fn export_config(&self) -> ExportConfig {
        let mut api = ApiConfig::new()
            .with_base_url(self.api_base.clone())
            .with_timeout_secs(self.timeout)
            .with_page_limit(self.page_size);
        if let Some(agent) = &self.user_agent {
            api = api.with_user_agent(agent.clone());
        }

        ExportConfig::new()
            .with_output_root(self.output.clone())
            .with_api(api)
    }
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages (request URLs).
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter level.
    pub fn to_filter_string(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Extracts the channel id from a channel link or a bare id.
///
/// Links look like `https://discord.com/channels/<guild>/<channel>`; the last
/// path segment is the channel.
///
/// ```rust
/// use chatdump::cli::parse_channel_id;
///
/// let id = parse_channel_id("https://discord.com/channels/1/381887113391505410")?;
/// assert_eq!(id.get(), 381887113391505410);
/// assert_eq!(parse_channel_id("42")?.get(), 42);
/// # Ok::<(), chatdump::ExportError>(())
/// ```
pub fn parse_channel_id(input: &str) -> Result<Snowflake> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ExportError::invalid_channel(input, "empty channel link"));
    }

    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let last = last.split(['?', '#']).next().unwrap_or(last);
    last.parse()
        .map_err(|_| ExportError::invalid_channel(input, "last path segment is not a channel id"))
}
