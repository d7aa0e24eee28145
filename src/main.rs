//! # chatdump CLI
//!
//! Command-line interface for the chatdump library.

use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use dialoguer::{Input, Password};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chatdump::assets::AssetKind;
use chatdump::cli::{Args, parse_channel_id};
use chatdump::config::ApiConfig;
use chatdump::export::{ExportSummary, Exporter, create_export_dir};
use chatdump::gateway::{HttpGateway, login};
use chatdump::progress::{no_progress, stderr_progress};
use chatdump::{ExportError, Snowflake};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        if e.is_auth() {
            eprintln!(
                "❌ Login failed. Please verify that your login and password are correct and try again."
            );
        }
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ExportError> {
    let total_start = Instant::now();
    let config = args.export_config();

    println!("📦 chatdump v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let token = match &args.token {
        Some(token) => token.clone(),
        None => {
            let token = prompt_login(args, &config.api)?;
            println!("🔓 Login successful");
            token
        }
    };
    let gateway = HttpGateway::new(&config.api, &token)?;

    let channel_input = match &args.channel {
        Some(channel) => channel.clone(),
        None if args.no_input => {
            return Err(ExportError::invalid_channel("", "no channel given"));
        }
        None => prompt_text("Channel link", None)?,
    };
    let channel = parse_channel_id(&channel_input)?;

    let export_dir = choose_export_dir(args, &config.output_root, channel)?;
    println!("📖 Channel: {}", channel);
    println!("📂 Output:  {}", export_dir.display());
    println!();

    let progress = if args.quiet {
        no_progress()
    } else {
        stderr_progress()
    };
    let summary = Exporter::new(&gateway, &gateway)
        .with_cdn(config.cdn.clone())
        .with_progress(progress)
        .run(channel, &export_dir)?;

    print_summary(&summary, total_start);
    Ok(())
}

/// Asks for credentials and exchanges them for a session token.
fn prompt_login(args: &Args, api: &ApiConfig) -> Result<String, ExportError> {
    if args.no_input {
        return Err(ExportError::auth(0, "no --token given and prompting is disabled"));
    }

    println!("Please log into Discord");
    let user = match &args.login {
        Some(user) => user.clone(),
        None => prompt_text("Discord login", None)?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(prompt_error)?;

    login(api, &user, &password)
}

/// Picks and creates `<root>/<name>`, re-prompting while the name is taken.
fn choose_export_dir(
    args: &Args,
    root: &Path,
    channel: Snowflake,
) -> Result<PathBuf, ExportError> {
    if let Some(name) = &args.name {
        return create_export_dir(root, name);
    }
    if args.no_input {
        return create_export_dir(root, &channel.to_string());
    }

    let mut name = prompt_text("Output directory", Some(channel.to_string()))?;
    while root.join(&name).exists() {
        let prompt = format!(
            "Directory '{}' already exists. Please provide another name",
            root.join(&name).display()
        );
        name = prompt_text(&prompt, Some(name))?;
    }
    create_export_dir(root, &name)
}

fn prompt_text(prompt: &str, default: Option<String>) -> Result<String, ExportError> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default);
    }
    let value = input.interact_text().map_err(prompt_error)?;
    Ok(value.trim().to_string())
}

fn prompt_error(err: dialoguer::Error) -> ExportError {
    ExportError::Io(io::Error::other(err.to_string()))
}

fn print_summary(summary: &ExportSummary, started: Instant) {
    println!();
    println!("✅ Export completed! Your data can be found here:");
    let directory = summary
        .directory
        .canonicalize()
        .unwrap_or_else(|_| summary.directory.clone());
    println!("   {}", directory.display());

    println!();
    println!("📊 Summary:");
    if let Some(name) = &summary.channel.name {
        println!("   Channel:     {}", name);
    }
    println!("   Messages:    {}", summary.messages);
    if let (Some(first), Some(last)) = (summary.first_message, summary.last_message) {
        if let (Some(from), Some(to)) = (first.created_at(), last.created_at()) {
            println!(
                "   Range:       {} → {}",
                from.format("%Y-%m-%d"),
                to.format("%Y-%m-%d")
            );
        }
    }
    println!("   Authors:     {}", summary.authors);
    for kind in AssetKind::ALL {
        let label = format!("{}:", kind.stage());
        println!("   {:<13}{}", label, summary.assets.files(kind));
    }

    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", started.elapsed().as_secs_f64());
    println!("   Downloaded:  {} bytes", summary.assets.bytes);
}

/// Installs a stderr tracing subscriber. `RUST_LOG` overrides `--log-level`.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.to_filter_string()));

    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(io::stderr);

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
    {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}
