//! `mutuals`: command-line client for a mutuals server.
//!
//! # Usage
//!
//! ```
//! mutuals --url http://localhost:8080 befriend a@x.com b@x.com
//! mutuals --config ~/.config/mutuals/config.toml friends a@x.com
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::ApiClient;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mutuals", about = "Command-line client for the mutuals API")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the mutuals server (default: http://localhost:8080).
  #[arg(long, env = "MUTUALS_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Register a new account.
  CreateAccount { email: String },
  /// Connect two accounts as friends.
  Befriend { a: String, b: String },
  /// List an account's friends.
  Friends { email: String },
  /// List the friends two accounts share.
  CommonFriends { a: String, b: String },
  /// Subscribe REQUESTOR to TARGET's updates.
  Subscribe { requestor: String, target: String },
  /// Block TARGET on behalf of REQUESTOR.
  Block { requestor: String, target: String },
  /// Show who would receive an update from SENDER.
  Recipients {
    sender: String,
    /// Update text; email addresses in it are added as recipients.
    #[arg(default_value = "")]
    text:   String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag (or `MUTUALS_URL`) over config file over the default.
fn resolve_url(flag: Option<String>, file_cfg: &ConfigFile) -> String {
  flag
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve_url(args.url, &file_cfg))?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::CreateAccount { email } => {
      let account = client.create_account(&email).await?;
      println!("{}\t{}", account.account_id, account.email);
    }
    Command::Befriend { a, b } => {
      client.befriend(&a, &b).await?;
      println!("{a} and {b} are now friends");
    }
    Command::Friends { email } => {
      let list = client.friends(&email).await?;
      print_list(&list.friends, list.count);
    }
    Command::CommonFriends { a, b } => {
      let list = client.common_friends(&a, &b).await?;
      print_list(&list.friends, list.count);
    }
    Command::Subscribe { requestor, target } => {
      client.subscribe(&requestor, &target).await?;
      println!("{requestor} is subscribed to {target}");
    }
    Command::Block { requestor, target } => {
      client.block(&requestor, &target).await?;
      println!("{requestor} blocked {target}");
    }
    Command::Recipients { sender, text } => {
      let list = client.recipients(&sender, &text).await?;
      print_list(&list.recipients, list.count);
    }
  }
  Ok(())
}

fn print_list(emails: &[String], count: usize) {
  for email in emails {
    println!("{email}");
  }
  eprintln!("({count} total)");
}
