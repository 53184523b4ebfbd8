use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use switchboard::actor::spawn_fetch_actor;
use switchboard::api::HttpConversationApi;
use switchboard::app::Console;
use switchboard::cache::{ChannelInfoStore, RealtimeCache};
use switchboard::config::Config;
use switchboard::conversation::Tab;
use switchboard::view::format_row;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,switchboard=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .map(|dir| dir.join("switchboard.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"switchboard - Conversation list for the support console

Usage: switchboard <command>

Commands:
    list [mine|unassigned|all] [query...]
                Show the first page of a tab, optionally filtered
    count       Show how many conversations wait for assignment
    help        Show this help message

Configuration file: ~/.config/switchboard/config.toml
Environment: SWITCHBOARD_TOKEN overrides api.token
"#
    );
}

/// Build a console wired to the configured backend.
fn connect(config: &Config) -> Result<Console> {
    let api = HttpConversationApi::new(&config.api)?;
    let channels = ChannelInfoStore::new(config.cache.max_channel_infos);
    let cache = Arc::new(RealtimeCache::new(config.cache.max_tracked_conversations));
    let fetcher = spawn_fetch_actor(Arc::new(api), Arc::new(channels));
    Ok(Console::new(config.sync.clone(), cache, fetcher))
}

async fn run_list(config: &Config, args: &[String]) -> Result<()> {
    let (tab, query) = match args.first() {
        Some(first) => match first.parse::<Tab>() {
            Ok(tab) => (tab, args[1..].join(" ")),
            Err(_) => (Tab::default(), args.join(" ")),
        },
        None => (Tab::default(), String::new()),
    };

    let mut console = connect(config)?;
    console.select_tab(tab);
    console.refresh_waiting_count();
    console.set_search_query(&query);
    console.settle().await;

    let view = console.view(tab);
    if let Some(ref e) = view.load_error {
        console.shutdown().await;
        anyhow::bail!("Failed to load {}: {}", tab, e);
    }

    println!("{} ({} waiting)", tab, view.waiting_count);
    if view.items.is_empty() {
        println!("  no conversations");
    }
    for record in &view.items {
        println!("{}", format_row(record));
    }
    if view.has_more {
        println!("  ... more available");
    }

    console.shutdown().await;
    Ok(())
}

async fn run_count(config: &Config) -> Result<()> {
    let mut console = connect(config)?;
    console.refresh_waiting_count();
    console.settle().await;
    println!("{}", console.waiting_count());
    console.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let command = match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") | None => {
            print_usage();
            return Ok(());
        }
        Some(cmd) => cmd,
    };

    if !matches!(command, "list" | "count") {
        eprintln!("Unknown command: {}", command);
        print_usage();
        std::process::exit(1);
    }

    Config::ensure_dirs().context("Failed to create config directory")?;
    setup_logging();

    let config = Config::load()?;

    match command {
        "list" => run_list(&config, &args[2..]).await,
        _ => run_count(&config).await,
    }
}
