//! Shopscout application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the HTTP catalog backend
//! 3. Wire the storefront screen to a tokio timer scheduler and a channel sink
//! 4. Render sink events on stdout while reading commands from stdin

mod cli;
mod command;
mod render;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use shopscout_client::HttpBackend;
use shopscout_core::config::ShopscoutConfig;
use shopscout_core::events::ViewEvent;
use shopscout_session::{ChannelSink, ChatError, StorefrontScreen, TokioScheduler};

use cli::CliArgs;
use command::Command;

/// Print every visible sink event until the sending side is gone.
async fn render_loop(mut events: UnboundedReceiver<ViewEvent>) {
    while let Some(event) = events.recv().await {
        if let Some(text) = render::event(&event) {
            println!("{}", text);
        }
    }
}

/// Apply one parsed command. Returns `false` when the user asked to quit.
fn dispatch(screen: &StorefrontScreen, config: &ShopscoutConfig, command: Command) -> bool {
    match command {
        Command::Query(text) => screen.on_query_input(&text),
        Command::Category(category) => {
            if screen.set_category(category).is_none() {
                tracing::debug!(category = %category, "Category set without a search");
            }
        }
        Command::Price(range) => {
            let range = range.snap(config.search.price_step);
            if !range.is_ordered() {
                println!("note: min is above max, nothing will match");
            }
            screen.set_price_range(range);
        }
        Command::Chat(text) => match screen.send_chat(&text) {
            Ok(_) | Err(ChatError::EmptyMessage) => {}
            Err(e) => println!("chat: {}", e),
        },
        Command::Show => println!(
            "{}",
            render::snapshot(
                &screen.filters(),
                &screen.committed_query(),
                &screen.results(),
                &screen.transcript(),
            )
        ),
        Command::Help => println!("{}", command::HELP),
        Command::Quit => return false,
    }
    true
}

async fn run_repl(
    screen: &StorefrontScreen,
    config: &ShopscoutConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            return Ok(());
        };
        match Command::parse(&line) {
            Ok(command) => {
                if !dispatch(screen, config, command) {
                    return Ok(());
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = ShopscoutConfig::load_or_default(&config_file);
    config.api.base_url = args.resolve_api_url(&config.api.base_url);
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing goes to stderr; stdout belongs to the storefront view.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Shopscout v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Backend.
    let backend = match HttpBackend::from_config(&config.api) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(base_url = %config.api.base_url, error = %e, "Invalid backend URL");
            return Err(e.into());
        }
    };
    tracing::info!(
        search = %backend.search_url(),
        chat = %backend.chat_url(),
        "Catalog backend configured"
    );

    // Screen.
    let (sink, events) = ChannelSink::new();
    let renderer = tokio::spawn(render_loop(events));
    let scheduler = Arc::new(TokioScheduler::new()?);
    let screen = StorefrontScreen::new(&config, Arc::new(backend), Arc::new(sink), scheduler)?;

    println!("{}", command::HELP);
    run_repl(&screen, &config).await?;

    // Shutdown: stop pending commits, let in-flight requests settle, flush output.
    screen.teardown();
    screen.wait_idle().await;
    drop(screen);
    let _ = tokio::time::timeout(Duration::from_millis(250), renderer).await;

    tracing::info!("Shopscout stopped");
    Ok(())
}
