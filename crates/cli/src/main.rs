mod console;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Result,
    clap::Parser,
    tokio::io::{AsyncBufReadExt, BufReader},
    tracing::{info, warn},
    tracing_subscriber::EnvFilter,
};

use {
    lapak_auto_reply::{Dispatcher, SendQueue},
    lapak_catalog::Catalog,
    lapak_channels::ChannelOutbound,
    lapak_common::types::InboundMessage,
    lapak_state::{CooldownStore, ExcludeStore, QrisCache},
};

use crate::console::ConsoleOutbound;

#[derive(Parser)]
#[command(name = "lapak", about = "Lapak — WhatsApp auto-reply storefront bot")]
struct Cli {
    /// Path to the config file (overrides discovery).
    #[arg(long, env = "LAPAK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// JID attributed to bare-text stdin lines.
    #[arg(long, default_value = "628000000000@s.whatsapp.net")]
    peer: String,

    /// The session's own JID, used for owner recognition.
    #[arg(long)]
    self_jid: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = match &cli.config {
        Some(path) => lapak_config::load_config(path)?,
        None => lapak_config::discover_and_load(),
    };
    for finding in lapak_config::validate(&config) {
        warn!(finding = %finding, "config validation");
    }

    let config = Arc::new(config);
    let catalog = Arc::new(Catalog::build(
        &config.products,
        &config.icons,
        &config.matcher,
    ));
    info!(
        products = catalog.product_count(),
        aliases = catalog.alias_count(),
        "catalog ready"
    );

    let cooldowns = Arc::new(CooldownStore::load(
        &config.paths.cooldown_file,
        config.cooldowns.flush_debounce(),
    ));
    let excludes = Arc::new(ExcludeStore::load(&config.paths.exclude_file));
    let qris = Arc::new(QrisCache::load(
        &config.qris.template_path,
        &config.qris.image_path,
    ));
    let queue = Arc::new(SendQueue::new(config.rate_limit));
    let outbound: Arc<dyn ChannelOutbound> = Arc::new(ConsoleOutbound::new(cli.self_jid.clone()));

    let dispatcher = Dispatcher::new(
        Arc::clone(&config),
        catalog,
        Arc::clone(&cooldowns),
        excludes,
        qris,
        queue,
        outbound,
    );

    info!(peer = %cli.peer, "console session ready; type a message per line, ctrl-c to exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    let Some(msg) = parse_line(&line, &cli.peer) else {
                        continue;
                    };
                    dispatcher.handle(&msg).await;
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    cooldowns.force_flush();
    info!("cooldown ledger flushed, goodbye");
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// A stdin line is either a full JSON [`InboundMessage`], `jid<TAB>text`, or
/// bare text attributed to the default peer.
fn parse_line(line: &str, default_peer: &str) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with('{') {
        return match serde_json::from_str(line) {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!(error = %e, "ignoring malformed JSON line");
                None
            },
        };
    }

    Some(match line.split_once('\t') {
        Some((jid, text)) => InboundMessage::text(jid, text),
        None => InboundMessage::text(default_peer, line),
    })
}
