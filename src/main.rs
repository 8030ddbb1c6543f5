use clap::Parser;
use exchange_relay::utils::{logger, validation::Validate};
use exchange_relay::{ChatRelay, CliConfig, HttpCollector};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting exchange-relay");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let collector = HttpCollector::new(&config.backend_url);
    tracing::info!("📡 Forwarding exchanges to {}", collector.endpoint());

    let (deliveries, worker) =
        exchange_relay::spawn_delivery_worker(collector, config.queue_capacity);
    let mut relay = ChatRelay::new(config, deliveries);

    // The chat feed arrives one line at a time on stdin; every line is fed
    // through the relay in arrival order.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        relay.on_chat_line(&line, Instant::now());
    }

    // Stdin closed: let queued deliveries drain before exiting.
    drop(relay);
    worker.await?;

    tracing::info!("✅ Chat feed ended, exchange-relay shutting down");
    Ok(())
}
