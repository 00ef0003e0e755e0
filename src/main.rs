use ring_crawler::config::{Config, usage};
use ring_crawler::crawler::service::RingCrawler;
use ring_crawler::crawler::types::{Anchor, Snapshot};
use ring_crawler::ring::udp::UdpRingClient;
use ring_crawler::snapshot::handlers::serve;
use ring_crawler::snapshot::publisher::{FilePublisher, SharedSnapshot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("ring-crawler");

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", usage(program));
        return Ok(());
    }

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("{}", usage(program));
            std::process::exit(1);
        }
    };

    tracing::info!("Anchor is {}", config.anchor);

    // 1. Ring client (UDP):
    let client = UdpRingClient::bind(config.bind, config.request_timeout).await?;
    client.clone().start().await;

    // 2. Publishers:
    let store = SharedSnapshot::new(Snapshot::empty(Anchor::new(config.anchor.clone())));
    let file = config.public_dir.clone().map(FilePublisher::new);
    if let Some(file) = &file {
        tracing::info!("Writing snapshots to {}", file.path().display());
    }

    // 3. Crawler driver:
    let (stop_tx, mut stop_rx) = tokio::sync::watch::channel(false);
    let mut crawler = RingCrawler::new(client, config.anchor.clone()).with_max_hops(config.max_hops);
    let publisher = (store.clone(), file);
    let period = config.poll_interval;
    let crawl_handle = tokio::spawn(async move {
        crawler
            .run(publisher, period, async move {
                let _ = stop_rx.changed().await;
            })
            .await;
    });

    // 4. HTTP server until Ctrl+C:
    let listener = tokio::net::TcpListener::bind(config.http).await?;
    tracing::info!("Press Ctrl+C to shutdown");

    serve(listener, store, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down");
    })
    .await?;

    let _ = stop_tx.send(true);
    crawl_handle.await?;

    Ok(())
}
