use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bingo::{
    cli::run_cli, config::DEFAULT_BIND, config::DEFAULT_REMOTE_URL, init_logging, AppState,
    BingoApi, BingoClient, HttpTransport, InMemoryService, ProxyClient, ServiceConfig,
};

use clap::Parser;
use log::LevelFilter;
use tokio::io::BufReader;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Serve the local proxy in front of the remote Bingo service.
    Serve {
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: SocketAddr,
        #[arg(long, default_value = DEFAULT_REMOTE_URL)]
        remote: String,
        #[arg(long, default_value_t = 15, help = "Per-request timeout in seconds")]
        timeout_secs: u64,
        #[arg(long, help = "Serve an offline in-memory game service instead of the remote one")]
        offline: bool,
    },
    /// Play in the terminal against the remote service or a running proxy.
    Play {
        #[arg(long, default_value = DEFAULT_REMOTE_URL)]
        remote: String,
        #[arg(long, help = "Go through a running proxy (e.g., --proxy http://127.0.0.1:3000)")]
        proxy: Option<String>,
        #[arg(long, default_value_t = 15, help = "Per-request timeout in seconds")]
        timeout_secs: u64,
    },
    /// Play in the terminal against an offline in-memory service.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            remote,
            timeout_secs,
            offline,
        } => {
            init_logging(LevelFilter::Info);
            let config = ServiceConfig::default()
                .with_remote_url(remote)
                .with_timeout(Duration::from_secs(timeout_secs))
                .with_bind(bind);
            let api: Arc<dyn BingoApi> = if offline {
                println!("Serving an offline game service");
                Arc::new(InMemoryService::new())
            } else {
                println!("Forwarding to {}", config.remote_url);
                Arc::new(HttpTransport::new(&config)?)
            };
            let listener = TcpListener::bind(config.bind).await?;
            println!("Proxy listening on http://{}", listener.local_addr()?);
            bingo::server::serve_on(listener, AppState::new(api)).await?;
        }
        Commands::Play {
            remote,
            proxy,
            timeout_secs,
        } => {
            init_logging(LevelFilter::Warn);
            let config = ServiceConfig::default()
                .with_remote_url(remote)
                .with_timeout(Duration::from_secs(timeout_secs));
            let api: Arc<dyn BingoApi> = match proxy {
                Some(url) => {
                    println!("Playing through proxy at {}", url);
                    Arc::new(ProxyClient::new(&url, &config)?)
                }
                None => {
                    println!("Playing against {}", config.remote_url);
                    Arc::new(HttpTransport::new(&config)?)
                }
            };
            let mut client = BingoClient::new(api);
            run_cli(&mut client, None, BufReader::new(tokio::io::stdin())).await?;
        }
        Commands::Local { seed } => {
            init_logging(LevelFilter::Warn);
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let service = Arc::new(match seed {
                Some(s) => InMemoryService::seeded(s),
                None => InMemoryService::new(),
            });
            let mut client = BingoClient::new(service.clone());
            run_cli(&mut client, Some(service), BufReader::new(tokio::io::stdin())).await?;
        }
    }
    Ok(())
}
