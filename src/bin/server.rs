//! pagedb Server Binary
//!
//! Starts the TCP server for pagedb.

use std::sync::Arc;

use clap::Parser;
use pagedb::network::Server;
use pagedb::{Config, Database, TableLocking};
use tracing_subscriber::{fmt, EnvFilter};

/// pagedb Server
#[derive(Parser, Debug)]
#[command(name = "pagedb-server")]
#[command(about = "Minimal paged relational storage engine")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./pagedb_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8888")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "256")]
    max_connections: usize,

    /// Read timeout per connection in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Disable per-table locking (concurrent writers to one table may corrupt it)
    #[arg(long)]
    no_table_locking: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pagedb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("pagedb Server v{}", pagedb::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    let locking = if args.no_table_locking {
        tracing::warn!("Per-table locking disabled");
        TableLocking::None
    } else {
        TableLocking::PerTable
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .table_locking(locking)
        .build();

    let database = match Database::open(config.clone()) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, database) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
