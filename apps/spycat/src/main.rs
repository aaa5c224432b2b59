//! # Spycat - Spy Cat Agency Server
//!
//! The main binary for the Spycat mission registry.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for database and breed checks
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    apps/spycat (THE BINARY)                  │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐   │
//! │  │   CLI       │    │   HTTP API  │    │  Breed Catalog  │   │
//! │  │  (clap)     │    │   (axum)    │    │   (reqwest)     │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬────────┘   │
//! │         │                  │                    │            │
//! │         └──────────────────┼────────────────────┘            │
//! │                            ▼                                 │
//! │                    ┌───────────────┐                         │
//! │                    │  spycat-core  │                         │
//! │                    │  (THE RULES)  │                         │
//! │                    └───────────────┘                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! spycat server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! spycat status
//! spycat breeds --check Siamese
//! ```

use clap::Parser;
use spycat::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SPYCAT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SPYCAT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "spycat=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Spycat startup banner.
fn print_banner() {
    println!(
        r#"
   /\_/\   ███████╗██████╗ ██╗   ██╗ ██████╗ █████╗ ████████╗
  ( o.o )  ██╔════╝██╔══██╗╚██╗ ██╔╝██╔════╝██╔══██╗╚══██╔══╝
   > ^ <   ███████╗██████╔╝ ╚████╔╝ ██║     ███████║   ██║
           ╚════██║██╔═══╝   ╚██╔╝  ██║     ██╔══██║   ██║
           ███████║██║        ██║   ╚██████╗██║  ██║   ██║
           ╚══════╝╚═╝        ╚═╝    ╚═════╝╚═╝  ╚═╝   ╚═╝

  Spy Cat Agency Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
