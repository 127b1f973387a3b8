use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covidlens::{AppState, ChartQuery, Dashboard, DashboardConfig, build_router};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "covidlens")]
#[command(about = "COVID-19 Europe dashboard data service")]
struct Cli {
    /// Dataset URL or local CSV path
    #[arg(long, global = true)]
    source: Option<String>,
    /// Continent to keep
    #[arg(long, global = true)]
    region: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard API (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write summary, catalog and all views as JSON files
    Export {
        #[arg(long)]
        out: PathBuf,
        /// Countries to include; repeat or comma-separate. All when omitted.
        #[arg(long)]
        countries: Vec<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Print the summary cards
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = DashboardConfig::from_env().context("failed to load configuration")?;
    if let Some(source) = cli.source {
        config = config.source(&source);
    }
    if let Some(region) = cli.region {
        config = config.region(&region);
    }

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config = config.host(&host);
            }
            if let Some(port) = port {
                config = config.port(port);
            }
            serve(config).await
        }
        Command::Export {
            out,
            countries,
            start_date,
            end_date,
        } => {
            let dashboard = load(&config).await?;
            let mut pairs: Vec<(String, String)> = countries
                .into_iter()
                .map(|c| ("countries".to_string(), c))
                .collect();
            pairs.extend(start_date.map(|d| ("start_date".to_string(), d)));
            pairs.extend(end_date.map(|d| ("end_date".to_string(), d)));

            let written = dashboard
                .export(&ChartQuery::from_pairs(&pairs), &out)
                .await
                .with_context(|| format!("failed to export to {}", out.display()))?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Summary => {
            let dashboard = load(&config).await?;
            let summary = serde_json::to_string_pretty(&dashboard.summary())
                .context("failed to render summary")?;
            println!("{summary}");
            Ok(())
        }
    }
}

async fn load(config: &DashboardConfig) -> Result<Dashboard> {
    Dashboard::load(config)
        .await
        .with_context(|| format!("failed to load dataset from {}", config.source))
}

async fn serve(config: DashboardConfig) -> Result<()> {
    let dashboard = load(&config).await?;
    let app = build_router(AppState::new(dashboard));

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "dashboard api started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("covidlens=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
