use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dashboard::{view, Dashboard, SearchState};
use metrics_client::MetricsClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// BullsEye: company metrics, price targets, and reasons to buy or avoid
#[derive(Debug, Parser)]
#[command(name = "bullseye", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the metrics report for one ticker
    Show {
        ticker: String,
        /// Print the raw metrics and narrative as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every tracked company with its margins and trends
    Screener,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bullseye=info,dashboard=info".into());

    // Logs go to stderr so reports on stdout stay clean
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let cli = Cli::parse();

    let client = MetricsClient::from_env().context("Failed to build HTTP client")?;
    tracing::info!(base_url = client.base_url(), "Using metrics backend");
    let dashboard = Dashboard::new(Arc::new(client));

    match cli.command {
        Command::Show { ticker, json } => {
            let state = dashboard.search(&ticker).await;
            match &state {
                SearchState::Succeeded { metrics, .. } if json => {
                    let narrative = dashboard.engine().evaluate(metrics);
                    let body = serde_json::json!({
                        "metrics": &**metrics,
                        "narrative": narrative,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                SearchState::Failed { message, .. } => bail!("{}", message),
                _ => print!("{}", view::render_state(&state, dashboard.engine())),
            }
        }
        Command::Screener => {
            let all = dashboard
                .load_screener()
                .await
                .context("Failed to load screener")?;
            print!("{}", view::render_screener(&all));
        }
    }

    Ok(())
}
