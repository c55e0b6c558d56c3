use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fx_price_simulator::app::config::Config;
use fx_price_simulator::app::server;
use fx_price_simulator::presentation::{chart::DEFAULT_TEXT_WIDTH, currency_label, render_report, result_lines, BarChart};
use fx_price_simulator::services::{
    OpenExchangeRatesClient, RateProvider, ServiceError, SimulatorService, StaticRateProvider,
};
use fx_price_simulator::utils::money::parse_amount;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fx-simulator", about = "FX impact simulator for costs and pricing")]
struct Cli {
    /// TOML file overriding environment configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare cost and sale price under the actual and a new exchange rate
    Quote {
        /// Cost per unit in the base currency
        #[arg(long, value_parser = parse_amount)]
        cost: Option<f64>,
        /// Target margin in percent
        #[arg(long, value_parser = parse_amount)]
        margin: Option<f64>,
        /// Actual exchange rate; skips the live lookup
        #[arg(long, value_parser = parse_amount)]
        actual_rate: Option<f64>,
        /// New exchange rate; defaults to the actual rate plus the configured offset
        #[arg(long, value_parser = parse_amount)]
        new_rate: Option<f64>,
        /// Never call the rate API
        #[arg(long)]
        no_fetch: bool,
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(path) = &cli.config {
        config = config
            .merge_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    config.validate()?;

    match cli.command {
        Command::Quote {
            cost,
            margin,
            actual_rate,
            new_rate,
            no_fetch,
            json,
        } => {
            let provider: Arc<dyn RateProvider> = if no_fetch {
                Arc::new(StaticRateProvider::failing())
            } else {
                Arc::new(OpenExchangeRatesClient::from_config(&config)?)
            };
            let service = SimulatorService::new(provider, &config);
            let request = service.build_request(cost, margin, actual_rate, new_rate);

            let report = match service.simulate(&request).await {
                Ok(report) => report,
                Err(e @ ServiceError::RateUnavailable(_)) => {
                    return Err(e).context("pass --actual-rate to supply the rate manually");
                }
                Err(e) => return Err(e.into()),
            };
            let chart = BarChart::from_report(&report, currency_label(&report.quote_currency));

            if json {
                let body = serde_json::json!({
                    "report": report,
                    "lines": result_lines(&report),
                    "chart": chart,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", render_report(&report));
                print!("{}", chart.render_text(DEFAULT_TEXT_WIDTH));
            }
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server_port);
            info!(
                "Starting FX simulator server on port {} ({}/{})",
                port, config.base_currency, config.quote_currency
            );

            let provider = Arc::new(OpenExchangeRatesClient::from_config(&config)?);
            let service = Arc::new(SimulatorService::new(provider, &config));
            server::serve(service, port).await?;
        }
    }

    Ok(())
}
