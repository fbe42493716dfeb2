use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use physio_advisor::cli::Commands;
use physio_advisor::connector::adapter::{DEFAULT_API_HOST, DEFAULT_BASE_URL, DEFAULT_MODEL};
use physio_advisor::connector::api::http;
use physio_advisor::connector::{Container, ContainerConfig, Router};
use physio_advisor::domain::{
    RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_DELAY,
};

#[derive(Parser)]
#[command(name = "physio-advisor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use offline completion and media services instead of Workers AI and ExerciseDB
    #[arg(long, global = true)]
    mock: bool,

    #[arg(long, global = true, env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    cloudflare_api_token: Option<String>,

    #[arg(long, global = true, env = "CLOUDFLARE_ACCOUNT_ID")]
    cloudflare_account_id: Option<String>,

    #[arg(long, global = true, env = "CLOUDFLARE_MODEL", default_value = DEFAULT_MODEL)]
    cloudflare_model: String,

    #[arg(long, global = true, env = "CLOUDFLARE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    cloudflare_base_url: String,

    #[arg(long, global = true, env = "EXERCISEDB_API_KEY", hide_env_values = true)]
    exercisedb_api_key: Option<String>,

    #[arg(long, global = true, env = "EXERCISEDB_API_HOST", default_value = DEFAULT_API_HOST)]
    exercisedb_api_host: String,

    /// Override the ExerciseDB base URL (defaults to https://<api host>)
    #[arg(long, global = true, env = "EXERCISEDB_BASE_URL")]
    exercisedb_base_url: Option<String>,

    /// Attempts per recommendation, including the first
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    #[arg(long, global = true, default_value_t = DEFAULT_INITIAL_DELAY.as_millis() as u64)]
    initial_delay_ms: u64,

    #[arg(long, global = true, default_value_t = DEFAULT_BACKOFF_FACTOR)]
    backoff_factor: f64,

    /// Upper bound on a single backoff wait; 0 disables the cap
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DELAY.as_millis() as u64)]
    max_delay_ms: u64,

    /// Overall time budget for one recommendation, retries included
    #[arg(long, global = true)]
    max_elapsed_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn retry_policy(&self) -> RetryPolicy {
        let max_delay = (self.max_delay_ms > 0).then(|| Duration::from_millis(self.max_delay_ms));
        RetryPolicy::new()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_backoff_factor(self.backoff_factor)
            .with_max_delay(max_delay)
            .with_max_elapsed(self.max_elapsed_secs.map(Duration::from_secs))
    }

    fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            mock: self.mock,
            cloudflare_api_token: self.cloudflare_api_token.clone(),
            cloudflare_account_id: self.cloudflare_account_id.clone(),
            cloudflare_model: self.cloudflare_model.clone(),
            cloudflare_base_url: self.cloudflare_base_url.clone(),
            exercisedb_api_key: self.exercisedb_api_key.clone(),
            exercisedb_api_host: self.exercisedb_api_host.clone(),
            exercisedb_base_url: self.exercisedb_base_url.clone(),
            retry_policy: self.retry_policy(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(cli.container_config())?;
    debug!(
        "Retry policy: {:?}",
        container.recommend_use_case().policy()
    );

    match cli.command {
        Commands::Serve { port, public } => {
            let ip = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            info!("Starting recommendation service on {}", container.model_name());
            http::serve(&container, SocketAddr::new(ip, port)).await?;
        }
        command => {
            let shutdown = container.shutdown_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, cancelling");
                    shutdown.cancel();
                }
            });

            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
