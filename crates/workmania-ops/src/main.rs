use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use workmania_admin_client::{AdminClientConfig, PlatformAdminClient, ScrapingAction, cookies};

#[derive(Parser)]
#[command(name = "workmania-ops")]
#[command(about = "Rust replacements for the Workmania admin panel's scraping actions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the background scraping process for a platform
    #[command(name = "scraping:start")]
    ScrapingStart(ScrapingActionArgs),
    /// Stop the background scraping process for a platform
    #[command(name = "scraping:stop")]
    ScrapingStop(ScrapingActionArgs),
    /// Look up a cookie in the configured cookie store
    #[command(name = "cookie:get")]
    CookieGet(CookieGetArgs),
}

#[derive(Args)]
struct ScrapingActionArgs {
    /// Platform identifier as the backend knows it
    platform_id: String,
    #[arg(long)]
    api_base: Option<String>,
    /// Cookie store to authenticate with, in Cookie-header form
    #[arg(long)]
    cookie: Option<String>,
    #[arg(long)]
    csrf_cookie: Option<String>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Args)]
struct CookieGetArgs {
    name: String,
    /// Cookie store to search, in Cookie-header form
    #[arg(long)]
    cookie: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::ScrapingStart(args) => run_scraping(ScrapingAction::Start, args).await,
        Commands::ScrapingStop(args) => run_scraping(ScrapingAction::Stop, args).await,
        Commands::CookieGet(args) => run_cookie_get(args),
    }
}

async fn run_scraping(action: ScrapingAction, args: ScrapingActionArgs) -> Result<()> {
    let platform_id = non_empty(&args.platform_id).context("platform id cannot be empty")?;
    let config = resolve_config(args)?;
    let client = PlatformAdminClient::new(config).context("failed to build admin client")?;

    let payload = match action {
        ScrapingAction::Start => client.scraping_start(&platform_id).await,
        ScrapingAction::Stop => client.scraping_stop(&platform_id).await,
    }
    .with_context(|| {
        format!(
            "scraping {} failed for platform {platform_id}",
            action.as_str()
        )
    })?;

    tracing::info!(
        platform_id = %platform_id,
        action = action.as_str(),
        "scraping action accepted"
    );
    print_json(&payload)
}

fn resolve_config(args: ScrapingActionArgs) -> Result<AdminClientConfig> {
    let mut config = AdminClientConfig::from_env()
        .context("failed to load admin client config from environment")?;
    if let Some(base) = args.api_base.as_deref().and_then(non_empty) {
        config.base_url = base;
    }
    if let Some(cookie) = args.cookie {
        config.cookie_header = cookie.trim().to_string();
    }
    if let Some(name) = args.csrf_cookie.as_deref().and_then(non_empty) {
        config.csrf_cookie_name = name;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config)
}

fn run_cookie_get(args: CookieGetArgs) -> Result<()> {
    let store = match args.cookie {
        Some(value) => value,
        None => {
            AdminClientConfig::from_env()
                .context("failed to load admin client config from environment")?
                .cookie_header
        }
    };

    match cookies::cookie_value(&store, &args.name) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!("cookie not found: {}", args.name),
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}
