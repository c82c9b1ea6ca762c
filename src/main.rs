use anyhow::Result;
use clap::Parser;
use proxyip_checker::config::{
    DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_IP_FILE, DEFAULT_TIMEOUT_SECS,
};
use proxyip_checker::{init_logger, run, Config};
use std::path::PathBuf;
use std::time::Duration;

/// Check a proxy list against a validation API and keep only alive proxies
#[derive(Parser)]
#[command(name = "proxyip-checker")]
#[command(about = "Check a proxy list against a validation API and keep only alive proxies")]
struct Cli {
    /// Input list (ip,port per line); rewritten with the alive proxies
    #[arg(long, env = "IP_FILE", default_value = DEFAULT_IP_FILE)]
    ip_file: PathBuf,

    /// Validation URL template with {ip} and {port} placeholders
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory for error.txt and the grouped JSON files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of concurrent checks
    #[arg(short = 'n', long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Timeout in seconds for each check
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config::new()
            .with_ip_file(cli.ip_file)
            .with_api_url(cli.api_url)
            .with_output_dir(cli.output_dir)
            .with_concurrency(cli.concurrency)
            .with_timeout(Duration::from_secs(cli.timeout))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let config: Config = Cli::parse().into();

    println!("Input list: {:?}", config.ip_file);
    println!(
        "Checking with {} concurrent requests, timeout: {}s",
        config.concurrency,
        config.timeout.as_secs()
    );
    println!("API URL: {}", config.api_url);
    println!();

    let summary = run(&config).await?;

    println!();
    println!(
        "Results: {} alive, {} dead out of {} ({}s)",
        summary.alive,
        summary.dead,
        summary.total,
        summary.elapsed().num_seconds()
    );
    for path in &summary.written {
        println!("Wrote {:?}", path);
    }
    for failure in &summary.failures {
        eprintln!("Error: {}", failure);
    }

    Ok(())
}
