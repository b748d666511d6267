use clap::Parser;
use colored::*;
use git_wrapped::api::{start_server, AppState};
use git_wrapped::cli::Cli;
use git_wrapped::{Aggregator, CacheStore, GitHubClient};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "git-wrapped".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let client = Arc::new(GitHubClient::new(
        &cli.api_base_url,
        cli.github_token.clone(),
        cli.request_timeout(),
    )?);

    if client.has_token() {
        println!("✅ GitHub token configured, using the contributions API");
    } else {
        println!("{}", "No GITHUB_TOKEN set, contribution counts will be estimated".yellow());
    }

    let cache = Arc::new(CacheStore::new(cli.cache_ttl(), cli.cache_capacity));
    println!(
        "🗄️  Cache: ttl {}s, capacity {}",
        cli.cache_ttl_secs, cli.cache_capacity
    );

    let aggregator = Arc::new(Aggregator::new(client, cache));

    println!("📡 Serving on port {}", cli.port);
    println!("\nPress Ctrl+C to stop the server\n");

    start_server(AppState::new(aggregator), cli.port).await?;

    println!("\n✅ Server stopped");
    Ok(())
}
