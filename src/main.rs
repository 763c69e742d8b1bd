use tracing_subscriber::EnvFilter;

mod annotate;
mod cli;
mod config;
mod driver;
mod error;
mod fs;
mod parser;
mod rewrite;
mod server;
mod vcs;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() {
    let settings = match cli::parse_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[ERROR]: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(settings.log_level.as_tracing_filter()))
        .init();

    if let Err(e) = cli::run(settings).await {
        tracing::error!(error = %e, debug = ?e, "ostrich workflow failed");
        std::process::exit(1);
    }
}
