use anyhow::Context;
use clap::Parser;
use placeholdr::{PlaceholderServer, ServerConfig};

/// Serve placeholder images such as `/hello/300x150.png`
#[derive(Parser, Debug)]
#[command(name = "placeholdr", version, about)]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Largest accepted width or height
    #[arg(long, default_value_t = placeholdr::request::DEFAULT_MAX_DIMENSION)]
    max_dimension: u32,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host,
            port: self.port,
            workers: self.workers.unwrap_or(defaults.workers),
            max_dimension: self.max_dimension,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = args.into_config();
    let server = PlaceholderServer::bind(&config)
        .with_context(|| format!("starting server on {}", config.bind_address()))?;
    server.run()?;
    Ok(())
}
