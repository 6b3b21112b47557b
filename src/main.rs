use clap::Parser;
use source_profiler::{api::start_server, config::load_config, logger::init_logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "source-profiler", version, about)]
struct Cli {
    /// Optional config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config file and environment
    #[arg(long)]
    bind: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.bind.as_deref())?;

    init_logging(config.log_format);

    info!(bind = %config.bind_address, "Starting source profiler");

    start_server(config).await
}
