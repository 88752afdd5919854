use clap::Parser;
use extup_cli::update;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "extup",
    version,
    about = "Update a project and every git repository under its extensions directory"
)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let _cli = Cli::parse();
    update::run().await
}
