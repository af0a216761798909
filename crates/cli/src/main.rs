use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Bookshelf record service
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the resolved configuration
    Config,
    /// Print the merged OpenAPI document
    Openapi,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(env = ?settings.environment, "bookshelf CLI serving");
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(bookshelf_app::run(settings))
        }
        Command::Config => {
            println!("{settings:#?}");
            Ok(())
        }
        Command::Openapi => {
            let registry = bookshelf_app::build_registry(&settings);
            let spec = bookshelf_http::router::openapi_spec(&registry, &settings.server.api_prefix);
            let rendered =
                serde_json::to_string_pretty(&spec).context("failed to render OpenAPI document")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
