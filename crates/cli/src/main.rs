use anyhow::Context;
use clap::{Parser, Subcommand};

use libris_app::{app::shutdown_signal, App};
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "LIBRIS books service")]
struct Cli {
    /// Environment overlay to load (overrides LIBRIS_ENV)
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and run the HTTP server (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match cli.env.as_deref() {
        Some(env) => Settings::load_for(env),
        None => Settings::load(),
    }
    .with_context(|| "failed to load LIBRIS settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)?;
            println!("{rendered}");
        }
        Command::Migrate => {
            libris_telemetry::init(&settings.telemetry)?;
            let app = App::bootstrap(settings).await?;
            let applied = app.migrate().await?;
            tracing::info!(applied, "migrate finished");
            app.pool().close().await;
        }
        Command::Serve => {
            libris_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "libris serve starting");
            App::bootstrap(settings)
                .await?
                .serve(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}
