use anyhow::Context;
use libris_app::{app::shutdown_signal, App};
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load LIBRIS settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "libris-app bootstrap starting"
    );

    let app = App::bootstrap(settings).await?;
    app.serve(shutdown_signal()).await
}
