//! Interactive form mode: serve the upload form and return stamped ZIPs.

use photo_stamper_lib::app::SharedState;
use photo_stamper_lib::config::{self, AppConfig};
use photo_stamper_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    photo_stamper_lib::init_tracing();
    config::load_dotenv();

    let config = AppConfig::load()?;
    tracing::info!(
        max_width = config.max_width,
        crop = config.crop_height,
        font = %config.font_source(),
        "Starting photo stamp server"
    );
    let state = SharedState::new(config);

    let mut server_handle = tokio::spawn(server::start_server(state.clone()));

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );

    tokio::select! {
        result = &mut server_handle => {
            return result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
            state.shutdown_token().cancel();
        }
    }

    server_handle.await?
}
