use std::sync::Arc;

use log::info;

use webgpio::{GatewayConfig, GatewayServer, MacroRegistry, SimulatedPins};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEBGPIO_CONFIG").ok());
    let config = match config_path {
        Some(path) => GatewayConfig::load_from_file(&path)
            .unwrap_or_else(|e| panic!("Failed to load config: {e}")),
        None => GatewayConfig::default(),
    };

    let pins = Arc::new(SimulatedPins::new(config.pin_count, config.board_revision));

    let server = GatewayServer::start(&config, pins, MacroRegistry::new())
        .unwrap_or_else(|e| panic!("Failed to start server: {e}"));

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, shutting down");
    server.stop().await;

    Ok(())
}
