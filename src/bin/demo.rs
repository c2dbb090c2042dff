use std::sync::Arc;
use std::time::Duration;

use log::info;

use webgpio::{
    GatewayConfig, GatewayServer, MacroRegistry, PinController, PinFunction, SimulatedPins,
};

// Embedding example: the gateway serves requests on its own while this
// program keeps driving the pins.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = GatewayConfig {
        port: 8000,
        login: Some("admin".to_string()),
        password: Some("p@ssw0rd".to_string()),
        passwd_file: None,
        ..GatewayConfig::default()
    };

    let pins = Arc::new(SimulatedPins::new(config.pin_count, config.board_revision));

    let mut macros = MacroRegistry::new();
    macros.register("myMacro", |args: &[String]| {
        info!("myMacro({})", args.join(","));
        Some("OK".to_string())
    });

    let server = GatewayServer::start(&config, Arc::clone(&pins), macros)
        .unwrap_or_else(|e| panic!("Failed to start server: {e}"));

    pins.set_function(0, PinFunction::In)
        .unwrap_or_else(|e| panic!("Failed to configure pin 0: {e}"));
    pins.set_function(7, PinFunction::Out)
        .unwrap_or_else(|e| panic!("Failed to configure pin 7: {e}"));

    // Toggle GPIO 7 every 5 seconds until interrupted.
    loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(5)) => {
                let level = pins.read_value(7).unwrap_or(false);
                if let Err(e) = pins.write_value(7, !level) {
                    info!("Toggle failed: {e}");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    server.stop().await;
    let _ = pins.set_function(7, PinFunction::In);

    Ok(())
}
