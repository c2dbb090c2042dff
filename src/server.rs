use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer};
use log::{error, info};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::macros::MacroRegistry;
use crate::pins::PinController;
use crate::routes::{self, AppState};

// Owns the serve loop. Construction binds the socket, so a taken port
// fails fast instead of surfacing once traffic arrives; the caller keeps
// its own thread for hardware work and stops the gateway explicitly.
pub struct GatewayServer {
    handle: ServerHandle,
    stopping: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl GatewayServer {
    pub fn start<P>(
        config: &GatewayConfig,
        pins: Arc<P>,
        macros: MacroRegistry,
    ) -> Result<Self, GatewayError>
    where
        P: PinController + 'static,
    {
        let state = AppState::new(config, pins, macros)?;
        let context = state.context.clone();

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new().configure(|cfg| routes::register(cfg, app_state.clone()))
        })
        .bind((config.host.as_str(), config.port))
        .map_err(|e| {
            GatewayError::Config(format!(
                "Failed to bind {}:{}: {e}",
                config.host, config.port
            ))
        })?;

        let addr = server
            .addrs()
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Config("No bound address".to_string()))?;

        let server = server.run();
        let handle = server.handle();
        let stopping = Arc::new(AtomicBool::new(false));

        info!(
            "{} Started at http://{}:{}{}",
            crate::SERVER_VERSION,
            advertised_host(&config.host),
            addr.port(),
            context
        );

        let deliberate = Arc::clone(&stopping);
        actix_web::rt::spawn(async move {
            if let Err(e) = server.await {
                // A requested stop can surface as an io error; only an
                // unexpected one is worth reporting.
                if !deliberate.load(Ordering::SeqCst) {
                    error!("{} Socket Error: {e}", crate::SERVER_VERSION);
                }
            }
            info!("{} Stopped", crate::SERVER_VERSION);
        });

        Ok(Self {
            handle,
            stopping,
            addr,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.handle.stop(false).await;
    }
}

// Address for the startup banner: route toward a public resolver without
// sending anything, then read the chosen local address.
fn advertised_host(bind_host: &str) -> String {
    let probe = || -> std::io::Result<String> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(("8.8.8.8", 53))?;
        Ok(socket.local_addr()?.ip().to_string())
    };
    probe().unwrap_or_else(|_| bind_host.to_string())
}
