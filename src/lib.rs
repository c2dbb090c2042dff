pub mod auth;
pub mod backend;
pub mod board;
pub mod command;
pub mod config;
pub mod error;
pub mod files;
pub mod macros;
pub mod pins;
pub mod routes;
pub mod serial;
pub mod server;

pub use auth::{AuthGate, encode_auth};
pub use backend::SimulatedPins;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use macros::MacroRegistry;
pub use pins::{PinController, PinError, PinFunction, Pulse, PulseKind};
pub use routes::AppState;
pub use serial::Serial;
pub use server::GatewayServer;

pub const SERVER_VERSION: &str = concat!("WebGPIO/Rust/", env!("CARGO_PKG_VERSION"));
