use std::io;
use std::path::PathBuf;

use serial2_tokio::SerialPort;

pub const DEFAULT_PORT: &str = "/dev/ttyAMA0";
pub const DEFAULT_BAUD: u32 = 9600;

// Raw byte access to a serial line, 8N1 at the requested speed. No protocol
// on top; embedders drive it from their own loops.
pub struct Serial {
    port: SerialPort,
}

impl Serial {
    pub fn open(path: &str, baud: u32) -> io::Result<Self> {
        Ok(Self {
            port: SerialPort::open(path, baud)?,
        })
    }

    pub fn open_default() -> io::Result<Self> {
        Self::open(DEFAULT_PORT, DEFAULT_BAUD)
    }

    pub async fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf).await
    }

    pub async fn write(&self, data: &[u8]) -> io::Result<usize> {
        self.port.write(data).await
    }

    pub fn available_ports() -> Vec<PathBuf> {
        SerialPort::available_ports().unwrap_or_default()
    }
}
