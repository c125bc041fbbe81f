use std::fmt;

pub mod client;
pub mod decode;
mod errors;
mod utils;

pub use client::StreamClient;
pub use errors::{Error, Result};

/// Upper bound on a single read from the connection, in bytes.
pub const READ_BUF_SIZE: usize = 1024;

/// Network address of the server to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        if port == 0 {
            return Err(Error::InvalidEndpoint(format!(
                "port must be in 1..=65535, got {port}"
            )));
        }

        Ok(Endpoint {
            host: host.into(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Closed,
}
