//! Connection settings and the builder that validates them.

use std::time::Duration;

use crate::client::Client;
use crate::error::RconError;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Validated settings for a [`Client`].
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub password: String,
    /// Bounds the connect and every single packet read or write.
    pub timeout: Duration,
}

impl Config {
    /// `host:port`, as handed to the resolver.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for [`Client`]. Range checks happen in the setters; required
/// fields are checked by [`build`](Self::build).
///
/// ```no_run
/// use rconlink::client::Client;
///
/// # fn main() -> Result<(), rconlink::error::RconError> {
/// let client = Client::builder()
///     .host("localhost")
///     .port(25575)?
///     .password("secret")
///     .timeout_ms(10_000)?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    password: Option<String>,
    timeout_ms: u64,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            password: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Port 0 cannot be connected to and is rejected.
    pub fn port(mut self, port: u16) -> Result<Self, RconError> {
        if port == 0 {
            return Err(RconError::Configuration(
                "port must be between 1 and 65535".into(),
            ));
        }
        self.port = Some(port);
        Ok(self)
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Result<Self, RconError> {
        if timeout_ms == 0 {
            return Err(RconError::Configuration(
                "timeout must be greater than 0".into(),
            ));
        }
        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    pub fn build_config(self) -> Result<Config, RconError> {
        let host = match self.host {
            Some(host) if !host.trim().is_empty() => host,
            _ => return Err(RconError::Configuration("host must be specified".into())),
        };

        let password = match self.password {
            Some(password) if !password.trim().is_empty() => password,
            _ => {
                return Err(RconError::Configuration(
                    "password must be specified".into(),
                ))
            }
        };
        if password.contains('\0') {
            return Err(RconError::Configuration(
                "password cannot contain NUL bytes".into(),
            ));
        }

        let port = self
            .port
            .ok_or_else(|| RconError::Configuration("port must be specified".into()))?;

        Ok(Config {
            host,
            port,
            password,
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }

    /// Builds a disconnected TCP client. Call
    /// [`connect`](crate::client::Client::connect) to open the connection.
    pub fn build(self) -> Result<Client, RconError> {
        Ok(Client::from_config(self.build_config()?))
    }
}
