//! HTTP server configuration loaded via OrthoConfig.

use std::net::{AddrParseError, IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 3001;
/// Interface bound when none is configured.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Frontend origin allowed when none is configured.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Raw settings layered from CLI flags, `BACKEND_*` variables and config
/// files.
///
/// `BACKEND_CORS_ORIGINS` takes a single origin or a comma-separated list.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BACKEND")]
pub struct ServerSettings {
    /// TCP port to listen on.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// IP address of the interface to bind.
    pub host: Option<String>,
    /// Origins allowed to call the API from a browser.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// Return the configured port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Return the configured host, falling back to the default.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the allowed origins, falling back to the local frontend.
    ///
    /// Blank entries are ignored.
    #[must_use]
    pub fn cors_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
        if origins.is_empty() {
            vec![DEFAULT_CORS_ORIGIN.to_owned()]
        } else {
            origins
        }
    }
}

/// Errors raised while turning [`ServerSettings`] into a [`ServerConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerConfigError {
    /// The host is not an IP address.
    #[error("invalid bind host `{host}`: {source}")]
    InvalidHost {
        /// Rejected host text.
        host: String,
        /// Parser failure.
        #[source]
        source: AddrParseError,
    },
}

/// Validated configuration for creating the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Construct a server configuration from explicit parts.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr, cors_origins: Vec<String>) -> Self {
        Self {
            bind_addr,
            cors_origins,
        }
    }

    /// Validate loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`ServerConfigError::InvalidHost`] when the host is not an IP
    /// address.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, ServerConfigError> {
        let host = settings.host();
        let ip: IpAddr = host.parse().map_err(|source| ServerConfigError::InvalidHost {
            host: host.to_owned(),
            source,
        })?;
        Ok(Self::new(
            SocketAddr::new(ip, settings.port()),
            settings.cors_origins(),
        ))
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Origins the CORS middleware accepts.
    #[must_use]
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_args(args: &[&str]) -> ServerSettings {
        let argv = std::iter::once("backend")
            .chain(args.iter().copied())
            .map(OsString::from);
        ServerSettings::load_from_iter(argv).expect("config should load")
    }

    fn clear_env() -> [(&'static str, Option<String>); 3] {
        [
            ("BACKEND_PORT", None),
            ("BACKEND_HOST", None),
            ("BACKEND_CORS_ORIGINS", None),
        ]
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(clear_env());

        let settings = load_from_args(&[]);
        let config = ServerConfig::from_settings(&settings).expect("defaults are valid");

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3001");
        assert_eq!(config.cors_origins(), ["http://localhost:3000"]);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("BACKEND_PORT", Some("8080".to_owned())),
            ("BACKEND_HOST", Some("127.0.0.1".to_owned())),
            (
                "BACKEND_CORS_ORIGINS",
                Some("https://app.example, ,https://admin.example".to_owned()),
            ),
        ]);

        let settings = load_from_args(&[]);
        let config = ServerConfig::from_settings(&settings).expect("overrides are valid");

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.cors_origins(),
            ["https://app.example", "https://admin.example"]
        );
    }

    #[rstest]
    fn a_single_origin_is_accepted_from_the_environment() {
        let _guard = lock_env([
            ("BACKEND_PORT", None),
            ("BACKEND_HOST", None),
            (
                "BACKEND_CORS_ORIGINS",
                Some("https://only.example".to_owned()),
            ),
        ]);

        let settings = load_from_args(&[]);

        assert_eq!(settings.cors_origins(), ["https://only.example"]);
        assert_eq!(settings.port(), DEFAULT_PORT);
    }

    #[rstest]
    fn command_line_flags_are_respected() {
        let _guard = lock_env(clear_env());

        let settings = load_from_args(&["--port", "9090", "--host", "127.0.0.1"]);
        let config = ServerConfig::from_settings(&settings).expect("flags are valid");

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9090");
    }

    #[rstest]
    #[case("localhost")]
    #[case("0.0.0.0:80")]
    fn non_ip_hosts_are_rejected(#[case] host: &str) {
        let settings = ServerSettings {
            host: Some(host.to_owned()),
            ..ServerSettings::default()
        };

        let err = ServerConfig::from_settings(&settings).expect_err("host is not an IP");

        assert!(matches!(
            err,
            ServerConfigError::InvalidHost { host: ref rejected, .. } if rejected == host
        ));
    }

    #[rstest]
    fn ipv6_hosts_are_accepted() {
        let settings = ServerSettings {
            port: 9000,
            host: Some("::1".to_owned()),
            cors_origins: Vec::new(),
        };

        let config = ServerConfig::from_settings(&settings).expect("ipv6 host");

        assert_eq!(config.bind_addr().to_string(), "[::1]:9000");
    }

    #[rstest]
    fn blank_origin_lists_fall_back_to_the_frontend() {
        let settings = ServerSettings {
            cors_origins: vec![" ".to_owned()],
            ..ServerSettings::default()
        };

        assert_eq!(settings.cors_origins(), [DEFAULT_CORS_ORIGIN]);
    }
}
