use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tiberius::{AuthMethod, Config as TiberiusConfig};

use crate::types::DriverKind;

fn default_trust() -> bool {
    true
}

fn default_driver_version() -> String {
    "17".to_string()
}

/// Connection parameters for a SQL Server adapter.
///
/// Immutable once handed to [`MssqlAdapter::new`](crate::MssqlAdapter::new).
/// `server` accepts the `host\instance` form; named instances are resolved
/// through the SQL Browser service on the direct path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MssqlConfig {
    /// Server address, optionally `host\instance`
    pub server: String,
    /// Database name
    pub database: String,
    /// SQL login user; when absent together with `password`, integrated
    /// security is selected
    #[serde(default)]
    pub user: Option<String>,
    /// SQL login password
    #[serde(default)]
    pub password: Option<String>,
    /// TCP port, defaults to 1433
    #[serde(default)]
    pub port: Option<u16>,
    /// Accept the server certificate without validation (default true)
    #[serde(default = "default_trust")]
    pub trust_server_certificate: bool,
    /// Explicit connection strategy; defaults to pooled when unset
    #[serde(default)]
    pub driver: Option<DriverKind>,
    /// Retained for configuration compatibility with ODBC-style descriptors;
    /// has no effect on the TDS connection itself
    #[serde(default = "default_driver_version")]
    pub driver_version: String,
    /// Free-form key/value pairs appended to the connection descriptor
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Attempt the direct strategy when pooled `init` fails
    #[serde(default)]
    pub fallback_to_direct: bool,
}

impl MssqlConfig {
    #[must_use]
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            user: None,
            password: None,
            port: None,
            trust_server_certificate: true,
            driver: None,
            driver_version: default_driver_version(),
            options: BTreeMap::new(),
            fallback_to_direct: false,
        }
    }

    #[must_use]
    pub fn builder(server: impl Into<String>, database: impl Into<String>) -> MssqlConfigBuilder {
        MssqlConfigBuilder {
            config: Self::new(server, database),
        }
    }

    /// Host portion of `server`, with any `\instance` suffix removed.
    #[must_use]
    pub fn host(&self) -> &str {
        match self.server.split_once('\\') {
            Some((host, _)) => host,
            None => &self.server,
        }
    }

    /// Instance portion of `server`, when given as `host\instance`.
    #[must_use]
    pub fn instance(&self) -> Option<&str> {
        self.server
            .split_once('\\')
            .map(|(_, instance)| instance)
            .filter(|i| !i.is_empty())
    }

    /// Effective TCP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(1433)
    }

    /// Effective connection strategy.
    #[must_use]
    pub fn resolved_driver(&self) -> DriverKind {
        self.driver.unwrap_or_default()
    }

    /// Whether integrated security applies (no SQL credentials supplied).
    #[must_use]
    pub fn integrated_security(&self) -> bool {
        self.user.is_none() || self.password.is_none()
    }

    /// Build a tiberius `Config` for the pooled strategy.
    #[must_use]
    pub fn to_tiberius_config(&self) -> TiberiusConfig {
        let mut config = TiberiusConfig::new();
        config.host(self.host());
        config.port(self.port());
        config.database(&self.database);
        if let Some(instance) = self.instance() {
            config.instance_name(instance);
        }
        if let (Some(user), Some(password)) = (&self.user, &self.password) {
            config.authentication(AuthMethod::sql_server(user, password));
        }
        // Without SQL credentials the driver default applies and the login
        // proceeds as integrated security.
        if self.trust_server_certificate {
            config.trust_cert();
        }
        config
    }

    /// Build the ADO-style connection descriptor used by the direct strategy.
    ///
    /// Extra `options` entries are appended verbatim; whether the driver
    /// honors an unknown key is its own concern, matching how descriptor
    /// strings behave elsewhere.
    #[must_use]
    pub fn to_ado_string(&self) -> String {
        let mut descriptor = match self.instance() {
            Some(instance) => format!("Server=tcp:{}\\{},{}", self.host(), instance, self.port()),
            None => format!("Server=tcp:{},{}", self.host(), self.port()),
        };
        descriptor.push_str(&format!(";Database={}", self.database));
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => {
                descriptor.push_str(&format!(";User Id={user};Password={password}"));
            }
            _ => descriptor.push_str(";IntegratedSecurity=true"),
        }
        descriptor.push_str(&format!(
            ";TrustServerCertificate={}",
            self.trust_server_certificate
        ));
        for (key, value) in &self.options {
            descriptor.push_str(&format!(";{key}={value}"));
        }
        descriptor
    }
}

/// Fluent builder for [`MssqlConfig`].
#[derive(Debug, Clone)]
pub struct MssqlConfigBuilder {
    config: MssqlConfig,
}

impl MssqlConfigBuilder {
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    #[must_use]
    pub fn trust_server_certificate(mut self, trust: bool) -> Self {
        self.config.trust_server_certificate = trust;
        self
    }

    #[must_use]
    pub fn driver(mut self, driver: DriverKind) -> Self {
        self.config.driver = Some(driver);
        self
    }

    #[must_use]
    pub fn driver_version(mut self, version: impl Into<String>) -> Self {
        self.config.driver_version = version.into();
        self
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn fallback_to_direct(mut self, fallback: bool) -> Self {
        self.config.fallback_to_direct = fallback;
        self
    }

    #[must_use]
    pub fn finish(self) -> MssqlConfig {
        self.config
    }
}
