//! Storage and server configuration.

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use thiserror::Error;

use crate::{persist::assets::DEFAULT_ASSET_PREFIX, runtime::handle::RuntimeConfig};

/// Malformed configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Where collection documents and assets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding both documents and the image directory.
    pub data_dir: PathBuf,
    /// Messages document file name.
    pub messages_file: String,
    /// Products document file name.
    pub products_file: String,
    /// Image directory name under `data_dir`.
    pub images_dir: String,
    /// Prefix of asset references and of the URL they are served under.
    pub asset_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            messages_file: "messages.json".to_string(),
            products_file: "products.json".to_string(),
            images_dir: "images".to_string(),
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    /// Default layout rooted at `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the messages document.
    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(&self.messages_file)
    }

    /// Full path of the products document.
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(&self.products_file)
    }

    /// Full path of the image directory.
    pub fn images_path(&self) -> PathBuf {
        self.data_dir.join(&self.images_dir)
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Optional directory of static files served for unmatched paths.
    pub public_dir: Option<PathBuf>,
    /// Largest accepted request body, uploads included.
    pub max_body_bytes: usize,
    /// Storage layout.
    pub store: StoreConfig,
    /// Per-collection worker settings.
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            public_dir: None,
            max_body_bytes: 20 * 1024 * 1024,
            store: StoreConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads overrides from the process environment.
    ///
    /// `SHELFSTORE_BIND` takes a full socket address; otherwise `PORT` sets the
    /// port on all interfaces. `SHELFSTORE_DATA_DIR` and
    /// `SHELFSTORE_PUBLIC_DIR` set the storage root and static directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(value) = lookup("SHELFSTORE_BIND") {
            cfg.bind_addr = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "SHELFSTORE_BIND",
                value,
            })?;
        } else if let Some(value) = lookup("PORT") {
            let port: u16 = value
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value })?;
            cfg.bind_addr.set_port(port);
        }

        if let Some(dir) = lookup("SHELFSTORE_DATA_DIR") {
            cfg.store.data_dir = PathBuf::from(dir);
        }
        cfg.public_dir = lookup("SHELFSTORE_PUBLIC_DIR").map(PathBuf::from);

        Ok(cfg)
    }
}
