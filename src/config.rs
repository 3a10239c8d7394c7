use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory all served content lives under
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Address to bind to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// `max-age` sent with file downloads (in seconds)
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: u64,

    /// Title shown on HTML pages
    #[serde(default = "default_title")]
    pub title: String,

    /// Extra extension to content type mappings, e.g. `log = "text/plain"`
    #[serde(default)]
    pub mime_overrides: HashMap<String, String>,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./ftp_folder")
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    13939
}

fn default_cache_max_age() -> u64 {
    365 * 24 * 60 * 60 // one year
}

fn default_title() -> String {
    "File Browser".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            bind: default_bind(),
            port: default_port(),
            cache_max_age: default_cache_max_age(),
            title: default_title(),
            mime_overrides: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply command line / environment overrides on top of file values.
    pub fn with_overrides(
        mut self,
        root_dir: Option<PathBuf>,
        bind: Option<String>,
        port: Option<u16>,
    ) -> Self {
        if let Some(root_dir) = root_dir {
            self.root_dir = root_dir;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Create the root directory if missing and return its canonical form.
    pub fn prepare_root(&self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.root_dir)?;
        let root_dir = self.root_dir.canonicalize()?;
        if !root_dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Root path is not a directory: {}", root_dir.display()),
            ));
        }
        Ok(root_dir)
    }
}
