use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub preview_offset: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            preview_offset: goscope_core::preview::PREVIEW_LINE_OFFSET,
        }
    }
}

impl ServerConfig {
    /// Port precedence: flag, then `PORT`, then the default.
    pub fn resolve(flag_port: Option<u16>, static_dir: PathBuf) -> Self {
        let env_port = std::env::var(PORT_ENV).ok();
        Self::from_sources(flag_port, env_port.as_deref(), static_dir)
    }

    fn from_sources(flag_port: Option<u16>, env_port: Option<&str>, static_dir: PathBuf) -> Self {
        let port = flag_port
            .or_else(|| {
                env_port.and_then(|raw| match raw.trim().parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("ignoring invalid {} value '{}'", PORT_ENV, raw);
                        None
                    }
                })
            })
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            static_dir,
            ..Self::default()
        }
    }
}
