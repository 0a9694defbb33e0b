//! Configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOSTPROC` | `/proc` |
//! | `PIDMAP_PIN_PATH` | `/sys/fs/bpf/pidmap` |
//! | `PIDMAP_BPFTOOL` | `bpftool` |
//! | `PIDMAP_INTERVAL_MS` | `1000` |
//! | `PIDMAP_STORE` | `bpftool` (or `memory` for a dry run) |
//!
//! Empty variables count as unset.
use std::path::PathBuf;
use std::time::Duration;

use crate::scheduler::DEFAULT_INTERVAL;

pub const ENV_HOST_PROC: &str = "HOSTPROC";
pub const ENV_PIN_PATH: &str = "PIDMAP_PIN_PATH";
pub const ENV_BPFTOOL: &str = "PIDMAP_BPFTOOL";
pub const ENV_INTERVAL_MS: &str = "PIDMAP_INTERVAL_MS";
pub const ENV_STORE: &str = "PIDMAP_STORE";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value `{value}` for `{name}`: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Where the pid map is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// A pinned BPF map managed with `bpftool`.
    Bpftool,
    /// An in-process map, nothing is published to the kernel.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub proc_root: PathBuf,
    pub pin_path: PathBuf,
    pub bpftool: PathBuf,
    pub interval: Duration,
    pub store: StoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            pin_path: PathBuf::from("/sys/fs/bpf/pidmap"),
            bpftool: PathBuf::from("bpftool"),
            interval: DEFAULT_INTERVAL,
            store: StoreKind::Bpftool,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let mut config = Self::default();

        if let Some(proc_root) = get(ENV_HOST_PROC) {
            config.proc_root = PathBuf::from(proc_root);
        }
        if let Some(pin_path) = get(ENV_PIN_PATH) {
            config.pin_path = PathBuf::from(pin_path);
        }
        if let Some(bpftool) = get(ENV_BPFTOOL) {
            config.bpftool = PathBuf::from(bpftool);
        }
        if let Some(interval) = get(ENV_INTERVAL_MS) {
            config.interval = parse_interval(&interval)?;
        }
        if let Some(store) = get(ENV_STORE) {
            config.store = match store.as_str() {
                "bpftool" => StoreKind::Bpftool,
                "memory" => StoreKind::Memory,
                _ => {
                    return Err(Error::InvalidValue {
                        name: ENV_STORE,
                        value: store,
                        reason: "expected `bpftool` or `memory`",
                    });
                }
            };
        }

        Ok(config)
    }
}

fn parse_interval(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(Error::InvalidValue {
            name: ENV_INTERVAL_MS,
            value: value.to_owned(),
            reason: "interval must be positive",
        }),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => Err(Error::InvalidValue {
            name: ENV_INTERVAL_MS,
            value: value.to_owned(),
            reason: "expected a number of milliseconds",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.store, StoreKind::Bpftool);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (ENV_HOST_PROC, "/host/proc"),
            (ENV_PIN_PATH, "/sys/fs/bpf/test"),
            (ENV_BPFTOOL, "/usr/sbin/bpftool"),
            (ENV_INTERVAL_MS, "250"),
            (ENV_STORE, "memory"),
        ])
        .unwrap();
        assert_eq!(config.proc_root, PathBuf::from("/host/proc"));
        assert_eq!(config.pin_path, PathBuf::from("/sys/fs/bpf/test"));
        assert_eq!(config.bpftool, PathBuf::from("/usr/sbin/bpftool"));
        assert_eq!(config.interval, Duration::from_millis(250));
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config(&[(ENV_HOST_PROC, ""), (ENV_INTERVAL_MS, "")]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_interval() {
        for value in ["0", "soon", "-5"] {
            match config(&[(ENV_INTERVAL_MS, value)]).unwrap_err() {
                Error::InvalidValue { name, value: v, .. } => {
                    assert_eq!(name, ENV_INTERVAL_MS);
                    assert_eq!(v, value);
                }
            }
        }
    }

    #[test]
    fn test_invalid_store() {
        let err = config(&[(ENV_STORE, "redis")]).unwrap_err();
        assert!(err.to_string().contains("PIDMAP_STORE"));
    }
}
