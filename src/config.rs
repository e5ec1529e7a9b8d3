//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// `PORTAL_DEBUG=1` raises the default log level to `DEBUG`.
    pub debug: bool,
    /// `PORTAL_WRITE_LOG`: file that log events are appended to.
    pub write_log: Option<String>,
    /// `PORTAL_NAME_PREFIX`: prefix for generated portal names.
    pub name_prefix: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("PORTAL_DEBUG"),
            write_log: env_string_opt("PORTAL_WRITE_LOG"),
            name_prefix: env_string_opt("PORTAL_NAME_PREFIX"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::EnvConfig;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_are_unset() {
        let _lock = env_lock();
        let _g1 = set_env_guard("PORTAL_DEBUG", None);
        let _g2 = set_env_guard("PORTAL_WRITE_LOG", None);
        let _g3 = set_env_guard("PORTAL_NAME_PREFIX", None);

        assert_eq!(EnvConfig::from_env(), EnvConfig::default());
    }

    #[test]
    fn env_values_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard("PORTAL_DEBUG", Some("1"));
        let _g2 = set_env_guard("PORTAL_WRITE_LOG", Some("/tmp/portal.log"));
        let _g3 = set_env_guard("PORTAL_NAME_PREFIX", Some("Sheet"));

        let config = EnvConfig::from_env();
        assert!(config.debug);
        assert_eq!(config.write_log.as_deref(), Some("/tmp/portal.log"));
        assert_eq!(config.name_prefix.as_deref(), Some("Sheet"));
    }

    #[test]
    fn debug_flag_requires_one() {
        let _lock = env_lock();
        let _g1 = set_env_guard("PORTAL_DEBUG", Some("true"));
        assert!(!EnvConfig::from_env().debug);
    }

    #[test]
    fn blank_values_are_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard("PORTAL_WRITE_LOG", Some(""));
        let _g2 = set_env_guard("PORTAL_NAME_PREFIX", Some("  "));
        let config = EnvConfig::from_env();
        assert!(config.write_log.is_none());
        assert!(config.name_prefix.is_none());
    }
}
