//! Environment mutation helpers for tests that exercise `Config::from_env`.

use std::sync::{Mutex, OnceLock};

/// Process-wide lock serializing environment mutation across test threads.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock` while tests mutate the environment.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Overrides one environment variable and restores the prior value on drop.
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` for the lifetime of the guard.
    pub fn set(key: &str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    /// Unset `key` for the lifetime of the guard.
    pub fn remove(key: &str) -> Self {
        Self::replace(key, None)
    }

    fn replace(key: &str, value: Option<&str>) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        write_var(self.key.as_str(), self.previous.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::{env_lock, EnvGuard};

    #[test]
    fn guard_restores_previous_value_and_absence() {
        let _lock = env_lock().lock().expect("env lock");
        let key = "LINKPASTE_TEST_ENV_GUARD";
        {
            let _outer = EnvGuard::set(key, "before");
            {
                let _inner = EnvGuard::set(key, "after");
                assert_eq!(std::env::var(key).ok().as_deref(), Some("after"));
            }
            assert_eq!(std::env::var(key).ok().as_deref(), Some("before"));
            {
                let _removed = EnvGuard::remove(key);
                assert!(std::env::var(key).is_err());
            }
            assert_eq!(std::env::var(key).ok().as_deref(), Some("before"));
        }
        assert!(std::env::var(key).is_err());
    }
}
