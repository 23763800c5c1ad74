use super::*;
use pretty_assertions::assert_eq;
use serial_test::serial;

// Sets env vars for the duration of a test and removes them on drop.
struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    fn new() -> Self {
        Self { keys: Vec::new() }
    }

    fn set(&mut self, key: &str, value: &str) {
        self.keys.push(key.to_string());
        // SAFETY: tests touching the environment are serialized.
        unsafe { env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            // SAFETY: tests touching the environment are serialized.
            unsafe { env::remove_var(key) };
        }
    }
}

#[test]
#[serial]
fn test_no_env_leaves_config_untouched() {
    let mut config = GatewayConfig::default();
    EnvLoader::new().apply(&mut config);
    assert_eq!(config, GatewayConfig::default());
}

#[test]
#[serial]
fn test_env_overrides_fields() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_DEFAULT_TIMEOUT, "30");
    guard.set(ENV_KILL_GRACE_SECS, "1");
    guard.set(ENV_RESTART_EXIT_CODE, "42");
    guard.set(ENV_LOG_FILE, "/tmp/gate.log");
    guard.set(ENV_LOG_LEVEL, "warn");

    let mut config = GatewayConfig::default();
    EnvLoader::new().apply(&mut config);

    assert_eq!(config.default_timeout_secs, 30);
    assert_eq!(config.kill_grace_secs, 1);
    assert_eq!(config.restart_exit_code, 42);
    assert_eq!(config.log_file, PathBuf::from("/tmp/gate.log"));
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.poll_interval_ms, 50);
}

#[test]
#[serial]
fn test_unparseable_value_is_ignored() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_POLL_INTERVAL_MS, "fast");

    let mut config = GatewayConfig::default();
    EnvLoader::new().apply(&mut config);
    assert_eq!(config.poll_interval_ms, 50);
}
