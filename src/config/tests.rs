use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_bookline_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("BOOKLINE_CONFIG_PATH", "/tmp/bookline-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/bookline-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("bookline")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("bookline")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.engine.tick_interval_ms, 250);
    assert_eq!(s.checkpoint.interval_ms, 1000);
    assert!(s.library.extensions.iter().any(|e| e == "m4b"));
    assert_eq!(s.logging.filter, "info");
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.engine.tick_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.engine.volume_max = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.engine.initial_volume = 2.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.checkpoint.interval_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[engine]
tick_interval_ms = 100
volume_max = 2.0
initial_volume = 0.5

[checkpoint]
enabled = false
interval_ms = 5000

[library]
extensions = ["m4b"]
include_hidden = true

[logging]
filter = "bookline=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("BOOKLINE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("BOOKLINE__ENGINE__TICK_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.engine.tick_interval_ms, 100);
    assert_eq!(s.engine.volume_max, 2.0);
    assert_eq!(s.engine.initial_volume, 0.5);
    assert!(!s.checkpoint.enabled);
    assert_eq!(s.checkpoint.interval_ms, 5000);
    assert_eq!(s.library.extensions, vec!["m4b".to_string()]);
    assert!(s.library.include_hidden);
    assert_eq!(s.logging.filter, "bookline=debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[engine]
tick_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("BOOKLINE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("BOOKLINE__ENGINE__TICK_INTERVAL_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.engine.tick_interval_ms, 40);
}
