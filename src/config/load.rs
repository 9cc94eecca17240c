use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `BOOKLINE__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("BOOKLINE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Basic sanity checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.engine.tick_interval_ms == 0 {
            return Err("engine.tick_interval_ms must be >= 1".to_string());
        }
        if !(self.engine.volume_max > 0.0) {
            return Err("engine.volume_max must be > 0".to_string());
        }
        if !(0.0..=self.engine.volume_max).contains(&self.engine.initial_volume) {
            return Err("engine.initial_volume must be within [0, engine.volume_max]".to_string());
        }
        if self.checkpoint.interval_ms == 0 {
            return Err("checkpoint.interval_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `BOOKLINE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BOOKLINE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/bookline/config.toml`
/// or `~/.config/bookline/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("bookline").join("config.toml"))
}
