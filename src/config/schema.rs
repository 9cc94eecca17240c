use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/bookline/config.toml` or `~/.config/bookline/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `BOOKLINE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub checkpoint: CheckpointSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// How often the engine reports its position while playing (milliseconds).
    pub tick_interval_ms: u64,
    /// Upper bound for the volume scale; 1.0 is unity gain.
    pub volume_max: f64,
    /// Volume applied at startup.
    pub initial_volume: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            volume_max: 1.0,
            initial_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckpointSettings {
    /// Emit `update_work_time` while a book is playing.
    pub enabled: bool,
    /// Interval between checkpoints (milliseconds).
    pub interval_ms: u64,
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as book parts (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp4".into(),
                "mp3".into(),
                "m4a".into(),
                "m4b".into(),
                "wav".into(),
            ],
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
