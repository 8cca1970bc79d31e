//! Shell configuration
//!
//! Read from the JSON file named by `CD_SHELL_CONFIG`, or `cd-shell.json` in
//! the working directory. Every field is optional; missing fields fall back to
//! the built-in disc.

use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{DEFAULT_VOLUME, Track, default_tracks};

const CONFIG_ENV: &str = "CD_SHELL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "cd-shell.json";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub tracks: Vec<Track>,
    pub initial_volume: f32,
    /// Track length reported by the simulated media output
    pub simulated_track_secs: u64,
    pub game: GameConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            tracks: default_tracks(),
            initial_volume: DEFAULT_VOLUME,
            simulated_track_secs: 180,
            game: GameConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory served under `cd-content://localhost/`
    pub content_root: PathBuf,
    /// Entry document of the embedded content
    pub entry: String,
    /// Files the entry document pulls in once it starts running
    pub assets: Vec<String>,
    /// External runtime hosting the content, if any
    pub runtime: Option<RuntimeCommand>,
    /// Diagnostic substrings that indicate a content load failure
    pub error_patterns: Vec<String>,
    /// Delay between reveal and the start of error sniffing
    pub sniff_delay_ms: u64,
    pub loading: LoadingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("game"),
            entry: "index.html".to_string(),
            assets: ["index.js", "index.wasm", "index.pck"]
                .into_iter()
                .map(String::from)
                .collect(),
            runtime: None,
            error_patterns: ["CORS", "WebAssembly", "wasm", "Cross-Origin"]
                .into_iter()
                .map(String::from)
                .collect(),
            sniff_delay_ms: 3000,
            loading: LoadingConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn sniff_delay(&self) -> Duration {
        Duration::from_millis(self.sniff_delay_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub engine_step: u8,
    pub engine_period_ms: u64,
    pub engine_settle_ms: u64,
    pub disc_period_ms: u64,
    pub disc_settle_ms: u64,
    pub total_bytes: u64,
    pub read_min_bytes: u64,
    pub read_max_bytes: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            engine_step: 2,
            engine_period_ms: 50,
            engine_settle_ms: 500,
            disc_period_ms: 100,
            disc_settle_ms: 800,
            total_bytes: 37_686_550,
            read_min_bytes: 200_000,
            read_max_bytes: 700_000,
        }
    }
}

impl LoadingConfig {
    pub fn engine_period(&self) -> Duration {
        Duration::from_millis(self.engine_period_ms)
    }

    pub fn engine_settle(&self) -> Duration {
        Duration::from_millis(self.engine_settle_ms)
    }

    pub fn disc_period(&self) -> Duration {
        Duration::from_millis(self.disc_period_ms)
    }

    pub fn disc_settle(&self) -> Duration {
        Duration::from_millis(self.disc_settle_ms)
    }

    fn normalize(&mut self) {
        let defaults = Self::default();
        if self.engine_step == 0 {
            tracing::warn!("engine_step must be positive, using default");
            self.engine_step = defaults.engine_step;
        }
        if self.engine_period_ms == 0 {
            tracing::warn!("engine_period_ms must be positive, using default");
            self.engine_period_ms = defaults.engine_period_ms;
        }
        if self.disc_period_ms == 0 {
            tracing::warn!("disc_period_ms must be positive, using default");
            self.disc_period_ms = defaults.disc_period_ms;
        }
        if self.read_max_bytes == 0 {
            tracing::warn!("read_max_bytes must be positive, using default");
            self.read_max_bytes = defaults.read_max_bytes;
        }
        if self.read_min_bytes > self.read_max_bytes {
            tracing::warn!(
                min = self.read_min_bytes,
                max = self.read_max_bytes,
                "Read rate bounds inverted, swapping"
            );
            std::mem::swap(&mut self.read_min_bytes, &mut self.read_max_bytes);
        }
    }
}

impl ShellConfig {
    /// Load the configuration from the environment-selected file, if any
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::info!("No config file found, using built-in disc");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::info!(path = %path.display(), tracks = config.tracks.len(), "Config loaded");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        if !self.initial_volume.is_finite() {
            tracing::warn!("initial_volume is not a number, using default");
            self.initial_volume = DEFAULT_VOLUME;
        }
        self.initial_volume = self.initial_volume.clamp(0.0, 1.0);
        if self.simulated_track_secs == 0 {
            self.simulated_track_secs = Self::default().simulated_track_secs;
        }
        if self.tracks.is_empty() {
            tracing::warn!("Config has no tracks, the player will show an empty disc");
        }
        self.game.loading.normalize();
    }
}
