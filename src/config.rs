/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub sound: bool,
    /// Where log output goes. `None` disables logging.
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Milliseconds per engine tick. Game logic is expressed in ticks, so
    /// this rescales real-time speed uniformly.
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub action: Vec<String>,
    pub decline: Vec<String>,
    pub stop: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_action")]
    action: Vec<String>,
    #[serde(default = "default_decline")]
    decline: Vec<String>,
    #[serde(default = "default_stop")]
    stop: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_sound")]
    sound: bool,
    #[serde(default)]
    log_file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 10 }

fn default_action() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_decline() -> Vec<String> { vec!["B".into()] }
fn default_stop() -> Vec<String> { vec!["Select".into()] }
fn default_sound() -> bool { true }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            action: default_action(),
            decline: default_decline(),
            stop: default_stop(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            sound: default_sound(),
            log_file: String::new(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/stacker`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        GameConfig::load_from(&candidate_dirs())
    }

    /// First readable `config.toml` in `search_dirs`, or defaults.
    ///
    /// Runs before the logger exists, so problems go straight to stderr.
    fn load_from(search_dirs: &[PathBuf]) -> Self {
        for dir in search_dirs {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match GameConfig::parse(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        break;
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
        GameConfig::from_toml(TomlConfig::default())
    }

    /// Parse config text directly, without the search or the fallback.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        // A zero period would spin the ticker thread.
        let tick_rate_ms = cfg.speed.tick_rate_ms.max(1);
        let log_file = if cfg.general.log_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(cfg.general.log_file))
        };

        GameConfig {
            speed: SpeedConfig { tick_rate_ms },
            gamepad: GamepadConfig {
                action: cfg.gamepad.action,
                decline: cfg.gamepad.decline,
                stop: cfg.gamepad.stop,
            },
            sound: cfg.general.sound,
            log_file,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/stacker");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
