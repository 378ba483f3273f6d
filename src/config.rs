//! Filepath: src/config.rs
//! Layered configuration: defaults < TOML file < environment < CLI flags.
//!
//! The process-wide instance is lazily built on first access and cached;
//! `reset` clears the cache so tests can rebuild against a different
//! environment. Any malformed file or env value is silently dropped in
//! favor of the existing default for that field (§7 config error policy).

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "PRECIS";
const APP_DIR_NAME: &str = "precis";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    pub weights: WeightsConfig,
    pub compression: CompressionConfig,
    pub text: TextConfig,
    pub io: IoConfig,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            weights: WeightsConfig::default(),
            compression: CompressionConfig::default(),
            text: TextConfig::default(),
            io: IoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig
{
    pub positional: f64,
    pub grep: f64,
    pub topology: f64,
}

impl Default for WeightsConfig
{
    fn default() -> Self
    {
        Self { positional: 0.3, grep: 1.0, topology: 0.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig
{
    pub default_budget: usize,
    pub min_line_chars: usize,
    pub temperature: f64,
    pub deduplicate: bool,
}

impl Default for CompressionConfig
{
    fn default() -> Self
    {
        Self { default_budget: 12_000, min_line_chars: 160, temperature: 0.5, deduplicate: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig
{
    pub section_score: f64,
    pub line_score: f64,
}

impl Default for TextConfig
{
    fn default() -> Self
    {
        Self { section_score: 0.6, line_score: 0.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig
{
    pub max_file_size: u64,
    pub head_bytes: u64,
    pub tail_bytes: u64,
}

impl Default for IoConfig
{
    fn default() -> Self
    {
        Self { max_file_size: 1024 * 1024, head_bytes: 512 * 1024, tail_bytes: 512 * 1024 }
    }
}

static CONFIG: Mutex<Option<Config>> = Mutex::new(None);

/// Load (building and caching on first call) the process-wide config.
#[must_use]
pub fn load_config() -> Config
{
    let mut guard = CONFIG.lock().expect("config mutex poisoned");

    if let Some(cfg) = guard.as_ref()
    {
        return cfg.clone();
    }

    let cfg = build_config();
    *guard = Some(cfg.clone());
    cfg
}

/// Clear the cached instance. Test-only escape hatch for isolation.
pub fn reset_config()
{
    *CONFIG.lock().expect("config mutex poisoned") = None;
}

fn build_config() -> Config
{
    let mut cfg = Config::default();
    apply_file(&mut cfg);
    apply_env(&mut cfg);
    cfg
}

fn config_path() -> Option<PathBuf>
{
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
    {
        if !xdg.is_empty()
        {
            return Some(PathBuf::from(xdg).join(APP_DIR_NAME).join("config.toml"));
        }
    }

    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config").join(APP_DIR_NAME).join("config.toml"))
}

fn apply_file(cfg: &mut Config)
{
    let Some(path) = config_path()
    else
    {
        return;
    };

    let Ok(text) = std::fs::read_to_string(&path)
    else
    {
        return;
    };

    if let Ok(parsed) = toml::from_str::<Config>(&text)
    {
        *cfg = parsed;
    }
    // Malformed TOML: keep whatever cfg already held (defaults).
}

fn apply_env(cfg: &mut Config)
{
    if let Some(v) = env_f64("W_POSITIONAL")
    {
        cfg.weights.positional = v;
    }
    if let Some(v) = env_f64("W_GREP")
    {
        cfg.weights.grep = v;
    }
    if let Some(v) = env_f64("W_TOPOLOGY")
    {
        cfg.weights.topology = v;
    }

    if let Some(v) = env_usize("DEFAULT_BUDGET")
    {
        cfg.compression.default_budget = v;
    }
    if let Some(v) = env_usize("MIN_LINE_CHARS")
    {
        cfg.compression.min_line_chars = v;
    }
    if let Some(v) = env_f64("TEMPERATURE")
    {
        cfg.compression.temperature = v;
    }
    if let Some(v) = env_bool("DEDUPLICATE")
    {
        cfg.compression.deduplicate = v;
    }

    if let Some(v) = env_f64("TEXT_SECTION_SCORE")
    {
        cfg.text.section_score = v;
    }
    if let Some(v) = env_f64("TEXT_LINE_SCORE")
    {
        cfg.text.line_score = v;
    }

    if let Some(v) = env_u64("MAX_FILE_SIZE")
    {
        cfg.io.max_file_size = v;
    }
    if let Some(v) = env_u64("HEAD_BYTES")
    {
        cfg.io.head_bytes = v;
    }
    if let Some(v) = env_u64("TAIL_BYTES")
    {
        cfg.io.tail_bytes = v;
    }
}

fn env_var(suffix: &str) -> Option<String>
{
    std::env::var(format!("{ENV_PREFIX}_{suffix}")).ok()
}

fn env_f64(suffix: &str) -> Option<f64>
{
    env_var(suffix)?.parse().ok()
}

fn env_usize(suffix: &str) -> Option<usize>
{
    env_var(suffix)?.parse().ok()
}

fn env_u64(suffix: &str) -> Option<u64>
{
    env_var(suffix)?.parse().ok()
}

fn env_bool(suffix: &str) -> Option<bool>
{
    let raw = env_var(suffix)?.to_lowercase();
    Some(matches!(raw.as_str(), "true" | "1" | "yes"))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::sync::Mutex as StdMutex;

    // Serializes tests that mutate process environment so they don't race.
    static ENV_LOCK: StdMutex<()> = StdMutex::new(());

    #[test]
    fn defaults_match_documented_values()
    {
        let cfg = Config::default();
        assert_eq!(cfg.weights.positional, 0.3);
        assert_eq!(cfg.weights.grep, 1.0);
        assert_eq!(cfg.weights.topology, 0.5);
        assert_eq!(cfg.io.max_file_size, 1024 * 1024);
        assert_eq!(cfg.io.head_bytes, 512 * 1024);
    }

    #[test]
    fn env_overrides_defaults_and_resets_cleanly()
    {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_config();
        std::env::set_var("PRECIS_W_GREP", "2.5");
        let cfg = load_config();
        assert_eq!(cfg.weights.grep, 2.5);

        std::env::remove_var("PRECIS_W_GREP");
        reset_config();
        let cfg = load_config();
        assert_eq!(cfg.weights.grep, 1.0);
    }

    #[test]
    fn malformed_env_value_falls_back_to_default()
    {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_config();
        std::env::set_var("PRECIS_DEFAULT_BUDGET", "not-a-number");
        let cfg = load_config();
        assert_eq!(cfg.compression.default_budget, 12_000);
        std::env::remove_var("PRECIS_DEFAULT_BUDGET");
        reset_config();
    }
}
