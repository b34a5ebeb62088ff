use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use trajectory_core::GoalCategory;

use crate::state::ensure_trajectory_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub goals: GoalsSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    /// Filter used when RUST_LOG is unset, e.g. "warn" or "trajectory_core=debug".
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoalsSection {
    /// Category for `goal add` when --category is not given.
    pub default_category: GoalCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSection {
    /// Print JSON instead of text.
    pub json: bool,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub async fn config_path() -> Result<PathBuf> {
    Ok(ensure_trajectory_home().await?.join("config.toml"))
}

pub async fn load_config() -> Result<Config> {
    let p = config_path().await?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p)
        .await
        .with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub async fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path().await?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s)
        .await
        .with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub async fn init_config() -> Result<()> {
    let p = config_path().await?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default()).await?;
    println!("Wrote {}", p.display());
    Ok(())
}
