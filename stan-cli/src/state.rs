use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Per-user directory, `~/.stan`
pub fn stan_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".stan"))
}

pub fn ensure_stan_home() -> Result<PathBuf> {
    let dir = stan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
