use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use stan_core::{CategoryMatcher, CategoryRule};
use stan_export::ExportFormat;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_stan_home, stan_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Used by `stan export` when no `--format` is given
    #[serde(default)]
    pub format: ExportFormat,
}

impl Config {
    pub fn category_matcher(&self) -> Result<CategoryMatcher> {
        Ok(CategoryMatcher::new(&self.categories)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(stan_home()?.join("config.toml"))
}

fn read_config(p: &Path) -> Result<Config> {
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Load `explicit` if given, else `~/.stan/config.toml` if present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        if !p.is_file() {
            bail!("config file not found: {}", p.display());
        }
        return read_config(p);
    }

    let p = config_path()?;
    if !p.exists() {
        log::debug!("no config at {}, using defaults", p.display());
        return Ok(Config::default());
    }
    read_config(&p)
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => ensure_stan_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_full_config() {
        let toml = r#"
[export]
format = "qif"

[[categories]]
name = "Groceries"
pattern = ".*(REWE|EDEKA).*"
max_amount = "0"

[[categories]]
name = "Salary"
pattern = "Gehalt.*"
min_amount = 100
"#;
        let cfg: Config = toml::from_str(toml).unwrap();
        assert_eq!(cfg.export.format, ExportFormat::Qif);
        assert_eq!(cfg.categories.len(), 2);
        assert_eq!(cfg.categories[0].max_amount, Some(Decimal::ZERO));
        assert_eq!(cfg.categories[1].min_amount, Some(Decimal::new(100, 0)));
        assert!(cfg.category_matcher().is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.export.format, ExportFormat::Json);
    }

    #[test]
    fn test_invalid_category_pattern_fails() {
        let cfg = Config {
            categories: vec![CategoryRule {
                name: "Broken".to_string(),
                pattern: "(".to_string(),
                min_amount: None,
                max_amount: None,
            }],
            ..Config::default()
        };
        let err = cfg.category_matcher().unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        init_config(Some(&p)).unwrap();
        assert_eq!(load_config(Some(&p)).unwrap(), Config::default());

        // A second init leaves the file alone.
        fs::write(&p, "[export]\nformat = \"ofx\"\n").unwrap();
        init_config(Some(&p)).unwrap();
        assert_eq!(load_config(Some(&p)).unwrap().export.format, ExportFormat::Ofx);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
