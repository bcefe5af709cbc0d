use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use klife_runtime_config::{AppConfig, CONFIG_FILE_NAME, CONFIG_PATH_ENV};

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Write a `klife.toml` with the default settings.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration (file plus environment overrides).
    Show,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Init { force } => run_init(&config_path(), force),
        ConfigAction::Show => run_show(),
    }
}

fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, render(&AppConfig::default())?)
        .with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_show() -> Result<()> {
    let config = AppConfig::load()?;
    println!("# {}", config_path().display());
    print!("{}", render(&redacted(config))?);
    Ok(())
}

fn render(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("serialize config")
}

fn redacted(mut config: AppConfig) -> AppConfig {
    if config.session.secret.is_some() {
        config.session.secret = Some("********".to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_a_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        run_init(&path, false).unwrap();
        assert_eq!(AppConfig::from_file(&path).unwrap(), AppConfig::default());

        assert!(run_init(&path, false).is_err());
        run_init(&path, true).unwrap();
    }

    #[test]
    fn secret_is_never_printed() {
        let mut config = AppConfig::default();
        config.session.secret = Some("hunter2".into());
        let text = render(&redacted(config)).unwrap();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("********"));
    }
}
