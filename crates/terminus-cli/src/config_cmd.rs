//! `terminus config` subcommands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use terminus_config::{log_cli_info, Config, PROJECT_CONFIG_PATH};

pub fn show(config: &Config) -> Result<()> {
    print!("{}", config.to_toml());
    Ok(())
}

pub fn path() -> Result<()> {
    match Config::global_config_path() {
        Some(global) => println!("Global:  {}", global.display()),
        None => println!("Global:  <no home directory>"),
    }
    println!("Project: {PROJECT_CONFIG_PATH}");
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let contents = Config::default_toml();
    std::fs::write(path, &contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log_cli_info!("Config written", bytes = contents.len());
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_default_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".terminus/config.toml");

        init(&path, false).unwrap();

        let written: Config = load_written(&path);
        assert_eq!(written, Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(init(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("[termination]"));
    }

    fn load_written(path: &Path) -> Config {
        Config::load_from(None, Some(path)).unwrap()
    }
}
