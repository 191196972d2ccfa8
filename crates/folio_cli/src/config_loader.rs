use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use folio_core::config::load_site_config;
use folio_core::model::SiteConfig;

pub const CONFIG_FILE: &str = "folio.yaml";

pub fn load_config_for_site(root: &Path) -> Result<SiteConfig> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        bail!(
            "Missing {CONFIG_FILE} in {}. Pass --site-dir to point at the site root.",
            root.display()
        );
    }
    load_site_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

pub fn resolve_site_dir(site_dir: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(match site_dir {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_config_names_the_file() {
        let temp = TempDir::new().expect("tempdir");
        let err = load_config_for_site(temp.path()).expect_err("should fail");
        assert!(err.to_string().contains("Missing folio.yaml"));
    }

    #[test]
    fn loads_config_from_site_root() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(
            temp.path().join(CONFIG_FILE),
            "site:\n  title: Studio\n  base_url: https://example.com\n",
        )
        .expect("write config");
        let config = load_config_for_site(temp.path()).expect("config");
        assert_eq!(config.site.title, "Studio");
    }

    #[test]
    fn absolute_site_dir_is_kept() {
        let temp = TempDir::new().expect("tempdir");
        let resolved = resolve_site_dir(Some(temp.path())).expect("resolve");
        assert_eq!(resolved, temp.path());
    }
}
