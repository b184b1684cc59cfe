use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

/// Get the default fitbuddy data directory: ~/.fitbuddy
pub fn get_fitbuddy_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".fitbuddy"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.fitbuddy/config.toml (highest)
    let data_dir = get_fitbuddy_data_dir()?;
    let home_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    load_layered(&home_config, local_config)
}

/// First existing file wins, then environment overrides apply on top.
fn load_layered(home_config: &Path, local_config: &Path) -> anyhow::Result<AppConfig> {
    let mut cfg = if home_config.exists() {
        load_from_path(home_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("FITBUDDY_API_KEY") {
        if !v.trim().is_empty() {
            cfg.catalog.api_key = v;
        }
    }
    if let Ok(v) = std::env::var("FITBUDDY_CATALOG_URL") {
        if !v.trim().is_empty() {
            cfg.catalog.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("FITBUDDY_STORE_DIR") {
        if !v.trim().is_empty() {
            cfg.storage.directory = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogKind, StorageKind};
    use std::io::Write;
    use std::sync::Mutex;

    const ENV_KEYS: [&str; 3] = ["FITBUDDY_API_KEY", "FITBUDDY_CATALOG_URL", "FITBUDDY_STORE_DIR"];

    // 环境变量是进程级的，相关测试串行执行
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn write_config(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage.kind, StorageKind::File);
        assert_eq!(cfg.catalog.kind, CatalogKind::Http);
        assert_eq!(cfg.catalog.default_muscle, "biceps");
        assert_eq!(cfg.catalog.timeout_ms, 10_000);
        assert!(cfg.catalog.api_key.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[storage]\nkind = \"memory\"\n\n[catalog]\nkind = \"static\"\ndefault_muscle = \"chest\""
        )
        .unwrap();

        let cfg = load_from_path(file.path()).unwrap();
        assert_eq!(cfg.storage.kind, StorageKind::Memory);
        assert_eq!(cfg.storage.directory, "~/.fitbuddy/store");
        assert_eq!(cfg.catalog.kind, CatalogKind::Static);
        assert_eq!(cfg.catalog.default_muscle, "chest");
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_bad_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage\nkind=").unwrap();
        assert!(load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_replace_config_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("FITBUDDY_API_KEY", "env-key");
        std::env::set_var("FITBUDDY_CATALOG_URL", "http://localhost:9000/v1");
        std::env::set_var("FITBUDDY_STORE_DIR", "/tmp/fitbuddy-store");

        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg);
        clear_env();

        assert_eq!(cfg.catalog.api_key, "env-key");
        assert_eq!(cfg.catalog.base_url, "http://localhost:9000/v1");
        assert_eq!(cfg.storage.directory, "/tmp/fitbuddy-store");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        for key in ENV_KEYS {
            std::env::set_var(key, "   ");
        }

        let mut cfg = AppConfig::default();
        cfg.catalog.api_key = "file-key".to_string();
        apply_env_overrides(&mut cfg);
        clear_env();

        assert_eq!(cfg.catalog.api_key, "file-key");
        assert_eq!(cfg.catalog.base_url, "https://api.api-ninjas.com/v1");
        assert_eq!(cfg.storage.directory, "~/.fitbuddy/store");
    }

    #[test]
    fn test_home_config_wins_over_local() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let home = write_config(
            tmp.path(),
            "home.toml",
            "[catalog]\ndefault_muscle = \"chest\"\n",
        );
        let local = write_config(
            tmp.path(),
            "local.toml",
            "[catalog]\ndefault_muscle = \"glutes\"\n",
        );

        let cfg = load_layered(&home, &local).unwrap();
        assert_eq!(cfg.catalog.default_muscle, "chest");

        let missing = tmp.path().join("absent.toml");
        let cfg = load_layered(&missing, &local).unwrap();
        assert_eq!(cfg.catalog.default_muscle, "glutes");

        let cfg = load_layered(&missing, &missing).unwrap();
        assert_eq!(cfg.catalog.default_muscle, "biceps");
    }

    #[test]
    fn test_env_applies_on_top_of_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let home = write_config(tmp.path(), "home.toml", "[catalog]\napi_key = \"file-key\"\n");
        std::env::set_var("FITBUDDY_API_KEY", "env-key");

        let cfg = load_layered(&home, &tmp.path().join("absent.toml"));
        clear_env();
        assert_eq!(cfg.unwrap().catalog.api_key, "env-key");
    }
}
