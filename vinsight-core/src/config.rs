//! Configuration loading from vinsight.toml.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::InsightError;
use std::collections::BTreeMap;
use std::{fs, path::Path};

/// Name of the configuration file looked up at the project root.
pub const CONFIG_FILE: &str = "vinsight.toml";

/// Main configuration structure for vinsight.toml.
#[derive(Debug, Deserialize, Default)]
pub struct InsightConfig {
    /// Component names or path fragments to leave out of reports.
    pub ignore: Option<Vec<String>>,
    /// Extra directory names pruned while scanning.
    pub exclude_dirs: Option<Vec<String>>,
    /// Import specifier prefixes mapped to directories relative to the root,
    /// e.g. `"@" = "src"`.
    pub aliases: Option<BTreeMap<String, String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl InsightConfig {
    /// Whether the config asks for JSON output.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from vinsight.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<InsightConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).map_err(|e| InsightError::config(&path, e.to_string()))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join("vinsight_config_test")
            .join(format!("{}_{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = temp_root("missing");
        assert!(load_config(&dir).unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = temp_root("full");
        fs::write(
            dir.join(CONFIG_FILE),
            r#"
ignore = ["BaseIcon"]
exclude_dirs = ["storybook-static"]

[aliases]
"@" = "src"

[output]
format = "json"
"#,
        )
        .unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.ignore.as_deref(), Some(&["BaseIcon".to_string()][..]));
        assert_eq!(cfg.aliases.unwrap().get("@").map(String::as_str), Some("src"));
        assert!(cfg.output.is_some());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wants_json() {
        let cfg = InsightConfig {
            output: Some(OutputConfig {
                format: Some("JSON".to_string()),
            }),
            ..Default::default()
        };
        assert!(cfg.wants_json());
        assert!(!InsightConfig::default().wants_json());
    }

    #[test]
    fn test_invalid_config_errors() {
        let dir = temp_root("invalid");
        fs::write(dir.join(CONFIG_FILE), "ignore = [unterminated").unwrap();
        let err = load_config(&dir).unwrap_err();
        let config_err = err.downcast_ref::<InsightError>().unwrap();
        assert!(!config_err.is_recoverable());
        assert_eq!(config_err.path(), dir.join(CONFIG_FILE));
        fs::remove_dir_all(&dir).ok();
    }
}
