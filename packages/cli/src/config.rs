use blockpad_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "blockpad.config.json";

/// Blockpad configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Author recorded on new documents
    #[serde(default)]
    pub author: String,

    /// Editor tuning (history limit, child offset, extra block types)
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path(cwd: &str) -> PathBuf {
        Path::new(cwd).join(DEFAULT_CONFIG_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "author": "ada",
            "editor": {
                "historyLimit": 50,
                "blockTypes": [{ "name": "callout", "container": true }]
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.author, "ada");
        assert_eq!(config.editor.history_limit, 50);
        assert_eq!(config.editor.child_offset, 0.1);
        assert!(config.editor.registry().is_container("callout"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.author, "");
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        assert_eq!(Config::load(&cwd).unwrap().author, "");

        std::fs::write(Config::path(&cwd), r#"{"author": "grace"}"#).unwrap();
        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.author, "grace");
        assert_eq!(config.editor.history_limit, 1000);
    }
}
