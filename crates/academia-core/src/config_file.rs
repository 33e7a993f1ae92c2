use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingSection {
    /// Regex matched against section titles to find the bibliography.
    pub references_title: Option<String>,
    /// Surname the "et al." placeholder parses into.
    pub et_al: Option<String>,
    /// "scanner" or "split".
    pub name_list_strategy: Option<String>,
}

/// Platform config directory path: `<config_dir>/academia/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("academia").join("config.toml"))
}

/// Load config by cascading CWD `.academia.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".academia.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base = base.parsing.unwrap_or_default();
    let overlay = overlay.parsing.unwrap_or_default();
    ConfigFile {
        parsing: Some(ParsingSection {
            references_title: overlay.references_title.or(base.references_title),
            et_al: overlay.et_al.or(base.et_al),
            name_list_strategy: overlay.name_list_strategy.or(base.name_list_strategy),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: ConfigFile = toml::from_str(
            r#"
            [parsing]
            et_al = "al."
            "#,
        )
        .unwrap();
        let parsing = config.parsing.unwrap();
        assert_eq!(parsing.et_al.as_deref(), Some("al."));
        assert!(parsing.references_title.is_none());
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = ConfigFile {
            parsing: Some(ParsingSection {
                references_title: Some("^Bibliography$".to_string()),
                et_al: Some("al.".to_string()),
                name_list_strategy: None,
            }),
        };
        let overlay = ConfigFile {
            parsing: Some(ParsingSection {
                references_title: None,
                et_al: Some("et al.".to_string()),
                name_list_strategy: Some("split".to_string()),
            }),
        };
        let merged = merge(base, overlay).parsing.unwrap();
        assert_eq!(merged.references_title.as_deref(), Some("^Bibliography$"));
        assert_eq!(merged.et_al.as_deref(), Some("et al."));
        assert_eq!(merged.name_list_strategy.as_deref(), Some("split"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[parsing]\nreferences_title = \"^Works Cited$\"\n").unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(
            config.parsing.unwrap().references_title.as_deref(),
            Some("^Works Cited$")
        );

        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(load_from_path(&path).is_none());
    }
}
