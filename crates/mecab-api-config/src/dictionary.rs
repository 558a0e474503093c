use std::path::PathBuf;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Used when neither `MECAB_DICDIR` nor `mecab-config` are available
pub const DEFAULT_DICDIR: &str = "/usr/local/lib/mecab/dic";

fn default_neologd_config() -> PathBuf {
    PathBuf::from("neologd-config.yml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Root directory holding the installed dictionaries
    #[serde(default)]
    pub dicdir: Option<PathBuf>,
    /// Generic dictionary, defaults to `<dicdir>/ipadic`
    #[serde(default)]
    pub ipadic: Option<PathBuf>,
    /// Defaults to `<dicdir>/unidic`
    #[serde(default)]
    pub unidic: Option<PathBuf>,
    #[serde(default = "default_neologd_config")]
    pub neologd_config: PathBuf,
}

impl DictionaryConfig {
    pub fn from_env<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        Self {
            dicdir: path("MECAB_DICDIR"),
            ipadic: path("IPADIC_DICDIR"),
            unidic: path("UNIDIC_DICDIR"),
            neologd_config: path("NEOLOGD_CONFIG").unwrap_or_else(default_neologd_config),
        }
    }

    /// Dictionary root: explicit setting, then `mecab-config --dicdir`, then the default
    pub fn resolve_dicdir(&self) -> PathBuf {
        if let Some(dicdir) = &self.dicdir {
            return dicdir.clone();
        }

        match mecab_config_dicdir() {
            Some(dicdir) => dicdir,
            None => {
                tracing::debug!("mecab-config unavailable, using {}", DEFAULT_DICDIR);
                PathBuf::from(DEFAULT_DICDIR)
            }
        }
    }

    pub fn ipadic_path(&self, dicdir: &std::path::Path) -> PathBuf {
        self.ipadic.clone().unwrap_or_else(|| dicdir.join("ipadic"))
    }

    pub fn unidic_path(&self, dicdir: &std::path::Path) -> PathBuf {
        self.unidic.clone().unwrap_or_else(|| dicdir.join("unidic"))
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self::from_env(&|_| None)
    }
}

fn mecab_config_dicdir() -> Option<PathBuf> {
    let output = Command::new("mecab-config").arg("--dicdir").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let dicdir = String::from_utf8(output.stdout).ok()?;
    let dicdir = dicdir.trim();
    if dicdir.is_empty() {
        None
    } else {
        Some(PathBuf::from(dicdir))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn backend_paths_default_under_dicdir() {
        let config = DictionaryConfig::default();
        let dicdir = Path::new("/var/lib/mecab/dic");

        assert_eq!(config.ipadic_path(dicdir), dicdir.join("ipadic"));
        assert_eq!(config.unidic_path(dicdir), dicdir.join("unidic"));
    }

    #[test]
    fn explicit_dicdir_wins() {
        let config = DictionaryConfig {
            dicdir: Some(PathBuf::from("/srv/dic")),
            ..DictionaryConfig::default()
        };

        assert_eq!(config.resolve_dicdir(), PathBuf::from("/srv/dic"));
    }

    #[test]
    fn empty_variables_are_unset() {
        let config = DictionaryConfig::from_env(&|key: &str| match key {
            "IPADIC_DICDIR" => Some(String::new()),
            _ => None,
        });

        assert!(config.ipadic.is_none());
    }
}
