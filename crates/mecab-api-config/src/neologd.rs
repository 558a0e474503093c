use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Contents of `neologd-config.yml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeologdConfig {
    pub dicdir: PathBuf,
    /// Shown to clients next to the NEologd section
    pub version: String,
}

impl NeologdConfig {
    /// Read the config file. A missing file is `Ok(None)`: the backend is unconfigured.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let buf = match fs::read_to_string(path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let config: NeologdConfig =
            serde_yaml::from_str(&buf).map_err(|source| ConfigError::Yaml {
                path: path.display().to_string(),
                source,
            })?;

        if config.dicdir.as_os_str().is_empty() {
            tracing::warn!("{} has no dicdir, NEologd stays unconfigured", path.display());
            return Ok(None);
        }

        Ok(Some(config))
    }

    pub fn version(&self) -> Option<&str> {
        if self.version.is_empty() {
            None
        } else {
            Some(&self.version)
        }
    }
}
