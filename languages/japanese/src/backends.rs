use std::path::Path;

use mecab_api_config::NeologdConfig;
use mecab_api_config::dictionary::DictionaryConfig;
use mecab_api_core::registry::{Backend, Registry};
use mecab_api_types::BackendId;

use crate::analyzer::VibratoAnalyzer;
use crate::loader::{DictionaryLoader, LoadError};

/// Build the backend registry once at startup.
///
/// Only the generic dictionary is required. NEologd is tried when its
/// config file exists and UniDic when its directory loads; either failing
/// leaves that backend unavailable.
pub fn load_registry(config: &DictionaryConfig) -> Result<Registry, LoadError> {
    let dicdir = config.resolve_dicdir();
    tracing::info!("Dictionary root: {}", dicdir.display());

    let ipadic_path = config.ipadic_path(&dicdir);
    let generic = open_analyzer(&ipadic_path).inspect_err(|e| {
        tracing::error!("{} is required: {}", BackendId::Ipadic, e);
    })?;
    tracing::info!("{} ready ({})", BackendId::Ipadic, ipadic_path.display());

    let mut registry = Registry::new(Box::new(generic));

    if let Some(neologd) = load_neologd(&config.neologd_config) {
        registry = registry.with_backend(neologd);
    }

    let unidic_path = config.unidic_path(&dicdir);
    match open_analyzer(&unidic_path) {
        Ok(analyzer) => {
            tracing::info!("{} ready ({})", BackendId::Unidic, unidic_path.display());
            registry = registry.with_backend(Backend::new(BackendId::Unidic, Box::new(analyzer)));
        }
        Err(e) => tracing::info!("{} unavailable: {}", BackendId::Unidic, e),
    }

    let available: Vec<&str> = registry.available().map(|id| id.as_str()).collect();
    tracing::info!("Available backends: {}", available.join(", "));

    Ok(registry)
}

fn load_neologd(config_path: &Path) -> Option<Backend> {
    let neologd = match NeologdConfig::load(config_path) {
        Ok(Some(neologd)) => neologd,
        Ok(None) => {
            tracing::info!(
                "{} not configured ({} absent)",
                BackendId::Neologd,
                config_path.display()
            );
            return None;
        }
        Err(e) => {
            tracing::warn!("{} not configured: {}", BackendId::Neologd, e);
            return None;
        }
    };

    match open_analyzer(&neologd.dicdir) {
        Ok(analyzer) => {
            tracing::info!(
                "{} ready ({}, version {:?})",
                BackendId::Neologd,
                neologd.dicdir.display(),
                neologd.version()
            );
            Some(Backend::new(BackendId::Neologd, Box::new(analyzer)).with_version(neologd.version))
        }
        Err(e) => {
            tracing::warn!("{} unavailable: {}", BackendId::Neologd, e);
            None
        }
    }
}

/// Load a dictionary and wrap it in an analyzer that skips spaces like MeCab
pub fn open_analyzer(path: &Path) -> Result<VibratoAnalyzer, LoadError> {
    let dict = DictionaryLoader::load(path)?;
    VibratoAnalyzer::new(dict, true)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::loader::test_dict;

    struct Fixture {
        root: tempfile::TempDir,
    }

    impl Fixture {
        /// A dicdir holding only the generic dictionary
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let ipadic = root.path().join("ipadic");
            fs::create_dir(&ipadic).unwrap();
            test_dict::write_sources(&ipadic);
            Self { root }
        }

        fn add_dictionary(&self, name: &str) {
            let dir = self.root.path().join(name);
            fs::create_dir(&dir).unwrap();
            test_dict::write_sources(&dir);
        }

        fn config(&self) -> DictionaryConfig {
            DictionaryConfig {
                dicdir: Some(self.root.path().to_path_buf()),
                neologd_config: self.root.path().join("neologd-config.yml"),
                ..DictionaryConfig::default()
            }
        }
    }

    #[test]
    fn generic_only_when_nothing_else_is_installed() {
        let fixture = Fixture::new();
        let registry = load_registry(&fixture.config()).unwrap();

        assert_eq!(registry.available().collect::<Vec<_>>(), vec![BackendId::Ipadic]);
    }

    #[test]
    fn missing_generic_dictionary_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let config = DictionaryConfig {
            dicdir: Some(root.path().to_path_buf()),
            neologd_config: root.path().join("neologd-config.yml"),
            ..DictionaryConfig::default()
        };

        assert!(load_registry(&config).is_err());
    }

    #[test]
    fn unidic_is_picked_up_from_dicdir() {
        let fixture = Fixture::new();
        fixture.add_dictionary("unidic");

        let registry = load_registry(&fixture.config()).unwrap();
        assert!(registry.is_available(BackendId::Unidic));
        assert!(!registry.is_available(BackendId::Neologd));
    }

    #[test]
    fn neologd_is_configured_by_yaml() {
        let fixture = Fixture::new();
        fixture.add_dictionary("neologd");
        let dicdir = fixture.root.path().join("neologd");
        fs::write(
            fixture.root.path().join("neologd-config.yml"),
            format!("dicdir: {}\nversion: \"20200910\"\n", dicdir.display()),
        )
        .unwrap();

        let registry = load_registry(&fixture.config()).unwrap();
        let neologd = registry.get(BackendId::Neologd).unwrap();
        assert_eq!(neologd.version(), Some("20200910"));
    }

    #[test]
    fn broken_neologd_dictionary_degrades() {
        let fixture = Fixture::new();
        fs::write(
            fixture.root.path().join("neologd-config.yml"),
            "dicdir: /nonexistent/neologd\nversion: \"20200910\"\n",
        )
        .unwrap();

        let registry = load_registry(&fixture.config()).unwrap();
        assert!(!registry.is_available(BackendId::Neologd));
        assert!(registry.is_available(BackendId::Ipadic));
    }
}
