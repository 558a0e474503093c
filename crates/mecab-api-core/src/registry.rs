use std::collections::BTreeMap;
use std::fmt;

use mecab_api_types::BackendId;

use crate::analyzer::Analyzer;
use crate::feature::ColumnMapping;

/// A tokenizer bound to one dictionary variant
pub struct Backend {
    id: BackendId,
    analyzer: Box<dyn Analyzer>,
    mapping: ColumnMapping,
    version: Option<String>,
}

impl Backend {
    pub fn new(id: BackendId, analyzer: Box<dyn Analyzer>) -> Self {
        Self {
            id,
            analyzer,
            mapping: ColumnMapping::for_backend(id),
            version: None,
        }
    }

    /// Attach a version string shown to clients next to this backend's section
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = if version.is_empty() { None } else { Some(version) };
        self
    }

    pub fn id(&self) -> BackendId {
        self.id
    }

    pub fn analyzer(&self) -> &dyn Analyzer {
        self.analyzer.as_ref()
    }

    pub fn mapping(&self) -> ColumnMapping {
        self.mapping
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("id", &self.id)
            .field("analyzer", &"<Analyzer>")
            .field("mapping", &self.mapping)
            .field("version", &self.version)
            .finish()
    }
}

/// The set of available backends, fixed at startup.
///
/// The generic backend is always present. Backends missing from the
/// registry are unavailable for the whole process lifetime.
#[derive(Debug)]
pub struct Registry {
    backends: BTreeMap<BackendId, Backend>,
}

impl Registry {
    /// Start a registry from the mandatory generic backend
    pub fn new(generic: Box<dyn Analyzer>) -> Self {
        let mut backends = BTreeMap::new();
        backends.insert(BackendId::DEFAULT, Backend::new(BackendId::DEFAULT, generic));
        Self { backends }
    }

    /// Register an optional backend. Registering an id twice replaces the first one.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        if self.backends.insert(backend.id(), backend).is_some() {
            tracing::warn!("backend registered twice, keeping the latest");
        }
        self
    }

    pub fn get(&self, id: BackendId) -> Option<&Backend> {
        self.backends.get(&id)
    }

    pub fn is_available(&self, id: BackendId) -> bool {
        self.backends.contains_key(&id)
    }

    /// Ids of available backends in response order
    pub fn available(&self) -> impl Iterator<Item = BackendId> + '_ {
        self.backends.keys().copied()
    }
}
