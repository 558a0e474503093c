use std::collections::BTreeSet;
use std::sync::Arc;

use mecab_api_types::{ApiResponse, BackendId, TokenRecord};

use crate::analyzer::EngineError;
use crate::feature::normalize;
use crate::registry::{Backend, Registry};

/// Backends requested by a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSelection {
    ids: BTreeSet<BackendId>,
}

impl BackendSelection {
    /// Parse a comma separated `parsers` value.
    ///
    /// Unknown names are dropped. A value naming nothing selects the
    /// generic backend.
    pub fn parse(parsers: &str) -> Self {
        let names: Vec<&str> = parsers
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            return Self::default_backend();
        }

        let ids = names
            .into_iter()
            .filter_map(|name| match name.parse::<BackendId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::debug!("ignoring {}", e);
                    None
                }
            })
            .collect();

        Self { ids }
    }

    pub fn default_backend() -> Self {
        Self::from_ids([BackendId::DEFAULT])
    }

    pub fn from_ids(ids: impl IntoIterator<Item = BackendId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: BackendId) -> bool {
        self.ids.contains(&id)
    }

    /// Requested ids in response order
    pub fn iter(&self) -> impl Iterator<Item = BackendId> + '_ {
        self.ids.iter().copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{backend} failed: {source}")]
    Engine {
        backend: BackendId,
        #[source]
        source: EngineError,
    },
}

/// Runs a sentence through the requested backends and assembles the response
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tokenize `sentence` with every requested backend that is available.
    ///
    /// Unavailable backends are left out of the response. An engine error
    /// fails the whole request.
    pub fn handle(
        &self,
        sentence: &str,
        selection: &BackendSelection,
    ) -> Result<ApiResponse, DispatchError> {
        let mut response = ApiResponse::default();

        for id in selection.iter() {
            let Some(backend) = self.registry.get(id) else {
                tracing::debug!("{} requested but unavailable", id);
                continue;
            };

            let tokens = tokenize(backend, sentence)?;
            response.set_section(id, tokens);

            if id == BackendId::Neologd {
                response.neologd_version = backend.version().map(str::to_string);
            }
        }

        Ok(response)
    }
}

/// Parse with one backend and normalize every non-sentinel node
pub fn tokenize(backend: &Backend, sentence: &str) -> Result<Vec<TokenRecord>, DispatchError> {
    let nodes = backend
        .analyzer()
        .parse(sentence)
        .map_err(|source| DispatchError::Engine {
            backend: backend.id(),
            source,
        })?;

    let mapping = backend.mapping();
    let tokens = nodes
        .into_iter()
        .filter(|node| !node.stat.is_sentinel())
        .map(|node| {
            let normalized = normalize(&node.feature, mapping);
            TokenRecord {
                surface: node.surface,
                feature: node.feature,
                pos: normalized.pos,
                baseform: normalized.base_form,
                reading: normalized.reading,
            }
        })
        .collect();

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, Node, NodeStat};

    /// Splits on spaces and looks words up in a fixed table
    struct TableAnalyzer {
        entries: Vec<(&'static str, &'static str)>,
    }

    impl TableAnalyzer {
        fn ipadic() -> Box<dyn Analyzer> {
            Box::new(Self {
                entries: vec![
                    ("犬", "名詞,一般,*,*,*,*,犬,イヌ,イヌ"),
                    ("が", "助詞,格助詞,一般,*,*,*,が,ガ,ガ"),
                    ("走る", "動詞,自立,*,*,五段・ラ行,基本形,走る,ハシル,ハシル"),
                ],
            })
        }

        fn unidic() -> Box<dyn Analyzer> {
            Box::new(Self {
                entries: vec![
                    ("犬", "名詞,普通名詞,一般,*,*,*,イヌ,犬,犬,イヌ,犬,イヌ,和"),
                    ("が", "助詞,格助詞,*,*,*,*,ガ,が,が,ガ,が,ガ,和"),
                    ("走る", "動詞,一般,*,*,五段-ラ行,終止形-一般,ハシル,走る,走る,ハシル,走る,ハシル,和"),
                ],
            })
        }
    }

    impl Analyzer for TableAnalyzer {
        fn parse(&self, sentence: &str) -> Result<Vec<Node>, EngineError> {
            let mut nodes = vec![Node::bos()];
            for word in sentence.split(' ').filter(|w| !w.is_empty()) {
                let node = match self.entries.iter().find(|(surface, _)| *surface == word) {
                    Some((surface, feature)) => Node::new(*surface, *feature, NodeStat::Normal),
                    None => Node::new(word, "名詞,固有名詞,一般,*,*,*,*", NodeStat::Unknown),
                };
                nodes.push(node);
            }
            nodes.push(Node::eos());
            Ok(nodes)
        }
    }

    struct Broken;

    impl Analyzer for Broken {
        fn parse(&self, _sentence: &str) -> Result<Vec<Node>, EngineError> {
            Err(EngineError::Tokenize("lattice overflow".to_string()))
        }
    }

    fn dispatcher() -> Dispatcher {
        let registry = Registry::new(TableAnalyzer::ipadic())
            .with_backend(Backend::new(BackendId::Unidic, TableAnalyzer::unidic()));
        Dispatcher::new(Arc::new(registry))
    }

    #[test]
    fn empty_parsers_selects_generic_backend() {
        assert_eq!(BackendSelection::parse(""), BackendSelection::default_backend());
        assert_eq!(BackendSelection::parse(" , "), BackendSelection::default_backend());
    }

    #[test]
    fn parsers_are_trimmed_and_deduplicated() {
        let selection = BackendSelection::parse("mecab_unidic, mecab_ipadic,mecab_unidic");
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![BackendId::Ipadic, BackendId::Unidic]
        );
    }

    #[test]
    fn unknown_parsers_select_nothing() {
        let selection = BackendSelection::parse("mecab_jumandic");
        assert_eq!(selection.iter().count(), 0);

        let response = dispatcher().handle("犬", &selection).unwrap();
        assert_eq!(response, ApiResponse::default());
    }

    #[test]
    fn default_request_returns_only_generic_section() {
        let response = dispatcher()
            .handle("犬 が 走る", &BackendSelection::default_backend())
            .unwrap();

        let tokens = response.mecab_ipadic.unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(response.mecab_neologd.is_none());
        assert!(response.mecab_unidic.is_none());
        assert!(response.neologd_version.is_none());

        assert_eq!(tokens[0].surface, "犬");
        assert_eq!(tokens[0].pos, "名詞-一般");
        assert_eq!(tokens[0].baseform.as_deref(), Some("犬"));
        assert_eq!(tokens[0].reading.as_deref(), Some("イヌ"));
        assert_eq!(tokens[2].pos, "動詞-自立");
    }

    #[test]
    fn each_backend_uses_its_own_columns() {
        let selection = BackendSelection::parse("mecab_ipadic,mecab_unidic");
        let response = dispatcher().handle("走る", &selection).unwrap();

        let ipadic = &response.mecab_ipadic.unwrap()[0];
        let unidic = &response.mecab_unidic.unwrap()[0];

        assert_eq!(ipadic.baseform.as_deref(), Some("走る"));
        assert_eq!(ipadic.reading.as_deref(), Some("ハシル"));
        assert_eq!(unidic.baseform.as_deref(), Some("走る"));
        assert_eq!(unidic.reading.as_deref(), Some("ハシル"));
        assert_eq!(unidic.pos, "動詞-一般");
    }

    #[test]
    fn unavailable_backend_is_silently_omitted() {
        let selection = BackendSelection::parse("mecab_neologd");
        let response = dispatcher().handle("犬", &selection).unwrap();

        assert_eq!(response, ApiResponse::default());
    }

    #[test]
    fn version_accompanies_present_section_only() {
        let registry = Registry::new(TableAnalyzer::ipadic()).with_backend(
            Backend::new(BackendId::Neologd, TableAnalyzer::ipadic()).with_version("20200910"),
        );
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let with = dispatcher
            .handle("犬", &BackendSelection::parse("mecab_neologd"))
            .unwrap();
        assert_eq!(with.neologd_version.as_deref(), Some("20200910"));
        assert!(with.mecab_neologd.is_some());
        assert!(with.mecab_ipadic.is_none());

        let without = dispatcher
            .handle("犬", &BackendSelection::default_backend())
            .unwrap();
        assert!(without.neologd_version.is_none());
    }

    #[test]
    fn empty_sentence_gives_empty_sections() {
        let selection = BackendSelection::parse("mecab_ipadic,mecab_unidic,mecab_neologd");
        let response = dispatcher().handle("", &selection).unwrap();

        assert_eq!(response.section(BackendId::Ipadic), Some(&[][..]));
        assert_eq!(response.section(BackendId::Unidic), Some(&[][..]));
        assert_eq!(response.section(BackendId::Neologd), None);
    }

    #[test]
    fn unknown_words_keep_surface_and_feature() {
        let response = dispatcher()
            .handle("ポチ", &BackendSelection::default_backend())
            .unwrap();

        let token = &response.mecab_ipadic.unwrap()[0];
        assert_eq!(token.surface, "ポチ");
        assert_eq!(token.feature, "名詞,固有名詞,一般,*,*,*,*");
        assert_eq!(token.baseform, None);
        assert_eq!(token.reading, None);
    }

    #[test]
    fn engine_error_fails_the_request() {
        let registry = Registry::new(TableAnalyzer::ipadic())
            .with_backend(Backend::new(BackendId::Unidic, Box::new(Broken)));
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let result = dispatcher.handle("犬", &BackendSelection::parse("mecab_ipadic,mecab_unidic"));
        assert!(matches!(
            result,
            Err(DispatchError::Engine {
                backend: BackendId::Unidic,
                ..
            })
        ));
    }
}
