/// Kind of a node in a parse result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStat {
    /// Word found in the dictionary
    Normal,
    /// Word produced by the unknown-word handler
    Unknown,
    /// Beginning-of-sentence sentinel
    Bos,
    /// End-of-sentence sentinel
    Eos,
}

impl NodeStat {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, NodeStat::Bos | NodeStat::Eos)
    }
}

/// One node of a parsed sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub surface: String,
    pub feature: String,
    pub stat: NodeStat,
}

impl Node {
    pub fn new(surface: impl Into<String>, feature: impl Into<String>, stat: NodeStat) -> Self {
        Self {
            surface: surface.into(),
            feature: feature.into(),
            stat,
        }
    }

    pub fn bos() -> Self {
        Self::new("", "BOS/EOS,*,*,*,*,*,*,*,*", NodeStat::Bos)
    }

    pub fn eos() -> Self {
        Self::new("", "BOS/EOS,*,*,*,*,*,*,*,*", NodeStat::Eos)
    }
}

/// Morphological analyzer bound to one dictionary.
///
/// Implementations must create their per-parse state inside `parse` and
/// release it before returning; the analyzer itself is shared across
/// concurrent requests.
pub trait Analyzer: Send + Sync {
    /// Parse a sentence into nodes, framed by a BOS and an EOS sentinel
    fn parse(&self, sentence: &str) -> Result<Vec<Node>, EngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Tokenizer failed: {0}")]
    Tokenize(String),
}
