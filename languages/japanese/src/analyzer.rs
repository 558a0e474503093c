use mecab_api_core::analyzer::{Analyzer, EngineError, Node, NodeStat};
use vibrato::dictionary::LexType;
use vibrato::{Dictionary, Tokenizer};

use crate::loader::LoadError;

/// Morphological analyzer backed by a vibrato tokenizer
pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
}

impl VibratoAnalyzer {
    /// Wrap a dictionary. With `ignore_space` set, spaces are skipped the way
    /// MeCab does; this needs a `SPACE` category in `char.def`.
    pub fn new(dict: Dictionary, ignore_space: bool) -> Result<Self, LoadError> {
        let tokenizer = Tokenizer::new(dict)
            .ignore_space(ignore_space)
            .map_err(|e| LoadError::InvalidFormat(e.to_string()))?;

        Ok(Self { tokenizer })
    }
}

impl Analyzer for VibratoAnalyzer {
    fn parse(&self, sentence: &str) -> Result<Vec<Node>, EngineError> {
        // The worker holds the lattice for this sentence only and is
        // dropped on return.
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(sentence);
        worker.tokenize();

        let mut nodes = Vec::with_capacity(worker.num_tokens() + 2);
        nodes.push(Node::bos());
        for token in worker.token_iter() {
            let stat = match token.lex_type() {
                LexType::Unknown => NodeStat::Unknown,
                _ => NodeStat::Normal,
            };
            nodes.push(Node::new(token.surface(), token.feature(), stat));
        }
        nodes.push(Node::eos());

        Ok(nodes)
    }
}
