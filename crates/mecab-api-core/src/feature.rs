//! Normalization of backend feature strings.
//!
//! Every dictionary emits a comma separated feature string per token, but
//! the column layout differs between dictionaries. The only
//! dictionary-specific knowledge lives in [`ColumnMapping::for_backend`].

use csv::ReaderBuilder;
use mecab_api_types::BackendId;

/// Placeholder value for an empty feature column
pub const WILDCARD: &str = "*";

/// Number of leading feature columns that make up the part of speech
pub const POS_COLUMNS: usize = 4;

/// Feature columns holding the base form and the reading of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub base_form: usize,
    pub reading: usize,
}

impl ColumnMapping {
    /// IPADIC layout: `pos1..pos4,conj_type,conj_form,base,reading,pronunciation`
    pub const IPADIC: ColumnMapping = ColumnMapping {
        base_form: 6,
        reading: 7,
    };

    /// UniDic layout: `pos1..pos4,c_type,c_form,lform,lemma,orth,...`
    pub const UNIDIC: ColumnMapping = ColumnMapping {
        base_form: 8,
        reading: 6,
    };

    pub const fn for_backend(id: BackendId) -> ColumnMapping {
        match id {
            BackendId::Ipadic => Self::IPADIC,
            // NEologd extends IPADIC and keeps its columns
            BackendId::Neologd => Self::IPADIC,
            BackendId::Unidic => Self::UNIDIC,
        }
    }
}

/// Fields derived from a feature string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFeature {
    pub pos: String,
    pub base_form: Option<String>,
    pub reading: Option<String>,
}

/// Derive part of speech, base form and reading from a raw feature string
pub fn normalize(feature: &str, mapping: ColumnMapping) -> NormalizedFeature {
    let fields = split_feature(feature);

    let pos = fields
        .iter()
        .take(POS_COLUMNS)
        .filter(|field| field.as_str() != WILDCARD)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("-");

    // MeCab writes `*` for a missing value; such columns are left out
    // of the response rather than sent as "*"
    let column = |idx: usize| {
        fields
            .get(idx)
            .filter(|v| !v.is_empty() && v.as_str() != WILDCARD)
            .cloned()
    };

    NormalizedFeature {
        pos,
        base_form: column(mapping.base_form),
        reading: column(mapping.reading),
    }
}

/// Split a feature string into columns. Quoted columns may contain commas.
pub fn split_feature(feature: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(feature.as_bytes());

    reader
        .records()
        .next()
        .and_then(Result::ok)
        .map(|record| record.iter().map(str::to_string).collect())
        .unwrap_or_default()
}
