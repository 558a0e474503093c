use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a tokenizer backend, as used in the `parsers` parameter
/// and as a key of the response object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BackendId {
    #[serde(rename = "mecab_ipadic")]
    Ipadic,
    #[serde(rename = "mecab_neologd")]
    Neologd,
    #[serde(rename = "mecab_unidic")]
    Unidic,
}

impl BackendId {
    /// All backends in response order
    pub const ALL: [BackendId; 3] = [BackendId::Ipadic, BackendId::Neologd, BackendId::Unidic];

    /// The backend used when a request names none
    pub const DEFAULT: BackendId = BackendId::Ipadic;

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Ipadic => "mecab_ipadic",
            BackendId::Neologd => "mecab_neologd",
            BackendId::Unidic => "mecab_unidic",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend: {0}")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendId {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mecab_ipadic" => Ok(BackendId::Ipadic),
            "mecab_neologd" => Ok(BackendId::Neologd),
            "mecab_unidic" => Ok(BackendId::Unidic),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

/// One analyzed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub surface: String,
    /// Raw feature string as emitted by the backend
    pub feature: String,
    pub pos: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

/// Response body of the tokenize endpoint.
///
/// A section is `Some` only when its backend was requested and is
/// available. A present section may still be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mecab_ipadic: Option<Vec<TokenRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mecab_neologd: Option<Vec<TokenRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neologd_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mecab_unidic: Option<Vec<TokenRecord>>,
}

impl ApiResponse {
    pub fn section(&self, id: BackendId) -> Option<&[TokenRecord]> {
        match id {
            BackendId::Ipadic => self.mecab_ipadic.as_deref(),
            BackendId::Neologd => self.mecab_neologd.as_deref(),
            BackendId::Unidic => self.mecab_unidic.as_deref(),
        }
    }

    pub fn set_section(&mut self, id: BackendId, tokens: Vec<TokenRecord>) {
        let slot = match id {
            BackendId::Ipadic => &mut self.mecab_ipadic,
            BackendId::Neologd => &mut self.mecab_neologd,
            BackendId::Unidic => &mut self.mecab_unidic,
        };
        *slot = Some(tokens);
    }
}
