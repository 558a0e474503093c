use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use vibrato::{Dictionary, SystemDictionaryBuilder};

/// Compiled dictionary file name inside a dictionary directory
pub const SYSTEM_DIC: &str = "system.dic";
pub const SYSTEM_DIC_ZSTD: &str = "system.dic.zst";

const MATRIX_DEF: &str = "matrix.def";
const CHAR_DEF: &str = "char.def";
const UNK_DEF: &str = "unk.def";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Dictionary not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Dictionary error in {path}: {message}")]
    Dictionary { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LoadError {
    fn dictionary(path: &Path, err: impl std::fmt::Display) -> Self {
        LoadError::Dictionary {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Loads vibrato dictionaries from disk
pub struct DictionaryLoader;

impl DictionaryLoader {
    /// Load a dictionary from a file or a dictionary directory.
    ///
    /// Accepts a compiled dictionary (`*.dic`), a zstd compressed one
    /// (`*.zst`), or a directory holding either of them or the MeCab
    /// sources (`*.csv`, `matrix.def`, `char.def`, `unk.def`).
    pub fn load(path: &Path) -> Result<Dictionary, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            return Self::load_dir(path);
        }

        if path.extension().is_some_and(|ext| ext == "zst") {
            Self::load_zstd(path)
        } else {
            Self::load_compiled(path)
        }
    }

    fn load_dir(dir: &Path) -> Result<Dictionary, LoadError> {
        let compiled = dir.join(SYSTEM_DIC);
        if compiled.is_file() {
            return Self::load_compiled(&compiled);
        }

        let compressed = dir.join(SYSTEM_DIC_ZSTD);
        if compressed.is_file() {
            return Self::load_zstd(&compressed);
        }

        if dir.join(MATRIX_DEF).is_file() {
            return Self::build_from_sources(dir);
        }

        Err(LoadError::InvalidFormat(format!(
            "{} holds neither {}, {} nor MeCab sources",
            dir.display(),
            SYSTEM_DIC,
            SYSTEM_DIC_ZSTD
        )))
    }

    /// Read a dictionary compiled by vibrato
    pub fn load_compiled(path: &Path) -> Result<Dictionary, LoadError> {
        tracing::info!("Loading compiled dictionary: {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        Dictionary::read(reader).map_err(|e| LoadError::dictionary(path, e))
    }

    /// Read a zstd compressed dictionary compiled by vibrato
    pub fn load_zstd(path: &Path) -> Result<Dictionary, LoadError> {
        tracing::info!("Loading compressed dictionary: {}", path.display());
        let decoder = zstd::Decoder::new(File::open(path)?)?;
        Dictionary::read(decoder).map_err(|e| LoadError::dictionary(path, e))
    }

    /// Compile a dictionary from MeCab source files (UTF-8)
    pub fn build_from_sources(dir: &Path) -> Result<Dictionary, LoadError> {
        tracing::info!("Compiling dictionary from MeCab sources: {}", dir.display());

        let lexicon = Self::read_lexicon(dir)?;
        let matrix = File::open(Self::source(dir, MATRIX_DEF)?)?;
        let char_def = File::open(Self::source(dir, CHAR_DEF)?)?;
        let unk_def = File::open(Self::source(dir, UNK_DEF)?)?;

        let dict = SystemDictionaryBuilder::from_readers(
            lexicon.as_slice(),
            BufReader::new(matrix),
            BufReader::new(char_def),
            BufReader::new(unk_def),
        )
        .map_err(|e| LoadError::dictionary(dir, e))?;

        tracing::info!("Compiled dictionary from {}", dir.display());
        Ok(dict)
    }

    fn source(dir: &Path, name: &str) -> Result<PathBuf, LoadError> {
        let path = dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(LoadError::FileNotFound(path.display().to_string()))
        }
    }

    /// Concatenate every `*.csv` lexicon file in name order
    fn read_lexicon(dir: &Path) -> Result<Vec<u8>, LoadError> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(LoadError::InvalidFormat(format!(
                "no lexicon csv in {}",
                dir.display()
            )));
        }

        let mut lexicon = Vec::new();
        for file in &files {
            File::open(file)?.read_to_end(&mut lexicon)?;
            if !lexicon.ends_with(b"\n") {
                lexicon.push(b'\n');
            }
        }

        tracing::debug!("Read {} lexicon files from {}", files.len(), dir.display());
        Ok(lexicon)
    }
}
