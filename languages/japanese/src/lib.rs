pub mod analyzer;
pub mod backends;
pub mod loader;

pub use analyzer::VibratoAnalyzer;
pub use backends::{load_registry, open_analyzer};
pub use loader::{DictionaryLoader, LoadError};
