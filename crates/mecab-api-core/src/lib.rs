pub mod analyzer;
pub mod dispatch;
pub mod feature;
pub mod registry;

pub use analyzer::{Analyzer, EngineError, Node, NodeStat};
pub use dispatch::{BackendSelection, DispatchError, Dispatcher};
pub use feature::{ColumnMapping, NormalizedFeature, normalize};
pub use registry::{Backend, Registry};
