pub mod types;

pub use types::{ApiResponse, BackendId, TokenRecord, UnknownBackend};
