pub mod errors;
pub mod http;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use errors::ClientError;
pub use http::ApiClient;
pub use source::StatusSource;
pub use types::{
    CarTypesResponse, CatalogEntry, ForceUpdateResponse, ModelsResponse, ResetResponse,
    StuckCheckResponse,
};
