//! Response bodies of the operator and catalog endpoints.

use serde::{Deserialize, Serialize};

/// `GET /api/check-stuck-crawlers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StuckCheckResponse {
    pub success: bool,
    #[serde(default)]
    pub updated_jobs: u32,
}

/// `GET /api/reset-crawler/{id}` and `GET /api/reset-processing/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// `GET /api/force-update-records/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub records_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One `{id, name}` entry of a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
}

/// `GET /api/get-models/{brandId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub success: bool,
    #[serde(default)]
    pub models: Vec<CatalogEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/get-car-types/{modelId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarTypesResponse {
    pub success: bool,
    #[serde(default)]
    pub car_types: Vec<CatalogEntry>,
    #[serde(default)]
    pub error: Option<String>,
}
