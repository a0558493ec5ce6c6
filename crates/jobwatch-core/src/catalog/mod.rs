//! Cascading brand → model → car type lookups used by the prediction form.

use serde::Serialize;
use tracing::{info, warn};

use crate::client::{ApiClient, CarTypesResponse, CatalogEntry, ClientError, ModelsResponse};
use crate::errors::JobwatchError;

pub const NO_MODELS_LABEL: &str = "No models available";
pub const DEFAULT_CAR_TYPES: [&str; 5] = ["Sedan", "SUV", "Hatchback", "Coupe", "Pickup"];

/// One selectable entry. `value` is what the form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub value: String,
    pub label: String,
}

impl From<&CatalogEntry> for CatalogOption {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            value: entry.id.to_string(),
            label: entry.name.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Could not load models for brand '{brand_id}': {message}")]
    ModelsUnavailable { brand_id: String, message: String },

    #[error("Could not reach the API: {source}")]
    Client {
        #[from]
        source: ClientError,
    },
}

impl JobwatchError for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::ModelsUnavailable { .. } => "MODELS_UNAVAILABLE",
            CatalogError::Client { .. } => "CATALOG_CLIENT_ERROR",
        }
    }
}

pub fn default_car_types() -> Vec<CatalogOption> {
    DEFAULT_CAR_TYPES
        .iter()
        .enumerate()
        .map(|(index, name)| CatalogOption {
            value: format!("default_{}", index),
            label: name.to_string(),
        })
        .collect()
}

pub fn model_options(brand_id: &str, response: ModelsResponse) -> Result<Vec<CatalogOption>, CatalogError> {
    if !response.success {
        return Err(CatalogError::ModelsUnavailable {
            brand_id: brand_id.to_string(),
            message: response
                .error
                .unwrap_or_else(|| "server reported failure".to_string()),
        });
    }

    if response.models.is_empty() {
        return Ok(vec![CatalogOption {
            value: String::new(),
            label: NO_MODELS_LABEL.to_string(),
        }]);
    }

    Ok(response.models.iter().map(CatalogOption::from).collect())
}

/// Car types never fail: anything short of a non-empty list yields the
/// built-in defaults.
pub fn car_type_options(
    model_id: &str,
    response: Result<CarTypesResponse, ClientError>,
) -> Vec<CatalogOption> {
    match response {
        Ok(response) if response.success && !response.car_types.is_empty() => {
            response.car_types.iter().map(CatalogOption::from).collect()
        }
        Ok(response) if response.success => default_car_types(),
        Ok(response) => {
            warn!(
                event = "core.catalog.car_types_rejected",
                model_id = model_id,
                error = response.error.as_deref().unwrap_or("unknown")
            );
            default_car_types()
        }
        Err(e) => {
            warn!(
                event = "core.catalog.car_types_failed",
                model_id = model_id,
                error = %e
            );
            default_car_types()
        }
    }
}

pub async fn fetch_models(client: &ApiClient, brand_id: &str) -> Result<Vec<CatalogOption>, CatalogError> {
    let response = client.get_models(brand_id).await?;
    let options = model_options(brand_id, response)?;
    info!(
        event = "core.catalog.models_loaded",
        brand_id = brand_id,
        count = options.len()
    );
    Ok(options)
}

pub async fn fetch_car_types(client: &ApiClient, model_id: &str) -> Vec<CatalogOption> {
    let options = car_type_options(model_id, client.get_car_types(model_id).await);
    info!(
        event = "core.catalog.car_types_loaded",
        model_id = model_id,
        count = options.len()
    );
    options
}
