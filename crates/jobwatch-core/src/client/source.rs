use std::future::Future;

use crate::client::errors::ClientError;
use crate::jobs::{StatusEndpoint, StatusResponse};

/// Anything that can answer a job-status query.
///
/// [`ApiClient`](crate::client::ApiClient) is the HTTP implementation; tests
/// substitute scripted sources.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(
        &self,
        endpoint: &StatusEndpoint,
    ) -> impl Future<Output = Result<StatusResponse, ClientError>> + Send;
}
