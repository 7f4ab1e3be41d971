//! GraphQL trip query executor
//!
//! Sends the static trip query document with caller-supplied variables to a
//! Transmodel GraphQL endpoint (GraphQL-over-HTTP POST) and parses the
//! response envelope into typed models.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::TripQueryConfig;
use crate::document::TRIP_QUERY;
use crate::error::TripQueryError;
use crate::models::{TripQueryVariables, TripResponse};

/// Trait for trip query execution
///
/// This is the seam between the trigger and the network: the trigger only
/// needs something that turns variables into a response or an error.
#[async_trait]
pub trait GraphqlExecutor: Send + Sync {
    /// Execute the trip query with the given variables
    async fn execute(
        &self,
        variables: &TripQueryVariables,
    ) -> Result<TripResponse, TripQueryError>;
}

/// Reqwest-based trip query executor
#[derive(Debug)]
pub struct ReqwestExecutor {
    client: Client,
    config: TripQueryConfig,
}

impl ReqwestExecutor {
    /// Create a new executor for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TripQueryConfig) -> Result<Self, TripQueryError> {
        config
            .validate()
            .map_err(TripQueryError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("trip-query/0.1")
            .build()
            .map_err(|e| TripQueryError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Fill configured defaults into variables the caller left unset
    fn apply_defaults(&self, variables: &TripQueryVariables) -> TripQueryVariables {
        let mut variables = variables.clone();
        if variables.num_trip_patterns.is_none() {
            variables.num_trip_patterns = Some(self.config.num_trip_patterns);
        }
        variables
    }

    /// Check if the GraphQL endpoint is reachable
    pub async fn is_healthy(&self) -> bool {
        let probe = serde_json::json!({ "query": "{ __typename }" });
        self.client
            .post(&self.config.endpoint)
            .json(&probe)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Parse a raw GraphQL response envelope into a trip response
    fn parse_response(body: &str) -> Result<TripResponse, TripQueryError> {
        let envelope: RawEnvelope =
            serde_json::from_str(body).map_err(|e| TripQueryError::ParseError(e.to_string()))?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(TripQueryError::GraphQl(messages.join("; ")));
        }

        envelope
            .data
            .and_then(|data| data.trip)
            .ok_or_else(|| TripQueryError::ParseError("response carries no trip data".to_string()))
    }

    fn map_send_error(&self, e: &reqwest::Error) -> TripQueryError {
        if e.is_timeout() {
            TripQueryError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            TripQueryError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl GraphqlExecutor for ReqwestExecutor {
    #[instrument(skip(self, variables), fields(endpoint = %self.config.endpoint))]
    async fn execute(
        &self,
        variables: &TripQueryVariables,
    ) -> Result<TripResponse, TripQueryError> {
        let variables = self.apply_defaults(variables);
        let request = GraphqlRequest {
            query: TRIP_QUERY,
            variables: &variables,
        };

        debug!("Executing trip query");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TripQueryError::RateLimited {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(TripQueryError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TripQueryError::ParseError(e.to_string()))?;

        let result = Self::parse_response(&body)?;

        if result.trip_patterns.is_empty() {
            warn!("No trip patterns found");
        }

        debug!(count = result.trip_patterns.len(), "Trip patterns found");
        Ok(result)
    }
}

// --- Wire envelope types ---

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a TripQueryVariables,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    data: Option<RawData>,
    errors: Option<Vec<RawGraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    trip: Option<TripResponse>,
}

#[derive(Debug, Deserialize)]
struct RawGraphqlError {
    message: String,
}
