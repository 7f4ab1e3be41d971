//! Trip query configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the trip query client
///
/// The GraphQL endpoint is injected here as a resolved URL rather than looked
/// up from process-wide state, so a trigger can be pointed at any deployment
/// (or a mock server) in isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripQueryConfig {
    /// Resolved URL of the Transmodel GraphQL endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default number of trip patterns to request per page
    #[serde(default = "default_num_trip_patterns")]
    pub num_trip_patterns: u32,
}

fn default_endpoint() -> String {
    "http://localhost:8080/otp/transmodel/v3".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_num_trip_patterns() -> u32 {
    12
}

impl Default for TripQueryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            num_trip_patterns: default_num_trip_patterns(),
        }
    }
}

impl TripQueryConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            num_trip_patterns: 3,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        if Url::parse(&self.endpoint).is_err() {
            return Err(format!("endpoint is not a valid URL: {}", self.endpoint));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.num_trip_patterns == 0 {
            return Err("num_trip_patterns must be greater than 0".to_string());
        }

        Ok(())
    }
}
