//! Trip query trigger for journey-planning debug clients
//!
//! Issues Transmodel `trip` GraphQL queries against a journey-planning API
//! (e.g. OpenTripPlanner) and mediates between reactive origin/destination
//! changes and the network: at most one request per trigger instance is in
//! flight at a time, and paginated searches continue via opaque cursors.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern: [`GraphqlExecutor`] defines the
//! query-execution seam, implemented by [`ReqwestExecutor`] for real
//! endpoints and easily mocked in tests. [`TripQueryTrigger`] owns the
//! `{data, loading}` state and the admission gate; hosts feed it endpoint
//! changes through [`TripQueryTrigger::set_variables`] and observe guarded
//! no-ops through a [`TriggerNotifier`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trip_query::{
//!     Location, ReqwestExecutor, TripQueryConfig, TripQueryTrigger, TripQueryVariables,
//! };
//!
//! let config = TripQueryConfig::default();
//! let executor = Arc::new(ReqwestExecutor::new(&config)?);
//!
//! let variables = TripQueryVariables::between(
//!     Location::from_place("NSR:StopPlace:59872"),
//!     Location::from_coordinates(59.9139, 10.7522),
//! );
//! let trigger = TripQueryTrigger::new(executor, Some(variables));
//!
//! trigger.start().await?;                    // initial search
//! if let Some(trip) = trigger.data() {
//!     if let Some(cursor) = trip.next_page_cursor {
//!         trigger.fetch(Some(&cursor)).await?; // next page
//!     }
//! }
//! ```

mod client;
mod config;
mod document;
mod error;
mod models;
mod trigger;

pub use client::{GraphqlExecutor, ReqwestExecutor};
pub use config::TripQueryConfig;
pub use document::TRIP_QUERY;
pub use error::TripQueryError;
pub use models::{
    Coordinates, LineInfo, Location, Place, TripLeg, TripModes, TripPattern, TripQueryVariables,
    TripResponse, valid_location,
};
pub use trigger::{TracingNotifier, TriggerNotice, TriggerNotifier, TripQueryTrigger};
