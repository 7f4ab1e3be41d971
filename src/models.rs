//! Trip query data models
//!
//! Typed representations of the Transmodel trip-search input (locations and
//! query variables) and the returned trip patterns. Wire names are camelCase
//! to match the GraphQL schema.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates (WGS84)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
}

/// A place descriptor for one end of a trip search
///
/// A location is expressed as geographic coordinates, an opaque place
/// identifier (stop / quay id), or both. The optional name is display-only
/// and never affects validity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Human-readable label for the location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Opaque place identifier (e.g. a NeTEx quay or stop place id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Geographic coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Create a location from a place identifier
    #[must_use]
    pub fn from_place(place: impl Into<String>) -> Self {
        Self {
            place: Some(place.into()),
            ..Self::default()
        }
    }

    /// Create a location from coordinates
    #[must_use]
    pub const fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            place: None,
            coordinates: Some(Coordinates {
                latitude,
                longitude,
            }),
        }
    }

    /// Attach a display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// A location is valid when it carries coordinates or a place identifier
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.coordinates.is_some() || self.place.is_some()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return write!(f, "{name}");
        }
        if let Some(place) = &self.place {
            return write!(f, "{place}");
        }
        if let Some(coords) = &self.coordinates {
            return write!(f, "{},{}", coords.latitude, coords.longitude);
        }
        write!(f, "<empty location>")
    }
}

/// Validity predicate over an optional location
///
/// An absent location is never valid; a present one is valid iff it carries
/// coordinates or a place identifier.
#[must_use]
pub fn valid_location(location: Option<&Location>) -> bool {
    location.is_some_and(Location::is_valid)
}

/// Street and transit mode selection for a trip search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TripModes {
    /// Street mode from origin to the first stop (e.g. "foot", "bicycle")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_mode: Option<String>,
    /// Street mode from the last stop to the destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egress_mode: Option<String>,
    /// Street mode for a transit-free direct trip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_mode: Option<String>,
    /// Transit modes to include (e.g. "rail", "bus"); empty means all
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub transit_modes: Vec<String>,
}

/// Input variables for the trip query document
///
/// `from` and `to` are the two observed fields that drive automatic search
/// triggering; everything else is forwarded opaquely to the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripQueryVariables {
    /// Trip origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Location>,
    /// Trip destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Location>,
    /// Departure (or arrival, see `arrive_by`) time; None means now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    /// Interpret `date_time` as latest arrival instead of earliest departure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrive_by: Option<bool>,
    /// Number of trip patterns to return per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_trip_patterns: Option<u32>,
    /// Search window in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_window: Option<u32>,
    /// Mode selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modes: Option<TripModes>,
    /// Pagination continuation token from a previous result page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_cursor: Option<String>,
}

impl TripQueryVariables {
    /// Create variables for a search between two locations
    #[must_use]
    pub fn between(from: Location, to: Location) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Merge a pagination cursor into the variables, overriding any
    /// cursor already present
    #[must_use]
    pub fn with_page_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.page_cursor = Some(cursor.into());
        self
    }

    /// True when both endpoints are present and valid
    #[must_use]
    pub fn endpoints_valid(&self) -> bool {
        valid_location(self.from.as_ref()) && valid_location(self.to.as_ref())
    }
}

/// Response from a trip search: one page of trip patterns plus cursors
/// to continue the search in either direction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    /// Found trip patterns (itineraries)
    #[serde(default)]
    pub trip_patterns: Vec<TripPattern>,
    /// Cursor for the next page of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_cursor: Option<String>,
    /// Cursor for the previous page of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_cursor: Option<String>,
}

impl TripResponse {
    /// Create a response with no results
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A single trip pattern (itinerary) from origin to destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripPattern {
    /// Scheduled start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aimed_start_time: Option<DateTime<Utc>>,
    /// Expected start time (includes real-time delay)
    pub expected_start_time: DateTime<Utc>,
    /// Expected end time (includes real-time delay)
    pub expected_end_time: DateTime<Utc>,
    /// Total duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Total distance in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Individual legs of the trip
    #[serde(default)]
    pub legs: Vec<TripLeg>,
}

impl TripPattern {
    /// Total travel duration in minutes
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        let duration = self.expected_end_time - self.expected_start_time;
        duration.num_minutes().unsigned_abs() as u32
    }

    /// Number of transfers (transit legs - 1)
    #[must_use]
    pub fn transfers(&self) -> u8 {
        let transit_legs = self
            .legs
            .iter()
            .filter(|leg| !leg.is_street_leg())
            .count();
        transit_legs.saturating_sub(1) as u8
    }
}

/// A single leg (segment) of a trip pattern
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripLeg {
    /// Travel mode for this leg (e.g. "foot", "bus", "rail")
    pub mode: String,
    /// Leg distance in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Leg duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Expected departure time
    pub expected_start_time: DateTime<Utc>,
    /// Expected arrival time
    pub expected_end_time: DateTime<Utc>,
    /// Boarding place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_place: Option<Place>,
    /// Alighting place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_place: Option<Place>,
    /// Line serving this leg (absent for street legs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineInfo>,
}

impl TripLeg {
    /// True for walking / cycling / driving legs with no transit line
    #[must_use]
    pub fn is_street_leg(&self) -> bool {
        self.line.is_none()
    }
}

/// A named place along a trip leg
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Human-readable place name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Information about a transit line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineInfo {
    /// Public-facing line code (e.g. "RE1", "M4")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_code: Option<String>,
    /// Full line name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
