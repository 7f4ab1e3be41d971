//! Static trip query document
//!
//! The fixed Transmodel GraphQL document sent for every trip search. The
//! trigger never edits the document itself; all parameterization happens
//! through the forwarded variables.

/// General-purpose trip query for debugging trip searches
pub const TRIP_QUERY: &str = r"
query TripQuery(
  $from: Location!
  $to: Location!
  $dateTime: DateTime
  $arriveBy: Boolean
  $numTripPatterns: Int
  $searchWindow: Int
  $modes: Modes
  $pageCursor: String
) {
  trip(
    from: $from
    to: $to
    dateTime: $dateTime
    arriveBy: $arriveBy
    numTripPatterns: $numTripPatterns
    searchWindow: $searchWindow
    modes: $modes
    pageCursor: $pageCursor
  ) {
    previousPageCursor
    nextPageCursor
    tripPatterns {
      aimedStartTime
      expectedStartTime
      expectedEndTime
      duration
      distance
      legs {
        mode
        distance
        duration
        expectedStartTime
        expectedEndTime
        fromPlace {
          name
        }
        toPlace {
          name
        }
        line {
          publicCode
          name
        }
      }
    }
  }
}
";
