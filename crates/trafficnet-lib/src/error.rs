use thiserror::Error;

/// Convenient result alias for the traffic network library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an intersection identifier is not part of the network.
    #[error("unknown intersection: {name}{}", format_suggestions(.suggestions))]
    UnknownIntersection {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an identifier is empty after trimming.
    #[error("intersection identifiers must not be empty")]
    InvalidIdentifier,

    /// Raised when removing a road that does not exist in both directions.
    #[error("road from {from} to {to} not found")]
    RoadNotFound { from: String, to: String },

    /// Raised when no route could be found between two intersections.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Raised when an insert would exceed a configured capacity bound.
    #[error("{what} capacity of {limit} exceeded")]
    CapacityExceeded { what: &'static str, limit: usize },

    /// Raised when a road is added with a travel time outside
    /// `1..=MAX_TRAVEL_TIME`.
    #[error(
        "travel time must be a positive integer no greater than {}, got {weight}",
        crate::graph::MAX_TRAVEL_TIME
    )]
    InvalidWeight { weight: i64 },

    /// Raised when a vehicle identifier is empty after trimming.
    #[error("vehicle identifiers must not be empty")]
    InvalidVehicleId,

    /// Raised when adding a vehicle whose identifier is already in use.
    #[error("vehicle {id} already exists")]
    DuplicateVehicle { id: String },

    /// No suitable data directory could be resolved for this platform.
    #[error("failed to resolve a data directory for the road network")]
    DataDirUnavailable,

    /// Wrapper for CSV reader/writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
