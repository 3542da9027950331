//! Route planner abstraction for zip-to-zip transit mileage.

use async_trait::async_trait;
use std::fmt;

pub mod mock;

pub use mock::{MockPlanner, PlannerCall};

/// Route planner producing transit mileage between two postal codes.
///
/// Routing itself lives outside this crate; lookups only choose which
/// granularity to ask for.
#[async_trait]
pub trait RoutePlanner: Send + Sync + fmt::Debug {
    /// Transit miles at 3-digit zip granularity (coarse, cheaper).
    ///
    /// # Arguments
    /// * `origin_zip` - Origin postal code, at least 5 characters
    /// * `dest_zip` - Destination postal code, at least 5 characters
    async fn zip3_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, PlannerError>;

    /// Transit miles at full 5-digit zip granularity.
    ///
    /// # Arguments
    /// * `origin_zip` - Origin postal code, at least 5 characters
    /// * `dest_zip` - Destination postal code, at least 5 characters
    async fn zip5_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, PlannerError>;
}

/// Error type for route planner operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Planner could not be reached
    Unavailable(String),
    /// Planner has no route for the pair
    NoRoute { origin: String, destination: String },
    /// Other error
    Other(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::Unavailable(msg) => write!(f, "Planner unavailable: {}", msg),
            PlannerError::NoRoute {
                origin,
                destination,
            } => write!(f, "No route from {} to {}", origin, destination),
            PlannerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}
