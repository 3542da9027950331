//! Mock route planner for testing without a routing service.

use super::{PlannerError, RoutePlanner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded planner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerCall {
    Zip3 { origin: String, destination: String },
    Zip5 { origin: String, destination: String },
}

/// Mock planner returning fixed mileage and recording every call.
#[derive(Debug)]
pub struct MockPlanner {
    zip3_miles: i32,
    zip5_miles: i32,
    routes: HashMap<(String, String), i32>,
    failure: Option<PlannerError>,
    calls: Mutex<Vec<PlannerCall>>,
}

impl MockPlanner {
    /// Create a mock answering 1 mile for every coarse and fine request.
    pub fn new() -> Self {
        Self {
            zip3_miles: 1,
            zip5_miles: 1,
            routes: HashMap::new(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the mileage returned by coarse (zip3) requests.
    pub fn with_zip3_miles(mut self, miles: i32) -> Self {
        self.zip3_miles = miles;
        self
    }

    /// Set the mileage returned by fine (zip5) requests.
    pub fn with_zip5_miles(mut self, miles: i32) -> Self {
        self.zip5_miles = miles;
        self
    }

    /// Override the mileage for one origin/destination pair at either granularity.
    pub fn with_route(mut self, origin: &str, destination: &str, miles: i32) -> Self {
        self.routes
            .insert((origin.to_string(), destination.to_string()), miles);
        self
    }

    /// Make every request fail with the given error.
    pub fn with_failure(mut self, err: PlannerError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<PlannerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn zip3_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PlannerCall::Zip3 { .. }))
            .count()
    }

    pub fn zip5_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PlannerCall::Zip5 { .. }))
            .count()
    }

    fn record(&self, call: PlannerCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn answer(&self, origin: &str, destination: &str, default: i32) -> Result<i32, PlannerError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self
            .routes
            .get(&(origin.to_string(), destination.to_string()))
            .copied()
            .unwrap_or(default))
    }
}

impl Default for MockPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoutePlanner for MockPlanner {
    async fn zip3_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, PlannerError> {
        self.record(PlannerCall::Zip3 {
            origin: origin_zip.to_string(),
            destination: dest_zip.to_string(),
        });
        self.answer(origin_zip, dest_zip, self.zip3_miles)
    }

    async fn zip5_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, PlannerError> {
        self.record(PlannerCall::Zip5 {
            origin: origin_zip.to_string(),
            destination: dest_zip.to_string(),
        });
        self.answer(origin_zip, dest_zip, self.zip5_miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_mock_planner_records_calls() {
        let planner = MockPlanner::new().with_zip3_miles(150).with_zip5_miles(900);

        assert_eq!(
            block_on(planner.zip3_transit_distance("90210", "90211")).unwrap(),
            150
        );
        assert_eq!(
            block_on(planner.zip5_transit_distance("90210", "10001")).unwrap(),
            900
        );
        assert_eq!(planner.zip3_call_count(), 1);
        assert_eq!(planner.zip5_call_count(), 1);
        assert_eq!(
            planner.calls()[1],
            PlannerCall::Zip5 {
                origin: "90210".to_string(),
                destination: "10001".to_string(),
            }
        );
    }

    #[test]
    fn test_mock_planner_route_override() {
        let planner = MockPlanner::new().with_route("30907", "30301", 42);
        assert_eq!(
            block_on(planner.zip5_transit_distance("30907", "30301")).unwrap(),
            42
        );
        assert_eq!(
            block_on(planner.zip5_transit_distance("30301", "30907")).unwrap(),
            1
        );
    }

    #[test]
    fn test_mock_planner_failure_is_still_recorded() {
        let planner =
            MockPlanner::new().with_failure(PlannerError::Unavailable("down".to_string()));
        assert!(block_on(planner.zip3_transit_distance("35004", "35005")).is_err());
        assert_eq!(planner.zip3_call_count(), 1);
    }
}
