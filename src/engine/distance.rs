use crate::db::Repository;
use crate::domain::MtoShipment;
use crate::error::LookupError;
use crate::planner::RoutePlanner;
use tracing::{debug, info, warn};

/// Minimum postal code length the planner accepts.
pub const MIN_ZIP_LENGTH: usize = 5;

/// Zip-to-zip transit mileage, choosing planner granularity by zip3 prefix.
#[derive(Clone, Copy)]
pub struct DistanceResolver<'a> {
    repo: &'a Repository,
    planner: &'a dyn RoutePlanner,
}

impl<'a> DistanceResolver<'a> {
    pub fn new(repo: &'a Repository, planner: &'a dyn RoutePlanner) -> Self {
        Self { repo, planner }
    }

    /// Coarse distance when both zips share their first three digits, fine
    /// distance otherwise.
    pub async fn zip_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, LookupError> {
        validate_zip(origin_zip)?;
        validate_zip(dest_zip)?;

        if same_zip3(origin_zip, dest_zip) {
            debug!(origin_zip, dest_zip, "Using zip3 transit distance");
            Ok(self
                .planner
                .zip3_transit_distance(origin_zip, dest_zip)
                .await?)
        } else {
            debug!(origin_zip, dest_zip, "Using zip5 transit distance");
            Ok(self
                .planner
                .zip5_transit_distance(origin_zip, dest_zip)
                .await?)
        }
    }

    pub async fn zip3_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, LookupError> {
        validate_zip(origin_zip)?;
        validate_zip(dest_zip)?;
        Ok(self
            .planner
            .zip3_transit_distance(origin_zip, dest_zip)
            .await?)
    }

    pub async fn zip5_transit_distance(
        &self,
        origin_zip: &str,
        dest_zip: &str,
    ) -> Result<i32, LookupError> {
        validate_zip(origin_zip)?;
        validate_zip(dest_zip)?;
        Ok(self
            .planner
            .zip5_transit_distance(origin_zip, dest_zip)
            .await?)
    }

    /// Primary pickup-to-destination distance of a shipment.
    ///
    /// A distance already stored on the shipment wins. Otherwise the distance
    /// is computed and written back; if a concurrent session stored one first,
    /// that stored value is returned instead of ours.
    pub async fn shipment_distance(&self, shipment: &MtoShipment) -> Result<i32, LookupError> {
        if let Some(miles) = shipment.distance {
            return Ok(miles);
        }
        if let Some(miles) = self.repo.get_shipment_distance(shipment.id).await? {
            debug!(shipment_id = %shipment.id, miles, "Using stored shipment distance");
            return Ok(miles);
        }

        let pickup = shipment.pickup_address.as_ref().ok_or_else(|| {
            LookupError::NotFound(format!("MTOShipment {} has no pickup address", shipment.id))
        })?;
        let destination = shipment.destination_address.as_ref().ok_or_else(|| {
            LookupError::NotFound(format!(
                "MTOShipment {} has no destination address",
                shipment.id
            ))
        })?;

        let miles = self
            .zip_transit_distance(&pickup.postal_code, &destination.postal_code)
            .await?;

        if self
            .repo
            .set_shipment_distance_if_unset(shipment.id, miles)
            .await?
        {
            info!(shipment_id = %shipment.id, miles, "Stored shipment distance");
            return Ok(miles);
        }

        match self.repo.get_shipment_distance(shipment.id).await? {
            Some(stored) => {
                warn!(
                    shipment_id = %shipment.id,
                    computed = miles,
                    stored,
                    "Shipment distance already stored by another session"
                );
                Ok(stored)
            }
            None => Err(LookupError::NotFound(format!(
                "MTOShipment {} not found while storing distance",
                shipment.id
            ))),
        }
    }
}

fn validate_zip(zip: &str) -> Result<(), LookupError> {
    if zip.chars().count() < MIN_ZIP_LENGTH {
        return Err(LookupError::InvalidInput(format!(
            "postal code {} must be at least {} characters",
            zip, MIN_ZIP_LENGTH
        )));
    }
    Ok(())
}

/// Whether two postal codes share their first three characters.
pub fn same_zip3(a: &str, b: &str) -> bool {
    a.chars().take(3).eq(b.chars().take(3))
}
