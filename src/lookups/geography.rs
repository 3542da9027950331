//! Address, market, distance and pricing-area lookups.

use super::LookupContext;
use crate::domain::{Address, MtoShipment, ShipmentId};
use crate::engine::{AreaResolver, DistanceResolver};
use crate::error::LookupError;

/// One of the shipment's addresses, by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookup {
    pub shipment_id: ShipmentId,
    pub label: &'static str,
    pub address: Option<Address>,
}

impl AddressLookup {
    pub fn new(shipment: &MtoShipment, label: &'static str, address: Option<&Address>) -> Self {
        Self {
            shipment_id: shipment.id,
            label,
            address: address.cloned(),
        }
    }

    /// First of `preferred` or `fallback` that is present on the shipment.
    pub fn with_fallback(
        shipment: &MtoShipment,
        preferred: (&'static str, Option<&Address>),
        fallback: (&'static str, Option<&Address>),
    ) -> Self {
        match preferred.1 {
            Some(_) => Self::new(shipment, preferred.0, preferred.1),
            None => Self::new(shipment, fallback.0, fallback.1),
        }
    }

    pub fn address(&self) -> Result<&Address, LookupError> {
        self.address.as_ref().ok_or_else(|| {
            LookupError::NotFound(format!(
                "MTOShipment {} has no {} address",
                self.shipment_id, self.label
            ))
        })
    }

    pub fn zip(&self) -> Result<&str, LookupError> {
        Ok(self.address()?.postal_code.as_str())
    }

    /// `"O"` outside the continental US, `"C"` inside.
    pub fn market(&self) -> Result<&'static str, LookupError> {
        let address = self.address()?;
        match address.is_oconus {
            Some(true) => Ok("O"),
            Some(false) => Ok("C"),
            None => Err(LookupError::NotFound(format!(
                "{} address {} of MTOShipment {} has no CONUS/OCONUS classification",
                self.label, address.id, self.shipment_id
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceLookup {
    /// Persisted primary distance, computed and stored on first use.
    Shipment(Box<MtoShipment>),
    /// Coarse planner distance regardless of prefixes.
    Zip3 {
        origin: AddressLookup,
        destination: AddressLookup,
    },
    /// Fine planner distance regardless of prefixes.
    Zip5 {
        origin: AddressLookup,
        destination: AddressLookup,
    },
    /// Granularity chosen by prefix; never persisted.
    Between {
        origin: AddressLookup,
        destination: AddressLookup,
    },
}

impl DistanceLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let resolver = DistanceResolver::new(ctx.repo, ctx.planner);
        let miles = match self {
            DistanceLookup::Shipment(shipment) => resolver.shipment_distance(shipment).await?,
            DistanceLookup::Zip3 {
                origin,
                destination,
            } => {
                resolver
                    .zip3_transit_distance(origin.zip()?, destination.zip()?)
                    .await?
            }
            DistanceLookup::Zip5 {
                origin,
                destination,
            } => {
                resolver
                    .zip5_transit_distance(origin.zip()?, destination.zip()?)
                    .await?
            }
            DistanceLookup::Between {
                origin,
                destination,
            } => {
                resolver
                    .zip_transit_distance(origin.zip()?, destination.zip()?)
                    .await?
            }
        };
        Ok(miles.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomesticAreaField {
    ServiceArea,
    ServicesSchedule,
    SitSchedule,
}

/// Domestic service area attribute of an address's zip3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomesticAreaLookup {
    pub address: AddressLookup,
    pub field: DomesticAreaField,
}

impl DomesticAreaLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let area = AreaResolver::new(ctx.repo, ctx.contract)
            .domestic_service_area(self.address.zip()?)
            .await?;
        Ok(match self.field {
            DomesticAreaField::ServiceArea => area.service_area,
            DomesticAreaField::ServicesSchedule => area.services_schedule.to_string(),
            DomesticAreaField::SitSchedule => area.sit_pd_schedule.to_string(),
        })
    }
}

/// International rate area code of an address's zip5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateAreaLookup {
    pub address: AddressLookup,
}

impl RateAreaLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let area = AreaResolver::new(ctx.repo, ctx.contract)
            .rate_area(self.address.zip()?)
            .await?;
        Ok(area.code)
    }
}
