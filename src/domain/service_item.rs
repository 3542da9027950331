//! MTO service item snapshot.

use super::primitives::{MoveId, PortLocationId, ServiceItemId, ShipmentId};
use super::service_code::ReServiceCode;
use super::units::{Cents, Pound, ThousandthInches};
use chrono::NaiveDate;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionType {
    Item,
    Crate,
}

impl DimensionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionType::Item => "ITEM",
            DimensionType::Crate => "CRATE",
        }
    }
}

impl FromStr for DimensionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ITEM" => Ok(DimensionType::Item),
            "CRATE" => Ok(DimensionType::Crate),
            other => Err(format!("unknown dimension type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceItemDimension {
    pub dimension_type: DimensionType,
    pub length: ThousandthInches,
    pub width: ThousandthInches,
    pub height: ThousandthInches,
}

/// One billable line item on a move, optionally tied to a shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtoServiceItem {
    pub id: ServiceItemId,
    pub move_id: MoveId,
    pub shipment_id: Option<ShipmentId>,
    pub code: ReServiceCode,
    pub sit_entry_date: Option<NaiveDate>,
    pub sit_departure_date: Option<NaiveDate>,
    pub estimated_weight: Option<Pound>,
    pub actual_weight: Option<Pound>,
    pub external_crate: Option<bool>,
    pub standalone_crate: Option<bool>,
    pub locked_price_cents: Option<Cents>,
    pub port_location_id: Option<PortLocationId>,
    pub dimensions: Vec<ServiceItemDimension>,
    /// Creation time in epoch milliseconds; orders SIT items.
    pub created_at_ms: i64,
}

impl MtoServiceItem {
    pub fn new(move_id: MoveId, shipment_id: Option<ShipmentId>, code: ReServiceCode) -> Self {
        Self {
            id: ServiceItemId::generate(),
            move_id,
            shipment_id,
            code,
            sit_entry_date: None,
            sit_departure_date: None,
            estimated_weight: None,
            actual_weight: None,
            external_crate: None,
            standalone_crate: None,
            locked_price_cents: None,
            port_location_id: None,
            dimensions: Vec::new(),
            created_at_ms: 0,
        }
    }

    /// The crate (not item) dimension, if recorded.
    pub fn crate_dimension(&self) -> Option<&ServiceItemDimension> {
        self.dimensions
            .iter()
            .find(|d| d.dimension_type == DimensionType::Crate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_dimension_ignores_item_dimension() {
        let mut item = MtoServiceItem::new(MoveId::generate(), None, ReServiceCode::Dcrt);
        item.dimensions.push(ServiceItemDimension {
            dimension_type: DimensionType::Item,
            length: ThousandthInches::new(1000),
            width: ThousandthInches::new(1000),
            height: ThousandthInches::new(1000),
        });
        assert!(item.crate_dimension().is_none());

        item.dimensions.push(ServiceItemDimension {
            dimension_type: DimensionType::Crate,
            length: ThousandthInches::new(2000),
            width: ThousandthInches::new(2000),
            height: ThousandthInches::new(2000),
        });
        assert_eq!(
            item.crate_dimension().map(|d| d.length),
            Some(ThousandthInches::new(2000))
        );
    }
}
