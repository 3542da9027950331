//! Move, contract, address and shipment snapshots.

use super::primitives::{AddressId, ContractId, MoveId, ShipmentId};
use super::units::Pound;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Postal address. Only the fields pricing reads are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub street_address_1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Outside the continental US. Unknown for legacy rows.
    pub is_oconus: Option<bool>,
}

impl Address {
    pub fn new(postal_code: &str) -> Self {
        Self {
            id: AddressId::generate(),
            street_address_1: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: postal_code.to_string(),
            is_oconus: Some(false),
        }
    }

    pub fn with_oconus(mut self, is_oconus: Option<bool>) -> Self {
        self.is_oconus = is_oconus;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentType {
    #[serde(rename = "HHG")]
    Hhg,
    #[serde(rename = "HHG_INTO_NTS_DOMESTIC")]
    HhgIntoNts,
    #[serde(rename = "HHG_OUTOF_NTS_DOMESTIC")]
    HhgOutOfNts,
    #[serde(rename = "UNACCOMPANIED_BAGGAGE")]
    UnaccompaniedBaggage,
}

impl ShipmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentType::Hhg => "HHG",
            ShipmentType::HhgIntoNts => "HHG_INTO_NTS_DOMESTIC",
            ShipmentType::HhgOutOfNts => "HHG_OUTOF_NTS_DOMESTIC",
            ShipmentType::UnaccompaniedBaggage => "UNACCOMPANIED_BAGGAGE",
        }
    }
}

impl fmt::Display for ShipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HHG" => Ok(ShipmentType::Hhg),
            "HHG_INTO_NTS_DOMESTIC" => Ok(ShipmentType::HhgIntoNts),
            "HHG_OUTOF_NTS_DOMESTIC" => Ok(ShipmentType::HhgOutOfNts),
            "UNACCOMPANIED_BAGGAGE" => Ok(ShipmentType::UnaccompaniedBaggage),
            other => Err(format!("unknown shipment type: {}", other)),
        }
    }
}

/// Shipment snapshot with its addresses, reweigh and approved SIT extensions
/// already loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtoShipment {
    pub id: ShipmentId,
    pub move_id: MoveId,
    pub shipment_type: ShipmentType,
    pub requested_pickup_date: Option<NaiveDate>,
    pub actual_pickup_date: Option<NaiveDate>,
    pub prime_estimated_weight: Option<Pound>,
    pub prime_actual_weight: Option<Pound>,
    /// Weight adjusted by the TIO; takes precedence over every other weight.
    pub billable_weight_cap: Option<Pound>,
    pub nts_recorded_weight: Option<Pound>,
    pub reweigh_weight: Option<Pound>,
    pub sit_days_allowance: Option<i32>,
    /// Sum of approved SIT extension days.
    pub approved_sit_extension_days: i32,
    /// Persisted primary distance in miles.
    pub distance: Option<i32>,
    pub pickup_address: Option<Address>,
    pub destination_address: Option<Address>,
    pub sit_origin_hhg_original_address: Option<Address>,
    pub sit_origin_hhg_actual_address: Option<Address>,
    pub sit_dest_original_address: Option<Address>,
    pub sit_dest_final_address: Option<Address>,
}

impl MtoShipment {
    pub fn new(move_id: MoveId, shipment_type: ShipmentType) -> Self {
        Self {
            id: ShipmentId::generate(),
            move_id,
            shipment_type,
            requested_pickup_date: None,
            actual_pickup_date: None,
            prime_estimated_weight: None,
            prime_actual_weight: None,
            billable_weight_cap: None,
            nts_recorded_weight: None,
            reweigh_weight: None,
            sit_days_allowance: None,
            approved_sit_extension_days: 0,
            distance: None,
            pickup_address: None,
            destination_address: None,
            sit_origin_hhg_original_address: None,
            sit_origin_hhg_actual_address: None,
            sit_dest_original_address: None,
            sit_dest_final_address: None,
        }
    }
}

/// Move (task order) snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub id: MoveId,
    pub locator: String,
    pub contract_id: ContractId,
    pub available_to_prime_at: Option<DateTime<Utc>>,
}

/// Pricing contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub id: ContractId,
    pub code: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipment_type_roundtrip() {
        for t in [
            ShipmentType::Hhg,
            ShipmentType::HhgIntoNts,
            ShipmentType::HhgOutOfNts,
            ShipmentType::UnaccompaniedBaggage,
        ] {
            assert_eq!(ShipmentType::from_str(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn test_shipment_type_serialization() {
        let json = serde_json::to_string(&ShipmentType::HhgOutOfNts).unwrap();
        assert_eq!(json, "\"HHG_OUTOF_NTS_DOMESTIC\"");
    }
}
