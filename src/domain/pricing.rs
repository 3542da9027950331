//! Contract-scoped pricing geography and reference data.

use super::primitives::{ContractId, PortLocationId};
use super::units::Millicents;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Domestic service area a zip3 maps to under a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomesticServiceArea {
    pub contract_id: ContractId,
    pub service_area: String,
    pub services_schedule: i32,
    pub sit_pd_schedule: i32,
}

/// International rate area a zip5 maps to under a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateArea {
    pub contract_id: ContractId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractYear {
    pub contract_id: ContractId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub escalation_compounded: Decimal,
}

/// Weekly EIA diesel price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelPrice {
    pub publication_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fuel_price: Millicents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLocation {
    pub id: PortLocationId,
    pub port_code: String,
    pub port_name: String,
    pub postal_code: String,
}
