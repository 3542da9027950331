//! Domain types for service item parameter resolution.
//!
//! This module provides:
//! - Typed identifiers and integer-backed units (pounds, cents, inches)
//! - The closed sets of parameter names and service codes
//! - Snapshots of moves, shipments, service items and payment history
//! - Contract-scoped pricing reference data

pub mod param_name;
pub mod payment;
pub mod pricing;
pub mod primitives;
pub mod service_code;
pub mod service_item;
pub mod shipment;
pub mod units;

pub use param_name::{ParamOrigin, ServiceItemParamName, ServiceParamKey, UnknownParamName};
pub use payment::{
    PaymentRequestStatus, PaymentServiceItemStatus, SitBilledRange, SitBilledRangeRow,
};
pub use pricing::{ContractYear, DomesticServiceArea, FuelPrice, PortLocation, RateArea};
pub use primitives::{
    AddressId, ContractId, MoveId, PaymentRequestId, PaymentServiceItemId, PortLocationId,
    ServiceItemId, ShipmentId,
};
pub use service_code::{ReServiceCode, SitKind, SitLocation};
pub use service_item::{DimensionType, MtoServiceItem, ServiceItemDimension};
pub use shipment::{Address, Contract, Move, MtoShipment, ShipmentType};
pub use units::{Cents, Millicents, Pound, ThousandthInches};
