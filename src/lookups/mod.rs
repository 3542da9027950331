//! Parameter lookups.
//!
//! This module provides:
//! - One lookup strategy per family of parameter names
//! - The registry binding every name to its strategy
//! - The per payment request value cache
//! - The key data context that drives resolution for one service item

pub mod cache;
pub mod dates;
pub mod fuel;
pub mod geography;
pub mod items;
pub mod key_data;
pub mod registry;
pub mod sit_days;
pub mod weights;

use crate::config::Config;
use crate::db::Repository;
use crate::domain::{Contract, PaymentRequestId, ServiceItemParamName};
use crate::planner::RoutePlanner;
use std::collections::HashMap;

pub use cache::ServiceParamsCache;
pub use key_data::{ParamRequest, ResolvedParam, ServiceItemParamKeyData};
pub use registry::{LookupRegistry, LookupSnapshot, ServiceItemParamLookup};

/// Value of parameters produced by the pricing formulas rather than looked up.
pub const NOT_IMPLEMENTED: &str = "NOT IMPLEMENTED";

/// Collaborators and request data a strategy may read while resolving.
#[derive(Debug, Clone, Copy)]
pub struct LookupContext<'a> {
    pub repo: &'a Repository,
    pub planner: &'a dyn RoutePlanner,
    pub config: &'a Config,
    pub contract: &'a Contract,
    pub payment_request_id: PaymentRequestId,
    pub prime_values: &'a HashMap<ServiceItemParamName, String>,
}
