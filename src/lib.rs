pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod lookups;
pub mod planner;

pub use config::{Config, ConfigError};
pub use db::{init_db, Repository};
pub use domain::{
    Address, Contract, Move, MtoServiceItem, MtoShipment, ParamOrigin, ReServiceCode,
    ServiceItemParamName, ShipmentType,
};
pub use error::{ErrorKind, LookupError, ResolveError, ServiceParamError};
pub use lookups::{
    LookupRegistry, ParamRequest, ResolvedParam, ServiceItemParamKeyData, ServiceParamsCache,
    NOT_IMPLEMENTED,
};
pub use planner::{MockPlanner, PlannerError, RoutePlanner};
