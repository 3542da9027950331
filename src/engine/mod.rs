//! Resolvers behind the lookups: distance, pricing geography, billable
//! weight and SIT day accounting.

pub mod area;
pub mod distance;
pub mod sit;
pub mod weight;

pub use area::AreaResolver;
pub use distance::DistanceResolver;
pub use sit::{SitDayAccountant, SitDayRange, SitStay};
