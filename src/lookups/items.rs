//! Service item attribute lookups: crates, flags, prices and ports.

use super::geography::AddressLookup;
use super::LookupContext;
use crate::domain::units::{cubic_feet, format_canonical, format_fixed};
use crate::domain::{Cents, PortLocationId, ReServiceCode, ServiceItemDimension, ServiceItemId};
use crate::error::LookupError;
use rust_decimal::Decimal;

/// Smallest crate volume billed, in cubic feet.
pub fn minimum_billed_cubic_feet() -> Decimal {
    Decimal::new(400, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrateField {
    CubicFeetCrating,
    CubicFeetBilled,
    Length,
    Width,
    Height,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateLookup {
    pub field: CrateField,
    pub service_item_id: ServiceItemId,
    pub dimension: Option<ServiceItemDimension>,
}

impl CrateLookup {
    pub fn lookup(&self) -> Result<String, LookupError> {
        let dim = self.dimension.ok_or_else(|| {
            LookupError::Conflict(format!(
                "MTOServiceItem {} has no crate dimension",
                self.service_item_id
            ))
        })?;
        let volume = cubic_feet(dim.length, dim.width, dim.height);
        Ok(match self.field {
            CrateField::CubicFeetCrating => format_fixed(volume, 2),
            CrateField::CubicFeetBilled => {
                let rounded = volume.round_dp_with_strategy(
                    2,
                    rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                );
                format_fixed(rounded.max(minimum_billed_cubic_feet()), 2)
            }
            CrateField::Length => format_canonical(dim.length.to_inches()),
            CrateField::Width => format_canonical(dim.width.to_inches()),
            CrateField::Height => format_canonical(dim.height.to_inches()),
        })
    }
}

/// Scalar attribute of the service item or of configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFieldLookup {
    ExternalCrate {
        service_item_id: ServiceItemId,
        value: Option<bool>,
    },
    /// Absent means not standalone.
    StandaloneCrate(Option<bool>),
    StandaloneCrateCap,
    LockedPriceCents {
        service_item_id: ServiceItemId,
        value: Option<Cents>,
    },
}

impl ItemFieldLookup {
    pub fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        match self {
            ItemFieldLookup::ExternalCrate {
                service_item_id,
                value,
            } => value.map(|v| v.to_string()).ok_or_else(|| {
                LookupError::NotFound(format!(
                    "MTOServiceItem {} has no ExternalCrate value",
                    service_item_id
                ))
            }),
            ItemFieldLookup::StandaloneCrate(value) => Ok(value.unwrap_or(false).to_string()),
            ItemFieldLookup::StandaloneCrateCap => {
                Ok(format_fixed(ctx.config.standalone_crate_cap.to_dollars(), 2))
            }
            ItemFieldLookup::LockedPriceCents {
                service_item_id,
                value,
            } => value.map(|v| v.to_string()).ok_or_else(|| {
                LookupError::NotFound(format!(
                    "MTOServiceItem {} has no locked price cents",
                    service_item_id
                ))
            }),
        }
    }
}

/// International accessorial per-unit price in the market of the item's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerUnitCentsLookup {
    pub code: ReServiceCode,
    pub address: AddressLookup,
}

impl PerUnitCentsLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let market = self.address.market()?;
        let cents = ctx
            .repo
            .fetch_intl_accessorial_price(ctx.contract.id, self.code, market)
            .await?
            .ok_or_else(|| {
                LookupError::NotFound(format!(
                    "per unit cents for service code {} in market {} under contract {}",
                    self.code, market, ctx.contract.code
                ))
            })?;
        Ok(cents.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortField {
    Name,
    Zip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLookup {
    pub field: PortField,
    pub service_item_id: ServiceItemId,
    pub port_location_id: Option<PortLocationId>,
}

impl PortLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let id = self.port_location_id.ok_or_else(|| {
            LookupError::NotFound(format!(
                "MTOServiceItem {} has no port location",
                self.service_item_id
            ))
        })?;
        let port = ctx
            .repo
            .fetch_port_location(id)
            .await?
            .ok_or_else(|| LookupError::NotFound(format!("port location {}", id)))?;
        Ok(match self.field {
            PortField::Name => port.port_name,
            PortField::Zip => port.postal_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DimensionType, ThousandthInches};

    fn crate_lookup(field: CrateField, l: i32, w: i32, h: i32) -> CrateLookup {
        CrateLookup {
            field,
            service_item_id: ServiceItemId::generate(),
            dimension: Some(ServiceItemDimension {
                dimension_type: DimensionType::Crate,
                length: ThousandthInches::new(l),
                width: ThousandthInches::new(w),
                height: ThousandthInches::new(h),
            }),
        }
    }

    #[test]
    fn test_cubic_feet() {
        // 12 x 24 x 18 inches = 3 cubic feet
        let lookup = crate_lookup(CrateField::CubicFeetCrating, 12_000, 24_000, 18_000);
        assert_eq!(lookup.lookup().unwrap(), "3.00");

        let lookup = crate_lookup(CrateField::CubicFeetBilled, 12_000, 24_000, 18_000);
        assert_eq!(lookup.lookup().unwrap(), "4.00");

        // 36 x 24 x 24 inches = 12 cubic feet
        let lookup = crate_lookup(CrateField::CubicFeetBilled, 36_000, 24_000, 24_000);
        assert_eq!(lookup.lookup().unwrap(), "12.00");
    }

    #[test]
    fn test_dimensions_in_inches() {
        assert_eq!(
            crate_lookup(CrateField::Length, 36_500, 24_000, 18_000)
                .lookup()
                .unwrap(),
            "36.5"
        );
        assert_eq!(
            crate_lookup(CrateField::Height, 36_500, 24_000, 18_000)
                .lookup()
                .unwrap(),
            "18"
        );
    }

    #[test]
    fn test_missing_crate_dimension_is_conflict() {
        let lookup = CrateLookup {
            field: CrateField::Width,
            service_item_id: ServiceItemId::generate(),
            dimension: None,
        };
        assert!(matches!(lookup.lookup(), Err(LookupError::Conflict(_))));
    }
}
