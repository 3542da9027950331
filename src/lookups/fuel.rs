//! Diesel fuel price lookups.

use super::dates::{format_date, ShipmentDateLookup};
use super::LookupContext;
use crate::domain::units::format_fixed;
use crate::domain::{FuelPrice, Millicents};
use crate::error::LookupError;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelField {
    EiaPrice,
    PriceDifferenceInCents,
}

/// Fuel price in effect on the actual pickup date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelPriceLookup {
    pub field: FuelField,
    pub actual_pickup: ShipmentDateLookup,
}

impl FuelPriceLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let date = self.actual_pickup.date()?;
        let price: FuelPrice = ctx
            .repo
            .fetch_fuel_price_for_date(date)
            .await?
            .ok_or_else(|| {
                LookupError::NotFound(format!(
                    "diesel fuel price in effect on {}",
                    format_date(date)
                ))
            })?;

        Ok(match self.field {
            FuelField::EiaPrice => price.fuel_price.to_string(),
            FuelField::PriceDifferenceInCents => {
                price_difference_in_cents(price.fuel_price, ctx.config.fuel_price_baseline)
            }
        })
    }
}

/// Cents above the baseline, one decimal place, never negative.
pub fn price_difference_in_cents(price: Millicents, baseline: Millicents) -> String {
    let cents = Millicents::new(price.as_i64() - baseline.as_i64()).to_cents();
    format_fixed(cents.max(Decimal::ZERO), 1)
}
