//! Weight lookups.

use crate::domain::{MtoServiceItem, MtoShipment, Pound};
use crate::engine::weight;
use crate::error::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightField {
    Billed,
    Original,
    Estimated,
    Reweigh,
    Adjusted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightLookup {
    pub field: WeightField,
    pub shipment: Box<MtoShipment>,
    pub item: Box<MtoServiceItem>,
}

impl WeightLookup {
    pub fn lookup(&self) -> Result<String, LookupError> {
        let optional = |w: Option<Pound>| w.map(|w| w.to_string()).unwrap_or_default();
        Ok(match self.field {
            WeightField::Billed => weight::weight_billed(&self.shipment, &self.item)?.to_string(),
            WeightField::Original => {
                weight::weight_original(&self.shipment, &self.item)?.to_string()
            }
            WeightField::Estimated => {
                weight::weight_estimated(&self.shipment, &self.item)?.to_string()
            }
            WeightField::Reweigh => optional(self.shipment.reweigh_weight),
            WeightField::Adjusted => optional(self.shipment.billable_weight_cap),
        })
    }
}

/// Fuel surcharge multiplier for the bracket of the billed weight.
pub fn fsc_multiplier(billed: Pound) -> &'static str {
    match billed.as_i32() {
        w if w <= 5_000 => "0.000417",
        w if w <= 10_000 => "0.0006255",
        w if w <= 24_000 => "0.000834",
        _ => "0.00139",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FscMultiplierLookup {
    pub shipment: Box<MtoShipment>,
    pub item: Box<MtoServiceItem>,
}

impl FscMultiplierLookup {
    pub fn lookup(&self) -> Result<String, LookupError> {
        let billed = weight::weight_billed(&self.shipment, &self.item)?;
        Ok(fsc_multiplier(billed).to_string())
    }
}
