//! Billable weight rules.
//!
//! Linehaul and packing codes bill on the shipment's weight; shuttle codes
//! bill on the service item's own weights. Both are raised to a minimum that
//! depends on the code family and the shipment type.

use crate::domain::{MtoServiceItem, MtoShipment, Pound, ReServiceCode, ShipmentType};
use crate::error::LookupError;
use rust_decimal::Decimal;

pub const STANDARD_MINIMUM_WEIGHT: Pound = Pound(500);
pub const UB_MINIMUM_WEIGHT: Pound = Pound(300);

/// Shuttle actual weight is capped at 110% of the estimate.
fn shuttle_cap_factor() -> Decimal {
    Decimal::new(11, 1)
}

/// Minimum billable weight for a code on a shipment of the given type.
pub fn minimum_billable_weight(code: ReServiceCode, shipment_type: ShipmentType) -> Pound {
    if code.is_ub_family()
        || (code.is_international() && shipment_type == ShipmentType::UnaccompaniedBaggage)
    {
        UB_MINIMUM_WEIGHT
    } else {
        STANDARD_MINIMUM_WEIGHT
    }
}

/// Actual weight of the shipment; the NTS recorded weight stands in for
/// shipments coming out of non-temporary storage.
pub fn shipment_actual_weight(shipment: &MtoShipment) -> Option<Pound> {
    if shipment.shipment_type == ShipmentType::HhgOutOfNts {
        if let Some(nts) = shipment.nts_recorded_weight {
            return Some(nts);
        }
    }
    shipment.prime_actual_weight
}

/// Shipment weight before the minimum is applied.
///
/// Adjusted weight wins; otherwise the lower of actual and reweigh.
pub fn shipment_weight(shipment: &MtoShipment) -> Result<Pound, LookupError> {
    let actual = shipment_actual_weight(shipment).ok_or_else(|| {
        LookupError::Conflict(format!(
            "could not find actual weight for MTOShipmentID [{}]",
            shipment.id
        ))
    })?;

    if let Some(adjusted) = shipment.billable_weight_cap {
        return Ok(adjusted);
    }
    Ok(match shipment.reweigh_weight {
        Some(reweigh) => actual.min(reweigh),
        None => actual,
    })
}

/// Shuttle item weight before the minimum is applied.
pub fn shuttle_weight(item: &MtoServiceItem) -> Result<Pound, LookupError> {
    let actual = item.actual_weight.ok_or_else(|| {
        LookupError::Conflict(format!(
            "could not find actual weight for MTOServiceItemID [{}]",
            item.id
        ))
    })?;

    let Some(estimated) = item.estimated_weight else {
        return Ok(actual);
    };
    let cap = estimated.scale_rounded(shuttle_cap_factor()).ok_or_else(|| {
        LookupError::InvalidInput(format!(
            "estimated weight {} of MTOServiceItemID [{}] is out of range",
            estimated, item.id
        ))
    })?;
    Ok(actual.min(cap))
}

/// Weight a pricing formula bills for `item` on `shipment`.
pub fn weight_billed(shipment: &MtoShipment, item: &MtoServiceItem) -> Result<Pound, LookupError> {
    let weight = if item.code.is_shuttle() {
        shuttle_weight(item)?
    } else if item.code.is_linehaul_family() {
        shipment_weight(shipment)?
    } else {
        return Err(LookupError::InvalidInput(format!(
            "service code {} is not billed by weight",
            item.code
        )));
    };
    Ok(weight.max(minimum_billable_weight(item.code, shipment.shipment_type)))
}

/// Unfloored actual weight: the item's for shuttle codes, the shipment's otherwise.
pub fn weight_original(shipment: &MtoShipment, item: &MtoServiceItem) -> Result<Pound, LookupError> {
    if item.code.is_shuttle() {
        item.actual_weight.ok_or_else(|| {
            LookupError::Conflict(format!(
                "could not find actual weight for MTOServiceItemID [{}]",
                item.id
            ))
        })
    } else {
        shipment_actual_weight(shipment).ok_or_else(|| {
            LookupError::Conflict(format!(
                "could not find actual weight for MTOShipmentID [{}]",
                shipment.id
            ))
        })
    }
}

/// Estimated weight: the item's for shuttle codes, the shipment's otherwise.
pub fn weight_estimated(
    shipment: &MtoShipment,
    item: &MtoServiceItem,
) -> Result<Pound, LookupError> {
    if item.code.is_shuttle() {
        item.estimated_weight.ok_or_else(|| {
            LookupError::Conflict(format!(
                "could not find estimated weight for MTOServiceItemID [{}]",
                item.id
            ))
        })
    } else {
        shipment.prime_estimated_weight.ok_or_else(|| {
            LookupError::Conflict(format!(
                "could not find estimated weight for MTOShipmentID [{}]",
                shipment.id
            ))
        })
    }
}
