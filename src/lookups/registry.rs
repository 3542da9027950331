//! Binding of every parameter name to the lookup that resolves it.

use super::dates::{
    AvailableToPrimeLookup, ContractYearField, ContractYearLookup, PeakLookup, ShipmentDateField,
    ShipmentDateLookup,
};
use super::fuel::{FuelField, FuelPriceLookup};
use super::geography::{
    AddressLookup, DistanceLookup, DomesticAreaField, DomesticAreaLookup, RateAreaLookup,
};
use super::items::{CrateField, CrateLookup, ItemFieldLookup, PerUnitCentsLookup, PortField, PortLookup};
use super::sit_days::SitDaysLookup;
use super::weights::{FscMultiplierLookup, WeightField, WeightLookup};
use super::{LookupContext, NOT_IMPLEMENTED};
use crate::domain::{
    Contract, Move, MtoServiceItem, MtoShipment, ServiceItemId, ServiceItemParamName,
};
use crate::error::LookupError;
use std::collections::HashMap;

/// How one parameter is resolved. Each variant carries only the snapshot
/// data it was bound with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceItemParamLookup {
    /// Declared but computed elsewhere; resolves to [`NOT_IMPLEMENTED`].
    NotImplemented,
    /// Supplied by the requester on the payment request.
    PrimeSupplied(ServiceItemParamName),
    /// The parameter needs a shipment and the service item has none.
    NoShipment(ServiceItemId),
    ContractCode(String),
    AvailableToPrime(AvailableToPrimeLookup),
    ShipmentDate(ShipmentDateLookup),
    Peak(PeakLookup),
    ContractYear(ContractYearLookup),
    Zip(AddressLookup),
    Market(AddressLookup),
    Distance(DistanceLookup),
    DomesticArea(DomesticAreaLookup),
    RateArea(RateAreaLookup),
    Weight(WeightLookup),
    FscMultiplier(FscMultiplierLookup),
    FuelPrice(FuelPriceLookup),
    SitDays(SitDaysLookup),
    Crate(CrateLookup),
    ItemField(ItemFieldLookup),
    PerUnitCents(PerUnitCentsLookup),
    Port(PortLookup),
}

impl ServiceItemParamLookup {
    pub async fn resolve(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        match self {
            ServiceItemParamLookup::NotImplemented => Ok(NOT_IMPLEMENTED.to_string()),
            ServiceItemParamLookup::PrimeSupplied(name) => {
                ctx.prime_values.get(name).cloned().ok_or_else(|| {
                    LookupError::NotFound(format!("{} was not supplied", name))
                })
            }
            ServiceItemParamLookup::NoShipment(id) => Err(LookupError::NotFound(format!(
                "MTOServiceItem {} has no MTOShipment",
                id
            ))),
            ServiceItemParamLookup::ContractCode(code) => Ok(code.clone()),
            ServiceItemParamLookup::AvailableToPrime(l) => l.lookup(),
            ServiceItemParamLookup::ShipmentDate(l) => l.lookup(),
            ServiceItemParamLookup::Peak(l) => l.lookup(),
            ServiceItemParamLookup::ContractYear(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::Zip(l) => Ok(l.zip()?.to_string()),
            ServiceItemParamLookup::Market(l) => Ok(l.market()?.to_string()),
            ServiceItemParamLookup::Distance(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::DomesticArea(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::RateArea(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::Weight(l) => l.lookup(),
            ServiceItemParamLookup::FscMultiplier(l) => l.lookup(),
            ServiceItemParamLookup::FuelPrice(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::SitDays(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::Crate(l) => l.lookup(),
            ServiceItemParamLookup::ItemField(l) => l.lookup(ctx),
            ServiceItemParamLookup::PerUnitCents(l) => l.lookup(ctx).await,
            ServiceItemParamLookup::Port(l) => l.lookup(ctx).await,
        }
    }
}

/// Snapshot the registry is bound from.
#[derive(Debug, Clone, Copy)]
pub struct LookupSnapshot<'a> {
    pub mv: &'a Move,
    pub contract: &'a Contract,
    pub shipment: Option<&'a MtoShipment>,
    pub service_item: &'a MtoServiceItem,
}

/// Immutable map from every parameter name to its lookup.
#[derive(Debug, Clone)]
pub struct LookupRegistry {
    lookups: HashMap<ServiceItemParamName, ServiceItemParamLookup>,
}

impl LookupRegistry {
    pub fn new(snapshot: LookupSnapshot<'_>) -> Self {
        let lookups = ServiceItemParamName::ALL
            .iter()
            .map(|&name| (name, bind(name, snapshot)))
            .collect();
        Self { lookups }
    }

    pub fn get(&self, name: ServiceItemParamName) -> Option<&ServiceItemParamLookup> {
        self.lookups.get(&name)
    }

    pub fn is_bound(&self, name: ServiceItemParamName) -> bool {
        self.lookups.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }
}

fn bind(name: ServiceItemParamName, snap: LookupSnapshot<'_>) -> ServiceItemParamLookup {
    use ServiceItemParamLookup as L;
    use ServiceItemParamName as N;

    let item = snap.service_item;
    let on_shipment = |f: &dyn Fn(&MtoShipment) -> ServiceItemParamLookup| match snap.shipment {
        Some(shipment) => f(shipment),
        None => L::NoShipment(item.id),
    };
    let weight = |field: WeightField| {
        on_shipment(&|s| {
            L::Weight(WeightLookup {
                field,
                shipment: Box::new(s.clone()),
                item: Box::new(item.clone()),
            })
        })
    };

    match name {
        // Produced by the pricing formulas themselves.
        N::PriceRateOrFactor
        | N::FscWeightBasedDistanceMultiplier
        | N::UncappedRequestTotal
        | N::NtsPackingFactor
        | N::PsiLinehaulDom
        | N::PsiLinehaulDomPrice
        | N::PsiLinehaulShort
        | N::PsiLinehaulShortPrice
        | N::PsiPackingDom
        | N::PsiPackingDomPrice
        | N::PsiPackingHhgIntl
        | N::PsiPackingHhgIntlPrice
        | N::PsiPriceDomDest
        | N::PsiPriceDomDestPrice
        | N::PsiPriceDomOrigin
        | N::PsiPriceDomOriginPrice
        | N::PsiShippingLinehaulDom
        | N::PsiShippingLinehaulDomPrice
        | N::PsiShippingLinehaulIntlCo
        | N::PsiShippingLinehaulIntlCoPrice
        | N::PsiShippingLinehaulIntlOc
        | N::PsiShippingLinehaulIntlOcPrice
        | N::PsiShippingLinehaulIntlOo
        | N::PsiShippingLinehaulIntlOoPrice => L::NotImplemented,

        N::SitPaymentRequestStart | N::SitPaymentRequestEnd => L::PrimeSupplied(name),

        N::ContractCode => L::ContractCode(snap.contract.code.clone()),
        N::MtoAvailableToPrimeAt => L::AvailableToPrime(AvailableToPrimeLookup {
            locator: snap.mv.locator.clone(),
            at: snap.mv.available_to_prime_at,
        }),

        N::ActualPickupDate => {
            on_shipment(&|s| L::ShipmentDate(date(s, ShipmentDateField::ActualPickup)))
        }
        N::RequestedPickupDate | N::ReferenceDate => {
            on_shipment(&|s| L::ShipmentDate(date(s, ShipmentDateField::RequestedPickup)))
        }
        N::IsPeak => on_shipment(&|s| {
            L::Peak(PeakLookup {
                reference: date(s, ShipmentDateField::RequestedPickup),
            })
        }),
        N::ContractYearName => on_shipment(&|s| {
            L::ContractYear(ContractYearLookup {
                reference: date(s, ShipmentDateField::RequestedPickup),
                field: ContractYearField::Name,
            })
        }),
        N::EscalationCompounded => on_shipment(&|s| {
            L::ContractYear(ContractYearLookup {
                reference: date(s, ShipmentDateField::RequestedPickup),
                field: ContractYearField::EscalationCompounded,
            })
        }),

        N::ZipPickupAddress => on_shipment(&|s| L::Zip(pickup(s))),
        N::ZipDestAddress => on_shipment(&|s| L::Zip(destination(s))),
        N::ZipSitOriginHhgOriginalAddress => on_shipment(&|s| L::Zip(sit_origin_original(s))),
        N::ZipSitOriginHhgActualAddress => on_shipment(&|s| L::Zip(sit_origin_actual(s))),
        N::ZipSitDestHhgOriginalAddress => on_shipment(&|s| L::Zip(sit_dest_original(s))),
        N::ZipSitDestHhgFinalAddress => on_shipment(&|s| L::Zip(sit_dest_final(s))),
        N::MarketOrigin => on_shipment(&|s| L::Market(pickup(s))),
        N::MarketDest => on_shipment(&|s| L::Market(destination(s))),

        N::DistanceZip => {
            on_shipment(&|s| L::Distance(DistanceLookup::Shipment(Box::new(s.clone()))))
        }
        N::DistanceZip3 => on_shipment(&|s| {
            L::Distance(DistanceLookup::Zip3 {
                origin: pickup(s),
                destination: destination(s),
            })
        }),
        N::DistanceZip5 => on_shipment(&|s| {
            L::Distance(DistanceLookup::Zip5 {
                origin: pickup(s),
                destination: destination(s),
            })
        }),
        N::DistanceZipSitOrigin => on_shipment(&|s| {
            L::Distance(DistanceLookup::Between {
                origin: sit_origin_original(s),
                destination: sit_origin_actual(s),
            })
        }),
        N::DistanceZipSitDest => on_shipment(&|s| {
            L::Distance(DistanceLookup::Between {
                origin: destination(s),
                destination: sit_dest_final(s),
            })
        }),

        N::ServiceAreaOrigin => {
            on_shipment(&|s| domestic(pickup(s), DomesticAreaField::ServiceArea))
        }
        N::ServiceAreaDest => {
            on_shipment(&|s| domestic(destination(s), DomesticAreaField::ServiceArea))
        }
        N::ServicesScheduleOrigin => {
            on_shipment(&|s| domestic(pickup(s), DomesticAreaField::ServicesSchedule))
        }
        N::ServicesScheduleDest => {
            on_shipment(&|s| domestic(destination(s), DomesticAreaField::ServicesSchedule))
        }
        N::SitServiceAreaOrigin => {
            on_shipment(&|s| domestic(sit_origin(s), DomesticAreaField::ServiceArea))
        }
        N::SitServiceAreaDest => {
            on_shipment(&|s| domestic(sit_dest(s), DomesticAreaField::ServiceArea))
        }
        N::SitScheduleOrigin => {
            on_shipment(&|s| domestic(sit_origin(s), DomesticAreaField::SitSchedule))
        }
        N::SitScheduleDest => {
            on_shipment(&|s| domestic(sit_dest(s), DomesticAreaField::SitSchedule))
        }
        N::PriceAreaIntlOrigin => {
            on_shipment(&|s| L::RateArea(RateAreaLookup { address: pickup(s) }))
        }
        N::PriceAreaIntlDest => on_shipment(&|s| {
            L::RateArea(RateAreaLookup {
                address: destination(s),
            })
        }),
        N::SitRateAreaOrigin => on_shipment(&|s| {
            L::RateArea(RateAreaLookup {
                address: sit_origin(s),
            })
        }),
        N::SitRateAreaDest => on_shipment(&|s| {
            L::RateArea(RateAreaLookup {
                address: sit_dest(s),
            })
        }),

        N::WeightBilled => weight(WeightField::Billed),
        N::WeightOriginal => weight(WeightField::Original),
        N::WeightEstimated => weight(WeightField::Estimated),
        N::WeightReweigh => weight(WeightField::Reweigh),
        N::WeightAdjusted => weight(WeightField::Adjusted),
        N::FscMultiplier => on_shipment(&|s| {
            L::FscMultiplier(FscMultiplierLookup {
                shipment: Box::new(s.clone()),
                item: Box::new(item.clone()),
            })
        }),
        N::EiaFuelPrice => on_shipment(&|s| {
            L::FuelPrice(FuelPriceLookup {
                field: FuelField::EiaPrice,
                actual_pickup: date(s, ShipmentDateField::ActualPickup),
            })
        }),
        N::FscPriceDifferenceInCents => on_shipment(&|s| {
            L::FuelPrice(FuelPriceLookup {
                field: FuelField::PriceDifferenceInCents,
                actual_pickup: date(s, ShipmentDateField::ActualPickup),
            })
        }),

        N::NumberDaysSit => on_shipment(&|s| {
            L::SitDays(SitDaysLookup {
                shipment: Box::new(s.clone()),
                item: Box::new(item.clone()),
            })
        }),

        N::CubicFeetCrating => crate_lookup(item, CrateField::CubicFeetCrating),
        N::CubicFeetBilled => crate_lookup(item, CrateField::CubicFeetBilled),
        N::DimensionLength => crate_lookup(item, CrateField::Length),
        N::DimensionWidth => crate_lookup(item, CrateField::Width),
        N::DimensionHeight => crate_lookup(item, CrateField::Height),
        N::ExternalCrate => L::ItemField(ItemFieldLookup::ExternalCrate {
            service_item_id: item.id,
            value: item.external_crate,
        }),
        N::StandaloneCrate => L::ItemField(ItemFieldLookup::StandaloneCrate(item.standalone_crate)),
        N::StandaloneCrateCap => L::ItemField(ItemFieldLookup::StandaloneCrateCap),
        N::LockedPriceCents => L::ItemField(ItemFieldLookup::LockedPriceCents {
            service_item_id: item.id,
            value: item.locked_price_cents,
        }),
        N::PerUnitCents => on_shipment(&|s| {
            L::PerUnitCents(PerUnitCentsLookup {
                code: item.code,
                address: if item.code.is_destination_side() {
                    destination(s)
                } else {
                    pickup(s)
                },
            })
        }),
        N::PortName => port_lookup(item, PortField::Name),
        N::PortZip => port_lookup(item, PortField::Zip),
    }
}

fn pickup(s: &MtoShipment) -> AddressLookup {
    AddressLookup::new(s, "pickup", s.pickup_address.as_ref())
}

fn destination(s: &MtoShipment) -> AddressLookup {
    AddressLookup::new(s, "destination", s.destination_address.as_ref())
}

fn sit_origin_original(s: &MtoShipment) -> AddressLookup {
    AddressLookup::new(
        s,
        "SIT origin HHG original",
        s.sit_origin_hhg_original_address.as_ref(),
    )
}

fn sit_origin_actual(s: &MtoShipment) -> AddressLookup {
    AddressLookup::new(
        s,
        "SIT origin HHG actual",
        s.sit_origin_hhg_actual_address.as_ref(),
    )
}

fn sit_dest_original(s: &MtoShipment) -> AddressLookup {
    AddressLookup::new(
        s,
        "SIT destination HHG original",
        s.sit_dest_original_address.as_ref(),
    )
}

fn sit_dest_final(s: &MtoShipment) -> AddressLookup {
    AddressLookup::new(
        s,
        "SIT destination HHG final",
        s.sit_dest_final_address.as_ref(),
    )
}

/// Where goods actually sit at origin; the pickup address until recorded.
fn sit_origin(s: &MtoShipment) -> AddressLookup {
    AddressLookup::with_fallback(
        s,
        (
            "SIT origin HHG actual",
            s.sit_origin_hhg_actual_address.as_ref(),
        ),
        ("pickup", s.pickup_address.as_ref()),
    )
}

/// Where goods actually sit at destination; the destination address until recorded.
fn sit_dest(s: &MtoShipment) -> AddressLookup {
    AddressLookup::with_fallback(
        s,
        (
            "SIT destination HHG final",
            s.sit_dest_final_address.as_ref(),
        ),
        ("destination", s.destination_address.as_ref()),
    )
}

fn date(s: &MtoShipment, field: ShipmentDateField) -> ShipmentDateLookup {
    ShipmentDateLookup {
        shipment_id: s.id,
        field,
        date: match field {
            ShipmentDateField::ActualPickup => s.actual_pickup_date,
            ShipmentDateField::RequestedPickup => s.requested_pickup_date,
        },
    }
}

fn domestic(address: AddressLookup, field: DomesticAreaField) -> ServiceItemParamLookup {
    ServiceItemParamLookup::DomesticArea(DomesticAreaLookup { address, field })
}

fn crate_lookup(item: &MtoServiceItem, field: CrateField) -> ServiceItemParamLookup {
    ServiceItemParamLookup::Crate(CrateLookup {
        field,
        service_item_id: item.id,
        dimension: item.crate_dimension().copied(),
    })
}

fn port_lookup(item: &MtoServiceItem, field: PortField) -> ServiceItemParamLookup {
    ServiceItemParamLookup::Port(PortLookup {
        field,
        service_item_id: item.id,
        port_location_id: item.port_location_id,
    })
}
