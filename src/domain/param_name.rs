//! Service item parameter names and parameter key metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! param_names {
    ($($variant:ident => $key:literal,)*) => {
        /// Name of a single pricing input. Closed set; the string form is the
        /// key stored in `service_item_param_keys` and on payment service item
        /// params.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum ServiceItemParamName {
            $(
                #[serde(rename = $key)]
                $variant,
            )*
        }

        impl ServiceItemParamName {
            /// Every parameter name, in declaration order.
            pub const ALL: &'static [ServiceItemParamName] = &[
                $(ServiceItemParamName::$variant,)*
            ];

            /// Get the parameter key string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ServiceItemParamName::$variant => $key,)*
                }
            }
        }

        impl FromStr for ServiceItemParamName {
            type Err = UnknownParamName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(ServiceItemParamName::$variant),)*
                    other => Err(UnknownParamName(other.to_string())),
                }
            }
        }
    };
}

param_names! {
    ActualPickupDate => "ActualPickupDate",
    ContractCode => "ContractCode",
    ContractYearName => "ContractYearName",
    CubicFeetBilled => "CubicFeetBilled",
    CubicFeetCrating => "CubicFeetCrating",
    DimensionHeight => "DimensionHeight",
    DimensionLength => "DimensionLength",
    DimensionWidth => "DimensionWidth",
    DistanceZip => "DistanceZip",
    DistanceZip3 => "DistanceZip3",
    DistanceZip5 => "DistanceZip5",
    DistanceZipSitDest => "DistanceZipSITDest",
    DistanceZipSitOrigin => "DistanceZipSITOrigin",
    EiaFuelPrice => "EIAFuelPrice",
    EscalationCompounded => "EscalationCompounded",
    ExternalCrate => "ExternalCrate",
    FscMultiplier => "FSCMultiplier",
    FscPriceDifferenceInCents => "FSCPriceDifferenceInCents",
    FscWeightBasedDistanceMultiplier => "FSCWeightBasedDistanceMultiplier",
    IsPeak => "IsPeak",
    LockedPriceCents => "LockedPriceCents",
    MarketDest => "MarketDest",
    MarketOrigin => "MarketOrigin",
    MtoAvailableToPrimeAt => "MTOAvailableToPrimeAt",
    NtsPackingFactor => "NTSPackingFactor",
    NumberDaysSit => "NumberDaysSIT",
    PerUnitCents => "PerUnitCents",
    PortName => "PortName",
    PortZip => "PortZip",
    PriceAreaIntlDest => "PriceAreaIntlDest",
    PriceAreaIntlOrigin => "PriceAreaIntlOrigin",
    PriceRateOrFactor => "PriceRateOrFactor",
    PsiLinehaulDom => "PSI_LinehaulDom",
    PsiLinehaulDomPrice => "PSI_LinehaulDomPrice",
    PsiLinehaulShort => "PSI_LinehaulShort",
    PsiLinehaulShortPrice => "PSI_LinehaulShortPrice",
    PsiPackingDom => "PSI_PackingDom",
    PsiPackingDomPrice => "PSI_PackingDomPrice",
    PsiPackingHhgIntl => "PSI_PackingHHGIntl",
    PsiPackingHhgIntlPrice => "PSI_PackingHHGIntlPrice",
    PsiPriceDomDest => "PSI_PriceDomDest",
    PsiPriceDomDestPrice => "PSI_PriceDomDestPrice",
    PsiPriceDomOrigin => "PSI_PriceDomOrigin",
    PsiPriceDomOriginPrice => "PSI_PriceDomOriginPrice",
    PsiShippingLinehaulDom => "PSI_ShippingLinehaulDom",
    PsiShippingLinehaulDomPrice => "PSI_ShippingLinehaulDomPrice",
    PsiShippingLinehaulIntlCo => "PSI_ShippingLinehaulIntlCO",
    PsiShippingLinehaulIntlCoPrice => "PSI_ShippingLinehaulIntlCOPrice",
    PsiShippingLinehaulIntlOc => "PSI_ShippingLinehaulIntlOC",
    PsiShippingLinehaulIntlOcPrice => "PSI_ShippingLinehaulIntlOCPrice",
    PsiShippingLinehaulIntlOo => "PSI_ShippingLinehaulIntlOO",
    PsiShippingLinehaulIntlOoPrice => "PSI_ShippingLinehaulIntlOOPrice",
    ReferenceDate => "ReferenceDate",
    RequestedPickupDate => "RequestedPickupDate",
    ServiceAreaDest => "ServiceAreaDest",
    ServiceAreaOrigin => "ServiceAreaOrigin",
    ServicesScheduleDest => "ServicesScheduleDest",
    ServicesScheduleOrigin => "ServicesScheduleOrigin",
    SitPaymentRequestEnd => "SITPaymentRequestEnd",
    SitPaymentRequestStart => "SITPaymentRequestStart",
    SitRateAreaDest => "SITRateAreaDest",
    SitRateAreaOrigin => "SITRateAreaOrigin",
    SitScheduleDest => "SITScheduleDest",
    SitScheduleOrigin => "SITScheduleOrigin",
    SitServiceAreaDest => "SITServiceAreaDest",
    SitServiceAreaOrigin => "SITServiceAreaOrigin",
    StandaloneCrate => "StandaloneCrate",
    StandaloneCrateCap => "StandaloneCrateCap",
    UncappedRequestTotal => "UncappedRequestTotal",
    WeightAdjusted => "WeightAdjusted",
    WeightBilled => "WeightBilled",
    WeightEstimated => "WeightEstimated",
    WeightOriginal => "WeightOriginal",
    WeightReweigh => "WeightReweigh",
    ZipDestAddress => "ZipDestAddress",
    ZipPickupAddress => "ZipPickupAddress",
    ZipSitDestHhgFinalAddress => "ZipSITDestHHGFinalAddress",
    ZipSitDestHhgOriginalAddress => "ZipSITDestHHGOriginalAddress",
    ZipSitOriginHhgActualAddress => "ZipSITOriginHHGActualAddress",
    ZipSitOriginHhgOriginalAddress => "ZipSITOriginHHGOriginalAddress",
}

impl ServiceItemParamName {
    /// Whether the value depends on the shipment alone, so it can be shared
    /// by every service item of that shipment within one session.
    ///
    /// Parameters that vary by service code or by service item (billed and
    /// original weight, SIT day ranges, crate dimensions, item prices, ports)
    /// are excluded.
    pub fn is_shipment_scoped(&self) -> bool {
        use ServiceItemParamName::*;
        matches!(
            self,
            ActualPickupDate
                | ContractCode
                | ContractYearName
                | DistanceZip
                | DistanceZip3
                | DistanceZip5
                | DistanceZipSitDest
                | DistanceZipSitOrigin
                | EiaFuelPrice
                | EscalationCompounded
                | FscPriceDifferenceInCents
                | IsPeak
                | MarketDest
                | MarketOrigin
                | MtoAvailableToPrimeAt
                | PriceAreaIntlDest
                | PriceAreaIntlOrigin
                | ReferenceDate
                | RequestedPickupDate
                | ServiceAreaDest
                | ServiceAreaOrigin
                | ServicesScheduleDest
                | ServicesScheduleOrigin
                | SitRateAreaDest
                | SitRateAreaOrigin
                | SitScheduleDest
                | SitScheduleOrigin
                | SitServiceAreaDest
                | SitServiceAreaOrigin
                | WeightAdjusted
                | WeightReweigh
                | ZipDestAddress
                | ZipPickupAddress
                | ZipSitDestHhgFinalAddress
                | ZipSitDestHhgOriginalAddress
                | ZipSitOriginHhgActualAddress
                | ZipSitOriginHhgOriginalAddress
        )
    }
}

impl fmt::Display for ServiceItemParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a parameter key that is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service item param name: {0}")]
pub struct UnknownParamName(pub String);

/// Who supplies a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamOrigin {
    /// Computed by the lookup registry.
    System,
    /// Supplied by the requester on the payment request.
    Prime,
    /// Produced by the pricing formula itself.
    Pricer,
}

impl ParamOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamOrigin::System => "SYSTEM",
            ParamOrigin::Prime => "PRIME",
            ParamOrigin::Pricer => "PRICER",
        }
    }
}

impl FromStr for ParamOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYSTEM" => Ok(ParamOrigin::System),
            "PRIME" => Ok(ParamOrigin::Prime),
            "PRICER" => Ok(ParamOrigin::Pricer),
            other => Err(format!("unknown param origin: {}", other)),
        }
    }
}

/// A parameter a service code's pricing formula consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParamKey {
    pub name: ServiceItemParamName,
    pub origin: ParamOrigin,
    pub is_optional: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_param_name_roundtrip_through_key_string() {
        for name in ServiceItemParamName::ALL {
            let parsed = ServiceItemParamName::from_str(name.as_str()).unwrap();
            assert_eq!(parsed, *name);
        }
    }

    #[test]
    fn test_param_keys_are_unique() {
        let keys: HashSet<&str> = ServiceItemParamName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(keys.len(), ServiceItemParamName::ALL.len());
    }

    #[test]
    fn test_unknown_param_name() {
        let err = ServiceItemParamName::from_str("DistanceZip9").unwrap_err();
        assert_eq!(err.to_string(), "unknown service item param name: DistanceZip9");
    }

    #[test]
    fn test_serde_uses_key_string() {
        let json = serde_json::to_string(&ServiceItemParamName::NumberDaysSit).unwrap();
        assert_eq!(json, "\"NumberDaysSIT\"");
        let parsed: ServiceItemParamName = serde_json::from_str("\"PSI_LinehaulDom\"").unwrap();
        assert_eq!(parsed, ServiceItemParamName::PsiLinehaulDom);
    }

    #[test]
    fn test_item_specific_params_are_not_shipment_scoped() {
        assert!(ServiceItemParamName::DistanceZip.is_shipment_scoped());
        assert!(!ServiceItemParamName::WeightBilled.is_shipment_scoped());
        assert!(!ServiceItemParamName::NumberDaysSit.is_shipment_scoped());
        assert!(!ServiceItemParamName::SitPaymentRequestStart.is_shipment_scoped());
        assert!(!ServiceItemParamName::DimensionHeight.is_shipment_scoped());
    }

    #[test]
    fn test_param_origin_parse() {
        assert_eq!(ParamOrigin::from_str("PRIME").unwrap(), ParamOrigin::Prime);
        assert!(ParamOrigin::from_str("prime").is_err());
    }
}
