//! Rate service codes and the families the lookups branch on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! service_codes {
    ($($variant:ident => $code:literal,)*) => {
        /// Short code identifying a service item's pricing formula.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum ReServiceCode {
            $(
                #[serde(rename = $code)]
                $variant,
            )*
        }

        impl ReServiceCode {
            pub const ALL: &'static [ReServiceCode] = &[$(ReServiceCode::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ReServiceCode::$variant => $code,)*
                }
            }
        }

        impl FromStr for ReServiceCode {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(ReServiceCode::$variant),)*
                    other => Err(format!("unknown service code: {}", other)),
                }
            }
        }
    };
}

service_codes! {
    Cs => "CS",
    Ms => "MS",
    Dlh => "DLH",
    Dsh => "DSH",
    Fsc => "FSC",
    Dop => "DOP",
    Ddp => "DDP",
    Dpk => "DPK",
    Dnpk => "DNPK",
    Dupk => "DUPK",
    Doshut => "DOSHUT",
    Ddshut => "DDSHUT",
    Dcrt => "DCRT",
    Ducrt => "DUCRT",
    Dofsit => "DOFSIT",
    Doasit => "DOASIT",
    Dopsit => "DOPSIT",
    Dosfsc => "DOSFSC",
    Ddfsit => "DDFSIT",
    Ddasit => "DDASIT",
    Dddsit => "DDDSIT",
    Ddsfsc => "DDSFSC",
    Islh => "ISLH",
    Ihpk => "IHPK",
    Ihupk => "IHUPK",
    Ubp => "UBP",
    Iubpk => "IUBPK",
    Iubupk => "IUBUPK",
    Ioshut => "IOSHUT",
    Idshut => "IDSHUT",
    Icrt => "ICRT",
    Iucrt => "IUCRT",
    Iofsit => "IOFSIT",
    Ioasit => "IOASIT",
    Iopsit => "IOPSIT",
    Iosfsc => "IOSFSC",
    Idfsit => "IDFSIT",
    Idasit => "IDASIT",
    Iddsit => "IDDSIT",
    Idsfsc => "IDSFSC",
    Poefsc => "POEFSC",
    Podfsc => "PODFSC",
}

/// Where goods sit in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitLocation {
    Origin,
    Destination,
}

impl SitLocation {
    pub fn label(&self) -> &'static str {
        match self {
            SitLocation::Origin => "Origin",
            SitLocation::Destination => "Destination",
        }
    }
}

impl fmt::Display for SitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role of a SIT service item within a storage stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitKind {
    FirstDay,
    AdditionalDays,
    PickupOrDelivery,
    FuelSurcharge,
}

impl ReServiceCode {
    /// Codes billed on the shipment's weight, subject to the minimum floor.
    pub fn is_linehaul_family(&self) -> bool {
        use ReServiceCode::*;
        matches!(
            self,
            Dlh | Dsh
                | Fsc
                | Dop
                | Ddp
                | Dpk
                | Dnpk
                | Dupk
                | Dofsit
                | Doasit
                | Dopsit
                | Dosfsc
                | Ddfsit
                | Ddasit
                | Dddsit
                | Ddsfsc
                | Islh
                | Ihpk
                | Ihupk
                | Ubp
                | Iubpk
                | Iubupk
                | Iofsit
                | Ioasit
                | Iopsit
                | Iosfsc
                | Idfsit
                | Idasit
                | Iddsit
                | Idsfsc
                | Poefsc
                | Podfsc
        )
    }

    /// Shuttle codes bill on the service item's own weights.
    pub fn is_shuttle(&self) -> bool {
        use ReServiceCode::*;
        matches!(self, Doshut | Ddshut | Ioshut | Idshut)
    }

    /// Unaccompanied baggage codes.
    pub fn is_ub_family(&self) -> bool {
        use ReServiceCode::*;
        matches!(self, Ubp | Iubpk | Iubupk)
    }

    pub fn is_international(&self) -> bool {
        self.as_str().starts_with('I')
            || matches!(
                self,
                ReServiceCode::Ubp | ReServiceCode::Poefsc | ReServiceCode::Podfsc
            )
    }

    pub fn is_crating(&self) -> bool {
        use ReServiceCode::*;
        matches!(self, Dcrt | Ducrt | Icrt | Iucrt)
    }

    /// Port fuel surcharges, which carry a port location.
    pub fn is_port_fuel_surcharge(&self) -> bool {
        matches!(self, ReServiceCode::Poefsc | ReServiceCode::Podfsc)
    }

    /// Whether the service is performed at the destination end of the move.
    pub fn is_destination_side(&self) -> bool {
        use ReServiceCode::*;
        matches!(
            self,
            Ddp | Dupk
                | Ddshut
                | Ducrt
                | Ddfsit
                | Ddasit
                | Dddsit
                | Ddsfsc
                | Ihupk
                | Iubupk
                | Idshut
                | Iucrt
                | Idfsit
                | Idasit
                | Iddsit
                | Idsfsc
                | Podfsc
        )
    }

    /// SIT location, for storage codes only.
    pub fn sit_location(&self) -> Option<SitLocation> {
        use ReServiceCode::*;
        match self {
            Dofsit | Doasit | Dopsit | Dosfsc | Iofsit | Ioasit | Iopsit | Iosfsc => {
                Some(SitLocation::Origin)
            }
            Ddfsit | Ddasit | Dddsit | Ddsfsc | Idfsit | Idasit | Iddsit | Idsfsc => {
                Some(SitLocation::Destination)
            }
            _ => None,
        }
    }

    /// SIT role, for storage codes only.
    pub fn sit_kind(&self) -> Option<SitKind> {
        use ReServiceCode::*;
        match self {
            Dofsit | Ddfsit | Iofsit | Idfsit => Some(SitKind::FirstDay),
            Doasit | Ddasit | Ioasit | Idasit => Some(SitKind::AdditionalDays),
            Dopsit | Dddsit | Iopsit | Iddsit => Some(SitKind::PickupOrDelivery),
            Dosfsc | Ddsfsc | Iosfsc | Idsfsc => Some(SitKind::FuelSurcharge),
            _ => None,
        }
    }
}

impl fmt::Display for ReServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_code_roundtrip() {
        for code in ReServiceCode::ALL {
            assert_eq!(ReServiceCode::from_str(code.as_str()).unwrap(), *code);
        }
        assert!(ReServiceCode::from_str("XYZ").is_err());
    }

    #[test]
    fn test_weight_families_are_disjoint() {
        for code in ReServiceCode::ALL {
            assert!(!(code.is_linehaul_family() && code.is_shuttle()), "{}", code);
        }
    }

    #[test]
    fn test_sit_classification() {
        assert_eq!(ReServiceCode::Doasit.sit_location(), Some(SitLocation::Origin));
        assert_eq!(ReServiceCode::Idasit.sit_location(), Some(SitLocation::Destination));
        assert_eq!(ReServiceCode::Ddfsit.sit_kind(), Some(SitKind::FirstDay));
        assert_eq!(ReServiceCode::Ioasit.sit_kind(), Some(SitKind::AdditionalDays));
        assert_eq!(ReServiceCode::Dlh.sit_location(), None);
    }

    #[test]
    fn test_every_sit_code_has_both_location_and_kind() {
        for code in ReServiceCode::ALL {
            assert_eq!(code.sit_location().is_some(), code.sit_kind().is_some(), "{}", code);
        }
    }

    #[test]
    fn test_international_codes() {
        assert!(ReServiceCode::Islh.is_international());
        assert!(ReServiceCode::Ubp.is_international());
        assert!(ReServiceCode::Podfsc.is_international());
        assert!(!ReServiceCode::Dlh.is_international());
        assert!(!ReServiceCode::Ddshut.is_international());
    }
}
