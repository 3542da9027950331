//! Domain primitives: strongly typed record identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub fn new(id: Uuid) -> Self {
                $name(id)
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4())
            }

            /// Get the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                $name(id)
            }
        }
    };
}

uuid_id!(
    /// Move (task order) identifier.
    MoveId
);
uuid_id!(
    /// Shipment identifier.
    ShipmentId
);
uuid_id!(
    /// MTO service item identifier.
    ServiceItemId
);
uuid_id!(
    /// Payment request identifier.
    PaymentRequestId
);
uuid_id!(
    /// Payment service item identifier.
    PaymentServiceItemId
);
uuid_id!(
    /// Pricing contract identifier.
    ContractId
);
uuid_id!(
    /// Address identifier.
    AddressId
);
uuid_id!(
    /// Port location identifier.
    PortLocationId
);
