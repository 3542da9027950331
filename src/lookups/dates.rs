//! Date, contract year and move timing lookups.

use super::LookupContext;
use crate::domain::units::format_canonical;
use crate::domain::ShipmentId;
use crate::error::LookupError;
use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

/// Calendar date format of date parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Peak season runs May 15 through September 30, inclusive.
pub fn is_peak(date: NaiveDate) -> bool {
    let month_day = (date.month(), date.day());
    month_day >= (5, 15) && month_day <= (9, 30)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentDateField {
    ActualPickup,
    RequestedPickup,
}

impl ShipmentDateField {
    fn label(&self) -> &'static str {
        match self {
            ShipmentDateField::ActualPickup => "ActualPickupDate",
            ShipmentDateField::RequestedPickup => "RequestedPickupDate",
        }
    }
}

/// A required date field of the shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentDateLookup {
    pub shipment_id: ShipmentId,
    pub field: ShipmentDateField,
    pub date: Option<NaiveDate>,
}

impl ShipmentDateLookup {
    pub fn date(&self) -> Result<NaiveDate, LookupError> {
        self.date.ok_or_else(|| {
            LookupError::NotFound(format!(
                "MTOShipment {} has no {}",
                self.shipment_id,
                self.field.label()
            ))
        })
    }

    pub fn lookup(&self) -> Result<String, LookupError> {
        Ok(format_date(self.date()?))
    }
}

/// Whether the reference (requested pickup) date falls in peak season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakLookup {
    pub reference: ShipmentDateLookup,
}

impl PeakLookup {
    pub fn lookup(&self) -> Result<String, LookupError> {
        Ok(is_peak(self.reference.date()?).to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractYearField {
    Name,
    EscalationCompounded,
}

/// Attribute of the contract year covering the reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractYearLookup {
    pub reference: ShipmentDateLookup,
    pub field: ContractYearField,
}

impl ContractYearLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let date = self.reference.date()?;
        let year = ctx
            .repo
            .fetch_contract_year(ctx.contract.id, date)
            .await?
            .ok_or_else(|| {
                LookupError::NotFound(format!(
                    "contract year for contract {} covering {}",
                    ctx.contract.code,
                    format_date(date)
                ))
            })?;
        Ok(match self.field {
            ContractYearField::Name => year.name,
            ContractYearField::EscalationCompounded => {
                format_canonical(year.escalation_compounded)
            }
        })
    }
}

/// When the move became available to the prime contractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableToPrimeLookup {
    pub locator: String,
    pub at: Option<DateTime<Utc>>,
}

impl AvailableToPrimeLookup {
    pub fn lookup(&self) -> Result<String, LookupError> {
        self.at
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .ok_or_else(|| {
                LookupError::NotFound(format!(
                    "Move {} has no MTOAvailableToPrimeAt",
                    self.locator
                ))
            })
    }
}
