//! Storage-in-transit day accounting.
//!
//! A shipment's SIT history is rebuilt on every call from its service items
//! and from the day ranges billed on earlier payment requests. Each location
//! (origin, destination) is tracked separately:
//!
//! - **Open**: a first-day or additional-days item carries an entry date and
//!   no departure date has been recorded yet.
//! - **Closed**: a departure date has been recorded for the stay.
//!
//! A requested day range is then checked against the stay, against ranges
//! already billed for the same service item, and against the shipment's
//! allowance plus approved extensions.

use crate::db::Repository;
use crate::domain::{
    MtoServiceItem, MtoShipment, PaymentRequestId, ServiceItemParamName, SitBilledRange,
    SitBilledRangeRow, SitKind, SitLocation,
};
use crate::error::LookupError;
use chrono::NaiveDate;
use tracing::debug;

/// Calendar date format of SIT range parameters.
pub const SIT_DATE_FORMAT: &str = "%Y-%m-%d";

/// State of one SIT location after replaying its service items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitStay {
    Open {
        entry: NaiveDate,
    },
    Closed {
        entry: NaiveDate,
        departure: NaiveDate,
    },
}

impl SitStay {
    pub fn entry(&self) -> NaiveDate {
        match self {
            SitStay::Open { entry } | SitStay::Closed { entry, .. } => *entry,
        }
    }

    pub fn departure(&self) -> Option<NaiveDate> {
        match self {
            SitStay::Open { .. } => None,
            SitStay::Closed { departure, .. } => Some(*departure),
        }
    }
}

/// Requested SIT day range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SitDayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SitDayRange {
    /// Parse the prime-supplied start and end strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, LookupError> {
        let start = parse_sit_date(ServiceItemParamName::SitPaymentRequestStart, start)?;
        let end = parse_sit_date(ServiceItemParamName::SitPaymentRequestEnd, end)?;
        if start > end {
            return Err(LookupError::InvalidInput(format!(
                "{} {} is after {} {}",
                ServiceItemParamName::SitPaymentRequestStart,
                start.format(SIT_DATE_FORMAT),
                ServiceItemParamName::SitPaymentRequestEnd,
                end.format(SIT_DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive day count.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Parse a calendar date parameter, naming the parameter on failure.
pub fn parse_sit_date(name: ServiceItemParamName, raw: &str) -> Result<NaiveDate, LookupError> {
    NaiveDate::parse_from_str(raw.trim(), SIT_DATE_FORMAT).map_err(|e| {
        LookupError::InvalidInput(format!("unable to parse {} date {:?}: {}", name, raw, e))
    })
}

/// Replay the first-day and additional-days items of one location.
///
/// Returns `None` when the location has no such items at all.
pub fn reconcile_location(
    shipment: &MtoShipment,
    location: SitLocation,
    items: &[MtoServiceItem],
) -> Result<Option<SitStay>, LookupError> {
    let mut stay_items: Vec<(&MtoServiceItem, SitKind)> = items
        .iter()
        .filter(|item| item.code.sit_location() == Some(location))
        .filter_map(|item| match item.code.sit_kind() {
            Some(kind @ (SitKind::FirstDay | SitKind::AdditionalDays)) => Some((item, kind)),
            _ => None,
        })
        .collect();

    if stay_items.is_empty() {
        return Ok(None);
    }

    if stay_items.iter().all(|(item, _)| item.sit_entry_date.is_none()) {
        let article = match location {
            SitLocation::Origin => "an",
            SitLocation::Destination => "a",
        };
        return Err(LookupError::Conflict(format!(
            "MTOShipment {} does not have {} {} MTO Service Item with a SIT Entry Date",
            shipment.id, article, location
        )));
    }

    // first-day item before additional-days when created together
    stay_items.sort_by_key(|(item, kind)| (item.created_at_ms, *kind != SitKind::FirstDay));

    let mut stay: Option<SitStay> = None;
    for (item, kind) in stay_items {
        let Some(entry) = item.sit_entry_date else {
            continue;
        };

        stay = Some(match stay {
            None => match item.sit_departure_date {
                Some(departure) => SitStay::Closed { entry, departure },
                None => SitStay::Open { entry },
            },
            Some(SitStay::Open { entry: current }) => {
                if entry != current {
                    return Err(different_entry_date(shipment, location, item));
                }
                match item.sit_departure_date {
                    Some(departure) => SitStay::Closed { entry, departure },
                    None => SitStay::Open { entry },
                }
            }
            Some(SitStay::Closed {
                entry: current,
                departure,
            }) => {
                if kind == SitKind::FirstDay {
                    return Err(LookupError::Conflict(format!(
                        "MTOShipment {} already has a departed {} SIT stay; MTO Service Item {} cannot start another",
                        shipment.id, location, item.id
                    )));
                }
                // additional days after departure extend the stay it belongs to
                SitStay::Closed {
                    entry: current,
                    departure: item.sit_departure_date.map_or(departure, |d| d.max(departure)),
                }
            }
        });
    }

    debug!(shipment_id = %shipment.id, %location, ?stay, "Reconciled SIT location");
    Ok(stay)
}

fn different_entry_date(
    shipment: &MtoShipment,
    location: SitLocation,
    item: &MtoServiceItem,
) -> LookupError {
    LookupError::Conflict(format!(
        "MTOShipment {} already has an {} MTO Service Item {} with a different SIT Entry Date",
        shipment.id, location, item.id
    ))
}

/// Convert raw billed rows into additional-days ranges with parsed dates.
///
/// Rows for other codes, and rows that recorded no range, are dropped.
pub fn billed_ranges(rows: Vec<SitBilledRangeRow>) -> Result<Vec<SitBilledRange>, LookupError> {
    let mut ranges = Vec::new();
    for row in rows {
        if row.service_code.sit_kind() != Some(SitKind::AdditionalDays) {
            continue;
        }
        let (Some(start), Some(end)) = (row.start.as_deref(), row.end.as_deref()) else {
            continue;
        };
        ranges.push(SitBilledRange {
            start: parse_sit_date(ServiceItemParamName::SitPaymentRequestStart, start)?,
            end: parse_sit_date(ServiceItemParamName::SitPaymentRequestEnd, end)?,
            payment_request_id: row.payment_request_id,
            payment_request_status: row.payment_request_status,
            payment_service_item_status: row.payment_service_item_status,
            service_item_id: row.service_item_id,
            service_code: row.service_code,
        });
    }
    Ok(ranges)
}

/// Validates a requested SIT day range against a shipment's SIT history.
#[derive(Debug)]
pub struct SitDayAccountant<'a> {
    shipment: &'a MtoShipment,
    items: &'a [MtoServiceItem],
    history: &'a [SitBilledRange],
}

impl<'a> SitDayAccountant<'a> {
    /// `items` are every service item of the shipment; `history` the ranges
    /// billed on other payment requests.
    pub fn new(
        shipment: &'a MtoShipment,
        items: &'a [MtoServiceItem],
        history: &'a [SitBilledRange],
    ) -> Self {
        Self {
            shipment,
            items,
            history,
        }
    }

    /// Days billable for `range` on the additional-days item `priced`.
    pub fn number_of_days(
        &self,
        priced: &MtoServiceItem,
        range: SitDayRange,
    ) -> Result<i64, LookupError> {
        let location = match (priced.code.sit_kind(), priced.code.sit_location()) {
            (Some(SitKind::AdditionalDays), Some(location)) => location,
            _ => {
                return Err(LookupError::InvalidInput(format!(
                    "service code {} is not an additional days SIT code",
                    priced.code
                )))
            }
        };

        let origin = reconcile_location(self.shipment, SitLocation::Origin, self.items)?;
        let destination = reconcile_location(self.shipment, SitLocation::Destination, self.items)?;

        let stay = match location {
            SitLocation::Origin => origin,
            SitLocation::Destination => destination,
        }
        .or_else(|| {
            priced.sit_entry_date.map(|entry| match priced.sit_departure_date {
                Some(departure) => SitStay::Closed { entry, departure },
                None => SitStay::Open { entry },
            })
        })
        .ok_or_else(|| {
            LookupError::Conflict(format!(
                "MTOShipment {} does not have a SIT Entry Date for {} MTO Service Item {}",
                self.shipment.id, location, priced.id
            ))
        })?;

        if range.start <= stay.entry() {
            return Err(LookupError::Conflict(format!(
                "{} {} must be after the SIT Entry Date {} of MTO Service Item {}",
                ServiceItemParamName::SitPaymentRequestStart,
                range.start.format(SIT_DATE_FORMAT),
                stay.entry().format(SIT_DATE_FORMAT),
                priced.id
            )));
        }
        if let Some(departure) = stay.departure() {
            if range.end > departure {
                return Err(LookupError::Conflict(format!(
                    "{} {} is after the SIT Departure Date {} of MTO Service Item {}",
                    ServiceItemParamName::SitPaymentRequestEnd,
                    range.end.format(SIT_DATE_FORMAT),
                    departure.format(SIT_DATE_FORMAT),
                    priced.id
                )));
            }
        }

        let billable: Vec<&SitBilledRange> =
            self.history.iter().filter(|r| r.is_billable()).collect();

        if let Some(previous) = billable
            .iter()
            .find(|r| r.service_item_id == priced.id && range.start <= r.end)
        {
            return Err(LookupError::Conflict(format!(
                "requested SIT range {} to {} overlaps the range {} to {} billed on payment request {}",
                range.start.format(SIT_DATE_FORMAT),
                range.end.format(SIT_DATE_FORMAT),
                previous.start.format(SIT_DATE_FORMAT),
                previous.end.format(SIT_DATE_FORMAT),
                previous.payment_request_id
            )));
        }

        let allowance = self.shipment.sit_days_allowance.ok_or_else(|| {
            LookupError::NotFound(format!(
                "MTOShipment {} has no SIT days allowance",
                self.shipment.id
            ))
        })?;
        let total_allowed =
            i64::from(allowance) + i64::from(self.shipment.approved_sit_extension_days);

        let first_days = [origin, destination].iter().flatten().count() as i64;
        let previously_billed: i64 = billable.iter().map(|r| r.days()).sum();
        let consumed = first_days + previously_billed + range.days();

        debug!(
            shipment_id = %self.shipment.id,
            first_days,
            previously_billed,
            requested = range.days(),
            total_allowed,
            "Counted SIT days"
        );

        if consumed > total_allowed {
            return Err(LookupError::Conflict(format!(
                "MTOShipment {} would use {} SIT days, exceeding its allowance of {}",
                self.shipment.id, consumed, total_allowed
            )));
        }

        Ok(range.days())
    }
}

/// Load the ranges billed for a shipment on payment requests other than `exclude`.
pub async fn load_billed_ranges(
    repo: &Repository,
    shipment: &MtoShipment,
    exclude: PaymentRequestId,
) -> Result<Vec<SitBilledRange>, LookupError> {
    let rows = repo.query_sit_billed_ranges(shipment.id, exclude).await?;
    billed_ranges(rows)
}
