//! Payment request records and the SIT ranges billed on them.

use super::primitives::{PaymentRequestId, ServiceItemId};
use super::service_code::ReServiceCode;
use chrono::NaiveDate;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentRequestStatus {
    Pending,
    ReviewedAndAllServiceItemsRejected,
    Reviewed,
    SentToGex,
    ReceivedByGex,
    Paid,
    Deprecated,
}

impl PaymentRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRequestStatus::Pending => "PENDING",
            PaymentRequestStatus::ReviewedAndAllServiceItemsRejected => {
                "REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED"
            }
            PaymentRequestStatus::Reviewed => "REVIEWED",
            PaymentRequestStatus::SentToGex => "SENT_TO_GEX",
            PaymentRequestStatus::ReceivedByGex => "RECEIVED_BY_GEX",
            PaymentRequestStatus::Paid => "PAID",
            PaymentRequestStatus::Deprecated => "DEPRECATED",
        }
    }
}

impl FromStr for PaymentRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentRequestStatus::Pending),
            "REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED" => {
                Ok(PaymentRequestStatus::ReviewedAndAllServiceItemsRejected)
            }
            "REVIEWED" => Ok(PaymentRequestStatus::Reviewed),
            "SENT_TO_GEX" => Ok(PaymentRequestStatus::SentToGex),
            "RECEIVED_BY_GEX" => Ok(PaymentRequestStatus::ReceivedByGex),
            "PAID" => Ok(PaymentRequestStatus::Paid),
            "DEPRECATED" => Ok(PaymentRequestStatus::Deprecated),
            other => Err(format!("unknown payment request status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentServiceItemStatus {
    Requested,
    Approved,
    Denied,
    SentToGex,
    Paid,
}

impl PaymentServiceItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentServiceItemStatus::Requested => "REQUESTED",
            PaymentServiceItemStatus::Approved => "APPROVED",
            PaymentServiceItemStatus::Denied => "DENIED",
            PaymentServiceItemStatus::SentToGex => "SENT_TO_GEX",
            PaymentServiceItemStatus::Paid => "PAID",
        }
    }
}

impl FromStr for PaymentServiceItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REQUESTED" => Ok(PaymentServiceItemStatus::Requested),
            "APPROVED" => Ok(PaymentServiceItemStatus::Approved),
            "DENIED" => Ok(PaymentServiceItemStatus::Denied),
            "SENT_TO_GEX" => Ok(PaymentServiceItemStatus::SentToGex),
            "PAID" => Ok(PaymentServiceItemStatus::Paid),
            other => Err(format!("unknown payment service item status: {}", other)),
        }
    }
}

/// SIT day range billed on an earlier payment request, as raw param strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitBilledRangeRow {
    pub payment_request_id: PaymentRequestId,
    pub payment_request_status: PaymentRequestStatus,
    pub payment_service_item_status: PaymentServiceItemStatus,
    pub service_item_id: ServiceItemId,
    pub service_code: ReServiceCode,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// SIT day range billed on an earlier payment request, with parsed dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitBilledRange {
    pub payment_request_id: PaymentRequestId,
    pub payment_request_status: PaymentRequestStatus,
    pub payment_service_item_status: PaymentServiceItemStatus,
    pub service_item_id: ServiceItemId,
    pub service_code: ReServiceCode,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SitBilledRange {
    /// Whether the range still counts against the shipment: neither the line
    /// item nor the whole request was rejected.
    pub fn is_billable(&self) -> bool {
        self.payment_service_item_status != PaymentServiceItemStatus::Denied
            && self.payment_request_status
                != PaymentRequestStatus::ReviewedAndAllServiceItemsRejected
    }

    /// Inclusive day count.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
