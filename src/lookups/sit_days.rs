//! Number of SIT days billed on the current payment request.

use super::LookupContext;
use crate::domain::{MtoServiceItem, MtoShipment, ServiceItemParamName};
use crate::engine::sit::{load_billed_ranges, SitDayAccountant, SitDayRange};
use crate::error::LookupError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitDaysLookup {
    pub shipment: Box<MtoShipment>,
    pub item: Box<MtoServiceItem>,
}

impl SitDaysLookup {
    pub async fn lookup(&self, ctx: &LookupContext<'_>) -> Result<String, LookupError> {
        let start = prime_value(ctx, ServiceItemParamName::SitPaymentRequestStart)?;
        let end = prime_value(ctx, ServiceItemParamName::SitPaymentRequestEnd)?;
        let range = SitDayRange::parse(start, end)?;

        let items = ctx
            .repo
            .list_shipment_service_items(self.shipment.id)
            .await?;
        let history = load_billed_ranges(ctx.repo, &self.shipment, ctx.payment_request_id).await?;

        let days = SitDayAccountant::new(&self.shipment, &items, &history)
            .number_of_days(&self.item, range)?;
        Ok(days.to_string())
    }
}

fn prime_value<'c>(
    ctx: &'c LookupContext<'_>,
    name: ServiceItemParamName,
) -> Result<&'c str, LookupError> {
    ctx.prime_values
        .get(&name)
        .map(|v| v.as_str())
        .ok_or_else(|| LookupError::NotFound(format!("{} was not supplied", name)))
}
