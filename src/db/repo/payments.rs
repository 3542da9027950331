//! Payment request operations and SIT billing history.

use crate::domain::{
    MoveId, PaymentRequestId, PaymentRequestStatus, PaymentServiceItemId,
    PaymentServiceItemStatus, ServiceItemId, ServiceItemParamName, ShipmentId, SitBilledRangeRow,
};
use sqlx::Row;

use super::{parse_column, Repository};

impl Repository {
    // =========================================================================
    // Payment request operations
    // =========================================================================

    /// Insert a payment request.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_payment_request(
        &self,
        id: PaymentRequestId,
        move_id: MoveId,
        status: PaymentRequestStatus,
        created_at_ms: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO payment_requests (id, move_id, status, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id.as_uuid())
        .bind(move_id.as_uuid())
        .bind(status.as_str())
        .bind(created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a payment service item together with the parameter values it
    /// was priced with.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_payment_service_item(
        &self,
        id: PaymentServiceItemId,
        payment_request_id: PaymentRequestId,
        service_item_id: ServiceItemId,
        status: PaymentServiceItemStatus,
        params: &[(ServiceItemParamName, String)],
        created_at_ms: i64,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO payment_service_items (id, payment_request_id, mto_service_item_id, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_uuid())
        .bind(payment_request_id.as_uuid())
        .bind(service_item_id.as_uuid())
        .bind(status.as_str())
        .bind(created_at_ms)
        .execute(&mut *tx)
        .await?;

        for (name, value) in params {
            sqlx::query(
                r#"
                INSERT INTO payment_service_item_params (payment_service_item_id, param_key, value)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(id.as_uuid())
            .bind(name.as_str())
            .bind(value.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Every payment service item billed against service items of the
    /// shipment on a payment request other than `exclude`, with the SIT range
    /// params it recorded. Status filtering is left to the caller.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored status is unknown.
    pub async fn query_sit_billed_ranges(
        &self,
        shipment_id: ShipmentId,
        exclude: PaymentRequestId,
    ) -> Result<Vec<SitBilledRangeRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                pr.id AS payment_request_id,
                pr.status AS payment_request_status,
                psi.status AS payment_service_item_status,
                si.id AS service_item_id,
                si.service_code AS service_code,
                start_param.value AS sit_start,
                end_param.value AS sit_end
            FROM payment_service_items psi
            JOIN payment_requests pr ON pr.id = psi.payment_request_id
            JOIN mto_service_items si ON si.id = psi.mto_service_item_id
            LEFT JOIN payment_service_item_params start_param
                ON start_param.payment_service_item_id = psi.id
                AND start_param.param_key = ?
            LEFT JOIN payment_service_item_params end_param
                ON end_param.payment_service_item_id = psi.id
                AND end_param.param_key = ?
            WHERE si.shipment_id = ? AND pr.id != ?
            ORDER BY pr.created_at ASC, psi.created_at ASC
            "#,
        )
        .bind(ServiceItemParamName::SitPaymentRequestStart.as_str())
        .bind(ServiceItemParamName::SitPaymentRequestEnd.as_str())
        .bind(shipment_id.as_uuid())
        .bind(exclude.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                Ok(SitBilledRangeRow {
                    payment_request_id: PaymentRequestId::new(r.try_get("payment_request_id")?),
                    payment_request_status: parse_column(r, "payment_request_status")?,
                    payment_service_item_status: parse_column(r, "payment_service_item_status")?,
                    service_item_id: ServiceItemId::new(r.try_get("service_item_id")?),
                    service_code: parse_column(r, "service_code")?,
                    start: r.try_get("sit_start")?,
                    end: r.try_get("sit_end")?,
                })
            })
            .collect()
    }
}
