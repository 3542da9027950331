//! Shipment and service item operations for the repository.

use crate::domain::{
    Address, AddressId, Cents, DimensionType, MoveId, MtoServiceItem, MtoShipment,
    PortLocationId, Pound, ServiceItemDimension, ServiceItemId, ShipmentId, ThousandthInches,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

use super::{decode_error, parse_column, Repository};

const SERVICE_ITEM_COLUMNS: &str = r#"
    id, move_id, shipment_id, service_code, sit_entry_date, sit_departure_date,
    estimated_weight, actual_weight, external_crate, standalone_crate,
    locked_price_cents, port_location_id, created_at
"#;

impl Repository {
    // =========================================================================
    // Shipment operations
    // =========================================================================

    /// Insert a shipment together with the addresses and reweigh it carries.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_shipment(&self, shipment: &MtoShipment) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let addresses = [
            &shipment.pickup_address,
            &shipment.destination_address,
            &shipment.sit_origin_hhg_original_address,
            &shipment.sit_origin_hhg_actual_address,
            &shipment.sit_dest_original_address,
            &shipment.sit_dest_final_address,
        ];
        for address in addresses.into_iter().flatten() {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO addresses (id, street_address_1, city, state, postal_code, is_oconus)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(address.id.as_uuid())
            .bind(address.street_address_1.as_str())
            .bind(address.city.as_str())
            .bind(address.state.as_str())
            .bind(address.postal_code.as_str())
            .bind(address.is_oconus)
            .execute(&mut *tx)
            .await?;
        }

        let address_id = |a: &Option<Address>| a.as_ref().map(|a| a.id.as_uuid());

        sqlx::query(
            r#"
            INSERT INTO mto_shipments (
                id, move_id, shipment_type, requested_pickup_date, actual_pickup_date,
                prime_estimated_weight, prime_actual_weight, billable_weight_cap,
                nts_recorded_weight, sit_days_allowance, distance,
                pickup_address_id, destination_address_id,
                sit_origin_hhg_original_address_id, sit_origin_hhg_actual_address_id,
                sit_dest_original_address_id, sit_dest_final_address_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(shipment.id.as_uuid())
        .bind(shipment.move_id.as_uuid())
        .bind(shipment.shipment_type.as_str())
        .bind(shipment.requested_pickup_date)
        .bind(shipment.actual_pickup_date)
        .bind(shipment.prime_estimated_weight.map(|w| w.as_i32()))
        .bind(shipment.prime_actual_weight.map(|w| w.as_i32()))
        .bind(shipment.billable_weight_cap.map(|w| w.as_i32()))
        .bind(shipment.nts_recorded_weight.map(|w| w.as_i32()))
        .bind(shipment.sit_days_allowance)
        .bind(shipment.distance)
        .bind(address_id(&shipment.pickup_address))
        .bind(address_id(&shipment.destination_address))
        .bind(address_id(&shipment.sit_origin_hhg_original_address))
        .bind(address_id(&shipment.sit_origin_hhg_actual_address))
        .bind(address_id(&shipment.sit_dest_original_address))
        .bind(address_id(&shipment.sit_dest_final_address))
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await?;

        if let Some(weight) = shipment.reweigh_weight {
            sqlx::query("INSERT INTO reweighs (shipment_id, weight) VALUES (?, ?)")
                .bind(shipment.id.as_uuid())
                .bind(weight.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Record a SIT extension request for a shipment.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_sit_extension(
        &self,
        shipment_id: ShipmentId,
        status: &str,
        approved_days: Option<i32>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sit_extensions (shipment_id, status, approved_days) VALUES (?, ?, ?)",
        )
        .bind(shipment_id.as_uuid())
        .bind(status)
        .bind(approved_days)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Load a shipment snapshot: addresses, reweigh weight and the sum of
    /// approved SIT extension days.
    ///
    /// # Errors
    /// Returns an error if a query fails or a column cannot be decoded.
    pub async fn fetch_shipment(&self, id: ShipmentId) -> Result<Option<MtoShipment>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.move_id, s.shipment_type, s.requested_pickup_date, s.actual_pickup_date,
                   s.prime_estimated_weight, s.prime_actual_weight, s.billable_weight_cap,
                   s.nts_recorded_weight, s.sit_days_allowance, s.distance,
                   s.pickup_address_id, s.destination_address_id,
                   s.sit_origin_hhg_original_address_id, s.sit_origin_hhg_actual_address_id,
                   s.sit_dest_original_address_id, s.sit_dest_final_address_id,
                   r.weight AS reweigh_weight,
                   (SELECT COALESCE(SUM(e.approved_days), 0)
                      FROM sit_extensions e
                     WHERE e.shipment_id = s.id AND e.status = 'APPROVED') AS approved_extension_days
            FROM mto_shipments s
            LEFT JOIN reweighs r ON r.shipment_id = s.id
            WHERE s.id = ?
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let address_id = |column: &str| -> Result<Option<AddressId>, sqlx::Error> {
            Ok(row.try_get::<Option<Uuid>, _>(column)?.map(AddressId::new))
        };
        let pickup_id = address_id("pickup_address_id")?;
        let destination_id = address_id("destination_address_id")?;
        let sit_origin_original_id = address_id("sit_origin_hhg_original_address_id")?;
        let sit_origin_actual_id = address_id("sit_origin_hhg_actual_address_id")?;
        let sit_dest_original_id = address_id("sit_dest_original_address_id")?;
        let sit_dest_final_id = address_id("sit_dest_final_address_id")?;

        let pound = |column: &str| -> Result<Option<Pound>, sqlx::Error> {
            Ok(row.try_get::<Option<i32>, _>(column)?.map(Pound::new))
        };

        let extension_days: i64 = row.try_get("approved_extension_days")?;
        let approved_sit_extension_days = i32::try_from(extension_days).map_err(|_| {
            decode_error(format!(
                "column approved_extension_days: {} out of range",
                extension_days
            ))
        })?;

        Ok(Some(MtoShipment {
            id: ShipmentId::new(row.try_get("id")?),
            move_id: MoveId::new(row.try_get("move_id")?),
            shipment_type: parse_column(&row, "shipment_type")?,
            requested_pickup_date: row.try_get("requested_pickup_date")?,
            actual_pickup_date: row.try_get("actual_pickup_date")?,
            prime_estimated_weight: pound("prime_estimated_weight")?,
            prime_actual_weight: pound("prime_actual_weight")?,
            billable_weight_cap: pound("billable_weight_cap")?,
            nts_recorded_weight: pound("nts_recorded_weight")?,
            reweigh_weight: pound("reweigh_weight")?,
            sit_days_allowance: row.try_get("sit_days_allowance")?,
            approved_sit_extension_days,
            distance: row.try_get("distance")?,
            pickup_address: self.get_optional_address(pickup_id).await?,
            destination_address: self.get_optional_address(destination_id).await?,
            sit_origin_hhg_original_address: self
                .get_optional_address(sit_origin_original_id)
                .await?,
            sit_origin_hhg_actual_address: self.get_optional_address(sit_origin_actual_id).await?,
            sit_dest_original_address: self.get_optional_address(sit_dest_original_id).await?,
            sit_dest_final_address: self.get_optional_address(sit_dest_final_id).await?,
        }))
    }

    /// Read the persisted primary distance of a shipment.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_shipment_distance(&self, id: ShipmentId) -> Result<Option<i32>, sqlx::Error> {
        let row = sqlx::query("SELECT distance FROM mto_shipments WHERE id = ?")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => r.try_get("distance"),
            None => Ok(None),
        }
    }

    /// Persist a computed distance unless one was already stored.
    ///
    /// Returns `false` when another writer got there first; the stored value is
    /// left untouched.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn set_shipment_distance_if_unset(
        &self,
        id: ShipmentId,
        miles: i32,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE mto_shipments SET distance = ? WHERE id = ? AND distance IS NULL")
                .bind(miles)
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Service item operations
    // =========================================================================

    /// Insert a service item and its dimensions.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_service_item(&self, item: &MtoServiceItem) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO mto_service_items (
                id, move_id, shipment_id, service_code, sit_entry_date, sit_departure_date,
                estimated_weight, actual_weight, external_crate, standalone_crate,
                locked_price_cents, port_location_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.move_id.as_uuid())
        .bind(item.shipment_id.map(|id| id.as_uuid()))
        .bind(item.code.as_str())
        .bind(item.sit_entry_date)
        .bind(item.sit_departure_date)
        .bind(item.estimated_weight.map(|w| w.as_i32()))
        .bind(item.actual_weight.map(|w| w.as_i32()))
        .bind(item.external_crate)
        .bind(item.standalone_crate)
        .bind(item.locked_price_cents.map(|c| c.as_i64()))
        .bind(item.port_location_id.map(|id| id.as_uuid()))
        .bind(item.created_at_ms)
        .execute(&mut *tx)
        .await?;

        for dimension in &item.dimensions {
            sqlx::query(
                r#"
                INSERT INTO mto_service_item_dimensions
                    (service_item_id, dimension_type, length_thou, width_thou, height_thou)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.as_uuid())
            .bind(dimension.dimension_type.as_str())
            .bind(dimension.length.as_i32())
            .bind(dimension.width.as_i32())
            .bind(dimension.height.as_i32())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load a service item with its dimensions.
    ///
    /// # Errors
    /// Returns an error if a query fails or a column cannot be decoded.
    pub async fn fetch_service_item(
        &self,
        id: ServiceItemId,
    ) -> Result<Option<MtoServiceItem>, sqlx::Error> {
        let sql = format!("SELECT {} FROM mto_service_items WHERE id = ?", SERVICE_ITEM_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut item = service_item_from_row(&row)?;

        let dimension_rows = sqlx::query(
            r#"
            SELECT service_item_id, dimension_type, length_thou, width_thou, height_thou
            FROM mto_service_item_dimensions
            WHERE service_item_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        for row in &dimension_rows {
            item.dimensions.push(dimension_from_row(row)?);
        }

        Ok(Some(item))
    }

    /// List every service item on a shipment, oldest first, with dimensions.
    ///
    /// # Errors
    /// Returns an error if a query fails or a column cannot be decoded.
    pub async fn list_shipment_service_items(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<Vec<MtoServiceItem>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM mto_service_items WHERE shipment_id = ? ORDER BY created_at ASC, id ASC",
            SERVICE_ITEM_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(shipment_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        let mut items = rows
            .iter()
            .map(service_item_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let dimension_rows = sqlx::query(
            r#"
            SELECT d.service_item_id, d.dimension_type, d.length_thou, d.width_thou, d.height_thou
            FROM mto_service_item_dimensions d
            JOIN mto_service_items si ON si.id = d.service_item_id
            WHERE si.shipment_id = ?
            ORDER BY d.id ASC
            "#,
        )
        .bind(shipment_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut by_item: HashMap<Uuid, Vec<ServiceItemDimension>> = HashMap::new();
        for row in &dimension_rows {
            let item_id: Uuid = row.try_get("service_item_id")?;
            by_item.entry(item_id).or_default().push(dimension_from_row(row)?);
        }
        for item in &mut items {
            if let Some(dimensions) = by_item.remove(&item.id.as_uuid()) {
                item.dimensions = dimensions;
            }
        }

        Ok(items)
    }
}

fn service_item_from_row(row: &SqliteRow) -> Result<MtoServiceItem, sqlx::Error> {
    Ok(MtoServiceItem {
        id: ServiceItemId::new(row.try_get("id")?),
        move_id: MoveId::new(row.try_get("move_id")?),
        shipment_id: row
            .try_get::<Option<Uuid>, _>("shipment_id")?
            .map(ShipmentId::new),
        code: parse_column(row, "service_code")?,
        sit_entry_date: row.try_get("sit_entry_date")?,
        sit_departure_date: row.try_get("sit_departure_date")?,
        estimated_weight: row
            .try_get::<Option<i32>, _>("estimated_weight")?
            .map(Pound::new),
        actual_weight: row.try_get::<Option<i32>, _>("actual_weight")?.map(Pound::new),
        external_crate: row.try_get("external_crate")?,
        standalone_crate: row.try_get("standalone_crate")?,
        locked_price_cents: row
            .try_get::<Option<i64>, _>("locked_price_cents")?
            .map(Cents::new),
        port_location_id: row
            .try_get::<Option<Uuid>, _>("port_location_id")?
            .map(PortLocationId::new),
        dimensions: Vec::new(),
        created_at_ms: row.try_get("created_at")?,
    })
}

fn dimension_from_row(row: &SqliteRow) -> Result<ServiceItemDimension, sqlx::Error> {
    Ok(ServiceItemDimension {
        dimension_type: parse_column::<DimensionType>(row, "dimension_type")?,
        length: ThousandthInches::new(row.try_get("length_thou")?),
        width: ThousandthInches::new(row.try_get("width_thou")?),
        height: ThousandthInches::new(row.try_get("height_thou")?),
    })
}
