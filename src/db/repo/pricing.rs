//! Contract geography and pricing reference data for the repository.

use crate::domain::{
    ContractId, ContractYear, DomesticServiceArea, FuelPrice, Millicents, PortLocation,
    PortLocationId, RateArea, ReServiceCode, ServiceItemParamName, ServiceParamKey,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::Row;
use std::str::FromStr;

use super::{decode_error, parse_column, Repository};

impl Repository {
    // =========================================================================
    // Domestic service areas
    // =========================================================================

    /// Insert a domestic service area and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_domestic_service_area(
        &self,
        area: &DomesticServiceArea,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO re_domestic_service_areas (contract_id, service_area, services_schedule, sit_pd_schedule)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(area.contract_id.as_uuid())
        .bind(area.service_area.as_str())
        .bind(area.services_schedule)
        .bind(area.sit_pd_schedule)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Map a zip3 to a domestic service area row.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_zip3(
        &self,
        contract_id: ContractId,
        zip3: &str,
        domestic_service_area_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO re_zip3s (contract_id, zip3, domestic_service_area_id) VALUES (?, ?, ?)",
        )
        .bind(contract_id.as_uuid())
        .bind(zip3)
        .bind(domestic_service_area_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Domestic service area for a zip3 under a contract.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_domestic_service_area(
        &self,
        contract_id: ContractId,
        zip3: &str,
    ) -> Result<Option<DomesticServiceArea>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT dsa.contract_id, dsa.service_area, dsa.services_schedule, dsa.sit_pd_schedule
            FROM re_zip3s z
            JOIN re_domestic_service_areas dsa ON dsa.id = z.domestic_service_area_id
            WHERE z.contract_id = ? AND z.zip3 = ? AND dsa.contract_id = z.contract_id
            "#,
        )
        .bind(contract_id.as_uuid())
        .bind(zip3)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(DomesticServiceArea {
                contract_id: ContractId::new(r.try_get("contract_id")?),
                service_area: r.try_get("service_area")?,
                services_schedule: r.try_get("services_schedule")?,
                sit_pd_schedule: r.try_get("sit_pd_schedule")?,
            })
        })
        .transpose()
    }

    // =========================================================================
    // International rate areas
    // =========================================================================

    /// Insert a rate area and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_rate_area(&self, area: &RateArea) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO re_rate_areas (contract_id, code, name) VALUES (?, ?, ?)")
                .bind(area.contract_id.as_uuid())
                .bind(area.code.as_str())
                .bind(area.name.as_str())
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// Map a zip5 to a rate area row.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_zip5_rate_area(
        &self,
        contract_id: ContractId,
        zip5: &str,
        rate_area_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO re_zip5_rate_areas (contract_id, zip5, rate_area_id) VALUES (?, ?, ?)",
        )
        .bind(contract_id.as_uuid())
        .bind(zip5)
        .bind(rate_area_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Rate area for a full 5-digit zip under a contract.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_rate_area_by_zip5(
        &self,
        contract_id: ContractId,
        zip5: &str,
    ) -> Result<Option<RateArea>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT ra.contract_id, ra.code, ra.name
            FROM re_zip5_rate_areas z
            JOIN re_rate_areas ra ON ra.id = z.rate_area_id
            WHERE z.contract_id = ? AND z.zip5 = ? AND ra.contract_id = z.contract_id
            "#,
        )
        .bind(contract_id.as_uuid())
        .bind(zip5)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(RateArea {
                contract_id: ContractId::new(r.try_get("contract_id")?),
                code: r.try_get("code")?,
                name: r.try_get("name")?,
            })
        })
        .transpose()
    }

    /// Insert an international per-unit accessorial price.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_intl_accessorial_price(
        &self,
        contract_id: ContractId,
        code: ReServiceCode,
        market: &str,
        per_unit_cents: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO re_intl_accessorial_prices (contract_id, service_code, market, per_unit_cents)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(contract_id.as_uuid())
        .bind(code.as_str())
        .bind(market)
        .bind(per_unit_cents)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Per-unit price in cents for a code in a market ("C" or "O").
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_intl_accessorial_price(
        &self,
        contract_id: ContractId,
        code: ReServiceCode,
        market: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT per_unit_cents
            FROM re_intl_accessorial_prices
            WHERE contract_id = ? AND service_code = ? AND market = ?
            "#,
        )
        .bind(contract_id.as_uuid())
        .bind(code.as_str())
        .bind(market)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_get("per_unit_cents")).transpose()
    }

    // =========================================================================
    // Contract years
    // =========================================================================

    /// Insert a contract year.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_contract_year(&self, year: &ContractYear) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO contract_years (contract_id, name, start_date, end_date, escalation_compounded)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(year.contract_id.as_uuid())
        .bind(year.name.as_str())
        .bind(year.start_date)
        .bind(year.end_date)
        .bind(year.escalation_compounded.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Contract year whose window contains `date` (inclusive on both ends).
    ///
    /// # Errors
    /// Returns an error if the query fails or the escalation cannot be decoded.
    pub async fn fetch_contract_year(
        &self,
        contract_id: ContractId,
        date: NaiveDate,
    ) -> Result<Option<ContractYear>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT contract_id, name, start_date, end_date, escalation_compounded
            FROM contract_years
            WHERE contract_id = ? AND start_date <= ? AND end_date >= ?
            ORDER BY start_date DESC
            LIMIT 1
            "#,
        )
        .bind(contract_id.as_uuid())
        .bind(date)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let escalation: String = r.try_get("escalation_compounded")?;
            Ok(ContractYear {
                contract_id: ContractId::new(r.try_get("contract_id")?),
                name: r.try_get("name")?,
                start_date: r.try_get("start_date")?,
                end_date: r.try_get("end_date")?,
                escalation_compounded: Decimal::from_str(&escalation).map_err(|e| {
                    decode_error(format!("escalation_compounded {}: {}", escalation, e))
                })?,
            })
        })
        .transpose()
    }

    // =========================================================================
    // Fuel prices
    // =========================================================================

    /// Insert a published diesel fuel price.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_fuel_price(&self, price: &FuelPrice) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO ghc_diesel_fuel_prices (publication_date, effective_date, end_date, fuel_price_millicents)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(price.publication_date)
        .bind(price.effective_date)
        .bind(price.end_date)
        .bind(price.fuel_price.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Latest published fuel price whose effective window covers `date`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_fuel_price_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<FuelPrice>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT publication_date, effective_date, end_date, fuel_price_millicents
            FROM ghc_diesel_fuel_prices
            WHERE effective_date <= ? AND end_date >= ?
            ORDER BY publication_date DESC
            LIMIT 1
            "#,
        )
        .bind(date)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(FuelPrice {
                publication_date: r.try_get("publication_date")?,
                effective_date: r.try_get("effective_date")?,
                end_date: r.try_get("end_date")?,
                fuel_price: Millicents::new(r.try_get("fuel_price_millicents")?),
            })
        })
        .transpose()
    }

    // =========================================================================
    // Ports
    // =========================================================================

    /// Insert a port location.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_port_location(&self, port: &PortLocation) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO port_locations (id, port_code, port_name, postal_code) VALUES (?, ?, ?, ?)",
        )
        .bind(port.id.as_uuid())
        .bind(port.port_code.as_str())
        .bind(port.port_name.as_str())
        .bind(port.postal_code.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a port location by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_port_location(
        &self,
        id: PortLocationId,
    ) -> Result<Option<PortLocation>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, port_code, port_name, postal_code FROM port_locations WHERE id = ?",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(PortLocation {
                id: PortLocationId::new(r.try_get("id")?),
                port_code: r.try_get("port_code")?,
                port_name: r.try_get("port_name")?,
                postal_code: r.try_get("postal_code")?,
            })
        })
        .transpose()
    }

    // =========================================================================
    // Service param keys
    // =========================================================================

    /// Register a rate service and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_re_service(
        &self,
        code: ReServiceCode,
        name: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO re_services (code, name) VALUES (?, ?)")
            .bind(code.as_str())
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Register a parameter key and return its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_service_item_param_key(
        &self,
        name: ServiceItemParamName,
        origin: crate::domain::ParamOrigin,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO service_item_param_keys (key, origin) VALUES (?, ?)")
            .bind(name.as_str())
            .bind(origin.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Declare that a rate service's pricing formula consumes a parameter key.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_service_param(
        &self,
        service_id: i64,
        param_key_id: i64,
        is_optional: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO service_params (service_id, service_item_param_key_id, is_optional)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(service_id)
        .bind(param_key_id)
        .bind(is_optional)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Parameter keys a service code's pricing formula consumes.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored key is not a known
    /// parameter name.
    pub async fn fetch_service_param_keys(
        &self,
        code: ReServiceCode,
    ) -> Result<Vec<ServiceParamKey>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT k.key, k.origin, sp.is_optional
            FROM service_params sp
            JOIN re_services s ON s.id = sp.service_id
            JOIN service_item_param_keys k ON k.id = sp.service_item_param_key_id
            WHERE s.code = ?
            ORDER BY k.key ASC
            "#,
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                Ok(ServiceParamKey {
                    name: parse_column(r, "key")?,
                    origin: parse_column(r, "origin")?,
                    is_optional: r.try_get("is_optional")?,
                })
            })
            .collect()
    }
}
