//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `shipments.rs` - Shipments, service items, reweighs, SIT extensions, distance write-back
//! - `pricing.rs` - Contract geography, contract years, fuel prices, ports, service param keys
//! - `payments.rs` - Payment requests and historical SIT billing

mod payments;
mod pricing;
mod shipments;

use crate::domain::{Address, AddressId, Contract, ContractId, Move, MoveId};
use chrono::{TimeZone, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

/// Repository for database operations.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    // =========================================================================
    // Contract operations
    // =========================================================================

    /// Insert a pricing contract.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_contract(&self, contract: &Contract) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO contracts (id, code, name) VALUES (?, ?, ?)")
            .bind(contract.id.as_uuid())
            .bind(contract.code.as_str())
            .bind(contract.name.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get a contract by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_contract(&self, id: ContractId) -> Result<Option<Contract>, sqlx::Error> {
        let row = sqlx::query("SELECT id, code, name FROM contracts WHERE id = ?")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            Ok(Contract {
                id: ContractId::new(r.try_get("id")?),
                code: r.try_get("code")?,
                name: r.try_get("name")?,
            })
        })
        .transpose()
    }

    // =========================================================================
    // Move operations
    // =========================================================================

    /// Insert a move.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_move(&self, mv: &Move) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO moves (id, locator, contract_id, available_to_prime_at_ms)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(mv.id.as_uuid())
        .bind(mv.locator.as_str())
        .bind(mv.contract_id.as_uuid())
        .bind(mv.available_to_prime_at.map(|t| t.timestamp_millis()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a move by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_move(&self, id: MoveId) -> Result<Option<Move>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, locator, contract_id, available_to_prime_at_ms FROM moves WHERE id = ?",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let available_ms: Option<i64> = r.try_get("available_to_prime_at_ms")?;
            let available_to_prime_at = match available_ms {
                Some(ms) => Some(Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
                    decode_error(format!("invalid available_to_prime_at_ms {}", ms))
                })?),
                None => None,
            };
            Ok(Move {
                id: MoveId::new(r.try_get("id")?),
                locator: r.try_get("locator")?,
                contract_id: ContractId::new(r.try_get("contract_id")?),
                available_to_prime_at,
            })
        })
        .transpose()
    }

    // =========================================================================
    // Address operations
    // =========================================================================

    /// Insert an address.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_address(&self, address: &Address) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO addresses (id, street_address_1, city, state, postal_code, is_oconus)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(address.id.as_uuid())
        .bind(address.street_address_1.as_str())
        .bind(address.city.as_str())
        .bind(address.state.as_str())
        .bind(address.postal_code.as_str())
        .bind(address.is_oconus)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get an address by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_address(&self, id: AddressId) -> Result<Option<Address>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, street_address_1, city, state, postal_code, is_oconus
            FROM addresses
            WHERE id = ?
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(Address {
                id: AddressId::new(r.try_get("id")?),
                street_address_1: r.try_get("street_address_1")?,
                city: r.try_get("city")?,
                state: r.try_get("state")?,
                postal_code: r.try_get("postal_code")?,
                is_oconus: r.try_get("is_oconus")?,
            })
        })
        .transpose()
    }

    async fn get_optional_address(
        &self,
        id: Option<AddressId>,
    ) -> Result<Option<Address>, sqlx::Error> {
        match id {
            Some(id) => self.get_address(id).await,
            None => Ok(None),
        }
    }
}

pub(crate) fn decode_error(message: String) -> sqlx::Error {
    sqlx::Error::Decode(message.into())
}

/// Decode a text column through `FromStr`, reporting the column on failure.
pub(crate) fn parse_column<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    T::from_str(&raw).map_err(|e| decode_error(format!("column {}: {}", column, e)))
}
