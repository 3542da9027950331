//! Per payment request memo of resolved parameter values.

use crate::db::Repository;
use crate::domain::{ReServiceCode, ServiceItemParamName, ServiceParamKey, ShipmentId};
use std::collections::HashMap;
use tracing::debug;

/// Values resolved for shipments within one payment request session.
///
/// Purely additive; create a fresh cache for every payment request so that
/// shipment data cannot leak between sessions. Not shared across tasks.
#[derive(Debug, Default)]
pub struct ServiceParamsCache {
    values: HashMap<(ShipmentId, ServiceItemParamName), String>,
    param_keys: HashMap<ReServiceCode, Vec<ServiceParamKey>>,
}

impl ServiceParamsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, shipment_id: ShipmentId, name: ServiceItemParamName) -> Option<&str> {
        self.values.get(&(shipment_id, name)).map(|v| v.as_str())
    }

    pub fn set(&mut self, shipment_id: ShipmentId, name: ServiceItemParamName, value: String) {
        self.values.insert((shipment_id, name), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter keys the pricing formula of `code` consumes.
    ///
    /// Loaded once per code; a failed load is not remembered.
    ///
    /// # Errors
    /// Returns an error if the key query fails.
    pub async fn service_item_param_keys(
        &mut self,
        repo: &Repository,
        code: ReServiceCode,
    ) -> Result<&[ServiceParamKey], sqlx::Error> {
        if !self.param_keys.contains_key(&code) {
            let keys = repo.fetch_service_param_keys(code).await?;
            debug!(service_code = %code, keys = keys.len(), "Loaded service param keys");
            self.param_keys.insert(code, keys);
        }
        Ok(self
            .param_keys
            .get(&code)
            .map(|keys| keys.as_slice())
            .unwrap_or_default())
    }

    /// Whether the pricing formula of `code` consumes `name`.
    ///
    /// # Errors
    /// Returns an error if the key query fails.
    pub async fn service_item_needs_param_key(
        &mut self,
        repo: &Repository,
        code: ReServiceCode,
        name: ServiceItemParamName,
    ) -> Result<bool, sqlx::Error> {
        Ok(self
            .service_item_param_keys(repo, code)
            .await?
            .iter()
            .any(|key| key.name == name))
    }
}
