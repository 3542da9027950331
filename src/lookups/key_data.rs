//! Evaluation context for one service item on one payment request.

use super::cache::ServiceParamsCache;
use super::registry::{LookupRegistry, LookupSnapshot};
use super::LookupContext;
use crate::config::Config;
use crate::db::Repository;
use crate::domain::{
    Contract, Move, MoveId, MtoServiceItem, MtoShipment, ParamOrigin, PaymentRequestId,
    ServiceItemId, ServiceItemParamName, ShipmentId,
};
use crate::error::{ErrorKind, LookupError, ResolveError, ServiceParamError};
use crate::planner::RoutePlanner;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Identifies the service item to resolve and carries requester-supplied values.
#[derive(Debug, Clone)]
pub struct ParamRequest {
    pub service_item_id: ServiceItemId,
    pub payment_request_id: PaymentRequestId,
    pub move_id: MoveId,
    pub prime_values: HashMap<ServiceItemParamName, String>,
}

impl ParamRequest {
    pub fn new(
        service_item_id: ServiceItemId,
        payment_request_id: PaymentRequestId,
        move_id: MoveId,
    ) -> Self {
        Self {
            service_item_id,
            payment_request_id,
            move_id,
            prime_values: HashMap::new(),
        }
    }

    /// Add a value supplied by the prime contractor, such as a SIT range bound.
    pub fn with_prime_value(mut self, name: ServiceItemParamName, value: &str) -> Self {
        self.prime_values.insert(name, value.to_string());
        self
    }
}

/// One parameter value produced for the pricing formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedParam {
    pub name: ServiceItemParamName,
    pub value: String,
}

/// Snapshot of a service item and everything its parameters are resolved from.
///
/// Resolution is sequential: each call awaits its lookup before the next one
/// starts, and the optional cache is borrowed exclusively for the session.
#[derive(Debug)]
pub struct ServiceItemParamKeyData<'a> {
    repo: &'a Repository,
    planner: &'a dyn RoutePlanner,
    config: &'a Config,
    cache: Option<&'a mut ServiceParamsCache>,
    service_item: MtoServiceItem,
    shipment: Option<MtoShipment>,
    mv: Move,
    contract: Contract,
    payment_request_id: PaymentRequestId,
    prime_values: HashMap<ServiceItemParamName, String>,
    registry: LookupRegistry,
}

impl<'a> ServiceItemParamKeyData<'a> {
    /// Load the service item, its move, contract and shipment, and bind every
    /// parameter name.
    ///
    /// # Errors
    /// Returns `NotFound` if the service item, move, contract or shipment is
    /// missing and `InvalidInput` if the service item is not on the move.
    pub async fn initialize(
        repo: &'a Repository,
        planner: &'a dyn RoutePlanner,
        config: &'a Config,
        cache: Option<&'a mut ServiceParamsCache>,
        request: ParamRequest,
    ) -> Result<Self, LookupError> {
        let service_item = repo
            .fetch_service_item(request.service_item_id)
            .await?
            .ok_or_else(|| {
                LookupError::NotFound(format!("MTOServiceItem {}", request.service_item_id))
            })?;

        let mv = repo
            .get_move(request.move_id)
            .await?
            .ok_or_else(|| LookupError::NotFound(format!("Move {}", request.move_id)))?;

        if service_item.move_id != mv.id {
            return Err(LookupError::InvalidInput(format!(
                "MTOServiceItem {} belongs to Move {}, not Move {}",
                service_item.id, service_item.move_id, mv.id
            )));
        }

        let contract = repo
            .get_contract(mv.contract_id)
            .await?
            .ok_or_else(|| LookupError::NotFound(format!("Contract {}", mv.contract_id)))?;

        let shipment = match service_item.shipment_id {
            Some(id) => Some(
                repo.fetch_shipment(id)
                    .await?
                    .ok_or_else(|| LookupError::NotFound(format!("MTOShipment {}", id)))?,
            ),
            None => None,
        };

        let registry = LookupRegistry::new(LookupSnapshot {
            mv: &mv,
            contract: &contract,
            shipment: shipment.as_ref(),
            service_item: &service_item,
        });

        debug!(
            service_item_id = %service_item.id,
            service_code = %service_item.code,
            payment_request_id = %request.payment_request_id,
            has_shipment = shipment.is_some(),
            "Initialized service item param key data"
        );

        Ok(Self {
            repo,
            planner,
            config,
            cache,
            service_item,
            shipment,
            mv,
            contract,
            payment_request_id: request.payment_request_id,
            prime_values: request.prime_values,
            registry,
        })
    }

    /// Resolve one parameter for the service item.
    ///
    /// Shipment-scoped values are served from and written to the attached
    /// cache.
    ///
    /// # Errors
    /// Returns the lookup failure tagged with `name`.
    pub async fn service_param_value(
        &mut self,
        name: ServiceItemParamName,
    ) -> Result<String, ServiceParamError> {
        let cache_key = self.cache_key(name);

        if let (Some(shipment_id), Some(cache)) = (cache_key, self.cache.as_deref()) {
            if let Some(value) = cache.get(shipment_id, name) {
                debug!(param = %name, shipment_id = %shipment_id, "Param cache hit");
                return Ok(value.to_string());
            }
            debug!(param = %name, shipment_id = %shipment_id, "Param cache miss");
        }

        let lookup = self.registry.get(name).ok_or_else(|| {
            ServiceParamError::new(
                name,
                LookupError::InvalidInput(format!("no lookup bound for {}", name)),
            )
        })?;
        let ctx = self.context();
        debug!(param = %name, service_item_id = %self.service_item.id, "Resolving param");
        let value = lookup
            .resolve(&ctx)
            .await
            .map_err(|source| ServiceParamError::new(name, source))?;

        if let (Some(shipment_id), Some(cache)) = (cache_key, self.cache.as_deref_mut()) {
            cache.set(shipment_id, name, value.clone());
        }
        Ok(value)
    }

    /// Resolve every parameter the service item's pricing formula consumes.
    ///
    /// System parameters are looked up, prime parameters are taken from the
    /// request and pricer parameters are skipped. Optional parameters that
    /// cannot be found are left out. Stops at the first failure; values
    /// already cached stay cached.
    ///
    /// # Errors
    /// Returns the first failing parameter, or the key query error.
    pub async fn resolve_service_item_params(&mut self) -> Result<Vec<ResolvedParam>, ResolveError> {
        let code = self.service_item.code;
        let keys = match self.cache.as_deref_mut() {
            Some(cache) => cache
                .service_item_param_keys(self.repo, code)
                .await
                .map_err(LookupError::from)?
                .to_vec(),
            None => self
                .repo
                .fetch_service_param_keys(code)
                .await
                .map_err(LookupError::from)?,
        };

        let mut resolved = Vec::with_capacity(keys.len());
        for key in keys {
            let value = match key.origin {
                ParamOrigin::Pricer => continue,
                ParamOrigin::Prime => match self.prime_values.get(&key.name) {
                    Some(value) => value.clone(),
                    None if key.is_optional => continue,
                    None => {
                        return Err(ServiceParamError::new(
                            key.name,
                            LookupError::NotFound(format!("{} was not supplied", key.name)),
                        )
                        .into())
                    }
                },
                ParamOrigin::System => match self.service_param_value(key.name).await {
                    Ok(value) => value,
                    Err(err) if key.is_optional && err.kind() == ErrorKind::NotFound => {
                        debug!(param = %key.name, error = %err, "Skipping optional param");
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                },
            };
            resolved.push(ResolvedParam {
                name: key.name,
                value,
            });
        }

        debug!(
            service_item_id = %self.service_item.id,
            service_code = %code,
            params = resolved.len(),
            "Resolved service item params"
        );
        Ok(resolved)
    }

    pub fn service_item(&self) -> &MtoServiceItem {
        &self.service_item
    }

    pub fn shipment(&self) -> Option<&MtoShipment> {
        self.shipment.as_ref()
    }

    pub fn move_snapshot(&self) -> &Move {
        &self.mv
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn payment_request_id(&self) -> PaymentRequestId {
        self.payment_request_id
    }

    pub fn registry(&self) -> &LookupRegistry {
        &self.registry
    }

    /// Cache slot for `name`, if the value may be shared across the shipment.
    fn cache_key(&self, name: ServiceItemParamName) -> Option<ShipmentId> {
        if self.cache.is_none() || !name.is_shipment_scoped() {
            return None;
        }
        self.shipment.as_ref().map(|s| s.id)
    }

    fn context(&self) -> LookupContext<'_> {
        LookupContext {
            repo: self.repo,
            planner: self.planner,
            config: self.config,
            contract: &self.contract,
            payment_request_id: self.payment_request_id,
            prime_values: &self.prime_values,
        }
    }
}
