use crate::db::Repository;
use crate::domain::{Contract, DomesticServiceArea, RateArea};
use crate::error::LookupError;
use tracing::debug;

/// Maps postal codes to contract pricing geography.
#[derive(Clone, Copy)]
pub struct AreaResolver<'a> {
    repo: &'a Repository,
    contract: &'a Contract,
}

impl<'a> AreaResolver<'a> {
    pub fn new(repo: &'a Repository, contract: &'a Contract) -> Self {
        Self { repo, contract }
    }

    /// Domestic service area for the zip3 prefix of `zip`.
    pub async fn domestic_service_area(&self, zip: &str) -> Result<DomesticServiceArea, LookupError> {
        let zip3 = zip_prefix(zip, 3)?;
        let area = self
            .repo
            .fetch_domestic_service_area(self.contract.id, &zip3)
            .await?
            .ok_or_else(|| {
                LookupError::NotFound(format!(
                    "domestic service area for zip3 {} under contract {}",
                    zip3, self.contract.code
                ))
            })?;
        debug!(zip3 = %zip3, service_area = %area.service_area, "Resolved domestic service area");
        Ok(area)
    }

    /// International rate area for the full 5-digit `zip`.
    pub async fn rate_area(&self, zip: &str) -> Result<RateArea, LookupError> {
        let zip5 = zip_prefix(zip, 5)?;
        self.repo
            .fetch_rate_area_by_zip5(self.contract.id, &zip5)
            .await?
            .ok_or_else(|| {
                LookupError::NotFound(format!(
                    "rate area for zip5 {} under contract {}",
                    zip5, self.contract.code
                ))
            })
    }
}

fn zip_prefix(zip: &str, len: usize) -> Result<String, LookupError> {
    if zip.chars().count() < len {
        return Err(LookupError::InvalidInput(format!(
            "postal code {} must be at least {} characters",
            zip, len
        )));
    }
    Ok(zip.chars().take(len).collect())
}
