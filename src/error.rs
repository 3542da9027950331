use crate::domain::ServiceItemParamName;
use crate::planner::PlannerError;
use thiserror::Error;

/// Failure of a single lookup strategy.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Coarse classification of a lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
    Internal,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::NotFound(_) => ErrorKind::NotFound,
            LookupError::InvalidInput(_) => ErrorKind::InvalidInput,
            LookupError::Conflict(_) => ErrorKind::Conflict,
            LookupError::Planner(_) | LookupError::Db(_) => ErrorKind::Internal,
        }
    }
}

/// A lookup failure tagged with the parameter being resolved.
#[derive(Debug, Error)]
#[error("failed ServiceParamValue {param}Lookup: {source}")]
pub struct ServiceParamError {
    pub param: ServiceItemParamName,
    #[source]
    pub source: LookupError,
}

impl ServiceParamError {
    pub fn new(param: ServiceItemParamName, source: LookupError) -> Self {
        Self { param, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Failure while resolving every parameter of a service item.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Param(#[from] ServiceParamError),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::Lookup(err) => err.kind(),
            ResolveError::Param(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::NotFound("zip3 350".to_string());
        assert_eq!(err.to_string(), "Not found: zip3 350");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = LookupError::Conflict("overlap".to_string());
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_param_error_names_param() {
        let err = ServiceParamError::new(
            ServiceItemParamName::DistanceZip,
            LookupError::InvalidInput("postal code 123 is too short".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "failed ServiceParamValue DistanceZipLookup: Invalid input: postal code 123 is too short"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_db_errors_are_internal() {
        let err = LookupError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
