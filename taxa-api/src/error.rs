//! Error taxonomy for category resource operations.
//!
//! Every failure is terminal for the current call and maps onto a wire
//! status through [`ApiError::status`]. No operation retries internally and
//! no partial results are returned alongside an error.

use crate::store::StoreError;
use std::fmt;
use taxa_sql::FilterError;

/// Failure taxonomy for the category resource.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    /// Coarse or record-level permission failure.
    ///
    /// The coarse check carries no detail at all; the record-level check
    /// names the denied login.
    Unauthorized {
        /// The denied login, for record-level denials only.
        login: Option<String>,
    },
    /// Record absent, or a listing produced zero rows.
    NotFound {
        /// Short description of what was not found.
        detail: String,
    },
    /// Unsafe or unparseable filter expression, unrecognized sort field,
    /// or otherwise malformed input.
    InvalidArgument {
        /// What was rejected.
        detail: String,
    },
    /// A mandatory create field is absent.
    MissingField {
        /// The absent field.
        field: String,
    },
    /// The backing store reported a failure.
    Persistence {
        /// Backend detail, passed through.
        detail: String,
    },
}

impl ApiError {
    /// The wire status code for this failure.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::InvalidArgument { .. } | Self::MissingField { .. } => 400,
            Self::Persistence { .. } => 503,
        }
    }

    /// Short machine-friendly title for the failure class.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::NotFound { .. } => "Not Found",
            Self::InvalidArgument { .. } | Self::MissingField { .. } => "Bad Request",
            Self::Persistence { .. } => "Service Unavailable",
        }
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized { login: None } => write!(f, "access denied"),
            Self::Unauthorized { login: Some(login) } => {
                write!(f, "access not allowed for login '{login}'")
            },
            Self::NotFound { detail } => write!(f, "{detail}"),
            Self::InvalidArgument { detail } => write!(f, "{detail}"),
            Self::MissingField { field } => write!(f, "{field} field missing"),
            Self::Persistence { detail } => write!(f, "{detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        Self::InvalidArgument {
            detail: format!("invalid sqlfilters: {err}"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Persistence {
            detail: err.to_string(),
        }
    }
}
