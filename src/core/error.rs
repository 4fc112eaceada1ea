// src/core/error.rs

use thiserror::Error;

use crate::core::models::ReportFormat;

/// Failure of a single call across the remote API boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    /// The body could not be decoded into the expected payload.
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint URL could not be built from the configured base URL.
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The human-readable message the server attached to a rejection, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a rejected call.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A blocking, view-level error. Only raised when every source of a view
/// failed in the same refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Failed to load scan data")]
    ScanUnavailable { scan_id: String },

    #[error("Failed to load dashboard data")]
    DashboardUnavailable,
}

impl ViewError {
    /// Where the user should be sent to recover.
    pub fn recovery(&self) -> Recovery {
        Recovery::ReturnHome
    }
}

/// Recovery actions offered alongside a blocking error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    ReturnHome,
}

/// Failure of the launch flow. All variants are meant to be shown inline at
/// the input that caused them.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Please enter a target domain")]
    EmptyTarget,

    #[error("You must accept the legal disclaimer before starting a scan")]
    ConsentRequired,

    #[error("{reason}")]
    InvalidTarget { reason: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failure of a user-triggered report action.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("A report is already being generated for scan {scan_id}")]
    AlreadyGenerating { scan_id: String },

    #[error("Failed to generate {} report: {source}", .format.to_string().to_uppercase())]
    Failed {
        format: ReportFormat,
        #[source]
        source: ApiError,
    },

    #[error("Unsupported report format")]
    UnsupportedFormat,
}
