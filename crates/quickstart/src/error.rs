//! Bootstrap failure carrying the partial adapter trace

use quickstart_core::{is_kind, AdapterResult, Error, ErrorKind, ValidationError};
use std::fmt;

/// Failure returned by [`AdminBuilder::build`](crate::AdminBuilder::build)
///
/// `adapters` holds whatever was resolved before the failing step so the
/// chosen backends can still be logged or shown by diagnostics.
pub struct BootstrapError {
    pub adapters: AdapterResult,
    pub error: anyhow::Error,
}

impl BootstrapError {
    pub fn new(adapters: AdapterResult, error: anyhow::Error) -> Self {
        Self { adapters, error }
    }

    /// Whether any error in the chain has `kind`
    pub fn is(&self, kind: ErrorKind) -> bool {
        is_kind(&self.error, kind)
    }

    /// Structured validation payload, if a validation error is in the chain
    pub fn validation(&self) -> Option<&ValidationError> {
        self.error.chain().find_map(|cause| {
            cause
                .downcast_ref::<Error>()
                .and_then(Error::as_validation)
                .or_else(|| cause.downcast_ref::<ValidationError>())
        })
    }
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "admin bootstrap failed: {:#}", self.error)
    }
}

impl fmt::Debug for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapError")
            .field("adapters", &self.adapters)
            .field("error", &self.error)
            .finish()
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}
