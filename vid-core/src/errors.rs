//! # Errors
//!
//! Structured errors for the video core. Every failure a caller can see
//! carries a kind with a stable name, class name and HTTP-style status code,
//! so any transport can render it without knowing the internals:
//!
//! - `InvalidInput`: metadata rejected before an id was allocated
//! - `NotFound`: unknown video id, or content requested before any upload
//! - `PayloadTooLarge`: upload crossed the configured size ceiling
//! - `StorageFailure`: I/O failure while moving bytes; safe to retry
//!
//! `VidError` can also be carried through `anyhow::Error` and recovered
//! with [`VidError::from_anyhow`].

use std::fmt;

use anyhow::Error as AnyError;
use vid_blob::BlobError;

/// Result type for video core APIs.
pub type VidResult<T> = std::result::Result<T, VidError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,      // 400
    NotFound,        // 404
    PayloadTooLarge, // 413
    InvalidInput,    // 422
    StorageFailure,  // 500
    GeneralError,    // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::InvalidInput => 422,
            ErrorKind::StorageFailure => 500,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PayloadTooLarge => "PayloadTooLarge",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::StorageFailure => "StorageFailure",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotFound => "not-found",
            ErrorKind::PayloadTooLarge => "payload-too-large",
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::StorageFailure => "storage-failure",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// A structured video core error.
///
/// - kind (name, class name, status code)
/// - message
/// - errors (optional, per-field details as JSON)
/// - source (optional, never sent to clients)
#[derive(Debug)]
pub struct VidError {
    pub kind: ErrorKind,
    pub message: String,
    pub errors: Option<serde_json::Value>,
    pub source: Option<AnyError>,
}

impl VidError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: impl Into<AnyError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Convert into `anyhow::Error`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Find a `VidError` anywhere in an `anyhow::Error` chain.
    pub fn from_anyhow(err: &AnyError) -> Option<&VidError> {
        err.chain().find_map(|e| e.downcast_ref::<VidError>())
    }

    /// Copy suitable for returning to clients: the `source` is dropped.
    pub fn sanitize_for_client(&self) -> VidError {
        VidError {
            kind: self.kind,
            message: self.message.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    // ---- Constructors ----

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for VidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for VidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<BlobError> for VidError {
    fn from(err: BlobError) -> Self {
        let kind = match &err {
            BlobError::NotFound { .. } => ErrorKind::NotFound,
            BlobError::TooLarge { .. } => ErrorKind::PayloadTooLarge,
            BlobError::Invalid { .. } => ErrorKind::BadRequest,
            BlobError::Interrupted { .. } | BlobError::Io { .. } | BlobError::Backend { .. } => {
                ErrorKind::StorageFailure
            }
        };
        VidError::new(kind, err.to_string()).with_source(err)
    }
}

/// Return early with a `VidError` built by one of its constructors.
#[macro_export]
macro_rules! bail_vid {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::VidError::$ctor($msg))
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::VidError::$ctor(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_errors_map_to_kinds() {
        let not_found: VidError = BlobError::not_found("videos/1.bin").into();
        assert_eq!(not_found.kind, ErrorKind::NotFound);

        let too_large: VidError = BlobError::TooLarge { limit: 5 }.into();
        assert_eq!(too_large.code(), 413);

        let io: VidError = BlobError::from(std::io::Error::other("disk full")).into();
        assert_eq!(io.kind, ErrorKind::StorageFailure);
        assert!(std::error::Error::source(&io).is_some());
    }

    #[test]
    fn sanitized_json_has_no_source() {
        let err = VidError::invalid_input("Invalid video metadata")
            .with_errors(serde_json::json!({"title": ["required"]}))
            .with_source(anyhow::anyhow!("secret detail"));

        let safe = err.sanitize_for_client();
        assert!(safe.source.is_none());

        let body = safe.to_json();
        assert_eq!(body["name"], "InvalidInput");
        assert_eq!(body["code"], 422);
        assert_eq!(body["className"], "invalid-input");
        assert_eq!(body["errors"]["title"][0], "required");
        assert!(!body.to_string().contains("secret"));
    }

    #[test]
    fn recovered_through_anyhow_context() {
        let err = VidError::not_found("No video with id 3")
            .into_anyhow()
            .context("while fetching");

        let found = VidError::from_anyhow(&err).unwrap();
        assert!(found.is_not_found());
    }
}
