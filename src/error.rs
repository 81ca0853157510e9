//! Error types for the zone adapter.
//!
//! Every failure is local and synchronous: it is returned at the call that
//! caused it and the hosting application decides how to surface it.

/// Result type alias for zone adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting or committing zones.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Selector value does not match the pattern for its declared type
    #[error("Malformed selector '{value}': {reason}")]
    MalformedSelector {
        /// Raw selector value as received
        value: String,
        /// Reason the value was rejected
        reason: String,
    },

    /// `save` or `remove_selected_zone` called while nothing is selected
    #[error("No active selection")]
    NoActiveSelection,

    /// Zone geometry is missing or unusable
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Drawing tool name the engine does not offer
    #[error("Unknown drawing tool: {0}")]
    UnknownTool(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedSelector {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_selector_error() {
        let err = Error::malformed("garbage", "missing 'xywh=pixel:' prefix");
        let msg = format!("{}", err);
        assert!(msg.contains("Malformed selector"));
        assert!(msg.contains("garbage"));
        assert!(msg.contains("xywh=pixel:"));
    }

    #[test]
    fn test_no_active_selection_error() {
        let msg = format!("{}", Error::NoActiveSelection);
        assert_eq!(msg, "No active selection");
    }

    #[test]
    fn test_invalid_geometry_error() {
        let err = Error::InvalidGeometry("zone has neither points nor corners".to_string());
        assert!(format!("{}", err).contains("neither points nor corners"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
