//! Error codes and the latest-status side channel.
//!
//! Two reporting idioms live side by side:
//!
//! - Mutating and accessor operations return [`Result`] (and the versioned
//!   function table turns that into a raw [`ErrorCode`] integer).
//! - Input-event accessors return a plain value and record the outcome in a
//!   per-thread "latest status", read back with [`get_latest_status`].

use std::cell::Cell;

use thiserror::Error;

use crate::types::NodeType;

// =============================================================================
// Error Codes
// =============================================================================

/// Numeric error codes surfaced across the ABI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ErrorCode {
    #[default]
    NoError = 0,
    ParamInvalid = 401,
    AttributeOrEventNotSupported = 106102,
    NotSupportedForArkTsNode = 106103,
    NodeAdapterNoneHost = 106104,
    NodeAdapterExistInHost = 106105,
    NodeAdapterChildNodeExist = 106106,
    NodeIndexInvalid = 106200,
    BufferSizeError = 106202,
}

impl ErrorCode {
    /// Raw integer value of this code.
    pub const fn raw(self) -> i32 {
        self as i32
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Self::NoError)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.raw()
    }
}

// =============================================================================
// Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    ParamInvalid(String),

    #[error("stale or unknown handle {0}")]
    StaleHandle(String),

    #[error("tag {tag} is not supported by {node_type:?} nodes")]
    NotSupported { tag: i32, node_type: NodeType },

    #[error("operation not allowed on a generated node")]
    BuilderNode,

    #[error("adapter is not bound to a host node")]
    AdapterNoneHost,

    #[error("adapter already bound to a host node")]
    AdapterExistInHost,

    #[error("host node already has {0} child node(s)")]
    AdapterChildNodeExist(usize),

    #[error("index {index} out of range (count {count})")]
    IndexInvalid { index: i64, count: u32 },

    #[error("buffer too small: need {needed}, got {got}")]
    BufferSize { needed: usize, got: usize },
}

impl Error {
    /// Shorthand for a [`Error::ParamInvalid`] with a message.
    pub fn param(msg: impl Into<String>) -> Self {
        Self::ParamInvalid(msg.into())
    }

    /// The numeric code this error is reported as.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ParamInvalid(_) | Self::StaleHandle(_) => ErrorCode::ParamInvalid,
            Self::NotSupported { .. } => ErrorCode::AttributeOrEventNotSupported,
            Self::BuilderNode => ErrorCode::NotSupportedForArkTsNode,
            Self::AdapterNoneHost => ErrorCode::NodeAdapterNoneHost,
            Self::AdapterExistInHost => ErrorCode::NodeAdapterExistInHost,
            Self::AdapterChildNodeExist(_) => ErrorCode::NodeAdapterChildNodeExist,
            Self::IndexInvalid { .. } => ErrorCode::NodeIndexInvalid,
            Self::BufferSize { .. } => ErrorCode::BufferSizeError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Collapse a result into the integer code returned by the function table.
pub fn to_code<T>(result: Result<T>) -> i32 {
    match result {
        Ok(_) => ErrorCode::NoError.raw(),
        Err(err) => err.code().raw(),
    }
}

// =============================================================================
// Latest Status
// =============================================================================

thread_local! {
    static LATEST_STATUS: Cell<ErrorCode> = const { Cell::new(ErrorCode::NoError) };
}

/// Status recorded by the most recent side-channel accessor on this thread.
pub fn get_latest_status() -> ErrorCode {
    LATEST_STATUS.with(|s| s.get())
}

pub(crate) fn set_latest_status(code: ErrorCode) {
    LATEST_STATUS.with(|s| s.set(code));
}

/// Reset the side channel (for testing).
pub fn reset_latest_status() {
    set_latest_status(ErrorCode::NoError);
}

/// Record `Ok`/`Err` into the side channel and return the value or `fallback`.
pub(crate) fn report<T>(result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => {
            set_latest_status(ErrorCode::NoError);
            value
        }
        Err(err) => {
            set_latest_status(err.code());
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_abi() {
        assert_eq!(ErrorCode::ParamInvalid.raw(), 401);
        assert_eq!(ErrorCode::AttributeOrEventNotSupported.raw(), 106102);
        assert_eq!(ErrorCode::NotSupportedForArkTsNode.raw(), 106103);
        assert_eq!(ErrorCode::NodeIndexInvalid.raw(), 106200);
    }

    #[test]
    fn test_error_to_code() {
        assert_eq!(Error::BuilderNode.code(), ErrorCode::NotSupportedForArkTsNode);
        assert_eq!(Error::StaleHandle("n0".into()).code(), ErrorCode::ParamInvalid);
        assert_eq!(to_code::<()>(Err(Error::AdapterNoneHost)), 106104);
        assert_eq!(to_code(Ok(5)), 0);
    }

    #[test]
    fn test_latest_status_side_channel() {
        assert_eq!(get_latest_status(), ErrorCode::NoError);

        let v = report::<f32>(Err(Error::param("x")), 0.0);
        assert_eq!(v, 0.0);
        assert_eq!(get_latest_status(), ErrorCode::ParamInvalid);

        let v = report(Ok(3.5f32), 0.0);
        assert_eq!(v, 3.5);
        assert_eq!(get_latest_status(), ErrorCode::NoError);
    }
}
