//! Result type alias for configuration resolution operations

use crate::error::LintrcError;

/// Standard Result type for configuration resolution operations
pub type Result<T> = std::result::Result<T, LintrcError>;
