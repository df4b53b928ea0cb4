//! Error handling and result types for BTree operations.
//!
//! Ordinary misses (absent key on search or removal, duplicate key on insert)
//! are reported through booleans and `Option`s. The errors below cover
//! configuration mistakes and the checked `try_*` entry points.

/// Error type for B-tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// Key not found in the tree.
    KeyNotFound,
    /// Key already present in the tree.
    DuplicateKey,
    /// Invalid minimum degree specified.
    InvalidMinDegree(String),
    /// Internal data structure integrity violation.
    DataIntegrityError(String),
    /// Arena operation failed.
    ArenaError(String),
}

impl BTreeError {
    /// Create an InvalidMinDegree error with context
    pub fn invalid_min_degree(min_degree: usize, min_required: usize) -> Self {
        Self::InvalidMinDegree(format!(
            "Minimum degree {} is invalid (minimum required: {})",
            min_degree, min_required
        ))
    }

    /// Create an InvalidMinDegree error for a degree whose `2t` bound overflows
    pub fn min_degree_too_large(min_degree: usize, max_allowed: usize) -> Self {
        Self::InvalidMinDegree(format!(
            "Minimum degree {} is too large (maximum allowed: {})",
            min_degree, max_allowed
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create an ArenaError with context
    pub fn arena_error(operation: &str, details: &str) -> Self {
        Self::ArenaError(format!("{} failed: {}", operation, details))
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidMinDegree(_))
    }

    /// Check if this error reports an ordinary miss rather than a fault
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::KeyNotFound | Self::DuplicateKey)
    }
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BTreeError::KeyNotFound => write!(f, "Key not found in tree"),
            BTreeError::DuplicateKey => write!(f, "Key already present in tree"),
            BTreeError::InvalidMinDegree(msg) => write!(f, "Invalid minimum degree: {}", msg),
            BTreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
            BTreeError::ArenaError(msg) => write!(f, "Arena error: {}", msg),
        }
    }
}

impl std::error::Error for BTreeError {}

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BTreeError>;

/// Result type for tree construction and validation
pub type InitResult<T> = Result<T, BTreeError>;

/// Result extension trait for improved error handling
pub trait BTreeResultExt<T> {
    /// Convert to a BTreeResult with additional context
    fn with_context(self, context: &str) -> BTreeResult<T>;

    /// Convert to a BTreeResult with operation context
    fn with_operation(self, operation: &str) -> BTreeResult<T>;
}

impl<T> BTreeResultExt<T> for Result<T, BTreeError> {
    fn with_context(self, context: &str) -> BTreeResult<T> {
        self.map_err(|e| match e {
            BTreeError::KeyNotFound => BTreeError::KeyNotFound,
            BTreeError::DuplicateKey => BTreeError::DuplicateKey,
            BTreeError::InvalidMinDegree(msg) => {
                BTreeError::InvalidMinDegree(format!("{}: {}", context, msg))
            }
            BTreeError::DataIntegrityError(msg) => BTreeError::data_integrity(context, &msg),
            BTreeError::ArenaError(msg) => BTreeError::arena_error(context, &msg),
        })
    }

    fn with_operation(self, operation: &str) -> BTreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}
