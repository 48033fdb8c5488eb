//! Error types for signature registration, resolution and marshaling

use crate::encoding::TypeTag;

/// Result type for dispatch resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// A type encoding string that cannot be turned into a descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// Encoding string has no return type
    #[error("empty type encoding")]
    Empty,

    /// A character that is not a known type code
    #[error("unknown type code '{code}' at position {position}")]
    UnknownTypeCode {
        /// Offending character
        code: char,
        /// Character offset in the encoding string
        position: usize,
    },

    /// A type the native side declares as unrepresentable (`?`)
    #[error("unsupported native type at position {position}")]
    UnsupportedType {
        /// Character offset in the encoding string
        position: usize,
    },

    /// `v` used for an argument
    #[error("void is not a valid argument type (argument {index})")]
    VoidArgument {
        /// Zero-based argument index
        index: usize,
    },

    /// Selector keyword count does not match the encoded arguments
    #[error("selector takes {expected} arguments but encoding declares {found}")]
    ArityMismatch {
        /// Number of `:` in the selector
        expected: usize,
        /// Number of encoded argument types
        found: usize,
    },

    /// Selector is empty or contains whitespace
    #[error("invalid selector name '{0}'")]
    InvalidSelector(String),
}

/// Registration-time failure, scoped to a single selector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// The selector's encoding could not be represented
    #[error("malformed descriptor for {class}.{selector}: {source}")]
    MalformedDescriptor {
        /// Class being registered
        class: String,
        /// Selector that was skipped
        selector: String,
        /// Why the encoding was rejected
        #[source]
        source: EncodingError,
    },
}

/// Failure to produce a descriptor for a script-initiated call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No class in the catalog defines the selector
    #[error("method '{selector}' not found{}", hint_suffix(.class_hint))]
    NotResolvable {
        /// Class the bridge expected, if it knew one
        class_hint: Option<String>,
        /// Requested selector
        selector: String,
    },

    /// Definers disagree on the signature and ambiguity is rejected
    #[error("method '{selector}' has conflicting signatures in {}", .classes.join(", "))]
    AmbiguousSignature {
        /// Requested selector
        selector: String,
        /// Classes whose descriptors disagree, most recent first
        classes: Vec<String>,
    },
}

fn hint_suffix(class_hint: &Option<String>) -> String {
    match class_hint {
        Some(class) => format!(" on {}", class),
        None => String::new(),
    }
}

impl ResolveError {
    /// Selector the failed resolution was for
    pub fn selector(&self) -> &str {
        match self {
            ResolveError::NotResolvable { selector, .. } => selector,
            ResolveError::AmbiguousSignature { selector, .. } => selector,
        }
    }
}

/// Script value could not be converted to a native argument slot
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarshalError {
    /// Wrong number of arguments for the selector
    #[error("'{selector}' expects {expected} arguments, got {got}")]
    ArgumentCount {
        /// Selector being invoked
        selector: String,
        /// Descriptor argument count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Script value kind does not fit the argument tag
    #[error("argument {index}: expected {expected}, got {got}")]
    TypeMismatch {
        /// Zero-based argument index
        index: usize,
        /// Tag required by the descriptor
        expected: TypeTag,
        /// Script value kind supplied
        got: &'static str,
    },

    /// Numeric value does not fit the integer tag
    #[error("argument {index}: {value} is out of range for {tag}")]
    OutOfRange {
        /// Zero-based argument index
        index: usize,
        /// Integer tag of the slot
        tag: TypeTag,
        /// Supplied number
        value: f64,
    },

    /// Native return value does not match the descriptor
    #[error("return value: expected {expected}, got {got}")]
    ReturnMismatch {
        /// Descriptor return tag
        expected: TypeTag,
        /// Native value kind returned
        got: &'static str,
    },
}

/// Invalid bridge configuration
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Failed to parse TOML
    #[error("failed to parse bridge options: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid options
    #[error("invalid bridge options: {0}")]
    Invalid(String),
}
