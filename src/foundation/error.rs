/// Convenience result type used across designtree.
pub type DesignResult<T> = Result<T, DesignError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Each variant is a distinct signal the host can act on: retry a fetch, show a placeholder, or
/// log and continue. Only [`DesignError::LayoutInconsistency`] is a hard stop (for the current
/// frame).
#[derive(thiserror::Error, Debug)]
pub enum DesignError {
    /// The binary document could not be decoded.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A node query did not resolve to any node.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A variant property combination is not registered in its component set.
    #[error("variant mismatch: no member '{variant}' in component set '{component_set}'")]
    VariantMismatch {
        /// Component set that was searched.
        component_set: String,
        /// Canonical variant key that was not found.
        variant: String,
    },

    /// A tagged query string could not be parsed.
    #[error("invalid node query: {0}")]
    InvalidQuery(String),

    /// The layout engine returned boxes that do not cover the flattened node set.
    #[error("layout inconsistency: {0}")]
    LayoutInconsistency(String),

    /// A transition target could not be located in the "to" tree.
    #[error("animation target missing: {0}")]
    AnimationTargetMissing(String),

    /// The layout engine rejected a node or style.
    #[error("layout engine error: {0}")]
    LayoutEngine(String),

    /// Structurally invalid input to a builder.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid session configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from host callbacks.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DesignError {
    /// Build a [`DesignError::NodeNotFound`] value.
    pub fn node_not_found(msg: impl Into<String>) -> Self {
        Self::NodeNotFound(msg.into())
    }

    /// Build a [`DesignError::InvalidQuery`] value.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Build a [`DesignError::LayoutInconsistency`] value.
    pub fn layout_inconsistency(msg: impl Into<String>) -> Self {
        Self::LayoutInconsistency(msg.into())
    }

    /// Build a [`DesignError::AnimationTargetMissing`] value.
    pub fn animation_target_missing(msg: impl Into<String>) -> Self {
        Self::AnimationTargetMissing(msg.into())
    }

    /// Build a [`DesignError::LayoutEngine`] value.
    pub fn layout_engine(msg: impl Into<String>) -> Self {
        Self::LayoutEngine(msg.into())
    }

    /// Build a [`DesignError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DesignError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return `false` only for errors that must abort the current frame.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::LayoutInconsistency(_))
    }
}

impl From<taffy::TaffyError> for DesignError {
    fn from(e: taffy::TaffyError) -> Self {
        Self::LayoutEngine(e.to_string())
    }
}

/// Reasons a binary document was rejected before or during payload decoding.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The leading magic bytes do not identify a design document.
    #[error("bad magic {found:?}")]
    BadMagic {
        /// The four bytes found at the start of the input.
        found: [u8; 4],
    },

    /// The header names a format version this build does not read.
    #[error("unsupported document version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version this build supports.
        expected: u32,
        /// Version found in the header.
        found: u32,
    },

    /// The input ended before a complete value could be read.
    #[error("truncated input while reading {context}: needed {needed} bytes, {available} available")]
    Truncated {
        /// What was being read.
        context: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// An enum discriminant outside the known range.
    #[error("unknown tag {tag} for {context}")]
    UnknownTag {
        /// Which enum was being decoded.
        context: &'static str,
        /// The unrecognized discriminant.
        tag: u8,
    },

    /// The payload checksum in the header does not match the payload bytes.
    #[error("checksum mismatch: header {expected:#018x}, payload {found:#018x}")]
    ChecksumMismatch {
        /// Checksum stored in the header.
        expected: u64,
        /// Checksum computed over the payload.
        found: u64,
    },

    /// A length prefix disagrees with the bytes actually consumed.
    #[error("length mismatch in {context}: declared {declared}, consumed {consumed}")]
    LengthMismatch {
        /// Which message was being decoded.
        context: &'static str,
        /// Declared length.
        declared: usize,
        /// Bytes consumed by the decoder.
        consumed: usize,
    },

    /// A string, sequence or message is too long for its `u32` length prefix.
    #[error("length {len} does not fit a u32 prefix")]
    LengthOverflow {
        /// The offending length.
        len: usize,
    },

    /// Views are nested deeper than the decoder follows.
    #[error("views nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The maximum accepted depth.
        limit: usize,
    },

    /// A string field is not valid UTF-8.
    #[error("invalid utf-8 in {context}")]
    InvalidUtf8 {
        /// Which field was being decoded.
        context: &'static str,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
