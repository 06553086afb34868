//! Error types for AST-to-CFG construction.

use thiserror::Error;

/// Errors that can surface from [`crate::parse_program`] and its internals.
///
/// All errors are synchronous: a failed build never returns a partial
/// [`crate::graph::FlowProgram`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The input is not a usable AST: not an object, missing a `type` tag,
    /// or the top-level node is not a `Program`.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable explanation of what was wrong with the input.
        reason: String,
    },

    /// A statement or expression tag the dispatcher does not recognize.
    #[error("unsupported construct: {tag}")]
    UnsupportedConstruct {
        /// The AST `type` tag that had no translator.
        tag: String,
    },

    /// A `break`/`continue` with no resolvable target, or a `continue`
    /// aimed at a label that does not bind an iteration statement.
    #[error("illegal jump target for {statement}{}", label.as_ref().map(|l| format!(" (label {l:?})")).unwrap_or_default())]
    IllegalJumpTarget {
        /// `"break"` or `"continue"`.
        statement: &'static str,
        /// The label named by the jump, if any.
        label: Option<String>,
    },

    /// Recursion depth exceeded the builder's configured `max_depth`.
    #[error("input too deep: exceeded recursion limit of {limit}")]
    InputTooDeep {
        /// The configured limit that was exceeded.
        limit: usize,
    },
}

/// Convenience alias used throughout the construction engine.
pub type FlowResult<T> = Result<T, FlowError>;
