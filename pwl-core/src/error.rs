//! Error types for the persistent Weisfeiler–Lehman core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while building or mutating a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// An edge referenced a vertex that does not exist.
    #[error("edge references vertex {vertex}, but the graph has {vertex_count} vertices")]
    VertexOutOfBounds {
        /// The offending vertex index.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// An edge index was outside the edge list.
    #[error("edge index {edge} is out of bounds for {edge_count} edges")]
    EdgeOutOfBounds {
        /// The requested edge index.
        edge: usize,
        /// Number of edges in the graph.
        edge_count: usize,
    },
    /// An edge joined a vertex to itself.
    #[error("self-loop on vertex {vertex} is not supported")]
    SelfLoop {
        /// Vertex carrying the loop.
        vertex: usize,
    },
    /// The same unordered vertex pair appeared twice.
    #[error("parallel edge between {lower} and {upper} is not supported")]
    ParallelEdge {
        /// Smaller endpoint of the duplicated pair.
        lower: usize,
        /// Larger endpoint of the duplicated pair.
        upper: usize,
    },
    /// A per-vertex or per-edge vector did not match the graph size.
    #[error("attribute `{attribute}` has {actual} values but {expected} were expected")]
    LengthMismatch {
        /// Name of the attribute being assigned.
        attribute: Arc<str>,
        /// Number of values required.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// An edge weight was NaN or infinite.
    #[error("edge {edge} has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Index of the offending edge.
        edge: usize,
        /// The rejected weight.
        weight: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An edge referenced a vertex that does not exist.
        VertexOutOfBounds => VertexOutOfBounds { .. } => "GRAPH_VERTEX_OUT_OF_BOUNDS",
        /// An edge index was outside the edge list.
        EdgeOutOfBounds => EdgeOutOfBounds { .. } => "GRAPH_EDGE_OUT_OF_BOUNDS",
        /// An edge joined a vertex to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// The same unordered vertex pair appeared twice.
        ParallelEdge => ParallelEdge { .. } => "GRAPH_PARALLEL_EDGE",
        /// A per-vertex or per-edge vector did not match the graph size.
        LengthMismatch => LengthMismatch { .. } => "GRAPH_LENGTH_MISMATCH",
        /// An edge weight was NaN or infinite.
        NonFiniteWeight => NonFiniteWeight { .. } => "GRAPH_NON_FINITE_WEIGHT",
    }
}

/// Broad classification of [`PwlError`] variants.
///
/// Callers deciding whether to skip a malformed graph or abort a whole batch
/// usually only need this level of detail.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Invalid parameters: power, metric, order, iteration selection.
    Configuration,
    /// A graph lacked a vertex or edge attribute the operation requires.
    MissingAttribute,
    /// Compressed labels were not a contiguous zero-based range.
    LabelRange,
    /// An internal consistency check failed. Always a bug, never retried.
    InvariantViolation,
    /// The graph itself was malformed.
    InvalidGraph,
}

/// Error type produced by every fallible operation in the core.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PwlError {
    /// The persistence exponent must be finite and strictly positive.
    #[error("power must be finite and greater than zero (got {power})")]
    InvalidPower {
        /// The rejected exponent.
        power: f64,
    },
    /// The Minkowski order must be strictly positive (infinity is allowed).
    #[error("Minkowski order must be greater than zero (got {order})")]
    InvalidMinkowskiOrder {
        /// The rejected order.
        order: f64,
    },
    /// A metric name could not be parsed.
    #[error("unknown metric `{name}`")]
    UnknownMetric {
        /// The name supplied by the caller.
        name: Arc<str>,
    },
    /// A filtration order name could not be parsed.
    #[error("unknown filtration order `{name}`; expected `sublevel` or `superlevel`")]
    UnknownOrder {
        /// The name supplied by the caller.
        name: Arc<str>,
    },
    /// The configured value for unpaired components must be finite.
    #[error("unpaired value must be finite (got {value})")]
    InvalidUnpairedValue {
        /// The rejected value.
        value: f64,
    },
    /// A feature selection asked for an iteration that was never computed.
    #[error("iteration {requested} was requested but only {available} iterations exist")]
    IterationOutOfRange {
        /// Requested iteration (inclusive upper bound).
        requested: usize,
        /// Number of iterations available.
        available: usize,
    },
    /// Normalising filtration values would divide by zero.
    #[error("cannot normalise attribute `{attribute}`: its extreme value is zero")]
    ZeroNormalisationOffset {
        /// Attribute used for the filtration.
        attribute: Arc<str>,
    },
    /// A graph in a collection had no vertex labels.
    #[error("graph {graph} has no vertex labels")]
    MissingLabels {
        /// Position of the graph in the input collection.
        graph: usize,
    },
    /// A graph lacked an attribute the operation needs.
    #[error("graph is missing the `{attribute}` attribute")]
    MissingAttribute {
        /// Name of the missing attribute.
        attribute: Arc<str>,
    },
    /// Compressed labels across a collection did not form `0..n`.
    #[error(
        "compressed labels must form a contiguous zero-based range (min={min}, max={max}, distinct={distinct})"
    )]
    LabelRange {
        /// Smallest label observed.
        min: u64,
        /// Largest label observed.
        max: u64,
        /// Number of distinct labels observed.
        distinct: usize,
    },
    /// An internal identity failed to hold.
    #[error("invariant violated: {invariant} (expected {expected}, got {actual})")]
    InvariantViolation {
        /// Name of the violated identity.
        invariant: &'static str,
        /// Value the identity demanded.
        expected: usize,
        /// Value actually observed.
        actual: usize,
    },
    /// A graph was malformed.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`PwlError`] variants.
    enum PwlErrorCode for PwlError {
        /// The persistence exponent must be finite and strictly positive.
        InvalidPower => InvalidPower { .. } => "PWL_INVALID_POWER",
        /// The Minkowski order must be strictly positive.
        InvalidMinkowskiOrder => InvalidMinkowskiOrder { .. } => "PWL_INVALID_MINKOWSKI_ORDER",
        /// A metric name could not be parsed.
        UnknownMetric => UnknownMetric { .. } => "PWL_UNKNOWN_METRIC",
        /// A filtration order name could not be parsed.
        UnknownOrder => UnknownOrder { .. } => "PWL_UNKNOWN_ORDER",
        /// The configured unpaired value was not finite.
        InvalidUnpairedValue => InvalidUnpairedValue { .. } => "PWL_INVALID_UNPAIRED_VALUE",
        /// A feature selection asked for an iteration that was never computed.
        IterationOutOfRange => IterationOutOfRange { .. } => "PWL_ITERATION_OUT_OF_RANGE",
        /// Normalising filtration values would divide by zero.
        ZeroNormalisationOffset => ZeroNormalisationOffset { .. } => "PWL_ZERO_NORMALISATION_OFFSET",
        /// A graph in a collection had no vertex labels.
        MissingLabels => MissingLabels { .. } => "PWL_MISSING_LABELS",
        /// A graph lacked an attribute the operation needs.
        MissingAttribute => MissingAttribute { .. } => "PWL_MISSING_ATTRIBUTE",
        /// Compressed labels did not form a contiguous zero-based range.
        LabelRange => LabelRange { .. } => "PWL_LABEL_RANGE",
        /// An internal identity failed to hold.
        InvariantViolation => InvariantViolation { .. } => "PWL_INVARIANT_VIOLATION",
        /// A graph was malformed.
        Graph => Graph(..) => "PWL_INVALID_GRAPH",
    }
}

impl PwlError {
    /// Classify this error according to [`ErrorKind`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPower { .. }
            | Self::InvalidMinkowskiOrder { .. }
            | Self::UnknownMetric { .. }
            | Self::UnknownOrder { .. }
            | Self::InvalidUnpairedValue { .. }
            | Self::IterationOutOfRange { .. }
            | Self::ZeroNormalisationOffset { .. } => ErrorKind::Configuration,
            Self::MissingLabels { .. } | Self::MissingAttribute { .. } => {
                ErrorKind::MissingAttribute
            }
            Self::LabelRange { .. } => ErrorKind::LabelRange,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::Graph(_) => ErrorKind::InvalidGraph,
        }
    }

    /// Retrieve the inner [`GraphErrorCode`] when the error originated in a [`crate::Graph`].
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn missing_attribute(attribute: &str) -> Self {
        Self::MissingAttribute {
            attribute: Arc::from(attribute),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, PwlError>;
