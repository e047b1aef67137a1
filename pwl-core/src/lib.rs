//! Persistent Weisfeiler–Lehman core library.
//!
//! Relabels graph collections with the Weisfeiler–Lehman procedure, weights
//! edges by the distance between endpoint neighbourhoods, and summarises the
//! resulting filtrations with zero-dimensional persistent homology. The
//! [`PipelineBuilder`] wires these stages into one feature-extraction pass.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod builder;
mod error;
mod features;
mod graph;
mod persistence;
mod pipeline;
mod weights;
mod wl;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::PipelineBuilder,
    error::{ErrorKind, GraphError, GraphErrorCode, PwlError, PwlErrorCode, Result},
    features::{
        FeatureBlock, FeatureColumn, FeatureMatrix, FeatureOptions, GeneratedFeatures,
        PersistenceFeatureGenerator, subtree_features,
    },
    graph::{Edge, Graph, Label},
    persistence::{
        FiltrationOrder, PersistenceCalculator, PersistenceDiagram, PersistenceOutcome,
        PersistencePair, assign_filtration_values,
    },
    pipeline::{PersistentWeisfeilerLehman, PipelineOutput},
    weights::{MetricKind, WeightAssigner},
    wl::{
        GraphLabels, LabelCompressor, LabelDictionary, LabelMultiset, WeisfeilerLehman,
        WlIteration, WlResult, propagate_attribute, refine,
    },
};
