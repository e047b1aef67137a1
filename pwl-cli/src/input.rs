//! JSON graph collections.
//!
//! The accepted document is
//! `{"graphs": [{"vertices": n, "edges": [[u, v], ...], "labels": [...] | null}]}`.
//! A label is either a single non-negative integer or a non-empty list whose
//! first entry is the primary value.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use pwl_core::{Graph, GraphError, Label};
use serde::Deserialize;
use thiserror::Error;
use tracing::{Span, debug, field, instrument};

/// Labels substituted for graphs that arrive without any.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum MissingLabels {
    /// Every vertex receives label 0.
    #[default]
    Uniform,
    /// Every vertex is labelled with its degree.
    Degree,
}

impl MissingLabels {
    fn labels_for(self, graph: &Graph) -> Vec<Label> {
        (0..graph.vertex_count())
            .map(|vertex| match self {
                Self::Uniform => Label::Scalar(0),
                Self::Degree => Label::Scalar(graph.degree(vertex) as u64),
            })
            .collect()
    }
}

/// Failures while reading a graph collection.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be opened or read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The document is not valid JSON or does not match the expected shape.
    #[error("malformed graph document: {source}")]
    Json {
        /// Error reported by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A label list was empty.
    #[error("graph {graph}: vertex {vertex} has an empty label")]
    EmptyLabel {
        /// Position of the graph in the document.
        graph: usize,
        /// Vertex carrying the empty label.
        vertex: usize,
    },
    /// A graph failed structural validation.
    #[error("graph {graph}: {source}")]
    Graph {
        /// Position of the graph in the document.
        graph: usize,
        /// Validation failure.
        #[source]
        source: GraphError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    graphs: Vec<RawGraph>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGraph {
    vertices: usize,
    #[serde(default)]
    edges: Vec<(usize, usize)>,
    #[serde(default)]
    labels: Option<Vec<RawLabel>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Scalar(u64),
    Sequence(Vec<u64>),
}

/// Opens `path` and parses its graph collection.
///
/// # Errors
/// Returns [`InputError`] when the file cannot be read or any graph is
/// malformed.
#[instrument(name = "cli.load_graphs", err, skip(missing), fields(path = field::Empty, graphs = field::Empty))]
pub fn load_graphs(path: &Path, missing: MissingLabels) -> Result<Vec<Graph>, InputError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graphs = read_graphs(BufReader::new(file), missing)?;
    span.record("graphs", graphs.len());
    Ok(graphs)
}

/// Parses a graph collection from any reader.
///
/// # Errors
/// Returns [`InputError::Json`] for malformed documents,
/// [`InputError::EmptyLabel`] for an empty label list and
/// [`InputError::Graph`] when a graph fails validation.
///
/// # Examples
/// ```
/// use pwl_cli::input::{MissingLabels, read_graphs};
/// use pwl_core::Label;
///
/// let json = r#"{"graphs": [{"vertices": 3, "edges": [[0, 1], [1, 2]], "labels": null}]}"#;
/// let graphs = read_graphs(json.as_bytes(), MissingLabels::Degree)?;
/// assert_eq!(
///     graphs[0].labels(),
///     Some(&[Label::Scalar(1), Label::Scalar(2), Label::Scalar(1)][..])
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_graphs(reader: impl Read, missing: MissingLabels) -> Result<Vec<Graph>, InputError> {
    let document: Document =
        serde_json::from_reader(reader).map_err(|source| InputError::Json { source })?;
    document
        .graphs
        .into_iter()
        .enumerate()
        .map(|(index, raw)| build_graph(index, raw, missing))
        .collect()
}

fn build_graph(index: usize, raw: RawGraph, missing: MissingLabels) -> Result<Graph, InputError> {
    let as_graph_error = |source| InputError::Graph {
        graph: index,
        source,
    };
    let mut graph = Graph::new(raw.vertices, raw.edges).map_err(as_graph_error)?;
    let labels = match raw.labels {
        Some(labels) => labels
            .into_iter()
            .enumerate()
            .map(|(vertex, label)| convert_label(index, vertex, label))
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            debug!(graph = index, policy = ?missing, "substituting missing labels");
            missing.labels_for(&graph)
        }
    };
    graph.set_labels(labels).map_err(as_graph_error)?;
    Ok(graph)
}

fn convert_label(graph: usize, vertex: usize, raw: RawLabel) -> Result<Label, InputError> {
    match raw {
        RawLabel::Scalar(value) => Ok(Label::Scalar(value)),
        RawLabel::Sequence(values) => {
            Label::from_sequence(&values).ok_or(InputError::EmptyLabel { graph, vertex })
        }
    }
}
