use pwl_core::{Graph, Label};

/// Builds a graph with scalar vertex labels.
#[must_use]
pub fn labelled(vertex_count: usize, edges: &[(usize, usize)], labels: &[u64]) -> Graph {
    Graph::new(vertex_count, edges.iter().copied())
        .and_then(|graph| graph.with_labels(labels.iter().copied().map(Label::Scalar).collect()))
        .expect("fixture graphs are valid")
}

/// Star with centre label 5 and leaves labelled 1, 2 and 3.
#[must_use]
pub fn star() -> Graph {
    labelled(4, &[(0, 1), (0, 2), (0, 3)], &[5, 1, 2, 3])
}

/// `{(0,1),(0,2),(0,3),(1,2),(3,4),(3,5)}` labelled `[5,2,3,4,1,1]`.
#[must_use]
pub fn six_vertex() -> Graph {
    labelled(
        6,
        &[(0, 1), (0, 2), (0, 3), (1, 2), (3, 4), (3, 5)],
        &[5, 2, 3, 4, 1, 1],
    )
}

/// Two disjoint triangles with uniform labels.
#[must_use]
pub fn two_triangles() -> Graph {
    labelled(
        6,
        &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)],
        &[0; 6],
    )
}
