// Copyright 2021 Team Special Weekend
// Copyright 2021 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use geom::schema::{Problem, ProblemError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub v1: usize,
    pub v2: usize,
    /// Squared length in the original figure. Always positive.
    pub len2: i64,
}

/// Adjacency view of the figure with original squared lengths attached.
/// Fixed for the lifetime of a solve.
#[derive(Debug, Clone)]
pub struct FigureGraph {
    edges: Vec<GraphEdge>,
    adj: Vec<Vec<(usize, i64)>>,
}

impl FigureGraph {
    pub fn from_problem(problem: &Problem) -> Result<Self, ProblemError> {
        problem.validate()?;
        let figure = &problem.figure;
        let edges = figure
            .edges
            .iter()
            .map(|e| (e.v1, e.v2, figure.original_len2(e)))
            .collect::<Vec<_>>();
        Self::from_edges(figure.vertices.len(), &edges)
    }

    /// Builds a graph directly from `(v1, v2, len2)` triples.
    pub fn from_edges(n: usize, edges: &[(usize, usize, i64)]) -> Result<Self, ProblemError> {
        if n == 0 {
            return Err(ProblemError::EmptyFigure);
        }
        let mut adj = vec![vec![]; n];
        let mut graph_edges = Vec::with_capacity(edges.len());
        for (index, &(v1, v2, len2)) in edges.iter().enumerate() {
            if v1 >= n || v2 >= n {
                return Err(ProblemError::EdgeOutOfRange {
                    index,
                    v1,
                    v2,
                    vertices: n,
                });
            }
            if len2 <= 0 || v1 == v2 {
                return Err(ProblemError::ZeroLengthEdge { index, v1, v2 });
            }
            adj[v1].push((v2, len2));
            adj[v2].push((v1, len2));
            graph_edges.push(GraphEdge { v1, v2, len2 });
        }
        Ok(Self {
            edges: graph_edges,
            adj,
        })
    }

    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge_triples(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        self.edges.iter().map(|e| (e.v1, e.v2, e.len2))
    }

    /// `(neighbor, original squared length)` pairs.
    pub fn neighbors(&self, v: usize) -> &[(usize, i64)] {
        &self.adj[v]
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }
}
