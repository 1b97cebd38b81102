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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use super::point::{squared_distance, Point};
use super::polygon::Polygon;
use super::tolerance::Epsilon;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "Vec<(i64, i64)>", into = "Vec<(i64, i64)>")]
pub struct Hole {
    pub polygon: Polygon,
}

impl Hole {
    pub fn vertices(&self) -> &[Point] {
        &self.polygon.vertices
    }
}

impl From<Vec<(i64, i64)>> for Hole {
    fn from(t: Vec<(i64, i64)>) -> Self {
        Hole {
            polygon: Polygon::from(t),
        }
    }
}

impl From<Hole> for Vec<(i64, i64)> {
    fn from(t: Hole) -> Self {
        Vec::from(t.polygon)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Edge {
    pub v1: usize,
    pub v2: usize,
}

impl Edge {
    pub fn new(v1: usize, v2: usize) -> Self {
        Self { v1, v2 }
    }
}

impl From<(usize, usize)> for Edge {
    fn from(t: (usize, usize)) -> Self {
        Self { v1: t.0, v2: t.1 }
    }
}

impl From<Edge> for (usize, usize) {
    fn from(t: Edge) -> Self {
        (t.v1, t.v2)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub vertices: Vec<Point>,
    pub edges: Vec<Edge>,
}

impl Figure {
    /// Squared length of `edge` in the original figure.
    pub fn original_len2(&self, edge: &Edge) -> i64 {
        squared_distance(&self.vertices[edge.v1], &self.vertices[edge.v2])
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub hole: Hole,
    pub figure: Figure,
    pub epsilon: i64,
}

/// Malformed problem input. Any of these makes the problem unsolvable by
/// construction rather than merely hard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("hole has {0} vertices, need at least 3")]
    DegenerateHole(usize),

    #[error("figure has no vertices")]
    EmptyFigure,

    #[error("edge {index} ({v1}, {v2}) refers to a vertex outside 0..{vertices}")]
    EdgeOutOfRange {
        index: usize,
        v1: usize,
        v2: usize,
        vertices: usize,
    },

    #[error("edge {index} ({v1}, {v2}) has zero original length")]
    ZeroLengthEdge { index: usize, v1: usize, v2: usize },

    #[error("negative epsilon {0}")]
    NegativeEpsilon(i64),
}

impl Problem {
    pub fn tolerance(&self) -> Epsilon {
        Epsilon::from_ppm(self.epsilon)
    }

    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.hole.polygon.len() < 3 {
            return Err(ProblemError::DegenerateHole(self.hole.polygon.len()));
        }
        if self.figure.vertices.is_empty() {
            return Err(ProblemError::EmptyFigure);
        }
        if self.epsilon < 0 {
            return Err(ProblemError::NegativeEpsilon(self.epsilon));
        }
        let n = self.figure.vertices.len();
        for (index, edge) in self.figure.edges.iter().enumerate() {
            let Edge { v1, v2 } = *edge;
            if v1 >= n || v2 >= n {
                return Err(ProblemError::EdgeOutOfRange {
                    index,
                    v1,
                    v2,
                    vertices: n,
                });
            }
            if self.figure.original_len2(edge) == 0 {
                return Err(ProblemError::ZeroLengthEdge { index, v1, v2 });
            }
        }
        Ok(())
    }
}

pub fn parse_problem<P: AsRef<Path>>(path: P) -> Result<Problem> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Pose {
    pub vertices: Vec<Point>,
}

pub fn parse_pose<P: AsRef<Path>>(path: P) -> Result<Pose> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_pose<P: AsRef<Path>>(path: P, pose: &Pose) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), pose)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM: &str = r#"{
        "hole": [[0, 0], [0, 3], [3, 3], [3, 0]],
        "figure": {
            "vertices": [[0, 0], [0, 2], [2, 2]],
            "edges": [[0, 1], [1, 2]]
        },
        "epsilon": 150000
    }"#;

    #[test]
    fn parses_problem_format() {
        let problem: Problem = serde_json::from_str(PROBLEM).unwrap();
        assert_eq!(problem.hole.vertices().len(), 4);
        assert_eq!(problem.figure.edges[1], Edge::new(1, 2));
        assert_eq!(problem.figure.original_len2(&problem.figure.edges[0]), 4);
        assert_eq!(problem.tolerance().ppm(), 150_000);
        assert_eq!(problem.validate(), Ok(()));
    }

    #[test]
    fn pose_serializes_as_vertex_pairs() {
        let pose = Pose {
            vertices: vec![Point::new(1, 2), Point::new(3, 4)],
        };
        assert_eq!(
            serde_json::to_string(&pose).unwrap(),
            r#"{"vertices":[[1,2],[3,4]]}"#
        );
    }

    #[test]
    fn rejects_zero_length_edges() {
        let mut problem: Problem = serde_json::from_str(PROBLEM).unwrap();
        problem.figure.vertices[1] = Point::new(0, 0);
        assert_eq!(
            problem.validate(),
            Err(ProblemError::ZeroLengthEdge { index: 0, v1: 0, v2: 1 })
        );
    }

    #[test]
    fn rejects_dangling_edges() {
        let mut problem: Problem = serde_json::from_str(PROBLEM).unwrap();
        problem.figure.edges.push(Edge::new(2, 7));
        assert!(matches!(
            problem.validate(),
            Err(ProblemError::EdgeOutOfRange { index: 2, .. })
        ));
    }
}
