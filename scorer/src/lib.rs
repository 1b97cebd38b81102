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

use geom::schema::{Hole, Pose, Problem, ProblemError};
use geom::*;
use log::debug;
use thiserror::Error;

/// Sum over hole vertices of the squared distance to the nearest point.
/// `None` when there are no points to measure against.
pub fn dislike_of<'a, I>(hole: &Hole, points: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a Point>,
    I::IntoIter: Clone,
{
    let points = points.into_iter();
    let mut dislike = 0;
    for h in hole.vertices() {
        dislike += points.clone().map(|p| squared_distance(h, p)).min()?;
    }
    Some(dislike)
}

pub fn dislike(hole: &Hole, pose: &Pose) -> i64 {
    dislike_of(hole, &pose.vertices).unwrap_or(i64::MAX)
}

/// First reason a placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("malformed problem: {0}")]
    Problem(#[from] ProblemError),

    #[error("pose has {actual} vertices, figure has {expected}")]
    VertexCount { expected: usize, actual: usize },

    #[error("vertex {index} at {point:?} is outside the hole")]
    VertexOutside { index: usize, point: Point },

    #[error("edge ({v1}, {v2}) has squared length {actual}, original {original}")]
    Stretch {
        v1: usize,
        v2: usize,
        original: i64,
        actual: i64,
    },

    #[error("edge ({v1}, {v2}) leaves the hole")]
    EdgeOutside { v1: usize, v2: usize },
}

/// Checks a complete placement against a list of `(v1, v2, original_len2)`
/// edges.
pub fn check_placement<I>(
    hole: &Hole,
    edges: I,
    epsilon: Epsilon,
    vertices: &[Point],
) -> Result<(), Violation>
where
    I: IntoIterator<Item = (usize, usize, i64)>,
{
    for (index, p) in vertices.iter().enumerate() {
        if !hole.polygon.contains(p).is_inside() {
            return Err(Violation::VertexOutside { index, point: *p });
        }
    }

    for (v1, v2, original) in edges {
        let q1 = &vertices[v1];
        let q2 = &vertices[v2];
        let actual = squared_distance(q1, q2);
        if !within_tolerance(original, actual, epsilon) {
            return Err(Violation::Stretch {
                v1,
                v2,
                original,
                actual,
            });
        }
        if !hole.polygon.is_edge_inside(q1, q2) {
            return Err(Violation::EdgeOutside { v1, v2 });
        }
    }

    Ok(())
}

pub fn validate(problem: &Problem, pose: &Pose) -> Result<(), Violation> {
    problem.validate()?;

    // The vertices in pose should match with figure.
    if problem.figure.vertices.len() != pose.vertices.len() {
        return Err(Violation::VertexCount {
            expected: problem.figure.vertices.len(),
            actual: pose.vertices.len(),
        });
    }

    let figure = &problem.figure;
    let edges = figure
        .edges
        .iter()
        .map(|e| (e.v1, e.v2, figure.original_len2(e)));
    check_placement(&problem.hole, edges, problem.tolerance(), &pose.vertices)
}

pub fn is_valid_solution(problem: &Problem, pose: &Pose) -> bool {
    match validate(problem, pose) {
        Ok(()) => true,
        Err(v) => {
            debug!("invalid solution: {}", v);
            false
        }
    }
}
