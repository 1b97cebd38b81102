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

use geom::schema::{Pose, Problem};
use geom::{squared_distance, within_tolerance, Epsilon, Point};
use itertools::Itertools;
use log::debug;

use crate::figure::FigureGraph;

pub const REPAIR_PASSES: usize = 10;

const NUDGES: [i64; 3] = [0, 1, -1];

/// Nudges endpoints of over- or under-stretched edges by one unit until the
/// edges fit, for at most `REPAIR_PASSES` passes. Vertices are only moved to
/// lattice points inside the hole, and a move must reduce the number of
/// broken edges at the moved vertex.
pub fn repair(problem: &Problem, graph: &FigureGraph, pose: &Pose) -> Pose {
    let eps = problem.tolerance();
    let mut vertices = pose.vertices.clone();
    if vertices.len() != graph.len() {
        return Pose { vertices };
    }

    for pass in 0..REPAIR_PASSES {
        let broken = graph
            .edges()
            .iter()
            .filter(|e| {
                let actual = squared_distance(&vertices[e.v1], &vertices[e.v2]);
                !within_tolerance(e.len2, actual, eps)
            })
            .copied()
            .collect_vec();
        debug!("repair pass {}: {} broken edges", pass, broken.len());
        if broken.is_empty() {
            break;
        }
        for e in broken {
            let actual = squared_distance(&vertices[e.v1], &vertices[e.v2]);
            if within_tolerance(e.len2, actual, eps) {
                continue;
            }
            if !nudge(problem, graph, eps, &mut vertices, e.v1) {
                nudge(problem, graph, eps, &mut vertices, e.v2);
            }
        }
    }
    Pose { vertices }
}

fn broken_at(
    graph: &FigureGraph,
    eps: Epsilon,
    vertices: &[Point],
    v: usize,
    at: &Point,
) -> usize {
    graph
        .neighbors(v)
        .iter()
        .filter(|&&(u, len2)| !within_tolerance(len2, squared_distance(at, &vertices[u]), eps))
        .count()
}

fn nudge(
    problem: &Problem,
    graph: &FigureGraph,
    eps: Epsilon,
    vertices: &mut [Point],
    v: usize,
) -> bool {
    let current = vertices[v];
    let before = broken_at(graph, eps, vertices, v, &current);
    for (&dx, &dy) in NUDGES.iter().cartesian_product(NUDGES.iter()) {
        if dx == 0 && dy == 0 {
            continue;
        }
        let moved = current + Point::new(dx, dy);
        if vertices.contains(&moved) || !problem.hole.polygon.contains(&moved).is_inside() {
            continue;
        }
        if broken_at(graph, eps, vertices, v, &moved) < before {
            debug!("moving vertex {} from {:?} to {:?}", v, current, moved);
            vertices[v] = moved;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::schema::{Edge, Figure};

    #[test]
    fn fixes_one_unit_distortion() {
        let corners = vec![(1, 1), (1, 3), (3, 3), (3, 1)];
        let problem = Problem {
            hole: vec![(0, 0), (0, 10), (10, 10), (10, 0)].into(),
            figure: Figure {
                vertices: corners.iter().copied().map(Point::from).collect(),
                edges: vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 0)],
            },
            epsilon: 0,
        };
        let graph = FigureGraph::from_problem(&problem).unwrap();
        let distorted = Pose {
            vertices: vec![
                Point::new(1, 1),
                Point::new(1, 3),
                Point::new(4, 3),
                Point::new(3, 1),
            ],
        };
        assert!(!scorer::is_valid_solution(&problem, &distorted));

        let fixed = repair(&problem, &graph, &distorted);
        assert!(scorer::is_valid_solution(&problem, &fixed));
        assert_eq!(fixed.vertices[2], Point::new(3, 3));
    }

    #[test]
    fn valid_pose_is_untouched() {
        let corners = vec![(0, 0), (0, 2), (2, 2), (2, 0)];
        let problem = Problem {
            hole: corners.clone().into(),
            figure: Figure {
                vertices: corners.iter().copied().map(Point::from).collect(),
                edges: vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 0)],
            },
            epsilon: 0,
        };
        let graph = FigureGraph::from_problem(&problem).unwrap();
        let pose = Pose {
            vertices: problem.figure.vertices.clone(),
        };
        assert_eq!(repair(&problem, &graph, &pose), pose);
    }
}
