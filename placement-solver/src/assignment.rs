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

use std::collections::HashMap;

use geom::schema::Pose;
use geom::{squared_distance, within_tolerance, Epsilon, Point};

use crate::figure::FigureGraph;
use crate::oracle::EdgeOracle;

/// Partial placement of figure vertices.
///
/// Vertices are placed and unplaced in stack order along `order`; vertices
/// fixed up front (a seed pose) sit outside the order. Invariants: no two
/// vertices share a point, and every edge between placed vertices has been
/// checked by the caller before placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    vertices: Vec<Option<Point>>,
    occupied: HashMap<Point, usize>,
    order: Vec<usize>,
    cursor: usize,
}

impl Assignment {
    pub fn new(n: usize) -> Self {
        Self {
            vertices: vec![None; n],
            occupied: HashMap::new(),
            order: vec![],
            cursor: 0,
        }
    }

    /// Keeps the vertices of `pose` that are inside the hole and consistent
    /// with the ones kept before them; everything else is left unplaced.
    pub fn seeded(pose: &Pose, graph: &FigureGraph, oracle: &EdgeOracle, eps: Epsilon) -> Self {
        let mut seeded = Self::new(graph.len());
        for (v, p) in pose.vertices.iter().enumerate().take(graph.len()) {
            if !oracle.index().contains(p) || seeded.is_occupied(p) {
                continue;
            }
            let consistent = graph.neighbors(v).iter().all(|&(u, len2)| match seeded.get(u) {
                None => true,
                Some(q) => {
                    within_tolerance(len2, squared_distance(&q, p), eps)
                        && oracle.is_edge_inside(&q, p)
                }
            });
            if consistent {
                seeded.fix(v, *p);
            }
        }
        seeded
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn placed_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_complete(&self) -> bool {
        self.placed_count() == self.len()
    }

    pub fn get(&self, v: usize) -> Option<Point> {
        self.vertices[v]
    }

    pub fn is_placed(&self, v: usize) -> bool {
        self.vertices[v].is_some()
    }

    pub fn is_occupied(&self, p: &Point) -> bool {
        self.occupied.contains_key(p)
    }

    pub fn placed_mask(&self) -> Vec<bool> {
        self.vertices.iter().map(Option::is_some).collect()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> + Clone + '_ {
        self.vertices.iter().flatten()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Number of vertices placed along the current order.
    pub fn depth(&self) -> usize {
        self.cursor
    }

    pub fn next_vertex(&self) -> Option<usize> {
        self.order.get(self.cursor).copied()
    }

    /// Replaces the placement order. Only valid between attempts.
    pub fn set_order(&mut self, order: Vec<usize>) {
        debug_assert_eq!(self.cursor, 0);
        debug_assert!(order.iter().all(|&v| !self.is_placed(v)));
        self.order = order;
    }

    /// Places a vertex outside the order. Returns false if the point is taken.
    pub fn fix(&mut self, v: usize, p: Point) -> bool {
        debug_assert!(!self.is_placed(v));
        if self.is_occupied(&p) {
            return false;
        }
        self.vertices[v] = Some(p);
        self.occupied.insert(p, v);
        true
    }

    /// Places the next vertex of the order at `p`.
    pub fn place(&mut self, v: usize, p: Point) {
        debug_assert_eq!(self.next_vertex(), Some(v));
        debug_assert!(!self.is_occupied(&p));
        self.vertices[v] = Some(p);
        self.occupied.insert(p, v);
        self.cursor += 1;
    }

    /// Undoes the most recent `place`, which must have been for `v`.
    pub fn unplace(&mut self, v: usize) -> Option<Point> {
        debug_assert!(self.cursor > 0 && self.order[self.cursor - 1] == v);
        let p = self.vertices[v].take()?;
        self.occupied.remove(&p);
        self.cursor -= 1;
        Some(p)
    }

    pub fn to_pose(&self) -> Option<Pose> {
        let vertices = self.vertices.iter().copied().collect::<Option<Vec<_>>>()?;
        Some(Pose { vertices })
    }

    /// Pose with unplaced vertices at the origin. For debugging dumps only.
    pub fn to_partial_pose(&self) -> Pose {
        Pose {
            vertices: self.vertices.iter().map(|p| p.unwrap_or_default()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containment::ContainmentIndex;
    use geom::Polygon;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn place_then_unplace_is_identity() {
        let mut a = Assignment::new(3);
        a.set_order(vec![2, 0, 1]);
        a.place(2, Point::new(1, 1));
        let before = a.clone();

        a.place(0, Point::new(3, 1));
        assert_eq!(a.depth(), 2);
        assert!(a.is_occupied(&Point::new(3, 1)));
        assert_eq!(a.unplace(0), Some(Point::new(3, 1)));

        assert_eq!(a, before);
        assert_eq!(a.next_vertex(), Some(0));
    }

    #[test]
    fn complete_assignment_becomes_pose() {
        let mut a = Assignment::new(2);
        a.set_order(vec![0, 1]);
        a.place(0, Point::new(0, 0));
        assert_eq!(a.to_pose(), None);
        assert_eq!(a.to_partial_pose().vertices, vec![Point::new(0, 0), Point::new(0, 0)]);
        a.place(1, Point::new(2, 0));
        assert!(a.is_complete());
        assert_eq!(
            a.to_pose().unwrap().vertices,
            vec![Point::new(0, 0), Point::new(2, 0)]
        );
        assert_eq!(a.points().count(), 2);
    }

    #[test]
    fn fix_refuses_taken_points() {
        let mut a = Assignment::new(2);
        assert!(a.fix(0, Point::new(1, 1)));
        assert!(!a.fix(1, Point::new(1, 1)));
        assert_eq!(a.placed_mask(), vec![true, false]);
    }

    #[test]
    fn seeding_drops_outside_and_inconsistent_vertices() {
        let hole = Polygon::from(vec![(0, 0), (0, 4), (4, 4), (4, 0)]);
        let index = ContainmentIndex::new(&hole, &mut SmallRng::seed_from_u64(0));
        let oracle = EdgeOracle::new(hole, index);
        let graph = FigureGraph::from_edges(4, &[(0, 1, 4), (1, 2, 4), (2, 3, 4)]).unwrap();
        let pose = Pose {
            vertices: vec![
                Point::new(0, 0),
                Point::new(0, 2),
                // Too far from vertex 1.
                Point::new(3, 3),
                // Outside the hole.
                Point::new(5, 0),
            ],
        };
        let a = Assignment::seeded(&pose, &graph, &oracle, Epsilon::from_ppm(0));
        assert_eq!(a.placed_mask(), vec![true, true, false, false]);
        assert_eq!(a.get(1), Some(Point::new(0, 2)));
        assert_eq!(a.depth(), 0);
    }
}
