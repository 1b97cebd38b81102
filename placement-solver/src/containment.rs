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

use std::collections::HashSet;

use geom::{Point, Polygon};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

/// Every lattice point inside or on the hole.
#[derive(Debug, Clone)]
pub struct ContainmentIndex {
    inside: HashSet<Point>,
    // Ascending distance to the boundary; the innermost points come last.
    by_depth: Vec<Point>,
}

impl ContainmentIndex {
    pub fn new(hole: &Polygon, rng: &mut impl Rng) -> Self {
        let (lo, hi) = match hole.bounding_box() {
            Some(bb) => bb,
            None => {
                return Self {
                    inside: HashSet::new(),
                    by_depth: vec![],
                }
            }
        };

        let mut points = (lo.x..=hi.x)
            .cartesian_product(lo.y..=hi.y)
            .map(|(x, y)| Point::new(x, y))
            .filter(|p| hole.contains(p).is_inside())
            .collect_vec();

        // Shuffle first so that equally deep points come out in seeded
        // random order from the stable sort.
        points.shuffle(rng);
        let mut keyed = points
            .into_iter()
            .map(|p| (hole.distance_to_boundary(&p), p))
            .collect_vec();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let by_depth = keyed.into_iter().map(|(_, p)| p).collect_vec();

        Self {
            inside: by_depth.iter().copied().collect(),
            by_depth,
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.inside.contains(p)
    }

    pub fn len(&self) -> usize {
        self.by_depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_depth.is_empty()
    }

    /// Inside points, boundary-adjacent first.
    pub fn by_depth(&self) -> &[Point] {
        &self.by_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn index(hole: &Polygon) -> ContainmentIndex {
        ContainmentIndex::new(hole, &mut SmallRng::seed_from_u64(7))
    }

    #[test]
    fn square_has_all_lattice_points() {
        let hole = Polygon::from(vec![(0, 0), (0, 3), (3, 3), (3, 0)]);
        let idx = index(&hole);
        assert_eq!(idx.len(), 16);
        assert!(idx.contains(&Point::new(0, 0)));
        assert!(idx.contains(&Point::new(2, 1)));
        assert!(!idx.contains(&Point::new(4, 0)));
    }

    #[test]
    fn never_contains_points_outside_bounding_box() {
        let hole = Polygon::from(vec![(1, 1), (2, 6), (5, 4), (3, 3), (6, 1)]);
        let idx = index(&hole);
        let (lo, hi) = hole.bounding_box().unwrap();
        for x in lo.x - 3..=hi.x + 3 {
            for y in lo.y - 3..=hi.y + 3 {
                let p = Point::new(x, y);
                if x < lo.x || x > hi.x || y < lo.y || y > hi.y {
                    assert!(!idx.contains(&p), "{:?}", p);
                }
            }
        }
        assert!(idx.by_depth().iter().all(|p| hole.contains(p).is_inside()));
    }

    #[test]
    fn boundary_points_come_first() {
        let hole = Polygon::from(vec![(0, 0), (0, 4), (4, 4), (4, 0)]);
        let idx = index(&hole);
        let depths = idx
            .by_depth()
            .iter()
            .map(|p| hole.distance_to_boundary(p))
            .collect_vec();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(idx.by_depth().last(), Some(&Point::new(2, 2)));
        assert_eq!(depths[0], 0.);
    }

    #[test]
    fn same_seed_same_order() {
        let hole = Polygon::from(vec![(0, 0), (0, 5), (5, 5), (5, 0)]);
        assert_eq!(index(&hole).by_depth(), index(&hole).by_depth());
    }
}
