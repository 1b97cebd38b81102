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

use geom::{squared_distance, within_tolerance, Epsilon, Point};
use itertools::Itertools;

use crate::containment::ContainmentIndex;

fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as i64;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Offsets `(dx, dy)` with `dx, dy >= 0` whose squared length is within
/// `eps` of `len2`.
pub fn viable_vectors(len2: i64, eps: Epsilon) -> Vec<(i64, i64)> {
    let slack = eps.slack(len2);
    let (low2, high2) = (len2 - slack, len2 + slack);

    let mut vectors = vec![];
    let mut high = isqrt(high2);
    let mut x = 0;
    while x * x <= high2 {
        let x2 = x * x;
        // The y bound only ever shrinks as x grows.
        while high >= 0 && x2 + high * high > high2 {
            high -= 1;
        }
        let mut y = high;
        while y >= 0 && x2 + y * y >= low2 {
            if within_tolerance(len2, x2 + y * y, eps) {
                vectors.push((x, y));
            }
            y -= 1;
        }
        x += 1;
    }
    vectors
}

/// The distinct sign reflections of a first-quadrant offset.
pub fn reflections((dx, dy): (i64, i64)) -> impl Iterator<Item = (i64, i64)> {
    let xs: &'static [i64] = if dx == 0 { &[1] } else { &[1, -1] };
    let ys: &'static [i64] = if dy == 0 { &[1] } else { &[1, -1] };
    xs.iter()
        .cartesian_product(ys.iter())
        .map(move |(sx, sy)| (sx * dx, sy * dy))
}

/// Every lattice point within tolerance of `len2` around `anchor`.
pub fn viable_points(anchor: &Point, len2: i64, eps: Epsilon) -> Vec<Point> {
    viable_vectors(len2, eps)
        .into_iter()
        .flat_map(reflections)
        .map(|(dx, dy)| Point::new(anchor.x + dx, anchor.y + dy))
        .collect()
}

/// Keeps only the candidates that are also viable around `anchor`.
pub fn retain_viable(candidates: &mut Vec<Point>, anchor: &Point, len2: i64, eps: Epsilon) {
    candidates.retain(|p| within_tolerance(len2, squared_distance(anchor, p), eps));
}

/// Memoized enumeration for one solving session. Geometry never changes
/// within a session, so nothing is ever invalidated.
#[derive(Debug, Default)]
pub struct ViableCache {
    vectors: HashMap<(i64, Epsilon), Vec<(i64, i64)>>,
    points: HashMap<(Point, i64, Epsilon), Vec<Point>>,
    hits: u64,
    misses: u64,
}

impl ViableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vectors(&mut self, len2: i64, eps: Epsilon) -> &[(i64, i64)] {
        self.vectors
            .entry((len2, eps))
            .or_insert_with(|| viable_vectors(len2, eps))
    }

    /// Viable points around `anchor` that lie in the hole.
    pub fn adjacent_points(
        &mut self,
        anchor: &Point,
        len2: i64,
        eps: Epsilon,
        index: &ContainmentIndex,
    ) -> &[Point] {
        let key = (*anchor, len2, eps);
        if self.points.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            let vectors = self
                .vectors
                .entry((len2, eps))
                .or_insert_with(|| viable_vectors(len2, eps));
            let points = vectors
                .iter()
                .copied()
                .flat_map(reflections)
                .map(|(dx, dy)| Point::new(anchor.x + dx, anchor.y + dy))
                .filter(|p| index.contains(p))
                .collect_vec();
            self.points.insert(key, points);
        }
        &self.points[&key]
    }

    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Polygon;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn exact_distance_five_has_twelve_points() {
        let points = viable_points(&Point::new(0, 0), 25, Epsilon::from_ppm(0));
        let set: HashSet<_> = points.iter().copied().collect();
        assert_eq!(points.len(), 12);
        assert_eq!(set.len(), 12);
        for p in &[(5, 0), (3, 4), (4, 3), (0, -5), (-3, -4), (-4, 3)] {
            assert!(set.contains(&Point::from(*p)), "{:?}", p);
        }
        assert!(points.iter().all(|p| p.norm_sqr() == 25));
    }

    #[test]
    fn window_matches_brute_force() {
        let eps = Epsilon::from_ppm(150_000);
        let len2 = 50;
        let fast: HashSet<_> = viable_points(&Point::new(3, -2), len2, eps).into_iter().collect();
        let mut slow = HashSet::new();
        for dx in -10..=10 {
            for dy in -10..=10 {
                if within_tolerance(len2, dx * dx + dy * dy, eps) {
                    slow.insert(Point::new(3 + dx, -2 + dy));
                }
            }
        }
        assert_eq!(fast, slow);
    }

    #[test]
    fn vectors_stay_in_first_quadrant() {
        let v = viable_vectors(4, Epsilon::from_ppm(0));
        assert_eq!(v, vec![(0, 2), (2, 0)]);
        assert_eq!(reflections((0, 2)).count(), 2);
        assert_eq!(reflections((1, 1)).count(), 4);
        assert_eq!(reflections((0, 0)).collect_vec(), vec![(0, 0)]);
    }

    #[test]
    fn retain_intersects_windows() {
        let eps = Epsilon::from_ppm(0);
        let mut candidates = viable_points(&Point::new(0, 0), 25, eps);
        retain_viable(&mut candidates, &Point::new(6, 0), 25, eps);
        let set: HashSet<_> = candidates.into_iter().collect();
        let expected: HashSet<_> = vec![Point::new(3, 4), Point::new(3, -4)].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn cache_filters_by_hole_and_memoizes() {
        let hole = Polygon::from(vec![(0, 0), (0, 10), (10, 10), (10, 0)]);
        let index = ContainmentIndex::new(&hole, &mut SmallRng::seed_from_u64(1));
        let mut cache = ViableCache::new();
        let eps = Epsilon::from_ppm(0);

        let first = cache.adjacent_points(&Point::new(0, 0), 25, eps, &index).to_vec();
        let first_set: HashSet<_> = first.iter().copied().collect();
        let expected: HashSet<_> = vec![(0, 5), (3, 4), (4, 3), (5, 0)]
            .into_iter()
            .map(Point::from)
            .collect();
        assert_eq!(first_set, expected);

        let again = cache.adjacent_points(&Point::new(0, 0), 25, eps, &index).to_vec();
        assert_eq!(first, again);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.vectors(25, eps).len(), 4);
    }
}
