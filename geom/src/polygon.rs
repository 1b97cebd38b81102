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

use serde::{Deserialize, Serialize};

use super::point::{point_average, Point, PointF};
use super::segments_strictly_intersect;

/// Number of intervals an edge is cut into by `Polygon::is_edge_inside`.
pub const EDGE_SAMPLES: usize = 10;

const JITTER: f64 = 1e-6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "Vec<(i64, i64)>", into = "Vec<(i64, i64)>")]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl From<Vec<(i64, i64)>> for Polygon {
    fn from(t: Vec<(i64, i64)>) -> Self {
        Polygon::new(t.into_iter().map(Point::from).collect())
    }
}

impl From<Polygon> for Vec<(i64, i64)> {
    fn from(t: Polygon) -> Self {
        t.vertices.into_iter().map(<(i64, i64)>::from).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainsResult {
    OUT, ON, IN,
}

impl ContainsResult {
    pub fn is_inside(self) -> bool {
        self != ContainsResult::OUT
    }
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self{vertices}
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Boundary edges, closing the loop from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    /// Integer bounding box as (min corner, max corner).
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Every coordinate multiplied by `k`. Testing `a + b` against the hole
    /// scaled by 2 is an exact midpoint test.
    pub fn scaled(&self, k: i64) -> Polygon {
        Polygon::new(self.vertices.iter().map(|v| *v * k).collect())
    }

    pub fn contains(&self, p: &Point) -> ContainsResult {
        let mut inside = false;
        for (curr, next) in self.edges() {
            let mut a = *curr - *p;
            let mut b = *next - *p;
            if a.y > b.y {
                std::mem::swap(&mut a, &mut b);
            }
            let c = Point::cross(a, b);
            if a.y <= 0 && 0 < b.y && c < 0 { inside = !inside; }
            else if c == 0 && Point::dot(a, b) <= 0 { return ContainsResult::ON; }
        }
        if inside {
            ContainsResult::IN
        } else {
            ContainsResult::OUT
        }
    }

    pub fn contains_f(&self, p: &PointF) -> ContainsResult {
        let mut inside = false;
        for (curr, next) in self.edges() {
            let mut a = curr.to_f64() - *p;
            let mut b = next.to_f64() - *p;
            if a.y > b.y {
                std::mem::swap(&mut a, &mut b);
            }
            let c = PointF::cross(a, b);
            if a.y <= 0. && 0. < b.y && c < 0. { inside = !inside; }
            else if c == 0. && PointF::dot(a, b) <= 0. { return ContainsResult::ON; }
        }
        if inside {
            ContainsResult::IN
        } else {
            ContainsResult::OUT
        }
    }

    // A sample sitting on the boundary is accepted when any diagonal nudge
    // lands strictly inside.
    fn contains_jittered(&self, p: &PointF) -> bool {
        [(1., 1.), (1., -1.), (-1., 1.), (-1., -1.)]
            .iter()
            .any(|(sx, sy)| {
                let q = PointF::new(p.x + sx * JITTER, p.y + sy * JITTER);
                self.contains_f(&q) == ContainsResult::IN
            })
    }

    /// True iff `a`-`b` properly crosses some boundary edge.
    pub fn crosses_boundary(&self, a: &Point, b: &Point) -> bool {
        self.edges()
            .any(|(h1, h2)| segments_strictly_intersect(h1, h2, a, b))
    }

    /// Sampled containment of segment `a`-`b`: all `EDGE_SAMPLES + 1` evenly
    /// spaced samples must be inside, and no boundary edge may be crossed.
    /// A segment that leaves the hole between two samples without crossing
    /// an edge properly is not detected.
    pub fn is_edge_inside(&self, a: &Point, b: &Point) -> bool {
        let samples_inside = (0..=EDGE_SAMPLES).all(|k| {
            let s = point_average(a, b, k as f64 / EDGE_SAMPLES as f64);
            self.contains_jittered(&s)
        });
        samples_inside && !self.crosses_boundary(a, b)
    }

    pub fn distance_to_boundary(&self, p: &Point) -> f64 {
        let p = p.to_f64();
        self.edges()
            .map(|(h1, h2)| distance_to_segment(&p, &h1.to_f64(), &h2.to_f64()))
            .fold(f64::INFINITY, f64::min)
    }
}

fn distance_to_segment(p: &PointF, a: &PointF, b: &PointF) -> f64 {
    let ab = *b - *a;
    let len2 = ab.norm_sqr();
    if len2 == 0. {
        return (*p - *a).norm_sqr().sqrt();
    }
    let t = (PointF::dot(*p - *a, ab) / len2).max(0.).min(1.);
    let proj = *a + ab * t;
    (*p - proj).norm_sqr().sqrt()
}
