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

use geom::{Point, Polygon, EDGE_SAMPLES};

use crate::containment::ContainmentIndex;

/// Decides whether a candidate edge stays inside the hole.
#[derive(Debug, Clone)]
pub struct EdgeOracle {
    hole: Polygon,
    doubled: Polygon,
    index: ContainmentIndex,
}

impl EdgeOracle {
    pub fn new(hole: Polygon, index: ContainmentIndex) -> Self {
        Self {
            doubled: hole.scaled(2),
            hole,
            index,
        }
    }

    pub fn hole(&self) -> &Polygon {
        &self.hole
    }

    pub fn index(&self) -> &ContainmentIndex {
        &self.index
    }

    /// Full sampled check; see `Polygon::is_edge_inside`.
    pub fn is_edge_inside(&self, a: &Point, b: &Point) -> bool {
        self.hole.is_edge_inside(a, b)
    }

    /// Cheap check for the inner search loop. Samples that land on lattice
    /// points are looked up in the index, the midpoint is tested exactly
    /// against the doubled hole, and no boundary edge may be crossed.
    pub fn is_edge_inside_fast(&self, a: &Point, b: &Point) -> bool {
        if !self.index.contains(a) || !self.index.contains(b) {
            return false;
        }
        let n = EDGE_SAMPLES as i64;
        for k in 1..n {
            let scaled = *a * (n - k) + *b * k;
            if scaled.x % n == 0 && scaled.y % n == 0 {
                let sample = Point::new(scaled.x / n, scaled.y / n);
                if !self.index.contains(&sample) {
                    return false;
                }
            }
        }
        if !self.doubled.contains(&(*a + *b)).is_inside() {
            return false;
        }
        !self.hole.crosses_boundary(a, b)
    }
}
