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

pub mod point;
pub mod polygon;
pub mod schema;
pub mod tolerance;

pub use point::*;
pub use polygon::*;
pub use tolerance::*;

/// True iff a -> b -> c turns counter-clockwise. Collinear triples are
/// `false` in every order.
pub fn ccw(a: &Point, b: &Point, c: &Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

// Returns true iff a-b properly crosses c-d. Segments sharing an endpoint
// never cross. Collinear overlaps are not detected.
pub fn segments_strictly_intersect(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    if a == c || a == d || b == c || b == d {
        return false;
    }
    ccw(a, c, d) != ccw(b, c, d)
        && ccw(a, d, c) != ccw(b, d, c)
        && ccw(a, b, c) != ccw(a, b, d)
        && ccw(a, c, b) != ccw(a, d, b)
}
