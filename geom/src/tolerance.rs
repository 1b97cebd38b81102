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

pub const PPM: i64 = 1_000_000;

/// Allowed relative deviation of a squared edge length, in parts per million.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Epsilon(i64);

impl Epsilon {
    pub const fn from_ppm(ppm: i64) -> Self {
        Epsilon(ppm)
    }

    pub fn from_fraction(eps: f64) -> Self {
        Epsilon((eps * PPM as f64).round() as i64)
    }

    pub fn ppm(self) -> i64 {
        self.0
    }

    pub fn as_fraction(self) -> f64 {
        self.0 as f64 / PPM as f64
    }

    /// Largest `|new_sq - orig_sq|` still within tolerance.
    pub fn slack(self, orig_sq: i64) -> i64 {
        self.0 * orig_sq / PPM
    }
}

// |new / orig - 1| <= eps
//   <=> |new - orig| * 1000000 <= ppm * orig   (orig > 0)
pub fn within_tolerance(orig_sq: i64, new_sq: i64, eps: Epsilon) -> bool {
    debug_assert!(orig_sq > 0, "zero-length original edge");
    (new_sq - orig_sq).abs() * PPM <= eps.ppm() * orig_sq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_round_trips_through_ppm() {
        assert_eq!(Epsilon::from_fraction(0.02).ppm(), 20_000);
        assert_eq!(Epsilon::from_ppm(150_000).as_fraction(), 0.15);
    }

    #[test]
    fn concrete_tolerance_values() {
        assert!(within_tolerance(100, 101, Epsilon::from_fraction(0.02)));
        assert!(!within_tolerance(100, 101, Epsilon::from_fraction(0.001)));
        assert!(within_tolerance(4, 4, Epsilon::from_ppm(0)));
        assert!(!within_tolerance(4, 5, Epsilon::from_ppm(0)));
    }

    #[test]
    fn boundary_is_inclusive() {
        // 10% of 100 is exactly 10.
        let eps = Epsilon::from_ppm(100_000);
        assert!(within_tolerance(100, 110, eps));
        assert!(within_tolerance(100, 90, eps));
        assert!(!within_tolerance(100, 111, eps));
        assert_eq!(eps.slack(100), 10);
    }

    #[test]
    fn symmetry_is_only_approximate() {
        let eps = Epsilon::from_ppm(100_000);
        assert!(within_tolerance(110, 100, eps));
        // |100/111 - 1| = 0.099 passes while |111/100 - 1| = 0.11 fails.
        assert!(within_tolerance(111, 100, eps));
        assert!(!within_tolerance(100, 111, eps));
    }
}
