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

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Wall-clock budget for the whole search, in seconds.
    pub time_limit: f64,
    /// An attempt that has not reached a deeper level (or improved the best
    /// score) for this many seconds is abandoned.
    pub stall_timeout: f64,
    pub seed: u64,
    /// Check candidate edges with full sampled containment instead of the
    /// lattice-membership shortcut.
    pub strict_edges: bool,
    /// Only start on hole vertices whose adjacent hole edges match an edge
    /// length of the starting figure vertex.
    pub len_matching: bool,
    /// After the hole vertices, also start on interior lattice points.
    pub start_from_interior: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_limit: 60.0,
            stall_timeout: 10.0,
            seed: 0,
            strict_edges: false,
            len_matching: false,
            start_from_interior: false,
        }
    }
}

impl SearchOptions {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit.max(0.))
    }

    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.stall_timeout.max(0.))
    }
}
