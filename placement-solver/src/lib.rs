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

pub mod assignment;
pub mod config;
pub mod containment;
pub mod figure;
pub mod oracle;
pub mod order;
pub mod repair;
pub mod search;
pub mod sink;
pub mod viable;

use anyhow::Result;
use geom::schema::{Pose, Problem};

pub use config::SearchOptions;
pub use figure::FigureGraph;
pub use search::{Placer, SearchOutcome, StopReason};
pub use sink::{FileSink, NoSink, SolutionSink};

/// Validates `problem` and runs one search over it.
pub fn solve(
    problem: &Problem,
    options: SearchOptions,
    init_state: Option<&Pose>,
    sink: &mut dyn SolutionSink,
) -> Result<SearchOutcome> {
    let mut placer = Placer::from_problem(problem, options)?;
    Ok(placer.run(init_state, sink))
}
