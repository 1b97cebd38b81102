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

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use geom::schema::{parse_pose, write_pose, Pose, Problem};
use log::{debug, info};

/// Receives every solution that improves on the best one so far.
pub trait SolutionSink {
    fn improved(&mut self, pose: &Pose, dislike: i64) -> Result<()>;
}

pub struct NoSink;

impl SolutionSink for NoSink {
    fn improved(&mut self, _pose: &Pose, _dislike: i64) -> Result<()> {
        Ok(())
    }
}

impl<F> SolutionSink for F
where
    F: FnMut(&Pose, i64) -> Result<()>,
{
    fn improved(&mut self, pose: &Pose, dislike: i64) -> Result<()> {
        self(pose, dislike)
    }
}

/// Writes improvements to a JSON file, unless the file already holds a valid
/// pose that scores at least as well.
pub struct FileSink {
    path: PathBuf,
    problem: Problem,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P, problem: Problem) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            problem,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Score of the pose currently stored, if it is readable and valid.
    pub fn stored_dislike(&self) -> Option<i64> {
        if !self.path.exists() {
            return None;
        }
        let stored = match parse_pose(&self.path) {
            Ok(pose) => pose,
            Err(e) => {
                debug!("ignoring unreadable {}: {:#}", self.path.display(), e);
                return None;
            }
        };
        if !scorer::is_valid_solution(&self.problem, &stored) {
            return None;
        }
        Some(scorer::dislike(&self.problem.hole, &stored))
    }
}

impl SolutionSink for FileSink {
    fn improved(&mut self, pose: &Pose, dislike: i64) -> Result<()> {
        if let Some(stored) = self.stored_dislike() {
            if stored <= dislike {
                info!(
                    "keeping {} (dislike {} <= {})",
                    self.path.display(),
                    stored,
                    dislike
                );
                return Ok(());
            }
        }
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        write_pose(&self.path, pose)?;
        info!("wrote {} (dislike {})", self.path.display(), dislike);
        Ok(())
    }
}
