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

use anyhow::{bail, Result};
use geom::schema;
use log::info;
use serde_json::json;
use std::env;

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: {} <problem> <pose> [json]", args[0]);
    }

    let problem = schema::parse_problem(&args[1])?;
    problem.validate()?;
    let pose = schema::parse_pose(&args[2])?;
    let score = scorer::dislike(&problem.hole, &pose);
    let verdict = scorer::validate(&problem, &pose);
    if args.len() == 4 && args[3] == "json" {
        println!(
            "{}",
            json!({ "dislike": score, "is_valid": verdict.is_ok() })
        );
    } else {
        info!("Problem {:?}", problem);
        info!("Solution {:?}", pose);
        eprintln!("dislike = {:?}", score);
        match verdict {
            Ok(()) => eprintln!("is_valid = true"),
            Err(v) => eprintln!("is_valid = false ({})", v),
        }
    }
    Ok(())
}
