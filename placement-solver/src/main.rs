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

use anyhow::{anyhow, Result};
use chrono::{Datelike, Timelike};
use geom::schema::{parse_pose, parse_problem, write_pose};
use log::info;
use placement_solver::containment::ContainmentIndex;
use placement_solver::repair::repair as repair_pose;
use placement_solver::{FigureGraph, FileSink, NoSink, Placer, SearchOptions};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;

fn problem_id(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("{} is not a valid problem filename", path.display()))
}

fn result_filename(problem_id: &str, dislike: i64) -> String {
    let now = chrono::Local::now();
    format!(
        "results/{}-{}-{:02}{:02}{:02}{:02}.json",
        problem_id,
        dislike,
        now.date().day(),
        now.time().hour(),
        now.time().minute(),
        now.time().second(),
    )
}

#[argopt::subcmd]
fn solve(
    /// time limit in seconds
    #[opt(long, default_value = "60.0")]
    time_limit: f64,

    /// abandon an attempt after this many seconds without getting deeper
    #[opt(long, default_value = "10.0")]
    stall_timeout: f64,

    #[opt(long, default_value = "0")]
    seed: u64,

    /// pose to keep as much of as possible
    #[opt(long)]
    init_state: Option<PathBuf>,

    /// write every improvement here (only if better than what is stored)
    #[opt(long)]
    output: Option<PathBuf>,

    /// check candidate edges with full sampling
    #[opt(long)]
    strict_edges: bool,

    #[opt(long)]
    len_matching: bool,

    #[opt(long)]
    start_from_interior: bool,

    /// write the deepest partial placement here
    #[opt(long)]
    dump_partial: Option<PathBuf>,

    problem: PathBuf,
) -> Result<()> {
    env_logger::init();

    let problem_id = problem_id(&problem)?;
    let problem = parse_problem(&problem)?;
    let init_state = init_state.map(parse_pose).transpose()?;

    let options = SearchOptions {
        time_limit,
        stall_timeout,
        seed,
        strict_edges,
        len_matching,
        start_from_interior,
    };
    info!("options: {}", serde_json::to_string(&options)?);
    let mut placer = Placer::from_problem(&problem, options)?;
    let outcome = match &output {
        Some(path) => {
            let mut sink = FileSink::new(path, problem.clone());
            placer.run(init_state.as_ref(), &mut sink)
        }
        None => placer.run(init_state.as_ref(), &mut NoSink),
    };

    if let (Some(path), Some(partial)) = (&dump_partial, &outcome.partial) {
        write_pose(path, partial)?;
        info!("deepest partial written to {}", path.display());
    }

    let (dislike, pose) = match outcome.best {
        Some(best) => best,
        None => {
            eprintln!("Cannot find solution ({:?})", outcome.reason);
            return Ok(());
        }
    };

    eprintln!("Dislike for problem {}: {}", problem_id, dislike);
    println!("{}", serde_json::to_string(&pose)?);

    if output.is_none() {
        if !Path::new("results").exists() {
            fs::create_dir_all("results")?;
        }
        let filename = result_filename(&problem_id, dislike);
        write_pose(&filename, &pose)?;
        eprintln!("Wrote {}", filename);
    }

    Ok(())
}

#[argopt::subcmd]
fn score(problem: PathBuf, pose: PathBuf) -> Result<()> {
    env_logger::init();

    let problem = parse_problem(problem)?;
    problem.validate()?;
    let pose = parse_pose(pose)?;
    let violation = scorer::validate(&problem, &pose).err();
    println!(
        "{}",
        json!({
            "dislike": scorer::dislike(&problem.hole, &pose),
            "is_valid": violation.is_none(),
            "violation": violation.map(|v| v.to_string()),
        })
    );
    Ok(())
}

#[argopt::subcmd]
fn repair(
    /// where to write the repaired pose (stdout if omitted)
    #[opt(long)]
    output: Option<PathBuf>,

    problem: PathBuf,
    pose: PathBuf,
) -> Result<()> {
    env_logger::init();

    let problem = parse_problem(problem)?;
    let graph = FigureGraph::from_problem(&problem)?;
    let pose = parse_pose(pose)?;

    let repaired = repair_pose(&problem, &graph, &pose);
    match scorer::validate(&problem, &repaired) {
        Ok(()) => eprintln!(
            "Repaired pose is valid, dislike = {}",
            scorer::dislike(&problem.hole, &repaired)
        ),
        Err(v) => eprintln!("Repaired pose is still invalid: {}", v),
    }

    match output {
        Some(path) => write_pose(path, &repaired)?,
        None => println!("{}", serde_json::to_string(&repaired)?),
    }
    Ok(())
}

#[argopt::subcmd]
fn info(problem: PathBuf) -> Result<()> {
    env_logger::init();

    let problem_id = problem_id(&problem)?;
    let problem = parse_problem(&problem)?;
    problem.validate()?;
    let index = ContainmentIndex::new(&problem.hole.polygon, &mut SmallRng::seed_from_u64(0));

    println!("Problem {}:", problem_id);
    println!("  * hole vertices:   {}", problem.hole.vertices().len());
    println!("  * lattice points:  {}", index.len());
    println!("  * figure vertices: {}", problem.figure.vertices.len());
    println!("  * figure edges:    {}", problem.figure.edges.len());
    println!(
        "  * epsilon:         {:.2}%",
        problem.tolerance().as_fraction() * 100.0
    );
    Ok(())
}

#[argopt::cmd_group(commands = [solve, score, repair, info])]
fn main() -> Result<()> {}
