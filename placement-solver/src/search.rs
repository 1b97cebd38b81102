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

use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use geom::schema::{Hole, Pose, Problem, ProblemError};
use geom::{squared_distance, within_tolerance, Epsilon, Point};
use itertools::Itertools;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::assignment::Assignment;
use crate::config::SearchOptions;
use crate::containment::ContainmentIndex;
use crate::figure::FigureGraph;
use crate::oracle::EdgeOracle;
use crate::order::{placement_order, start_vertices};
use crate::sink::SolutionSink;
use crate::viable::{retain_viable, ViableCache};

/// Hole vertices not yet taken are always tried before anything else.
const HOLE_VERTEX_BONUS: i64 = 1 << 40;

/// Nodes between clock reads.
const CLOCK_INTERVAL: u64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every attempt ran to completion or was abandoned.
    Exhausted,
    /// A solution with zero dislikes was found.
    Perfect,
    TimeLimit,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Option<(i64, Pose)>,
    pub reason: StopReason,
    pub attempts: usize,
    pub restarts: usize,
    pub nodes: u64,
    /// Deepest partial assignment seen, unplaced vertices at the origin.
    pub partial: Option<Pose>,
}

/// Why the current attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Exhausted,
    Perfect,
    Timeout,
    Stalled,
}

/// One choice point of the depth-first search.
struct Frame {
    vertex: usize,
    candidates: Vec<Point>,
    cursor: usize,
    placed: bool,
}

impl Frame {
    fn new(vertex: usize, candidates: Vec<Point>) -> Self {
        Self {
            vertex,
            candidates,
            cursor: 0,
            placed: false,
        }
    }
}

struct Watchdog {
    deepest: usize,
    last_progress: Instant,
    limit: Duration,
}

impl Watchdog {
    fn new(now: Instant, limit: Duration) -> Self {
        Self {
            deepest: 0,
            last_progress: now,
            limit,
        }
    }

    fn reached(&mut self, depth: usize, now: Instant) {
        if depth > self.deepest {
            self.deepest = depth;
            self.last_progress = now;
        }
    }

    fn reset(&mut self, now: Instant) {
        self.last_progress = now;
    }

    fn stalled(&self, now: Instant) -> bool {
        now.duration_since(self.last_progress) > self.limit
    }
}

pub struct Placer {
    hole: Hole,
    graph: FigureGraph,
    eps: Epsilon,
    oracle: EdgeOracle,
    cache: ViableCache,
    hole_vertices: HashSet<Point>,
    options: SearchOptions,

    best: Option<(i64, Pose)>,
    deepest: Option<(usize, Pose)>,
    nodes: u64,
    deadline: Instant,
}

impl Placer {
    pub fn new(hole: Hole, graph: FigureGraph, eps: Epsilon, options: SearchOptions) -> Self {
        let mut rng = SmallRng::seed_from_u64(options.seed);
        let index = ContainmentIndex::new(&hole.polygon, &mut rng);
        info!(
            "{} lattice points in hole, {} vertices, {} edges",
            index.len(),
            graph.len(),
            graph.edges().len()
        );
        Self {
            hole_vertices: hole.vertices().iter().copied().collect(),
            oracle: EdgeOracle::new(hole.polygon.clone(), index),
            hole,
            graph,
            eps,
            cache: ViableCache::new(),
            options,
            best: None,
            deepest: None,
            nodes: 0,
            deadline: Instant::now(),
        }
    }

    pub fn from_problem(problem: &Problem, options: SearchOptions) -> Result<Self, ProblemError> {
        let graph = FigureGraph::from_problem(problem)?;
        Ok(Self::new(
            problem.hole.clone(),
            graph,
            problem.tolerance(),
            options,
        ))
    }

    pub fn graph(&self) -> &FigureGraph {
        &self.graph
    }

    pub fn oracle(&self) -> &EdgeOracle {
        &self.oracle
    }

    pub fn cache(&self) -> &ViableCache {
        &self.cache
    }

    /// Searches until every checkpoint is exhausted, a perfect solution is
    /// found or the time limit passes. With `seed`, the consistent part of
    /// that pose is kept and a single attempt completes the rest.
    pub fn run(&mut self, seed: Option<&Pose>, sink: &mut dyn SolutionSink) -> SearchOutcome {
        let started = Instant::now();
        self.deadline = started + self.options.time_limit();
        self.best = None;
        self.deepest = None;
        self.nodes = 0;

        let mut attempts = 0;
        let mut restarts = 0;

        let reason = match seed {
            Some(pose) => {
                let mut assignment = Assignment::seeded(pose, &self.graph, &self.oracle, self.eps);
                info!(
                    "seed keeps {} of {} vertices",
                    assignment.placed_count(),
                    self.graph.len()
                );
                let order = placement_order(&self.graph, &assignment.placed_mask(), None);
                assignment.set_order(order);
                attempts += 1;
                match self.attempt(assignment, None, sink) {
                    Flow::Exhausted => StopReason::Exhausted,
                    Flow::Perfect => StopReason::Perfect,
                    Flow::Timeout => StopReason::TimeLimit,
                    Flow::Stalled => {
                        restarts += 1;
                        StopReason::Exhausted
                    }
                }
            }
            None => self.sweep(&mut attempts, &mut restarts, sink),
        };

        info!(
            "search finished: {:?} after {:.3}s, {} attempts, {} restarts, {} nodes, best = {:?}",
            reason,
            started.elapsed().as_secs_f64(),
            attempts,
            restarts,
            self.nodes,
            self.best.as_ref().map(|b| b.0)
        );
        let (hits, misses) = self.cache.stats();
        debug!("viable cache: {} hits, {} misses", hits, misses);

        SearchOutcome {
            best: self.best.clone(),
            reason,
            attempts,
            restarts,
            nodes: self.nodes,
            partial: self.deepest.as_ref().map(|d| d.1.clone()),
        }
    }

    fn sweep(
        &mut self,
        attempts: &mut usize,
        restarts: &mut usize,
        sink: &mut dyn SolutionSink,
    ) -> StopReason {
        for v in start_vertices(&self.graph) {
            let order = placement_order(&self.graph, &vec![false; self.graph.len()], Some(v));
            for p in self.start_points(v) {
                if Instant::now() >= self.deadline {
                    return StopReason::TimeLimit;
                }
                debug!("attempt {}: vertex {} at {:?}", *attempts, v, p);
                let mut assignment = Assignment::new(self.graph.len());
                assignment.set_order(order.clone());
                *attempts += 1;
                match self.attempt(assignment, Some(vec![p]), sink) {
                    Flow::Exhausted => {}
                    Flow::Stalled => {
                        *restarts += 1;
                        info!("attempt stalled, restarting from the next start point");
                    }
                    Flow::Perfect => return StopReason::Perfect,
                    Flow::Timeout => return StopReason::TimeLimit,
                }
            }
        }
        StopReason::Exhausted
    }

    /// Where vertex `v` may open an attempt: hole vertices in hole order,
    /// then (optionally) inside points from the boundary inwards.
    fn start_points(&self, v: usize) -> Vec<Point> {
        let hole = self.hole.vertices();
        let mut points = vec![];
        for (i, h) in hole.iter().enumerate() {
            if self.options.len_matching {
                let prev = &hole[(i + hole.len() - 1) % hole.len()];
                let next = &hole[(i + 1) % hole.len()];
                let sides = [squared_distance(prev, h), squared_distance(h, next)];
                let matches = self.graph.neighbors(v).iter().any(|&(_, len2)| {
                    sides.iter().any(|&side| within_tolerance(len2, side, self.eps))
                });
                if !matches {
                    continue;
                }
            }
            points.push(*h);
        }
        if self.options.start_from_interior {
            points.extend(
                self.oracle
                    .index()
                    .by_depth()
                    .iter()
                    .filter(|p| !self.hole_vertices.contains(*p))
                    .copied(),
            );
        }
        points
    }

    fn attempt(
        &mut self,
        mut assignment: Assignment,
        root: Option<Vec<Point>>,
        sink: &mut dyn SolutionSink,
    ) -> Flow {
        let now = Instant::now();
        let mut watchdog = Watchdog::new(now, self.options.stall_timeout());
        self.record_depth(&assignment, &mut watchdog, now);

        let first = match assignment.next_vertex() {
            Some(v) => v,
            None => {
                return self
                    .complete(&assignment, &mut watchdog, now, sink)
                    .unwrap_or(Flow::Exhausted);
            }
        };
        let candidates = match root {
            Some(candidates) => candidates,
            None => self.candidates(&assignment, first),
        };
        let mut stack = vec![Frame::new(first, candidates)];

        let flow = self.descend(&mut assignment, &mut stack, &mut watchdog, sink);

        while let Some(frame) = stack.pop() {
            if frame.placed {
                assignment.unplace(frame.vertex);
            }
        }
        debug_assert_eq!(assignment.depth(), 0);
        flow
    }

    fn descend(
        &mut self,
        assignment: &mut Assignment,
        stack: &mut Vec<Frame>,
        watchdog: &mut Watchdog,
        sink: &mut dyn SolutionSink,
    ) -> Flow {
        let mut now = Instant::now();
        while let Some(frame) = stack.last_mut() {
            self.nodes += 1;
            if self.nodes % CLOCK_INTERVAL == 0 {
                now = Instant::now();
                if now >= self.deadline {
                    return Flow::Timeout;
                }
                if watchdog.stalled(now) {
                    return Flow::Stalled;
                }
            }

            if frame.placed {
                assignment.unplace(frame.vertex);
                frame.placed = false;
            }
            let p = match frame.candidates.get(frame.cursor) {
                Some(p) => *p,
                None => {
                    stack.pop();
                    continue;
                }
            };
            frame.cursor += 1;
            let v = frame.vertex;
            assignment.place(v, p);
            frame.placed = true;

            self.record_depth(assignment, watchdog, now);

            match assignment.next_vertex() {
                None => {
                    if let Some(flow) = self.complete(assignment, watchdog, now, sink) {
                        return flow;
                    }
                }
                Some(next) => {
                    let candidates = self.candidates(assignment, next);
                    stack.push(Frame::new(next, candidates));
                }
            }
        }
        Flow::Exhausted
    }

    fn record_depth(&mut self, assignment: &Assignment, watchdog: &mut Watchdog, now: Instant) {
        watchdog.reached(assignment.depth(), now);
        let placed = assignment.placed_count();
        if self.deepest.as_ref().map_or(true, |d| placed > d.0) {
            self.deepest = Some((placed, assignment.to_partial_pose()));
        }
    }

    fn edge_ok(&self, a: &Point, b: &Point) -> bool {
        if self.options.strict_edges {
            self.oracle.is_edge_inside(a, b)
        } else {
            self.oracle.is_edge_inside_fast(a, b)
        }
    }

    /// Candidate points for `v`, best first.
    fn candidates(&mut self, assignment: &Assignment, v: usize) -> Vec<Point> {
        let anchors = self
            .graph
            .neighbors(v)
            .iter()
            .filter_map(|&(u, len2)| assignment.get(u).map(|q| (q, len2)))
            .collect_vec();

        let mut candidates = match anchors.split_first() {
            Some((&(q, len2), rest)) => {
                let mut c = self
                    .cache
                    .adjacent_points(&q, len2, self.eps, self.oracle.index())
                    .to_vec();
                for &(q, len2) in rest {
                    retain_viable(&mut c, &q, len2, self.eps);
                }
                c
            }
            // Nothing placed next to `v`: it opens a new component.
            None => self
                .hole
                .vertices()
                .iter()
                .chain(
                    self.oracle
                        .index()
                        .by_depth()
                        .iter()
                        .filter(|p| !self.hole_vertices.contains(*p)),
                )
                .copied()
                .collect_vec(),
        };

        candidates.retain(|p| {
            !assignment.is_occupied(p) && anchors.iter().all(|(q, _)| self.edge_ok(q, p))
        });

        let mut keyed = candidates
            .into_iter()
            .map(|p| {
                let mut key: i64 = assignment.points().map(|q| squared_distance(q, &p)).sum();
                if self.hole_vertices.contains(&p) {
                    key += HOLE_VERTEX_BONUS;
                }
                (key, p)
            })
            .collect_vec();
        keyed.sort_by_key(|&(key, _)| Reverse(key));
        keyed.into_iter().map(|(_, p)| p).collect()
    }

    /// Handles a complete assignment. Returns `Some` if the search should
    /// stop.
    fn complete(
        &mut self,
        assignment: &Assignment,
        watchdog: &mut Watchdog,
        now: Instant,
        sink: &mut dyn SolutionSink,
    ) -> Option<Flow> {
        let pose = assignment.to_pose()?;
        if let Err(violation) =
            scorer::check_placement(&self.hole, self.graph.edge_triples(), self.eps, &pose.vertices)
        {
            debug!("rejected complete placement: {}", violation);
            return None;
        }

        let dislike = scorer::dislike(&self.hole, &pose);
        if self.best.as_ref().map_or(true, |b| dislike < b.0) {
            info!("improved: dislike = {}", dislike);
            if let Err(e) = sink.improved(&pose, dislike) {
                warn!("failed to persist solution: {:#}", e);
            }
            self.best = Some((dislike, pose));
            watchdog.reset(now);
        }

        if dislike == 0 {
            Some(Flow::Perfect)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NoSink;
    use test_log::test;

    fn placer(hole: Vec<(i64, i64)>, n: usize, edges: &[(usize, usize, i64)], ppm: i64) -> Placer {
        let graph = FigureGraph::from_edges(n, edges).unwrap();
        Placer::new(
            hole.into(),
            graph,
            Epsilon::from_ppm(ppm),
            SearchOptions::default(),
        )
    }

    #[test]
    fn hole_vertices_come_first() {
        let mut p = placer(vec![(0, 0), (0, 4), (4, 4), (4, 0)], 2, &[(0, 1, 16)], 0);
        let mut a = Assignment::new(2);
        a.set_order(vec![0, 1]);
        a.place(0, Point::new(0, 0));
        let c = p.candidates(&a, 1);
        assert_eq!(c.len(), 2);
        assert!(c.iter().all(|q| p.hole_vertices.contains(q)));

        let mut a = Assignment::new(2);
        a.set_order(vec![0, 1]);
        a.place(0, Point::new(2, 2));
        // (2, 2) + (0, ±4) and (±4, 0) all leave the hole.
        assert!(p.candidates(&a, 1).is_empty());
    }

    #[test]
    fn farther_candidates_first() {
        let mut p = placer(
            vec![(0, 0), (0, 10), (10, 10), (10, 0)],
            3,
            &[(0, 1, 25), (1, 2, 25)],
            0,
        );
        let mut a = Assignment::new(3);
        a.set_order(vec![1, 0, 2]);
        a.place(1, Point::new(5, 5));
        a.place(0, Point::new(5, 0));
        let c = p.candidates(&a, 2);
        assert!(!c.contains(&Point::new(5, 0)));
        // Straight across from vertex 0.
        assert_eq!(c[0], Point::new(5, 10));
        let dist = |q: &Point| {
            squared_distance(q, &Point::new(5, 0)) + squared_distance(q, &Point::new(5, 5))
        };
        assert!(c.windows(2).all(|w| dist(&w[0]) >= dist(&w[1])));
    }

    #[test]
    fn unwinds_after_every_attempt() {
        let mut p = placer(
            vec![(0, 0), (0, 3), (3, 3), (3, 0)],
            3,
            &[(0, 1, 4), (1, 2, 4), (2, 0, 4)],
            0,
        );
        let outcome = p.run(None, &mut NoSink);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.reason, StopReason::Exhausted);
        assert_eq!(outcome.attempts, 3 * 4);
        let partial = outcome.partial.unwrap();
        assert_eq!(partial.vertices.len(), 3);
    }

    #[test]
    fn len_matching_filters_start_points() {
        let graph = FigureGraph::from_edges(2, &[(0, 1, 16)]).unwrap();
        let options = SearchOptions {
            len_matching: true,
            ..Default::default()
        };
        // Every corner touches one of the long sides.
        let hole = vec![(0, 0), (0, 4), (3, 4), (3, 0)];
        let p = Placer::new(hole.into(), graph, Epsilon::from_ppm(0), options);
        assert_eq!(
            p.start_points(0),
            vec![Point::new(0, 0), Point::new(0, 4), Point::new(3, 4), Point::new(3, 0)]
        );

        let graph = FigureGraph::from_edges(2, &[(0, 1, 9)]).unwrap();
        let options = SearchOptions {
            len_matching: true,
            ..Default::default()
        };
        let hole = vec![(0, 0), (0, 4), (3, 4), (3, 0), (1, -1)];
        let p = Placer::new(hole.into(), graph, Epsilon::from_ppm(0), options);
        assert_eq!(
            p.start_points(0),
            vec![Point::new(0, 4), Point::new(3, 4)]
        );
    }
}
