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

use crate::figure::FigureGraph;

/// Order in which the vertices not yet placed are visited.
///
/// `start` (if any) comes first. After that the vertex with the most placed
/// neighbours is taken, lowest index on ties. If no remaining vertex touches
/// a placed one, the remaining vertex of highest degree opens a new
/// component.
pub fn placement_order(graph: &FigureGraph, placed: &[bool], start: Option<usize>) -> Vec<usize> {
    let n = graph.len();
    let mut done = placed.to_vec();
    done.resize(n, false);

    let mut links = vec![0usize; n];
    for v in (0..n).filter(|&v| done[v]) {
        for &(u, _) in graph.neighbors(v) {
            links[u] += 1;
        }
    }

    let mut order = Vec::with_capacity(done.iter().filter(|d| !**d).count());
    let mut next = start.filter(|&s| s < n && !done[s]);

    loop {
        let v = match next.take().or_else(|| most_linked(graph, &done, &links)) {
            Some(v) => v,
            None => break,
        };
        done[v] = true;
        order.push(v);
        for &(u, _) in graph.neighbors(v) {
            links[u] += 1;
        }
    }
    order
}

fn most_linked(graph: &FigureGraph, done: &[bool], links: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for v in (0..graph.len()).filter(|&v| !done[v]) {
        if best.map_or(true, |(_, l)| links[v] > l) {
            best = Some((v, links[v]));
        }
    }
    match best {
        Some((v, l)) if l > 0 => Some(v),
        Some(_) => highest_degree(graph, done),
        None => None,
    }
}

fn highest_degree(graph: &FigureGraph, done: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for v in (0..graph.len()).filter(|&v| !done[v]) {
        if best.map_or(true, |b| graph.degree(v) > graph.degree(b)) {
            best = Some(v);
        }
    }
    best
}

/// Vertices by descending degree, lowest index first on ties.
pub fn start_vertices(graph: &FigureGraph) -> Vec<usize> {
    let mut vs = (0..graph.len()).collect::<Vec<_>>();
    vs.sort_by_key(|&v| std::cmp::Reverse(graph.degree(v)));
    vs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> FigureGraph {
        let edges = edges.iter().map(|&(a, b)| (a, b, 1)).collect::<Vec<_>>();
        FigureGraph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn follows_most_placed_neighbours() {
        // 0-1, 0-2, 1-2, 2-3, 3-4
        let g = graph(5, &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4)]);
        let order = placement_order(&g, &[false; 5], Some(0));
        // After 0: 1 and 2 tie, 1 wins. After 1: 2 has two links.
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn skips_already_placed_vertices() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let order = placement_order(&g, &[false, false, true, false], None);
        assert_eq!(order, vec![1, 0, 3]);
    }

    #[test]
    fn disconnected_figure_opens_new_component() {
        // Path 0-1 and a star centered on 4.
        let g = graph(6, &[(0, 1), (4, 2), (4, 3), (4, 5)]);
        let order = placement_order(&g, &[false; 6], Some(0));
        assert_eq!(order, vec![0, 1, 4, 2, 3, 5]);
    }

    #[test]
    fn start_vertices_by_degree() {
        let g = graph(4, &[(0, 1), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(start_vertices(&g), vec![1, 2, 3, 0]);
    }
}
