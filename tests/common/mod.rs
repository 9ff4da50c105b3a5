//! Shared fixtures: probe builders and small trace generators that mimic
//! what the sampler records for each algorithm.

#![allow(dead_code)]

use algo_narrator::{Location, Probe, ProbeBundle, RawSample, Stage};
use ndarray::{ArrayD, IxDyn};

// ============================================================================
// Probe builders
// ============================================================================

pub fn array(shape: &[usize], data: Vec<f64>) -> ArrayD<f64> {
    ArrayD::from_shape_vec(IxDyn(shape), data).unwrap()
}

pub fn one_hot(n: usize, idx: usize) -> Vec<f64> {
    let mut row = vec![0.0; n];
    row[idx] = 1.0;
    row
}

pub fn identity(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

pub fn adjacency(n: usize, edges: &[(usize, usize)]) -> Vec<f64> {
    let mut adj = vec![0.0; n * n];
    for &(a, b) in edges {
        adj[a * n + b] = 1.0;
        adj[b * n + a] = 1.0;
    }
    adj
}

pub fn weight_matrix(n: usize, edges: &[(usize, usize, f64)]) -> Vec<f64> {
    let mut weights = vec![0.0; n * n];
    for &(a, b, w) in edges {
        weights[a * n + b] = w;
        weights[b * n + a] = w;
    }
    weights
}

/// `(steps, 1, nodes)` hint probe.
pub fn node_hint(name: &str, rows: &[Vec<f64>]) -> Probe {
    let n = rows.first().map(Vec::len).unwrap_or(0);
    let data = rows.iter().flatten().copied().collect();
    Probe::new(name, Location::Node, array(&[rows.len(), 1, n], data))
}

/// `(steps, 1, nodes, nodes)` hint probe from row-major matrices.
pub fn matrix_hint(name: &str, n: usize, matrices: &[Vec<f64>]) -> Probe {
    let data = matrices.iter().flatten().copied().collect();
    Probe::new(name, Location::Edge, array(&[matrices.len(), 1, n, n], data))
}

/// `(steps, 1, nodes, 3)` one-hot color probe.
pub fn color_hint(rows: &[Vec<usize>]) -> Probe {
    let n = rows.first().map(Vec::len).unwrap_or(0);
    let mut data = Vec::with_capacity(rows.len() * n * 3);
    for row in rows {
        for &color in row {
            let mut cats = [0.0; 3];
            cats[color] = 1.0;
            data.extend(cats);
        }
    }
    Probe::new("color", Location::Node, array(&[rows.len(), 1, n, 3], data))
}

pub fn unweighted_inputs(n: usize, edges: &[(usize, usize)], source: Option<usize>) -> ProbeBundle {
    let mut inputs = ProbeBundle::new(Stage::Input)
        .with(Probe::new("adj", Location::Edge, array(&[1, n, n], adjacency(n, edges))));
    if let Some(s) = source {
        inputs.push(Probe::new("s", Location::Node, array(&[1, n], one_hot(n, s))));
    }
    inputs
}

pub fn weighted_inputs(n: usize, edges: &[(usize, usize, f64)], source: Option<usize>) -> ProbeBundle {
    let pairs: Vec<(usize, usize)> = edges.iter().map(|&(a, b, _)| (a, b)).collect();
    let mut inputs = ProbeBundle::new(Stage::Input)
        .with(Probe::new("adj", Location::Edge, array(&[1, n, n], adjacency(n, &pairs))))
        .with(Probe::new("A", Location::Edge, array(&[1, n, n], weight_matrix(n, edges))));
    if let Some(s) = source {
        inputs.push(Probe::new("s", Location::Node, array(&[1, n], one_hot(n, s))));
    }
    inputs
}

fn weighted_neighbors(n: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<(usize, f64)>> {
    let mut neighbors = vec![Vec::new(); n];
    for &(a, b, w) in edges {
        neighbors[a].push((b, w));
        neighbors[b].push((a, w));
    }
    for list in &mut neighbors {
        list.sort_by_key(|(node, _)| *node);
    }
    neighbors
}

/// Index of the queued node with the smallest value, ties to the lower id.
fn extract_min(values: &[f64], in_queue: &[f64]) -> Option<usize> {
    (0..values.len())
        .filter(|&i| in_queue[i] == 1.0)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)))
}

// ============================================================================
// Trace generators
// ============================================================================

/// Parallel BFS: every step extends reachability by one hop. The final
/// unchanged snapshot is recorded too.
pub fn bfs_sample(n: usize, edges: &[(usize, usize)], source: usize) -> RawSample {
    let adj = adjacency(n, edges);
    let mut reach = one_hot(n, source);
    let mut pi = identity(n);
    let mut reach_rows = vec![reach.clone()];
    let mut pi_rows = vec![pi.clone()];

    loop {
        let prev = reach.clone();
        for i in 0..n {
            for j in 0..n {
                if adj[i * n + j] > 0.0 && prev[i] == 1.0 {
                    if pi[j] == j as f64 && j != source {
                        pi[j] = i as f64;
                    }
                    reach[j] = 1.0;
                }
            }
        }
        reach_rows.push(reach.clone());
        pi_rows.push(pi.clone());
        if reach == prev {
            break;
        }
    }

    RawSample::new(
        unweighted_inputs(n, edges, Some(source)),
        ProbeBundle::new(Stage::Hint)
            .with(node_hint("reach_h", &reach_rows))
            .with(node_hint("pi_h", &pi_rows)),
        ProbeBundle::new(Stage::Output).with(Probe::new("pi", Location::Node, array(&[1, n], pi))),
    )
}

/// Recursive DFS started from each root in `roots` order, one snapshot per
/// discovery and per finish.
pub fn dfs_sample(n: usize, edges: &[(usize, usize)], roots: &[usize]) -> RawSample {
    let mut neighbors = vec![Vec::new(); n];
    for &(a, b) in edges {
        neighbors[a].push(b);
        neighbors[b].push(a);
    }
    for list in &mut neighbors {
        list.sort_unstable();
    }

    let mut colors = vec![0usize; n];
    let mut color_rows = vec![colors.clone()];
    let mut root_rows = vec![one_hot(n, roots[0])];

    for &root in roots {
        if colors[root] != 0 {
            continue;
        }
        colors[root] = 1;
        color_rows.push(colors.clone());
        root_rows.push(one_hot(n, root));

        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            match neighbors[node].get(top.1).copied() {
                Some(next) => {
                    top.1 += 1;
                    if colors[next] == 0 {
                        colors[next] = 1;
                        color_rows.push(colors.clone());
                        root_rows.push(one_hot(n, root));
                        stack.push((next, 0));
                    }
                }
                None => {
                    colors[node] = 2;
                    color_rows.push(colors.clone());
                    root_rows.push(one_hot(n, root));
                    stack.pop();
                }
            }
        }
    }

    RawSample::new(
        unweighted_inputs(n, edges, None),
        ProbeBundle::new(Stage::Hint)
            .with(color_hint(&color_rows))
            .with(node_hint("s", &root_rows)),
        ProbeBundle::new(Stage::Output),
    )
}

/// Dijkstra with one snapshot per extraction, followed by one zero-padding
/// row like a batched trace.
pub fn dijkstra_sample(n: usize, edges: &[(usize, usize, f64)], source: usize) -> RawSample {
    let neighbors = weighted_neighbors(n, edges);
    let mut d = vec![0.0; n];
    let mut mark = vec![0.0; n];
    let mut in_queue = one_hot(n, source);
    let mut rows = vec![(d.clone(), mark.clone(), in_queue.clone(), vec![0.0; n])];

    while let Some(u) = extract_min(&d, &in_queue) {
        mark[u] = 1.0;
        in_queue[u] = 0.0;
        for &(v, w) in &neighbors[u] {
            if mark[v] == 1.0 {
                continue;
            }
            if in_queue[v] == 0.0 || d[u] + w < d[v] {
                d[v] = d[u] + w;
                in_queue[v] = 1.0;
            }
        }
        rows.push((d.clone(), mark.clone(), in_queue.clone(), one_hot(n, u)));
    }
    rows.push((vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]));

    let d_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.0.clone()).collect();
    let mark_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.1.clone()).collect();
    let queue_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.2.clone()).collect();
    let u_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.3.clone()).collect();
    RawSample::new(
        weighted_inputs(n, edges, Some(source)),
        ProbeBundle::new(Stage::Hint)
            .with(node_hint("d", &d_rows))
            .with(node_hint("mark", &mark_rows))
            .with(node_hint("in_queue", &queue_rows))
            .with(node_hint("u", &u_rows)),
        ProbeBundle::new(Stage::Output),
    )
}

/// Prim from `source`, same snapshot cadence as `dijkstra_sample`.
pub fn prim_sample(n: usize, edges: &[(usize, usize, f64)], source: usize) -> RawSample {
    let neighbors = weighted_neighbors(n, edges);
    let mut key = vec![0.0; n];
    let mut pi = identity(n);
    let mut mark = vec![0.0; n];
    let mut in_queue = one_hot(n, source);
    let mut rows = vec![(key.clone(), pi.clone(), mark.clone(), in_queue.clone(), vec![0.0; n])];

    while let Some(u) = extract_min(&key, &in_queue) {
        mark[u] = 1.0;
        in_queue[u] = 0.0;
        for &(v, w) in &neighbors[u] {
            if mark[v] == 1.0 {
                continue;
            }
            if in_queue[v] == 0.0 || w < key[v] {
                key[v] = w;
                pi[v] = u as f64;
                in_queue[v] = 1.0;
            }
        }
        rows.push((key.clone(), pi.clone(), mark.clone(), in_queue.clone(), one_hot(n, u)));
    }
    rows.push((vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]));

    let key_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.0.clone()).collect();
    let pi_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.1.clone()).collect();
    let mark_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.2.clone()).collect();
    let queue_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.3.clone()).collect();
    let u_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.4.clone()).collect();
    RawSample::new(
        weighted_inputs(n, edges, Some(source)),
        ProbeBundle::new(Stage::Hint)
            .with(node_hint("key", &key_rows))
            .with(node_hint("pi_h", &pi_rows))
            .with(node_hint("mark", &mark_rows))
            .with(node_hint("in_queue", &queue_rows))
            .with(node_hint("u", &u_rows)),
        ProbeBundle::new(Stage::Output),
    )
}

/// Synchronous Bellman-Ford: a node joins the mask once reached, and the
/// run records one unchanged snapshot before stopping.
pub fn bellman_ford_sample(n: usize, edges: &[(usize, usize, f64)], source: usize) -> RawSample {
    let neighbors = weighted_neighbors(n, edges);
    let mut d = vec![0.0; n];
    let mut pi = identity(n);
    let mut msk = one_hot(n, source);
    let mut rows = vec![(d.clone(), pi.clone(), msk.clone())];

    loop {
        let (prev_d, prev_msk) = (d.clone(), msk.clone());
        for u in 0..n {
            if prev_msk[u] == 0.0 {
                continue;
            }
            for &(v, w) in &neighbors[u] {
                if msk[v] == 0.0 || prev_d[u] + w < d[v] {
                    d[v] = prev_d[u] + w;
                    pi[v] = u as f64;
                    msk[v] = 1.0;
                }
            }
        }
        rows.push((d.clone(), pi.clone(), msk.clone()));
        if d == prev_d && msk == prev_msk {
            break;
        }
    }

    let d_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.0.clone()).collect();
    let pi_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.1.clone()).collect();
    let msk_rows: Vec<Vec<f64>> = rows.iter().map(|r| r.2.clone()).collect();
    RawSample::new(
        weighted_inputs(n, edges, Some(source)),
        ProbeBundle::new(Stage::Hint)
            .with(node_hint("d", &d_rows))
            .with(node_hint("pi_h", &pi_rows))
            .with(node_hint("msk", &msk_rows)),
        ProbeBundle::new(Stage::Output),
    )
}

/// Floyd-Warshall: the initial matrix, then one matrix per intermediate
/// vertex. Zero marks "no path".
pub fn floyd_warshall_sample(n: usize, edges: &[(usize, usize, f64)]) -> RawSample {
    let mut dist = weight_matrix(n, edges);
    let mut matrices = vec![dist.clone()];

    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if i == j || i == k || j == k {
                    continue;
                }
                let (ik, kj, ij) = (dist[i * n + k], dist[k * n + j], dist[i * n + j]);
                if ik > 0.0 && kj > 0.0 && (ij == 0.0 || ik + kj < ij) {
                    dist[i * n + j] = ik + kj;
                }
            }
        }
        matrices.push(dist.clone());
    }

    RawSample::new(
        weighted_inputs(n, edges, None),
        ProbeBundle::new(Stage::Hint).with(matrix_hint("D", n, &matrices)),
        ProbeBundle::new(Stage::Output),
    )
}
