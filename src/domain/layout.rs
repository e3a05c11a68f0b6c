//! Spring Layout
//!
//! Fruchterman-Reingold force-directed placement. Positions depend only on
//! the graph, the seed and the parameters, never on the thread count.

use crate::domain::callgraph::CallDiGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

const MIN_DISTANCE: f64 = 0.01;

/// A position in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Layout parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringLayout {
    /// Seed for the initial random placement
    pub seed: u64,
    /// Maximum number of cooling steps
    pub iterations: usize,
    /// Optimal distance between nodes; `1/sqrt(n)` when unset
    pub k: Option<f64>,
    /// Early stop once the mean displacement drops below this
    pub threshold: f64,
    /// Largest absolute coordinate after rescaling
    pub scale: f64,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
            k: None,
            threshold: 1e-4,
            scale: 1.0,
        }
    }
}

/// Node positions indexed by `NodeIndex`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    positions: Vec<Point>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, idx: NodeIndex) -> Option<Point> {
        self.positions.get(idx.index()).copied()
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }
}

impl SpringLayout {
    pub fn compute(&self, graph: &CallDiGraph) -> Layout {
        let n = graph.node_count();
        match n {
            0 => return Layout::default(),
            1 => {
                return Layout {
                    positions: vec![Point::default()],
                }
            }
            _ => {}
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut pos: Vec<Point> = (0..n)
            .map(|_| Point::new(rng.random::<f64>(), rng.random::<f64>()))
            .collect();

        // Outgoing neighbours; self-loops carry no force.
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in graph.edge_references() {
            let (from, to) = (edge.source().index(), edge.target().index());
            if from != to {
                adjacency[from].push(to);
            }
        }

        let k = self.k.unwrap_or_else(|| 1.0 / (n as f64).sqrt());
        let (min, max) = bounds(&pos);
        let mut t = (max.x - min.x).max(max.y - min.y) * 0.1;
        let dt = t / (self.iterations as f64 + 1.0);

        for iteration in 0..self.iterations {
            let snapshot = &pos;
            let moves: Vec<Point> = (0..n)
                .into_par_iter()
                .map(|i| displacement(i, snapshot, &adjacency[i], k, t))
                .collect();

            let mut energy = 0.0;
            for (p, d) in pos.iter_mut().zip(&moves) {
                p.x += d.x;
                p.y += d.y;
                energy += d.x * d.x + d.y * d.y;
            }
            t -= dt;

            if energy.sqrt() / (n as f64) < self.threshold {
                tracing::debug!(iteration, "spring layout converged");
                break;
            }
        }

        rescale(&mut pos, self.scale);
        Layout { positions: pos }
    }
}

/// Capped move of node `i` for one cooling step.
fn displacement(i: usize, pos: &[Point], neighbours: &[usize], k: f64, t: f64) -> Point {
    let p = pos[i];
    let mut disp = Point::default();

    for (j, q) in pos.iter().enumerate() {
        if j == i {
            continue;
        }
        let delta = Point::new(p.x - q.x, p.y - q.y);
        let distance = delta.norm().max(MIN_DISTANCE);
        let force = k * k / (distance * distance);
        disp.x += delta.x * force;
        disp.y += delta.y * force;
    }

    for &j in neighbours {
        let q = pos[j];
        let delta = Point::new(p.x - q.x, p.y - q.y);
        let distance = delta.norm().max(MIN_DISTANCE);
        let pull = distance / k;
        disp.x -= delta.x * pull;
        disp.y -= delta.y * pull;
    }

    let length = disp.norm().max(MIN_DISTANCE);
    Point::new(disp.x * t / length, disp.y * t / length)
}

fn bounds(pos: &[Point]) -> (Point, Point) {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in pos {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

/// Centre on the mean and scale so the largest |coordinate| equals `scale`.
fn rescale(pos: &mut [Point], scale: f64) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }

    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.x *= scale / lim;
            p.y *= scale / lim;
        }
    }
}
