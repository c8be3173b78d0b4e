use std::io::{BufRead, BufReader, Read};
use std::time::Instant;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

mod error;
pub mod logging;
mod params;

pub use error::{Error, Result};
pub use params::Params;

pub type Point = (f64, f64);
type NodeId = usize;

pub fn distance(s: &Point, t: &Point) -> f64 {
    let dx = s.0 - t.0;
    let dy = s.1 - t.1;
    (dx * dx + dy * dy).sqrt()
}

/// Length of the closed cycle visiting `points` in `tour` order.
pub fn total_distance(tour: &[NodeId], points: &[Point]) -> f64 {
    cycle_cost(tour, |a, b| distance(&points[a], &points[b]))
}

fn cycle_cost(seq: &[NodeId], d: impl Fn(NodeId, NodeId) -> f64) -> f64 {
    let closing = match (seq.first(), seq.last()) {
        (Some(&first), Some(&last)) => d(last, first),
        _ => 0.0,
    };
    seq.windows(2).map(|w| d(w[0], w[1])).sum::<f64>() + closing
}

/// Copy of `seq` with positions `i..=k` reversed. Requires `i <= k < seq.len()`.
pub fn two_opt_swap(seq: &[NodeId], i: usize, k: usize) -> Vec<NodeId> {
    let mut out = seq.to_vec();
    out[i..=k].reverse();
    out
}

#[derive(Clone, Debug)]
pub struct Tour<'a> {
    tsp: &'a Tsp,
    seq: Vec<NodeId>,
    cost: f64,
}

impl<'a> Tour<'a> {
    /// Greedy nearest-neighbour tour starting from node 0.
    pub fn nearest_neighbor(tsp: &'a Tsp) -> Self {
        let mut seq: Vec<NodeId> = Vec::with_capacity(tsp.n);
        let mut used = vec![false; tsp.n];
        let mut last = 0;
        seq.push(last);
        used[last] = true;
        while let Some(x) = (0..tsp.n)
            .filter(|&i| !used[i])
            .min_by(|&a, &b| tsp.d_ix(last, a).total_cmp(&tsp.d_ix(last, b)))
        {
            seq.push(x);
            used[x] = true;
            last = x;
        }
        Self::with_seq(tsp, seq)
    }

    pub fn random<R: Rng + ?Sized>(tsp: &'a Tsp, rng: &mut R) -> Self {
        let mut seq: Vec<NodeId> = (0..tsp.n).collect();
        seq.shuffle(rng);
        Self::with_seq(tsp, seq)
    }

    pub fn from_seq(tsp: &'a Tsp, seq: Vec<NodeId>) -> Result<Self> {
        if seq.len() != tsp.n {
            return Err(Error::InvalidTourLength {
                expected: tsp.n,
                actual: seq.len(),
            });
        }
        let mut seen = vec![false; tsp.n];
        for &x in seq.iter() {
            if x >= tsp.n || seen[x] {
                return Err(Error::InvalidTourIndex { index: x, n: tsp.n });
            }
            seen[x] = true;
        }
        Ok(Self::with_seq(tsp, seq))
    }

    fn with_seq(tsp: &'a Tsp, seq: Vec<NodeId>) -> Self {
        let cost = tsp.tour_cost(&seq);
        Self { tsp, seq, cost }
    }

    /// 2-opt move on a copy of this tour.
    pub fn two_opt(&self, i: usize, k: usize) -> Self {
        Self::with_seq(self.tsp, two_opt_swap(&self.seq, i, k))
    }

    pub fn seq(&self) -> &[NodeId] {
        &self.seq
    }

    pub fn into_seq(self) -> Vec<NodeId> {
        self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Higher is better.
    pub fn brightness(&self) -> f64 {
        -self.cost
    }
}

impl PartialEq for Tour<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tsp, other.tsp) && self.seq == other.seq && self.cost == other.cost
    }
}

/// Two distinct positions in `0..n`, ordered.
fn sample_pair<R: Rng + ?Sized>(rng: &mut R, n: usize) -> (usize, usize) {
    let picked = index::sample(rng, n, 2);
    let (a, b) = (picked.index(0), picked.index(1));
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Perturbs `tour_i` with random 2-opt moves, the number of attempts scaled
/// by `beta0 * exp(-gamma * (cost_i - cost_j))`. Candidates accumulate across
/// attempts and replace the result only on a strict improvement, so the
/// returned tour is never longer than `tour_i`.
///
/// The attempt count is only bounded by `beta0 * n` when `tour_i` is the
/// dimmer of the two, which is how `Solver` calls it. For a brighter `tour_i`
/// it grows exponentially with the cost gap and saturates at `usize::MAX`.
pub fn move_firefly<'a, R: Rng + ?Sized>(
    tour_i: &Tour<'a>,
    tour_j: &Tour<'a>,
    params: &Params,
    rng: &mut R,
) -> Tour<'a> {
    debug_assert_eq!(tour_i.len(), tour_j.len());
    let n = tour_i.len();
    let delta = tour_i.cost - tour_j.cost;
    let beta = params.beta0 * (-params.gamma * delta).exp();
    // `as` saturates: NaN and negatives become 0
    let attempts = (beta * n as f64).floor() as usize;

    let mut best = tour_i.clone();
    if n < 2 {
        return best;
    }
    let mut candidate = tour_i.clone();
    for _ in 0..attempts {
        let (i, k) = sample_pair(rng, n);
        candidate = candidate.two_opt(i, k);
        if candidate.cost < best.cost {
            best = candidate.clone();
        }
    }
    best
}

pub struct Solver<'a, R = SmallRng> {
    tsp: &'a Tsp,
    params: Params,
    rng: R,
    population: Vec<Tour<'a>>,
    brightness: Vec<f64>,
}

impl<'a> Solver<'a, SmallRng> {
    pub fn new(tsp: &'a Tsp, params: Params, seed: u64) -> Result<Self> {
        Self::with_rng(tsp, params, SmallRng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> Solver<'a, R> {
    pub fn with_rng(tsp: &'a Tsp, params: Params, mut rng: R) -> Result<Self> {
        params.validate()?;
        let population: Vec<Tour<'a>> = (0..params.population_size)
            .map(|_| Tour::random(tsp, &mut rng))
            .collect();
        let brightness = population.iter().map(Tour::brightness).collect();
        Ok(Self {
            tsp,
            params,
            rng,
            population,
            brightness,
        })
    }

    /// One generation. Updates land in place, so a tour moved earlier in the
    /// pass is what later comparisons see. Returns the number of moves.
    pub fn step(&mut self) -> usize {
        for (b, t) in self.brightness.iter_mut().zip(self.population.iter()) {
            *b = t.brightness();
        }
        let m = self.population.len();
        let mut moves = 0;
        for i in 0..m {
            for j in 0..m {
                if self.brightness[i] < self.brightness[j] {
                    let moved = move_firefly(
                        &self.population[i],
                        &self.population[j],
                        &self.params,
                        &mut self.rng,
                    );
                    self.brightness[i] = moved.brightness();
                    self.population[i] = moved;
                    moves += 1;
                }
            }
        }
        moves
    }

    /// Runs every configured generation and returns the total move count.
    pub fn run(&mut self) -> usize {
        let t = Instant::now();
        info!(
            "firefly: n={} population={} generations={} beta0={} gamma={}",
            self.tsp.n,
            self.params.population_size,
            self.params.generation_count,
            self.params.beta0,
            self.params.gamma
        );
        let mut moves = 0;
        for generation in 0..self.params.generation_count {
            moves += self.step();
            debug!(
                "generation {generation}: moves={moves} best={:.4}",
                self.solution().cost()
            );
        }
        info!(
            "firefly: moves={moves} best={:.4} time={:.2}s",
            self.solution().cost(),
            t.elapsed().as_secs_f32()
        );
        moves
    }

    /// Brightest tour; the lowest index wins ties.
    pub fn solution(&self) -> &Tour<'a> {
        let mut best = 0;
        for (i, &b) in self.brightness.iter().enumerate().skip(1) {
            if b > self.brightness[best] {
                best = i;
            }
        }
        &self.population[best]
    }

    pub fn population(&self) -> &[Tour<'a>] {
        &self.population
    }
}

pub fn solve(tsp: &Tsp, params: Params, seed: u64) -> Result<Tour<'_>> {
    let mut s = Solver::new(tsp, params, seed)?;
    s.run();
    Ok(s.solution().clone())
}

#[derive(Debug)]
pub struct Tsp {
    n: usize,
    points: Vec<Point>,
    m: Vec<f64>,
}

impl Tsp {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        let n = points.len();
        if n < 2 {
            return Err(Error::InsufficientPoints { n });
        }
        let m = points
            .iter()
            .flat_map(|s| points.iter().map(move |t| distance(s, t)))
            .collect();
        Ok(Self { n, points, m })
    }

    /// Point count on the first line, then one `x y` pair per line.
    pub fn parse_kattis<R: Read>(reader: R) -> Result<Self> {
        let mut lines = BufReader::new(reader)
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|s| (i + 1, s)));
        let mut next_line = || -> Result<Option<(usize, String)>> {
            for line in lines.by_ref() {
                let (no, s) = line?;
                if !s.trim().is_empty() {
                    return Ok(Some((no, s)));
                }
            }
            Ok(None)
        };

        let (no, header) = next_line()?.ok_or_else(|| Error::parse(1, "missing point count"))?;
        let n: usize = header
            .trim()
            .parse()
            .map_err(|e| Error::parse(no, format!("invalid point count {:?}: {e}", header.trim())))?;
        let mut points = Vec::new();
        while points.len() < n {
            let (no, s) = next_line()?.ok_or_else(|| {
                Error::parse(no, format!("expected {n} points, found {}", points.len()))
            })?;
            points.push(parse_coords(no, s.split_whitespace())?);
        }
        Self::new(points)
    }

    /// TSPLIB `NODE_COORD_SECTION` records (`id x y`) up to `EOF`.
    pub fn parse_tsp_file<R: Read>(reader: R) -> Result<Self> {
        let mut points = Vec::new();
        let mut in_coords = false;
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let s = line.trim();
            if s == "EOF" {
                break;
            }
            if !in_coords {
                in_coords = s == "NODE_COORD_SECTION";
                continue;
            }
            if s.is_empty() {
                continue;
            }
            points.push(parse_coords(i + 1, s.split_whitespace().skip(1))?);
        }
        Self::new(points)
    }

    pub fn d_ix(&self, i: usize, j: usize) -> f64 {
        self.m[i * self.n + j]
    }

    /// Same sum as `total_distance`, read from the distance matrix.
    pub fn tour_cost(&self, seq: &[NodeId]) -> f64 {
        cycle_cost(seq, |a, b| self.d_ix(a, b))
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

fn parse_coords<'s>(line: usize, mut r: impl Iterator<Item = &'s str>) -> Result<Point> {
    let mut coord = |axis: &str| -> Result<f64> {
        let tok = r
            .next()
            .ok_or_else(|| Error::parse(line, format!("missing {axis} coordinate")))?;
        tok.parse::<f64>()
            .map_err(|e| Error::parse(line, format!("invalid {axis} coordinate {tok:?}: {e}")))
    };
    Ok((coord("x")?, coord("y")?))
}
