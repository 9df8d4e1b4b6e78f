//! Station network representation.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for adjacency.
//! Station ids are the external 1-based numbers, so all per-station arrays
//! reserve slot 0 and a `StationId` indexes them directly:
//!
//! ```text
//! adj_to[ adj_start[s] .. adj_start[s + 1] ]
//! ```
//!
//! Routes are undirected: `add_edge` inserts one directed entry per
//! direction.  Entries are sorted by `(from, to)` so neighbor iteration is
//! a contiguous memory scan in ascending station order — which also makes
//! Dijkstra's tie-breaking deterministic.
//!
//! # Mutation
//!
//! The network is small (tens of stations), so `add_edge` and `set_edges`
//! simply rebuild the CSR arrays in O(E log E).  There is no cached
//! all-pairs table to invalidate; every query walks the current edges.

use agv_core::{GridPoint, StationId};

use crate::router::{self, ShortestPaths};

/// Grid coordinates of the reference 9-station layout (station 9 is the
/// charging station in the default deployment).
pub const DEFAULT_GRID: [GridPoint; 9] = [
    GridPoint { x: 0.0,  y: 0.0 },
    GridPoint { x: 10.0, y: 0.0 },
    GridPoint { x: 20.0, y: 0.0 },
    GridPoint { x: 0.0,  y: 10.0 },
    GridPoint { x: 10.0, y: 10.0 },
    GridPoint { x: 20.0, y: 10.0 },
    GridPoint { x: 0.0,  y: 20.0 },
    GridPoint { x: 10.0, y: 20.0 },
    GridPoint { x: 20.0, y: 20.0 },
];

// ── StationNetwork ────────────────────────────────────────────────────────────

/// Undirected weighted graph over stations `1..=station_count`.
///
/// Edge weights must be strictly positive finite reals; this is asserted at
/// insertion so every downstream shortest-path total is well-ordered.
pub struct StationNetwork {
    station_count: u32,

    /// Directed edge list (two entries per route), kept for rebuilds.
    edges: Vec<RawEdge>,

    // ── CSR adjacency (rebuilt after every mutation) ──────────────────────
    /// Row pointer; neighbors of station `s` are at
    /// `adj_to[adj_start[s.index()] .. adj_start[s.index() + 1]]`.
    /// Length = `station_count + 2` (slot 0 unused).
    adj_start:  Vec<u32>,
    adj_to:     Vec<StationId>,
    adj_weight: Vec<f64>,
}

#[derive(Copy, Clone)]
struct RawEdge {
    from:   StationId,
    to:     StationId,
    weight: f64,
}

impl StationNetwork {
    /// An edgeless network over stations `1..=station_count`.
    pub fn new(station_count: u32) -> Self {
        let mut net = Self {
            station_count,
            edges:      Vec::new(),
            adj_start:  Vec::new(),
            adj_to:     Vec::new(),
            adj_weight: Vec::new(),
        };
        net.rebuild();
        net
    }

    /// A complete graph over `positions.len()` stations, each pair joined by
    /// its Euclidean distance.  Station `i + 1` sits at `positions[i]`.
    pub fn complete_from_positions(positions: &[GridPoint]) -> Self {
        let mut net = Self::new(positions.len() as u32);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                net.add_edge(
                    StationId(i as u32 + 1),
                    StationId(j as u32 + 1),
                    positions[i].distance(positions[j]),
                );
            }
        }
        net
    }

    /// The reference topology: stations 1..9 on the 3×3 grid, fully
    /// connected by Euclidean distances.
    pub fn grid_default() -> Self {
        Self::complete_from_positions(&DEFAULT_GRID)
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn station_count(&self) -> u32 {
        self.station_count
    }

    /// Number of undirected routes.
    pub fn route_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// `true` if `station` is one of this network's stations.
    #[inline]
    pub fn contains(&self, station: StationId) -> bool {
        station.0 >= 1 && station.0 <= self.station_count
    }

    /// Iterator over all station ids in ascending order.
    pub fn stations(&self) -> impl Iterator<Item = StationId> {
        (1..=self.station_count).map(StationId)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add an undirected route between `a` and `b` with the given weight.
    ///
    /// # Panics
    ///
    /// Panics if either station is outside the network, if `a == b`, or if
    /// `weight` is not a strictly positive finite real.  All three are
    /// construction-time programming errors, not runtime conditions.
    pub fn add_edge(&mut self, a: StationId, b: StationId, weight: f64) {
        assert!(self.contains(a), "unknown station {a}");
        assert!(self.contains(b), "unknown station {b}");
        assert!(a != b, "self-route at station {a}");
        assert!(
            weight.is_finite() && weight > 0.0,
            "route {a}-{b} has invalid weight {weight}"
        );
        self.edges.push(RawEdge { from: a, to: b, weight });
        self.edges.push(RawEdge { from: b, to: a, weight });
        self.rebuild();
    }

    /// Replace the whole edge set and rebuild adjacency.
    ///
    /// # Panics
    ///
    /// Same conditions as [`add_edge`](Self::add_edge), per entry.
    pub fn set_edges(&mut self, routes: impl IntoIterator<Item = (StationId, StationId, f64)>) {
        self.edges.clear();
        self.rebuild();
        for (a, b, w) in routes {
            self.add_edge(a, b, w);
        }
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Neighbors of `station` with edge weights, in ascending station order.
    ///
    /// Empty for stations outside the network.
    #[inline]
    pub fn neighbors(&self, station: StationId) -> impl Iterator<Item = (StationId, f64)> + '_ {
        let range = if self.contains(station) {
            let start = self.adj_start[station.index()] as usize;
            let end   = self.adj_start[station.index() + 1] as usize;
            start..end
        } else {
            0..0
        };
        range.map(|i| (self.adj_to[i], self.adj_weight[i]))
    }

    // ── Routing queries ───────────────────────────────────────────────────

    /// Total weight of the shortest path from `a` to `b`.
    ///
    /// `f64::INFINITY` when no path exists or either id is outside the
    /// network; `0.0` when `a == b`.
    pub fn distance(&self, a: StationId, b: StationId) -> f64 {
        self.paths_from(a).distance_to(b)
    }

    /// Station sequence of the shortest path from `a` to `b`, endpoints
    /// inclusive.
    ///
    /// Empty when no path exists or either id is outside the network;
    /// `[a]` when `a == b`.  Ties between equal-weight paths resolve
    /// deterministically toward smaller station ids.
    pub fn shortest_path(&self, a: StationId, b: StationId) -> Vec<StationId> {
        self.paths_from(a).path_to(b)
    }

    /// Single-source shortest paths from `a` — useful when scoring several
    /// targets against the same origin.
    pub fn paths_from(&self, a: StationId) -> ShortestPaths {
        router::shortest_paths(self, a)
    }

    // ── CSR rebuild ───────────────────────────────────────────────────────

    fn rebuild(&mut self) {
        let n = self.station_count as usize;

        // Sort by (from, to) so each adjacency row is in ascending station
        // order; Dijkstra relies on this for deterministic tie-breaking.
        self.edges
            .sort_unstable_by_key(|e| (e.from.0, e.to.0));

        self.adj_to     = self.edges.iter().map(|e| e.to).collect();
        self.adj_weight = self.edges.iter().map(|e| e.weight).collect();

        self.adj_start = vec![0u32; n + 2];
        for e in &self.edges {
            self.adj_start[e.from.index() + 1] += 1;
        }
        for i in 1..=(n + 1) {
            self.adj_start[i] += self.adj_start[i - 1];
        }
        debug_assert_eq!(self.adj_start[n + 1] as usize, self.edges.len());
    }
}
