//! `agv-network` — station graph and routing queries.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`network`] | `StationNetwork` (CSR adjacency, rebuildable edge set)   |
//! | [`router`]  | `ShortestPaths` — single-source Dijkstra results         |
//!
//! # Query contract
//!
//! `distance` answers `f64::INFINITY` and `shortest_path` answers an empty
//! path for unreachable pairs *and* for station ids outside the network —
//! a network without a charging station degrades to "charger unreachable"
//! instead of a panic.  Mutating the edge set (`add_edge`, `set_edges`)
//! rebuilds the adjacency structure; path queries always reflect the
//! current edges.

pub mod network;
pub mod router;


pub use network::StationNetwork;
pub use router::ShortestPaths;
