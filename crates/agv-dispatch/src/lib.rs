//! `agv-dispatch` — per-tick action selection for idle vehicles.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`action`]  | `DispatchAction`, `HopPurpose`                        |
//! | [`context`] | `DispatchContext` — read-only world view              |
//! | [`policy`]  | `DispatchPolicy` trait, `PriorityLadder`              |
//!
//! The simulation loop calls [`DispatchPolicy::decide`] once per idle
//! vehicle per tick, in fleet order, and applies the returned action
//! itself.  Policies never mutate anything — that keeps every decision
//! replayable from the context alone.

pub mod action;
pub mod context;
pub mod policy;


pub use action::{DispatchAction, HopPurpose};
pub use context::DispatchContext;
pub use policy::{DispatchPolicy, PriorityLadder};
