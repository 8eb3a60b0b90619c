//! Read-only views of externally owned checkout state.
//!
//! # Responsibility
//! - Define the cart line and delivery group shapes pushed by the platform.
//! - Keep identifiers opaque and strongly typed.
//!
//! # Invariants
//! - Core never mutates these records; changes go through `CartLineMutator`.
//! - Every feed emission is a full snapshot, never a diff.

pub mod cart;
pub mod delivery;
