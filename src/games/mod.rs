//! Environment implementations.

pub mod klondike;
