//! End-to-end builds against the grass backend.

mod harness;

mod incremental;
mod partials;
mod rebuild;
