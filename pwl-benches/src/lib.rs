//! Benchmark support for the pwl workspace.
//!
//! Supplies seeded random labelled graphs and the parameter types shared by
//! the Criterion benchmarks of the WL engine, the persistence calculator and
//! the end-to-end pipeline.

pub mod error;
pub mod params;
pub mod source;
