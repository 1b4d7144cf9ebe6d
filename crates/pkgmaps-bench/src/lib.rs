#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Benchmark harness for pkgmaps.
//!
//! Run benchmarks with: `cargo bench -p pkgmaps-bench`
