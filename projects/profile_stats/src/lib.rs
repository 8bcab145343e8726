//! Profile README statistics job
//!
//! - Repository listing and per-repository metrics in `stats/`
//! - Cross-repository totals and markdown rendering in `utils/`
//! - Commit and push of the rendered README in `publish`
//! - One full run in `cycle`; the scheduling loop lives in `bin/main.rs`
//! - Requires a GitHub token with access to the traffic endpoints

pub mod config;
pub mod cycle;
pub mod hosting;
pub mod publish;
pub mod stats;
pub mod utils;

#[cfg(test)]
mod test_support;
