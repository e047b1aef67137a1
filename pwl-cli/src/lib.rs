//! Library half of the `pwl` binary, split out so the commands can be
//! exercised in-process.

pub mod cli;
pub mod input;
pub mod logging;
