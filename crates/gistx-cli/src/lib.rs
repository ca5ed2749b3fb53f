//! Library side of the `gistx` command: configuration, logging, the run
//! pipeline and the run log.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod run_log;
pub mod types;
