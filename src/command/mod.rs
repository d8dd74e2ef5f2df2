//! Command execution for the simulator
//!
//! This module handles:
//! - Parsing request lines into robot commands
//! - Running them against the single robot instance
//! - Returning the reply to render on the wire

mod executor;

pub use executor::CommandExecutor;
