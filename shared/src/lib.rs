//! Robot Simulator Shared Types
//!
//! This crate provides the simulated robot, its dewar inventory, the line
//! protocol vocabulary and the codec used by the simulator server.

pub mod codec;
pub mod dewar;
pub mod protocol;
pub mod state_machine;

use thiserror::Error;

// Re-export commonly used types at crate root
pub use dewar::{Dewar, DewarError, Slot};
pub use protocol::{ParseError, Reply, Request};
pub use state_machine::{Robot, RobotConfig, RobotState};

/// Timing parameters of the real device
pub mod timing {
    /// Time a mount or dismount motion takes before status reports it done
    pub const MOTION_TIME_MS: u64 = 3000;

    /// Time a mount or dismount command blocks before replying
    pub const SETTLE_DELAY_MS: u64 = 5000;
}

/// Faults that end the connection that caused them
///
/// A busy robot is not a fault; it is reported on the wire as a [`Reply::Busy`].
#[derive(Error, Debug)]
pub enum RobotError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Consistency error: {0}")]
    Dewar(#[from] DewarError),

    #[error("Codec error: {0}")]
    Codec(#[from] codec::CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: RobotError = DewarError::NotInDewar(Slot::new('A', 1)).into();
        assert_eq!(err.to_string(), "Consistency error: Sample 1A not in dewar");

        let err: RobotError = ParseError::InvalidDuration("x".into()).into();
        assert!(matches!(err, RobotError::Parse(_)));
    }
}
