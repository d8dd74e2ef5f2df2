//! Robot State Machine
//!
//! Tracks what the gripper is doing and owns the dewar. Motion transitions
//! are timed but resolved lazily: nothing happens in the background, the
//! next status query notices that the motion time has passed.

use crate::dewar::{Dewar, DewarError, Slot};
use crate::protocol::{Reply, DISMOUNT_BUSY_CODE, MOUNT_BUSY_CODE};
use crate::timing;
use std::time::{Duration, Instant};
use tracing::debug;

/// Gripper state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RobotState {
    /// Nothing in the gripper
    Empty,
    /// Moving a sample from the dewar into the gripper
    Mounting,
    /// Moving a sample from the gripper back into the dewar
    Dismounting,
    /// Drying the gripper (no command enters this state)
    Drying,
    /// A sample is mounted
    Occupied,
}

impl RobotState {
    /// State a timed motion settles into, if this is a motion state
    pub fn resolves_to(self) -> Option<RobotState> {
        match self {
            RobotState::Mounting => Some(RobotState::Occupied),
            RobotState::Dismounting => Some(RobotState::Empty),
            _ => None,
        }
    }
}

/// Timing parameters for the simulated robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotConfig {
    /// How long a mount or dismount motion takes before status reports it finished
    pub motion_time: Duration,
    /// How long a mount or dismount command blocks before replying
    pub settle_delay: Duration,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            motion_time: Duration::from_millis(timing::MOTION_TIME_MS),
            settle_delay: Duration::from_millis(timing::SETTLE_DELAY_MS),
        }
    }
}

/// The simulated sample-handling robot
#[derive(Debug)]
pub struct Robot {
    config: RobotConfig,
    dewar: Dewar,
    state: RobotState,
    /// Set while mounting or dismounting
    transition_start: Option<Instant>,
}

impl Default for Robot {
    fn default() -> Self {
        Self::new(RobotConfig::default())
    }
}

impl Robot {
    /// Create a robot with an empty gripper and a full dewar
    pub fn new(config: RobotConfig) -> Self {
        Self::with_dewar(config, Dewar::full())
    }

    pub fn with_dewar(config: RobotConfig, dewar: Dewar) -> Self {
        Self {
            config,
            dewar,
            state: RobotState::Empty,
            transition_start: None,
        }
    }

    /// Current state, without resolving pending motions
    pub fn state(&self) -> RobotState {
        self.state
    }

    pub fn dewar(&self) -> &Dewar {
        &self.dewar
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// When the current motion began, if one is in progress
    pub fn transition_start(&self) -> Option<Instant> {
        self.transition_start
    }

    pub fn dry(&self) -> Reply {
        Reply::Acknowledged("Drying")
    }

    pub fn center(&self) -> Reply {
        Reply::Acknowledged("Moving to center")
    }

    pub fn safe(&self) -> Reply {
        Reply::Acknowledged("Moving to Safe")
    }

    /// Report the state, first settling a motion whose time is up
    pub fn status(&mut self) -> Reply {
        self.status_at(Instant::now())
    }

    /// Same as [`Robot::status`] with an explicit observation time
    pub fn status_at(&mut self, now: Instant) -> Reply {
        if let (Some(started), Some(next)) = (self.transition_start, self.state.resolves_to()) {
            if now.saturating_duration_since(started) > self.config.motion_time {
                debug!("Motion complete: {:?} -> {:?}", self.state, next);
                self.state = next;
                self.transition_start = None;
            }
        }

        Reply::Status(self.state)
    }

    /// Drop the mounted sample from tracking; only acts when occupied
    pub fn clear(&mut self) -> Reply {
        if self.state == RobotState::Occupied {
            debug!("Cleared: {:?} -> {:?}", self.state, RobotState::Empty);
            self.state = RobotState::Empty;
        }
        Reply::Silent
    }

    /// Take a sample from the dewar into the gripper
    ///
    /// Blocks the calling thread for the settle delay.
    pub fn mount(&mut self, slot: Slot) -> Result<Reply, DewarError> {
        if self.state != RobotState::Empty {
            return Ok(Reply::Busy(MOUNT_BUSY_CODE));
        }

        self.dewar.remove(slot)?;
        self.begin_motion(RobotState::Mounting);
        std::thread::sleep(self.config.settle_delay);

        Ok(Reply::Normal)
    }

    /// Return the mounted sample to the dewar
    ///
    /// Blocks the calling thread for the settle delay.
    pub fn dismount(&mut self, slot: Slot) -> Result<Reply, DewarError> {
        if self.state != RobotState::Occupied {
            return Ok(Reply::Busy(DISMOUNT_BUSY_CODE));
        }

        self.dewar.insert(slot)?;
        self.begin_motion(RobotState::Dismounting);
        std::thread::sleep(self.config.settle_delay);

        Ok(Reply::Normal)
    }

    /// Report whether a sample is in the dewar
    ///
    /// The real device driver also marks the gripper as occupied whenever a
    /// check is issued, whatever it was doing; that is reproduced here.
    pub fn check(&mut self, slot: Slot) -> Reply {
        if self.state != RobotState::Occupied {
            debug!("Check forces {:?} -> {:?}", self.state, RobotState::Occupied);
        }
        self.state = RobotState::Occupied;
        self.transition_start = None;

        Reply::Presence(self.dewar.contains(&slot))
    }

    pub fn scan(&self, _puck: char) -> Reply {
        Reply::Silent
    }

    pub fn anneal(&self, _duration: i128) -> Reply {
        Reply::Silent
    }

    fn begin_motion(&mut self, state: RobotState) {
        debug!("Motion started: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.transition_start = Some(Instant::now());
    }
}
