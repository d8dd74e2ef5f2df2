//! Command executor - parses request lines and runs them on the robot

use robot_sim_shared::{Reply, Request, Robot, RobotError};
use tracing::debug;

/// Executes request lines against the simulated robot
///
/// Owns the single robot instance; sessions borrow the executor one at a time.
pub struct CommandExecutor {
    robot: Robot,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new(robot: Robot) -> Self {
        Self { robot }
    }

    /// Get the robot (for inspection)
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// Execute one trimmed request line
    ///
    /// Unrecognised lines run nothing and yield [`Reply::Silent`]. Busy replies
    /// are returned as `Ok`; only parse and consistency faults are errors.
    pub fn execute(&mut self, line: &str) -> Result<Reply, RobotError> {
        let Some(request) = Request::parse(line)? else {
            debug!("Ignoring unrecognised request '{}'", line);
            return Ok(Reply::Silent);
        };

        let robot = &mut self.robot;
        let reply = match request {
            Request::Dry => robot.dry(),
            Request::Center => robot.center(),
            Request::Safe => robot.safe(),
            Request::Status => robot.status(),
            Request::Clear => robot.clear(),
            Request::Mount(slot) => robot.mount(slot)?,
            Request::Dismount(slot) => robot.dismount(slot)?,
            Request::Check(slot) => robot.check(slot),
            Request::ScanPuck(puck) => robot.scan(puck),
            Request::Anneal(duration) => robot.anneal(duration),
        };

        Ok(reply)
    }
}
