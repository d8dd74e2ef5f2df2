//! Simulator configuration
//!
//! Defaults match the real device. Each field can be overridden from the
//! environment:
//! - `ROBOT_SIM_ADDR`: listen address, e.g. `127.0.0.1:5002`
//! - `ROBOT_SIM_MOTION_TIME_MS`: motion time in milliseconds
//! - `ROBOT_SIM_SETTLE_DELAY_MS`: settle delay in milliseconds

use anyhow::{Context, Result};
use robot_sim_shared::RobotConfig;
use std::time::Duration;

/// Port the real robot listens on
pub const DEFAULT_PORT: u16 = 5002;

pub const ADDR_VAR: &str = "ROBOT_SIM_ADDR";
pub const MOTION_TIME_VAR: &str = "ROBOT_SIM_MOTION_TIME_MS";
pub const SETTLE_DELAY_VAR: &str = "ROBOT_SIM_SETTLE_DELAY_MS";

/// Configuration for the simulator process
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Address to accept controller connections on
    pub listen_addr: String,
    /// Timing of the simulated robot
    pub robot: RobotConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            robot: RobotConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ADDR_VAR) {
            self.listen_addr = addr;
        }
        if let Some(value) = lookup(MOTION_TIME_VAR) {
            self.robot.motion_time = parse_millis(MOTION_TIME_VAR, &value)?;
        }
        if let Some(value) = lookup(SETTLE_DELAY_VAR) {
            self.robot.settle_delay = parse_millis(SETTLE_DELAY_VAR, &value)?;
        }
        Ok(self)
    }
}

fn parse_millis(name: &str, value: &str) -> Result<Duration> {
    let ms: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of milliseconds, got '{}'", name, value))?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:5002");
        assert_eq!(config.robot.motion_time, Duration::from_secs(3));
        assert_eq!(config.robot.settle_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = SimulatorConfig::default()
            .with_overrides(lookup(&[
                (ADDR_VAR, "127.0.0.1:6000"),
                (MOTION_TIME_VAR, "250"),
                (SETTLE_DELAY_VAR, " 500 "),
            ]))
            .expect("overrides should apply");

        assert_eq!(config.listen_addr, "127.0.0.1:6000");
        assert_eq!(config.robot.motion_time, Duration::from_millis(250));
        assert_eq!(config.robot.settle_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = SimulatorConfig::default()
            .with_overrides(lookup(&[]))
            .expect("no overrides");
        assert_eq!(config.robot, RobotConfig::default());
    }

    #[test]
    fn test_invalid_override() {
        let result = SimulatorConfig::default().with_overrides(lookup(&[(MOTION_TIME_VAR, "3s")]));
        let err = result.expect_err("should reject non-numeric duration");
        assert!(err.to_string().contains(MOTION_TIME_VAR));
    }
}
