//! Line protocol vocabulary
//!
//! Requests are single text lines such as `MOUNT 1A` or `STATUS`. Replies are
//! short text lines; some operations reply with nothing at all.

use crate::dewar::Slot;
use crate::state_machine::RobotState;
use std::str::FromStr;
use thiserror::Error;

/// Busy code returned by `MOUNT` when the gripper is not empty
pub const MOUNT_BUSY_CODE: u8 = 64;

/// Busy code returned by `DISMOUNT` when the gripper holds no sample
pub const DISMOUNT_BUSY_CODE: u8 = 8;

/// Wire code reported by `STATUS` for a state
///
/// The codes are a fixed table, not the enum's discriminants.
pub fn status_code(state: RobotState) -> &'static str {
    match state {
        RobotState::Empty => "0",
        RobotState::Mounting => "1",
        RobotState::Dismounting => "2",
        RobotState::Drying => "4",
        RobotState::Occupied => "8",
    }
}

/// Malformed request arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected '<verb> <sample><puck>', got '{0}'")]
    FieldCount(String),

    #[error("Unknown sample command '{0}'")]
    UnknownVerb(String),

    #[error("Missing sample position")]
    MissingSlot,

    #[error("Invalid sample number in '{0}'")]
    InvalidSample(String),

    #[error("Invalid anneal duration '{0}'")]
    InvalidDuration(String),
}

/// Parses `<sample><puck>`, e.g. `12C`
///
/// The last character is always taken as the puck label; neither it nor the
/// (signed) sample number is checked against the dewar's grid.
impl FromStr for Slot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let puck = s.chars().last().ok_or(ParseError::MissingSlot)?;
        let number = &s[..s.len() - puck.len_utf8()];
        let sample = number
            .parse()
            .map_err(|_| ParseError::InvalidSample(s.to_string()))?;
        Ok(Slot::new(puck, sample))
    }
}

/// A recognised request line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Dry,
    Center,
    Status,
    Clear,
    Safe,
    Mount(Slot),
    Dismount(Slot),
    Check(Slot),
    ScanPuck(char),
    Anneal(i128),
}

const SAMPLE_VERBS: [&str; 3] = ["MOUNT", "DISMOUNT", "CHECK"];

impl Request {
    /// Parse a trimmed request line
    ///
    /// Returns:
    /// - `Ok(Some(request))` for a recognised command
    /// - `Ok(None)` for text that matches no command (ignored silently)
    /// - `Err(...)` when a command is recognised but its arguments are malformed
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let request = match line {
            "DRY" => Self::Dry,
            "CENTER" => Self::Center,
            "STATUS" => Self::Status,
            "CLEAR" => Self::Clear,
            "SAFE" => Self::Safe,
            _ if SAMPLE_VERBS.iter().any(|verb| line.starts_with(verb)) => {
                Self::parse_sample_command(line)?
            }
            _ if line.starts_with("SCANPUCK") => match line.chars().last() {
                Some(puck) => Self::ScanPuck(puck),
                None => return Ok(None),
            },
            _ if line.starts_with("ANNEAL") => {
                let field = line.rsplit(' ').next().unwrap_or(line);
                let duration = field
                    .parse()
                    .map_err(|_| ParseError::InvalidDuration(field.to_string()))?;
                Self::Anneal(duration)
            }
            _ => return Ok(None),
        };

        Ok(Some(request))
    }

    fn parse_sample_command(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(' ').collect();
        let &[verb, position] = fields.as_slice() else {
            return Err(ParseError::FieldCount(line.to_string()));
        };

        let slot: Slot = position.parse()?;

        match verb {
            "MOUNT" => Ok(Self::Mount(slot)),
            "DISMOUNT" => Ok(Self::Dismount(slot)),
            "CHECK" => Ok(Self::Check(slot)),
            other => Err(ParseError::UnknownVerb(other.to_string())),
        }
    }
}

/// Outcome of a robot operation, before rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Bare `normal`
    Normal,
    /// `normal <message>`
    Acknowledged(&'static str),
    /// `error <code>`: the robot is not in the required state
    Busy(u8),
    /// Wire status code of a state
    Status(RobotState),
    /// `1` if the sample is in the dewar, `0` otherwise
    Presence(bool),
    /// No reply line at all
    Silent,
}

impl Reply {
    /// Render the reply text, or `None` if nothing goes on the wire
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Normal => Some("normal".into()),
            Self::Acknowledged(message) => Some(format!("normal {}", message)),
            Self::Busy(code) => Some(format!("error {}", code)),
            Self::Status(state) => Some(status_code(*state).into()),
            Self::Presence(present) => Some(if *present { "1" } else { "0" }.into()),
            Self::Silent => None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_not_ordinals() {
        assert_eq!(status_code(RobotState::Empty), "0");
        assert_eq!(status_code(RobotState::Mounting), "1");
        assert_eq!(status_code(RobotState::Dismounting), "2");
        assert_eq!(status_code(RobotState::Drying), "4");
        assert_eq!(status_code(RobotState::Occupied), "8");
    }

    #[test]
    fn test_parse_bare_verbs() {
        assert_eq!(Request::parse("DRY"), Ok(Some(Request::Dry)));
        assert_eq!(Request::parse("CENTER"), Ok(Some(Request::Center)));
        assert_eq!(Request::parse("STATUS"), Ok(Some(Request::Status)));
        assert_eq!(Request::parse("CLEAR"), Ok(Some(Request::Clear)));
        assert_eq!(Request::parse("SAFE"), Ok(Some(Request::Safe)));
    }

    #[test]
    fn test_parse_sample_commands() {
        assert_eq!(
            Request::parse("MOUNT 1A"),
            Ok(Some(Request::Mount(Slot::new('A', 1))))
        );
        assert_eq!(
            Request::parse("DISMOUNT 16P"),
            Ok(Some(Request::Dismount(Slot::new('P', 16))))
        );
        assert_eq!(
            Request::parse("CHECK 5B"),
            Ok(Some(Request::Check(Slot::new('B', 5))))
        );
    }

    #[test]
    fn test_parse_sample_command_faults() {
        assert_eq!(
            Request::parse("MOUNT xA"),
            Err(ParseError::InvalidSample("xA".into()))
        );
        // Only the label is stripped, so the number must be the whole prefix
        assert_eq!(
            Request::parse("MOUNT 1AB"),
            Err(ParseError::InvalidSample("1AB".into()))
        );
        assert_eq!(
            Request::parse("MOUNT"),
            Err(ParseError::FieldCount("MOUNT".into()))
        );
        assert_eq!(
            Request::parse("MOUNT 1A 2B"),
            Err(ParseError::FieldCount("MOUNT 1A 2B".into()))
        );
        assert_eq!(Request::parse("CHECK A"), Err(ParseError::InvalidSample("A".into())));
        assert_eq!(Request::parse("CHECK  1A"), Err(ParseError::FieldCount("CHECK  1A".into())));
    }

    #[test]
    fn test_prefix_match_requires_exact_verb() {
        // Matched by prefix, then rejected because the verb is not exact
        assert_eq!(
            Request::parse("CHECKS 1A"),
            Err(ParseError::UnknownVerb("CHECKS".into()))
        );
        assert_eq!(
            Request::parse("MOUNTX 1A"),
            Err(ParseError::UnknownVerb("MOUNTX".into()))
        );
    }

    #[test]
    fn test_parse_signed_and_wide_sample_numbers() {
        assert_eq!(
            Request::parse("CHECK -1A"),
            Ok(Some(Request::Check(Slot::new('A', -1))))
        );
        assert_eq!(
            Request::parse("MOUNT 4294967296A"),
            Ok(Some(Request::Mount(Slot::new('A', 4_294_967_296))))
        );
        assert_eq!(
            Request::parse("DISMOUNT +3B"),
            Ok(Some(Request::Dismount(Slot::new('B', 3))))
        );
    }

    #[test]
    fn test_parse_label_is_not_validated() {
        assert_eq!(
            Request::parse("CHECK 11"),
            Ok(Some(Request::Check(Slot::new('1', 1))))
        );
    }

    #[test]
    fn test_parse_scanpuck_takes_last_character() {
        assert_eq!(Request::parse("SCANPUCK C"), Ok(Some(Request::ScanPuck('C'))));
        assert_eq!(Request::parse("SCANPUCK"), Ok(Some(Request::ScanPuck('K'))));
    }

    #[test]
    fn test_parse_anneal() {
        assert_eq!(Request::parse("ANNEAL 10"), Ok(Some(Request::Anneal(10))));
        assert_eq!(Request::parse("ANNEAL  3"), Ok(Some(Request::Anneal(3))));
        assert_eq!(Request::parse("ANNEAL -2"), Ok(Some(Request::Anneal(-2))));
        assert_eq!(
            Request::parse("ANNEAL 99999999999999999999"),
            Ok(Some(Request::Anneal(99_999_999_999_999_999_999)))
        );
        assert_eq!(
            Request::parse("ANNEAL"),
            Err(ParseError::InvalidDuration("ANNEAL".into()))
        );
        assert_eq!(
            Request::parse("ANNEAL soon"),
            Err(ParseError::InvalidDuration("soon".into()))
        );
    }

    #[test]
    fn test_unrecognised_lines_are_ignored() {
        assert_eq!(Request::parse("FOO"), Ok(None));
        assert_eq!(Request::parse(""), Ok(None));
        assert_eq!(Request::parse("status"), Ok(None));
        assert_eq!(Request::parse("STATUSX"), Ok(None));
    }

    #[test]
    fn test_reply_rendering() {
        assert_eq!(Reply::Normal.render().as_deref(), Some("normal"));
        assert_eq!(
            Reply::Acknowledged("Drying").render().as_deref(),
            Some("normal Drying")
        );
        assert_eq!(Reply::Busy(MOUNT_BUSY_CODE).render().as_deref(), Some("error 64"));
        assert_eq!(Reply::Busy(DISMOUNT_BUSY_CODE).render().as_deref(), Some("error 8"));
        assert_eq!(Reply::Status(RobotState::Occupied).render().as_deref(), Some("8"));
        assert_eq!(Reply::Presence(true).render().as_deref(), Some("1"));
        assert_eq!(Reply::Presence(false).render().as_deref(), Some("0"));
        assert_eq!(Reply::Silent.render(), None);
    }
}
