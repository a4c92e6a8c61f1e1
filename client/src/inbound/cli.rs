//! Terminal front end: one command per line.
//!
//! Lines are parsed with `clap` into [`Command`]s and forwarded to the
//! session as [`ViewerEvent`]s. Invalid lines are logged and skipped.

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::domain::ports::MapEvent;
use crate::domain::{Coordinate, CoordinateError, ViewerEvent};

/// Commands accepted on the terminal.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Simulate a map click at the given position.
    Click {
        /// Latitude in degrees.
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in degrees.
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Re-request the device position.
    Locate,
    /// Jump to the teleport target.
    Teleport,
    /// Show the backend status.
    Status,
    /// End the session.
    Quit,
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// What a terminal line asks the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Forward an event to the controller.
    Event(ViewerEvent),
    /// Stop reading and close the session.
    Quit,
}

/// Reasons a terminal line was rejected.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The line did not match any command.
    #[error("{0}")]
    Syntax(#[from] clap::Error),
    /// The click position was out of range.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

impl TryFrom<Command> for Input {
    type Error = CoordinateError;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        let event = match command {
            Command::Click {
                latitude,
                longitude,
            } => ViewerEvent::Map(MapEvent::Click(Coordinate::new(latitude, longitude)?)),
            Command::Locate => ViewerEvent::LocateMe,
            Command::Teleport => ViewerEvent::Teleport,
            Command::Status => ViewerEvent::ShowStatus,
            Command::Quit => return Ok(Self::Quit),
        };
        Ok(Self::Event(event))
    }
}

/// Parse one terminal line. Blank lines yield `None`.
///
/// # Examples
///
/// ```rust
/// use client::domain::ViewerEvent;
/// use client::inbound::cli::{Input, interpret};
///
/// assert_eq!(interpret("teleport")?, Some(Input::Event(ViewerEvent::Teleport)));
/// assert_eq!(interpret("   ")?, None);
/// # Ok::<(), client::inbound::cli::CommandError>(())
/// ```
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands, bad arguments, or click
/// positions outside WGS84 ranges.
pub fn interpret(line: &str) -> Result<Option<Input>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    let parsed = CommandLine::try_parse_from(words)?;
    Ok(Some(Input::try_from(parsed.command)?))
}

/// Read commands from `reader` and forward them to `events` until `quit`,
/// end of input, or the session goes away.
///
/// # Errors
///
/// Returns an I/O error when reading from `reader` fails.
pub async fn forward_commands<R>(
    reader: R,
    events: UnboundedSender<ViewerEvent>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        match interpret(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => {
                info!("quit requested");
                break;
            }
            Ok(Some(Input::Event(event))) => {
                debug!(?event, "command accepted");
                if events.send(event).is_err() {
                    warn!("session closed; no longer reading commands");
                    break;
                }
            }
            Err(error) => warn!(line = %line, error = %error, "invalid command ignored"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Parsing and forwarding of terminal commands.

    use rstest::rstest;
    use tokio::sync::mpsc;

    use super::*;
    use crate::test_support::coordinate;

    #[rstest]
    #[case::click("click 37.7758 -122.4205", Input::Event(ViewerEvent::Map(MapEvent::Click(coordinate(37.7758, -122.4205)))))]
    #[case::locate("locate", Input::Event(ViewerEvent::LocateMe))]
    #[case::teleport("  teleport ", Input::Event(ViewerEvent::Teleport))]
    #[case::status("status", Input::Event(ViewerEvent::ShowStatus))]
    #[case::quit("quit", Input::Quit)]
    fn parses_commands(#[case] line: &str, #[case] expected: Input) {
        let input = interpret(line).expect("line parses");
        assert_eq!(input, Some(expected));
    }

    #[rstest]
    #[case::unknown("dance")]
    #[case::missing_longitude("click 1.0")]
    #[case::not_a_number("click north west")]
    fn rejects_malformed_lines(#[case] line: &str) {
        let error = interpret(line).expect_err("line must be rejected");
        assert!(matches!(error, CommandError::Syntax(_)));
    }

    #[test]
    fn rejects_out_of_range_clicks() {
        let error = interpret("click 91 0").expect_err("latitude out of range");
        assert!(matches!(
            error,
            CommandError::Coordinate(CoordinateError::LatitudeOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn forwards_until_quit_and_skips_bad_lines() {
        let script: &[u8] = b"click 51.5 -0.12\nbogus\n\nteleport\nquit\nstatus\n";
        let (tx, mut rx) = mpsc::unbounded_channel();

        forward_commands(script, tx).await.expect("script reads");

        assert_eq!(
            rx.recv().await,
            Some(ViewerEvent::Map(MapEvent::Click(coordinate(51.5, -0.12))))
        );
        assert_eq!(rx.recv().await, Some(ViewerEvent::Teleport));
        assert_eq!(rx.recv().await, None);
    }
}
