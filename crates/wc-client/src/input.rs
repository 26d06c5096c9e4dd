//! Line commands typed by the user

use thiserror::Error;
use wc_protocol::{OutboundCommand, PictureResolution, TurnDirection};

use crate::dispatch::View;

/// Help text printed for `help` and after a bad line
pub const USAGE: &str = "\
Commands:
  cw <deg>                              turn the bed clockwise
  ccw <deg>                             turn the bed counter-clockwise
  preview                               request a camera frame
  capture <name>                        run a capture loop into a project
  delete <name>                         delete a project
  create <name> <ppr> <res> [desc...]   create a project (res: 1, 2 or 3)
  email <name> <to>                     mail a zipped project
  zip <name>                            prepare a project archive
  info                                  refresh the project list
  view home|projects|control            switch view
  quit                                  exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Send a command to the scanner
    Command(OutboundCommand),
    /// Switch the active view
    Show(View),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Missing argument <{arg}> for '{command}'")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("Invalid value '{value}' for <{arg}>: {reason}")]
    InvalidArgument {
        arg: &'static str,
        value: String,
        reason: String,
    },
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "cw" => Input::Command(turn(TurnDirection::Clockwise, "cw", words.next())?),
        "ccw" => Input::Command(turn(TurnDirection::CounterClockwise, "ccw", words.next())?),
        "preview" => Input::Command(OutboundCommand::CameraPreview),
        "capture" => Input::Command(OutboundCommand::loop_capture(required(
            "capture",
            "name",
            words.next(),
        )?)),
        "delete" => Input::Command(OutboundCommand::delete_project(required(
            "delete",
            "name",
            words.next(),
        )?)),
        "create" => {
            let name = required("create", "name", words.next())?;
            let ppr = required("create", "ppr", words.next())?;
            let res = required("create", "res", words.next())?;
            let description = words.collect::<Vec<_>>().join(" ");

            let pict_per_rotation = ppr.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                InputError::InvalidArgument {
                    arg: "ppr",
                    value: ppr.to_string(),
                    reason: "expected a positive whole number".to_string(),
                }
            })?;
            let resolution = PictureResolution::from_wire(res).ok_or_else(|| {
                InputError::InvalidArgument {
                    arg: "res",
                    value: res.to_string(),
                    reason: "expected 1, 2 or 3".to_string(),
                }
            })?;

            Input::Command(OutboundCommand::create_project(
                name,
                description,
                pict_per_rotation,
                resolution,
            ))
        }
        "email" => {
            let name = required("email", "name", words.next())?;
            let to = required("email", "to", words.next())?;
            Input::Command(OutboundCommand::upload_by_email(name, to))
        }
        "zip" => Input::Command(OutboundCommand::zip_data(required(
            "zip",
            "name",
            words.next(),
        )?)),
        "info" => Input::Command(OutboundCommand::RequestProjectInfo),
        "view" => {
            let value = required("view", "page", words.next())?;
            let view = value
                .parse::<View>()
                .map_err(|reason| InputError::InvalidArgument {
                    arg: "page",
                    value: value.to_string(),
                    reason,
                })?;
            Input::Show(view)
        }
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(Some(input))
}

fn required<'a>(
    command: &'static str,
    arg: &'static str,
    word: Option<&'a str>,
) -> Result<&'a str, InputError> {
    word.ok_or(InputError::MissingArgument { command, arg })
}

fn turn(
    direction: TurnDirection,
    command: &'static str,
    word: Option<&str>,
) -> Result<OutboundCommand, InputError> {
    let value = required(command, "deg", word)?;
    let degrees = value
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| InputError::InvalidArgument {
            arg: "deg",
            value: value.to_string(),
            reason: "expected a number of degrees".to_string(),
        })?;
    Ok(OutboundCommand::turn_bed(direction, degrees))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> OutboundCommand {
        match parse_line(line) {
            Ok(Some(Input::Command(command))) => command,
            other => panic!("expected a command from {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn test_turn_commands() {
        assert_eq!(
            command("cw 15"),
            OutboundCommand::TurnBedCw {
                plateau_degree: "15".to_string()
            }
        );
        assert_eq!(
            command("CCW 7.5"),
            OutboundCommand::TurnBedCcw {
                plateau_degree: "7.5".to_string()
            }
        );
        assert!(matches!(
            parse_line("cw left"),
            Err(InputError::InvalidArgument { arg: "deg", .. })
        ));
    }

    #[test]
    fn test_create_with_description() {
        assert_eq!(
            command("create P1 10 2 a small vase"),
            OutboundCommand::CreateProject {
                project_name: "P1".to_string(),
                description: "a small vase".to_string(),
                pict_per_rotation: "10".to_string(),
                pict_res: "1640x1232".to_string(),
            }
        );
    }

    #[test]
    fn test_create_rejects_bad_values() {
        assert!(matches!(
            parse_line("create P1 0 2"),
            Err(InputError::InvalidArgument { arg: "ppr", .. })
        ));
        assert!(matches!(
            parse_line("create P1 10 9"),
            Err(InputError::InvalidArgument { arg: "res", .. })
        ));
        assert_eq!(
            parse_line("create P1 10"),
            Err(InputError::MissingArgument {
                command: "create",
                arg: "res"
            })
        );
    }

    #[test]
    fn test_project_commands() {
        assert_eq!(command("capture P1"), OutboundCommand::loop_capture("P1"));
        assert_eq!(command("delete P1"), OutboundCommand::delete_project("P1"));
        assert_eq!(command("zip P1"), OutboundCommand::zip_data("P1"));
        assert_eq!(
            command("email P1 me@example.com"),
            OutboundCommand::upload_by_email("P1", "me@example.com")
        );
        assert_eq!(command("info"), OutboundCommand::RequestProjectInfo);
        assert_eq!(command("preview"), OutboundCommand::CameraPreview);
    }

    #[test]
    fn test_view_and_control_lines() {
        assert_eq!(parse_line("view projects"), Ok(Some(Input::Show(View::Projects))));
        assert_eq!(parse_line("quit"), Ok(Some(Input::Quit)));
        assert_eq!(parse_line("help"), Ok(Some(Input::Help)));
        assert!(parse_line("view garage").is_err());
        assert_eq!(
            parse_line("dance"),
            Err(InputError::UnknownCommand("dance".to_string()))
        );
    }
}
