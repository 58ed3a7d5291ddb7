use clap::Parser;
use std::path::PathBuf;

use crate::errors::{CalendarError, CalendarResult};
use crate::transport::TransportMode;

pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_DAYS: u32 = 7;
/// Largest accepted `--days`, roughly 100,000 years
pub const MAX_DAYS: u32 = 36_500_000;

/// Flags recognized regardless of the case they are typed in
const CASE_INSENSITIVE_FLAGS: &[&str] = &["--mock", "--calendarId", "--days", "--summary", "--debug", "--config"];
/// Flags that take the following argument as their value
const VALUE_FLAGS: &[&str] = &["--calendarId", "--days", "--config"];
/// Passed through untouched so clap can answer them
const HELP_FLAGS: &[&str] = &["-h", "--help"];

pub const USAGE: &str = "\
Usage:
    calendar-cli calendars [--mock]
    calendar-cli events [--calendarId <id>] [--days N] [--mock] [--summary]

Commands:
    calendars    List the calendars on the account (id and name)
    events       List events from now until N days ahead (default 7) in one calendar (default primary)

Options:
    --mock       Answer from built-in sample data; no network, no sign-in
    --summary    Also print a 'Summary | Start -> End' table after the events
    --debug      Verbose logging on stderr
    --config     Path to a TOML configuration file
";

#[derive(Parser, Debug)]
#[command(name = "calendar-cli")]
#[command(about = "Google Calendar command-line client")]
pub struct Cli {
    /// Command to run: `calendars` or `events`
    pub command: Option<String>,

    /// Serve built-in sample responses instead of calling Google
    #[arg(long)]
    pub mock: bool,

    /// Calendar to list events from
    #[arg(long = "calendarId", value_name = "ID")]
    pub calendar_id: Option<String>,

    /// How many days ahead to list events for
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub days: Option<String>,

    /// Print a plain-text summary after the events
    #[arg(long)]
    pub summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn transport_mode(&self) -> TransportMode {
        TransportMode::from_mock_flag(self.mock)
    }
}

/// Reduce argv to what the parser understands.
///
/// Flags typed in any case (`--CALENDARID`, `--Days=3`) are rewritten to their canonical
/// spelling. Only the first positional argument and the first occurrence of each known flag
/// survive; unknown flags, extra positionals and a value flag missing its value are dropped
/// so that they fall back to defaults. The first element is the program name and is left alone.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut kept: Vec<String> = args.next().into_iter().collect();
    let mut seen: Vec<String> = Vec::new();
    let mut has_command = false;

    while let Some(arg) = args.next() {
        let arg = canonical_flag(arg);
        let name = arg.split_once('=').map_or(arg.as_str(), |(name, _)| name).to_string();

        if HELP_FLAGS.contains(&name.as_str()) {
            kept.push(arg);
        } else if VALUE_FLAGS.contains(&name.as_str()) {
            let value = if arg.contains('=') {
                Some(arg)
            } else {
                args.next().map(|value| format!("{}={}", name, value))
            };
            if let Some(flag) = value {
                if !seen.contains(&name) {
                    kept.push(flag);
                    seen.push(name);
                }
            }
        } else if CASE_INSENSITIVE_FLAGS.contains(&name.as_str()) || name == "-d" {
            let name = if name == "-d" { "--debug".to_string() } else { name };
            if !arg.contains('=') && !seen.contains(&name) {
                kept.push(name.clone());
                seen.push(name);
            }
        } else if !arg.starts_with('-') && !has_command {
            kept.push(arg);
            has_command = true;
        }
    }
    kept
}

fn canonical_flag(arg: String) -> String {
    let (name, value) = match arg.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (arg.as_str(), None),
    };

    match CASE_INSENSITIVE_FLAGS.iter().find(|flag| name.eq_ignore_ascii_case(flag)) {
        Some(flag) => match value {
            Some(value) => format!("{}={}", flag, value),
            None => flag.to_string(),
        },
        None => arg,
    }
}

/// What a single run of the program does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListCalendars,
    ListEvents { calendar_id: String, days: u32 },
    Unknown,
}

impl Command {
    /// Resolve the command and its flags. Only `--days` can fail, and only for `events`.
    pub fn from_cli(cli: &Cli) -> CalendarResult<Self> {
        match cli.command.as_deref() {
            Some("calendars") => Ok(Command::ListCalendars),
            Some("events") => Ok(Command::ListEvents {
                calendar_id: cli
                    .calendar_id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
                days: parse_days(cli.days.as_deref())?,
            }),
            _ => Ok(Command::Unknown),
        }
    }
}

fn parse_days(raw: Option<&str>) -> CalendarResult<u32> {
    match raw {
        None => Ok(DEFAULT_DAYS),
        Some(value) => {
            let days = value.trim().parse::<u32>().map_err(|e| CalendarError::Validation {
                field: "--days".to_string(),
                message: format!("'{}' is not a non-negative whole number ({})", value, e),
            })?;
            if days > MAX_DAYS {
                return Err(CalendarError::Validation {
                    field: "--days".to_string(),
                    message: format!("{} is larger than the maximum of {}", days, MAX_DAYS),
                });
            }
            Ok(days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("calendar-cli")
            .chain(args.iter().copied())
            .map(String::from);
        Cli::try_parse_from(normalize_args(argv)).unwrap()
    }

    #[test]
    fn test_no_arguments_is_unknown() {
        let cli = parse(&[]);
        assert_eq!(Command::from_cli(&cli).unwrap(), Command::Unknown);
        assert_eq!(cli.transport_mode(), TransportMode::Live);
    }

    #[test]
    fn test_unrecognized_command_is_unknown() {
        let cli = parse(&["agenda", "--mock"]);
        assert_eq!(Command::from_cli(&cli).unwrap(), Command::Unknown);
    }

    #[test]
    fn test_calendars() {
        let cli = parse(&["calendars", "--mock"]);
        assert_eq!(Command::from_cli(&cli).unwrap(), Command::ListCalendars);
        assert_eq!(cli.transport_mode(), TransportMode::Mock);
    }

    #[test]
    fn test_events_defaults() {
        let cli = parse(&["events"]);
        assert_eq!(
            Command::from_cli(&cli).unwrap(),
            Command::ListEvents {
                calendar_id: "primary".to_string(),
                days: 7
            }
        );
    }

    #[test]
    fn test_flags_are_case_insensitive() {
        let cli = parse(&["events", "--CALENDARID", "team@example.com", "--Days", "3", "--MOCK"]);
        assert_eq!(cli.transport_mode(), TransportMode::Mock);
        assert_eq!(
            Command::from_cli(&cli).unwrap(),
            Command::ListEvents {
                calendar_id: "team@example.com".to_string(),
                days: 3
            }
        );
    }

    #[test]
    fn test_flag_with_equals_value() {
        let cli = parse(&["events", "--DAYS=14", "--mock"]);
        assert_eq!(
            Command::from_cli(&cli).unwrap(),
            Command::ListEvents {
                calendar_id: "primary".to_string(),
                days: 14
            }
        );
    }

    #[test]
    fn test_mock_anywhere() {
        let cli = parse(&["--Mock", "events", "--days", "1"]);
        assert_eq!(cli.transport_mode(), TransportMode::Mock);
        assert!(matches!(Command::from_cli(&cli).unwrap(), Command::ListEvents { days: 1, .. }));
    }

    #[test]
    fn test_non_numeric_days_rejected() {
        let cli = parse(&["events", "--days", "abc", "--mock"]);
        let err = Command::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CalendarError::Validation { ref field, .. } if field == "--days"));
    }

    #[test]
    fn test_negative_days_rejected() {
        let cli = parse(&["events", "--days", "-2"]);
        assert!(Command::from_cli(&cli).is_err());
    }

    #[test]
    fn test_days_ignored_for_calendars() {
        let cli = parse(&["calendars", "--days", "abc"]);
        assert_eq!(Command::from_cli(&cli).unwrap(), Command::ListCalendars);
    }

    #[test]
    fn test_values_keep_their_case() {
        let args = normalize_args(
            ["calendar-cli", "events", "--calendarid", "Team@Example.com"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(args, vec!["calendar-cli", "events", "--calendarId=Team@Example.com"]);
    }

    #[test]
    fn test_largest_days_accepted() {
        let days = MAX_DAYS.to_string();
        let cli = parse(&["events", "--days", &days]);
        assert!(matches!(
            Command::from_cli(&cli).unwrap(),
            Command::ListEvents { days, .. } if days == MAX_DAYS
        ));
    }

    #[test]
    fn test_days_above_maximum_rejected() {
        let days = (MAX_DAYS + 1).to_string();
        let cli = parse(&["events", "--days", &days]);
        let err = Command::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CalendarError::Validation { ref field, .. } if field == "--days"));

        let cli = parse(&["events", "--days", "99999999"]);
        assert!(Command::from_cli(&cli).is_err());
    }

    #[test]
    fn test_extra_positionals_are_ignored() {
        let cli = parse(&["foo", "bar"]);
        assert_eq!(cli.command.as_deref(), Some("foo"));
        assert_eq!(Command::from_cli(&cli).unwrap(), Command::Unknown);

        let cli = parse(&["events", "--mock", "--days", "3", "extra"]);
        assert!(matches!(Command::from_cli(&cli).unwrap(), Command::ListEvents { days: 3, .. }));
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let cli = parse(&["events", "--mock", "--verbose", "-x"]);
        assert_eq!(cli.transport_mode(), TransportMode::Mock);
        assert!(matches!(Command::from_cli(&cli).unwrap(), Command::ListEvents { days: 7, .. }));
    }

    #[test]
    fn test_trailing_value_flag_falls_back_to_default() {
        let cli = parse(&["events", "--mock", "--calendarId"]);
        assert_eq!(
            Command::from_cli(&cli).unwrap(),
            Command::ListEvents {
                calendar_id: "primary".to_string(),
                days: 7
            }
        );
    }

    #[test]
    fn test_repeated_flags_use_first_occurrence() {
        let cli = parse(&["events", "--mock", "--MOCK", "--days", "2", "--days", "5"]);
        assert!(matches!(Command::from_cli(&cli).unwrap(), Command::ListEvents { days: 2, .. }));
    }

    #[test]
    fn test_value_may_look_like_a_flag() {
        let cli = parse(&["events", "--calendarId", "-odd-id", "--days", "-2"]);
        assert_eq!(cli.calendar_id.as_deref(), Some("-odd-id"));
        assert!(Command::from_cli(&cli).is_err());
    }
}
