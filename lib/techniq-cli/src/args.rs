use std::time::Duration;

use anyhow::{Context, Result, bail};
use pico_args::Arguments;
use tracing::warn;

use techniq_fetch::api::{DrillCategory, DrillDifficulty, Equipment, FieldSize};

pub(crate) const USAGE: &str = "\
Usage:
  techniq fetch <BASE> <PATH> [--query name=value]... [--timeout SECS]
                [--resource-timeout SECS] [--token TOKEN] [--snake-case-keys]
  techniq drill <BASE> --user ID --skill TEXT [--position P] [--level L]
                [--category C] [--difficulty D] [--equipment E]... [--players N]
                [--field SIZE] [--token TOKEN]

`fetch` prints the payload keys as received unless --snake-case-keys is set.
`drill` defaults: position \"midfielder\", level \"intermediate\", category
\"technical\", difficulty \"intermediate\", field \"medium\".

The log level is read from RUST_LOG (default: info).";

const DEFAULT_POSITION: &str = "midfielder";
const DEFAULT_LEVEL: &str = "intermediate";

#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Fetch(FetchArgs),
    Drill(DrillArgs),
    Help,
}

impl Command {
    pub(crate) fn parse() -> Result<Self> {
        Self::from_args(Arguments::from_env())
    }

    fn from_args(mut pargs: Arguments) -> Result<Self> {
        if pargs.contains(["-h", "--help"]) {
            return Ok(Self::Help);
        }

        let command = match pargs.subcommand().context("reading command")?.as_deref() {
            Some("fetch") => Self::Fetch(FetchArgs::parse(&mut pargs)?),
            Some("drill") => Self::Drill(DrillArgs::parse(&mut pargs)?),
            Some(other) => bail!("unknown command '{other}'"),
            None => bail!("missing command"),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "unused arguments left");
        }
        Ok(command)
    }
}

/// Arguments of `techniq fetch`.
#[derive(Debug, PartialEq)]
pub(crate) struct FetchArgs {
    pub(crate) base: String,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) resource_timeout: Option<Duration>,
    pub(crate) token: Option<String>,
    pub(crate) snake_case_keys: bool,
}

impl FetchArgs {
    fn parse(pargs: &mut Arguments) -> Result<Self> {
        let query = pargs
            .values_from_fn("--query", parse_pair)
            .context("parsing query argument")?;
        let timeout = pargs
            .opt_value_from_fn("--timeout", parse_seconds)
            .context("parsing timeout argument")?;
        let resource_timeout = pargs
            .opt_value_from_fn("--resource-timeout", parse_seconds)
            .context("parsing resource timeout argument")?;
        let token = pargs
            .opt_value_from_str("--token")
            .context("parsing token argument")?;
        let snake_case_keys = pargs.contains("--snake-case-keys");

        // free arguments come last
        let base = pargs.free_from_str().context("missing base address")?;
        let path = pargs.free_from_str().context("missing path")?;

        Ok(Self {
            base,
            path,
            query,
            timeout,
            resource_timeout,
            token,
            snake_case_keys,
        })
    }
}

/// Arguments of `techniq drill`.
#[derive(Debug, PartialEq)]
pub(crate) struct DrillArgs {
    pub(crate) base: String,
    pub(crate) user: String,
    pub(crate) skill: String,
    pub(crate) position: String,
    pub(crate) level: String,
    pub(crate) category: DrillCategory,
    pub(crate) difficulty: DrillDifficulty,
    pub(crate) equipment: Vec<Equipment>,
    pub(crate) players: Option<u32>,
    pub(crate) field: FieldSize,
    pub(crate) token: Option<String>,
}

impl DrillArgs {
    fn parse(pargs: &mut Arguments) -> Result<Self> {
        let user = pargs
            .value_from_str("--user")
            .context("parsing user argument")?;
        let skill = pargs
            .value_from_str("--skill")
            .context("parsing skill argument")?;
        let position: Option<String> = pargs
            .opt_value_from_str("--position")
            .context("parsing position argument")?;
        let level: Option<String> = pargs
            .opt_value_from_str("--level")
            .context("parsing level argument")?;
        let category = pargs
            .opt_value_from_str("--category")
            .context("parsing category argument")?;
        let difficulty = pargs
            .opt_value_from_str("--difficulty")
            .context("parsing difficulty argument")?;
        let equipment = pargs
            .values_from_str("--equipment")
            .context("parsing equipment argument")?;
        let players = pargs
            .opt_value_from_str("--players")
            .context("parsing players argument")?;
        let field = pargs
            .opt_value_from_str("--field")
            .context("parsing field argument")?;
        let token = pargs
            .opt_value_from_str("--token")
            .context("parsing token argument")?;

        let base = pargs.free_from_str().context("missing base address")?;

        Ok(Self {
            base,
            user,
            skill,
            position: position.unwrap_or_else(|| DEFAULT_POSITION.to_string()),
            level: level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            category: category.unwrap_or_default(),
            difficulty: difficulty.unwrap_or_default(),
            equipment,
            players,
            field: field.unwrap_or_default(),
            token,
        })
    }
}

fn parse_pair(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{value}'"))
}

fn parse_seconds(value: &str) -> Result<Duration, std::num::ParseIntError> {
    value.parse().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        let args = args.iter().map(OsString::from).collect();
        Command::from_args(Arguments::from_vec(args))
    }

    #[test]
    fn test_parse_fetch() -> Result<()> {
        let command = parse(&[
            "fetch",
            "--query",
            "category=technical",
            "--query",
            "limit=3",
            "--timeout",
            "5",
            "--snake-case-keys",
            "https://api.example.com",
            "/exercises",
        ])?;

        let expected = Command::Fetch(FetchArgs {
            base: "https://api.example.com".to_string(),
            path: "/exercises".to_string(),
            query: vec![
                ("category".to_string(), "technical".to_string()),
                ("limit".to_string(), "3".to_string()),
            ],
            timeout: Some(Duration::from_secs(5)),
            resource_timeout: None,
            token: None,
            snake_case_keys: true,
        });
        assert_eq!(command, expected);
        Ok(())
    }

    #[test]
    fn test_parse_drill_with_defaults() -> Result<()> {
        let command = parse(&[
            "drill",
            "--user",
            "user-42",
            "--skill",
            "weak foot passing",
            "--equipment",
            "ball",
            "--equipment",
            "rebounder",
            "https://functions.example.com",
        ])?;

        let Command::Drill(args) = command else {
            bail!("expected a drill command, got {command:?}");
        };
        assert_eq!(args.base, "https://functions.example.com");
        assert_eq!(args.position, "midfielder");
        assert_eq!(args.level, "intermediate");
        assert_eq!(args.category, DrillCategory::Technical);
        assert_eq!(args.difficulty, DrillDifficulty::Intermediate);
        assert_eq!(args.field, FieldSize::Medium);
        assert_eq!(
            args.equipment,
            [Equipment::Ball, Equipment::Other("rebounder".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_parse_drill_player_profile() -> Result<()> {
        let command = parse(&[
            "drill",
            "--user",
            "user-42",
            "--skill",
            "heading",
            "--position",
            "defender",
            "--level",
            "advanced",
            "--difficulty",
            "beginner",
            "https://functions.example.com",
        ])?;

        let Command::Drill(args) = command else {
            bail!("expected a drill command, got {command:?}");
        };
        assert_eq!(args.position, "defender");
        assert_eq!(args.level, "advanced");
        assert_eq!(args.difficulty, DrillDifficulty::Beginner);
        Ok(())
    }

    #[test]
    fn test_fetch_keeps_keys_by_default() -> Result<()> {
        let command = parse(&["fetch", "https://api.example.com", "/exercises"])?;

        let Command::Fetch(args) = command else {
            bail!("expected a fetch command, got {command:?}");
        };
        assert!(!args.snake_case_keys);
        Ok(())
    }

    #[test]
    fn test_parse_help() -> Result<()> {
        assert_eq!(parse(&["drill", "--help"])?, Command::Help);
        Ok(())
    }

    #[rstest]
    #[case::no_command(&[])]
    #[case::unknown_command(&["upload"])]
    #[case::missing_path(&["fetch", "https://api.example.com"])]
    #[case::bad_query(&["fetch", "--query", "limit", "https://api.example.com", "/"])]
    #[case::bad_timeout(&["fetch", "--timeout", "soon", "https://api.example.com", "/"])]
    #[case::missing_skill(&["drill", "--user", "u", "https://api.example.com"])]
    #[case::unknown_field(&["drill", "--user", "u", "--skill", "s", "--field", "huge", "b"])]
    fn test_parse_usage_errors(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let result = parse(&["drill", "--user", "u", "--skill", "s", "--category", "magic", "b"]);

        let message = result.err().map(|err| format!("{err:#}")).unwrap_or_default();
        assert!(message.starts_with("parsing category argument: "), "{message}");
        assert!(message.ends_with("unknown drill category: 'magic'"), "{message}");
    }
}
