use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

pub const USAGE: &str = "\
Usage: puzzle_watcher [--config PATH] [COMMAND]

Commands:
  check          refresh if the last check is older than the interval, then list (default)
  list           show watched users and their open puzzles
  add <user>     watch a user and refresh
  remove <user>  stop watching a user
  refresh        refresh all watched users now
  help           show this text
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check,
    List,
    Add(String),
    Remove(String),
    Refresh,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config = None;
    let mut command = None;

    while let Some(arg) = args.next() {
        let next = match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("missing value for {arg}"))?;
                config = Some(PathBuf::from(path));
                continue;
            }
            "-h" | "--help" | "help" => Command::Help,
            "check" => Command::Check,
            "list" => Command::List,
            "refresh" => Command::Refresh,
            "add" => Command::Add(username_arg(&arg, args.next())?),
            "remove" | "rm" => Command::Remove(username_arg(&arg, args.next())?),
            other => bail!("unknown argument: {other}"),
        };
        if command.replace(next).is_some() {
            bail!("only one command may be given");
        }
    }

    Ok(Invocation {
        config,
        command: command.unwrap_or(Command::Check),
    })
}

fn username_arg(command: &str, value: Option<String>) -> Result<String> {
    let name = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        bail!("{command} needs a username");
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_args, Command, Invocation};

    fn parse(args: &[&str]) -> anyhow::Result<Invocation> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_means_check() {
        assert_eq!(
            parse(&[]).unwrap(),
            Invocation {
                config: None,
                command: Command::Check
            }
        );
    }

    #[test]
    fn add_takes_a_trimmed_username() {
        assert_eq!(
            parse(&["add", " alice "]).unwrap().command,
            Command::Add("alice".to_string())
        );
        assert!(parse(&["add"]).is_err());
        assert!(parse(&["remove", "  "]).is_err());
    }

    #[test]
    fn config_flag_may_precede_or_follow_command() {
        let before = parse(&["--config", "w.ron", "refresh"]).unwrap();
        let after = parse(&["refresh", "-c", "w.ron"]).unwrap();
        assert_eq!(before, after);
        assert_eq!(before.config, Some(PathBuf::from("w.ron")));
        assert_eq!(before.command, Command::Refresh);
    }

    #[test]
    fn rejects_unknown_and_repeated_commands() {
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&["list", "refresh"]).is_err());
        assert!(parse(&["--config"]).is_err());
    }
}
