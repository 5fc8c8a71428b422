//! Command-line definition

use clap::{crate_version, value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn log_arg() -> Arg {
    Arg::new("log")
        .value_name("LOG")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Build or test log to analyse")
}

fn report_output_arg() -> Arg {
    Arg::new("output")
        .value_name("OUTPUT")
        .required(true)
        .help("Report destination file, or - for stdout")
}

fn output_flag() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("OUTPUT")
        .default_value("-")
        .help("Destination file, or - for stdout")
}

/// Flags shared by every subcommand
fn shared_args() -> [Arg; 8] {
    [
        Arg::new("encoding")
            .short('e')
            .long("encoding")
            .value_name("LABEL")
            .global(true)
            .help("Decode the log with this encoding instead of detecting it"),
        Arg::new("max-errors")
            .short('m')
            .long("max-errors")
            .value_name("N")
            .global(true)
            .value_parser(value_parser!(usize))
            .help("Maximum errors in a report [default: 5]"),
        Arg::new("context-after")
            .short('A')
            .long("context-after")
            .value_name("N")
            .global(true)
            .value_parser(value_parser!(usize))
            .help("Lines captured after each error [default: 20]"),
        Arg::new("context-before")
            .short('B')
            .long("context-before")
            .value_name("N")
            .global(true)
            .value_parser(value_parser!(usize))
            .help("Lines captured before each error [default: 0 for report, 2 for bug-report]"),
        Arg::new("tail")
            .long("tail")
            .value_name("N")
            .global(true)
            .value_parser(value_parser!(usize))
            .help("Lines shown when nothing matched, 0 to disable [default: 50]"),
        Arg::new("no-timestamp")
            .long("no-timestamp")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Omit the analysis time so output is reproducible"),
        Arg::new("config")
            .long("config")
            .value_name("FILE")
            .global(true)
            .value_parser(value_parser!(PathBuf))
            .help("TOML configuration file; flags override its values"),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Debug logging on stderr"),
    ]
}

/// Build the `loglens` command
pub(crate) fn command() -> Command {
    Command::new("loglens")
        .version(crate_version!())
        .about("Diagnose failures in build and test logs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(shared_args())
        .subcommand(
            Command::new("report")
                .about("Write the detailed diagnostic report")
                .arg(log_arg())
                .arg(report_output_arg()),
        )
        .subcommand(
            Command::new("bug-report")
                .about("Write the condensed bug report for the first failure")
                .arg(log_arg())
                .arg(report_output_arg()),
        )
        .subcommand(
            Command::new("search")
                .about("Search the log for a keyword")
                .arg(log_arg())
                .arg(
                    Arg::new("keyword")
                        .value_name("KEYWORD")
                        .required(true)
                        .help("Substring to look for"),
                )
                .arg(
                    Arg::new("regex")
                        .long("regex")
                        .action(ArgAction::SetTrue)
                        .help("Treat KEYWORD as a regular expression"),
                )
                .arg(
                    Arg::new("context")
                        .short('c')
                        .long("context")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Lines shown on each side of a match [default: 2]"),
                )
                .arg(
                    Arg::new("max-matches")
                        .short('n')
                        .long("max-matches")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Maximum matches shown [default: 10]"),
                )
                .arg(output_flag()),
        )
        .subcommand(
            Command::new("tail")
                .about("Show the last lines of the log")
                .arg(log_arg())
                .arg(
                    Arg::new("lines")
                        .short('n')
                        .long("lines")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Number of lines [default: 50]"),
                )
                .arg(output_flag()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn shared_flags_after_subcommand() {
        let matches = command()
            .try_get_matches_from(["loglens", "report", "build.log", "-", "-m", "3", "-B", "1"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "report");
        assert_eq!(args.get_one::<usize>("max-errors"), Some(&3));
        assert_eq!(args.get_one::<usize>("context-before"), Some(&1));
    }

    #[test]
    fn search_flags() {
        let matches = command()
            .try_get_matches_from([
                "loglens", "search", "b.log", "NPE", "--regex", "-c", "4", "-n", "2",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(args.get_flag("regex"));
        assert_eq!(args.get_one::<usize>("context"), Some(&4));
        assert_eq!(args.get_one::<String>("output").map(String::as_str), Some("-"));
    }

    #[test]
    fn output_required_for_reports() {
        assert!(command()
            .try_get_matches_from(["loglens", "bug-report", "build.log"])
            .is_err());
    }
}
