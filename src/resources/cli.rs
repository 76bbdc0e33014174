use std::path::PathBuf;

use bevy::prelude::*;

/// Command-line arguments parsed at startup.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// Settings file to load instead of the default location.
    /// Usage: `cargo run -- --settings <path>`
    pub settings: Option<PathBuf>,

    /// Recorded detector frames to play back instead of the demo layout.
    /// Usage: `cargo run -- --replay <path>`
    pub replay: Option<PathBuf>,

    /// Start with debug drawing enabled, overriding the settings file.
    pub debug: bool,
}

impl CliArgs {
    /// Parse the process arguments.
    pub fn parse() -> Self {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse arguments without the program name.
    /// Supports:
    /// - `--settings <path>`: Load settings from this JSON file
    /// - `--replay <path>`: Replay recorded marker frames from JSON
    /// - `--debug`: Enable debug drawing
    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Self {
        let args: Vec<String> = args.into_iter().collect();
        let mut cli = CliArgs::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--settings" | "--replay" => {
                    let flag = args[i].as_str();
                    if i + 1 < args.len() {
                        let path = PathBuf::from(&args[i + 1]);
                        info!("CLI: {} {:?}", flag, path);
                        if flag == "--settings" {
                            cli.settings = Some(path);
                        } else {
                            cli.replay = Some(path);
                        }
                        i += 2;
                    } else {
                        warn!("CLI: {} requires a path argument", flag);
                        i += 1;
                    }
                }
                "--debug" => {
                    cli.debug = true;
                    i += 1;
                }
                arg => {
                    if arg.starts_with('-') {
                        warn!("CLI: Unknown argument '{}'", arg);
                    }
                    i += 1;
                }
            }
        }

        cli
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = CliArgs::parse_from(args(&["--settings", "a.json", "--replay", "r.json", "--debug"]));
        assert_eq!(cli.settings, Some(PathBuf::from("a.json")));
        assert_eq!(cli.replay, Some(PathBuf::from("r.json")));
        assert!(cli.debug);
    }

    #[test]
    fn test_missing_value_is_ignored() {
        let cli = CliArgs::parse_from(args(&["--replay"]));
        assert_eq!(cli, CliArgs::default());
    }

    #[test]
    fn test_unknown_args_ignored() {
        let cli = CliArgs::parse_from(args(&["--fullscreen", "positional"]));
        assert_eq!(cli, CliArgs::default());
    }
}
