use anyhow::{bail, Context};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Cli {
    pub exec_path: String,
    /// Everything after the executable, passed through to the host untouched.
    pub args: Vec<String>,
    pub config: PathBuf,
    pub verbose: bool,
    pub headless: bool,
    pub quit_after: Option<u64>,
}

const DEFAULT_CONFIG: &str = "newengine.toml";

impl Cli {
    pub fn parse<I>(argv: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut argv = argv.into_iter();
        let exec_path = argv.next().unwrap_or_else(|| "newengine".to_string());
        let args: Vec<String> = argv.collect();

        let mut cli = Cli {
            exec_path,
            args: args.clone(),
            config: PathBuf::from(DEFAULT_CONFIG),
            verbose: false,
            headless: false,
            quit_after: None,
        };

        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-v" | "--verbose" => cli.verbose = true,
                "--headless" | "--no-window" => cli.headless = true,
                "--config" => {
                    let path = it.next().context("--config needs a path")?;
                    cli.config = PathBuf::from(path);
                }
                "--quit-after" => {
                    let frames = it.next().context("--quit-after needs a frame count")?;
                    cli.quit_after = Some(
                        frames
                            .parse()
                            .with_context(|| format!("bad frame count '{frames}'"))?,
                    );
                }
                other if other.starts_with("--") && other.contains('=') => {
                    bail!("use '--flag value' instead of '{other}'");
                }
                _ => {}
            }
        }

        Ok(cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse(argv(&["/usr/bin/newengine"])).unwrap();
        assert_eq!(cli.exec_path, "/usr/bin/newengine");
        assert!(cli.args.is_empty());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(!cli.verbose && !cli.headless);
        assert_eq!(cli.quit_after, None);
    }

    #[test]
    fn test_flags_and_passthrough() {
        let cli = Cli::parse(argv(&[
            "ne",
            "--verbose",
            "--config",
            "game.toml",
            "--no-window",
            "--quit-after",
            "120",
            "level2",
        ]))
        .unwrap();
        assert!(cli.verbose && cli.headless);
        assert_eq!(cli.config, PathBuf::from("game.toml"));
        assert_eq!(cli.quit_after, Some(120));
        assert_eq!(cli.args.last().map(String::as_str), Some("level2"));
        assert_eq!(cli.args.len(), 7);
    }

    #[test]
    fn test_missing_values_are_errors() {
        assert!(Cli::parse(argv(&["ne", "--config"])).is_err());
        assert!(Cli::parse(argv(&["ne", "--quit-after", "soon"])).is_err());
        assert!(Cli::parse(argv(&["ne", "--config=x.toml"])).is_err());
    }
}
