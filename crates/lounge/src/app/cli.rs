use std::path::PathBuf;
use std::time::Duration;

use room_engine::Identity;

const DEFAULT_DURATION: Duration = Duration::from_secs(20);
const DEFAULT_FRAME: Duration = Duration::from_millis(16);
const DEFAULT_NAME: &str = "visitor";
const DEFAULT_COLOR: &str = "#e74c3c";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionOptions {
    pub(crate) duration: Duration,
    pub(crate) frame: Duration,
    pub(crate) script: Option<PathBuf>,
    pub(crate) identity: Identity,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            frame: DEFAULT_FRAME,
            script: None,
            identity: Identity::new(DEFAULT_NAME, DEFAULT_COLOR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    Run(SessionOptions),
    Help,
}

pub(crate) fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: IntoIterator<Item = String>,
{
    let args = args.into_iter().collect::<Vec<_>>();
    let mut options = SessionOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--duration-ms" => {
                options.duration = Duration::from_millis(parse_millis(&args, index)?);
                index += 2;
            }
            "--frame-ms" => {
                let millis = parse_millis(&args, index)?;
                if millis == 0 {
                    return Err("--frame-ms must be greater than zero".to_string());
                }
                options.frame = Duration::from_millis(millis);
                index += 2;
            }
            "--script" => {
                options.script = Some(PathBuf::from(value_for(&args, index)?));
                index += 2;
            }
            "--name" => {
                options.identity.display_name = value_for(&args, index)?.to_string();
                index += 2;
            }
            "--color" => {
                options.identity.appearance.color = value_for(&args, index)?.to_string();
                index += 2;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(CliCommand::Run(options))
}

fn value_for(args: &[String], index: usize) -> Result<&str, String> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {}", args[index]))
}

fn parse_millis(args: &[String], index: usize) -> Result<u64, String> {
    let value = value_for(args, index)?;
    value
        .parse::<u64>()
        .map_err(|_| format!("invalid {} value '{value}' (expected u64)", args[index]))
}

pub(crate) fn print_usage() {
    println!("{}", usage_text());
}

pub(crate) fn usage_text() -> String {
    [
        "Usage: lounge [options]",
        "",
        "Runs the lounge headlessly, joins one visitor, and prints the final room snapshot as JSON.",
        "",
        "Options:",
        "  --duration-ms <u64>   wall-clock run time (default 20000)",
        "  --frame-ms <u64>      frame pacing, must be > 0 (default 16)",
        "  --script <path>       JSON session script replacing the default tour",
        "  --name <str>          visitor display name (default visitor)",
        "  --color <str>         visitor color token (default #e74c3c)",
        "  -h, --help            show this message",
        "",
        "Environment:",
        "  ROOM_TICK_MS          override the simulation tick interval",
        "  RUST_LOG              tracing filter (default info)",
    ]
    .join("\n")
}
