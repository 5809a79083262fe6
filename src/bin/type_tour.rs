use std::io::{self, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use colored::Colorize;
use thiserror::Error;
use tracing::{debug, Level};

use type_tour::{
    with_quiet_panics, ColorChoice, OutputFormat, Registry, RegistryError, RunConfig, Runner,
    Summary,
};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

/// Run the typed demonstration catalog and report each unit's outcome
#[derive(Parser, Debug)]
#[command(name = "type_tour")]
#[command(version)]
struct Cli {
    /// Run only this unit (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    /// List unit names and topics without running anything
    #[arg(long)]
    list: bool,

    /// Output format for result lines
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// When to color the OK/ERROR status
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Increase diagnostic output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Do not print the summary line
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            format: self.format,
            color: self.color,
            only: self.only.clone(),
            quiet: self.quiet,
        }
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to write results: {0}")]
    Io(#[from] io::Error),
}

fn build_registry(config: &RunConfig) -> Result<Registry, RegistryError> {
    let registry = Registry::builtin()?;
    if config.runs_everything() {
        Ok(registry)
    } else {
        registry.select(&config.only)
    }
}

fn list_units(registry: &Registry, out: &mut impl Write) -> io::Result<()> {
    for unit in registry.list() {
        writeln!(out, "{}\t{}", unit.name(), unit.topic())?;
    }
    Ok(())
}

/// Writes listings or result lines to `out`; the summary goes to stderr.
fn run(cli: &Cli, out: &mut impl Write) -> Result<(), AppError> {
    let config = cli.run_config();
    config.color.apply();

    let registry = build_registry(&config)?;
    debug!(units = registry.len(), "registry ready");

    if cli.list {
        list_units(&registry, out)?;
        return Ok(());
    }

    let mut runner = Runner::new(&mut *out, config.format);
    let results = with_quiet_panics(|| runner.run(&registry))?;

    if !config.quiet {
        eprintln!("{}", Summary::from_results(&results).render());
    }
    Ok(())
}

fn exit_status(result: &Result<(), AppError>) -> u8 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(_) => EXIT_ERROR,
    }
}

fn report_error(err: &AppError) {
    eprintln!("{} {}", "error:".red().bold(), err);
    if let AppError::Registry(RegistryError::UnknownUnit {
        suggestion: Some(name),
        ..
    }) = err
    {
        eprintln!("  did you mean '{}'?", name.green());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let result = run(&cli, &mut io::stdout().lock());
    if let Err(err) = &result {
        report_error(err);
    }
    ExitCode::from(exit_status(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("type_tour").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_runs_everything() {
        let cli = parse(&[]);
        let config = cli.run_config();
        assert_eq!(config, RunConfig::default());
        assert!(!cli.list);
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "--only",
            "generics.first",
            "--only",
            "varargs.foo",
            "--format",
            "json",
            "--color",
            "never",
            "-vv",
            "-q",
        ]);
        let config = cli.run_config();
        assert_eq!(config.only, vec!["generics.first", "varargs.foo"]);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.color, ColorChoice::Never);
        assert!(config.quiet);
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let args = ["type_tour", "--format", "yaml"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_build_registry_with_selection() {
        let config = RunConfig {
            only: vec!["varargs.foo".into(), "primitives.str_len".into()],
            ..RunConfig::default()
        };
        let registry = build_registry(&config).unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["primitives.str_len", "varargs.foo"]);
    }

    #[test]
    fn test_build_registry_unknown_unit() {
        let config = RunConfig {
            only: vec!["generics.frist".into()],
            ..RunConfig::default()
        };
        let err = build_registry(&config).unwrap_err();
        assert_eq!(
            err,
            RegistryError::unknown_unit("generics.frist", Some("generics.first".into()))
        );
    }

    fn run_to_string(args: &[&str]) -> (u8, String) {
        let cli = parse(args);
        let mut out = Vec::new();
        let status = exit_status(&run(&cli, &mut out));
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    #[serial]
    fn test_list_writes_name_and_topic() {
        let (status, text) = run_to_string(&["--list", "--color", "never"]);
        assert_eq!(status, EXIT_SUCCESS);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), Registry::builtin().unwrap().len());
        assert_eq!(lines[0], "primitives.str_len\tPrimitive types");
        assert!(lines.iter().all(|line| !line.contains(": OK (")));
    }

    #[test]
    #[serial]
    fn test_list_respects_selection() {
        let (_, text) = run_to_string(&["--list", "--only", "varargs.foo", "--color", "never"]);
        assert_eq!(text, "varargs.foo\tArbitrary argument lists\n");
    }

    #[test]
    #[serial]
    fn test_successful_run_exits_zero() {
        let (status, text) =
            run_to_string(&["--only", "primitives.str_len", "--color", "never", "-q"]);
        assert_eq!(status, EXIT_SUCCESS);
        assert_eq!(text, "primitives.str_len: OK (5)\n");
    }

    #[test]
    #[serial]
    fn test_failing_units_still_exit_zero() {
        let (status, text) = run_to_string(&["--only", "main.convert_currency", "--color", "never"]);
        assert_eq!(status, EXIT_SUCCESS);
        assert_eq!(
            text,
            "main.convert_currency: ERROR (name 'convert_currency' is not defined)\n"
        );
    }

    #[test]
    #[serial]
    fn test_registry_error_exits_one() {
        let (status, text) = run_to_string(&["--only", "generics.frist", "--color", "never"]);
        assert_eq!(status, EXIT_ERROR);
        assert!(text.is_empty());
    }
}
