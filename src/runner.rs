//! Executes every unit of a registry and reports each outcome.

use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, catch_unwind, AssertUnwindSafe};

use colored::Colorize;
use tracing::{debug, info, warn};

use crate::config::OutputFormat;
use crate::error::UnitError;
use crate::registry::Registry;
use crate::unit::{escape_control, DemonstrationUnit, ExecutionResult, Outcome};

// =============================================================================
// Part 1: Running a single unit
// =============================================================================

/// Invokes one unit, turning errors and panics into a failed outcome.
pub fn execute(unit: &DemonstrationUnit) -> ExecutionResult {
    debug!(unit = unit.name(), "running unit");

    let outcome = match catch_unwind(AssertUnwindSafe(|| unit.invoke())) {
        Ok(Ok(value)) => Outcome::succeeded(value),
        Ok(Err(err)) => Outcome::failed(err.to_string()),
        Err(payload) => {
            let err = UnitError::Panicked(panic_message(payload.as_ref()));
            warn!(unit = unit.name(), "{err}");
            Outcome::failed(err.to_string())
        }
    };

    debug!(unit = unit.name(), ok = outcome.is_success(), "unit finished");
    ExecutionResult::new(unit.name(), outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs `f` with a panic hook that only logs at debug level, then puts the
/// previous hook back.
///
/// Panics inside units are already reported as failed results, so the
/// default hook's stderr message would only duplicate them.
pub fn with_quiet_panics<R>(f: impl FnOnce() -> R) -> R {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("{info}")));
    let result = f();
    panic::set_hook(previous);
    result
}

// =============================================================================
// Part 2: Runner over a whole registry
// =============================================================================

/// Runs units in registration order and writes one line per unit to `out`.
pub struct Runner<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Runner<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Every unit runs exactly once, whatever happened to the ones before it.
    ///
    /// Only a failure to write to the sink is returned as an error.
    pub fn run(&mut self, registry: &Registry) -> io::Result<Vec<ExecutionResult>> {
        info!(units = registry.len(), "starting run");

        let mut results = Vec::with_capacity(registry.len());
        for unit in registry.list() {
            let result = execute(unit);
            self.report(&result)?;
            results.push(result);
        }
        self.out.flush()?;

        Ok(results)
    }

    fn report(&mut self, result: &ExecutionResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_line(result)),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, result)?;
                writeln!(self.out)
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// The text line for one result; only the status token carries color.
///
/// Control characters in the name, value or message are escaped, so a unit
/// always produces exactly one line.
pub fn format_line(result: &ExecutionResult) -> String {
    let name = escape_control(&result.unit_name);
    match &result.outcome {
        Outcome::Succeeded { value } => {
            format!("{name}: {} ({})", "OK".green(), escape_control(value))
        }
        Outcome::Failed { message } => {
            format!("{name}: {} ({})", "ERROR".red(), escape_control(message))
        }
    }
}

/// Runs `registry` without printing anything.
pub fn run_silent(registry: &Registry) -> Vec<ExecutionResult> {
    registry.list().iter().map(execute).collect()
}

// =============================================================================
// Part 3: Summary
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn render(&self) -> String {
        let ok = format!("{} ok", self.succeeded);
        let failed = format!("{} failed", self.failed);
        let failed = if self.failed > 0 {
            failed.as_str().red()
        } else {
            failed.as_str().normal()
        };
        format!("{} units: {}, {}", self.total, ok.as_str().green(), failed)
    }
}
