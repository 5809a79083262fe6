//! # type_tour
//!
//! A runner for small typed demonstrations. Each demonstration unit is a
//! named closure; the runner executes every unit of a [`Registry`] in order
//! and prints one line per unit:
//!
//! ```text
//! primitives.str_len: OK (5)
//! main.convert_currency: ERROR (name 'convert_currency' is not defined)
//! ```
//!
//! A failing unit never stops the run. Only a malformed registry
//! (duplicate or empty names) is fatal, and it is detected before any unit
//! executes.
//!
//! ```
//! use type_tour::{DemonstrationUnit, Registry, UnitError};
//!
//! let registry = Registry::new(vec![
//!     DemonstrationUnit::new("double", || Ok(2 * 2)),
//!     DemonstrationUnit::new("boom", || -> Result<(), UnitError> {
//!         Err(UnitError::value("bad"))
//!     }),
//! ])
//! .unwrap();
//!
//! let results = type_tour::run_silent(&registry);
//! assert_eq!(results[0].to_string(), "double: OK (4)");
//! assert_eq!(results[1].to_string(), "boom: ERROR (bad)");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod runner;
pub mod unit;
pub mod value;

pub use config::{ColorChoice, OutputFormat, RunConfig};
pub use error::{RegistryError, UnitError};
pub use registry::Registry;
pub use runner::{execute, format_line, run_silent, with_quiet_panics, Runner, Summary};
pub use unit::{escape_control, DemonstrationUnit, ExecutionResult, Outcome};
pub use value::{render_record, Render, TypeTag};
