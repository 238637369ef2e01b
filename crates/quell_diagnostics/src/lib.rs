//! Diagnostic and fix infrastructure for the suppression engine.
//!
//! This crate is derived from [ruff_diagnostics](https://github.com/astral-sh/ruff)
//! by Astral Software Inc., licensed under MIT.

pub use diagnostic::{Diagnostic, DiagnosticKind, FixAvailability, Violation};
pub use edit::Edit;
pub use fix::{Applicability, Fix};

mod diagnostic;
mod edit;
mod fix;
