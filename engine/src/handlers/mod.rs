//! Task handlers
//!
//! The two dispatch targets of an orchestration pass: the language-model
//! copilot ([`copilot::CopilotHandler`]) and the numerical-solver hand-off
//! ([`numerical::NumericalTaskHandler`]). Both take the request text plus
//! the read-only context bundle and produce a success body; failures
//! propagate to the orchestrator's error boundary.

pub mod copilot;
pub mod numerical;

pub use copilot::{CopilotHandler, Persona};
pub use numerical::NumericalTaskHandler;
