//! Application-level configuration.
//!
//! - [`EngineParams`] — turn loop control (message cap, repeats, context
//!   window, backend timeout) and the stop conditions built from it

pub mod engine_params;

pub use engine_params::EngineParams;
