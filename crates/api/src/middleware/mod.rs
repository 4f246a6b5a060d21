//! Request guard extractors.
//!
//! - [`generator::RequireGenerator`] -- Requires a configured text generation backend.

pub mod generator;
