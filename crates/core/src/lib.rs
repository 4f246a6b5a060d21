//! Storyforge domain logic.
//!
//! Nothing in this crate touches the database or the network. Context
//! aggregation, prompt templating and entity-kind dispatch all operate on
//! snapshots the caller has already loaded.

pub mod attribute;
pub mod context;
pub mod delimited;
pub mod entity;
pub mod error;
pub mod prompts;
pub mod types;
