//! nettool Protocol Library
//!
//! Wire contract shared by the agent and the gateway: probe kinds and their
//! HTTP paths, the inline colour markup carried in agent reports, and the
//! JSON bodies the gateway answers with.

pub mod constants;
pub mod markup;
pub mod wire;

pub use constants::*;
pub use markup::{ColorTag, MarkupSegment};
pub use wire::{ErrorBody, NodeSummary};
