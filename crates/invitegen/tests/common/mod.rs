//! Shared test utilities for invitegen integration tests.
//!
//! - `TestHarness` wires an `Orchestrator` to scripted collaborators and a
//!   temporary filesystem store
//! - builders for small catalogs and batch settings

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{ScriptedStore, ScriptedSynthesizer, StaticFetcher, TestHarness};
