//! Domain models for the session tooling.
//!
//! # Core Concepts
//!
//! ## Durable State
//!
//! The session document on disk is the only persistent state. Everything here
//! is rebuilt from it (or from the pipeline table) on every invocation.
//!
//! - [`CanonicalSessionState`]: Normalized mode/phase/agent/task/decisions/next steps,
//!   shared by the migration renderer and phase advancement.
//! - [`PartialSessionState`]: What a legacy extractor actually found, before defaults.
//! - [`LegacyFormat`]: The superseded encodings a legacy session can be written in.
//!
//! ## Pipeline Table
//!
//! - [`PipelineConfig`]: Declarative ordered list of [`PhaseDescriptor`]s plus
//!   the [`ArtifactPaths`] used to locate phase deliverables.

mod legacy;
mod phase;
mod session;

pub use legacy::*;
pub use phase::*;
pub use session::*;
