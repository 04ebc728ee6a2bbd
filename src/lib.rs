//! A minimal tree-reconciliation engine.
//!
//! Given the snapshot of a previously rendered tree and a newly computed
//! target tree, [`Reconciler::update`] computes a minimal ordered set of
//! [`diff::Patch`]es and applies them in place against an externally owned
//! live tree, so state attached to unchanged nodes (focus, scroll position,
//! listeners) survives the update.
//!
//! The live tree is reached exclusively through the injected
//! [`live::LiveTree`] capability; [`live::MemTree`] is the bundled
//! in-memory implementation. Every node the engine touches is stamped with
//! a path-like identity under [`tree::IDENTITY_ATTRIBUTE`] — a visible,
//! documented side effect that embedders must leave alone.

#![warn(clippy::pedantic)]

pub mod diff;
pub mod identity;
pub mod live;
pub mod tree;

mod error;
mod reconciler;

pub use error::Error;
pub use reconciler::{Reconciler, DEPTH_LIMIT};

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}
