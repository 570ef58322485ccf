//! Rendering helpers for sidebar consumers
//!
//! The sidebar viewer itself is an external collaborator; this module only
//! provides the summary-markup rendering it needs, so that every consumer
//! treats the lightweight markup in entry summaries the same way.

pub mod markdown;

pub use markdown::summary_to_html;
