//! runner-tmpl: the template engine for runner
//!
//! Configuration templates are plain text with embedded tags:
//!
//! - `<%= expression %>` interpolates the expression's value
//! - `<% code %>` runs code for effect; control flow may span tags
//! - `<%# comment %>` is dropped
//! - `<%%` escapes to a literal `<%`
//!
//! Expressions and code are Lua, evaluated per template in a fresh state
//! whose globals are exactly the [`Bindings`] supplied by the caller plus
//! the string/table/math libraries. Anything else a template references is
//! an error, as is an expression evaluating to nil - templates fail loudly
//! rather than silently emitting nothing.

mod render;
mod scan;

pub use render::{render, Bindings, RenderError};
pub use scan::{scan, ScanError, Segment};
