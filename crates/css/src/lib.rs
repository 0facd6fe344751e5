//! Stylesheet tree used by the compile engine.
//!
//! The tree mirrors the shape of a post-processing CSS AST: a [`Stylesheet`]
//! holds [`Node`]s, which are rules, at-rules, declarations or comments. Nodes
//! parsed from source carry a [`Position`]; generated nodes carry an
//! [`Origin`] naming the layer that produced them.

mod ast;
mod error;
mod escape;
mod parser;
mod serialize;

pub use ast::{AtRule, Comment, ContextualRule, Declaration, Layer, Node, Origin, Position, Rule, Stylesheet};
pub use error::{CssSyntaxError, Result};
pub use escape::{escape_class, selector_classes, unescape};
pub use parser::parse;
