//! Runtime values flowing through expression trees.
//!
//! The engine specializes over a fixed, closed set of primitive operand kinds
//! (see [`Kind`]). Every [`Value`] reports its kind, and candidate operand
//! predicates are expressed as a [`KindSet`] per operand position.

mod kind;
mod value;

pub use ecow::EcoString;
pub use kind::{Kind, KindSet};
pub use value::{Typed, Value};
