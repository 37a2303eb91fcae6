//! vbafmt - An indentation formatter for VBA source code
//!
//! VBA blocks are opened and closed by keywords, not by indentation, so the
//! indentation in a module routinely drifts away from the actual nesting.
//! This crate re-derives it: each line is classified from a string- and
//! comment-free "judgement" form, a small block-stack state machine assigns
//! every line its nesting depth, and an edit planner can then produce the
//! minimal line-range edits needed to patch the original text in place.

pub mod editing;
pub mod formatting;
pub mod loading;
pub mod scanning;
