//! Rule compilation for bcrelease.
//!
//! Turns the `RewriteRule`s of a rule set into compiled regular expressions,
//! applying the regex flags each stage of the pipeline expects.

pub mod compiler;
