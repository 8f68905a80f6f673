//! Concrete `RewriteEngine` implementations.

pub mod regex_engine;
