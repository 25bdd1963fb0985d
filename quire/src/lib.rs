//! Expose quire's internals for integration testing. The supported library
//! API lives in `quire-markup`.
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
