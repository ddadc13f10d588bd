//! # graphapi
//!
//! Host application for `graphapi-core`: HTTP RPC server, CLI, and the
//! configuration layer that feeds the engine.

pub mod api;
pub mod cli;
pub mod config;
