//! roadmap: hierarchical topic maps
//!
//! Architecture:
//! - `domain`: topic tree, wire format, entities (no I/O)
//! - `application`: the `RoadMap` handle and services
//! - `infrastructure`: stores, feed client, DI container
//! - `cli`: argument parsing and command dispatch
//! - `config`: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
