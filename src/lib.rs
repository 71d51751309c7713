#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod graph;
pub mod layout;
pub mod store;
pub mod util;
pub mod view;
