pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod local_file;
