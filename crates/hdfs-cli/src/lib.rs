#![warn(missing_docs)]

//! `hdfs` command-line tools: argument parsing and subcommand implementations

pub mod cli;
pub mod getfacl;
