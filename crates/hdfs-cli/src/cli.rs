//! Argument parsing and subcommand dispatch.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hdfs_client::{Client, ClientConfig};

use crate::getfacl;

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "hdfs")]
#[command(about = "HDFS command-line client", long_about = None)]
pub struct Cli {
    /// NameNode address, `host[:port]` or `hdfs://host:port`.
    #[arg(short, long, env = "HADOOP_NAMENODE")]
    pub namenode: Option<String>,

    /// Client config file (TOML or JSON).
    #[arg(short, long, env = "HDFS_CLIENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Display the ACLs of files and directories.
    Getfacl {
        /// List the ACLs of all files and directories below each path.
        #[arg(short = 'R', long)]
        recursive: bool,

        /// Files or directories to inspect.
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

impl Cli {
    /// Resolves the client config: file, then `--namenode`, then environment.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(namenode) = &self.namenode {
            config.namenode = Some(namenode.clone());
        }
        Ok(config.with_env())
    }

    /// Runs the subcommand and returns the process exit status.
    pub async fn run(self) -> Result<i32> {
        let config = self.client_config()?;
        let client = Client::from_config(&config)?;
        tracing::debug!(client = ?client, "client configured");

        match self.command {
            Command::Getfacl {
                recursive,
                ref paths,
            } => {
                let stdout = io::stdout();
                let stderr = io::stderr();
                let status = getfacl::run(
                    &client,
                    paths,
                    recursive,
                    &mut stdout.lock(),
                    &mut stderr.lock(),
                )
                .await?;
                client.close().await;
                Ok(status)
            }
        }
    }
}
