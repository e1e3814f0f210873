//! CLI command definitions for appconf
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod commands;

use crate::config::{CompositionParams, Convention, DEFAULT_PREFIX, KeyConventions};
use crate::format::FileFormat;
use crate::paths::ENV_DEV;
use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve, inspect and update environment config files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// App dir holding the config files (default: the <PREFIX>DIR env var)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Config key prefix, an underscore is appended if missing
    #[arg(short, long, default_value = DEFAULT_PREFIX, global = true)]
    pub prefix: String,

    /// Config env to use, also supports wildcards * and sample.*
    #[arg(short, long, default_value = ENV_DEV, global = true)]
    pub env: String,

    /// Apply to all config files and samples (show, paths, set)
    #[arg(long, global = true)]
    pub all: bool,

    /// Extension dirs to compose with, comma separated (show, paths, get, compare)
    #[arg(long, value_name = "LIST", value_delimiter = ',', global = true)]
    pub extend: Vec<String>,

    /// Compose with the nearest parent dir's config (show, paths, get, compare)
    #[arg(long, global = true)]
    pub merge: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// App dir from `--dir`, falling back to the `<PREFIX>DIR` env var.
    pub fn app_dir(&self, conventions: &KeyConventions) -> Result<PathBuf> {
        if let Some(ref dir) = self.dir {
            return Ok(dir.clone());
        }

        let key = conventions.key(Convention::AppDir);
        std::env::var_os(key)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("{} env not set and --dir not given", key))
    }

    pub fn composition(&self) -> CompositionParams {
        CompositionParams {
            extend: self
                .extend
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            merge: self.merge,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the resolved config (default if no subcommand given)
    Show(ShowArgs),

    /// Print the files the config was resolved from
    Paths,

    /// List the environments that have config files
    Envs(EnvsArgs),

    /// Print the value of one key
    Get(GetArgs),

    /// Print keys that are not in both envs, exit code 1 if any
    Compare(CompareArgs),

    /// Set keys in the env's config file
    Set(SetArgs),
}

/// Arguments for the show subcommand
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Output format: env, sh, json or yaml
    #[arg(short, long, default_value = "env", value_name = "FORMAT")]
    pub format: FileFormat,
}

impl Default for ShowArgs {
    fn default() -> Self {
        Self {
            format: FileFormat::Env,
        }
    }
}

/// Arguments for the envs subcommand
#[derive(Args, Debug, Clone)]
pub struct EnvsArgs {
    /// List sample envs instead
    #[arg(long)]
    pub samples: bool,
}

/// Arguments for the get subcommand
#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Key to print, including the prefix
    pub key: String,
}

/// Arguments for the compare subcommand
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Env to compare keys with
    pub env: String,
}

/// Arguments for the set subcommand
#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Key to set, repeat for several keys
    #[arg(short, long = "key", value_name = "KEY", required = true)]
    pub keys: Vec<String>,

    /// Value for the key in the same position
    #[arg(long = "value", value_name = "VALUE")]
    pub values: Vec<String>,

    /// Don't write files, just print the result
    #[arg(long)]
    pub dry_run: bool,
}
