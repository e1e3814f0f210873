//! Subcommand implementations.
//!
//! Each command resolves config through the library and returns the text to
//! print plus an exit code. Only `set` writes to disk, and only after the
//! new content has been fully built.

use super::{Cli, Command, CompareArgs, EnvsArgs, GetArgs, SetArgs, ShowArgs};
use crate::config::{
    Composer, CompositionParams, ConfigLoader, KeyConventions, StoreCache,
    enumerate_environments, expand_environments, update_store,
};
use crate::format::FileFormat;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

/// Result of running a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
    pub text: String,
    /// Non-zero without an error, e.g. when compared envs differ
    pub exit_code: i32,
}

impl CmdOutput {
    fn ok(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

/// Run the command selected on the command line.
pub fn run(cli: &Cli) -> Result<CmdOutput> {
    let conventions = KeyConventions::new(&cli.prefix);
    let app_dir = cli.app_dir(&conventions)?;
    let params = cli.composition();
    let mut composer =
        Composer::new(conventions).with_loader(ConfigLoader::new().with_cache(StoreCache::new()));

    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Command::Show(ShowArgs::default()));

    check_flags(cli, &command, &params)?;

    match command {
        Command::Show(args) => show(&mut composer, &app_dir, cli, &params, &args),
        Command::Paths => paths(&mut composer, &app_dir, cli, &params),
        Command::Envs(args) => envs(&app_dir, &args),
        Command::Get(args) => get(&mut composer, &app_dir, cli, &params, &args),
        Command::Compare(args) => compare(&mut composer, &app_dir, cli, &params, &args),
        Command::Set(args) => set(&mut composer, &app_dir, cli, &args),
    }
}

/// Reject global flags the selected command would otherwise ignore.
fn check_flags(cli: &Cli, command: &Command, params: &CompositionParams) -> Result<()> {
    match command {
        Command::Set(_) if *params != CompositionParams::single() => {
            bail!("set updates one env file, --extend and --merge can not be used")
        }
        Command::Get(_) | Command::Compare(_) if cli.all => {
            bail!("--all can not be used with get or compare")
        }
        Command::Envs(_) if cli.all || *params != CompositionParams::single() => {
            bail!("envs lists env names, --all, --extend and --merge can not be used")
        }
        _ => Ok(()),
    }
}

fn show(
    composer: &mut Composer,
    app_dir: &Path,
    cli: &Cli,
    params: &CompositionParams,
    args: &ShowArgs,
) -> Result<CmdOutput> {
    let resolved = composer.resolve_all(app_dir, &cli.env, cli.all, params)?;
    let headed = resolved.len() > 1;

    let mut text = String::new();
    for (env, resolution) in resolved {
        let bytes = resolution.store.to_bytes(args.format)?;
        if headed {
            text.push_str(&format!("# {}\n", env));
        }
        text.push_str(&String::from_utf8_lossy(&bytes));
        if !text.ends_with('\n') {
            text.push('\n');
        }
    }
    Ok(CmdOutput::ok(text))
}

fn paths(
    composer: &mut Composer,
    app_dir: &Path,
    cli: &Cli,
    params: &CompositionParams,
) -> Result<CmdOutput> {
    let mut text = String::new();
    for (_, resolution) in composer.resolve_all(app_dir, &cli.env, cli.all, params)? {
        for path in resolution.paths {
            text.push_str(&format!("{}\n", path.display()));
        }
    }
    Ok(CmdOutput::ok(text))
}

fn envs(app_dir: &Path, args: &EnvsArgs) -> Result<CmdOutput> {
    let mut text = String::new();
    for env in enumerate_environments(app_dir, args.samples)? {
        text.push_str(&env);
        text.push('\n');
    }
    Ok(CmdOutput::ok(text))
}

fn get(
    composer: &mut Composer,
    app_dir: &Path,
    cli: &Cli,
    params: &CompositionParams,
    args: &GetArgs,
) -> Result<CmdOutput> {
    let resolution = composer.resolve(app_dir, &cli.env, params)?;
    let value = resolution.store.value(&args.key)?;
    Ok(CmdOutput::ok(format!("{}\n", value)))
}

fn compare(
    composer: &mut Composer,
    app_dir: &Path,
    cli: &Cli,
    params: &CompositionParams,
    args: &CompareArgs,
) -> Result<CmdOutput> {
    let current = composer.resolve(app_dir, &cli.env, params)?;
    let other = composer
        .resolve(app_dir, &args.env, params)
        .with_context(|| format!("Failed to resolve compared env '{}'", args.env))?;

    let unmatched = current.store.diff_keys(&other.store);
    let mut text = String::new();
    for key in &unmatched {
        text.push_str(key);
        text.push('\n');
    }

    Ok(CmdOutput {
        text,
        exit_code: if unmatched.is_empty() { 0 } else { 1 },
    })
}

/// Update keys in each selected env's own file, keeping its format.
fn set(composer: &mut Composer, app_dir: &Path, cli: &Cli, args: &SetArgs) -> Result<CmdOutput> {
    let envs = expand_environments(app_dir, &cli.env, cli.all)?;
    let conventions = composer.conventions().clone();

    // Build every new file before writing any of them
    let mut updates = Vec::with_capacity(envs.len());
    for env in &envs {
        let mut loaded = composer.loader_mut().load(app_dir, env)?;
        update_store(&mut loaded.store, &args.keys, &args.values, &conventions)?;
        let format = FileFormat::from_path(&loaded.path)?;
        let bytes = loaded.store.to_bytes(format)?;
        updates.push((loaded.path, bytes));
    }

    let mut text = String::new();
    for (path, bytes) in updates {
        if args.dry_run {
            if envs.len() > 1 {
                text.push_str(&format!("# {}\n", path.display()));
            }
            text.push_str(&String::from_utf8_lossy(&bytes));
            if !text.ends_with('\n') {
                text.push('\n');
            }
        } else {
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Updated config file");
            text.push_str(&format!("updated {}\n", path.display()));
        }
    }
    Ok(CmdOutput::ok(text))
}
