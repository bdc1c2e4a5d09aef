#![deny(warnings)]

//! Headless Globe Farm session: run commands from a script or the command
//! line and print the resulting notifications.

use anyhow::{Context, Result};
use farm_core::SessionConfig;
use farm_runtime::{parse_inline, parse_script, Command, Session};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    seed: Option<u64>,
    json: bool,
    inline: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => out.config = Some(it.next().context("--config needs a path")?.into()),
            "--script" => out.script = Some(it.next().context("--script needs a path")?.into()),
            "--seed" => {
                let raw = it.next().context("--seed needs a value")?;
                out.seed = Some(raw.parse().with_context(|| format!("bad --seed `{raw}`"))?);
            }
            "--json" => out.json = true,
            _ => out.inline.push(arg),
        }
    }
    Ok(out)
}

fn banner() -> String {
    format!(
        "farm-cli {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHA"),
        env!("BUILD_DATE")
    )
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut cfg = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if args.seed.is_some() {
        cfg.rng_seed = args.seed;
    }
    Ok(cfg)
}

fn load_commands(args: &Args) -> Result<Vec<Command>> {
    let mut cmds = Vec::new();
    if let Some(path) = &args.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        cmds.extend(parse_script(&text).with_context(|| format!("in {}", path.display()))?);
    }
    if !args.inline.is_empty() {
        cmds.extend(parse_inline(&args.inline.join(" "))?);
    }
    if cmds.is_empty() {
        cmds.push(Command::Status);
    }
    Ok(cmds)
}

/// Run the session described by `args`, writing reports to `out`.
/// Market misuse is reported inline and does not stop the run.
fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let cfg = load_config(args)?;
    let cmds = load_commands(args)?;
    let mut session = Session::from_config(&cfg)?;
    info!(commands = cmds.len(), "running session");

    if !args.json {
        writeln!(out, "{}", banner())?;
    }
    for cmd in &cmds {
        match session.execute(cmd) {
            Ok(report) if !args.json => writeln!(out, "{report}")?,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "command failed");
                if !args.json {
                    writeln!(out, "error: {err}")?;
                }
            }
        }
    }
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &session.snapshot())?;
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let stdout = std::io::stdout();
    run(&args, &mut stdout.lock())
}
