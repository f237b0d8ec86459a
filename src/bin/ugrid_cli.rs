//! CLI tool for ugrid - drives a headless on/off grid and prints the window
//!
//! Usage:
//!   ugrid_cli [--config settings.json] [--rows N] [--cols N]
//!             [--set r,c,status]... [--move r,c] [--drag x0,y0:x1,y1]...
//!
//! Operations run in the order given. Set `RUST_LOG=ugrid=debug` to trace them.

use std::env;
use std::fs;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use ugrid::{
    BinaryPolicy, GridSettings, HeadlessRenderer, PointerEventSource, ScriptedPointerSource,
    UnboundedGrid, WindowIndex,
};

const USAGE: &str = "Usage: ugrid_cli [--config settings.json] [--rows N] [--cols N] \
                     [--set r,c,status]... [--move r,c] [--drag x0,y0:x1,y1]...";

/// Moves generated per scripted drag.
const DRAG_STEPS: u32 = 8;

enum Op {
    Set(i64, i64, bool),
    Move(f64, f64),
    Drag((f64, f64), (f64, f64)),
}

fn parse_pair(s: &str) -> Option<(f64, f64)> {
    let (a, b) = s.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_set(s: &str) -> Option<Op> {
    let mut parts = s.split(',').map(str::trim);
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    let alive = match parts.next()? {
        "1" | "true" | "alive" => true,
        "0" | "false" | "dead" => false,
        _ => return None,
    };
    parts.next().is_none().then_some(Op::Set(row, col, alive))
}

fn parse_args(args: &[String]) -> Result<(GridSettings, Vec<Op>), String> {
    let mut settings = GridSettings::default();
    let mut ops = Vec::new();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("{flag} needs a value"))?;
        match flag.as_str() {
            "--config" => {
                let json = fs::read_to_string(value)
                    .map_err(|e| format!("Error reading {value}: {e}"))?;
                settings = GridSettings::from_json(&json).map_err(|e| e.to_string())?;
            }
            "--rows" => {
                settings.rows = value
                    .parse()
                    .map_err(|_| format!("bad row count: {value}"))?;
            }
            "--cols" => {
                settings.cols = value
                    .parse()
                    .map_err(|_| format!("bad column count: {value}"))?;
            }
            "--set" => ops.push(parse_set(value).ok_or_else(|| format!("bad --set: {value}"))?),
            "--move" => {
                let (row, col) = parse_pair(value).ok_or_else(|| format!("bad --move: {value}"))?;
                ops.push(Op::Move(row, col));
            }
            "--drag" => {
                let (from, to) = value
                    .split_once(':')
                    .and_then(|(a, b)| Some((parse_pair(a)?, parse_pair(b)?)))
                    .ok_or_else(|| format!("bad --drag: {value}"))?;
                ops.push(Op::Drag(from, to));
            }
            other => return Err(format!("unknown option {other}")),
        }
    }
    Ok((settings, ops))
}

fn run(args: &[String]) -> Result<String, String> {
    let (settings, ops) = parse_args(args)?;
    let policy = BinaryPolicy::default();
    let alive = policy.alive_color.clone();
    let mut grid = UnboundedGrid::build(settings, policy, HeadlessRenderer::new())
        .map_err(|e| e.to_string())?;

    for op in ops {
        match op {
            Op::Set(row, col, status) => grid.set_cell(row, col, status),
            Op::Move(row, col) => grid.move_to(row, col).map_err(|e| e.to_string())?,
            Op::Drag(from, to) => {
                ScriptedPointerSource::drag(from, to, DRAG_STEPS).pump(&mut grid);
            }
        }
    }

    let origin = grid
        .bound_coord(WindowIndex::new(0, 0))
        .ok_or("window has no origin slot")?;
    let mut out = format!(
        "origin ({}, {})  offset ({}, {})  refreshes {}\n",
        origin.row,
        origin.col,
        grid.cell_offset().row,
        grid.cell_offset().col,
        grid.refresh_count()
    );
    out.push_str(
        &grid
            .backend()
            .snapshot(|p| if p.fill == alive { '#' } else { '.' }),
    );
    Ok(out)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }
    match run(&args) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}
