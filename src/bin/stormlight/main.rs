//! Stormlight CLI - inspect polylines and preview their glow.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use stormlight::prelude::*;
use stormlight::shader::{UniformValue, UNIFORM_BLOCK_SIZE, UNIFORM_SCHEMA};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Info command - segment and UV summary
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: stormlight info <points.json> [--settings FILE]");
                process::exit(1);
            }
            cmd_info(filtered_args[1], &filtered_args[2..])
        }

        // Render command - software preview to PNG
        "render" | "r" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: stormlight render <points.json> <out.png> [OPTIONS]");
                process::exit(1);
            }
            cmd_render(filtered_args[1], filtered_args[2], &filtered_args[3..])
        }

        // Schema command - list uniforms
        "schema" | "s" => {
            cmd_schema();
            Ok(())
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            eprintln!("Unknown command: {}", filtered_args[0]);
            eprintln!();
            print_help();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_help() {
    println!("stormlight - animated glow ribbons along polylines");
    println!();
    println!("USAGE:");
    println!("    stormlight [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <points.json>              Show segments, lengths and U ranges");
    println!("    r, render <points.json> <out.png>    Render a software preview");
    println!("    s, schema                            List shader uniforms");
    println!("    h, help                              Show this help");
    println!();
    println!("RENDER OPTIONS:");
    println!("    --time <seconds>         Animation time (default 0)");
    println!("    --size <WxH>             Output size (default 512x256)");
    println!("    --settings <file>        Settings JSON (default: user config)");
    println!("    --set <Name=value>       Override a tunable uniform, e.g. Brightness=2");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Debug logging");
    println!("    -vv, --trace     Trace logging");
    println!("    -q, --quiet      Errors only");
    println!();
    println!("Points file: JSON array of [x, y] pairs. RUST_LOG overrides the log level.");
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &[&'a str], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|&a| a == flag)
        .and_then(|i| args.get(i + 1).copied())
}

fn flag_values<'a>(args: &[&'a str], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1])
        .collect()
}

fn load_points(path: &Path) -> anyhow::Result<Vec<Vec2>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<[f32; 2]> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(raw.into_iter().map(Vec2::from_array).collect())
}

fn load_settings(args: &[&str]) -> anyhow::Result<GlowSettings> {
    match flag_value(args, "--settings") {
        Some(file) => {
            GlowSettings::load(file).with_context(|| format!("loading settings {file}"))
        }
        None => Ok(GlowSettings::load_default()),
    }
}

fn build_path(points_file: &str, args: &[&str]) -> anyhow::Result<GlowPath> {
    let points = load_points(&PathBuf::from(points_file))?;
    let settings = load_settings(args)?;
    let path = GlowPath::with_settings(&points, &settings)
        .with_context(|| format!("building path from {points_file}"))?;
    Ok(path)
}

fn cmd_info(points_file: &str, args: &[&str]) -> anyhow::Result<()> {
    let path = build_path(points_file, args)?;
    let segments = path.segments();

    println!("File:         {}", points_file);
    println!("Points:       {}", path.points().len());
    println!("Segments:     {}", segments.len());
    println!("Degenerate:   {}", segments.degenerate_count());
    println!("Total length: {:.3}", path.total_length());
    println!();
    println!("{:>4}  {:>10}  {:>8}  {:>8}  {:>8}", "#", "length", "angle", "u0", "u1");
    for (i, s) in segments.iter().enumerate() {
        println!(
            "{:>4}  {:>10.3}  {:>8.2}  {:>8.4}  {:>8.4}",
            i,
            s.length,
            s.angle.to_degrees(),
            s.uv.u0,
            s.uv.u1
        );
    }
    Ok(())
}

fn parse_override(arg: &str) -> anyhow::Result<(&str, UniformValue)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("expected Name=value, got {arg:?}");
    };
    let parts: Vec<f32> = value
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("bad value in {arg:?}"))?;
    let value = match parts.as_slice() {
        [v] => UniformValue::F32(*v),
        [r, g, b] => UniformValue::Vec3(Vec3::new(*r, *g, *b)),
        _ => bail!("expected 1 or 3 numbers in {arg:?}"),
    };
    Ok((name, value))
}

#[cfg(feature = "preview")]
fn cmd_render(points_file: &str, out: &str, args: &[&str]) -> anyhow::Result<()> {
    use stormlight::preview::{parse_size, render_path, save_png, PreviewOptions};

    let mut path = build_path(points_file, args)?;

    for arg in flag_values(args, "--set") {
        let (name, value) = parse_override(arg)?;
        path.material().set_uniform(name, value)?;
    }

    let time: f64 = match flag_value(args, "--time") {
        Some(t) => t.parse().with_context(|| format!("bad --time {t:?}"))?,
        None => 0.0,
    };
    path.advance(time * 1000.0);

    let mut options = PreviewOptions::default();
    if let Some(size) = flag_value(args, "--size") {
        let Some((w, h)) = parse_size(size) else {
            bail!("bad --size {size:?}, expected WxH");
        };
        options.width = w;
        options.height = h;
    }

    let start = std::time::Instant::now();
    let image = render_path(&path, &options)?;
    save_png(&image, out)?;
    tracing::info!(
        out,
        width = options.width,
        height = options.height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "wrote preview"
    );
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn cmd_render(_points_file: &str, _out: &str, _args: &[&str]) -> anyhow::Result<()> {
    bail!("preview not available. Rebuild with: cargo build --features preview")
}

fn cmd_schema() {
    println!("GlowParams: {} bytes", UNIFORM_BLOCK_SIZE);
    println!();
    println!("{:<20} {:<10} {:>6}  {:<8} default", "name", "type", "offset", "tunable");
    for d in UNIFORM_SCHEMA {
        let default = match d.default {
            UniformValue::F32(v) => format!("{v}"),
            UniformValue::Vec3(v) => format!("{:.4}, {:.4}, {:.4}", v.x, v.y, v.z),
        };
        println!(
            "{:<20} {:<10} {:>6}  {:<8} {}",
            d.name,
            d.ty.wgsl_name(),
            d.offset,
            if d.tunable { "yes" } else { "no" },
            default
        );
    }
}
