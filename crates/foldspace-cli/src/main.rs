//! Foldspace CLI - Emit shaders for and probe space-folding fractals

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use foldspace_core::{Registry, Scene, Value, scenes};
use foldspace_shader::{RenderSettings, ShaderAssembler, apply_params_json};
use glam::{Vec3, Vec4};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foldspace")]
#[command(about = "Composable space-folding fractals", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenes
    List,

    /// Write the complete fragment shader for a scene
    Emit {
        /// Scene name (see `foldspace list`)
        #[arg(short, long)]
        scene: String,

        /// JSON file overriding render settings
        #[arg(long)]
        settings: Option<PathBuf>,

        /// JSON file of parameter values
        #[arg(long)]
        params: Option<PathBuf>,

        /// Parameter override, `key=1.5` or `key=1,2,3` (repeatable)
        #[arg(short, long = "param")]
        param: Vec<String>,

        /// Fragment shader output (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the vertex shader here
        #[arg(long)]
        vertex: Option<PathBuf>,
    },

    /// Evaluate distance and nearest surface point at a position
    Probe {
        /// Scene name (see `foldspace list`)
        #[arg(short, long)]
        scene: String,

        /// Query position as `x,y,z`
        #[arg(long, allow_hyphen_values = true)]
        at: String,

        /// JSON file of parameter values
        #[arg(long)]
        params: Option<PathBuf>,

        /// Parameter override, `key=1.5` or `key=1,2,3` (repeatable)
        #[arg(short, long = "param")]
        param: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so emitted shaders can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for name in scenes::NAMES {
                println!("{}", name);
            }
        }
        Commands::Emit {
            scene,
            settings,
            params,
            param,
            output,
            vertex,
        } => {
            run_emit(
                &scene,
                settings.as_deref(),
                params.as_deref(),
                &param,
                output.as_deref(),
                vertex.as_deref(),
            )?;
        }
        Commands::Probe {
            scene,
            at,
            params,
            param,
        } => {
            run_probe(&scene, &at, params.as_deref(), &param)?;
        }
    }

    Ok(())
}

/// Build a gallery scene and apply parameter files and overrides, in that order
fn load_scene(name: &str, params: Option<&Path>, overrides: &[String]) -> Result<(Scene, Registry)> {
    let mut registry = Registry::new();
    let scene = scenes::build(name, &mut registry)
        .with_context(|| format!("available scenes: {}", scenes::NAMES.join(", ")))?;

    if let Some(path) = params {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        apply_params_json(&json, &mut registry)
            .with_context(|| format!("Invalid parameter file {}", path.display()))?;
    }
    for arg in overrides {
        let (key, value) = parse_param(arg)?;
        registry
            .set(key, value)
            .with_context(|| format!("Cannot apply --param {}", arg))?;
    }

    Ok((scene, registry))
}

fn run_emit(
    name: &str,
    settings: Option<&Path>,
    params: Option<&Path>,
    overrides: &[String],
    output: Option<&Path>,
    vertex: Option<&Path>,
) -> Result<()> {
    let (scene, registry) = load_scene(name, params, overrides)?;

    let settings = match settings {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Invalid settings file {}", path.display()))?,
        None => RenderSettings::default(),
    };

    let shader = ShaderAssembler::new().assemble(&scene, &registry, &settings)?;

    match output {
        Some(path) => {
            fs::write(path, &shader.fragment)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} ({} objects, {} uniforms)",
                path.display(),
                shader.scene.objects.len(),
                shader.uniforms.len()
            );
        }
        None => print!("{}", shader.fragment),
    }

    if let Some(path) = vertex {
        fs::write(path, &shader.vertex)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn run_probe(name: &str, at: &str, params: Option<&Path>, overrides: &[String]) -> Result<()> {
    let (scene, registry) = load_scene(name, params, overrides)?;
    let p = parse_vec3(at).with_context(|| format!("Invalid position '{}'", at))?;
    let origin = Vec4::new(p.x, p.y, p.z, 1.0);

    println!("DE     = {}", scene.de(origin, &registry));
    match scene.np(origin, &registry) {
        Ok(np) => {
            println!("NP     = {}", np);
            println!("Normal = {}", (p - np).normalize_or_zero());
        }
        Err(e) => println!("NP     unavailable: {}", e),
    }

    Ok(())
}

/// `key=1.5` or `key=1,2,3`
fn parse_param(arg: &str) -> Result<(&str, Value)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("Expected key=value, got '{}'", arg);
    };
    let value = if value.contains(',') {
        Value::Vec3(parse_vec3(value)?)
    } else {
        Value::Float(
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid number '{}'", value))?,
        )
    };
    Ok((key.trim(), value))
}

fn parse_vec3(text: &str) -> Result<Vec3> {
    let parts = text
        .split(',')
        .map(|s| s.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid vector '{}'", text))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => bail!("Expected three components, got {}", parts.len()),
    }
}
