//! glide CLI
//!
//! Render initial (server-side) style strings and inspect how variants
//! resolve into transitions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glide_animation::AnimationKind;
use glide_motion::{
    preset, presets, resolve_transition, variant_to_style_with, DirectiveRegistry,
    ResolvedTransition, TransitionProfile, Variant, Variants,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

#[derive(Parser)]
#[command(name = "glide")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "glide motion CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inline style a variant renders to
    Ssr {
        /// Variants file (TOML or JSON)
        file: PathBuf,

        /// Variant to render
        #[arg(short = 'n', long, default_value = "initial")]
        variant: String,

        /// Fold translations into translate3d()
        #[arg(short, long)]
        accelerate: bool,

        /// Plugin configuration; its hardwareAcceleration turns folding on
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the transition each property resolves to
    Transitions {
        /// Variants file (TOML or JSON)
        file: PathBuf,

        /// Only this variant
        #[arg(short = 'n', long)]
        variant: Option<String>,
    },

    /// List built-in presets, or print one
    Presets {
        /// Preset to print as JSON
        name: Option<String>,
    },

    /// Validate a plugin configuration file
    Check {
        /// Plugin configuration (TOML or JSON)
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Ssr {
            file,
            variant,
            accelerate,
            config,
        } => cmd_ssr(&file, &variant, accelerate, config.as_deref()),
        Commands::Transitions { file, variant } => cmd_transitions(&file, variant.as_deref()),
        Commands::Presets { name } => cmd_presets(name.as_deref()),
        Commands::Check { config } => cmd_check(&config),
    }
}

fn cmd_ssr(file: &Path, name: &str, accelerate: bool, plugin: Option<&Path>) -> Result<()> {
    let accelerate = match plugin {
        Some(path) => {
            let options = config::load_plugin_config(path)?.motion_options();
            accelerate || options.hardware_acceleration
        }
        None => accelerate,
    };
    let variants = config::load_variants(file)?;
    let Some(variant) = variants.get(name) else {
        anyhow::bail!(
            "Variant '{}' not found in {}. Available: {:?}",
            name,
            file.display(),
            variants.keys().collect::<Vec<_>>()
        );
    };
    println!("{}", variant_to_style_with(variant, accelerate));
    Ok(())
}

fn cmd_transitions(file: &Path, only: Option<&str>) -> Result<()> {
    let variants = config::load_variants(file)?;
    if let Some(name) = only {
        if !variants.contains_key(name) {
            anyhow::bail!("Variant '{}' not found in {}", name, file.display());
        }
    }

    for (name, variant) in selected(&variants, only) {
        println!("{name}:");
        let transition = variant.transition.clone().unwrap_or_default();
        for (key, target) in &variant.values {
            let resolved = resolve_transition(key, target, &transition.for_property(key));
            println!("  {key}: {}", describe(&resolved));
        }
    }
    Ok(())
}

fn selected<'a>(
    variants: &'a Variants,
    only: Option<&'a str>,
) -> impl Iterator<Item = (&'a String, &'a Variant)> {
    variants
        .iter()
        .filter(move |(name, _)| only.map_or(true, |only| only == name.as_str()))
}

/// One-line summary of a resolved transition
fn describe(resolved: &ResolvedTransition) -> String {
    let mut out = match &resolved.profile {
        TransitionProfile::Immediate => "immediate".to_string(),
        TransitionProfile::Animated(AnimationKind::Spring(config)) => format!(
            "spring stiffness={} damping={} mass={} restDelta={} restSpeed={}",
            config.stiffness, config.damping, config.mass, config.rest_delta, config.rest_speed
        ),
        TransitionProfile::Animated(AnimationKind::Keyframes {
            duration,
            ease,
            times,
        }) => {
            let mut s = format!("keyframes duration={duration}ms ease={ease:?}");
            if let Some(times) = times {
                s.push_str(&format!(" times={times:?}"));
            }
            s
        }
        TransitionProfile::Animated(AnimationKind::Decay(config)) => format!(
            "decay power={} timeConstant={}",
            config.power, config.time_constant
        ),
        TransitionProfile::Animated(AnimationKind::Inertia(config)) => format!(
            "inertia power={} timeConstant={} min={:?} max={:?}",
            config.decay.power, config.decay.time_constant, config.min, config.max
        ),
    };
    if resolved.delay != 0.0 {
        out.push_str(&format!(" delay={}ms", resolved.delay));
    }
    if resolved.repeat != 0.0 {
        out.push_str(&format!(
            " repeat={} ({:?})",
            resolved.repeat, resolved.repeat_type
        ));
    }
    out
}

fn cmd_presets(name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let variants =
                preset(name).with_context(|| format!("Unknown preset '{}'", name))?;
            println!("{}", serde_json::to_string_pretty(&variants)?);
        }
        None => {
            for (name, variants) in presets() {
                println!("{name}: {}", variants.keys().cloned().collect::<Vec<_>>().join(", "));
            }
        }
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = config::load_plugin_config(path)?;
    let registry = DirectiveRegistry::new(&config);
    debug!(?config, "loaded plugin config");

    info!(
        "{}: {} custom directive(s), {} directive(s) total, presets {}, hardware acceleration {}",
        path.display(),
        config.directives.len(),
        registry.len(),
        if config.exclude_presets { "excluded" } else { "included" },
        if registry.options().hardware_acceleration { "on" } else { "off" },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::Target;
    use glide_motion::Transition;

    #[test]
    fn test_describe() {
        let resolved = resolve_transition("opacity", &Target::from(1.0), &Transition::default());
        assert_eq!(describe(&resolved), "keyframes duration=300ms ease=All(Linear)");

        let resolved = resolve_transition(
            "x",
            &Target::from(1.0),
            &Transition::default().with_delay(120.0),
        );
        assert_eq!(
            describe(&resolved),
            "spring stiffness=500 damping=25 mass=1 restDelta=0.5 restSpeed=10 delay=120ms"
        );
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["glide", "-v", "ssr", "card.toml", "--variant", "enter"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Ssr { ref variant, accelerate: false, config: None, .. } if variant == "enter"
        ));

        let cli = Cli::try_parse_from(["glide", "ssr", "card.toml", "--config", "glide.toml"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Ssr { config: Some(ref path), .. } if path == Path::new("glide.toml")
        ));
    }
}
