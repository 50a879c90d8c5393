use std::env;
use std::path::PathBuf;
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use neon_worldgen::{generate_world, load_world_config, WorldConfig, WorldDb};

const USAGE: &str = "usage: neon-worldgen [--db PATH] [--config FILE] [--name NAME] \
[--complexity 1-5] [--author NAME] [--seed N]";

struct CliArgs {
    db_path: PathBuf,
    config_path: Option<PathBuf>,
    name: Option<String>,
    complexity: Option<u8>,
    author: Option<String>,
    seed: Option<u64>,
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        db_path: PathBuf::from("./world.db"),
        config_path: None,
        name: None,
        complexity: None,
        author: None,
        seed: None,
    };
    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--db" => cli.db_path = PathBuf::from(value()?),
            "--config" => cli.config_path = Some(PathBuf::from(value()?)),
            "--name" => cli.name = Some(value()?),
            "--author" => cli.author = Some(value()?),
            "--complexity" => {
                let raw = value()?;
                cli.complexity = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid complexity {}", raw))?,
                );
            }
            "--seed" => {
                let raw = value()?;
                cli.seed = Some(raw.parse().map_err(|_| format!("invalid seed {}", raw))?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument {}\n{}", other, USAGE)),
        }
    }
    Ok(cli)
}

fn build_config(cli: &CliArgs) -> Result<WorldConfig, String> {
    let mut config = match &cli.config_path {
        Some(path) => load_world_config(path).map_err(|err| err.to_string())?,
        None => WorldConfig::default(),
    };
    if let Some(name) = &cli.name {
        config.name = Some(name.clone());
    }
    if let Some(complexity) = cli.complexity {
        config.complexity = complexity;
    }
    if let Some(author) = &cli.author {
        config.author = author.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn run(cli: CliArgs) -> Result<(), String> {
    let config = build_config(&cli)?;
    let mut db = WorldDb::open(&cli.db_path).map_err(|err| err.to_string())?;
    let generated = generate_world(&mut db, &config).map_err(|err| err.to_string())?;

    println!("World {} generated (seed {})", generated.world_id, generated.seed);
    println!("Database: {}", cli.db_path.display());
    for (stage, rows) in &generated.summary.stages {
        println!("  {:<18} {}", stage, rows);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(env::args().collect()) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        }
    };
    if let Err(message) = run(cli) {
        error!(%message, "world generation failed");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("neon-worldgen")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse_args(args(&["--complexity", "2", "--seed", "9", "--name", "Grid"])).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.complexity, 2);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.name.as_deref(), Some("Grid"));
        assert_eq!(cli.db_path, PathBuf::from("./world.db"));
    }

    #[test]
    fn missing_values_and_unknown_flags_fail() {
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--complexity", "high"])).is_err());
    }
}
