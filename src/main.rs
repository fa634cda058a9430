//! `eca` command line front end.
//!
//! Examples:
//!   eca run --rule 30 --width 79 --height 40
//!   eca run --rule 110 --random --seed 7 --format ppm --output rule110.ppm
//!   eca run --config run.json --boundary fixed --format json
//!   eca rule 90
//!   eca compare --rules 30,90,110 --width 63 --height 32

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use eca::batch::{rule_variants, run_many};
use eca::config::{EcaConfig, InitialPattern};
use eca::evolve::Boundary;
use eca::export::{write_csv, write_json};
use eca::render::{render_ascii, render_automaton, Palette, MAX_CELL_SIZE};
use eca::rule::{decode_rule, neighborhood_label, Rule};

#[derive(Debug, Parser)]
#[command(name = "eca", version, about = "Elementary cellular automaton simulator")]
struct Cli {
    /// Log engine activity (repeat for more detail). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evolve one automaton and print or save it.
    Run(RunArgs),
    /// Show the lookup table of a rule.
    Rule {
        /// Wolfram code, 0-255.
        code: i64,
    },
    /// Evolve the same initial row under several rules.
    Compare {
        /// Comma-separated Wolfram codes.
        #[arg(long, value_delimiter = ',', required = true)]
        rules: Vec<i64>,
        #[command(flatten)]
        setup: SetupArgs,
    },
}

#[derive(Debug, Args)]
struct SetupArgs {
    /// JSON config file; flags given on the command line win.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    /// Rows including the initial one.
    #[arg(long)]
    height: Option<usize>,
    /// Edge handling; overrides the config file.
    #[arg(long, value_enum)]
    boundary: Option<BoundaryArg>,
    /// Shorthand for `--boundary periodic`.
    #[arg(long, conflicts_with = "boundary")]
    periodic: bool,
    /// Initial pattern; only 0 and 1 characters count.
    #[arg(long, conflicts_with = "random")]
    initial: Option<String>,
    /// Random initial row.
    #[arg(long)]
    random: bool,
    /// Seed for --random.
    #[arg(long, requires = "random")]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Wolfram code, 0-255.
    #[arg(long)]
    rule: Option<i64>,
    #[command(flatten)]
    setup: SetupArgs,
    #[arg(long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
    /// Pixel size of one cell for ppm output.
    #[arg(
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..=MAX_CELL_SIZE as i64)
    )]
    cell_size: u16,
    /// Write to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BoundaryArg {
    /// Wrap the row end to end.
    Periodic,
    /// Read 0 past the edges.
    Fixed,
}

impl From<BoundaryArg> for Boundary {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Periodic => Boundary::Periodic,
            BoundaryArg::Fixed => Boundary::Fixed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Ascii,
    Json,
    Csv,
    Ppm,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "eca=debug",
        _ => "eca=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(setup: &SetupArgs) -> Result<EcaConfig, Box<dyn std::error::Error>> {
    let mut cfg = match &setup.config {
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
            let cfg: EcaConfig = serde_json::from_reader(file)?;
            info!(path = %path.display(), "loaded config");
            cfg
        }
        None => EcaConfig::default(),
    };

    if let Some(width) = setup.width {
        cfg.width = width;
    }
    if let Some(height) = setup.height {
        cfg.height = height;
    }
    if let Some(boundary) = setup.boundary {
        cfg.boundary = boundary.into();
    } else if setup.periodic {
        cfg.boundary = Boundary::Periodic;
    }
    if let Some(text) = &setup.initial {
        cfg.initial = InitialPattern::Text(text.clone());
    }
    if setup.random {
        cfg.initial = InitialPattern::Random { seed: setup.seed };
    }

    cfg.validate()?;
    Ok(cfg)
}

fn open_output(path: Option<&PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn cmd_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = load_config(&args.setup)?;
    if let Some(code) = args.rule {
        cfg.rule = decode_rule(code)?;
    }
    debug!(?cfg, "run");

    let initial = cfg.initial_row()?;
    let gens = eca::evolve::run_automaton(&initial, &cfg.rule, cfg.height, cfg.boundary)?;

    let mut out = open_output(args.output.as_ref())?;
    match args.format {
        Format::Ascii => out.write_all(render_ascii(&gens).as_bytes())?,
        Format::Json => {
            write_json(&mut out, &cfg.rule, cfg.boundary, &gens)?;
            writeln!(out)?;
        }
        Format::Csv => {
            write_csv(&mut out, &gens)?;
            writeln!(out)?;
        }
        Format::Ppm => {
            let raster = render_automaton(
                &gens,
                &cfg.rule,
                &Palette::default(),
                usize::from(args.cell_size),
                cfg.boundary,
            )?;
            out.write_all(&raster.to_ppm())?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.output {
        info!(path = %path.display(), rows = gens.len(), "wrote output");
    }
    Ok(())
}

fn cmd_rule(code: i64) -> Result<(), Box<dyn std::error::Error>> {
    let rule = decode_rule(code)?;
    println!("rule {} ({rule})", rule.code());
    for idx in (0..8u8).rev() {
        println!("  {} -> {}", neighborhood_label(idx), rule.output(idx));
    }
    Ok(())
}

fn cmd_compare(codes: &[i64], setup: &SetupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(setup)?;
    let rules = codes
        .iter()
        .map(|&c| decode_rule(c))
        .collect::<Result<Vec<Rule>, _>>()?;

    let initial = cfg.initial_row()?;
    let specs = rule_variants(&initial, &rules, cfg.height, cfg.boundary);
    for (spec, result) in specs.iter().zip(run_many(&specs)) {
        let gens = result?;
        let live: usize = gens.iter().map(|r| r.live_count()).sum();
        println!("rule {}: {} live cells over {} rows", spec.rule.code(), live, gens.len());
        print!("{}", render_ascii(&gens));
        println!();
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let res = match &cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Rule { code } => cmd_rule(*code),
        Command::Compare { rules, setup } => cmd_compare(rules, setup),
    };

    if let Err(e) = res {
        eprintln!("error: {e}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(args: &[&str]) -> SetupArgs {
        let mut argv = vec!["eca", "compare", "--rules", "90"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Compare { setup, .. } => setup,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn boundary_flag_overrides_config_file() {
        let path = std::env::temp_dir().join(format!("eca-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"width": 9, "height": 4, "boundary": "periodic"}"#).unwrap();
        let config = path.to_string_lossy().into_owned();

        let cfg = load_config(&setup(&["--config", &config])).unwrap();
        assert_eq!(cfg.boundary, Boundary::Periodic);

        let cfg = load_config(&setup(&["--config", &config, "--boundary", "fixed"])).unwrap();
        assert_eq!(cfg.boundary, Boundary::Fixed);
        assert_eq!((cfg.width, cfg.height), (9, 4));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn periodic_shorthand() {
        let cfg = load_config(&setup(&["--periodic"])).unwrap();
        assert_eq!(cfg.boundary, Boundary::Periodic);
        assert!(Cli::try_parse_from(["eca", "compare", "--rules", "1", "--periodic", "--boundary", "fixed"]).is_err());
    }

    #[test]
    fn cell_size_is_bounded() {
        assert!(Cli::try_parse_from(["eca", "run", "--cell-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["eca", "run", "--cell-size", "65"]).is_err());
        assert!(Cli::try_parse_from(["eca", "run", "--cell-size", "64"]).is_ok());
    }
}
