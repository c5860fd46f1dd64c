use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::config::{ArrangeStrategy, load_layout_options};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_descendant_chart;
use crate::render::{render_svg, write_output_svg};

#[derive(Parser, Debug)]
#[command(name = "kintree", version, about = "Genealogy chart renderer (descendant lists to SVG)")]
pub struct Args {
    /// Input descendant list file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output SVG file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout options JSON file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Chart title
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Note line printed under the title (repeatable)
    #[arg(short = 'n', long = "note")]
    pub notes: Vec<String>,

    /// Arrangement strategy
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Iteration budget for the annealing strategy
    #[arg(long = "iterations")]
    pub iterations: Option<usize>,

    /// Random seed for the annealing strategy, for reproducible layouts
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Outline blurb boxes in the output and log their positions
    #[arg(long = "debug")]
    pub debug: bool,

    /// Write a JSON dump of the computed layout to this path
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StrategyArg {
    Spreading,
    Annealing,
}

impl From<StrategyArg> for ArrangeStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Spreading => ArrangeStrategy::Spreading,
            StrategyArg::Annealing => ArrangeStrategy::Annealing,
        }
    }
}

pub fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut opts = load_layout_options(args.config.as_deref())
        .with_context(|| "loading layout options")?;
    if let Some(strategy) = args.strategy {
        opts.strategy = strategy.into();
    }
    if let Some(iterations) = args.iterations {
        opts.iterations = iterations;
    }
    if args.seed.is_some() {
        opts.seed = args.seed;
    }
    if args.debug {
        opts.debug = true;
    }

    let input = read_input(args.input.as_deref())?;
    let mut chart = parse_descendant_chart(&input)?;
    if let Some(title) = args.title {
        chart.title = title;
    }
    if !args.notes.is_empty() {
        chart.notes = args.notes.clone();
    }

    let layout = chart.layout(&opts);
    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layout)
            .with_context(|| format!("writing layout dump to {}", path.display()))?;
    }

    let svg = render_svg(&layout);
    write_output_svg(&svg, args.output.as_deref())?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_argument_maps_onto_config() {
        assert_eq!(
            ArrangeStrategy::from(StrategyArg::Spreading),
            ArrangeStrategy::Spreading
        );
        assert_eq!(
            ArrangeStrategy::from(StrategyArg::Annealing),
            ArrangeStrategy::Annealing
        );
    }

    #[test]
    fn args_parse_a_typical_invocation() {
        let args = Args::parse_from([
            "kintree",
            "-i",
            "family.txt",
            "-o",
            "family.svg",
            "--strategy",
            "annealing",
            "--iterations",
            "5000",
            "--seed",
            "42",
            "-t",
            "Brown Family",
        ]);
        assert_eq!(args.input.as_deref(), Some(Path::new("family.txt")));
        assert_eq!(args.iterations, Some(5000));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.title.as_deref(), Some("Brown Family"));
    }
}
