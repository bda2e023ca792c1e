use clap::Parser;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use dv_sim::config::{ConfigOverrides, OutputFormat, SimulationConfig};
use dv_sim::report::{JsonReporter, Reporter, TextReporter};
use dv_sim::Scenario;

#[derive(Parser)]
#[command(name = "dv-sim", about = "Distance Vector routing simulator")]
struct Cli {
    /// Scenario file; standard input when absent or `-`
    input: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

impl Cli {
    fn config(&self) -> Result<SimulationConfig> {
        let config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        Ok(config.with_overrides(&self.overrides))
    }

    fn open_input(&self) -> Result<Box<dyn BufRead>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open scenario {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let scenario = Scenario::parse(cli.open_input()?).context("invalid scenario")?;

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let mut reporter: Box<dyn Reporter> = match config.format {
        OutputFormat::Text => Box::new(TextReporter::new(out)),
        OutputFormat::Json => Box::new(JsonReporter::new(out)),
    };

    let summary = dv_sim::run(&scenario, &config, reporter.as_mut()).context("simulation failed")?;
    log::info!(
        "Done: {} initial rounds, update rounds {:?}, next t={}",
        summary.initial_rounds,
        summary.update_rounds,
        summary.next_round
    );
    Ok(())
}
