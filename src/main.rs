//! Command-line front-end: parse parameters, run the chain(s), write the
//! trajectory and final lattice as JSON for plotting.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::config::DEFAULT_SEED;
use ising_sim::{
    run_ensemble, run_metropolis, summarize, EnergyMode, LatticeState, SimulationConfig,
};
use log::info;

/// Single-spin-flip Metropolis simulation of the 2D Ising model
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Inverse temperature
    #[arg(long, short = 'b', env = "ISING_BETA")]
    beta: f64,

    /// Lattice side length N
    #[arg(long, short = 'n', default_value = "32", env = "ISING_SIZE")]
    size: usize,

    /// Initial threshold P in [0, 100]; each cell starts at -1 with probability P/100
    #[arg(long, short = 'p', default_value = "50", env = "ISING_UP_SPIN_PERCENT")]
    up_spin_percent: f64,

    /// Number of Metropolis steps
    #[arg(long, short = 'e', default_value = "100000", env = "ISING_MAX_EPOCHS")]
    max_epochs: usize,

    #[arg(long, default_value_t = DEFAULT_SEED, env = "ISING_SEED")]
    seed: u64,

    /// Energy evaluation: 'full' or 'local-delta'
    #[arg(long, default_value = "full")]
    energy_mode: String,

    /// Independent chains (seeds seed, seed+1, ...)
    #[arg(long, default_value = "1")]
    chains: usize,

    /// Run chains one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Steps discarded before the summary averages
    #[arg(long, default_value = "0")]
    warmup: usize,

    /// Write the result as JSON here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print the final lattice as a grid of '+' and '-'
    #[arg(long)]
    print_lattice: bool,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .expect("progress template is valid")
        .progress_chars("=> "),
    );
    pb.set_message("steps");
    pb
}

/// Progress bar length for `chains` runs of `max_epochs` steps each.
fn total_steps(max_epochs: usize, chains: usize) -> u64 {
    (max_epochs as u64).saturating_mul(chains.max(1) as u64)
}

fn render_lattice(state: &LatticeState) -> String {
    state
        .rows()
        .map(|row| {
            row.iter()
                .map(|&s| if s > 0 { '+' } else { '-' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer(BufWriter::new(file), value)?;
            info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer(&mut lock, value)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let energy_mode = EnergyMode::try_from(args.energy_mode.as_str()).map_err(|e| anyhow!(e))?;
    let config =
        SimulationConfig::new(args.beta, args.size, args.up_spin_percent, args.max_epochs)
            .with_energy_mode(energy_mode)
            .with_seed(args.seed);

    let pb = progress_bar(total_steps(args.max_epochs, args.chains), args.quiet);
    let on_step = |_: usize| pb.inc(1);

    let n_spins = config.size * config.size;

    if args.chains != 1 {
        let ensemble = run_ensemble(&config, args.chains, args.sequential, &on_step)?;
        pb.finish();

        for run in &ensemble.runs {
            if let Some(s) = summarize(&run.trajectory, args.warmup, config.beta, n_spins) {
                info!(
                    "seed {}: <E>/N² = {:.4}, <|m|> = {:.4}, acceptance {:.3}",
                    run.seed,
                    s.energy_per_spin,
                    s.mean_abs_magnetization,
                    run.acceptance_rate()
                );
            }
        }
        write_json(
            &serde_json::json!({ "config": config, "ensemble": ensemble }),
            args.output.as_ref(),
        )?;
        return Ok(());
    }

    let result = run_metropolis(&config, &on_step)?;
    pb.finish();

    let summary = summarize(&result.trajectory, args.warmup, config.beta, n_spins);
    if let Some(s) = &summary {
        info!(
            "<E> = {:.3} ({:.4} per spin), <|m|> = {:.4}, C = {:.4}, chi = {:.4}, \
             tau_E = {:.1}, acceptance {:.3}",
            s.mean_energy,
            s.energy_per_spin,
            s.mean_abs_magnetization,
            s.specific_heat,
            s.susceptibility,
            s.energy_tau,
            result.acceptance_rate()
        );
    }

    if args.print_lattice {
        eprintln!("{}", render_lattice(&result.final_lattice));
    }

    write_json(
        &serde_json::json!({ "config": config, "summary": summary, "result": result }),
        args.output.as_ref(),
    )
}
