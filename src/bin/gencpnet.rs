//! Command-line front end: counts or generates CP-nets and writes them as XML.
//!
//! ```bash
//! gencpnet -n 10 -c 3 -d 2 -g 5 -t 10 -H 2 out/
//! gencpnet -n 10 -c 3 --count
//! ```

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use log::{info, warn};

use gencpnet::count::Weighting;
use gencpnet::error::Error;
use gencpnet::generator::{count_cpnets, count_structures, Generator, GeneratorConfig};
use gencpnet::xml::save_dominance_query;

#[derive(Debug, Parser)]
#[command(author, version, about = "Generates acyclic CP-nets uniformly at random", disable_version_flag = true)]
struct Cli {
    /// Number of features/nodes.
    #[arg(short = 'n', value_name = "INT")]
    n: usize,

    /// Bound on indegree for all nodes (negative: 5 if n > 6, else n - 1).
    #[arg(short = 'c', value_name = "INT", default_value = "5", allow_negative_numbers = true)]
    c: i64,

    /// Domain size, homogeneous for all features.
    #[arg(short = 'd', value_name = "INT", default_value = "2")]
    d: usize,

    /// Probability that a given CPT row is missing.
    #[arg(short = 'i', value_name = "FLOAT", default_value = "0.0")]
    i: f64,

    /// Number of CP-nets to generate.
    #[arg(short = 'g', value_name = "INT", default_value = "1")]
    g: usize,

    /// Number of dominance-query files to write per CP-net.
    #[arg(short = 't', value_name = "INT", default_value = "0")]
    t: usize,

    /// Hamming distance of query outcome pairs (0: any distinct pair).
    #[arg(short = 'H', value_name = "INT", default_value = "0")]
    h: usize,

    /// Print the number of CP-nets for (n, c, d, i) and exit.
    #[arg(long)]
    count: bool,

    /// Print the number of DAGs for (n, c) and exit.
    #[arg(long)]
    countdags: bool,

    /// Draw structures uniformly instead of whole CP-nets.
    #[arg(long)]
    structure_only: bool,

    /// Seed for reproducible output.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Also write each net's dependency graph as Graphviz DOT.
    #[arg(long)]
    dot: bool,

    /// Output generation details to stderr.
    #[arg(short = 'V', long)]
    verbose: bool,

    /// Print version.
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Directory to write the generated XML files to.
    #[arg(value_name = "OUTPUT_DIR", required_unless_present_any = ["count", "countdags"])]
    output_dir: Option<PathBuf>,
}

/// Help and version requests succeed; every other parse failure exits with 1.
fn exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print()?;
            std::process::exit(exit_code(&e));
        }
    };

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let n = args.n;
    let c = if args.c < 0 {
        if n > 6 {
            5
        } else {
            n.saturating_sub(1)
        }
    } else {
        args.c as usize
    };
    if args.h > n {
        bail!("Hamming distance must be in range [0, n]");
    }

    let config = GeneratorConfig {
        indegree_bound: c,
        domain_size: args.d,
        incompleteness: args.i,
        count: args.g,
        weighting: if args.structure_only {
            Weighting::Structure
        } else {
            Weighting::CpNet
        },
        seed: args.seed,
        ..GeneratorConfig::new(n)
    };
    config.validate()?;
    let c = config.effective_bound();

    if args.verbose {
        info!("Number of nodes: {}", n);
        info!("Bound on in-degree: {}", c);
        info!("Homogeneous domains of size {}", args.d);
        info!("Probability of incompleteness {}", args.i);
    }

    if args.countdags || args.count {
        if args.countdags {
            println!("{}", count_structures(n, c));
        }
        if args.count {
            match count_cpnets(n, c, args.d, args.i) {
                Ok(count) if count.is_integer() => println!("{}", count),
                Ok(count) => println!("{} (~{:e})", count, count.to_f64()),
                Err(e @ Error::IntractableCount { .. }) => {
                    warn!("{}; reporting the number of structures instead", e);
                    println!("{}", count_structures(n, c));
                }
                Err(e) => return Err(e.into()),
            }
        }
        return Ok(());
    }

    let Some(dir) = args.output_dir else {
        bail!("an output directory is required");
    };
    std::fs::create_dir_all(&dir).wrap_err_with(|| format!("cannot create {}", dir.display()))?;

    let time_total = std::time::Instant::now();
    let mut generator = Generator::new(config)?;
    for index in 0..args.g {
        let net = generator.generate_one()?;
        let stem = format!("cpnet_n{}c{}d{}_{:04}", n, c, args.d, index);
        let net_file = format!("{}.xml", stem);
        net.save_xml(dir.join(&net_file))
            .wrap_err_with(|| format!("cannot write {}", net_file))?;

        if args.dot {
            std::fs::write(dir.join(format!("{}.dot", stem)), net.to_dot()?)?;
        }

        for query in 0..args.t {
            let (better, worse) = generator.generate_pair(args.h)?;
            let path = dir.join(format!("{}_dt_{:04}.xml", stem, query));
            save_dominance_query(&path, &net_file, &better, &worse)
                .wrap_err_with(|| format!("cannot write {}", path.display()))?;
        }
        info!("Wrote {}", net_file);
    }
    info!("Generated {} CP-net(s) in {:.3} s", args.g, time_total.elapsed().as_secs_f64());

    Ok(())
}
