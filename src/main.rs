use clap::{Parser, Subcommand};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use topobuild::{dot, io};

/// Inspect, compose, and convert topology JSON documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a topology file
    Info {
        /// Path to the topology JSON file
        file: PathBuf,
    },
    /// Assign IP addresses to all host and router interfaces
    AssignIps {
        /// Path to the topology JSON file
        file: PathBuf,
        /// IPv4 prefix to draw addresses from
        #[arg(short, long, default_value = "10.0.0.0/8")]
        prefix: String,
        /// Output path; the input file is overwritten if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge two topology files into one
    Union {
        /// First topology JSON file
        first: PathBuf,
        /// Second topology JSON file
        second: PathBuf,
        /// Prefix every node with its topology name to avoid collisions
        #[arg(long)]
        rename: bool,
        /// Output path for the merged topology
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Export a topology as Graphviz DOT text
    Dot {
        /// Path to the topology JSON file
        file: PathBuf,
        /// Output path; DOT text goes to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match args.command {
        Command::Info { file } => {
            let topo = io::load_from_file(&file)?;
            println!("name:     {}", topo.name());
            println!("hosts:    {}", topo.hosts().join(" "));
            println!("switches: {}", topo.switches().join(" "));
            println!("routers:  {}", topo.routers().join(" "));
            println!("links:");
            for (pair, link) in topo.links() {
                println!("  {} [{}]", pair, link.label());
            }
        }
        Command::AssignIps {
            file,
            prefix,
            output,
        } => {
            let mut topo = io::load_from_file(&file)?;
            topo.assign_ip_addresses(Some(&prefix))?;
            let target = output.unwrap_or(file);
            io::save_to_file(&topo, &target)?;
            info!("Wrote numbered topology to {:?}", target);
        }
        Command::Union {
            first,
            second,
            rename,
            output,
        } => {
            let left = io::load_from_file(&first)?;
            let right = io::load_from_file(&second)?;
            let merged = left.union(&right, rename)?;
            io::save_to_file(&merged, &output)?;
            info!(
                "Merged '{}' and '{}' into {:?}",
                left.name(),
                right.name(),
                output
            );
        }
        Command::Dot { file, output } => {
            let topo = io::load_from_file(&file)?;
            let text = dot::to_dot(&topo);
            match output {
                Some(path) => {
                    fs::write(&path, text)?;
                    info!("Wrote DOT graph to {:?}", path);
                }
                None => print!("{}", text),
            }
        }
    }
    Ok(())
}
