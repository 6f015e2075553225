//! Cache hierarchy builder CLI.
//!
//! This binary is the entry point for configuration runs. It performs:
//! 1. **Build:** Assemble a full system from options and a cache hierarchy document, check
//!    its topology, and print (or dump as JSON) the resulting component graph.
//! 2. **Validate:** Load a hierarchy document and print its resolved levels without
//!    building anything.
//!
//! Options follow gem5 naming. `--config` loads a whole configuration document, and
//! individual flags override fields of it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memhier_core::common::error::{Error, SetupError};
use memhier_core::common::units::{Frequency, MemorySize, Voltage};
use memhier_core::config::{Config, CpuType, MemoryController};
use memhier_core::hierarchy::{HierarchyOptions, validate};
use memhier_core::sim::{Platform, load_config, load_hierarchy};

#[derive(Parser, Debug)]
#[command(
    name = "memhier",
    author,
    version,
    about = "Declarative cache hierarchy builder for trace-driven simulation",
    long_about = "Build a trace replay system around a cache hierarchy described in JSON.\n\nExamples:\n  memhier build --cache-specs-file hierarchy.json\n  memhier build --config system.json --dump-topology topo.json\n  memhier validate hierarchy.json"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble the full system and check its topology.
    Build(BuildArgs),

    /// Load and validate a cache hierarchy document only.
    Validate {
        /// Cache hierarchy document (.json).
        path: PathBuf,

        /// Cache line size used for the set-count check.
        #[arg(long)]
        cacheline_size: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Configuration document; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cache hierarchy document (.json).
    #[arg(long)]
    cache_specs_file: Option<PathBuf>,

    /// Write the topology report as JSON to this path.
    #[arg(long)]
    dump_topology: Option<PathBuf>,

    /// CPU model; only TraceCPU is supported.
    #[arg(long)]
    cpu_type: Option<CpuType>,

    /// Number of CPUs; must be 1.
    #[arg(long)]
    num_cpus: Option<usize>,

    /// Main memory size (e.g. 512MB).
    #[arg(long)]
    mem_size: Option<MemorySize>,

    /// Memory controller (simple or dram).
    #[arg(long)]
    mem_type: Option<MemoryController>,

    /// Number of memory channels.
    #[arg(long)]
    mem_channels: Option<usize>,

    /// Cache line size in bytes.
    #[arg(long)]
    cacheline_size: Option<u64>,

    /// System clock (e.g. 1GHz).
    #[arg(long)]
    sys_clock: Option<Frequency>,

    /// CPU clock (e.g. 2GHz).
    #[arg(long)]
    cpu_clock: Option<Frequency>,

    /// Top-level supply voltage (e.g. 1.0V).
    #[arg(long)]
    sys_voltage: Option<Voltage>,

    /// Instruction fetch trace.
    #[arg(long)]
    inst_trace_file: Option<PathBuf>,

    /// Data dependency trace.
    #[arg(long)]
    data_trace_file: Option<PathBuf>,

    /// Use the Ruby memory system (not supported).
    #[arg(long)]
    ruby: bool,
}

impl BuildArgs {
    /// Resolves the configuration: document or defaults, then flag overrides.
    fn resolve_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        if let Some(path) = &self.cache_specs_file {
            config.cache_specs_file = Some(path.clone());
        }
        if let Some(cpu_type) = self.cpu_type {
            config.system.cpu_type = cpu_type;
        }
        if let Some(num_cpus) = self.num_cpus {
            config.system.num_cpus = num_cpus;
        }
        if let Some(size) = self.mem_size {
            config.memory.size = size;
        }
        if let Some(controller) = self.mem_type {
            config.memory.controller = controller;
        }
        if let Some(channels) = self.mem_channels {
            config.memory.channels = channels;
        }
        if let Some(line) = self.cacheline_size {
            config.system.cache_line_size = line;
        }
        if let Some(clock) = self.sys_clock {
            config.system.sys_clock = clock;
        }
        if let Some(clock) = self.cpu_clock {
            config.system.cpu_clock = clock;
        }
        if let Some(voltage) = self.sys_voltage {
            config.system.sys_voltage = voltage;
        }
        if let Some(path) = &self.inst_trace_file {
            config.trace.inst_trace_file = Some(path.clone());
        }
        if let Some(path) = &self.data_trace_file {
            config.trace.data_trace_file = Some(path.clone());
        }
        config.system.ruby |= self.ruby;

        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Build(args) => cmd_build(&args),
        Commands::Validate {
            path,
            cacheline_size,
        } => cmd_validate(&path, cacheline_size),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(args: &BuildArgs) -> Result<(), Error> {
    let config = args.resolve_config()?;
    let specs_path = config
        .cache_specs_file
        .clone()
        .ok_or(SetupError::MissingCacheSpecs)?;

    let spec = load_hierarchy(&specs_path)?;
    let platform = Platform::assemble(&config, &spec)?;
    let report = platform.system.report();
    print!("{report}");

    if let Some(path) = &args.dump_topology {
        write_report(path, &serde_json::to_string_pretty(&report)?)?;
        println!("topology written to {}", path.display());
    }
    Ok(())
}

fn cmd_validate(path: &Path, cacheline_size: Option<u64>) -> Result<(), Error> {
    let mut options = HierarchyOptions::default();
    if let Some(line) = cacheline_size {
        options.cache_line_size = line;
    }

    let spec = load_hierarchy(path)?;
    let hierarchy = validate(&spec, &options)?;

    println!(
        "{}: {} level(s), {} cache(s)",
        path.display(),
        hierarchy.level_count(),
        hierarchy.levels().len()
    );
    for level in hierarchy.levels() {
        let p = &level.params;
        println!(
            "  {:<4} size={} assoc={} latency(tag/data/resp)={}/{}/{} mshrs={} tgts={} {} writeback_clean={}",
            level.kind.to_string(),
            p.size,
            p.assoc,
            p.tag_latency,
            p.data_latency,
            p.response_latency,
            p.mshrs,
            p.tgts_per_mshr,
            p.clusivity,
            p.writeback_clean
        );
    }
    Ok(())
}

fn write_report(path: &Path, json: &str) -> Result<(), Error> {
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
