use clap::{Parser, Subcommand};
use opgen_codegen::ExecutionVars;
use opgen_isa::Catalog;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "opgen", about = "Opcode dispatch table generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize an opcode catalog
    Info {
        /// Path to the catalog (.yaml)
        catalog: PathBuf,
    },
    /// Generate the opcode id constants
    Constants {
        /// Path to the catalog (.yaml)
        catalog: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate the interpreter dispatch switch
    Dispatch {
        /// Path to the catalog (.yaml)
        catalog: PathBuf,
        /// Also dispatch instrumentation-only opcodes
        #[arg(long)]
        instrumentation: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Name of the bytecode buffer in generated code
        #[arg(long, default_value = "bc")]
        bc: String,
        /// Name of the instruction index in generated code
        #[arg(long, default_value = "$bci")]
        bci: String,
    },
    /// Show how opcode bodies deduplicate into switch arms
    Stats {
        /// Path to the catalog (.yaml)
        catalog: PathBuf,
        /// Also dispatch instrumentation-only opcodes
        #[arg(long)]
        instrumentation: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { catalog } => cmd_info(&catalog),
        Commands::Constants { catalog, output } => cmd_constants(&catalog, output.as_deref()),
        Commands::Dispatch {
            catalog,
            instrumentation,
            output,
            bc,
            bci,
        } => cmd_dispatch(
            &catalog,
            instrumentation,
            output.as_deref(),
            &ExecutionVars::new(bc, bci),
        ),
        Commands::Stats {
            catalog,
            instrumentation,
        } => cmd_stats(&catalog, instrumentation),
    }
}

fn open_catalog(path: &Path) -> Catalog {
    match Catalog::load(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn write_output(text: &str, output: Option<&Path>) {
    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", path.display());
                std::process::exit(1);
            });
            log::info!("wrote {} bytes to {}", text.len(), path.display());
        }
        None => print!("{text}"),
    }
}

fn cmd_info(path: &Path) {
    let catalog = open_catalog(path);

    println!("=== Opcode Catalog ===");
    println!("Opcodes:          {}", catalog.len());
    println!(
        "Instrumentation:  {}",
        catalog.instrumentation_only_count()
    );
    match catalog.id_range() {
        Some((lo, hi)) => println!("Id range:         {lo}..={hi}"),
        None => println!("Id range:         -"),
    }
    println!(
        "Default body:     {}",
        catalog
            .default_body()
            .map_or_else(|| "none".to_string(), |lines| format!("{} line(s)", lines.len()))
    );
    println!();

    for info in &catalog {
        let mut notes = Vec::new();
        if info.is_instrumentation_only() {
            notes.push("instrumentation".to_string());
        }
        if info.execute().is_none() {
            notes.push("no body".to_string());
        }
        if !info.results().is_empty() {
            let kinds: Vec<String> = info.results().iter().map(ToString::to_string).collect();
            notes.push(format!("results: {}", kinds.join(", ")));
        }
        println!(
            "  {}  {:<32} len={:<3} {}",
            info.opcode(),
            info.constant_name(),
            info.length(),
            notes.join("; ")
        );
    }
}

fn cmd_constants(path: &Path, output: Option<&Path>) {
    let catalog = open_catalog(path);
    write_output(&opgen_codegen::generate_constants_source(&catalog), output);
}

fn cmd_dispatch(path: &Path, instrumentation: bool, output: Option<&Path>, vars: &ExecutionVars) {
    let catalog = open_catalog(path);
    let source = opgen_codegen::generate_dispatch_source(&catalog, vars, instrumentation);
    write_output(&source, output);
}

fn cmd_stats(path: &Path, instrumentation: bool) {
    let catalog = open_catalog(path);
    let groups = opgen_codegen::group_branches(&catalog, instrumentation, |info| {
        opgen_codegen::catalog_body(&catalog, info)
    });

    let labelled: usize = groups.iter().map(|g| g.opcodes.len()).sum();
    let shared = groups.iter().filter(|g| g.opcodes.len() > 1).count();
    println!("=== Dispatch Statistics ===");
    println!("Arms:             {}", groups.len());
    println!("Labelled opcodes: {labelled}");
    println!("Shared arms:      {shared}");
    println!();

    for (idx, group) in groups.iter().enumerate() {
        let mut names: Vec<&str> = Vec::new();
        if group.is_default {
            names.push("default");
        }
        names.extend(group.opcodes.iter().map(|info| info.name()));
        println!(
            "  arm {idx:<3} {} stmt(s)  {}",
            group.body.len(),
            names.join(", ")
        );
    }
}
