use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use module_tree::action::Action;
use module_tree::config::Manifest;
use module_tree::module::Module;
use module_tree::store::Store;
use module_tree::tree::{derive_reducers, derive_routes};

/// Compose reducers and route trees from a nested module manifest
#[derive(Parser, Debug)]
#[command(name = "module-tree", version, about)]
struct Args {
    /// Module tree manifest (TOML)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the aggregated route tree as JSON
    Routes {
        /// Aggregate through plain descriptors instead of module entities
        #[arg(long)]
        descriptor: bool,
    },
    /// Print the state after dispatching actions (TYPE or TYPE=<json>)
    State {
        #[arg(short, long = "dispatch")]
        dispatch: Vec<String>,
    },
    /// Print the module hierarchy
    Tree,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::from_file(&args.manifest)?;

    match args.command {
        Command::Routes { descriptor: true } => {
            let mut root = manifest.to_descriptor::<Store>();
            let store = Arc::new(Store::new(derive_reducers(&mut root)?));
            let routes = derive_routes(&root, &store)?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Command::Routes { descriptor: false } => {
            let module: Module = Module::new(manifest.to_spec())?;
            let store = Arc::new(Store::new(module.reducers()?));
            let module = module.with_store(store);
            println!("{}", serde_json::to_string_pretty(&module.routes()?)?);
        }
        Command::State { dispatch } => {
            let module: Module = Module::new(manifest.to_spec())?;
            let store = Store::new(module.reducers()?);
            for raw in &dispatch {
                let action = Action::parse(raw);
                info!(action = %action.kind, "dispatching");
                store.dispatch(&action);
            }
            println!("{}", serde_json::to_string_pretty(&store.state())?);
        }
        Command::Tree => {
            let module: Module = Module::new(manifest.to_spec())?;
            print_tree(&module, 0);
        }
    }

    Ok(())
}

fn print_tree(module: &Module, depth: usize) {
    let mut actions: Vec<&str> = module.actions().keys().map(String::as_str).collect();
    actions.sort_unstable();
    let reducers: Vec<&str> = module.local_reducers().keys().map(String::as_str).collect();

    println!(
        "{}{} actions=[{}] reducers=[{}]",
        "  ".repeat(depth),
        module.name(),
        actions.join(", "),
        reducers.join(", ")
    );
    for submodule in module.submodules() {
        print_tree(submodule, depth + 1);
    }
}
