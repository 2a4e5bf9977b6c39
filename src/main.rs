use clap::{Parser as ClapParser, Subcommand};
use fql_chain::cli::{self, CliError, RenderOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "fqlc")]
#[command(about = "fqlc - Render typed FQL chains into query text and arguments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON chain plan
    Render {
        /// JSON plan (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Render the chain as written, without wrapping sets in a page
        #[arg(long)]
        direct: bool,
    },

    /// List documentation topics
    Docs,

    /// Show documentation for a specific topic
    Doc {
        /// Topic name (use 'fqlc docs' to list topics)
        topic: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FQLC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            pretty,
            direct,
        } => run_render(input, pretty, direct),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { topic } => cli::get_doc_topic(&topic).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_render(input: Option<String>, pretty: bool, direct: bool) -> Result<(), CliError> {
    let plan = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RenderOptions {
        plan,
        pretty,
        direct,
    };

    let output = cli::execute_render(&options)?.to_json();
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);
    Ok(())
}
