use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ruleq::{
    format_rule, search_rule, should_use_colors, Colors, SearchMatch, SearchOptions,
    SearchStrategy, Spinner,
};

#[derive(Parser)]
#[command(name = "ruleq")]
#[command(version, about = "Search rule metadata in your project's ESLint flat config")]
struct Cli {
    /// Rule name to search for (e.g. 'no-unused-vars', '@typescript-eslint/no-explicit-any')
    rule: String,

    /// Match the rule name exactly instead of substring search
    #[arg(short, long)]
    exact: bool,

    /// Print matches as JSON
    #[arg(short, long)]
    json: bool,

    /// Project root to resolve the config from (default: current directory)
    #[arg(long, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let colors = Colors::new(should_use_colors(false, cli.no_color));

    let spinner = Spinner::new("Resolving eslint config...", !cli.json);
    let result = search_rule(
        &cli.rule,
        SearchOptions {
            root_dir: cli.root.clone(),
            strategy: if cli.exact {
                SearchStrategy::Exact
            } else {
                SearchStrategy::Includes
            },
            // JSON output must not be interleaved with config-load chatter.
            suppress_output: cli.json,
            filter: None,
        },
    );
    spinner.finish();

    match result {
        Ok(matches) => {
            if cli.json {
                print_json(&matches)
            } else {
                print_blocks(&cli.rule, &matches, &colors);
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RULEQ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn print_json(matches: &[SearchMatch]) -> ExitCode {
    match serde_json::to_string_pretty(matches) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn print_blocks(query: &str, matches: &[SearchMatch], colors: &Colors) {
    if matches.is_empty() {
        println!("No rules found for input \"{query}\"");
        return;
    }

    for SearchMatch { name, info } in matches {
        println!("### {name}\n\n{}\n", format_rule(info, colors));
    }
}
