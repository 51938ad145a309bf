mod config;
mod dataset;
mod debounce;
mod entry;
mod error;
mod i18n;
mod loader;
mod logging;
mod normalize;
mod present;
mod simple;
mod tui;
mod view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use i18n::I18n;
use normalize::{Normalizer, Pipeline};
use view::{ResultView, ViewSettings};

#[derive(Parser)]
#[command(name = "slovar")]
#[command(about = "")]
struct Cli {
    /// Dictionary file (.db SQLite or .json)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the dictionary with live search (default)
    Browse,
    /// Print entries matching a query and exit
    Lookup {
        /// Substring to look for in both columns
        #[arg(required = true)]
        query: String,
        /// Maximum number of entries to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Help goes through i18n rather than clap's generated text
    let needs_help = args.iter().skip(1).any(|a| a == "--help" || a == "-h")
        || (args.len() >= 2 && args[1] == "help");

    let mut config = Config::new()?;
    config.apply_env();
    let i18n = I18n::new(&config.get_effective_language());

    if needs_help {
        print_help(&i18n, &args);
        return Ok(());
    }

    let cli = Cli::parse();
    if let Some(db) = cli.db {
        config.dataset.path = db;
    }

    if let Err(e) = logging::init(&config) {
        eprintln!("{}: {:#}", i18n.t("error_init_logging").yellow(), e);
    }

    let normalizer: Arc<dyn Normalizer> = Arc::new(Pipeline::with_aliases(&config.search.aliases));

    // The dictionary is read once; nothing after this point suspends.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context(i18n.t("error_runtime"))?;
    let loaded = runtime.block_on(loader::load_dataset(&config.dataset, Arc::clone(&normalizer)));
    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!(error = %e, "dictionary unavailable");
            let message = present::no_data_source_text(&config.dataset.path, &i18n);
            println!("{}", message.red().bold());
            return Err(anyhow::Error::new(e).context(i18n.t("error_load_dataset")));
        }
    };
    drop(runtime);

    let settings = ViewSettings {
        per_page: config.display.per_page.max(1),
        search_limit: config.display.search_limit.max(1),
        prefetch_rows: config.display.prefetch_rows,
    };
    let view = ResultView::new(&dataset, normalizer.as_ref(), settings);

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            let interactive = !config.is_simple_mode()
                && tui::run(
                    &view,
                    &i18n,
                    Duration::from_millis(config.search.debounce_ms),
                    config.display.alt_screen,
                )
                .context(i18n.t("error_terminal"))?;
            if !interactive {
                if !config.is_simple_mode() {
                    println!("{}", i18n.t("warning_interactive_failed").yellow());
                }
                simple::run(&view, &i18n)?;
            }
        }
        Commands::Lookup { query, limit } => {
            let view = match limit {
                Some(limit) => ResultView::new(
                    &dataset,
                    normalizer.as_ref(),
                    ViewSettings {
                        search_limit: limit.max(1),
                        ..settings
                    },
                ),
                None => view,
            };
            simple::lookup(&view, &i18n, &query, &mut std::io::stdout())?;
        }
    }

    Ok(())
}

fn print_help(i18n: &I18n, args: &[String]) {
    if args.len() >= 2 && args[1] == "lookup" {
        println!("{}", i18n.t("help_lookup"));
        println!();
        println!("{} slovar lookup [OPTIONS] <QUERY>", i18n.t("help_label_usage"));
        println!();
        println!("{}", i18n.t("help_label_arguments"));
        println!("  <QUERY>  {}", i18n.t("help_lookup_query"));
        println!();
        println!("{}", i18n.t("help_label_options"));
        println!("      --limit <N>  Maximum number of entries to print");
        println!("      --db <PATH>  {}", i18n.t("help_db"));
        println!("  -h, --help       Print help");
        return;
    }

    println!("{}", i18n.t("help_about"));
    println!();
    println!("{} slovar [OPTIONS] [COMMAND]", i18n.t("help_label_usage"));
    println!();
    println!("{}", i18n.t("help_label_commands"));
    println!("  {}  {}", "browse".green(), i18n.t("help_browse"));
    println!("  {}  {}", "lookup".green(), i18n.t("help_lookup"));
    println!("  {}    Print this message or the help of the given subcommand(s)", "help".green());
    println!();
    println!("{}", i18n.t("help_label_options"));
    println!("      --db <PATH>  {}", i18n.t("help_db"));
    println!("  -h, --help       Print help");
    println!();
    println!("{}", i18n.t("help_config_section"));
    println!("  - {}", i18n.t("help_config_dataset"));
    println!("  - {}", i18n.t("help_config_tui_mode"));
    println!("  - {}", i18n.t("help_config_alt_screen"));
    println!("  - {}", i18n.t("help_config_aliases"));
}
