//! Tategaki - a vertical Japanese text editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! tategaki 原稿.txt
//! tategaki --watch 原稿.txt
//! tategaki --no-tcy 原稿.txt
//! tategaki --print-markup 原稿.txt
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tategaki::app::App;
use tategaki::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use tategaki::document::{DisplayOptions, RichDocument, prepare_content, to_markup};
use tategaki::perf;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Edit plain-text files in vertical (tategaki) layout
#[derive(Parser, Debug)]
#[command(name = "tategaki", version, about, long_about = None)]
struct Cli {
    /// Text file to edit
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Watch the file and reload external changes
    #[arg(short, long)]
    watch: bool,

    /// Show digit runs one digit per row instead of combined
    #[arg(long)]
    no_tcy: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed render/event debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Print the rich markup of the file and exit
    #[arg(long)]
    print_markup: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Install the subscriber: warnings (and `--perf` timings) to stderr, plus
/// the optional debug log file.
fn init_tracing(flags: &ConfigFlags) -> Result<()> {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if flags.perf {
        filter = filter.add_directive(perf::perf_directive()?);
    }
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter);

    let debug_log_path = flags
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("TATEGAKI_RENDER_DEBUG_LOG").map(PathBuf::from));
    let debug_layer = match debug_log_path {
        Some(path) => match perf::debug_log_layer::<Registry>(&path) {
            Ok(layer) => Some(layer),
            Err(err) => {
                eprintln!(
                    "[warn] Failed to initialize render debug log {}: {err}",
                    path.display()
                );
                None
            }
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(debug_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    init_tracing(&effective)?;
    tracing::debug!(?effective, "resolved flags");

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    if cli.print_markup {
        let raw = std::fs::read_to_string(&cli.file)
            .with_context(|| format!("Failed to read {}", cli.file.display()))?;
        let options = DisplayOptions {
            annotate_digits: !effective.no_tcy,
        };
        let doc = RichDocument::from_text(&prepare_content(raw), &options);
        println!("{}", to_markup(&doc));
        return Ok(());
    }

    let mut app = App::new(cli.file)
        .with_watch(effective.watch)
        .with_digit_annotation(!effective.no_tcy);

    app.run().context("Application error")
}
