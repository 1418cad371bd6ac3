use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use walkdir::WalkDir;
use zvelte_fmt::formatter::{FormatOptions, Mode, format_source};
use zvelte_fmt::parser::parse;

const EXTENSIONS: &[&str] = &["zvelte", "twig"];

#[derive(Parser, Debug)]
#[command(name = "zvelte-fmt", version, about = "Formatter for Zvelte templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Fmt {
        /// Paths (files or directories) to format (defaults to current dir)
        paths: Vec<PathBuf>,
        /// Write the formatted content back to the files
        #[arg(long)]
        write: bool,
        /// Check if files are formatted; non-zero exit if changes needed
        #[arg(long)]
        check: bool,
        /// Indent with this many spaces instead of tabs
        #[arg(long)]
        indent: Option<usize>,
        /// Prefix of special elements, e.g. `zone` for `<zone:head>`
        #[arg(long)]
        special_tag: Option<String>,
    },
    Debug {
        /// File to debug
        file: PathBuf,
        /// Prefix of special elements
        #[arg(long)]
        special_tag: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fmt {
            paths,
            write,
            check,
            indent,
            special_tag,
        } => {
            if write && check {
                bail!("--write and --check are mutually exclusive");
            }
            let mode = if write {
                Mode::Write
            } else if check {
                Mode::Check
            } else {
                Mode::Stdout
            };
            let opts = FormatOptions {
                use_tabs: indent.is_none(),
                indent_width: indent.unwrap_or(4),
                special_tag,
                mode,
                ..Default::default()
            };
            let targets = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            let mut files = Vec::new();
            for p in targets {
                collect_template_files(&p, &mut files);
            }
            debug!(files = files.len(), ?mode, "collected templates");

            let results: Vec<_> = files
                .par_iter()
                .map(|path| process_file(path, &opts).map(|changed| (path, changed)))
                .collect();
            let mut had_change = false;
            let mut had_error = false;
            for r in results {
                match r {
                    Ok((path, changed)) => {
                        if changed && mode == Mode::Check {
                            warn!("{} needs formatting", path.display());
                        }
                        had_change |= changed;
                    }
                    Err(e) => {
                        error!("{e:#}");
                        had_error = true;
                    }
                }
            }
            if (mode == Mode::Check && had_change) || had_error {
                std::process::exit(1);
            }
        }
        Commands::Debug { file, special_tag } => {
            debug_file(&file, special_tag)?;
        }
    }
    Ok(())
}

fn debug_file(path: &Path, special_tag: Option<String>) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let opts = FormatOptions {
        special_tag,
        ..Default::default()
    };
    let root = parse(&content, &opts.parse_options())
        .with_context(|| format!("parsing {}", path.display()))?;
    println!("===== {} =====", path.display());
    println!("{root:#?}");
    Ok(())
}

fn is_template(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

fn collect_template_files(path: &Path, out: &mut Vec<PathBuf>) {
    if path.is_file() {
        if is_template(path) {
            out.push(path.to_path_buf());
        }
        return;
    }
    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && is_template(p) {
            out.push(p.to_path_buf());
        }
    }
}

fn process_file(path: &Path, opts: &FormatOptions) -> Result<bool> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let formatted =
        format_source(&content, opts).with_context(|| format!("formatting {}", path.display()))?;
    let changed = formatted != content;
    match opts.mode {
        Mode::Stdout => {
            println!("===== {} =====", path.display());
            print!("{}", formatted);
        }
        Mode::Write => {
            if changed {
                fs::write(path, formatted)
                    .with_context(|| format!("writing {}", path.display()))?;
                debug!(path = %path.display(), "rewrote file");
            }
        }
        Mode::Check => {}
    }
    Ok(changed)
}
