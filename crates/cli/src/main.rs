mod commands;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use compgraph_core::{Diagnostic, KeywordSet, ParseMode};

/// Output format for diagnostics on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// What goes to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum EmitFormat {
    /// Header fragment, markup groups, footer fragment
    Markup,
    /// The graph model as JSON; templates are not read
    Json,
}

/// Reserved words recognized by the DOT lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KeywordChoice {
    /// digraph, size
    Minimal,
    /// digraph, size, rankdir, label
    Extended,
}

impl KeywordChoice {
    fn keyword_set(self) -> KeywordSet {
        match self {
            KeywordChoice::Minimal => KeywordSet::minimal(),
            KeywordChoice::Extended => KeywordSet::extended(),
        }
    }
}

/// Render DOT graphs and LLVM IR control flow as layout-free markup.
#[derive(Parser)]
#[command(
    name = "compgraph",
    version,
    about = "Render DOT graphs and LLVM IR control flow as layout-free markup"
)]
struct Cli {
    /// Diagnostic format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress text diagnostics
    #[arg(long, global = true)]
    quiet: bool,

    /// Directory holding the header/footer fragments
    #[arg(long, global = true, default_value = ".")]
    templates: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DOT digraph (file or stdin) to markup
    Dot {
        /// Path to the .dot source; reads stdin when omitted or "-"
        file: Option<PathBuf>,
        /// Keyword set used by the lexer
        #[arg(long, default_value = "extended", value_enum)]
        keywords: KeywordChoice,
        /// Stop at the first syntax error instead of recovering
        #[arg(long)]
        fail_fast: bool,
        /// Output kind
        #[arg(long, default_value = "markup", value_enum)]
        emit: EmitFormat,
    },

    /// Extract per-function control-flow graphs from textual LLVM IR
    Llvm {
        /// Path to the .ll file
        file: PathBuf,
        /// Output kind
        #[arg(long, default_value = "markup", value_enum)]
        emit: EmitFormat,
    },

    /// Print the DOT token stream, one token per line
    Tokens {
        /// Path to the .dot source; reads stdin when omitted or "-"
        file: Option<PathBuf>,
        /// Keyword set used by the lexer
        #[arg(long, default_value = "extended", value_enum)]
        keywords: KeywordChoice,
    },
}

/// Options shared by every subcommand.
pub(crate) struct Context {
    pub templates: PathBuf,
    pub output: OutputFormat,
    pub quiet: bool,
}

fn init_logging() {
    // RUST_LOG directives are parsed last so they override the default.
    let _ = env_logger::Builder::new()
        .filter_module("compgraph", log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let ctx = Context {
        templates: cli.templates,
        output: cli.output,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Dot {
            file,
            keywords,
            fail_fast,
            emit,
        } => {
            let mode = if fail_fast {
                ParseMode::FailFast
            } else {
                ParseMode::Recover
            };
            commands::dot::cmd_dot(file.as_deref(), keywords.keyword_set(), mode, emit, &ctx);
        }
        Commands::Llvm { file, emit } => {
            commands::llvm::cmd_llvm(&file, emit, &ctx);
        }
        Commands::Tokens { file, keywords } => {
            commands::tokens::cmd_tokens(file.as_deref(), &keywords.keyword_set(), &ctx);
        }
    }
}

/// Read the whole input, from stdin when `file` is absent or `-`.
pub(crate) fn read_input(file: Option<&Path>, ctx: &Context) -> String {
    let result = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| format!("error reading file '{}': {}", path.display(), e)),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map(|_| buf)
                .map_err(|e| format!("error reading stdin: {}", e))
        }
    };
    match result {
        Ok(src) => src,
        Err(msg) => {
            report_error(&msg, ctx.output, ctx.quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Print diagnostics to stderr. JSON output is printed even when quiet.
pub(crate) fn report_diagnostics(diagnostics: &[Diagnostic], output: OutputFormat, quiet: bool) {
    if diagnostics.is_empty() {
        return;
    }
    match output {
        OutputFormat::Text => {
            if !quiet {
                for d in diagnostics {
                    eprintln!("{}", d);
                }
            }
        }
        OutputFormat::Json => {
            let list: Vec<serde_json::Value> =
                diagnostics.iter().map(Diagnostic::to_json_value).collect();
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&list).unwrap_or_default()
            );
        }
    }
}
