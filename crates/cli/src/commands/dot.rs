use std::io::Write;
use std::path::Path;
use std::process;

use compgraph_core::emit::{self, IdStyle};
use compgraph_core::{
    parse_source, DirectoryTemplates, KeywordSet, Layout, ParseMode, ParseOptions, Templates,
};

use crate::{read_input, report_diagnostics, report_error, Context, EmitFormat};

pub(crate) fn cmd_dot(
    file: Option<&Path>,
    keywords: KeywordSet,
    mode: ParseMode,
    emit: EmitFormat,
    ctx: &Context,
) {
    let src = read_input(file, ctx);
    let outcome = parse_source(&src, &ParseOptions { keywords, mode });
    log::info!(
        "digraph {}: {} vertices, {} edges",
        outcome.name.as_deref().unwrap_or("?"),
        outcome.graph.vertex_count(),
        outcome.graph.edge_count()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match emit {
        EmitFormat::Markup => {
            let source = DirectoryTemplates::new(&ctx.templates);
            let templates = match Templates::load(&source, Layout::Dot) {
                Ok(t) => t,
                Err(e) => {
                    report_error(&format!("error: {}", e), ctx.output, ctx.quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = emit::render_dot(&mut out, &templates, &outcome.graph) {
                report_error(&format!("error: {}", e), ctx.output, ctx.quiet);
                process::exit(1);
            }
        }
        EmitFormat::Json => {
            let mut value = emit::graph_to_json(&outcome.graph, IdStyle::Sequential);
            value["name"] = serde_json::json!(outcome.name);
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            if let Err(e) = writeln!(out, "{}", pretty) {
                report_error(&format!("error: {}", e), ctx.output, ctx.quiet);
                process::exit(1);
            }
        }
    }
    drop(out);

    report_diagnostics(&outcome.diagnostics, ctx.output, ctx.quiet);
    if outcome.had_error() {
        process::exit(1);
    }
}
