use std::io::Write;
use std::path::Path;
use std::process;

use compgraph_core::emit;
use compgraph_core::{extract, DirectoryTemplates, Layout, Templates};

use crate::{read_input, report_diagnostics, report_error, Context, EmitFormat};

pub(crate) fn cmd_llvm(file: &Path, emit: EmitFormat, ctx: &Context) {
    let src = read_input(Some(file), ctx);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match emit {
        EmitFormat::Markup => {
            let source = DirectoryTemplates::new(&ctx.templates);
            let templates = match Templates::load(&source, Layout::Llvm) {
                Ok(t) => t,
                Err(e) => {
                    report_error(&format!("error: {}", e), ctx.output, ctx.quiet);
                    process::exit(1);
                }
            };
            emit::render_ir(&mut out, &templates, &src).map_err(|e| e.to_string())
        }
        EmitFormat::Json => {
            let mut list: Vec<serde_json::Value> = Vec::new();
            let diagnostics = extract(&src, |cfg| list.push(emit::function_to_json(&cfg)));
            let pretty = serde_json::to_string_pretty(&list)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            writeln!(out, "{}", pretty)
                .map(|_| diagnostics)
                .map_err(|e| e.to_string())
        }
    };
    let diagnostics = match written {
        Ok(diagnostics) => diagnostics,
        Err(e) => {
            report_error(&format!("error: {}", e), ctx.output, ctx.quiet);
            process::exit(1);
        }
    };
    drop(out);
    log::info!("{}: {} diagnostics", file.display(), diagnostics.len());

    report_diagnostics(&diagnostics, ctx.output, ctx.quiet);
    if !diagnostics.is_empty() {
        process::exit(1);
    }
}
