use std::io::Write;
use std::path::Path;
use std::process;

use compgraph_core::{lex, KeywordSet};

use crate::{read_input, report_error, Context};

pub(crate) fn cmd_tokens(file: Option<&Path>, keywords: &KeywordSet, ctx: &Context) {
    let src = read_input(file, ctx);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for spanned in lex(&src, keywords) {
        if let Err(e) = writeln!(out, "{}: {}", spanned.line, spanned.token) {
            report_error(&format!("error: {}", e), ctx.output, ctx.quiet);
            process::exit(1);
        }
    }
}
