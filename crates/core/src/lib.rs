//! compgraph-core: text-to-graph front ends and markup emission.
//!
//! Two independent front ends build the same [`Graph`]:
//!
//! - [`parser::parse_source`] -- a DOT subset (`digraph`, `->`, bracketed
//!   attributes), lexed by [`lexer::lex`] with a configurable keyword set;
//! - [`ir::extract`] -- per-function control-flow graphs recovered line by
//!   line from textual LLVM IR.
//!
//! [`emit`] turns either result into a `<g class="layout">` markup group,
//! optionally wrapped in [`template::Templates`] header/footer fragments.

pub mod emit;
pub mod error;
pub mod graph;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod template;

// ── Convenience re-exports ───────────────────────────────────────────

pub use error::{Diagnostic, Error, Stage};
pub use graph::{Edge, Graph, Vertex, VertexId};
pub use ir::{extract, extract_all, Extractor, FunctionCfg, Terminator};
pub use lexer::{lex, Keyword, KeywordSet, Spanned, Token};
pub use parser::{parse, parse_source, ParseMode, ParseOptions, ParseOutcome};
pub use template::{
    DirectoryTemplates, InMemoryTemplates, Layout, TemplateSource, Templates,
};
