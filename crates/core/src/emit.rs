//! Markup emission.
//!
//! Each graph becomes one `<g class="layout">` group: a `<text>` element per
//! vertex, a blank line, then a `<path class="edge">` per edge whose `src`
//! and `dst` name vertex ids. Positions are left to whatever renders the
//! markup. Identifiers are fixed once, up front, and never change during
//! emission.

use std::borrow::Cow;
use std::io::Write;

use serde_json::{json, Value};

use crate::error::{Diagnostic, Error};
use crate::graph::Graph;
use crate::ir::{self, FunctionCfg, Terminator};
use crate::template::Templates;

/// How vertex element ids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStyle {
    /// `v0`, `v1`, ... in insertion order.
    Sequential,
    /// The vertex name itself.
    Name,
}

/// Side length of the drawing surface wrapped around each IR function.
pub const SURFACE_SIZE: u32 = 800;

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Element id for every vertex, indexed by [`crate::graph::VertexId`].
pub fn assign_ids(graph: &Graph, style: IdStyle) -> Vec<String> {
    graph
        .vertices()
        .map(|(id, v)| match style {
            IdStyle::Sequential => format!("v{}", id.index()),
            IdStyle::Name => v.name.clone(),
        })
        .collect()
}

fn write_group<W: Write>(
    out: &mut W,
    graph: &Graph,
    style: IdStyle,
    terminator: impl Fn(&str) -> Option<Terminator>,
) -> std::io::Result<()> {
    let ids = assign_ids(graph, style);

    writeln!(out, "<g class=\"layout\">")?;
    for (id, vertex) in graph.vertices() {
        let element_id = escape(&ids[id.index()]);
        match terminator(&vertex.name) {
            Some(insn) => {
                writeln!(out, "  <g id=\"{}\" class=\"vlayout\">", element_id)?;
                writeln!(out, "    <text>{}:</text>", escape(&vertex.label))?;
                writeln!(out, "    <text>&nbsp;&nbsp;{}</text>", insn)?;
                writeln!(out, "  </g>")?;
            }
            None => {
                writeln!(
                    out,
                    "  <text id=\"{}\">{}</text>",
                    element_id,
                    escape(&vertex.label)
                )?;
            }
        }
    }
    writeln!(out)?;
    for edge in graph.edges() {
        writeln!(
            out,
            "  <path class=\"edge\" src=\"{}\" dst=\"{}\"/>",
            escape(&ids[edge.src.index()]),
            escape(&ids[edge.dst.index()])
        )?;
    }
    writeln!(out, "</g>")
}

/// Write a parsed DOT graph with sequential ids and vertex labels.
pub fn write_dot_graph<W: Write>(out: &mut W, graph: &Graph) -> std::io::Result<()> {
    write_group(out, graph, IdStyle::Sequential, |_| None)
}

/// Write one IR function: heading, drawing surface, then its block group.
pub fn write_function<W: Write>(out: &mut W, cfg: &FunctionCfg) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "<h2>{}</h2>", escape(&cfg.name))?;
    writeln!(
        out,
        "<svg width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">",
        SURFACE_SIZE
    )?;
    write_group(out, &cfg.graph, IdStyle::Name, |block| cfg.terminator(block))?;
    writeln!(out, "</svg>")
}

/// Header, the DOT graph, footer.
pub fn render_dot<W: Write>(
    out: &mut W,
    templates: &Templates,
    graph: &Graph,
) -> Result<(), Error> {
    out.write_all(&templates.header)?;
    write_dot_graph(out, graph)?;
    out.write_all(&templates.footer)?;
    out.flush()?;
    Ok(())
}

/// Header, every function in order, footer.
pub fn render_functions<W: Write>(
    out: &mut W,
    templates: &Templates,
    functions: &[FunctionCfg],
) -> Result<(), Error> {
    out.write_all(&templates.header)?;
    for cfg in functions {
        write_function(out, cfg)?;
    }
    out.write_all(&templates.footer)?;
    out.flush()?;
    Ok(())
}

/// Header, each function of the IR in `src` as soon as it is extracted,
/// footer. Returns the extraction diagnostics.
///
/// After the first write failure the remaining functions are still
/// extracted but no longer written.
pub fn render_ir<W: Write>(
    out: &mut W,
    templates: &Templates,
    src: &str,
) -> Result<Vec<Diagnostic>, Error> {
    out.write_all(&templates.header)?;
    let mut failed: Option<std::io::Error> = None;
    let diagnostics = ir::extract(src, |cfg| {
        if failed.is_none() {
            if let Err(e) = write_function(out, &cfg) {
                failed = Some(e);
            }
        }
    });
    if let Some(e) = failed {
        return Err(e.into());
    }
    out.write_all(&templates.footer)?;
    out.flush()?;
    Ok(diagnostics)
}

/// JSON view of a graph: vertices with their element ids, edges by id.
pub fn graph_to_json(graph: &Graph, style: IdStyle) -> Value {
    let ids = assign_ids(graph, style);
    let vertices: Vec<Value> = graph
        .vertices()
        .map(|(id, v)| {
            json!({
                "id":    ids[id.index()],
                "name":  v.name,
                "label": v.label,
            })
        })
        .collect();
    let edges: Vec<Value> = graph
        .edges()
        .iter()
        .map(|e| json!({ "src": ids[e.src.index()], "dst": ids[e.dst.index()] }))
        .collect();
    json!({ "vertices": vertices, "edges": edges })
}

pub fn function_to_json(cfg: &FunctionCfg) -> Value {
    let terminators: serde_json::Map<String, Value> = cfg
        .terminators
        .iter()
        .map(|(block, insn)| (block.clone(), json!(insn.as_str())))
        .collect();
    let mut value = graph_to_json(&cfg.graph, IdStyle::Name);
    value["function"] = json!(cfg.name);
    value["terminators"] = Value::Object(terminators);
    value
}
