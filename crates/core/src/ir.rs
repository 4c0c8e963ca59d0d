//! Control-flow extraction from textual LLVM IR.
//!
//! The input is never tokenized. Each line is run through a fixed list of
//! regex matchers; function headers and block labels open new state, branch
//! and terminator lines annotate the current block, and every `label %name`
//! on a branch line becomes an edge. Numbered blocks, `switch` and
//! `indirectbr` are not recognized and are skipped silently.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::Diagnostic;
use crate::graph::Graph;

/// Block name used for a function body before its first label line.
pub const ENTRY_BLOCK: &str = "0";

static DEFINE_FUNC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^define .*@(?P<name>[^(]+)\(").unwrap());
static BLOCK_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<block>[a-zA-Z0-9_.]+):").unwrap());
static BRANCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?:%[a-zA-Z0-9_.]+ = )?(?P<insn>br|invoke) ").unwrap()
});
static INVOKE_CONT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+to label.*unwind").unwrap());
static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"label %(?P<label>[a-zA-Z0-9_.]+)").unwrap());
static TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(?P<insn>ret|unreachable)\b").unwrap());

/// Instruction that ends a basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Br,
    Invoke,
    Ret,
    Unreachable,
}

impl Terminator {
    pub fn as_str(self) -> &'static str {
        match self {
            Terminator::Br => "br",
            Terminator::Invoke => "invoke",
            Terminator::Ret => "ret",
            Terminator::Unreachable => "unreachable",
        }
    }

    fn from_mnemonic(insn: &str) -> Option<Terminator> {
        match insn {
            "br" => Some(Terminator::Br),
            "invoke" => Some(Terminator::Invoke),
            "ret" => Some(Terminator::Ret),
            "unreachable" => Some(Terminator::Unreachable),
            _ => None,
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One function's control-flow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCfg {
    pub name: String,
    pub graph: Graph,
    /// Last terminator seen per block, keyed by block name.
    pub terminators: IndexMap<String, Terminator>,
}

impl FunctionCfg {
    pub fn terminator(&self, block: &str) -> Option<Terminator> {
        self.terminators.get(block).copied()
    }
}

/// What a single matcher recognized on a line.
#[derive(Debug, Clone, PartialEq)]
enum LineMatch<'l> {
    Define(&'l str),
    Block(&'l str),
    Branch(Terminator),
    Terminator(Terminator),
}

type Matcher = for<'l> fn(&'l str) -> Option<LineMatch<'l>>;

fn match_define(line: &str) -> Option<LineMatch<'_>> {
    let caps = DEFINE_FUNC.captures(line)?;
    Some(LineMatch::Define(caps.name("name")?.as_str()))
}

fn match_block(line: &str) -> Option<LineMatch<'_>> {
    let caps = BLOCK_BEGIN.captures(line)?;
    Some(LineMatch::Block(caps.name("block")?.as_str()))
}

fn match_branch(line: &str) -> Option<LineMatch<'_>> {
    let caps = BRANCH.captures(line)?;
    Terminator::from_mnemonic(caps.name("insn")?.as_str()).map(LineMatch::Branch)
}

fn match_invoke_cont(line: &str) -> Option<LineMatch<'_>> {
    INVOKE_CONT
        .is_match(line)
        .then_some(LineMatch::Branch(Terminator::Invoke))
}

fn match_terminator(line: &str) -> Option<LineMatch<'_>> {
    let caps = TERMINATOR.captures(line)?;
    Terminator::from_mnemonic(caps.name("insn")?.as_str()).map(LineMatch::Terminator)
}

/// Matchers in priority order. A header or label match ends the line;
/// branch and terminator matchers are all consulted.
const MATCHERS: [Matcher; 5] = [
    match_define,
    match_block,
    match_branch,
    match_invoke_cont,
    match_terminator,
];

fn classify(line: &str) -> Vec<LineMatch<'_>> {
    let mut found = Vec::new();
    for matcher in MATCHERS {
        match matcher(line) {
            Some(m @ (LineMatch::Define(_) | LineMatch::Block(_))) => return vec![m],
            // The continuation pattern only matters when the branch one missed.
            Some(LineMatch::Branch(_))
                if found.iter().any(|m| matches!(m, LineMatch::Branch(_))) => {}
            Some(m) => found.push(m),
            None => {}
        }
    }
    found
}

/// Every `label %name` target on a line, in order.
fn label_targets(line: &str) -> impl Iterator<Item = &str> {
    LABEL
        .captures_iter(line)
        .filter_map(|caps| caps.name("label").map(|m| m.as_str()))
}

/// Single-pass, line-at-a-time extractor.
///
/// Each completed function is handed to the sink as soon as the next
/// `define` line arrives, or on [`Extractor::finish`].
pub struct Extractor<F: FnMut(FunctionCfg)> {
    sink: F,
    line: u32,
    function: Option<String>,
    block: Option<String>,
    graph: Graph,
    terminators: IndexMap<String, Terminator>,
    diagnostics: Vec<Diagnostic>,
}

impl<F: FnMut(FunctionCfg)> Extractor<F> {
    pub fn new(sink: F) -> Self {
        Extractor {
            sink,
            line: 0,
            function: None,
            block: None,
            graph: Graph::new(),
            terminators: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        self.line += 1;
        for m in classify(line) {
            match m {
                LineMatch::Define(name) => {
                    self.flush();
                    // Labels seen outside any function must not leak in.
                    self.graph.clear();
                    self.terminators.clear();
                    self.function = Some(name.to_owned());
                    self.block = Some(ENTRY_BLOCK.to_owned());
                }
                LineMatch::Block(name) => {
                    self.graph.vertex(name);
                    self.block = Some(name.to_owned());
                }
                LineMatch::Branch(insn) => {
                    let Some(block) = self.annotate(insn) else {
                        return;
                    };
                    let src = self.graph.vertex(&block);
                    for target in label_targets(line) {
                        let dst = self.graph.vertex(target);
                        self.graph.add_edge(src, dst);
                    }
                }
                LineMatch::Terminator(insn) => {
                    if self.annotate(insn).is_none() {
                        return;
                    }
                }
            }
        }
    }

    /// Record `insn` as the current block's terminator and return the block,
    /// or report the line when no block is open.
    fn annotate(&mut self, insn: Terminator) -> Option<String> {
        let Some(block) = self.block.clone() else {
            self.diagnostics.push(Diagnostic::extract(
                self.line,
                format!("'{}' outside of a basic block", insn),
            ));
            return None;
        };
        self.graph.vertex(&block);
        self.terminators.insert(block.clone(), insn);
        Some(block)
    }

    fn flush(&mut self) {
        let Some(name) = self.function.take() else {
            return;
        };
        let cfg = FunctionCfg {
            name,
            graph: std::mem::take(&mut self.graph),
            terminators: std::mem::take(&mut self.terminators),
        };
        log::debug!(
            "extracted @{}: {} blocks, {} edges",
            cfg.name,
            cfg.graph.vertex_count(),
            cfg.graph.edge_count()
        );
        self.block = None;
        (self.sink)(cfg);
    }

    /// Flush the open function, if any, and return the diagnostics.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.flush();
        self.diagnostics
    }
}

/// Run the extractor over `src`, streaming each function to `sink`.
pub fn extract(src: &str, sink: impl FnMut(FunctionCfg)) -> Vec<Diagnostic> {
    let mut extractor = Extractor::new(sink);
    for line in src.lines() {
        extractor.feed_line(line);
    }
    extractor.finish()
}

/// Collect every function of `src`.
pub fn extract_all(src: &str) -> (Vec<FunctionCfg>, Vec<Diagnostic>) {
    let mut functions = Vec::new();
    let diagnostics = extract(src, |cfg| functions.push(cfg));
    (functions, diagnostics)
}
