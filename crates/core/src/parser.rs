//! Recursive-descent parser for the DOT subset.
//!
//! ```text
//! document        := 'digraph' NAME '{' statement* '}' EOF
//! statement       := graph-directive ';' | vertex-stmt ';'
//! graph-directive := ('size' | 'rankdir' | 'label') '=' STRING
//! vertex-stmt     := NAME ('->' NAME)? attrs?
//! attrs           := '[' (attr (',' attr)*)? ']'
//! attr            := NAME '=' NAME
//! NAME            := IDENT | STRING | keyword
//! ```
//!
//! Mismatches are recorded as diagnostics. In [`ParseMode::Recover`] the
//! parser then carries on as if the expected token had been there, which can
//! desynchronize it on badly broken input; [`ParseMode::FailFast`] stops at
//! the first mismatch instead. Both keep whatever graph was built so far.

use indexmap::IndexMap;

use crate::error::Diagnostic;
use crate::graph::Graph;
use crate::lexer::{self, Keyword, KeywordSet, Spanned, Token};

/// Name given to a vertex whose name could not be parsed.
pub const INVALID_NAME: &str = "$invalid$";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Record every mismatch and keep going.
    #[default]
    Recover,
    /// Stop at the first mismatch.
    FailFast,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub keywords: KeywordSet,
    pub mode: ParseMode,
}

#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Name after `digraph`, if one was parsed.
    pub name: Option<String>,
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

static EOF: Spanned = Spanned {
    token: Token::Eof,
    line: 0,
};

/// Marker returned once fail-fast parsing has given up.
struct Halted;

type Step<T> = Result<T, Halted>;

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    mode: ParseMode,
    name: Option<String>,
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], mode: ParseMode) -> Self {
        Parser {
            tokens,
            pos: 0,
            mode,
            name: None,
            graph: Graph::new(),
            diagnostics: Vec::new(),
        }
    }

    fn cur(&self) -> &'a Spanned {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    fn peek(&self) -> &'a Token {
        &self.cur().token
    }

    /// Move to the next token. The trailing `Eof` is never stepped past.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn report(&mut self, msg: String) -> Step<()> {
        let line = self.cur().line;
        log::debug!("parse error at line {}: {}", line, msg);
        self.diagnostics.push(Diagnostic::parse(line, msg));
        match self.mode {
            ParseMode::Recover => Ok(()),
            ParseMode::FailFast => Err(Halted),
        }
    }

    fn report_expected(&mut self, expected: &str) -> Step<()> {
        let got = self.peek().describe();
        self.report(format!("expected {}, got {}", expected, got))
    }

    /// Consume `token`, or report the mismatch and skip the current token.
    fn expect(&mut self, token: &Token) -> Step<()> {
        if self.peek() != token {
            self.report_expected(&token.describe())?;
        }
        self.advance();
        Ok(())
    }

    fn expect_str(&mut self) -> Step<()> {
        if !matches!(self.peek(), Token::Str(_)) {
            self.report_expected("string")?;
        }
        self.advance();
        Ok(())
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_name(&mut self) -> Step<String> {
        let name = match self.peek() {
            Token::Ident(s) | Token::Str(s) => s.clone(),
            Token::Keyword(k) => k.as_str().to_owned(),
            _ => {
                self.report_expected("identifier or string")?;
                return Ok(INVALID_NAME.to_owned());
            }
        };
        self.advance();
        Ok(name)
    }

    fn parse_attributes(&mut self) -> Step<IndexMap<String, String>> {
        self.expect(&Token::LBracket)?;
        let mut attrs = IndexMap::new();
        let mut first = true;
        loop {
            if self.eat(&Token::RBracket) || matches!(self.peek(), Token::Eof | Token::Error(_)) {
                break;
            }
            if !first {
                self.expect(&Token::Comma)?;
            }
            first = false;
            let name = self.parse_name()?;
            self.expect(&Token::Equals)?;
            let value = self.parse_name()?;
            attrs.insert(name, value);
        }
        Ok(attrs)
    }

    fn parse_statement(&mut self) -> Step<()> {
        if let Token::Keyword(k) = self.peek() {
            if k.is_directive() {
                self.advance();
                self.expect(&Token::Equals)?;
                return self.expect_str();
            }
        }

        let name = self.parse_name()?;
        let src = self.graph.vertex(&name);
        let mut is_edge = false;
        if self.eat(&Token::Arrow) {
            let name = self.parse_name()?;
            let dst = self.graph.vertex(&name);
            self.graph.add_edge(src, dst);
            is_edge = true;
        }
        if self.peek() == &Token::LBracket {
            let attrs = self.parse_attributes()?;
            if !is_edge {
                if let Some(label) = attrs.get(Keyword::Label.as_str()) {
                    self.graph.set_label(src, label.as_str());
                }
            }
        }
        Ok(())
    }

    fn parse_document(&mut self) -> Step<()> {
        self.expect(&Token::Keyword(Keyword::Digraph))?;
        self.name = Some(self.parse_name()?);
        self.expect(&Token::LBrace)?;
        loop {
            if self.eat(&Token::RBrace) {
                break;
            }
            if self.peek() == &Token::Eof {
                self.report_expected(&Token::RBrace.describe())?;
                break;
            }
            self.parse_statement()?;
            self.expect(&Token::Semi)?;
        }
        self.expect(&Token::Eof)
    }

    fn finish(self) -> ParseOutcome {
        ParseOutcome {
            name: self.name,
            graph: self.graph,
            diagnostics: self.diagnostics,
        }
    }
}

/// Parse an already lexed token stream.
pub fn parse(tokens: &[Spanned], mode: ParseMode) -> ParseOutcome {
    let mut p = Parser::new(tokens, mode);
    // A halted parse still hands back its partial graph.
    let _ = p.parse_document();
    let outcome = p.finish();
    log::debug!(
        "parsed {} vertices, {} edges, {} diagnostics",
        outcome.graph.vertex_count(),
        outcome.graph.edge_count(),
        outcome.diagnostics.len()
    );
    outcome
}

/// Lex and parse DOT source text.
///
/// Unrecognized trailing text is reported once as a lexical diagnostic in
/// addition to whatever the parser makes of the error token.
pub fn parse_source(src: &str, options: &ParseOptions) -> ParseOutcome {
    let tokens = lexer::lex(src, &options.keywords);
    let mut diagnostics: Vec<Diagnostic> = tokens
        .iter()
        .filter_map(|s| match &s.token {
            Token::Error(rest) => {
                let first_line = rest.lines().next().unwrap_or("");
                let shown: String = first_line.chars().take(40).collect();
                Some(Diagnostic::lex(s.line, format!("unrecognized input: {}", shown)))
            }
            _ => None,
        })
        .collect();

    let mut outcome = parse(&tokens, options.mode);
    diagnostics.append(&mut outcome.diagnostics);
    outcome.diagnostics = diagnostics;
    outcome
}
