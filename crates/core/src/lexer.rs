use std::fmt;

/// Words the lexer may reserve. Which of them are actually reserved is
/// decided by the [`KeywordSet`] handed to [`lex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    Digraph,
    Size,
    Rankdir,
    Label,
}

impl Keyword {
    pub const ALL: [Keyword; 4] = [
        Keyword::Digraph,
        Keyword::Size,
        Keyword::Rankdir,
        Keyword::Label,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Digraph => "digraph",
            Keyword::Size => "size",
            Keyword::Rankdir => "rankdir",
            Keyword::Label => "label",
        }
    }

    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL.into_iter().find(|k| k.as_str() == word)
    }

    /// Graph-level `keyword = "..."` directives, parsed and thrown away.
    pub fn is_directive(self) -> bool {
        !matches!(self, Keyword::Digraph)
    }
}

/// The reserved words for one lexer run.
///
/// `digraph` is always reserved since every document starts with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<Keyword>,
}

impl KeywordSet {
    pub fn new(words: impl IntoIterator<Item = Keyword>) -> Self {
        let mut set = KeywordSet {
            words: vec![Keyword::Digraph],
        };
        for word in words {
            if !set.words.contains(&word) {
                set.words.push(word);
            }
        }
        set
    }

    /// `digraph` and `size` only.
    pub fn minimal() -> Self {
        KeywordSet::new([Keyword::Size])
    }

    /// `digraph`, `size`, `rankdir` and `label`.
    pub fn extended() -> Self {
        KeywordSet::new(Keyword::ALL)
    }

    pub fn contains(&self, keyword: Keyword) -> bool {
        self.words.contains(&keyword)
    }

    pub fn lookup(&self, word: &str) -> Option<Keyword> {
        Keyword::from_word(word).filter(|k| self.contains(*k))
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        KeywordSet::extended()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier that is not a reserved word
    Ident(String),
    /// Double-quoted string, quotes stripped, no escapes
    Str(String),
    Keyword(Keyword),
    Arrow,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semi,
    Equals,
    Comma,
    /// Text the lexer could not classify; always the rest of the input
    Error(String),
    Eof,
}

impl Token {
    /// Short description used in "expected X, got Y" messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(_) => "identifier".to_owned(),
            Token::Str(_) => "string".to_owned(),
            Token::Keyword(k) => format!("'{}'", k.as_str()),
            Token::Arrow => "'->'".to_owned(),
            Token::LBracket => "'['".to_owned(),
            Token::RBracket => "']'".to_owned(),
            Token::LBrace => "'{'".to_owned(),
            Token::RBrace => "'}'".to_owned(),
            Token::Semi => "';'".to_owned(),
            Token::Equals => "'='".to_owned(),
            Token::Comma => "','".to_owned(),
            Token::Error(_) => "unrecognized input".to_owned(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "Ident({})", s),
            Token::Str(s) => write!(f, "Str(\"{}\")", s),
            Token::Keyword(k) => write!(f, "Keyword({})", k.as_str()),
            Token::Error(rest) => write!(f, "Error({:?})", rest),
            Token::Eof => write!(f, "Eof"),
            other => write!(f, "{}", other.describe().trim_matches('\'')),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
}

/// Scan DOT-like source into a token stream.
///
/// Never fails: the first character no rule accepts turns the remaining
/// text into a single [`Token::Error`]. The stream always ends with
/// [`Token::Eof`].
pub fn lex(src: &str, keywords: &KeywordSet) -> Vec<Spanned> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];
        let tok_line = line;

        // Identifier / keyword
        if c.is_ascii_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let token = match keywords.lookup(&word) {
                Some(k) => Token::Keyword(k),
                None => Token::Ident(word),
            };
            tokens.push(Spanned {
                token,
                line: tok_line,
            });
            continue;
        }

        if c == '-' && chars.get(pos + 1) == Some(&'>') {
            tokens.push(Spanned {
                token: Token::Arrow,
                line: tok_line,
            });
            pos += 2;
            continue;
        }

        // Block comment; an unterminated one falls through to the error case
        if c == '/' && chars.get(pos + 1) == Some(&'*') {
            if let Some(end) = find_comment_end(&chars, pos + 2) {
                line += chars[pos..end].iter().filter(|&&ch| ch == '\n').count() as u32;
                pos = end;
                continue;
            }
        }

        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
            }
            pos += 1;
            continue;
        }

        if c == '"' {
            if let Some(close) = chars[pos + 1..].iter().position(|&ch| ch == '"') {
                let end = pos + 1 + close;
                let s: String = chars[pos + 1..end].iter().collect();
                line += s.matches('\n').count() as u32;
                tokens.push(Spanned {
                    token: Token::Str(s),
                    line: tok_line,
                });
                pos = end + 1;
                continue;
            }
        }

        let punct = match c {
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ';' => Some(Token::Semi),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '=' => Some(Token::Equals),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = punct {
            tokens.push(Spanned {
                token,
                line: tok_line,
            });
            pos += 1;
            continue;
        }

        let rest: String = chars[pos..].iter().collect();
        tokens.push(Spanned {
            token: Token::Error(rest),
            line: tok_line,
        });
        break;
    }

    log::trace!("lexed {} tokens", tokens.len());
    tokens.push(Spanned {
        token: Token::Eof,
        line,
    });
    tokens
}

/// Index just past the closing `*/`, searching from `from`.
fn find_comment_end(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1))
        .find(|&i| chars[i] == '*' && chars[i + 1] == '/')
        .map(|i| i + 2)
}
