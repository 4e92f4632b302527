//! Reader for the insert statements left in a filtered dump.
//!
//! Grammar: ``INSERT INTO <ident> [(<ident>, ...)] VALUES (<value>, ...), ... ;``
//! where an identifier is bare or backticked and a value is a single-quoted
//! string, an optionally signed number or `NULL`. Any other statement is
//! consumed up to its `;` and reported by its leading keyword.

use crate::error::{MobHealthError, Result};

/// A literal value from an insert row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// String literal, already unquoted.
    Str(String),
    /// Numeric literal as written, `+` sign dropped.
    Number(String),
    Null,
}

impl SqlValue {
    /// Literal text as the extractor sees it. `None` for `NULL`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Str(s) | SqlValue::Number(s) => Some(s),
            SqlValue::Null => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    /// Each row is aligned with `columns`.
    pub rows: Vec<Vec<SqlValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(InsertStatement),
    /// Any statement other than an insert, identified by its leading keyword.
    Other { keyword: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    /// Backtick-quoted identifier.
    Ident(String),
    Str(String),
    Number(String),
    Punct(char),
}

/// Pulls statements one at a time out of dump text.
///
/// Iteration ends cleanly at end of input. The first error is yielded once,
/// after which the iterator is exhausted.
pub struct DumpParser<'a> {
    src: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> DumpParser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            failed: false,
        }
    }

    /// Parse the next statement. `Ok(None)` once the input is exhausted.
    pub fn parse_next(&mut self) -> Result<Option<Statement>> {
        loop {
            let (offset, token) = match self.next_token()? {
                Some(t) => t,
                None => return Ok(None),
            };
            match token {
                // Stray terminators are empty statements
                Token::Punct(';') => continue,
                Token::Word(w) if w.eq_ignore_ascii_case("INSERT") => {
                    return self.parse_insert().map(|insert| Some(Statement::Insert(insert)));
                }
                Token::Word(w) => {
                    self.skip_statement()?;
                    return Ok(Some(Statement::Other {
                        keyword: w.to_ascii_uppercase(),
                    }));
                }
                other => return Err(self.unexpected(offset, &other, "a statement keyword")),
            }
        }
    }

    fn parse_insert(&mut self) -> Result<InsertStatement> {
        self.expect_word("INTO")?;
        let table = self.expect_ident("table name")?;

        let mut columns = Vec::new();
        if self.eat_punct('(')? {
            loop {
                columns.push(self.expect_ident("column name")?);
                if self.comma_or_close()? {
                    break;
                }
            }
        }

        self.expect_word("VALUES")?;
        let mut rows = Vec::new();
        loop {
            rows.push(self.parse_row()?);
            match self.next_token()? {
                Some((_, Token::Punct(','))) => continue,
                Some((_, Token::Punct(';'))) | None => break,
                Some((offset, t)) => return Err(self.unexpected(offset, &t, "',' or ';' after row")),
            }
        }

        Ok(InsertStatement {
            table,
            columns,
            rows,
        })
    }

    fn parse_row(&mut self) -> Result<Vec<SqlValue>> {
        let (offset, open) = self.expect_token("'(' to start a row")?;
        if open != Token::Punct('(') {
            return Err(self.unexpected(offset, &open, "'(' to start a row"));
        }

        let mut row = Vec::new();
        if self.eat_punct(')')? {
            return Ok(row);
        }
        loop {
            let (offset, token) = self.expect_token("a value")?;
            row.push(match token {
                Token::Str(s) => SqlValue::Str(s),
                Token::Number(n) => SqlValue::Number(n),
                Token::Word(w) if w.eq_ignore_ascii_case("NULL") => SqlValue::Null,
                other => return Err(self.unexpected(offset, &other, "a literal value")),
            });
            if self.comma_or_close()? {
                return Ok(row);
            }
        }
    }

    /// Consume `,` (returns false) or `)` (returns true).
    fn comma_or_close(&mut self) -> Result<bool> {
        let (offset, token) = self.expect_token("',' or ')'")?;
        match token {
            Token::Punct(',') => Ok(false),
            Token::Punct(')') => Ok(true),
            other => Err(self.unexpected(offset, &other, "',' or ')'")),
        }
    }

    /// Skip to just past the next `;`, or to end of input.
    fn skip_statement(&mut self) -> Result<()> {
        while let Some((_, token)) = self.next_token()? {
            if token == Token::Punct(';') {
                break;
            }
        }
        Ok(())
    }

    fn eat_punct(&mut self, c: char) -> Result<bool> {
        let mark = self.pos;
        match self.next_token()? {
            Some((_, Token::Punct(p))) if p == c => Ok(true),
            _ => {
                self.pos = mark;
                Ok(false)
            }
        }
    }

    fn expect_word(&mut self, keyword: &str) -> Result<()> {
        match self.expect_token(keyword)? {
            (_, Token::Word(w)) if w.eq_ignore_ascii_case(keyword) => Ok(()),
            (offset, other) => Err(self.unexpected(offset, &other, keyword)),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        match self.expect_token(what)? {
            (_, Token::Word(w)) | (_, Token::Ident(w)) => Ok(w),
            (offset, other) => Err(self.unexpected(offset, &other, what)),
        }
    }

    fn expect_token(&mut self, what: &str) -> Result<(usize, Token)> {
        match self.next_token()? {
            Some(t) => Ok(t),
            None => Err(self.error_at(
                self.src.len(),
                format!("unexpected end of input, expected {}", what),
            )),
        }
    }

    fn unexpected(&self, offset: usize, token: &Token, expected: &str) -> MobHealthError {
        self.error_at(offset, format!("expected {}, found {:?}", expected, token))
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> MobHealthError {
        let (line, column) = line_col(self.src, offset);
        MobHealthError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Next token and its byte offset, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<(usize, Token)>> {
        let src = self.src;
        let rest = &src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        let start = self.pos;

        let mut chars = trimmed.chars();
        let c = match chars.next() {
            Some(c) => c,
            None => return Ok(None),
        };
        let signed = matches!(c, '-' | '+') && chars.next().map_or(false, |d| d.is_ascii_digit());

        let token = match c {
            '\'' => Token::Str(self.quoted(start, '\'', "string literal")?),
            '`' => Token::Ident(self.quoted(start, '`', "quoted identifier")?),
            c if c.is_ascii_digit() || signed => {
                self.pos += 1;
                self.take_while(|d| d.is_ascii_digit() || d == '.');
                let text = &src[start..self.pos];
                Token::Number(text.strip_prefix('+').unwrap_or(text).to_string())
            }
            c if is_word_char(c) => Token::Word(self.take_while(is_word_char).to_string()),
            c => {
                self.pos += c.len_utf8();
                Token::Punct(c)
            }
        };
        Ok(Some((start, token)))
    }

    /// Body of a literal opened by `quote` at `start`. A doubled quote stands for itself;
    /// string literals also take MySQL backslash escapes.
    fn quoted(&mut self, start: usize, quote: char, what: &str) -> Result<String> {
        let src = self.src;
        let body = start + 1;
        let mut chars = src[body..].char_indices().peekable();
        let mut out = String::new();
        while let Some((i, c)) = chars.next() {
            if c == quote {
                if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                    chars.next();
                    out.push(quote);
                    continue;
                }
                self.pos = body + i + 1;
                return Ok(out);
            }
            if c == '\\' && quote == '\'' {
                match chars.next() {
                    Some((_, escaped)) => push_escape(&mut out, escaped),
                    None => break,
                }
                continue;
            }
            out.push(c);
        }
        Err(self.error_at(start, format!("unterminated {}", what)))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }
}

impl Iterator for DumpParser<'_> {
    type Item = Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.parse_next() {
            Ok(Some(statement)) => Some(Ok(statement)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// MySQL backslash escapes. Unknown escapes yield the escaped character itself.
fn push_escape(out: &mut String, c: char) {
    match c {
        '0' => out.push('\0'),
        'b' => out.push('\u{8}'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'Z' => out.push('\u{1a}'),
        // \% and \_ keep their backslash
        '%' | '_' => {
            out.push('\\');
            out.push(c);
        }
        other => out.push(other),
    }
}

/// 1-based line and column (in characters) of a byte offset.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(src.len());
    let before = &src[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
