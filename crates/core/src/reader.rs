//! Tokenizer and S-expression parser (§4.2).
//!
//! The reader is fed one line at a time and, when it needs more input to
//! finish an expression (an unterminated list, a dangling quote), calls
//! back into the host through a plain `FnMut` rather than blocking on
//! stdin itself — see SPEC_FULL.md §9 ("Suspension-free reading").

use crate::error::{Traced, WispError, WispResult};
use crate::symbol::Interner;
use crate::value::{cons, Value};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;

/// Buffers tokens across `read_expression` calls: a REPL line can contain
/// more than one expression, and a loaded file is tokenized once up front
/// and drained one expression at a time.
#[derive(Default)]
pub struct Reader {
    tokens: VecDeque<String>,
}

impl Reader {
    pub fn new() -> Self {
        Reader {
            tokens: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokenize one line of source and enqueue the tokens (§4.2).
    pub fn feed_line(&mut self, line: &str) {
        for tok in tokenize_line(line) {
            tracing::trace!(token = %tok, "read token");
            self.tokens.push_back(tok);
        }
    }

    /// Read and parse one complete top-level expression, printing `prompt1`
    /// before the first line it needs and `prompt2` before every
    /// continuation line. Returns `Value::Eof` if `input` is exhausted
    /// before any token is available.
    pub fn read_expression(
        &mut self,
        interner: &mut Interner,
        prompt1: &str,
        prompt2: &str,
        input: &mut dyn FnMut() -> Option<String>,
    ) -> WispResult<Value> {
        let mut first = true;
        loop {
            if let Some(tok) = self.tokens.pop_front() {
                return self.parse_from(tok, interner, prompt2, input);
            }
            let prompt = if first { prompt1 } else { prompt2 };
            print!("{prompt}");
            let _ = io::stdout().flush();
            first = false;
            match input() {
                Some(line) => self.feed_line(&line),
                None => return Ok(Value::Eof),
            }
        }
    }

    fn next_token(
        &mut self,
        prompt2: &str,
        input: &mut dyn FnMut() -> Option<String>,
    ) -> WispResult<String> {
        loop {
            if let Some(tok) = self.tokens.pop_front() {
                return Ok(tok);
            }
            print!("{prompt2}");
            let _ = io::stdout().flush();
            match input() {
                Some(line) => self.feed_line(&line),
                None => {
                    return Err(Traced::untraced(WispError::ReaderError(
                        "unexpected end of input".to_string(),
                    )));
                }
            }
        }
    }

    fn parse_from(
        &mut self,
        tok: String,
        interner: &mut Interner,
        prompt2: &str,
        input: &mut dyn FnMut() -> Option<String>,
    ) -> WispResult<Value> {
        match tok.as_str() {
            "(" => self.parse_list(interner, prompt2, input),
            ")" => Err(Traced::untraced(WispError::ReaderError(
                "unexpected )".to_string(),
            ))),
            "'" => {
                let next = self.next_token(prompt2, input)?;
                let inner = self.parse_from(next, interner, prompt2, input)?;
                let quote = Value::Sym(interner.intern("quote"));
                Ok(cons(quote, cons(inner, Value::Null)))
            }
            "#t" => Ok(Value::Bool(true)),
            "#f" => Ok(Value::Bool(false)),
            _ if tok.starts_with('"') => Ok(Value::Str(Rc::from(&tok[1..]))),
            _ => Ok(parse_atom(&tok, interner)),
        }
    }

    fn parse_list(
        &mut self,
        interner: &mut Interner,
        prompt2: &str,
        input: &mut dyn FnMut() -> Option<String>,
    ) -> WispResult<Value> {
        let mut items = Vec::new();
        let mut tail = Value::Null;
        loop {
            let tok = self.next_token(prompt2, input)?;
            if tok == ")" {
                break;
            }
            if tok == "." {
                let tail_tok = self.next_token(prompt2, input)?;
                tail = self.parse_from(tail_tok, interner, prompt2, input)?;
                let close = self.next_token(prompt2, input)?;
                if close != ")" {
                    return Err(Traced::untraced(WispError::ReaderError(
                        "expected ) after dotted tail".to_string(),
                    )));
                }
                break;
            }
            items.push(self.parse_from(tok, interner, prompt2, input)?);
        }
        let mut list = tail;
        for item in items.into_iter().rev() {
            list = cons(item, list);
        }
        Ok(list)
    }
}

/// Parse a non-paren, non-quote, non-string, non-boolean token as a number,
/// falling back to an interned symbol (§4.1 parsing rule).
fn parse_atom(tok: &str, interner: &mut Interner) -> Value {
    if let Ok(n) = tok.parse::<i32>() {
        return Value::Int(n);
    }
    if let Some(big) = crate::bigint::BigInt::parse(tok) {
        return Value::BigInt(big);
    }
    if let Ok(f) = tok.parse::<f64>()
        && tok.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
    {
        return Value::Float(f);
    }
    Value::Sym(interner.intern(tok))
}

/// Tokenize a single line per §4.2: split on `"` to carve out string
/// literals, truncate at the first `;` outside a string, space-pad `'`,
/// `(`, `)`, then split on ASCII whitespace.
fn tokenize_line(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split('"').collect();
    let mut pending_strings: VecDeque<String> = VecDeque::new();
    let mut code_tokens: Vec<String> = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            // Outside a string literal: this is code.
            if let Some(pos) = part.find(';') {
                code_tokens.extend(split_code(&part[..pos]));
                break; // rest of the physical line is a comment
            }
            code_tokens.extend(split_code(part));
            if i + 1 < parts.len() {
                code_tokens.push("#s".to_string());
            }
        } else {
            pending_strings.push_back(format!("\"{part}"));
        }
    }

    code_tokens
        .into_iter()
        .map(|tok| {
            if tok == "#s" {
                pending_strings
                    .pop_front()
                    .expect("placeholder without matching string segment")
            } else {
                tok
            }
        })
        .collect()
}

/// Space-pad `(`, `)`, `'` and split the result on ASCII whitespace.
fn split_code(code: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(code.len());
    for ch in code.chars() {
        if matches!(ch, '(' | ')' | '\'') {
            spaced.push(' ');
            spaced.push(ch);
            spaced.push(' ');
        } else {
            spaced.push(ch);
        }
    }
    spaced
        .split(|c: char| matches!(c, ' ' | '\t' | '\x0B' | '\x0C'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::stringify;

    fn read_all(src: &str, interner: &mut Interner) -> Vec<Value> {
        let mut reader = Reader::new();
        let mut lines = src.lines().map(str::to_string).collect::<VecDeque<_>>();
        let mut out = Vec::new();
        loop {
            let mut input = || lines.pop_front();
            match reader
                .read_expression(interner, "", "", &mut input)
                .unwrap()
            {
                Value::Eof => break,
                v => out.push(v),
            }
        }
        out
    }

    #[test]
    fn reads_atoms() {
        let mut interner = Interner::new();
        let exprs = read_all("42 -7 3.5 #t #f foo", &mut interner);
        assert_eq!(exprs.len(), 6);
        assert_eq!(exprs[0], Value::Int(42));
        assert_eq!(exprs[1], Value::Int(-7));
        assert_eq!(exprs[2], Value::Float(3.5));
        assert_eq!(exprs[3], Value::Bool(true));
        assert_eq!(exprs[4], Value::Bool(false));
        assert_eq!(stringify(&exprs[5], true), "foo");
    }

    #[test]
    fn reads_a_dotted_pair() {
        let mut interner = Interner::new();
        let exprs = read_all("(a . b)", &mut interner);
        assert_eq!(stringify(&exprs[0], true), "(a . b)");
    }

    #[test]
    fn reads_a_proper_list() {
        let mut interner = Interner::new();
        let exprs = read_all("(1 2 3)", &mut interner);
        assert_eq!(stringify(&exprs[0], true), "(1 2 3)");
    }

    #[test]
    fn reads_quote_shorthand() {
        let mut interner = Interner::new();
        let exprs = read_all("'(a b)", &mut interner);
        assert_eq!(stringify(&exprs[0], true), "(quote (a b))");
    }

    #[test]
    fn reads_string_literals_and_ignores_comments() {
        let mut interner = Interner::new();
        let exprs = read_all(r#"(display "hi ; not a comment") ; real comment"#, &mut interner);
        assert_eq!(exprs.len(), 1);
        assert_eq!(stringify(&exprs[0], true), "(display \"hi ; not a comment\")");
    }

    #[test]
    fn expression_spanning_multiple_lines_requests_more_input() {
        let mut interner = Interner::new();
        let mut reader = Reader::new();
        let mut lines = VecDeque::from(["(+ 1".to_string(), "2)".to_string()]);
        let mut input = || lines.pop_front();
        let value = reader
            .read_expression(&mut interner, "", "", &mut input)
            .unwrap();
        assert_eq!(stringify(&value, true), "(+ 1 2)");
    }

    #[test]
    fn unbalanced_close_paren_reports_reader_error() {
        let mut interner = Interner::new();
        let mut reader = Reader::new();
        let mut lines = VecDeque::from([")".to_string()]);
        let mut input = || lines.pop_front();
        let err = reader
            .read_expression(&mut interner, "", "", &mut input)
            .unwrap_err();
        assert!(matches!(err.error, WispError::ReaderError(_)));
    }
}
