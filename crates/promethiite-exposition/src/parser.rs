//! Line-oriented parser for the text exposition format.
//!
//! Comment lines (`# HELP`, `# TYPE`) are split on whitespace; sample lines
//! go through the [`Lexer`] and a small recursive descent parser.

use crate::error::ParseError;
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::model::{Labels, MetricFamily, MetricType, Sample};
use crate::span::Span;

/// Parser for one exposition document.
pub struct Parser<'source> {
    source: &'source str,
    families: Vec<MetricFamily>,
    current: Option<MetricFamily>,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given document.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            families: Vec::new(),
            current: None,
        }
    }

    /// Parse the whole document into families, in document order.
    pub fn parse(mut self) -> Result<Vec<MetricFamily>, ParseError> {
        let mut offset = 0;
        for raw in self.source.split_inclusive('\n') {
            let line_start = offset;
            offset += raw.len();

            let line = raw.trim_end_matches(['\n', '\r']);
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let start = line_start + (line.len() - line.trim_start().len());
            let span = Span::new(start, start + text.len());

            match text.strip_prefix('#') {
                Some(comment) => self.parse_comment(comment, span)?,
                None => {
                    let sample = SampleParser::new(text, start).parse()?;
                    self.push_sample(sample);
                }
            }
        }

        self.close_family();
        Ok(self.families)
    }

    /// Handle a `#` line. Only `HELP` and `TYPE` carry meaning.
    fn parse_comment(&mut self, comment: &str, span: Span) -> Result<(), ParseError> {
        if !comment.starts_with(char::is_whitespace) {
            return Ok(());
        }
        let Some((keyword, rest)) = next_word(comment) else {
            return Ok(());
        };

        match keyword {
            "HELP" => {
                let (name, text) = next_word(rest).ok_or_else(|| {
                    ParseError::new("HELP line is missing a metric name", span)
                })?;
                let family = self.open_family(name);
                family.help = Some(unescape_help(text.trim_start()));
            }
            "TYPE" => {
                let (name, rest) = next_word(rest).ok_or_else(|| {
                    ParseError::new("TYPE line is missing a metric name", span)
                })?;
                let keyword = rest.trim();
                let metric_type = MetricType::from_keyword(keyword).ok_or_else(|| {
                    let message = if keyword.is_empty() {
                        format!("TYPE line for '{}' is missing a type", name)
                    } else {
                        format!("invalid metric type '{}'", keyword)
                    };
                    ParseError::new(message, span)
                        .with_hint("expected one of counter, gauge, histogram, summary, untyped")
                })?;
                let family = self.open_family(name);
                family.metric_type = metric_type;
            }
            _ => {}
        }

        Ok(())
    }

    /// Continue the current family if it has this name, otherwise start a new one.
    fn open_family(&mut self, name: &str) -> &mut MetricFamily {
        if self.current.as_ref().map(|f| f.name.as_str()) != Some(name) {
            self.close_family();
        }
        self.current.get_or_insert_with(|| MetricFamily::new(name))
    }

    fn close_family(&mut self) {
        if let Some(family) = self.current.take() {
            self.families.push(family);
        }
    }

    fn push_sample(&mut self, sample: Sample) {
        match &mut self.current {
            Some(family) if family.accepts(&sample.name) => family.samples.push(sample),
            _ => {
                // A stray sample ends the declared family and stands alone.
                self.close_family();
                let mut single = MetricFamily::new(sample.name.clone());
                single.samples.push(sample);
                self.families.push(single);
            }
        }
    }
}

/// Split off the first whitespace-delimited word.
fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// Decode `\\` and `\n` in help text.
fn unescape_help(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                result.push('\\');
            }
            Some('n') => {
                chars.next();
                result.push('\n');
            }
            _ => result.push('\\'),
        }
    }

    result
}

/// Recursive descent parser for a single sample line.
struct SampleParser<'line> {
    lexer: Lexer<'line>,
    line: &'line str,
    offset: usize,
}

impl<'line> SampleParser<'line> {
    fn new(line: &'line str, offset: usize) -> Self {
        Self {
            lexer: Lexer::new(line),
            line,
            offset,
        }
    }

    fn parse(mut self) -> Result<Sample, ParseError> {
        let name = match self.next_token() {
            Some(SpannedToken {
                token: Token::Ident(name),
                ..
            }) => name,
            Some(tok) => {
                return Err(self.error(
                    format!("expected metric name, found {}", tok.token.describe()),
                    tok.span,
                ))
            }
            None => return Err(self.error("expected metric name", self.lexer.end_span())),
        };

        let labels = match self.lexer.peek() {
            Some(tok) if tok.token == Token::LBrace => self.parse_labels()?,
            _ => Labels::new(),
        };

        let value = match self.next_token() {
            Some(SpannedToken {
                token: Token::Number(text) | Token::Ident(text),
                span,
            }) => text.parse::<f64>().map_err(|_| {
                self.error(format!("invalid sample value '{}'", text), span)
            })?,
            Some(tok) => {
                return Err(self.error(
                    format!("expected sample value, found {}", tok.token.describe()),
                    tok.span,
                ))
            }
            None => {
                return Err(self
                    .error("expected sample value", self.lexer.end_span())
                    .with_hint("a sample line ends with a numeric value"))
            }
        };

        let timestamp_ms = match self.next_token() {
            None => None,
            Some(SpannedToken {
                token: Token::Number(text),
                span,
            }) => Some(text.parse::<i64>().map_err(|_| {
                self.error(format!("invalid timestamp '{}'", text), span)
                    .with_hint("timestamps are integer milliseconds since the epoch")
            })?),
            Some(tok) => {
                return Err(self.error(
                    format!("invalid timestamp {}", tok.token.describe()),
                    tok.span,
                ))
            }
        };

        if let Some(tok) = self.next_token() {
            return Err(self.error(
                format!("unexpected {} after sample", tok.token.describe()),
                tok.span,
            ));
        }

        Ok(Sample {
            name,
            labels,
            value,
            timestamp_ms,
            span: Span::new(self.offset, self.offset + self.line.len()),
        })
    }

    /// Parse `{name="value",...}`; a trailing comma is allowed.
    fn parse_labels(&mut self) -> Result<Labels, ParseError> {
        let open = self.next_token();
        debug_assert!(matches!(open.map(|t| t.token), Some(Token::LBrace)));

        let mut labels = Labels::new();
        loop {
            let name = match self.next_token() {
                Some(SpannedToken {
                    token: Token::RBrace,
                    ..
                }) => break,
                Some(SpannedToken {
                    token: Token::Ident(name),
                    span,
                }) => (name, span),
                Some(tok) => {
                    return Err(self.error(
                        format!("expected label name or '}}', found {}", tok.token.describe()),
                        tok.span,
                    ))
                }
                None => return Err(self.unclosed_labels()),
            };

            match self.next_token() {
                Some(SpannedToken {
                    token: Token::Eq, ..
                }) => {}
                Some(tok) => {
                    return Err(self.error(
                        format!("expected '=' after label '{}'", name.0),
                        tok.span,
                    ))
                }
                None => return Err(self.unclosed_labels()),
            }

            let value = match self.next_token() {
                Some(SpannedToken {
                    token: Token::String(value),
                    ..
                }) => value,
                Some(tok) => {
                    return Err(self
                        .error(
                            format!("expected quoted value for label '{}'", name.0),
                            tok.span,
                        )
                        .with_hint("label values are double-quoted strings"))
                }
                None => return Err(self.unclosed_labels()),
            };

            let (label, span) = name;
            if labels.contains_key(&label) {
                return Err(self.error(format!("duplicate label '{}'", label), span));
            }
            labels.insert(label, value);

            match self.next_token() {
                Some(SpannedToken {
                    token: Token::Comma,
                    ..
                }) => continue,
                Some(SpannedToken {
                    token: Token::RBrace,
                    ..
                }) => break,
                Some(tok) => {
                    return Err(self.error(
                        format!("expected ',' or '}}', found {}", tok.token.describe()),
                        tok.span,
                    ))
                }
                None => return Err(self.unclosed_labels()),
            }
        }

        Ok(labels)
    }

    fn next_token(&mut self) -> Option<SpannedToken> {
        self.lexer.next_token()
    }

    fn unclosed_labels(&self) -> ParseError {
        self.error("unclosed label set", self.lexer.end_span())
            .with_hint("label sets end with '}'")
    }

    /// Build an error with the line-relative span moved to document coordinates.
    fn error(&self, message: impl Into<String>, span: Span) -> ParseError {
        ParseError::new(message, span.shift(self.offset))
    }
}

/// Parse an exposition document.
pub fn parse(source: &str) -> Result<Vec<MetricFamily>, ParseError> {
    Parser::new(source).parse()
}
