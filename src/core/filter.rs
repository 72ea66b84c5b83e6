// src/core/filter.rs
use crate::error::QueryError;
use crate::models::{Note, Value};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `key?`: the attribute is set, whatever its value.
    Present,
}

impl Operator {
    const fn is_range(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Present => "?",
        }
    }
}

/// One attribute test such as `status=draft` or `rating>=3`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub key: String,
    pub operator: Operator,
    /// Absent for [`Operator::Present`].
    pub value: Option<Value>,
}

/// A boolean expression over note attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Predicate(Predicate),
    Not(Box<Filter>),
    /// Matches when every operand matches; the empty conjunction matches every note.
    And(Vec<Filter>),
    Or(Vec<Filter>),
    /// Exactly one of the two operands matches.
    Xor(Box<Filter>, Box<Filter>),
}

impl Default for Filter {
    fn default() -> Self {
        Self::And(Vec::new())
    }
}

impl Filter {
    /// Parses one filter expression.
    ///
    /// ```text
    /// expr  := xor ("or" xor)*
    /// xor   := and ("xor" and)*
    /// and   := unary ("and" unary)*
    /// unary := "not" unary | "(" expr ")" | predicate
    /// ```
    ///
    /// `xor` binds tighter than `or` and looser than `and`, and groups to the left.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] describing the first syntax problem found.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let tokens = lex(input)?;
        if tokens.is_empty() {
            return Err(QueryError::Empty);
        }
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
        };
        let filter = parser.expr()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(filter),
            Some(Token::RParen) => Err(QueryError::UnbalancedParentheses(input.to_owned())),
            Some(token) => Err(QueryError::UnexpectedToken {
                input: input.to_owned(),
                token: token.to_string(),
            }),
        }
    }

    /// Parses several expressions that must all hold.
    ///
    /// # Errors
    ///
    /// Returns the error of the first expression that fails to parse.
    pub fn parse_all<S: AsRef<str>>(inputs: &[S]) -> Result<Self, QueryError> {
        inputs
            .iter()
            .map(|input| Self::parse(input.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::And)
    }

    #[must_use]
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::Predicate(predicate) => predicate.matches(note),
            Self::Not(inner) => !inner.matches(note),
            Self::And(filters) => filters.iter().all(|f| f.matches(note)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(note)),
            Self::Xor(left, right) => left.matches(note) ^ right.matches(note),
        }
    }
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, note: &Note) -> bool {
        let attribute = attribute(note, &self.key);
        let Some(value) = &self.value else {
            return attribute.is_some();
        };

        match self.operator {
            Operator::Present => attribute.is_some(),
            Operator::Eq => attribute.is_some_and(|a| equals(&a, value)),
            Operator::Ne => !attribute.is_some_and(|a| equals(&a, value)),
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
                attribute.is_some_and(|a| self.in_range(&a, value))
            }
        }
    }

    fn in_range(&self, attribute: &Value, bound: &Value) -> bool {
        if let Value::List(items) = attribute {
            return items.iter().any(|item| self.in_range(item, bound));
        }
        let Some(ordering) = attribute.compare(bound) else {
            return false;
        };
        match self.operator {
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Eq | Operator::Ne | Operator::Present => false,
        }
    }
}

/// Equality against a list operand means "any of"; against a list attribute, "contains".
fn equals(attribute: &Value, operand: &Value) -> bool {
    if attribute.matches(operand) {
        return true;
    }
    match operand {
        Value::List(options) => options.iter().any(|option| attribute.matches(option)),
        _ => false,
    }
}

/// Attribute lookup where `title` falls back to the derived title.
fn attribute<'a>(note: &'a Note, key: &str) -> Option<Cow<'a, Value>> {
    match note.metadata.get(key) {
        Some(value) => Some(Cow::Borrowed(value)),
        None if key == "title" => Some(Cow::Owned(Value::String(note.title.clone()))),
        None => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Xor,
    Not,
    Predicate(Predicate),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
            Self::Xor => f.write_str("xor"),
            Self::Not => f.write_str("not"),
            Self::Predicate(p) => match &p.value {
                Some(value) => write!(f, "{}{}{value}", p.key, p.operator.symbol()),
                None => write!(f, "{}?", p.key),
            },
        }
    }
}

const OPERATOR_CHARS: &[char] = &['=', '!', '<', '>', '?'];

fn is_key_char(c: char) -> bool {
    !c.is_whitespace() && !OPERATOR_CHARS.contains(&c) && !matches!(c, '(' | ')' | '"' | '\'')
}

struct Lexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.input.len(), |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &str {
        let start = self.offset();
        while self.peek().is_some_and(&keep) {
            self.pos += 1;
        }
        &self.input[start..self.offset()]
    }

    fn operator(&mut self) -> Option<Operator> {
        let next = self.chars.get(self.pos + 1).map(|&(_, c)| c);
        let (operator, width) = match (self.peek()?, next) {
            ('!', Some('=')) => (Operator::Ne, 2),
            ('<', Some('=')) => (Operator::Le, 2),
            ('>', Some('=')) => (Operator::Ge, 2),
            ('=', Some('=')) => (Operator::Eq, 2),
            ('=', _) => (Operator::Eq, 1),
            ('<', _) => (Operator::Lt, 1),
            ('>', _) => (Operator::Gt, 1),
            ('?', _) => (Operator::Present, 1),
            _ => return None,
        };
        self.pos += width;
        Some(operator)
    }

    /// A quoted string, a bracketed list or a bare word.
    fn raw_value(&mut self) -> Result<&str, QueryError> {
        let start = self.offset();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == quote {
                        return Ok(&self.input[start..self.offset()]);
                    }
                }
                Err(QueryError::UnterminatedQuote(self.input.to_owned()))
            }
            Some('[') => {
                let mut depth = 0usize;
                let mut quote = None;
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    match (quote, c) {
                        (Some(q), c) if c == q => quote = None,
                        (Some(_), _) => {}
                        (None, '"' | '\'') => quote = Some(c),
                        (None, '[') => depth += 1,
                        (None, ']') => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(&self.input[start..self.offset()]);
                            }
                        }
                        (None, _) => {}
                    }
                }
                if quote.is_some() {
                    Err(QueryError::UnterminatedQuote(self.input.to_owned()))
                } else {
                    Err(QueryError::UnbalancedParentheses(self.input.to_owned()))
                }
            }
            _ => Ok(self.take_while(|c| !c.is_whitespace() && c != '(' && c != ')')),
        }
    }
}

fn lex(input: &str) -> Result<Vec<Token>, QueryError> {
    let mut lexer = Lexer {
        input,
        chars: input.char_indices().collect(),
        pos: 0,
    };
    let mut tokens = Vec::new();

    loop {
        lexer.skip_whitespace();
        let Some(c) = lexer.peek() else {
            return Ok(tokens);
        };
        match c {
            '(' => {
                lexer.pos += 1;
                tokens.push(Token::LParen);
                continue;
            }
            ')' => {
                lexer.pos += 1;
                tokens.push(Token::RParen);
                continue;
            }
            c if OPERATOR_CHARS.contains(&c) => {
                return Err(QueryError::MissingKey(input.to_owned()));
            }
            _ => {}
        }

        let key = lexer.take_while(is_key_char).to_owned();
        if key.is_empty() {
            // A stray quote where an attribute name belongs.
            return Err(QueryError::MissingKey(input.to_owned()));
        }
        lexer.skip_whitespace();

        let Some(operator) = lexer.operator() else {
            let keyword = match key.to_lowercase().as_str() {
                "and" => Token::And,
                "or" => Token::Or,
                "xor" => Token::Xor,
                "not" => Token::Not,
                _ => return Err(QueryError::MissingOperator(input.to_owned())),
            };
            tokens.push(keyword);
            continue;
        };

        if operator == Operator::Present {
            tokens.push(Token::Predicate(Predicate {
                key,
                operator,
                value: None,
            }));
            continue;
        }

        lexer.skip_whitespace();
        let raw = lexer.raw_value()?;
        if raw.is_empty() {
            return Err(QueryError::MissingValue(input.to_owned()));
        }
        let value = parse_value(input, raw)?;
        if operator.is_range() && value.is_list() {
            return Err(QueryError::RangeOverList(input.to_owned()));
        }
        tokens.push(Token::Predicate(Predicate {
            key,
            operator,
            value: Some(value),
        }));
    }
}

/// Reads an operand as a YAML literal, so `3` is a number, `true` a boolean and
/// `[a, b]` a list.
fn parse_value(input: &str, raw: &str) -> Result<Value, QueryError> {
    let yaml: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(raw).map_err(|err| QueryError::InvalidValue {
            input: input.to_owned(),
            reason: err.to_string(),
        })?;
    Value::from_yaml(yaml).ok_or_else(|| QueryError::InvalidValue {
        input: input.to_owned(),
        reason: "mappings cannot be compared".to_owned(),
    })
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn eat(&mut self, expected: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<Filter, QueryError> {
        let mut operands = vec![self.xor()?];
        while self.eat(&Token::Or) {
            operands.push(self.xor()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Filter::Or(operands)
        })
    }

    fn xor(&mut self) -> Result<Filter, QueryError> {
        let mut filter = self.and()?;
        while self.eat(&Token::Xor) {
            filter = Filter::Xor(Box::new(filter), Box::new(self.and()?));
        }
        Ok(filter)
    }

    fn and(&mut self) -> Result<Filter, QueryError> {
        let mut operands = vec![self.unary()?];
        while self.eat(&Token::And) {
            operands.push(self.unary()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Filter::And(operands)
        })
    }

    fn unary(&mut self) -> Result<Filter, QueryError> {
        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Err(QueryError::UnexpectedToken {
                input: self.input.to_owned(),
                token: "end of filter".to_owned(),
            });
        };
        self.pos += 1;
        match token {
            Token::Not => Ok(Filter::Not(Box::new(self.unary()?))),
            Token::LParen => {
                let inner = self.expr()?;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    Err(QueryError::UnbalancedParentheses(self.input.to_owned()))
                }
            }
            Token::Predicate(predicate) => Ok(Filter::Predicate(predicate)),
            other => Err(QueryError::UnexpectedToken {
                input: self.input.to_owned(),
                token: other.to_string(),
            }),
        }
    }
}
