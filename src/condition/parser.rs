//! Recursive-descent parser for conditions.
//!
//! Grammar:
//!
//! ```text
//! expr     := or
//! or       := and (("or" | "||") and)*
//! and      := not (("and" | "&&") not)*
//! not      := ("not" | "!") not | compare
//! compare  := unary (cmp_op unary)?
//! cmp_op   := "==" | "!=" | "<" | "<=" | ">" | ">=" | "in" | "not" "in" | "is" | "is" "not"
//! unary    := "-" unary | primary
//! primary  := literal | reference | "len" "(" expr ")" | "(" expr ")"
//! literal  := number | string | True | False | true | false | None | null
//! ```

use serde_json::Value;

use super::lexer::{tokenize, Token};
use super::ConditionError;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
        }
    }
}

/// Parsed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Reference { step: String, field: String },
    Not(Box<Expr>),
    Negate(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Len(Box<Expr>),
}

impl Expr {
    /// Collect every `{step.field}` reference in the expression.
    pub fn references(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Reference { step, field } => out.push((step.as_str(), field.as_str())),
            Expr::Not(inner) | Expr::Negate(inner) | Expr::Len(inner) => {
                inner.collect_references(out)
            }
            Expr::And(left, right)
            | Expr::Or(left, right)
            | Expr::Compare { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
        }
    }
}

/// Parse a condition string.
pub fn parse(input: &str) -> Result<Expr, ConditionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ConditionError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ConditionError::UnexpectedToken {
            found: token.describe(),
        }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(word)) if word == keyword)
    }

    fn peek_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        matches!(self.peek_at(offset), Some(Token::Ident(word)) if word == keyword)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ConditionError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(ConditionError::UnexpectedToken {
                found: token.describe(),
            }),
            None => Err(ConditionError::UnexpectedEnd),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ConditionError> {
        let mut left = self.parse_and()?;
        while self.peek_keyword("or") || matches!(self.peek(), Some(Token::OrOr)) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ConditionError> {
        let mut left = self.parse_not()?;
        while self.peek_keyword("and") || matches!(self.peek(), Some(Token::AndAnd)) {
            self.advance();
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ConditionError> {
        if self.peek_keyword("not") || matches!(self.peek(), Some(Token::Bang)) {
            self.advance();
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Expr, ConditionError> {
        let left = self.parse_unary()?;

        let op = match self.peek() {
            Some(Token::Eq) => Some((CompareOp::Eq, 1)),
            Some(Token::Ne) => Some((CompareOp::Ne, 1)),
            Some(Token::Lt) => Some((CompareOp::Lt, 1)),
            Some(Token::Le) => Some((CompareOp::Le, 1)),
            Some(Token::Gt) => Some((CompareOp::Gt, 1)),
            Some(Token::Ge) => Some((CompareOp::Ge, 1)),
            Some(Token::Ident(word)) => match word.as_str() {
                "in" => Some((CompareOp::In, 1)),
                "not" if self.peek_keyword_at(1, "in") => Some((CompareOp::NotIn, 2)),
                "is" if self.peek_keyword_at(1, "not") => Some((CompareOp::IsNot, 2)),
                "is" => Some((CompareOp::Is, 1)),
                _ => None,
            },
            _ => None,
        };

        let Some((op, width)) = op else {
            return Ok(left);
        };
        self.pos += width;

        let right = self.parse_unary()?;
        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ConditionError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Negate(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ConditionError> {
        match self.advance() {
            None => Err(ConditionError::UnexpectedEnd),
            Some(Token::Number(n)) => Ok(Expr::Literal(number_literal(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Reference { step, field }) => Ok(Expr::Reference { step, field }),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(word)) => match word.as_str() {
                "True" | "true" => Ok(Expr::Literal(Value::Bool(true))),
                "False" | "false" => Ok(Expr::Literal(Value::Bool(false))),
                "None" | "null" => Ok(Expr::Literal(Value::Null)),
                "len" => {
                    self.expect(Token::LParen)?;
                    let inner = self.parse_or()?;
                    self.expect(Token::RParen)?;
                    Ok(Expr::Len(Box::new(inner)))
                }
                _ => Err(ConditionError::UnknownName { name: word }),
            },
            Some(token) => Err(ConditionError::UnexpectedToken {
                found: token.describe(),
            }),
        }
    }
}

/// Whole numbers become integer literals so they match stored integers.
fn number_literal(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
