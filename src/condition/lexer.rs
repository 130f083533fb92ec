//! Condition tokenizer.

use std::iter::Peekable;
use std::str::CharIndices;

use super::ConditionError;

/// A lexical token of the condition language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{step.field}` reference into the result store.
    Reference { step: String, field: String },
    /// Quoted string literal.
    Str(String),
    /// Numeric literal.
    Number(f64),
    /// Bare word: keyword, boolean/null literal or function name.
    Ident(String),
    LParen,
    RParen,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Minus,
}

impl Token {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Reference { step, field } => format!("{{{}.{}}}", step, field),
            Token::Str(s) => format!("'{}'", s),
            Token::Number(n) => n.to_string(),
            Token::Ident(name) => name.clone(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Eq => "==".to_string(),
            Token::Ne => "!=".to_string(),
            Token::Lt => "<".to_string(),
            Token::Le => "<=".to_string(),
            Token::Gt => ">".to_string(),
            Token::Ge => ">=".to_string(),
            Token::AndAnd => "&&".to_string(),
            Token::OrOr => "||".to_string(),
            Token::Bang => "!".to_string(),
            Token::Minus => "-".to_string(),
        }
    }
}

/// Split a condition into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(read_reference(&mut chars)?);
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(read_string(&mut chars, c)?));
            }
            '0'..='9' => tokens.push(read_number(&mut chars)?),
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(word));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '=' => {
                chars.next();
                expect_char(&mut chars, '=', position, c)?;
                tokens.push(Token::Eq);
            }
            '!' => {
                chars.next();
                if next_is(&mut chars, '=') {
                    tokens.push(Token::Ne);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '<' => {
                chars.next();
                if next_is(&mut chars, '=') {
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if next_is(&mut chars, '=') {
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '&' => {
                chars.next();
                expect_char(&mut chars, '&', position, c)?;
                tokens.push(Token::AndAnd);
            }
            '|' => {
                chars.next();
                expect_char(&mut chars, '|', position, c)?;
                tokens.push(Token::OrOr);
            }
            other => {
                return Err(ConditionError::UnexpectedCharacter {
                    character: other,
                    position,
                })
            }
        }
    }

    Ok(tokens)
}

fn next_is(chars: &mut Peekable<CharIndices<'_>>, expected: char) -> bool {
    if matches!(chars.peek(), Some(&(_, c)) if c == expected) {
        chars.next();
        true
    } else {
        false
    }
}

fn expect_char(
    chars: &mut Peekable<CharIndices<'_>>,
    expected: char,
    position: usize,
    first: char,
) -> Result<(), ConditionError> {
    if next_is(chars, expected) {
        Ok(())
    } else {
        Err(ConditionError::UnexpectedCharacter {
            character: first,
            position,
        })
    }
}

/// Read `step.field}` after an opening brace. The split is at the last dot.
fn read_reference(chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, ConditionError> {
    let mut body = String::new();
    loop {
        match chars.next() {
            Some((_, '}')) => break,
            Some((_, c)) => body.push(c),
            None => return Err(ConditionError::UnterminatedReference),
        }
    }

    match body.rsplit_once('.') {
        Some((step, field)) if !step.trim().is_empty() && !field.trim().is_empty() => {
            Ok(Token::Reference {
                step: step.trim().to_string(),
                field: field.trim().to_string(),
            })
        }
        _ => Err(ConditionError::InvalidReference { reference: body }),
    }
}

fn read_string(chars: &mut Peekable<CharIndices<'_>>, quote: char) -> Result<String, ConditionError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(value),
            Some((_, '\\')) => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, c)) => value.push(c),
                None => return Err(ConditionError::UnterminatedString),
            },
            Some((_, c)) => value.push(c),
            None => return Err(ConditionError::UnterminatedString),
        }
    }
}

fn read_number(chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, ConditionError> {
    let mut text = String::new();
    let mut seen_dot = false;
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() || c == '_' {
            if c != '_' {
                text.push(c);
            }
            chars.next();
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }

    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| ConditionError::InvalidNumber { text })
}
