use std::cmp::Ordering;
use std::fmt;

use crate::core::errors::{LayerconfError, Result};

/// Evaluate every `#{...}` in a value whose placeholders are already
/// substituted, keeping the surrounding text.
///
/// `component` is only used in error messages.
pub fn expand(value: &str, component: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("#{") {
        let body_start = start + 2;
        let Some(len) = body_len(&rest[body_start..]) else {
            break;
        };
        let expression = &rest[body_start..body_start + len];

        let result = evaluate(expression).map_err(|reason| LayerconfError::ExpressionEvaluation {
            expression: expression.to_string(),
            component: component.to_string(),
            reason,
        })?;
        tracing::debug!(component, expression, %result, "Evaluated expression");

        out.push_str(&rest[..start]);
        out.push_str(&result.to_string());
        rest = &rest[body_start + len + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Length of an expression body up to its closing `}`, skipping braces
/// inside quoted strings.
fn body_len(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    for (i, c) in body.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Evaluate a single expression body (without `#{` and `}`).
pub fn evaluate(expression: &str) -> std::result::Result<Value, String> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.comparison()?;
    match parser.peek() {
        None => Ok(value),
        Some(token) => Err(format!("unexpected {token}")),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Op(&'static str),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(i) => write!(f, "'{i}'"),
            Token::Float(x) => write!(f, "'{x}'"),
            Token::Str(s) => write!(f, "string '{s}'"),
            Token::Bool(b) => write!(f, "'{b}'"),
            Token::Op(op) => write!(f, "'{op}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

static OPERATORS: [&str; 11] = ["==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "%"];

fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();

    while let Some(c) = rest.chars().next() {
        let consumed = if c == '(' {
            tokens.push(Token::LParen);
            1
        } else if c == ')' {
            tokens.push(Token::RParen);
            1
        } else if c == '\'' {
            let end = rest[1..]
                .find('\'')
                .ok_or_else(|| "unterminated string literal".to_string())?;
            tokens.push(Token::Str(rest[1..=end].to_string()));
            end + 2
        } else if c.is_ascii_digit() {
            let len = rest
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                .unwrap_or(rest.len());
            let literal = &rest[..len];
            tokens.push(if literal.contains('.') {
                Token::Float(literal.parse().map_err(|_| format!("bad number '{literal}'"))?)
            } else {
                Token::Int(literal.parse().map_err(|_| format!("bad number '{literal}'"))?)
            });
            len
        } else if c.is_alphabetic() {
            let len = rest
                .find(|ch: char| !ch.is_alphanumeric())
                .unwrap_or(rest.len());
            match &rest[..len] {
                "true" => tokens.push(Token::Bool(true)),
                "false" => tokens.push(Token::Bool(false)),
                word => return Err(format!("unknown identifier '{word}'")),
            }
            len
        } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            tokens.push(Token::Op(*op));
            op.len()
        } else {
            return Err(format!("unexpected character '{c}'"));
        };
        rest = rest[consumed..].trim_start();
    }

    Ok(tokens)
}

/// Recursive descent, lowest precedence first:
/// comparison, additive, multiplicative, unary, primary.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn take_op(&mut self, ops: &[&str]) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn comparison(&mut self) -> std::result::Result<Value, String> {
        let left = self.additive()?;
        let Some(op) = self.take_op(&["==", "!=", "<=", ">=", "<", ">"]) else {
            return Ok(left);
        };
        let right = self.additive()?;
        compare(op, &left, &right).map(Value::Bool)
    }

    fn additive(&mut self) -> std::result::Result<Value, String> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.take_op(&["+", "-"]) {
            let right = self.multiplicative()?;
            left = arithmetic(op, left, right)?;
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> std::result::Result<Value, String> {
        let mut left = self.unary()?;
        while let Some(op) = self.take_op(&["*", "/", "%"]) {
            let right = self.unary()?;
            left = arithmetic(op, left, right)?;
        }
        Ok(left)
    }

    fn unary(&mut self) -> std::result::Result<Value, String> {
        if self.take_op(&["-"]).is_some() {
            return match self.unary()? {
                Value::Int(i) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
                Value::Float(x) => Ok(Value::Float(-x)),
                other => Err(format!("can't negate '{other}'")),
            };
        }
        self.primary()
    }

    fn primary(&mut self) -> std::result::Result<Value, String> {
        match self.advance() {
            Some(Token::Int(i)) => Ok(Value::Int(i)),
            Some(Token::Float(x)) => Ok(Value::Float(x)),
            Some(Token::Str(s)) => Ok(Value::Str(s)),
            Some(Token::Bool(b)) => Ok(Value::Bool(b)),
            Some(Token::LParen) => {
                let value = self.comparison()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err("missing ')'".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected {token}")),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

fn overflow() -> String {
    "integer overflow".to_string()
}

fn arithmetic(op: &str, left: Value, right: Value) -> std::result::Result<Value, String> {
    match (left, right) {
        (Value::Str(l), r) if op == "+" => Ok(Value::Str(format!("{l}{r}"))),
        (l, Value::Str(r)) if op == "+" => Ok(Value::Str(format!("{l}{r}"))),
        (Value::Int(l), Value::Int(r)) => {
            let result = match op {
                "+" => l.checked_add(r),
                "-" => l.checked_sub(r),
                "*" => l.checked_mul(r),
                "/" | "%" if r == 0 => return Err("division by zero".to_string()),
                "/" => l.checked_div(r),
                _ => l.checked_rem(r),
            };
            result.map(Value::Int).ok_or_else(overflow)
        }
        (l, r) => {
            let (Some(l), Some(r)) = (as_float(&l), as_float(&r)) else {
                return Err(format!("can't apply '{op}' to '{l}' and '{r}'"));
            };
            if matches!(op, "/" | "%") && r == 0.0 {
                return Err("division by zero".to_string());
            }
            Ok(Value::Float(match op {
                "+" => l + r,
                "-" => l - r,
                "*" => l * r,
                "/" => l / r,
                _ => l % r,
            }))
        }
    }
}

fn compare(op: &str, left: &Value, right: &Value) -> std::result::Result<bool, String> {
    let ordering = match (left, right) {
        (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
        (Value::Str(l), Value::Str(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) if matches!(op, "==" | "!=") => Some(l.cmp(r)),
        (l, r) => match (as_float(l), as_float(r)) {
            (Some(l), Some(r)) => l.partial_cmp(&r),
            _ => None,
        },
    };
    let Some(ordering) = ordering else {
        return Err(format!("can't compare '{left}' and '{right}' with '{op}'"));
    };

    Ok(match op {
        "==" => ordering == Ordering::Equal,
        "!=" => ordering != Ordering::Equal,
        "<" => ordering == Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        ">" => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;

    fn eval(expression: &str) -> Value {
        evaluate(expression).unwrap()
    }

    #[test]
    fn integer_arithmetic_with_precedence() {
        assert_eq!(eval("1000 + 1"), Value::Int(1001));
        assert_eq!(eval("2 + 3 * 4"), Value::Int(14));
        assert_eq!(eval("(2 + 3) * 4"), Value::Int(20));
        assert_eq!(eval("10 / 3"), Value::Int(3));
        assert_eq!(eval("10 % 3"), Value::Int(1));
        assert_eq!(eval("-5 + 2"), Value::Int(-3));
        assert_eq!(eval("10 - 2 - 3"), Value::Int(5));
    }

    #[test]
    fn decimals_promote() {
        assert_eq!(eval("1.5 * 2"), Value::Float(3.0));
        assert_eq!(eval("1 / 2.0"), Value::Float(0.5));
    }

    #[test]
    fn strings_concatenate() {
        assert_eq!(eval("'world' + 3"), Value::Str("world3".into()));
        assert_eq!(eval("1 + 2 + 'x'"), Value::Str("3x".into()));
        assert_eq!(eval("'a{b}'"), Value::Str("a{b}".into()));
    }

    #[test]
    fn comparisons_yield_booleans() {
        assert_eq!(eval("1 < 2"), Value::Bool(true));
        assert_eq!(eval("2 >= 3"), Value::Bool(false));
        assert_eq!(eval("'a' == 'a'"), Value::Bool(true));
        assert_eq!(eval("1 == 1.0"), Value::Bool(true));
        assert_eq!(eval("true != false"), Value::Bool(true));
    }

    #[test]
    fn evaluation_errors() {
        assert!(evaluate("1 / 0").unwrap_err().contains("division by zero"));
        assert!(evaluate("1 +").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("foo + 1").is_err());
        assert!(evaluate("'a' - 1").is_err());
        assert!(evaluate("9223372036854775807 + 1").unwrap_err().contains("overflow"));
    }

    #[test]
    fn expand_keeps_surrounding_text() {
        assert_eq!(expand("hello #{'world' + 3}", "svc").unwrap(), "hello world3");
        assert_eq!(expand("#{1000 + 1}", "svc").unwrap(), "1001");
        assert_eq!(expand("a#{1}b#{2}c", "svc").unwrap(), "a1b2c");
        assert_eq!(expand("no expressions", "svc").unwrap(), "no expressions");
        assert_eq!(expand("#{unterminated", "svc").unwrap(), "#{unterminated");
    }

    #[test]
    fn expand_reports_expression_and_component() {
        let err = expand("x=#{1 / 0}", "svc").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExpressionEvaluation);
        let msg = err.to_string();
        assert!(msg.contains("#{1 / 0}"));
        assert!(msg.contains("svc"));
    }
}
