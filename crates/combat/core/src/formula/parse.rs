//! Tokenizer and recursive-descent parser.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | STAT | '(' expr ')'
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use super::{BinaryOp, Expr, FormulaError};
use crate::stats::StatKind;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Stat(StatKind),
    Op(BinaryOp),
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Stat(kind) => format!("stat '{kind}'"),
            Token::Op(op) => format!("operator '{}'", op.symbol()),
            Token::LParen => "'('".to_owned(),
            Token::RParen => "')'".to_owned(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<CharIndices<'_>> = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' => {
                let op = match ch {
                    '+' => BinaryOp::Add,
                    '-' => BinaryOp::Sub,
                    '*' => BinaryOp::Mul,
                    _ => BinaryOp::Div,
                };
                tokens.push((Token::Op(op), offset));
                chars.next();
            }
            '(' => {
                tokens.push((Token::LParen, offset));
                chars.next();
            }
            ')' => {
                tokens.push((Token::RParen, offset));
                chars.next();
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber(literal.clone()))?;
                tokens.push((Token::Number(value), offset));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let kind = ident
                    .parse::<StatKind>()
                    .map_err(|_| FormulaError::UnknownIdentifier(ident.clone()))?;
                tokens.push((Token::Stat(kind), offset));
            }
            other => return Err(FormulaError::UnexpectedChar { ch: other, offset }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ (BinaryOp::Add | BinaryOp::Sub))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        while let Some(Token::Op(op @ (BinaryOp::Mul | BinaryOp::Div))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if let Some(Token::Op(BinaryOp::Sub)) = self.peek() {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some((Token::Number(value), _)) => Ok(Expr::Number(value)),
            Some((Token::Stat(kind), _)) => Ok(Expr::Stat(kind)),
            Some((Token::LParen, _)) => {
                let inner = self.expr()?;
                match self.next() {
                    Some((Token::RParen, _)) => Ok(inner),
                    Some((token, offset)) => Err(FormulaError::UnexpectedToken {
                        found: token.describe(),
                        offset,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some((token, offset)) => Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                offset,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

/// Parses formula text into an expression tree.
pub(super) fn parse(source: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;

    // Trailing tokens such as a stray ')' or two adjacent operands
    if let Some((token, offset)) = parser.next() {
        return Err(FormulaError::UnexpectedToken {
            found: token.describe(),
            offset,
        });
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_precedence() {
        let expr = parse("strength + 2 * 3").unwrap();
        let Expr::Binary { op, rhs, .. } = expr else {
            panic!("expected binary root");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert_eq!(
            parse("strength * charisma"),
            Err(FormulaError::UnknownIdentifier("charisma".into()))
        );
    }

    #[test]
    fn rejects_function_calls_and_assignment() {
        assert!(parse("max(strength, 3)").is_err());
        assert!(matches!(
            parse("strength = 3"),
            Err(FormulaError::UnexpectedChar { ch: '=', .. })
        ));
        assert!(matches!(
            parse("strength; 3"),
            Err(FormulaError::UnexpectedChar { ch: ';', .. })
        ));
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        assert_eq!(parse("(strength + 1"), Err(FormulaError::UnexpectedEnd));
        assert!(matches!(
            parse("strength + 1)"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn rejects_empty_and_dangling_operators() {
        assert_eq!(parse("   "), Err(FormulaError::Empty));
        assert_eq!(parse("strength *"), Err(FormulaError::UnexpectedEnd));
        assert!(matches!(
            parse("1..2"),
            Err(FormulaError::InvalidNumber(_))
        ));
    }
}
