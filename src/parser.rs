//! Parsing of decision expressions.
//!
//! The grammar, from lowest to highest precedence:
//!
//! ```text
//! expr := and ( ("or"  | "||" | "|") and )*
//! and  := not ( ("and" | "&&" | "&") not )*
//! not  := ("not" | "!" | "~") not | atom
//! atom := IDENT | "True" | "False" | "(" expr ")"
//! ```
//!
//! Nesting of parentheses and `not`, and the depth of the resulting tree, are
//! limited to [`MAX_DEPTH`] so that evaluation stays within the stack.
//!
//! Conditions are the distinct identifiers of the expression, sorted
//! alphabetically. That order fixes their bit positions in the truth table.
//!
//! # Examples
//!
//! ```
//! use mcdc_rs::parser::parse;
//!
//! let decision = parse("(Reset or (M1 and M2)) and not Deactivate").unwrap();
//! assert_eq!(decision.conditions(), ["Deactivate", "M1", "M2", "Reset"]);
//! assert!(decision.evaluate(&[false, false, false, true]));
//! ```

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::ast::{Decision, Expr};
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Const(bool),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Const(true) => "True".to_string(),
            Token::Const(false) => "False".to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Not => "not".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// Token with its byte offset.
type Spanned = (Token, usize);

fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            let mut end = pos;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &input[pos..end];
            let token = match word {
                "and" => Token::And,
                "or" => Token::Or,
                "not" => Token::Not,
                "True" => Token::Const(true),
                "False" => Token::Const(false),
                _ => Token::Ident(word.to_string()),
            };
            tokens.push((token, pos));
            continue;
        }

        chars.next();
        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '!' | '~' => Token::Not,
            '&' | '|' => {
                // Accept both the single and the doubled form.
                if matches!(chars.peek(), Some(&(_, c)) if c == ch) {
                    chars.next();
                }
                if ch == '&' {
                    Token::And
                } else {
                    Token::Or
                }
            }
            _ => return Err(ParseError::UnexpectedChar { ch, position: pos }),
        };
        tokens.push((token, pos));
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses and `not`, and deepest expression tree, accepted.
pub const MAX_DEPTH: usize = 256;

fn check_depth(depth: usize, position: usize) -> Result<usize, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeep { position });
    }
    Ok(depth)
}

/// Parse functions return the expression together with its tree depth.
struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    nesting: usize,
    positions: HashMap<&'a str, usize>,
}

impl<'a> Parser<'a> {
    /// Position of the next token if it is `token`.
    fn peek_is(&self, token: &Token) -> Option<usize> {
        match self.tokens.get(self.pos) {
            Some((t, position)) if t == token => Some(*position),
            _ => None,
        }
    }

    fn bump(&mut self) -> Option<&'a Spanned> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn enter(&mut self, position: usize) -> Result<(), ParseError> {
        self.nesting += 1;
        check_depth(self.nesting, position).map(|_| ())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn parse_or(&mut self) -> Result<(Expr, usize), ParseError> {
        let (mut lhs, mut depth) = self.parse_and()?;
        while let Some(position) = self.peek_is(&Token::Or) {
            self.bump();
            let (rhs, d) = self.parse_and()?;
            depth = check_depth(depth.max(d) + 1, position)?;
            lhs = Expr::or(lhs, rhs);
        }
        Ok((lhs, depth))
    }

    fn parse_and(&mut self) -> Result<(Expr, usize), ParseError> {
        let (mut lhs, mut depth) = self.parse_not()?;
        while let Some(position) = self.peek_is(&Token::And) {
            self.bump();
            let (rhs, d) = self.parse_not()?;
            depth = check_depth(depth.max(d) + 1, position)?;
            lhs = Expr::and(lhs, rhs);
        }
        Ok((lhs, depth))
    }

    fn parse_not(&mut self) -> Result<(Expr, usize), ParseError> {
        if let Some(position) = self.peek_is(&Token::Not) {
            self.bump();
            self.enter(position)?;
            let (inner, depth) = self.parse_not()?;
            self.leave();
            return Ok((Expr::not(inner), check_depth(depth + 1, position)?));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<(Expr, usize), ParseError> {
        let (token, position) = self.bump().ok_or(ParseError::UnexpectedEnd)?;
        match token {
            Token::Ident(name) => Ok((Expr::var(self.positions[name.as_str()]), 1)),
            Token::Const(b) => Ok((Expr::constant(*b), 1)),
            Token::LParen => {
                self.enter(*position)?;
                let inner = self.parse_or().map_err(|e| match e {
                    ParseError::UnexpectedEnd => ParseError::UnclosedParen {
                        position: *position,
                    },
                    e => e,
                })?;
                self.leave();
                match self.bump() {
                    Some((Token::RParen, _)) => Ok(inner),
                    Some((other, pos)) => Err(ParseError::UnexpectedToken {
                        token: other.describe(),
                        position: *pos,
                    }),
                    None => Err(ParseError::UnclosedParen {
                        position: *position,
                    }),
                }
            }
            other => Err(ParseError::UnexpectedToken {
                token: other.describe(),
                position: *position,
            }),
        }
    }
}

/// Parses a decision expression.
pub fn parse(input: &str) -> Result<Decision, ParseError> {
    let tokens = tokenize(input)?;

    let names: BTreeSet<&str> = tokens
        .iter()
        .filter_map(|(t, _)| match t {
            Token::Ident(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    if names.is_empty() {
        return Err(ParseError::NoConditions);
    }
    let conditions: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    debug!("parse: conditions = {:?}", conditions);

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        nesting: 0,
        positions: names.iter().enumerate().map(|(k, &name)| (name, k)).collect(),
    };
    let (expr, depth) = parser.parse_or()?;
    if let Some((token, position)) = tokens.get(parser.pos) {
        return Err(ParseError::UnexpectedToken {
            token: token.describe(),
            position: *position,
        });
    }
    debug!("parse: {} nodes, depth {}", expr.size(), depth);

    Ok(Decision::new(conditions, expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_conditions_sorted_unique() {
        let decision = parse("B and A or B and C").unwrap();
        assert_eq!(decision.conditions(), ["A", "B", "C"]);
    }

    #[test]
    fn test_precedence() {
        // `and` binds tighter than `or`, `not` tighter than both.
        let decision = parse("A or B and not C").unwrap();
        assert_eq!(
            decision.expr(),
            &Expr::or(Expr::var(0), Expr::and(Expr::var(1), Expr::not(Expr::var(2))))
        );
        assert_eq!(decision.to_string(), "A or B and not C");
    }

    #[test]
    fn test_symbolic_operators() {
        let words = parse("(A and B) or not C").unwrap();
        let symbols = parse("(A && B) || !C").unwrap();
        let single = parse("(A & B) | ~C").unwrap();
        assert_eq!(words, symbols);
        assert_eq!(words, single);
    }

    #[test]
    fn test_constants_are_not_conditions() {
        let decision = parse("A and True or False").unwrap();
        assert_eq!(decision.conditions(), ["A"]);
        assert!(decision.evaluate(&[true]));
        assert!(!decision.evaluate(&[false]));
    }

    #[test]
    fn test_identifiers() {
        let decision = parse("_x1 or speed_ok2").unwrap();
        assert_eq!(decision.conditions(), ["_x1", "speed_ok2"]);
    }

    #[test]
    fn test_no_conditions() {
        assert_eq!(parse("True and not False"), Err(ParseError::NoConditions));
        assert_eq!(parse("   "), Err(ParseError::NoConditions));
    }

    #[test]
    fn test_unclosed_paren() {
        assert_eq!(
            parse("A and B or (C and not D"),
            Err(ParseError::UnclosedParen { position: 11 })
        );
    }

    #[test]
    fn test_unexpected_token() {
        assert_eq!(
            parse("A B"),
            Err(ParseError::UnexpectedToken {
                token: "B".to_string(),
                position: 2
            })
        );
        assert_eq!(
            parse("A and )"),
            Err(ParseError::UnexpectedToken {
                token: ")".to_string(),
                position: 6
            })
        );
        assert_eq!(
            parse("(A or B) )"),
            Err(ParseError::UnexpectedToken {
                token: ")".to_string(),
                position: 9
            })
        );
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(parse("A and"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse("not"), Err(ParseError::NoConditions));
    }

    #[test]
    fn test_end_inside_paren() {
        assert_eq!(parse("(A and"), Err(ParseError::UnclosedParen { position: 0 }));
        assert_eq!(parse("A or ("), Err(ParseError::UnclosedParen { position: 5 }));
        // The innermost open parenthesis is reported.
        assert_eq!(
            parse("(B or (A and"),
            Err(ParseError::UnclosedParen { position: 6 })
        );
    }

    #[test]
    fn test_too_deep() {
        let n = 200_000;
        let parens = format!("{}A{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(
            parse(&parens),
            Err(ParseError::TooDeep { position: MAX_DEPTH })
        );

        let nots = format!("{}A", "not ".repeat(n));
        assert_eq!(
            parse(&nots),
            Err(ParseError::TooDeep { position: 4 * MAX_DEPTH })
        );

        // Left-deep chain: the `and` before the term at index k builds depth k + 1.
        let chain = vec!["A"; n].join(" and ");
        assert_eq!(
            parse(&chain),
            Err(ParseError::TooDeep { position: 6 * MAX_DEPTH - 4 })
        );
    }

    #[test]
    fn test_moderate_nesting() {
        let n = 100;
        let parens = format!("{}A{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(parse(&parens).unwrap().expr(), &Expr::var(0));

        let chain = vec!["A", "B"].repeat(n).join(" or ");
        let decision = parse(&chain).unwrap();
        assert!(decision.evaluate(&[false, true]));
        assert!(!decision.evaluate(&[false, false]));
    }

    #[test]
    fn test_unexpected_char() {
        assert_eq!(
            parse("A + B"),
            Err(ParseError::UnexpectedChar { ch: '+', position: 2 })
        );
    }
}
