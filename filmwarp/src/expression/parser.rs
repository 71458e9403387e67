use crate::expression::ast::{BinaryOp, Expr};
use crate::expression::error::ExprError;
use crate::expression::lexer::{TextRange, Token, TokenKind, lex};

/// Values substituted for the named constants `w`, `h` and `l`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseConsts {
    /// Source frame width (`w`).
    pub width: i32,
    /// Source frame height (`h`).
    pub height: i32,
    /// Source frame count (`l`).
    pub length: i32,
}

/// Parse one coordinate expression such as `w-1-x`.
pub fn parse_expr(src: &str, consts: ParseConsts) -> Result<Expr, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser::new(&tokens, consts);
    let expr = p.parse_sum()?;
    p.finish()?;
    Ok(expr)
}

/// Parse a bracketed triplet `[X;Y;Z]` into its three expressions.
///
/// Parentheses may nest inside each part; only top-level `;` separate parts.
pub fn parse_triplet(src: &str, consts: ParseConsts) -> Result<[Expr; 3], ExprError> {
    let tokens = lex(src)?;
    // The lexer always terminates with Eof.
    let body_end = tokens.len() - 1;

    let Some(open) = tokens.first().filter(|t| t.kind == TokenKind::LBracket) else {
        let at = tokens.first().map_or(0, |t| t.range.start);
        return Err(ExprError::new(at, "expected '[' to open the coordinate triplet"));
    };
    let close = &tokens[body_end.saturating_sub(1)];
    if body_end < 2 || close.kind != TokenKind::RBracket {
        return Err(ExprError::new(
            tokens[body_end].range.start,
            "expected ']' to close the coordinate triplet",
        ));
    }

    let inner = &tokens[1..body_end - 1];
    let mut parts: Vec<(&[Token], TextRange)> = Vec::with_capacity(3);
    let mut depth = 0i32;
    let mut part_start = 0usize;
    for (i, tok) in inner.iter().enumerate() {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth < 0 {
                    return Err(ExprError::new(tok.range.start, "unbalanced brackets"));
                }
            }
            TokenKind::Semicolon if depth == 0 => {
                parts.push((&inner[part_start..i], tok.range));
                part_start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((&inner[part_start..], close.range));

    if parts.len() != 3 {
        return Err(ExprError::new(
            open.range.start,
            format!(
                "coordinate triplet needs exactly 3 expressions, found {}",
                parts.len()
            ),
        ));
    }

    let mut out = Vec::with_capacity(3);
    for (part, end) in parts {
        let mut p = Parser::new(part, consts);
        p.eof.range = end;
        let expr = p.parse_sum()?;
        p.finish()?;
        out.push(expr);
    }
    let [x, y, z]: [Expr; 3] = out
        .try_into()
        .map_err(|_| ExprError::new(open.range.start, "coordinate triplet is incomplete"))?;
    Ok([x, y, z])
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
    consts: ParseConsts,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], consts: ParseConsts) -> Self {
        // Strip a trailing Eof so sub-slices and whole inputs end the same way.
        let tokens = match tokens.split_last() {
            Some((last, rest)) if last.kind == TokenKind::Eof => rest,
            _ => tokens,
        };
        let end = tokens.last().map_or(0, |t| t.range.end);
        Self {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::Eof,
                range: TextRange {
                    start: end,
                    end,
                },
            },
            consts,
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn bump(&mut self) -> Token {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn finish(&self) -> Result<(), ExprError> {
        let t = self.peek();
        match t.kind {
            TokenKind::Eof => Ok(()),
            TokenKind::RParen => Err(ExprError::new(t.range.start, "unbalanced brackets")),
            ref other => Err(ExprError::new(
                t.range.start,
                format!("unexpected {} after expression", other.describe()),
            )),
        }
    }

    /// Tier 1: `+` and `-` separated terms.
    ///
    /// A `-` is left in place for the term parser, which turns it into a negation of the
    /// following term only.
    fn parse_sum(&mut self) -> Result<Expr, ExprError> {
        let first = self.parse_product()?;
        let mut terms = vec![first];
        loop {
            match self.peek().kind {
                TokenKind::Plus => {
                    self.bump();
                    terms.push(self.parse_product()?);
                }
                TokenKind::Minus => terms.push(self.parse_product()?),
                _ => break,
            }
        }
        Ok(collapse(terms, Expr::Sum))
    }

    /// Tier 2: `*` appends a factor; `/`, `#` and `_` bind to the previous factor only.
    fn parse_product(&mut self) -> Result<Expr, ExprError> {
        let first = self.parse_power()?;
        let mut factors = vec![first];
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => None,
                TokenKind::Slash => Some(BinaryOp::Div),
                TokenKind::Hash => Some(BinaryOp::Mod),
                TokenKind::Underscore => Some(BinaryOp::FloorDiv),
                _ => break,
            };
            let at = self.bump().range.start;
            let rhs = self.parse_power()?;
            match op {
                None => factors.push(rhs),
                Some(op) => {
                    let lhs = factors
                        .pop()
                        .ok_or_else(|| ExprError::new(at, "missing left operand"))?;
                    factors.push(Expr::binary(op, lhs, rhs));
                }
            }
        }
        Ok(collapse(factors, Expr::Product))
    }

    /// Tier 3: reserved for exponentiation, which is rejected.
    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let term = self.parse_term()?;
        let t = self.peek();
        if t.kind == TokenKind::Caret {
            return Err(ExprError::new(
                t.range.start,
                "exponentiation is not supported",
            ));
        }
        Ok(term)
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let tok = self.bump();
        let at = tok.range.start;
        match tok.kind {
            TokenKind::LParen => {
                let inner = self.parse_sum()?;
                let close = self.bump();
                if close.kind != TokenKind::RParen {
                    return Err(ExprError::new(close.range.start, "unbalanced brackets"));
                }
                Ok(inner)
            }
            TokenKind::Plus => self.parse_term(),
            TokenKind::Minus => Ok(Expr::scale_int(-1, self.parse_term()?)),
            TokenKind::Int(v) => Ok(Expr::ConstInt(v)),
            TokenKind::Float(v) => Ok(Expr::ConstFloat(v)),
            TokenKind::Symbol(c) => self.symbol(c, at),
            TokenKind::RParen => Err(ExprError::new(at, "unbalanced brackets")),
            TokenKind::Eof => Err(ExprError::new(at, "unexpected end of expression")),
            other => Err(ExprError::new(
                at,
                format!("expected a term, found {}", other.describe()),
            )),
        }
    }

    fn symbol(&self, c: char, at: usize) -> Result<Expr, ExprError> {
        Ok(match c {
            'x' => Expr::VarX,
            'y' => Expr::VarY,
            'z' | 't' => Expr::VarZ,
            'w' => Expr::ConstInt(self.consts.width),
            'h' => Expr::ConstInt(self.consts.height),
            'l' => Expr::ConstInt(self.consts.length),
            _ => return Err(ExprError::new(at, format!("unknown symbol '{c}'"))),
        })
    }
}

fn collapse(mut children: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if children.len() == 1
        && let Some(only) = children.pop()
    {
        return only;
    }
    wrap(children)
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
