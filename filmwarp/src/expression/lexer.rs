use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextRange {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Single-letter variable or named constant.
    Symbol(char),
    Int(i32),
    Float(f32),

    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,

    Plus,
    Minus,
    Star,
    Slash,
    Hash,
    Underscore,
    Caret,

    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Symbol(c) => format!("'{c}'"),
            Self::Int(v) => format!("'{v}'"),
            Self::Float(v) => format!("'{v}'"),
            Self::LParen => "'('".to_owned(),
            Self::RParen => "')'".to_owned(),
            Self::LBracket => "'['".to_owned(),
            Self::RBracket => "']'".to_owned(),
            Self::Semicolon => "';'".to_owned(),
            Self::Plus => "'+'".to_owned(),
            Self::Minus => "'-'".to_owned(),
            Self::Star => "'*'".to_owned(),
            Self::Slash => "'/'".to_owned(),
            Self::Hash => "'#'".to_owned(),
            Self::Underscore => "'_'".to_owned(),
            Self::Caret => "'^'".to_owned(),
            Self::Eof => "end of input".to_owned(),
        }
    }
}

/// Tokenize expression text. Symbols are single letters, so `xy` lexes as `x` then `y`.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Number: [0-9]+(.[0-9]*)?  A decimal point makes it a float literal.
        if c.is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let is_float = i < bytes.len() && bytes[i] == b'.';
            if is_float {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }

            let s = &input[start..i];
            let kind = if is_float {
                let v: f32 = s
                    .parse()
                    .map_err(|_| ExprError::new(start, "invalid number"))?;
                TokenKind::Float(v)
            } else {
                let v: i32 = s
                    .parse()
                    .map_err(|_| ExprError::new(start, "integer literal out of range"))?;
                TokenKind::Int(v)
            };
            out.push(Token {
                kind,
                range: TextRange { start, end: i },
            });
            continue;
        }

        let kind = match c {
            'a'..='z' | 'A'..='Z' => TokenKind::Symbol(c),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '#' => TokenKind::Hash,
            '_' => TokenKind::Underscore,
            '^' => TokenKind::Caret,
            _ => {
                let ch = input[start..].chars().next().unwrap_or(c);
                return Err(ExprError::new(start, format!("unexpected character '{ch}'")));
            }
        };
        i += 1;
        out.push(Token {
            kind,
            range: TextRange { start, end: i },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        range: TextRange {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}
