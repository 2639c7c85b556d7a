use std::collections::TryReserveError;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::ast::Token;

/// One coordinate component or scalar literal: a signed decimal with an
/// optional unit or percentage qualifier.
static COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?P<unit>px|%w|%h|%)?$")
        .expect("literal pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("malformed literal '{literal}' at position {position}")]
    InvalidLiteral { literal: String, position: usize },

    #[error("cannot allocate literal buffer: {0}")]
    Allocation(#[from] TryReserveError),

    /// A pre-classified stream carried tokens past an explicit `Eof`.
    #[error("unexpected {found} after end of input at token {position}")]
    AfterEof { found: String, position: usize },
}

/// Where the parser pulls its tokens from.
///
/// Implemented by [`Lexer`] for raw rule text and by [`TokenStream`] for
/// tokens that an external scanner already classified.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, LexError>;
}

/// Adapts a sequence of pre-classified tokens. Yields `Eof` once exhausted.
///
/// An explicit `Eof` must be the last token; anything after it is an error.
pub struct TokenStream<I> {
    tokens: I,
    position: usize,
}

impl<I> TokenStream<I>
where
    I: Iterator<Item = Token>,
{
    pub fn new(tokens: impl IntoIterator<Item = Token, IntoIter = I>) -> Self {
        TokenStream {
            tokens: tokens.into_iter(),
            position: 0,
        }
    }
}

impl<I> TokenSource for TokenStream<I>
where
    I: Iterator<Item = Token>,
{
    fn next_token(&mut self) -> Result<Token, LexError> {
        let Some(token) = self.tokens.next() else {
            return Ok(Token::Eof);
        };
        let position = self.position;
        self.position += 1;

        if token == Token::Eof
            && let Some(extra) = self.tokens.next()
        {
            return Err(LexError::AfterEof {
                found: extra.label(),
                position,
            });
        }
        Ok(token)
    }
}

/// Percentage qualifier of one literal component.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Qualifier {
    Plain,
    Width,
    Height,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Classifies the whole input, stopping before `Eof`.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = vec![];
        loop {
            match lexer.next_token()? {
                Token::Eof => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }

    /// Character offset of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a literal up to the next whitespace into a freshly reserved buffer.
    fn read_literal(&mut self) -> Result<String, LexError> {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                break;
            }
            self.advance();
        }

        let mut text = String::new();
        text.try_reserve_exact(self.position - start)?;
        text.extend(&self.input[start..self.position]);
        Ok(text)
    }

    fn classify_literal(text: String, position: usize) -> Result<Token, LexError> {
        let components = match text.split_once(',') {
            None => component_qualifier(&text).map(|q| (q, None)),
            Some((first, second)) => component_qualifier(first)
                .zip(component_qualifier(second))
                .map(|(a, b)| (a, Some(b))),
        };

        let token = match components {
            None => None,
            Some((qualifier, None)) => {
                let digits = text.trim_end_matches(['%', 'w', 'h']).trim_end_matches("px");
                let value = digits.parse::<f64>().ok().filter(|value| value.is_finite());
                value.map(|value| match qualifier {
                    None => Token::Number(value),
                    Some(Qualifier::Plain) => Token::Percentage(value),
                    Some(Qualifier::Width) => Token::PercentageH(value),
                    Some(Qualifier::Height) => Token::PercentageV(value),
                })
            }
            Some((first, Some(second))) => {
                let coord: fn(String) -> Token = match (first, second) {
                    (None, None) => Token::Coord,
                    (Some(Qualifier::Width), None)
                    | (None, Some(Qualifier::Width))
                    | (Some(Qualifier::Width), Some(Qualifier::Width)) => Token::CoordPercentageH,
                    (Some(Qualifier::Height), None)
                    | (None, Some(Qualifier::Height))
                    | (Some(Qualifier::Height), Some(Qualifier::Height)) => Token::CoordPercentageV,
                    _ => Token::CoordPercentage,
                };
                return Ok(coord(text));
            }
        };

        token.ok_or(LexError::InvalidLiteral {
            literal: text,
            position,
        })
    }

    fn operator(&mut self, ch: char, token: Token) -> Result<Token, LexError> {
        if self.peek_char(1) == Some('=') {
            self.advance();
            self.advance();
            Ok(token)
        } else {
            Err(LexError::UnexpectedChar {
                ch,
                position: self.position,
            })
        }
    }

    fn starts_literal(ch: Option<char>) -> bool {
        ch.is_some_and(|c| c.is_ascii_digit() || c == '.')
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let position = self.position;
        match self.current_char() {
            None => Ok(Token::Eof),
            Some('=') => {
                self.advance();
                Ok(Token::Assign)
            }
            Some('+' | '-') if Self::starts_literal(self.peek_char(1)) => {
                let text = self.read_literal()?;
                Self::classify_literal(text, position)
            }
            Some('+') => self.operator('+', Token::AddAssign),
            Some('-') => self.operator('-', Token::SubAssign),
            Some('*') => self.operator('*', Token::MulAssign),
            Some('/') => self.operator('/', Token::DivAssign),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                match ident.as_str() {
                    "nil" => Ok(Token::Nil),
                    _ => Ok(Token::Attr(ident)),
                }
            }
            Some(ch) if Self::starts_literal(Some(ch)) => {
                let text = self.read_literal()?;
                Self::classify_literal(text, position)
            }
            Some(ch) => Err(LexError::UnexpectedChar { ch, position }),
        }
    }
}

/// `None` if `text` is not a literal component, otherwise its percentage
/// qualifier (`Some(None)` for plain numbers and `px`).
fn component_qualifier(text: &str) -> Option<Option<Qualifier>> {
    let captures = COMPONENT.captures(text)?;
    let qualifier = match captures.name("unit").map(|unit| unit.as_str()) {
        None | Some("px") => None,
        Some("%w") => Some(Qualifier::Width),
        Some("%h") => Some(Qualifier::Height),
        Some(_) => Some(Qualifier::Plain),
    };
    Some(qualifier)
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("nil nilx");
    assert_eq!(lexer.next_token().unwrap(), Token::Nil);
    assert_eq!(lexer.next_token().unwrap(), Token::Attr("nilx".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_rule() {
    let mut lexer = Lexer::new("width += 25%");
    assert_eq!(lexer.next_token().unwrap(), Token::Attr("width".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::AddAssign);
    assert_eq!(lexer.next_token().unwrap(), Token::Percentage(25.0));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_mixed_coordinate_qualifiers() {
    let mut lexer = Lexer::new("10%w,20%h");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::CoordPercentage("10%w,20%h".to_string())
    );
}
