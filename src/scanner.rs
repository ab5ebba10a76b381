//! # Scanner
//!
//! The scanner is responsible for:
//!
//! - reading the source code
//! - producing a stream of tokens.

use crate::utils::Init;

/// ## TokenType
///
/// An enum which represents the different types of tokens.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenType {
  // Single-character tokens.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Minus,
  Plus,
  Semicolon,
  Slash,
  Star,
  // One or two character tokens.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  // Literals.
  Identifier,
  String,
  Number,
  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fn,
  If,
  Null,
  Or,
  Print,
  Return,
  True,
  Var,
  While,
  // Error and EOF.
  Error,
  Eof,
}

/// ## Token
///
/// A struct which represents a token.
#[derive(Clone, Copy)]
pub struct Token<'a> {
  /// The type of the token.
  pub(crate) token_type: TokenType,
  /// The line of the token.
  pub(crate) line: usize,
  /// The lexeme of the token.
  ///
  /// A lexeme is the text that the token represents.
  pub(crate) lexeme: &'a str,
}

impl<'a> Init for Token<'a> {}

impl<'a> Default for Token<'a> {
  fn default() -> Self {
    Self {
      token_type: TokenType::Eof,
      line: 1,
      lexeme: "",
    }
  }
}

/// ## Scanner
///
/// A struct which represents a scanner.
#[derive(Debug)]
pub struct Scanner<'a> {
  /// The source code.
  pub(crate) source: &'a str,
  /// The start position.
  pub(crate) start: usize,
  /// The current position.
  pub(crate) current: usize,
  /// The current line.
  pub(crate) line: usize,
}

impl<'a> Scanner<'a> {
  /// Make a token, specifically from `string`.
  fn string(&mut self) -> Token<'a> {
    // Try finding the closing quote.
    while self.peek() != b'"' && !self.is_at_end() {
      if self.peek() == b'\n' {
        self.line += 1;
      }
      self.advance();
    }

    // Cannot find the closing quote.
    if self.is_at_end() {
      return self.error_token("Unterminated string.");
    }

    self.advance();
    self.make_token(TokenType::String)
  }

  /// Make a token, specifically from `number`.
  fn number(&mut self) -> Token<'a> {
    while self.peek().is_ascii_digit() {
      self.advance();
    }

    // Seeking for a fractional part
    if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
      // Consume the "."
      self.advance();

      // Consume the fractional part
      while self.peek().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenType::Number)
  }

  /// Make a token, specifically from `identifier`/`keyword`.
  fn identifier(&mut self) -> Token<'a> {
    while is_id_continue(self.peek()) {
      self.advance();
    }
    self.make_token(self.identifier_type())
  }

  /// Classify the just-scanned identifier lexeme as a keyword, or as a
  /// plain identifier if it matches none.
  fn identifier_type(&self) -> TokenType {
    let text = &self.source[self.start..self.current];
    let mut chars = text.bytes();
    match chars.next() {
      Some(b'a') => self.check_keyword(text, "and", TokenType::And),
      Some(b'c') => self.check_keyword(text, "class", TokenType::Class),
      Some(b'e') => self.check_keyword(text, "else", TokenType::Else),
      Some(b'f') => match chars.next() {
        Some(b'a') => self.check_keyword(text, "false", TokenType::False),
        Some(b'o') => self.check_keyword(text, "for", TokenType::For),
        Some(b'n') => self.check_keyword(text, "fn", TokenType::Fn),
        _ => TokenType::Identifier,
      },
      Some(b'i') => self.check_keyword(text, "if", TokenType::If),
      Some(b'n') => self.check_keyword(text, "null", TokenType::Null),
      Some(b'o') => self.check_keyword(text, "or", TokenType::Or),
      Some(b'p') => self.check_keyword(text, "print", TokenType::Print),
      Some(b'r') => self.check_keyword(text, "return", TokenType::Return),
      Some(b't') => self.check_keyword(text, "true", TokenType::True),
      Some(b'v') => self.check_keyword(text, "var", TokenType::Var),
      Some(b'w') => self.check_keyword(text, "while", TokenType::While),
      _ => TokenType::Identifier,
    }
  }

  fn check_keyword(&self, text: &str, keyword: &str, token_type: TokenType) -> TokenType {
    if text == keyword {
      token_type
    } else {
      TokenType::Identifier
    }
  }
}

impl<'a> Scanner<'a> {
  /// Make a token.
  fn make_token(&self, token_type: TokenType) -> Token<'a> {
    Token {
      token_type,
      line: self.line,
      lexeme: &self.source[self.start..self.current],
    }
  }

  /// Make an error token.
  fn error_token(&self, message: &'a str) -> Token<'a> {
    Token {
      token_type: TokenType::Error,
      line: self.line,
      lexeme: message,
    }
  }
}

impl<'a> Scanner<'a> {
  /// Scan token from scanner
  pub fn scan_token(&mut self) -> Token<'a> {
    self.skip_white_space();

    // reset start position
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenType::Eof);
    }

    let c = self.advance();

    if is_id_start(c) {
      return self.identifier();
    }
    if c.is_ascii_digit() {
      return self.number();
    }

    match c {
      // mono-character tokens
      b'(' => self.make_token(TokenType::LeftParen),
      b')' => self.make_token(TokenType::RightParen),
      b'{' => self.make_token(TokenType::LeftBrace),
      b'}' => self.make_token(TokenType::RightBrace),
      b';' => self.make_token(TokenType::Semicolon),
      b'-' => self.make_token(TokenType::Minus),
      b'+' => self.make_token(TokenType::Plus),
      b'/' => self.make_token(TokenType::Slash),
      b'*' => self.make_token(TokenType::Star),
      // possible two-character tokens
      b'!' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::BangEqual)
        } else {
          self.make_token(TokenType::Bang)
        }
      }
      b'=' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::EqualEqual)
        } else {
          self.make_token(TokenType::Equal)
        }
      }
      b'<' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::LessEqual)
        } else {
          self.make_token(TokenType::Less)
        }
      }
      b'>' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::GreaterEqual)
        } else {
          self.make_token(TokenType::Greater)
        }
      }
      // string
      b'"' => self.string(),
      _ => self.error_token("Unexpected character."),
    }
  }
}

impl<'a> Scanner<'a> {
  /// Check if the scanner is at the end of the source code.
  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  /// Get current char, then advance the scanner (one step).
  fn advance(&mut self) -> u8 {
    self.current += 1;
    self.source.as_bytes()[self.current - 1]
  }

  /// Check if the next char matches the expected char.
  ///
  /// If it matches, advance the scanner (one step) immediately.
  fn match_next(&mut self, expected: u8) -> bool {
    if self.is_at_end() {
      return false;
    }
    if self.source.as_bytes()[self.current] != expected {
      return false;
    }
    self.current += 1;
    true
  }

  /// Get current char, without advancing the scanner.
  fn peek(&self) -> u8 {
    if self.is_at_end() {
      return b'\0';
    }
    self.source.as_bytes()[self.current]
  }

  /// Get the next char, without advancing the scanner.
  fn peek_next(&self) -> u8 {
    if self.current + 1 >= self.source.len() {
      return b'\0';
    }
    self.source.as_bytes()[self.current + 1]
  }

  fn skip_white_space(&mut self) {
    loop {
      let c = self.peek();
      match c {
        b' ' | b'\r' | b'\t' => {
          self.advance();
        }
        b'\n' => {
          self.line += 1;
          self.advance();
        }
        b'/' => {
          if self.peek_next() == b'/' {
            while self.peek() != b'\n' && !self.is_at_end() {
              self.advance();
            }
          } else {
            return;
          }
        }
        _ => return,
      }
    }
  }
}

impl<'a> Scanner<'a> {
  /// Bind a new scanner to the source code.
  #[inline]
  pub fn init(src: &'a str) -> Self {
    Self {
      source: src,
      start: 0,
      current: 0,
      line: 1,
    }
  }

  /// Bind a new scanner to the source code.
  #[inline]
  pub fn bind(src: &'a str) -> Self {
    Scanner::init(src)
  }
}

fn is_id_start(c: u8) -> bool {
  c.is_ascii_alphabetic() || c == b'_'
}

fn is_id_continue(c: u8) -> bool {
  c.is_ascii_alphanumeric() || c == b'_'
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scan_all(src: &str) -> Vec<TokenType> {
    let mut scanner = Scanner::init(src);
    let mut out = Vec::new();
    loop {
      let token = scanner.scan_token();
      let done = token.token_type == TokenType::Eof;
      out.push(token.token_type);
      if done {
        break;
      }
    }
    out
  }

  #[test]
  fn scans_every_keyword() {
    let src = "and class else false for fn if null or print return true var while";
    let expected = [
      TokenType::And,
      TokenType::Class,
      TokenType::Else,
      TokenType::False,
      TokenType::For,
      TokenType::Fn,
      TokenType::If,
      TokenType::Null,
      TokenType::Or,
      TokenType::Print,
      TokenType::Return,
      TokenType::True,
      TokenType::Var,
      TokenType::While,
      TokenType::Eof,
    ];
    assert_eq!(scan_all(src), expected);
  }

  #[test]
  fn keyword_prefix_is_an_identifier() {
    let mut scanner = Scanner::init("forest");
    let token = scanner.scan_token();
    assert_eq!(token.token_type, TokenType::Identifier);
    assert_eq!(token.lexeme, "forest");
  }

  #[test]
  fn scans_number_with_fraction() {
    let mut scanner = Scanner::init("12.34");
    let token = scanner.scan_token();
    assert_eq!(token.token_type, TokenType::Number);
    assert_eq!(token.lexeme, "12.34");
  }

  #[test]
  fn reports_unterminated_string() {
    let mut scanner = Scanner::init("\"abc");
    let token = scanner.scan_token();
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.lexeme, "Unterminated string.");
  }

  #[test]
  fn tracks_line_numbers_across_newlines() {
    let mut scanner = Scanner::init("var\nx\n=\n1;");
    let tokens: Vec<_> = std::iter::from_fn(|| {
      let t = scanner.scan_token();
      (t.token_type != TokenType::Eof).then_some(t)
    })
    .collect();
    let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 4]);
  }
}
