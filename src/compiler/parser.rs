//! # Parser
//!
//! Submodule of `compiler`, which is used to parse the source code into
//! bytecode.
//!
//! Grammar methods here (and in the sibling submodules) are plain
//! functions, not `Result`-returning ones: per the spec's error
//! propagation policy, a diagnostic is recorded (`had_error`/`panic_mode`)
//! and parsing continues, rather than unwinding the whole compile on the
//! first mistake.

use crate::{
  chunk::Chunk,
  compiler::{Compiler, Precedence},
  object::Heap,
  scanner::{Scanner, Token, TokenType},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod compile_time_error_handlers;
pub mod emit_methods;
pub mod ops_after_get_parse_rule;
pub mod statement_methods;
pub mod variable_methods;

type ParseFn = for<'a> fn(&mut Parser<'a>, bool);

/// ## ParseRule
///
/// A struct which represents the parse rule, with:
///
/// - prefix: the prefix parse function
/// - infix: the infix parse function
/// - precedence: the precedence of the operator
#[derive(Clone, Copy)]
pub struct ParseRule {
  pub prefix: Option<ParseFn>,
  pub infix: Option<ParseFn>,
  pub precedence: Precedence,
}

impl ParseRule {
  pub fn new(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> Self {
    Self {
      prefix,
      infix,
      precedence,
    }
  }
}

/// ## RULES_VEC
///
/// A vec which contains the rules for the different tokens.
static RULES_VEC: Lazy<Vec<(TokenType, ParseRule)>> = Lazy::new(|| {
  use Precedence::*;
  vec![
    (
      TokenType::LeftParen,
      ParseRule::new(Some(Parser::grouping), None, None),
    ),
    (TokenType::RightParen, ParseRule::new(None, None, None)),
    (TokenType::LeftBrace, ParseRule::new(None, None, None)),
    (TokenType::RightBrace, ParseRule::new(None, None, None)),
    (
      TokenType::Minus,
      ParseRule::new(Some(Parser::unary), Some(Parser::binary), Term),
    ),
    (
      TokenType::Plus,
      ParseRule::new(None, Some(Parser::binary), Term),
    ),
    (TokenType::Semicolon, ParseRule::new(None, None, None)),
    (
      TokenType::Slash,
      ParseRule::new(None, Some(Parser::binary), Factor),
    ),
    (
      TokenType::Star,
      ParseRule::new(None, Some(Parser::binary), Factor),
    ),
    (
      TokenType::Bang,
      ParseRule::new(Some(Parser::unary), None, None),
    ),
    (
      TokenType::BangEqual,
      ParseRule::new(None, Some(Parser::binary), Equality),
    ),
    (TokenType::Equal, ParseRule::new(None, None, None)),
    (
      TokenType::EqualEqual,
      ParseRule::new(None, Some(Parser::binary), Equality),
    ),
    (
      TokenType::Greater,
      ParseRule::new(None, Some(Parser::binary), Comparison),
    ),
    (
      TokenType::GreaterEqual,
      ParseRule::new(None, Some(Parser::binary), Comparison),
    ),
    (
      TokenType::Less,
      ParseRule::new(None, Some(Parser::binary), Comparison),
    ),
    (
      TokenType::LessEqual,
      ParseRule::new(None, Some(Parser::binary), Comparison),
    ),
    (
      TokenType::Identifier,
      ParseRule::new(Some(Parser::variable), None, None),
    ),
    (
      TokenType::String,
      ParseRule::new(Some(Parser::string), None, None),
    ),
    (
      TokenType::Number,
      ParseRule::new(Some(Parser::number), None, None),
    ),
    (
      TokenType::And,
      ParseRule::new(None, Some(Parser::and_), And),
    ),
    (TokenType::Class, ParseRule::new(None, None, None)),
    (TokenType::Else, ParseRule::new(None, None, None)),
    (
      TokenType::False,
      ParseRule::new(Some(Parser::literal), None, None),
    ),
    (TokenType::For, ParseRule::new(None, None, None)),
    (TokenType::Fn, ParseRule::new(None, None, None)),
    (TokenType::If, ParseRule::new(None, None, None)),
    (
      TokenType::Null,
      ParseRule::new(Some(Parser::literal), None, None),
    ),
    (TokenType::Or, ParseRule::new(None, Some(Parser::or_), Or)),
    (TokenType::Print, ParseRule::new(None, None, None)),
    (TokenType::Return, ParseRule::new(None, None, None)),
    (
      TokenType::True,
      ParseRule::new(Some(Parser::literal), None, None),
    ),
    (TokenType::Var, ParseRule::new(None, None, None)),
    (TokenType::While, ParseRule::new(None, None, None)),
    (TokenType::Error, ParseRule::new(None, None, None)),
    (TokenType::Eof, ParseRule::new(None, None, None)),
  ]
});

/// ## RULES
///
/// HashMap form of `RULES_VEC`.
static RULES: Lazy<HashMap<TokenType, ParseRule>> = Lazy::new(|| {
  let mut map = HashMap::new();
  for (token_type, rule) in RULES_VEC.iter() {
    map.insert(*token_type, *rule);
  }
  map
});

pub struct Parser<'a> {
  /// Chunk being compiled into. Borrowed from the caller of `compile`.
  pub(crate) chunk: &'a mut Chunk,
  /// Interned-string allocator, also borrowed from the caller.
  pub(crate) heap: &'a mut Heap,
  /// Scanner in parser.
  pub(crate) scanner: Scanner<'a>,
  /// Current token.
  pub(crate) current: Token<'a>,
  /// Previous token.
  pub(crate) previous: Token<'a>,
  /// If had error.
  pub(crate) had_error: bool,
  /// If in panic mode.
  pub(crate) panic_mode: bool,
  /// Tracks locals and scope depth.
  pub(crate) compiler: Compiler<'a>,
}

impl<'a> Parser<'a> {
  pub(crate) fn new(scanner: Scanner<'a>, chunk: &'a mut Chunk, heap: &'a mut Heap) -> Self {
    Self {
      chunk,
      heap,
      scanner,
      current: Token::default(),
      previous: Token::default(),
      had_error: false,
      panic_mode: false,
      compiler: Compiler::default(),
    }
  }
}

impl<'a> Parser<'a> {
  /// This function starts at the current token, then parses any
  /// expression at the given precedence level or higher.
  fn parse_precedence(&mut self, precedence: Precedence) {
    let can_assign = precedence <= Precedence::Assignment;

    self.advance();
    let prefix_rule = self.get_rule(self.previous.token_type).prefix;
    let Some(prefix_rule) = prefix_rule else {
      self.error("Expect expression.");
      return;
    };
    prefix_rule(self, can_assign);

    while precedence <= self.get_rule(self.current.token_type).precedence {
      self.advance();
      let infix_rule = self.get_rule(self.previous.token_type).infix;
      match infix_rule {
        Some(infix_rule) => infix_rule(self, can_assign),
        None => break,
      }
    }

    // Deal with invalid assignment. (E.g. a + b = c * d;)
    if can_assign && self.match_token(TokenType::Equal) {
      self.error("Invalid assignment target.");
    }
  }

  fn get_rule(&self, token_type: TokenType) -> ParseRule {
    *RULES.get(&token_type).expect("every TokenType has a rule")
  }
}

impl<'a> Parser<'a> {
  /// Asks the scanner for the next token and stores it for later use.
  ///
  /// Before doing that, it takes the old current token and stashes it in
  /// the `previous` field. Error tokens are reported immediately and
  /// skipped, so `current` always ends up holding a non-error token.
  pub(crate) fn advance(&mut self) {
    self.previous = self.current;
    loop {
      self.current = self.scanner.scan_token();
      if self.current.token_type != TokenType::Error {
        break;
      }
      self.error_at_current(self.current.lexeme);
    }
  }

  /// Try consuming the current token; if it doesn't match, report `message`.
  pub(crate) fn consume(&mut self, token_type: TokenType, message: &str) {
    if self.current.token_type == token_type {
      self.advance();
    } else {
      self.error_at_current(message);
    }
  }

  /// Check if the current token has the expected type, without advancing.
  pub(crate) fn check(&self, expected_type: TokenType) -> bool {
    self.current.token_type == expected_type
  }

  /// If the current token matches, advance past it and return true.
  pub(crate) fn match_token(&mut self, expected_type: TokenType) -> bool {
    if !self.check(expected_type) {
      return false;
    }
    self.advance();
    true
  }

  pub(crate) fn expression(&mut self) {
    self.parse_precedence(Precedence::Assignment)
  }

  /// Step into a block.
  pub(crate) fn begin_scope(&mut self) {
    self.compiler.scope_depth += 1;
  }

  /// Step out of a block, popping every local that belonged to it.
  pub(crate) fn end_scope(&mut self) {
    self.compiler.scope_depth -= 1;
    while let Some(local) = self.compiler.locals.last() {
      let still_in_scope = match local.state {
        crate::compiler::LocalState::Initialized(depth) => depth > self.compiler.scope_depth,
        crate::compiler::LocalState::Declared => true,
      };
      if !still_in_scope {
        break;
      }
      self.emit_byte(crate::chunk::OpCode::Pop as u8);
      self.compiler.locals.pop();
    }
  }

  /// Parse declarations until `}` or `EOF`.
  pub(crate) fn block(&mut self) {
    while !self.check(TokenType::RightBrace) && !self.check(TokenType::Eof) {
      self.declaration();
    }
    self.consume(TokenType::RightBrace, "Expect '}' after block.");
  }

  /// Try matching the current token as a declaration.
  pub(crate) fn declaration(&mut self) {
    if self.match_token(TokenType::Var) {
      self.var_declaration();
    } else {
      self.statement();
    }
    if self.panic_mode {
      self.synchronize();
    }
  }

  /// Try matching the current token as a statement.
  pub(crate) fn statement(&mut self) {
    if self.match_token(TokenType::Print) {
      self.print_statement();
    } else if self.match_token(TokenType::If) {
      self.if_statement();
    } else if self.match_token(TokenType::While) {
      self.while_statement();
    } else if self.match_token(TokenType::For) {
      self.for_statement();
    } else if self.match_token(TokenType::LeftBrace) {
      self.begin_scope();
      self.block();
      self.end_scope();
    } else {
      self.expression_statement();
    }
  }
}
