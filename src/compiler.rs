//! # Compiler
//!
//! The compiler is responsible for compiling source code into bytecode: a
//! single-pass Pratt parser and code generator. Submodules under
//! `compiler/` hold the bulk of the logic; this module ties together the
//! pieces the spec calls out as top-level data model (`Precedence`,
//! `Local`, `Compiler`) and the driver entry point.

mod parser;

use crate::chunk::Chunk;
use crate::object::Heap;
use crate::scanner::{Scanner, Token};
pub(crate) use parser::Parser;

/// Precedence ordering (low → high): none, assignment, or, and, equality,
/// comparison, term, factor, unary, call, primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
  None,
  Assignment,
  Or,
  And,
  Equality,
  Comparison,
  Term,
  Factor,
  Unary,
  Call,
  Primary,
}

impl Precedence {
  /// The next tighter-binding precedence, used by `binary` to parse its
  /// right operand left-associatively (`rule.precedence + 1`).
  pub(crate) fn next(self) -> Self {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call => Precedence::Primary,
      Precedence::Primary => Precedence::Primary,
    }
  }
}

/// Two-phase local declaration, replacing the classic `-1` sentinel: a
/// local starts `Declared` (visible for shadowing checks, but reading it
/// is an error) and becomes `Initialized(depth)` once its initializer has
/// finished compiling.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LocalState {
  Declared,
  Initialized(usize),
}

impl LocalState {
  fn depth(&self) -> Option<usize> {
    match self {
      LocalState::Declared => None,
      LocalState::Initialized(d) => Some(*d),
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Local<'a> {
  pub(crate) name: Token<'a>,
  pub(crate) state: LocalState,
}

/// Logical cap on local variables per the spec's resolved open question:
/// the Local table is conceptually larger, but `add_local` refuses past
/// this point, which is also why the 16-bit local opcodes are unreachable
/// through any path the compiler itself takes.
pub(crate) const MAX_LOCALS: usize = u8::MAX as usize + 1;

#[derive(Debug, Default)]
pub(crate) struct Compiler<'a> {
  pub(crate) locals: Vec<Local<'a>>,
  pub(crate) scope_depth: usize,
}

/// `compile(source, chunk) -> bool`, per §4.1: primes the scanner, drives
/// `declaration` until `EOF`, emits the terminating `Return`, and reports
/// whether any diagnostic was recorded.
pub fn compile(source: &str, chunk: &mut Chunk, heap: &mut Heap) -> bool {
  let scanner = Scanner::init(source);
  let mut parser = Parser::new(scanner, chunk, heap);

  parser.advance();
  while !parser.check(crate::scanner::TokenType::Eof) {
    parser.declaration();
  }
  parser.end_compiler();

  !parser.had_error
}
