use super::*;
use crate::chunk::OpCode;
use crate::compiler::{Local, LocalState, MAX_LOCALS};

impl<'a> Parser<'a> {
  /// Interns `name`'s lexeme as a string constant and returns its pool
  /// index, for use as a global variable's identifier.
  pub(crate) fn identifier_constant(&mut self, name: Token<'a>) -> u16 {
    let obj = self.heap.intern(name.lexeme);
    self.make_constant(crate::value::Value::obj_val(obj.cast()))
  }

  fn add_local(&mut self, name: Token<'a>) {
    if self.compiler.locals.len() >= MAX_LOCALS {
      self.error("Too many local variables in scope.");
      return;
    }
    self.compiler.locals.push(Local {
      name,
      state: LocalState::Declared,
    });
  }

  /// Looks up `name` among the current locals, innermost scope first.
  /// Reports "Can't read local variable in its own initializer." if the
  /// match is still `Declared` (its initializer is what's calling this).
  pub(crate) fn resolve_local(&mut self, name: Token<'a>) -> Option<usize> {
    for (index, local) in self.compiler.locals.iter().enumerate().rev() {
      if local.name.lexeme == name.lexeme {
        if local.state.depth().is_none() {
          self.error("Can't read local variable in its own initializer.");
        }
        return Some(index);
      }
    }
    None
  }

  /// Declares `previous` as a local in the current scope. A no-op at global
  /// scope, where variables are resolved dynamically by name instead.
  /// Reports "Already a variable with this name in this scope." on shadowing
  /// within the same block.
  fn declare_variable(&mut self) {
    if self.compiler.scope_depth == 0 {
      return;
    }
    let name = self.previous;

    for local in self.compiler.locals.iter().rev() {
      if let Some(depth) = local.state.depth() {
        if depth < self.compiler.scope_depth {
          break;
        }
      }
      if local.name.lexeme == name.lexeme {
        self.error("Already a variable with this name in this scope.");
      }
    }

    self.add_local(name);
  }

  /// Consumes the variable name and declares it. Returns the identifier's
  /// constant-pool index for globals; the return value is unused (and
  /// conventionally 0) for locals, which carry no runtime name.
  pub(crate) fn parse_variable(&mut self, error_message: &str) -> u16 {
    self.consume(TokenType::Identifier, error_message);

    self.declare_variable();
    if self.compiler.scope_depth > 0 {
      return 0;
    }
    self.identifier_constant(self.previous)
  }

  /// Marks the most recently declared local as initialized, making it
  /// visible to `resolve_local`. A no-op at global scope.
  pub(crate) fn mark_initialized(&mut self) {
    if self.compiler.scope_depth == 0 {
      return;
    }
    if let Some(local) = self.compiler.locals.last_mut() {
      local.state = LocalState::Initialized(self.compiler.scope_depth);
    }
  }

  /// Emits `DefineGlobal`/`DefineGlobal16` for a global, or simply marks a
  /// local initialized (its value is already sitting in the right stack
  /// slot, with nothing further to emit).
  pub(crate) fn define_variable(&mut self, global: u16) {
    if self.compiler.scope_depth > 0 {
      self.mark_initialized();
      return;
    }
    self.emit_variable_width(OpCode::DefineGlobal, OpCode::DefineGlobal16, global);
  }

  pub(crate) fn var_declaration(&mut self) {
    let global = self.parse_variable("Expect variable name.");

    if self.match_token(TokenType::Equal) {
      self.expression();
    } else {
      self.emit_byte(OpCode::Null as u8);
    }
    self.consume(
      TokenType::Semicolon,
      "Expect ';' after variable declaration.",
    );

    self.define_variable(global);
  }
}
