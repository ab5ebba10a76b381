use super::*;

impl<'a> Parser<'a> {
  /// Report a diagnostic at the current token.
  pub(crate) fn error_at_current(&mut self, message: &str) {
    self.error_at(true, message);
  }

  /// Report a diagnostic at the previous (just-consumed) token.
  pub(crate) fn error(&mut self, message: &str) {
    self.error_at(false, message);
  }

  /// Writes `[line N] Error at '<lexeme>': <message>` to stderr, where the
  /// lexeme is replaced by `end` for `EOF` tokens and omitted entirely for
  /// `error` tokens. `had_error` latches true on every call regardless of
  /// `panic_mode`; only the printing (and the suppression of cascading
  /// diagnostics) is gated by `panic_mode`.
  pub(crate) fn error_at(&mut self, if_current: bool, message: &str) {
    self.had_error = true;
    if self.panic_mode {
      return;
    }
    self.panic_mode = true;

    let token = if if_current {
      &self.current
    } else {
      &self.previous
    };

    eprint!("[line {}] Error", token.line);
    match token.token_type {
      TokenType::Eof => eprint!(" at end"),
      TokenType::Error => {}
      _ => eprint!(" at '{}'", token.lexeme),
    }
    eprintln!(": {message}");
  }
}
