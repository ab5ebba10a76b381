use super::*;
use crate::chunk::OpCode;
use crate::value::Value;

impl<'a> Parser<'a> {
  pub(crate) fn number(&mut self, _can_assign: bool) {
    match self.previous.lexeme.parse::<f64>() {
      Ok(value) => self.emit_constant(Value::number_val(value)),
      Err(_) => self.error("Failed to parse number(value)."),
    }
  }

  /// Intern the lexeme with its surrounding quotes stripped.
  pub(crate) fn string(&mut self, _can_assign: bool) {
    let lexeme = self.previous.lexeme;
    let text = &lexeme[1..lexeme.len() - 1];
    let obj = self.heap.intern(text);
    self.emit_constant(Value::obj_val(obj.cast()));
  }

  pub(crate) fn named_variable(&mut self, name: Token<'a>, can_assign: bool) {
    let (arg, get_op, get_op_wide, set_op, set_op_wide) =
      if let Some(local_index) = self.resolve_local(name) {
        (
          local_index as u16,
          OpCode::GetLocal,
          OpCode::GetLocal16,
          OpCode::SetLocal,
          OpCode::SetLocal16,
        )
      } else {
        (
          self.identifier_constant(name),
          OpCode::GetGlobal,
          OpCode::GetGlobal16,
          OpCode::SetGlobal,
          OpCode::SetGlobal16,
        )
      };

    if can_assign && self.match_token(TokenType::Equal) {
      self.expression();
      self.emit_variable_width(set_op, set_op_wide, arg);
    } else {
      self.emit_variable_width(get_op, get_op_wide, arg);
    }
  }

  pub(crate) fn variable(&mut self, can_assign: bool) {
    let name = self.previous;
    self.named_variable(name, can_assign);
  }

  pub(crate) fn unary(&mut self, _can_assign: bool) {
    let operator_type = self.previous.token_type;

    self.parse_precedence(Precedence::Unary);

    match operator_type {
      TokenType::Bang => self.emit_byte(OpCode::Not as u8),
      TokenType::Minus => self.emit_byte(OpCode::Negate as u8),
      _ => unreachable!("unary rule only registered for `!` and `-`"),
    }
  }

  /// Left-associative binary operators. `!=`/`>=`/`<=` are emitted as a
  /// compound pair rather than as a dedicated opcode, per the precedence
  /// table in the spec.
  pub(crate) fn binary(&mut self, _can_assign: bool) {
    let operator_type = self.previous.token_type;
    let rule = self.get_rule(operator_type);
    self.parse_precedence(rule.precedence.next());

    match operator_type {
      TokenType::BangEqual => {
        self.emit_byte(OpCode::Equal as u8);
        self.emit_byte(OpCode::Not as u8);
      }
      TokenType::EqualEqual => self.emit_byte(OpCode::Equal as u8),
      TokenType::Greater => self.emit_byte(OpCode::Greater as u8),
      TokenType::GreaterEqual => {
        self.emit_byte(OpCode::Less as u8);
        self.emit_byte(OpCode::Not as u8);
      }
      TokenType::Less => self.emit_byte(OpCode::Less as u8),
      TokenType::LessEqual => {
        self.emit_byte(OpCode::Greater as u8);
        self.emit_byte(OpCode::Not as u8);
      }
      TokenType::Plus => self.emit_byte(OpCode::Add as u8),
      TokenType::Minus => self.emit_byte(OpCode::Subtract as u8),
      TokenType::Star => self.emit_byte(OpCode::Multiply as u8),
      TokenType::Slash => self.emit_byte(OpCode::Divide as u8),
      _ => unreachable!("binary rule only registered for the operators above"),
    }
  }

  pub(crate) fn literal(&mut self, _can_assign: bool) {
    match self.previous.token_type {
      TokenType::False => self.emit_byte(OpCode::False as u8),
      TokenType::Null => self.emit_byte(OpCode::Null as u8),
      TokenType::True => self.emit_byte(OpCode::True as u8),
      _ => unreachable!("literal rule only registered for false/null/true"),
    }
  }

  pub(crate) fn grouping(&mut self, _can_assign: bool) {
    self.expression();
    self.consume(TokenType::RightParen, "Expect ')' after expression.");
  }

  /// Short-circuiting `and`: if the left operand is falsy, skip the right
  /// operand entirely and leave the left value on the stack.
  pub(crate) fn and_(&mut self, _can_assign: bool) {
    let end_jump = self.emit_jump(OpCode::JumpIfFalse);
    self.emit_byte(OpCode::Pop as u8);
    self.parse_precedence(Precedence::And);
    self.patch_jump(end_jump);
  }

  /// Short-circuiting `or`: if the left operand is truthy, skip the right
  /// operand and leave the left value on the stack.
  pub(crate) fn or_(&mut self, _can_assign: bool) {
    let else_jump = self.emit_jump(OpCode::JumpIfFalse);
    let end_jump = self.emit_jump(OpCode::Jump);

    self.patch_jump(else_jump);
    self.emit_byte(OpCode::Pop as u8);

    self.parse_precedence(Precedence::Or);
    self.patch_jump(end_jump);
  }
}
