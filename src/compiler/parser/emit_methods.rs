use super::*;
use crate::chunk::OpCode;
use crate::value::Value;

impl<'a> Parser<'a> {
  /// Appending a single byte to the chunk, tagged with `previous.line`.
  pub(crate) fn emit_byte(&mut self, byte: u8) {
    self.chunk.write(byte, self.previous.line);
  }

  /// Appending two bytes in order.
  pub(crate) fn emit_bytes(&mut self, a: u8, b: u8) {
    self.emit_byte(a);
    self.emit_byte(b);
  }

  fn emit_u16_operand(&mut self, value: u16) {
    let bytes = value.to_be_bytes();
    self.emit_byte(bytes[0]);
    self.emit_byte(bytes[1]);
  }

  /// The shared dual-width helper the design notes call for: chooses the
  /// narrow (1-byte operand) or wide (2-byte big-endian operand) form of
  /// an opcode pair based on whether `operand` fits in a `u8`. Used for
  /// every `Constant`/`GetLocal`/`SetLocal`/`GetGlobal`/`SetGlobal`/
  /// `DefineGlobal` emission.
  pub(crate) fn emit_variable_width(&mut self, narrow: OpCode, wide: OpCode, operand: u16) {
    if operand <= u8::MAX as u16 {
      self.emit_byte(narrow as u8);
      self.emit_byte(operand as u8);
    } else {
      self.emit_byte(wide as u8);
      self.emit_u16_operand(operand);
    }
  }

  /// Appends `Return`.
  pub(crate) fn emit_return(&mut self) {
    self.emit_byte(OpCode::Return as u8);
  }

  /// Interns `value` via `make_constant`, then emits `Constant`/`Constant16`
  /// depending on the resulting index's width.
  pub(crate) fn emit_constant(&mut self, value: Value) {
    let index = self.make_constant(value);
    self.emit_variable_width(OpCode::Constant, OpCode::Constant16, index);
  }

  /// Appends `value` to the constant pool and returns its index. Reports
  /// "Too many constants in one chunk." and yields 0 if the pool would
  /// need more than a `u16` can index.
  pub(crate) fn make_constant(&mut self, value: Value) -> u16 {
    let index = self.chunk.add_constant(value);
    if index > u16::MAX as usize {
      self.error("Too many constants in one chunk.");
      0
    } else {
      index as u16
    }
  }

  /// Emits `instruction` followed by a two-byte `0xff 0xff` placeholder,
  /// returning the offset of the first placeholder byte for a later
  /// `patch_jump` call.
  pub(crate) fn emit_jump(&mut self, instruction: OpCode) -> usize {
    self.emit_byte(instruction as u8);
    self.emit_byte(0xff);
    self.emit_byte(0xff);
    self.chunk.code_len() - 2
  }

  /// Back-patches the placeholder written by `emit_jump` at `offset` with
  /// the distance from just past the placeholder to the current end of
  /// the chunk. Reports "Too much code to jump over." (and leaves the
  /// placeholder bytes untouched) if that distance would overflow `u16`.
  pub(crate) fn patch_jump(&mut self, offset: usize) {
    let jump = self.chunk.code_len() - offset - 2;
    if jump > u16::MAX as usize {
      self.error("Too much code to jump over.");
      return;
    }
    self.chunk.patch_u16(offset, jump as u16);
  }

  /// Emits a backward `Loop` jump to `loop_start`. Unlike `emit_jump`, the
  /// offset is known immediately, so there's no separate patch step.
  /// Reports "Loop body too large." (emitting no operand bytes at all) if
  /// the offset would overflow `u16`.
  pub(crate) fn emit_loop(&mut self, loop_start: usize) {
    self.emit_byte(OpCode::Loop as u8);
    let offset = self.chunk.code_len() - loop_start + 2;
    if offset > u16::MAX as usize {
      self.error("Loop body too large.");
      return;
    }
    self.emit_u16_operand(offset as u16);
  }

  /// Operations after the end of compilation.
  pub(crate) fn end_compiler(&mut self) {
    self.emit_return();
  }
}
