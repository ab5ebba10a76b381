use loxbc::chunk::{Chunk, OpCode};
use loxbc::debug::Debug;
use loxbc::utils::Init;
use loxbc::value::Value;
use loxbc::vm::VM;

#[test]
fn hand_assembled_arithmetic() {
  let mut vm = VM::new();
  let mut chunk = Chunk::init();

  let constant = chunk.add_constant(Value::number_val(1.2));
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);

  let constant = chunk.add_constant(Value::number_val(2.3));
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);

  chunk.write(OpCode::Add as u8, 123);

  let constant = chunk.add_constant(Value::number_val(5.6));
  chunk.write(OpCode::Constant as u8, 123);
  chunk.write(constant as u8, 123);

  chunk.write(OpCode::Divide as u8, 123);
  chunk.write(OpCode::Negate as u8, 123);
  chunk.write(OpCode::Print as u8, 123);
  chunk.write(OpCode::Return as u8, 123);

  chunk.disassemble("hand_assembled_arithmetic");
  assert!(vm.interpret_chunk(chunk).is_ok());
}

#[test]
fn hand_assembled_jump_skips_then_branch() {
  let mut vm = VM::new();
  let mut chunk = Chunk::init();

  // false; if (false) print "unreachable" path, via JumpIfFalse over a Pop+Print.
  chunk.write(OpCode::False as u8, 1);
  let jump_offset_pos = chunk.code_len();
  chunk.write(OpCode::JumpIfFalse as u8, 1);
  chunk.write(0xff, 1);
  chunk.write(0xff, 1);
  chunk.write(OpCode::Pop as u8, 1);
  chunk.write(OpCode::Return as u8, 1); // would-be then-branch, skipped

  let after_then = chunk.code_len();
  chunk.patch_u16(jump_offset_pos + 1, (after_then - jump_offset_pos - 3) as u16);

  chunk.write(OpCode::Pop as u8, 1);
  chunk.write(OpCode::Return as u8, 1);

  assert!(vm.interpret_chunk(chunk).is_ok());
}
