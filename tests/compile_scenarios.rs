use loxbc::chunk::{Chunk, OpCode};
use loxbc::compiler::compile;
use loxbc::object::Heap;
use loxbc::utils::Init;

/// Walks `chunk`'s code, returning just the opcode sequence (operand bytes
/// skipped), using each opcode's known operand width.
fn opcodes(chunk: &Chunk) -> Vec<OpCode> {
  let code = chunk.code();
  let mut offset = 0;
  let mut out = Vec::new();
  while offset < code.len() {
    let op = OpCode::from(code[offset]);
    let width = match op {
      OpCode::Return
      | OpCode::Null
      | OpCode::True
      | OpCode::False
      | OpCode::Pop
      | OpCode::Equal
      | OpCode::Greater
      | OpCode::Less
      | OpCode::Add
      | OpCode::Subtract
      | OpCode::Multiply
      | OpCode::Divide
      | OpCode::Not
      | OpCode::Negate
      | OpCode::Print => 1,
      OpCode::Constant
      | OpCode::GetLocal
      | OpCode::SetLocal
      | OpCode::GetGlobal
      | OpCode::DefineGlobal
      | OpCode::SetGlobal => 2,
      OpCode::Constant16
      | OpCode::GetLocal16
      | OpCode::SetLocal16
      | OpCode::GetGlobal16
      | OpCode::DefineGlobal16
      | OpCode::SetGlobal16
      | OpCode::Jump
      | OpCode::JumpIfFalse
      | OpCode::Loop => 3,
      OpCode::Call | OpCode::Closure => 1,
    };
    out.push(op);
    offset += width;
  }
  out
}

fn compile_ok(source: &str) -> (Chunk, bool) {
  let mut chunk = Chunk::init();
  let mut heap = Heap::new();
  let ok = compile(source, &mut chunk, &mut heap);
  (chunk, ok)
}

#[test]
fn scenario_print_addition() {
  let (chunk, ok) = compile_ok("print 1 + 2;");
  assert!(ok);
  assert_eq!(
    opcodes(&chunk),
    vec![
      OpCode::Constant,
      OpCode::Constant,
      OpCode::Add,
      OpCode::Print,
      OpCode::Return,
    ]
  );
}

#[test]
fn scenario_global_roundtrip() {
  let (chunk, ok) = compile_ok("var x = 10; print x;");
  assert!(ok);
  assert_eq!(
    opcodes(&chunk),
    vec![
      OpCode::Constant,
      OpCode::DefineGlobal,
      OpCode::GetGlobal,
      OpCode::Print,
      OpCode::Return,
    ]
  );
}

#[test]
fn scenario_block_scoped_local() {
  let (chunk, ok) = compile_ok("{ var x = 1; print x; }");
  assert!(ok);
  assert_eq!(
    opcodes(&chunk),
    vec![
      OpCode::Constant,
      OpCode::GetLocal,
      OpCode::Print,
      OpCode::Pop,
      OpCode::Return,
    ]
  );
}

#[test]
fn scenario_if_else() {
  let (chunk, ok) = compile_ok("if (true) print 1; else print 2;");
  assert!(ok);
  assert_eq!(
    opcodes(&chunk),
    vec![
      OpCode::True,
      OpCode::JumpIfFalse,
      OpCode::Pop,
      OpCode::Constant,
      OpCode::Print,
      OpCode::Jump,
      OpCode::Pop,
      OpCode::Constant,
      OpCode::Print,
      OpCode::Return,
    ]
  );

  // No 0xffff placeholder should remain in either jump's operand bytes.
  let code = chunk.code();
  for (offset, &byte) in code.iter().enumerate() {
    if byte == OpCode::JumpIfFalse as u8 || byte == OpCode::Jump as u8 {
      assert_ne!((code[offset + 1], code[offset + 2]), (0xff, 0xff));
    }
  }
}

#[test]
fn scenario_self_referencing_local_is_an_error() {
  let (_, ok) = compile_ok("{ var x = x; }");
  assert!(!ok);
}

#[test]
fn scenario_invalid_assignment_target_is_an_error() {
  let (_, ok) = compile_ok("var a = 1; var b = 2; var c = 3; a + b = c;");
  assert!(!ok);
}

#[test]
fn code_and_lines_stay_in_lockstep() {
  let (chunk, ok) = compile_ok(
    "var total = 0;\nfor (var i = 0; i < 5; i = i + 1) {\n  total = total + i;\n}\nprint total;",
  );
  assert!(ok);
  assert_eq!(chunk.code().len(), chunk.lines().len());
}
