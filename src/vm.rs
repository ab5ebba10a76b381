//! # VM
//!
//! Stack-based bytecode interpreter. Owns the chunk currently executing,
//! the value stack, the global-variable table, and the string heap, so
//! that state (globals, interned strings) survives across successive
//! `interpret` calls in a REPL session.

#[cfg(feature = "debug_trace_execution")]
use crate::debug::Debug;
use crate::{
  chunk::{Chunk, OpCode},
  compiler::compile,
  error::InterpretError,
  object::Heap,
  table::Table,
  utils::Init,
  value::Value,
};

fn numeric_compare(l: Value, r: Value, cmp: impl Fn(f64, f64) -> bool) -> Result<Value, InterpretError> {
  if l.is_number() && r.is_number() {
    Ok(Value::bool_val(cmp(l.as_number(), r.as_number())))
  } else {
    Err(InterpretError::RuntimeError(
      "Operands must be numbers.".into(),
    ))
  }
}

#[derive(Debug, Default)]
pub struct VM {
  chunk: Chunk,
  ip: usize,
  stack: Vec<Value>,
  globals: Table,
  heap: Heap,
}

impl VM {
  pub fn new() -> Self {
    Self::default()
  }

  /// Compiles `source` into a fresh chunk (interning strings into the VM's
  /// long-lived heap) and runs it. Globals and the heap persist across
  /// calls; the chunk and stack do not.
  pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
    let mut chunk = Chunk::init();
    if !compile(source, &mut chunk, &mut self.heap) {
      return Err(InterpretError::CompileError);
    }

    #[cfg(feature = "debug_print_code")]
    chunk.disassemble("code");

    self.chunk = chunk;
    self.ip = 0;
    self.stack.clear();
    self.run()
  }

  /// Links an already-assembled chunk and runs it directly, bypassing the
  /// compiler. Exposed for hand-compiled bytecode tests.
  pub fn interpret_chunk(&mut self, chunk: Chunk) -> Result<(), InterpretError> {
    self.chunk = chunk;
    self.ip = 0;
    self.stack.clear();
    self.run()
  }

  /// Reads `path` and interprets its contents.
  pub fn interpret_file(&mut self, path: &str) -> Result<(), InterpretError> {
    let source = std::fs::read_to_string(path)
      .map_err(|e| InterpretError::RuntimeError(format!("Failed to read '{path}': {e}")))?;
    self.interpret(&source)
  }
}

impl VM {
  fn unary_op<F>(&mut self, op: F) -> Result<(), InterpretError>
  where
    F: Fn(Value) -> Result<Value, InterpretError>,
  {
    let value = self
      .stack
      .pop()
      .ok_or_else(|| InterpretError::RuntimeError("Operate on an empty stack.".into()))?;
    self.stack.push(op(value)?);
    Ok(())
  }

  fn binary_op<F>(&mut self, op: F) -> Result<(), InterpretError>
  where
    F: Fn(Value, Value) -> Result<Value, InterpretError>,
  {
    let b = self
      .stack
      .pop()
      .ok_or_else(|| InterpretError::RuntimeError("Operate on an empty stack.".into()))?;
    let a = self
      .stack
      .pop()
      .ok_or_else(|| InterpretError::RuntimeError("Operate on an empty stack.".into()))?;
    self.stack.push(op(a, b)?);
    Ok(())
  }
}

impl VM {
  fn read_byte(&mut self) -> u8 {
    let byte = self.chunk.code()[self.ip];
    self.ip += 1;
    byte
  }

  fn read_u16(&mut self) -> u16 {
    self.ip += 2;
    u16::from_be_bytes([self.chunk.code()[self.ip - 2], self.chunk.code()[self.ip - 1]])
  }

  fn read_constant(&mut self) -> Value {
    let index = self.read_byte() as usize;
    *self.chunk.constants().get(index).expect("valid constant index")
  }

  fn read_constant16(&mut self) -> Value {
    let index = self.read_u16() as usize;
    *self.chunk.constants().get(index).expect("valid constant index")
  }
}

#[cfg(feature = "debug_trace_stack")]
impl VM {
  fn trace_stack(&self) {
    print!("        | [");
    for (i, value) in self.stack.iter().enumerate() {
      if i > 0 {
        print!(", ");
      }
      print!("{value}");
    }
    println!("]");
  }
}

impl VM {
  fn run(&mut self) -> Result<(), InterpretError> {
    while self.ip < self.chunk.code().len() {
      #[cfg(feature = "debug_trace_stack")]
      self.trace_stack();
      #[cfg(feature = "debug_trace_execution")]
      self.chunk.disassemble_instruction(self.ip);

      if let Err(err) = self.run_one_step() {
        self.stack.clear();
        return Err(err);
      }
      if self.ip >= self.chunk.code().len() {
        break;
      }
    }
    Ok(())
  }

  #[inline]
  fn run_one_step(&mut self) -> Result<(), InterpretError> {
    let instruction = OpCode::from(self.read_byte());
    match instruction {
      OpCode::Constant => {
        let constant = self.read_constant();
        self.stack.push(constant);
        Ok(())
      }
      OpCode::Constant16 => {
        let constant = self.read_constant16();
        self.stack.push(constant);
        Ok(())
      }
      OpCode::Null => {
        self.stack.push(Value::null_val());
        Ok(())
      }
      OpCode::True => {
        self.stack.push(Value::bool_val(true));
        Ok(())
      }
      OpCode::False => {
        self.stack.push(Value::bool_val(false));
        Ok(())
      }
      OpCode::Equal => self.binary_op(|l, r| Ok(Value::bool_val(l == r))),
      OpCode::Greater => self.binary_op(|l, r| numeric_compare(l, r, |l, r| l > r)),
      OpCode::Less => self.binary_op(|l, r| numeric_compare(l, r, |l, r| l < r)),
      OpCode::Add => self.binary_op(|l, r| l + r),
      OpCode::Subtract => self.binary_op(|l, r| l - r),
      OpCode::Multiply => self.binary_op(|l, r| l * r),
      OpCode::Divide => self.binary_op(|l, r| l / r),
      OpCode::Not => self.unary_op(|v| !v),
      OpCode::Negate => self.unary_op(|v| -v),
      OpCode::Print => {
        let value = self
          .stack
          .pop()
          .ok_or_else(|| InterpretError::RuntimeError("Expect a value before 'print'.".into()))?;
        println!("{value}");
        Ok(())
      }
      OpCode::Pop => {
        self.stack.pop();
        Ok(())
      }
      OpCode::Jump => {
        let offset = self.read_u16();
        self.ip += offset as usize;
        Ok(())
      }
      OpCode::JumpIfFalse => {
        let offset = self.read_u16();
        let falsey = self
          .stack
          .last()
          .ok_or_else(|| InterpretError::RuntimeError("Operate on an empty stack.".into()))?
          .is_falsey();
        if falsey {
          self.ip += offset as usize;
        }
        Ok(())
      }
      OpCode::Loop => {
        let offset = self.read_u16();
        self.ip -= offset as usize;
        Ok(())
      }
      OpCode::GetLocal => {
        let slot = self.read_byte() as usize;
        self.stack.push(self.stack[slot]);
        Ok(())
      }
      OpCode::GetLocal16 => {
        let slot = self.read_u16() as usize;
        self.stack.push(self.stack[slot]);
        Ok(())
      }
      OpCode::SetLocal => {
        let slot = self.read_byte() as usize;
        self.stack[slot] = *self.stack.last().expect("assignment leaves a value on the stack");
        Ok(())
      }
      OpCode::SetLocal16 => {
        let slot = self.read_u16() as usize;
        self.stack[slot] = *self.stack.last().expect("assignment leaves a value on the stack");
        Ok(())
      }
      OpCode::GetGlobal => {
        let name = self.read_constant();
        self.get_global(name)
      }
      OpCode::GetGlobal16 => {
        let name = self.read_constant16();
        self.get_global(name)
      }
      OpCode::DefineGlobal => {
        let name = self.read_constant();
        self.define_global(name)
      }
      OpCode::DefineGlobal16 => {
        let name = self.read_constant16();
        self.define_global(name)
      }
      OpCode::SetGlobal => {
        let name = self.read_constant();
        self.set_global(name)
      }
      OpCode::SetGlobal16 => {
        let name = self.read_constant16();
        self.set_global(name)
      }
      OpCode::Call | OpCode::Closure => unreachable!(
        "reserved opcode never emitted by the compiler; functions/closures are out of scope"
      ),
      OpCode::Return => Ok(()),
    }
    .map_err(|err| self.runtime_error(err))
  }

  fn define_global(&mut self, name: Value) -> Result<(), InterpretError> {
    let name = name.as_rust_str()?;
    let value = self
      .stack
      .pop()
      .ok_or_else(|| InterpretError::RuntimeError("Operate on an empty stack.".into()))?;
    self.globals.set(name, value);
    Ok(())
  }

  fn get_global(&mut self, name: Value) -> Result<(), InterpretError> {
    let name = name.as_rust_str()?;
    match self.globals.get(name) {
      Some(&value) => {
        self.stack.push(value);
        Ok(())
      }
      None => Err(InterpretError::RuntimeError(format!(
        "Undefined variable '{name}'."
      ))),
    }
  }

  fn set_global(&mut self, name: Value) -> Result<(), InterpretError> {
    let name = name.as_rust_str()?;
    let value = *self
      .stack
      .last()
      .ok_or_else(|| InterpretError::RuntimeError("Operate on an empty stack.".into()))?;
    if self.globals.set(name, value).is_none() {
      self.globals.remove(name);
      return Err(InterpretError::RuntimeError(format!(
        "Undefined variable '{name}'."
      )));
    }
    Ok(())
  }
}

impl VM {
  /// Prefixes `err` with the source line of the instruction that raised it
  /// (`ip` has already advanced past the instruction, hence `- 1`).
  fn runtime_error(&self, err: InterpretError) -> InterpretError {
    match err {
      InterpretError::RuntimeError(message) => {
        let line = self.chunk.line_at(self.ip - 1);
        InterpretError::RuntimeError(format!("[line {line}] in script: {message}"))
      }
      other => other,
    }
  }
}
