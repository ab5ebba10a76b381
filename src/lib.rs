//! A single-pass bytecode compiler and stack-machine interpreter for a small
//! Lox-family scripting language.

pub mod chunk;
pub mod compiler;
pub mod debug;
pub mod error;
pub mod object;
pub mod scanner;
pub mod table;
pub mod utils;
pub mod value;
pub mod vm;

pub mod prelude {
  pub use crate::chunk::{Chunk, OpCode};
  pub use crate::error::InterpretError;
  pub use crate::object::Heap;
  pub use crate::value::Value;
  pub use crate::vm::VM;
}
