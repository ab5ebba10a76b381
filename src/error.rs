//! Errors produced while compiling or running a chunk.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpretError {
  #[error("compile error")]
  CompileError,
  #[error("{0}")]
  RuntimeError(String),
}
