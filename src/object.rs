//! # Object
//!
//! This module mainly defines the `Object` type, which is the type of the
//! heap-allocated objects in the virtual machine, plus the [`Heap`] that
//! owns and interns them.

use crate::{
  error::InterpretError,
  value::{ValUnion, Value, ValueType},
};
use std::{
  collections::HashMap,
  fmt::{Debug, Display},
  ptr::NonNull,
};

/// ## Object Type
///
/// An enum which represents the type of the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjType {
  String,
}

/// ## Object
///
/// The meta type of all `objects` in the virtual machine.
#[derive(Debug, PartialEq, Eq)]
pub struct Obj {
  pub(crate) obj_type: ObjType,
}

impl Obj {
  pub fn new(obj_type: ObjType) -> Self {
    Self { obj_type }
  }
}

impl Value {
  pub(crate) fn format_object(&self) -> String {
    match self.obj_type().unwrap() {
      ObjType::String => self.as_rust_str().unwrap().to_owned(),
    }
  }
}

impl Value {
  pub fn obj_val(value: NonNull<Obj>) -> Self {
    Self {
      value_type: ValueType::Obj,
      val_union: ValUnion { obj: value },
    }
  }

  pub fn is_obj(&self) -> bool {
    self.value_type == ValueType::Obj
  }

  pub fn as_obj(&self) -> NonNull<Obj> {
    unsafe { self.val_union.obj }
  }
}

impl Value {
  pub fn obj_type(&self) -> Result<ObjType, InterpretError> {
    match self.value_type {
      ValueType::Obj => Ok(unsafe { self.val_union.obj.as_ref() }.obj_type),
      ValueType::Null => Err(InterpretError::RuntimeError("Value is `null`.".into())),
      _ => Err(InterpretError::RuntimeError(
        "Value is not an object.".into(),
      )),
    }
  }

  fn is_obj_type(&self, expect: ObjType) -> bool {
    self.is_obj() && self.obj_type().unwrap() == expect
  }
}

/// ## Object String
///
/// The type of the string object. Always allocated through [`Heap::intern`],
/// never constructed directly, so that equal content always shares one
/// allocation and string equality reduces to pointer equality.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub struct ObjString {
  pub(crate) obj: Obj,
  pub(crate) data: String,
}

impl std::hash::Hash for ObjString {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.data.hash(state);
  }
}

impl Display for ObjString {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.data)
  }
}

impl Value {
  pub fn is_string(&self) -> bool {
    self.is_obj_type(ObjType::String)
  }

  pub fn as_string(&self) -> Result<NonNull<ObjString>, InterpretError> {
    if self.is_string() {
      Ok(self.as_obj().cast())
    } else {
      Err(InterpretError::RuntimeError(
        "Value is not a string.".into(),
      ))
    }
  }

  pub fn as_rust_str(&self) -> Result<&str, InterpretError> {
    let ptr = self.as_string()?;
    Ok(unsafe { ptr.as_ref() }.data.as_str())
  }
}

/// ## Heap
///
/// Owns every string object the compiler and VM have interned, deduplicating
/// by content. A chunk's constant pool only ever holds pointers into a
/// [`Heap`]; callers must keep the heap alive for at least as long as any
/// chunk compiled against it.
#[derive(Debug, Default)]
pub struct Heap {
  strings: HashMap<String, NonNull<ObjString>>,
}

impl Heap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a pointer to the interned copy of `text`, allocating one if this
  /// is the first time this exact content has been seen.
  pub fn intern(&mut self, text: &str) -> NonNull<ObjString> {
    if let Some(existing) = self.strings.get(text) {
      return *existing;
    }
    let boxed = Box::new(ObjString {
      obj: Obj::new(ObjType::String),
      data: text.to_owned(),
    });
    let ptr = NonNull::new(Box::into_raw(boxed)).expect("Box::into_raw never returns null");
    self.strings.insert(text.to_owned(), ptr);
    ptr
  }
}

impl Drop for Heap {
  fn drop(&mut self) {
    for (_, ptr) in self.strings.drain() {
      unsafe {
        drop(Box::from_raw(ptr.as_ptr()));
      }
    }
  }
}
