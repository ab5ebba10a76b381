//! # Table
//!
//! A module which wraps [`std::collections::HashMap`].
//!
//! Used by the VM to hold global variable bindings, keyed by name.

use std::collections::HashMap;

use crate::{utils::Init, value::Value};

#[derive(Debug, Clone, Default)]
pub struct Table(HashMap<String, Value>);

impl Table {
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
    self.0.insert(key.into(), value)
  }

  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.0.remove(key)
  }
}

impl Init for Table {}
