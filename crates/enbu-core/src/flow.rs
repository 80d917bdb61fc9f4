//! The parsed flow document (§3): immutable after parse, consumed
//! (never mutated) by the executor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::command::Command;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,
    pub env: HashMap<String, String>,
    pub steps: Vec<Command>,
}

impl Flow {
    pub fn new(name: impl Into<String>, env: HashMap<String, String>, steps: Vec<Command>) -> Self {
        Self {
            name: name.into(),
            env,
            steps,
        }
    }
}
