//! Definition registry: opcode → expected parameter kinds.
//!
//! The registry is read-only while a pass runs and is only borrowed by the
//! codec, so one instance can back any number of independent passes.

use crate::parameter::ParameterKind;
use crate::{Error, FastHashMap, FastIndexMap, Result};

/// Expected shape of one condition or action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    opcode: u32,
    name: Option<String>,
    parameters: Vec<ParameterKind>,
}

impl Definition {
    pub fn new(opcode: u32, parameters: Vec<ParameterKind>) -> Self {
        Self { opcode, name: None, parameters }
    }

    /// Attaches a symbolic name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn opcode(&self) -> u32 {
        self.opcode
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parameters(&self) -> &[ParameterKind] {
        &self.parameters
    }

    /// Name if present, otherwise the opcode, for error messages.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.opcode.to_string(),
        }
    }
}

/// Definitions of one instruction family, keyed by opcode.
#[derive(Debug, Clone)]
pub struct DefinitionTable {
    family: &'static str,
    by_opcode: FastIndexMap<u32, Definition>,
    by_name: FastHashMap<String, u32>,
}

impl DefinitionTable {
    /// `family` names the table in errors ("condition", "action").
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            by_opcode: FastIndexMap::default(),
            by_name: FastHashMap::default(),
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Registers `definition`, returning the one it replaced.
    pub fn insert(&mut self, definition: Definition) -> Option<Definition> {
        let previous = self.by_opcode.insert(definition.opcode, definition.clone());
        if let Some(old_name) = previous.as_ref().and_then(|d| d.name.as_ref()) {
            self.by_name.remove(old_name);
        }
        if let Some(name) = definition.name {
            self.by_name.insert(name, definition.opcode);
        }
        previous
    }

    pub fn get(&self, opcode: u32) -> Option<&Definition> {
        self.by_opcode.get(&opcode)
    }

    pub fn by_name(&self, name: &str) -> Option<&Definition> {
        self.by_name.get(name).and_then(|opcode| self.by_opcode.get(opcode))
    }

    /// Like [`get`](Self::get), failing with [`Error::UnknownOpcode`].
    pub fn resolve(&self, opcode: u32) -> Result<&Definition> {
        self.get(opcode).ok_or(Error::UnknownOpcode {
            field: "".into(),
            table: self.family,
            opcode,
        })
    }

    pub fn len(&self) -> usize {
        self.by_opcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_opcode.is_empty()
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.by_opcode.values()
    }
}

impl FromIterator<Definition> for DefinitionTable {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        let mut table = Self::new("definition");
        for definition in iter {
            table.insert(definition);
        }
        table
    }
}

/// Condition and action definitions of one game.
#[derive(Debug, Clone)]
pub struct ScriptDatabase {
    pub conditions: DefinitionTable,
    pub actions: DefinitionTable,
}

impl ScriptDatabase {
    pub fn new() -> Self {
        Self {
            conditions: DefinitionTable::new("condition"),
            actions: DefinitionTable::new("action"),
        }
    }
}

impl Default for ScriptDatabase {
    fn default() -> Self {
        Self::new()
    }
}
