//! Script instructions: conditions, actions, triggers and custom statistics.
//!
//! Conditions and actions start with an opcode. Opcode 0 is the empty
//! instruction and ends the record; any other opcode is resolved in the
//! [`ScriptDatabase`] and its parameters follow without type tags.

use crate::bitstream::BitStream;
use crate::definition::{DefinitionTable, ScriptDatabase};
use crate::parameter::{serialize_parameters, Parameter};
use crate::serialize::Serializable;
use crate::{Error, Result};

pub const CONDITION_OPCODE_BITS: u8 = 5;
pub const ACTION_OPCODE_BITS: u8 = 8;

fn stream_instruction(
    s: &mut BitStream<'_>,
    table: &DefinitionTable,
    opcode: u32,
    parameters: &mut Vec<Parameter>,
) -> Result<()> {
    let definition = table.resolve(opcode)?;
    serialize_parameters(s, parameters, definition)
}

/// A condition evaluated before the actions of a trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub opcode: u8,
    pub negated: bool,
    /// Conditions sharing a group are OR-ed.
    pub union_group: u16,
    /// Index of the first action this condition guards.
    pub action_offset: u16,
    pub parameters: Vec<Parameter>,
}

impl Condition {
    pub fn new(opcode: u8, parameters: Vec<Parameter>) -> Self {
        Self { opcode, parameters, ..Self::default() }
    }

    pub fn serialize(&mut self, s: &mut BitStream<'_>, db: &ScriptDatabase) -> Result<()> {
        s.stream(&mut self.opcode, CONDITION_OPCODE_BITS)
            .map_err(|e| e.in_field("opcode"))?;
        if self.opcode == 0 {
            if s.is_decoding() {
                *self = Self::default();
            }
            return Ok(());
        }
        s.stream_bool(&mut self.negated)?;
        s.stream(&mut self.union_group, 9).map_err(|e| e.in_field("union_group"))?;
        s.stream(&mut self.action_offset, 10).map_err(|e| e.in_field("action_offset"))?;
        stream_instruction(s, &db.conditions, self.opcode.into(), &mut self.parameters)
            .map_err(|e| e.in_field("parameters"))
    }
}

/// An action executed by a trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub opcode: u8,
    pub parameters: Vec<Parameter>,
}

impl Action {
    pub fn new(opcode: u8, parameters: Vec<Parameter>) -> Self {
        Self { opcode, parameters }
    }

    pub fn serialize(&mut self, s: &mut BitStream<'_>, db: &ScriptDatabase) -> Result<()> {
        s.stream_full(&mut self.opcode)?;
        if self.opcode == 0 {
            if s.is_decoding() {
                self.parameters.clear();
            }
            return Ok(());
        }
        stream_instruction(s, &db.actions, self.opcode.into(), &mut self.parameters)
            .map_err(|e| e.in_field("parameters"))
    }
}

/// How often and over what a trigger runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Normal,
    ForEachPlayer,
    ForEachPlayerRandomly,
    ForEachTeam,
    ForEachObject,
    /// Objects matching a filter; `None` means no filter selected.
    ForEachObjectWithFilter { filter: Option<u8> },
    ForEachCandySpawner { game_object_type: bool, filter: Option<u8> },
}

impl Execution {
    fn code(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::ForEachPlayer => 1,
            Self::ForEachPlayerRandomly => 2,
            Self::ForEachTeam => 3,
            Self::ForEachObject => 4,
            Self::ForEachObjectWithFilter { .. } => 5,
            Self::ForEachCandySpawner { .. } => 6,
        }
    }

    fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Normal,
            1 => Self::ForEachPlayer,
            2 => Self::ForEachPlayerRandomly,
            3 => Self::ForEachTeam,
            4 => Self::ForEachObject,
            5 => Self::ForEachObjectWithFilter { filter: None },
            6 => Self::ForEachCandySpawner { game_object_type: false, filter: None },
            _ => return Err(Error::invalid_enum(code.into())),
        })
    }
}

/// Trigger type, 4 bits on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerKind {
    #[default]
    Normal = 0,
    Subroutine = 1,
    Initialization = 2,
    LocalInitialization = 3,
    HostMigration = 4,
    ObjectDeathEvent = 5,
    Local = 6,
    Pregame = 7,
    Incident = 8,
}

impl TriggerKind {
    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Normal,
            1 => Self::Subroutine,
            2 => Self::Initialization,
            3 => Self::LocalInitialization,
            4 => Self::HostMigration,
            5 => Self::ObjectDeathEvent,
            6 => Self::Local,
            7 => Self::Pregame,
            8 => Self::Incident,
            _ => return Err(Error::invalid_enum(code.into())),
        })
    }
}

/// An optional index streamed as a "null" flag followed by the index.
fn stream_optional_index(s: &mut BitStream<'_>, value: &mut Option<u8>, bits: u8) -> Result<()> {
    let mut is_null = value.is_none();
    s.stream_bool(&mut is_null)?;
    if is_null {
        *value = None;
    } else {
        let mut index = value.unwrap_or(0);
        s.stream(&mut index, bits)?;
        *value = Some(index);
    }
    Ok(())
}

/// A trigger: a slice of the condition and action tables plus scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trigger {
    pub execution: Execution,
    pub kind: TriggerKind,
    pub condition_index: u16,
    pub condition_count: u16,
    pub action_index: u16,
    pub action_count: u16,
    pub frame_update_frequency: u8,
    pub frame_update_offset: u8,
}

impl Serializable for Trigger {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        let mut code = self.execution.code();
        s.stream(&mut code, 3)?;
        if s.is_decoding() {
            self.execution = Execution::from_code(code).map_err(|e| e.in_field("execution"))?;
        }
        match &mut self.execution {
            Execution::ForEachObjectWithFilter { filter } => {
                stream_optional_index(s, filter, 4).map_err(|e| e.in_field("filter"))?;
            }
            Execution::ForEachCandySpawner { game_object_type, filter } => {
                s.stream_bool(game_object_type)?;
                stream_optional_index(s, filter, 2).map_err(|e| e.in_field("filter"))?;
            }
            _ => {}
        }

        let mut kind = self.kind as u8;
        s.stream(&mut kind, 4)?;
        self.kind = TriggerKind::from_code(kind).map_err(|e| e.in_field("kind"))?;

        s.stream(&mut self.condition_index, 10).map_err(|e| e.in_field("condition_index"))?;
        s.stream(&mut self.condition_count, 10).map_err(|e| e.in_field("condition_count"))?;
        s.stream(&mut self.action_index, 11).map_err(|e| e.in_field("action_index"))?;
        s.stream(&mut self.action_count, 11).map_err(|e| e.in_field("action_count"))?;
        s.stream_full(&mut self.frame_update_frequency)?;
        s.stream_full(&mut self.frame_update_offset)
    }
}

/// Display format of a custom statistic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatFormat {
    #[default]
    Number = 0,
    Percentage = 1,
    Time = 2,
}

/// Sort direction of a custom statistic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatSort {
    #[default]
    Descending = 0,
    Ascending = 1,
    Unsorted = 2,
}

/// A custom post-game statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistic {
    /// Index into the script string pool.
    pub name_index: u8,
    pub format: StatFormat,
    pub sort: StatSort,
    pub group_by_team: bool,
}

impl Serializable for Statistic {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_full(&mut self.name_index)?;

        let mut format = self.format as u8;
        s.stream(&mut format, 2)?;
        self.format = match format {
            0 => StatFormat::Number,
            1 => StatFormat::Percentage,
            2 => StatFormat::Time,
            other => return Err(Error::invalid_enum(other.into()).in_field("format")),
        };

        let mut sort = self.sort as u8;
        s.stream(&mut sort, 2)?;
        self.sort = match sort {
            0 => StatSort::Descending,
            1 => StatSort::Ascending,
            2 => StatSort::Unsorted,
            other => return Err(Error::invalid_enum(other.into()).in_field("sort")),
        };

        s.stream_bool(&mut self.group_by_team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Definition;
    use crate::parameter::ParameterKind;

    fn database() -> ScriptDatabase {
        let mut db = ScriptDatabase::new();
        db.conditions
            .insert(Definition::new(1, vec![ParameterKind::Integer, ParameterKind::Integer]).named("compare"));
        db.actions.insert(Definition::new(9, vec![ParameterKind::Float]).named("set_speed"));
        db.actions.insert(Definition::new(10, vec![ParameterKind::Object]).named("attach"));
        db
    }

    fn encode<T>(value: &T, f: impl Fn(&mut T, &mut BitStream<'_>) -> Result<()>) -> (Vec<u8>, usize)
    where
        T: Clone,
    {
        let mut copy = value.clone();
        let mut s = BitStream::encoder();
        f(&mut copy, &mut s).unwrap();
        let bits = s.bit_position();
        (s.into_bytes(), bits)
    }

    #[test]
    fn condition_round_trip() {
        let db = database();
        let condition = Condition {
            opcode: 1,
            negated: true,
            union_group: 300,
            action_offset: 5,
            parameters: vec![Parameter::Integer(2), Parameter::Integer(-1)],
        };
        let (data, bits) = encode(&condition, |c, s| c.serialize(s, &db));
        assert_eq!(bits, 5 + 1 + 9 + 10 + 32);

        let mut decoded = Condition::default();
        decoded.serialize(&mut BitStream::decoder(&data), &db).unwrap();
        assert_eq!(decoded, condition);
    }

    #[test]
    fn empty_condition_is_only_the_opcode() {
        let db = database();
        let (data, bits) = encode(&Condition::default(), |c, s| c.serialize(s, &db));
        assert_eq!(bits, 5);
        let mut decoded = Condition { negated: true, ..Condition::default() };
        decoded.serialize(&mut BitStream::decoder(&data), &db).unwrap();
        assert_eq!(decoded, Condition::default());
    }

    #[test]
    fn condition_opcode_out_of_range() {
        let db = database();
        let mut condition = Condition::new(32, Vec::new());
        let err = condition.serialize(&mut BitStream::encoder(), &db).unwrap_err();
        assert_eq!(err, Error::CapacityExceeded { field: "opcode".into(), value: 32, bits: 5 });
    }

    #[test]
    fn action_round_trip() {
        let db = database();
        let action = Action::new(9, vec![Parameter::Float(2.5)]);
        let (data, bits) = encode(&action, |a, s| a.serialize(s, &db));
        assert_eq!(bits, 8 + 32);
        let mut decoded = Action::default();
        decoded.serialize(&mut BitStream::decoder(&data), &db).unwrap();
        assert_eq!(decoded, action);
    }

    #[test]
    fn action_unknown_opcode() {
        let db = database();
        let mut action = Action::new(77, Vec::new());
        let err = action.serialize(&mut BitStream::encoder(), &db).unwrap_err();
        assert_eq!(err, Error::UnknownOpcode { field: "parameters".into(), table: "action", opcode: 77 });
    }

    #[test]
    fn action_pending_kind_fails_decode() {
        let db = database();
        let err = Action::default()
            .serialize(&mut BitStream::decoder(&[10, 0, 0]), &db)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownParameterKind { kind: ParameterKind::Object, .. }));
    }

    #[test]
    fn trigger_round_trip_all_executions() {
        let executions = [
            Execution::Normal,
            Execution::ForEachTeam,
            Execution::ForEachObjectWithFilter { filter: None },
            Execution::ForEachObjectWithFilter { filter: Some(15) },
            Execution::ForEachCandySpawner { game_object_type: true, filter: Some(3) },
            Execution::ForEachCandySpawner { game_object_type: false, filter: None },
        ];
        for execution in executions {
            let trigger = Trigger {
                execution,
                kind: TriggerKind::Subroutine,
                condition_index: 1023,
                condition_count: 2,
                action_index: 2047,
                action_count: 4,
                frame_update_frequency: 30,
                frame_update_offset: 1,
            };
            let (data, _) = encode(&trigger, |t, s| t.serialize(s));
            let mut decoded = Trigger::default();
            decoded.serialize(&mut BitStream::decoder(&data)).unwrap();
            assert_eq!(decoded, trigger);
        }
    }

    #[test]
    fn trigger_bit_length() {
        let (_, bits) = encode(&Trigger::default(), |t, s| t.serialize(s));
        assert_eq!(bits, 3 + 4 + 10 + 10 + 11 + 11 + 8 + 8);
        let filtered = Trigger {
            execution: Execution::ForEachObjectWithFilter { filter: Some(1) },
            ..Trigger::default()
        };
        let (_, bits) = encode(&filtered, |t, s| t.serialize(s));
        assert_eq!(bits, 65 + 1 + 4);
    }

    #[test]
    fn trigger_invalid_execution() {
        // 111 = 7
        let data = [0b1110_0000, 0, 0, 0, 0, 0, 0, 0, 0];
        let err = Trigger::default().serialize(&mut BitStream::decoder(&data)).unwrap_err();
        assert_eq!(err, Error::InvalidEnumValue { field: "execution".into(), value: 7 });
    }

    #[test]
    fn statistic_round_trip() {
        let stat = Statistic {
            name_index: 12,
            format: StatFormat::Time,
            sort: StatSort::Ascending,
            group_by_team: true,
        };
        let (data, bits) = encode(&stat, |v, s| v.serialize(s));
        assert_eq!(bits, 13);
        let mut decoded = Statistic::default();
        decoded.serialize(&mut BitStream::decoder(&data)).unwrap();
        assert_eq!(decoded, stat);
    }

    #[test]
    fn statistic_invalid_format() {
        // name 0, format 11
        let data = [0, 0b1100_0000];
        let err = Statistic::default().serialize(&mut BitStream::decoder(&data)).unwrap_err();
        assert_eq!(err, Error::InvalidEnumValue { field: "format".into(), value: 3 });
    }
}
