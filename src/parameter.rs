//! Instruction parameters and the definition-driven dispatcher.
//!
//! Parameters carry no type tags on the wire. The shape of each positional
//! slot comes from the instruction's [`Definition`]; the dispatcher checks the
//! runtime values against it on encode and constructs empty values from it on
//! decode.

use core::fmt;

use crate::bitstream::BitStream;
use crate::definition::Definition;
use crate::serialize::Serializable;
use crate::{Error, Result};

/// Kind of a positional parameter slot.
///
/// `None`, `Integer` and `Float` have factories. The remaining kinds appear
/// in definitions but have no payload layout yet and fail to decode with
/// [`Error::UnknownParameterKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Slot without payload.
    None = 0,
    Integer = 1,
    Float = 2,
    Boolean = 3,
    Player = 4,
    Object = 5,
    Team = 6,
    Timer = 7,
}

impl ParameterKind {
    /// Validated conversion from a definition-file code.
    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::None,
            1 => Self::Integer,
            2 => Self::Float,
            3 => Self::Boolean,
            4 => Self::Player,
            5 => Self::Object,
            6 => Self::Team,
            7 => Self::Timer,
            _ => return Err(Error::invalid_enum(code.into()).in_field("parameter_kind")),
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Player => "Player",
            Self::Object => "Object",
            Self::Team => "Team",
            Self::Timer => "Timer",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    /// 16-bit two's complement.
    Integer(i16),
    /// 32-bit IEEE-754.
    Float(f32),
}

impl Parameter {
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Integer(_) => ParameterKind::Integer,
            Self::Float(_) => ParameterKind::Float,
        }
    }
}

impl Serializable for Parameter {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        match self {
            Self::Integer(v) => s.stream_full(v),
            Self::Float(v) => s.stream_f32(v),
        }
    }
}

/// Empty value for `kind`.
///
/// `Ok(None)` for a slot without payload, `Err(kind)` when no factory is
/// registered for `kind`.
pub fn factory(kind: ParameterKind) -> core::result::Result<Option<Parameter>, ParameterKind> {
    match kind {
        ParameterKind::None => Ok(None),
        ParameterKind::Integer => Ok(Some(Parameter::Integer(0))),
        ParameterKind::Float => Ok(Some(Parameter::Float(0.0))),
        other => Err(other),
    }
}

/// Serializes the parameter list of one instruction against `definition`.
///
/// Encode: the list must hold one value per payload-carrying slot of the
/// definition (`None` slots have no value) with matching kinds, in order.
/// Decode: `params` is cleared and refilled from the definition.
pub fn serialize_parameters(
    s: &mut BitStream<'_>,
    params: &mut Vec<Parameter>,
    definition: &Definition,
) -> Result<()> {
    if s.is_decoding() {
        params.clear();
        for (index, &kind) in definition.parameters().iter().enumerate() {
            let mut param = match factory(kind) {
                Ok(Some(param)) => param,
                Ok(None) => continue,
                Err(kind) => {
                    return Err(Error::UnknownParameterKind {
                        field: "".into(),
                        definition: definition.label(),
                        index,
                        kind,
                    });
                }
            };
            param.serialize(s)?;
            params.push(param);
        }
        return Ok(());
    }

    let slots: Vec<(usize, ParameterKind)> = definition
        .parameters()
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, kind)| kind != ParameterKind::None)
        .collect();

    if slots.len() != params.len() {
        return Err(Error::ParameterCountMismatch {
            field: "".into(),
            definition: definition.label(),
            expected: slots.len(),
            actual: params.len(),
        });
    }

    for (param, &(index, expected)) in params.iter_mut().zip(&slots) {
        if param.kind() != expected {
            return Err(Error::ParameterKindMismatch {
                field: "".into(),
                definition: definition.label(),
                index,
                expected,
                found: param.kind(),
            });
        }
        param.serialize(s)?;
    }
    Ok(())
}
