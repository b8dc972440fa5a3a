//! Scoped variable tables.
//!
//! Each scope (global, player, object, team) declares how many script
//! variables of each category it holds. The counters are streamed in the
//! fixed order numbers, timers, teams, players, objects, each in the width
//! the table was constructed with.

use crate::bitstream::BitStream;
use crate::layout::ScopeWidths;
use crate::serialize::{max_count, Serializable};
use crate::{Error, Result};

/// Owner of a variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableScope {
    Global,
    Player,
    Object,
    Team,
}

impl VariableScope {
    pub const ALL: [Self; 4] = [Self::Global, Self::Player, Self::Object, Self::Team];

    pub fn name(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Player => "player",
            Self::Object => "object",
            Self::Team => "team",
        }
    }
}

/// Declared-variable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableCategory {
    Number,
    Timer,
    Team,
    Player,
    Object,
}

impl VariableCategory {
    /// Wire order.
    pub const ALL: [Self; 5] = [Self::Number, Self::Timer, Self::Team, Self::Player, Self::Object];

    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "numbers",
            Self::Timer => "timers",
            Self::Team => "teams",
            Self::Player => "players",
            Self::Object => "objects",
        }
    }

    pub(crate) fn width(self, widths: &ScopeWidths) -> u8 {
        match self {
            Self::Number => widths.numbers,
            Self::Timer => widths.timers,
            Self::Team => widths.teams,
            Self::Player => widths.players,
            Self::Object => widths.objects,
        }
    }
}

/// Declaration counters of one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    scope: VariableScope,
    widths: ScopeWidths,
    counts: [u8; 5],
}

impl VariableTable {
    /// Empty table with the standard widths of `scope`.
    pub fn new(scope: VariableScope) -> Self {
        Self::with_widths(scope, ScopeWidths::standard(scope))
    }

    /// # Panics
    ///
    /// Panics if a width exceeds 8 bits.
    pub fn with_widths(scope: VariableScope, widths: ScopeWidths) -> Self {
        for category in VariableCategory::ALL {
            assert!(category.width(&widths) <= 8, "counter width above 8 bits");
        }
        Self { scope, widths, counts: [0; 5] }
    }

    pub fn scope(&self) -> VariableScope {
        self.scope
    }

    pub fn widths(&self) -> ScopeWidths {
        self.widths
    }

    pub fn count(&self, category: VariableCategory) -> u8 {
        self.counts[category as usize]
    }

    /// Sets a counter. Fails with [`Error::CapacityExceeded`] if `count`
    /// does not fit the category's width.
    pub fn set_count(&mut self, category: VariableCategory, count: u8) -> Result<()> {
        let bits = category.width(&self.widths);
        if u64::from(count) > max_count(bits) {
            return Err(Error::CapacityExceeded {
                field: category.name().into(),
                value: count.into(),
                bits,
            });
        }
        self.counts[category as usize] = count;
        Ok(())
    }

    /// Encoded size in bits.
    pub fn bit_length(&self) -> usize {
        self.widths.total_bits()
    }
}

impl Serializable for VariableTable {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        for category in VariableCategory::ALL {
            let bits = category.width(&self.widths);
            let slot = &mut self.counts[category as usize];
            if bits == 0 {
                // Kategorie existiert in diesem Scope nicht
                *slot = 0;
                continue;
            }
            s.stream(slot, bits).map_err(|e| e.in_field(category.name()))?;
        }
        Ok(())
    }
}
