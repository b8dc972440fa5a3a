//! Bit widths of the Megalo block.
//!
//! Alle Breiten an einer Stelle, damit Encoder und Decoder dieselbe Tabelle
//! sehen. [`MegaloLayout::default()`] ist das Standard-Layout.

use crate::variables::{VariableCategory, VariableScope};
use crate::{Error, Result};

fn check_width(field: &'static str, bits: u8, max: u8) -> Result<()> {
    if (1..=max).contains(&bits) {
        Ok(())
    } else {
        Err(Error::InvalidWidth { field: field.into(), bits })
    }
}

/// Widths of one string pool's header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLayout {
    pub offset_bits: u8,
    pub length_bits: u8,
    pub count_bits: u8,
}

impl PoolLayout {
    pub const fn new(offset_bits: u8, length_bits: u8, count_bits: u8) -> Self {
        Self { offset_bits, length_bits, count_bits }
    }

    /// The general script string pool.
    pub const STRINGS: Self = Self::new(16, 16, 8);
    pub const NAME: Self = Self::new(11, 11, 1);
    pub const DESCRIPTION: Self = Self::new(13, 13, 1);
    pub const INTRO_DESCRIPTION: Self = Self::new(13, 13, 1);
    pub const CATEGORY_NAME: Self = Self::new(10, 10, 1);

    /// Checks the header widths. A single-entry slot needs a 1-bit count.
    pub fn validate(&self, single_entry: bool) -> Result<()> {
        check_width("offset_bits", self.offset_bits, 64)?;
        check_width("length_bits", self.length_bits, 64)?;
        if single_entry {
            check_width("count_bits", self.count_bits, 1)
        } else {
            check_width("count_bits", self.count_bits, 64)
        }
    }
}

/// Widths of the five declaration counters of one variable scope.
///
/// A width of 0 means the scope has no such category; the counter then
/// occupies no bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeWidths {
    pub numbers: u8,
    pub timers: u8,
    pub teams: u8,
    pub players: u8,
    pub objects: u8,
}

impl ScopeWidths {
    pub const fn new(numbers: u8, timers: u8, teams: u8, players: u8, objects: u8) -> Self {
        Self { numbers, timers, teams, players, objects }
    }

    pub const GLOBAL: Self = Self::new(5, 4, 4, 4, 5);
    pub const PLAYER: Self = Self::new(4, 3, 3, 3, 3);
    pub const OBJECT: Self = Self::new(4, 3, 2, 3, 3);
    pub const TEAM: Self = Self::new(4, 3, 3, 3, 3);

    /// Standard widths of `scope`.
    pub const fn standard(scope: VariableScope) -> Self {
        match scope {
            VariableScope::Global => Self::GLOBAL,
            VariableScope::Player => Self::PLAYER,
            VariableScope::Object => Self::OBJECT,
            VariableScope::Team => Self::TEAM,
        }
    }

    /// Total bits of one table with these widths.
    pub const fn total_bits(&self) -> usize {
        self.numbers as usize
            + self.timers as usize
            + self.teams as usize
            + self.players as usize
            + self.objects as usize
    }

    /// Counters are 0..=8 bits; 0 drops the category.
    pub fn validate(&self) -> Result<()> {
        for category in VariableCategory::ALL {
            let bits = category.width(self);
            if bits > 8 {
                return Err(Error::InvalidWidth { field: category.name().into(), bits });
            }
        }
        Ok(())
    }
}

/// Every width the Megalo block uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MegaloLayout {
    pub trait_count_bits: u8,
    pub option_count_bits: u8,
    pub loadout_count_bits: u8,
    pub condition_count_bits: u8,
    pub action_count_bits: u8,
    pub trigger_count_bits: u8,
    pub statistic_count_bits: u8,
    pub icon_index_bits: u8,
    pub category_index_bits: u8,
    pub strings: PoolLayout,
    pub name: PoolLayout,
    pub description: PoolLayout,
    pub intro_description: PoolLayout,
    pub category_name: PoolLayout,
    pub global_variables: ScopeWidths,
    pub player_variables: ScopeWidths,
    pub object_variables: ScopeWidths,
    pub team_variables: ScopeWidths,
}

impl MegaloLayout {
    pub const STANDARD: Self = Self {
        trait_count_bits: 5,
        option_count_bits: 5,
        loadout_count_bits: crate::serialize::DEFAULT_COUNT_BITS,
        condition_count_bits: 10,
        action_count_bits: 11,
        trigger_count_bits: 8,
        statistic_count_bits: 3,
        icon_index_bits: 5,
        category_index_bits: 5,
        strings: PoolLayout::STRINGS,
        name: PoolLayout::NAME,
        description: PoolLayout::DESCRIPTION,
        intro_description: PoolLayout::INTRO_DESCRIPTION,
        category_name: PoolLayout::CATEGORY_NAME,
        global_variables: ScopeWidths::GLOBAL,
        player_variables: ScopeWidths::PLAYER,
        object_variables: ScopeWidths::OBJECT,
        team_variables: ScopeWidths::TEAM,
    };
}

impl MegaloLayout {
    /// Checks every width against what the stream primitives accept.
    ///
    /// Counts take 1..=64 bits, plus-one indices 1..=32.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("trait_count_bits", self.trait_count_bits),
            ("option_count_bits", self.option_count_bits),
            ("loadout_count_bits", self.loadout_count_bits),
            ("condition_count_bits", self.condition_count_bits),
            ("action_count_bits", self.action_count_bits),
            ("trigger_count_bits", self.trigger_count_bits),
            ("statistic_count_bits", self.statistic_count_bits),
        ];
        for (field, bits) in counts {
            check_width(field, bits, 64)?;
        }
        check_width("icon_index_bits", self.icon_index_bits, 32)?;
        check_width("category_index_bits", self.category_index_bits, 32)?;

        self.strings.validate(false).map_err(|e| e.in_field("strings"))?;
        let slots = [
            ("name", self.name),
            ("description", self.description),
            ("intro_description", self.intro_description),
            ("category_name", self.category_name),
        ];
        for (field, pool) in slots {
            pool.validate(true).map_err(|e| e.in_field(field))?;
        }

        let scopes = [
            ("global_variables", self.global_variables),
            ("player_variables", self.player_variables),
            ("object_variables", self.object_variables),
            ("team_variables", self.team_variables),
        ];
        for (field, widths) in scopes {
            widths.validate().map_err(|e| e.in_field(field))?;
        }
        Ok(())
    }
}

impl Default for MegaloLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}
