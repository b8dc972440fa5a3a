//! Fixed field records nested in the script data aggregate.
//!
//! These are plain field bags; each one streams its fields in declaration
//! order through the [`BitStream`] primitives.

use crate::bitstream::BitStream;
use crate::serialize::{serialize_sequence, Serializable};
use crate::{Error, Result};

/// Per-player modifiers applied by a trait set.
///
/// Values are indices into the game's modifier tables, not raw multipliers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerTraits {
    pub damage_resistance: u8,
    pub health_multiplier: u8,
    pub health_regen_rate: u8,
    pub shield_multiplier: u8,
    pub shield_regen_rate: u8,
    pub headshot_immunity: u8,
    pub shield_vampirism: u8,
    pub assassination_immunity: u8,
    pub deathless: u8,
    pub weapon_damage_multiplier: u8,
    /// -1 keeps the map default.
    pub primary_weapon: i8,
    pub secondary_weapon: i8,
    pub grenade_count: u8,
    pub movement_speed: u8,
    pub gravity: u8,
    pub waypoint: u8,
    pub active_camo: u8,
}

impl Serializable for PlayerTraits {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream(&mut self.damage_resistance, 4).map_err(|e| e.in_field("damage_resistance"))?;
        s.stream(&mut self.health_multiplier, 3).map_err(|e| e.in_field("health_multiplier"))?;
        s.stream(&mut self.health_regen_rate, 4).map_err(|e| e.in_field("health_regen_rate"))?;
        s.stream(&mut self.shield_multiplier, 3).map_err(|e| e.in_field("shield_multiplier"))?;
        s.stream(&mut self.shield_regen_rate, 4).map_err(|e| e.in_field("shield_regen_rate"))?;
        s.stream(&mut self.headshot_immunity, 2).map_err(|e| e.in_field("headshot_immunity"))?;
        s.stream(&mut self.shield_vampirism, 3).map_err(|e| e.in_field("shield_vampirism"))?;
        s.stream(&mut self.assassination_immunity, 2)
            .map_err(|e| e.in_field("assassination_immunity"))?;
        s.stream(&mut self.deathless, 2).map_err(|e| e.in_field("deathless"))?;
        s.stream(&mut self.weapon_damage_multiplier, 4)
            .map_err(|e| e.in_field("weapon_damage_multiplier"))?;
        s.stream_full(&mut self.primary_weapon)?;
        s.stream_full(&mut self.secondary_weapon)?;
        s.stream(&mut self.grenade_count, 4).map_err(|e| e.in_field("grenade_count"))?;
        s.stream(&mut self.movement_speed, 5).map_err(|e| e.in_field("movement_speed"))?;
        s.stream(&mut self.gravity, 4).map_err(|e| e.in_field("gravity"))?;
        s.stream(&mut self.waypoint, 2).map_err(|e| e.in_field("waypoint"))?;
        s.stream(&mut self.active_camo, 3).map_err(|e| e.in_field("active_camo"))
    }
}

/// A named trait set scripts can apply to players.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDefinedTraits {
    /// Index into the script string pool.
    pub name_index: u8,
    pub description_index: u8,
    pub traits: PlayerTraits,
}

impl Serializable for UserDefinedTraits {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream(&mut self.name_index, 7).map_err(|e| e.in_field("name_index"))?;
        s.stream(&mut self.description_index, 7)
            .map_err(|e| e.in_field("description_index"))?;
        self.traits.serialize(s).map_err(|e| e.in_field("traits"))
    }
}

/// One selectable value of an enumerated option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValue {
    /// 10-bit two's complement.
    pub value: i16,
    pub name_index: u8,
    pub description_index: u8,
}

impl Serializable for OptionValue {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream(&mut self.value, 10)?;
        s.stream(&mut self.name_index, 7).map_err(|e| e.in_field("name_index"))?;
        s.stream(&mut self.description_index, 7)
            .map_err(|e| e.in_field("description_index"))
    }
}

/// Value domain of a user-defined option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValues {
    /// Numeric range; all four values are 10-bit two's complement.
    Range { default: i16, min: i16, max: i16, current: i16 },
    /// Fixed list of up to 15 values, indices are 3 bits wide.
    Enumerated { default_index: u8, values: Vec<OptionValue>, current_index: u8 },
}

impl Default for OptionValues {
    fn default() -> Self {
        Self::Enumerated { default_index: 0, values: Vec::new(), current_index: 0 }
    }
}

/// A host-configurable option declared by the script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDefinedOption {
    pub name_index: u8,
    pub description_index: u8,
    pub values: OptionValues,
}

impl Serializable for UserDefinedOption {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream(&mut self.name_index, 7).map_err(|e| e.in_field("name_index"))?;
        s.stream(&mut self.description_index, 7)
            .map_err(|e| e.in_field("description_index"))?;

        let mut is_range = matches!(self.values, OptionValues::Range { .. });
        s.stream_bool(&mut is_range)?;
        if s.is_decoding() {
            self.values = if is_range {
                OptionValues::Range { default: 0, min: 0, max: 0, current: 0 }
            } else {
                OptionValues::default()
            };
        }

        match &mut self.values {
            OptionValues::Range { default, min, max, current } => {
                s.stream(default, 10)?;
                s.stream(min, 10)?;
                s.stream(max, 10)?;
                s.stream(current, 10)
            }
            OptionValues::Enumerated { default_index, values, current_index } => {
                s.stream(default_index, 3).map_err(|e| e.in_field("default_index"))?;
                serialize_sequence(s, values, 4).map_err(|e| e.in_field("values"))?;
                s.stream(current_index, 3).map_err(|e| e.in_field("current_index"))
            }
        }
    }
}

/// Number of map id slots in [`MapPermissions`].
pub const MAX_PERMITTED_MAPS: usize = 32;

/// Maps a variant may or may not be played on.
///
/// Always [`MapPermissions::BIT_LENGTH`] bits wide; unused id slots hold -1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPermissions {
    /// `true`: only the listed maps are allowed. `false`: the listed maps are excluded.
    pub allow_listed_only: bool,
    map_ids: [i16; MAX_PERMITTED_MAPS],
}

impl MapPermissions {
    pub const BIT_LENGTH: usize = 1 + MAX_PERMITTED_MAPS * 16;

    pub fn new(allow_listed_only: bool) -> Self {
        Self { allow_listed_only, map_ids: [-1; MAX_PERMITTED_MAPS] }
    }

    pub fn map_ids(&self) -> &[i16; MAX_PERMITTED_MAPS] {
        &self.map_ids
    }

    /// Listed maps, up to the first unused slot.
    pub fn maps(&self) -> impl Iterator<Item = i16> + '_ {
        self.map_ids.iter().copied().take_while(|&id| id != -1)
    }

    /// Replaces the listed maps; remaining slots are reset to -1.
    pub fn set_maps(&mut self, ids: &[i16]) -> Result<()> {
        if ids.len() > MAX_PERMITTED_MAPS {
            return Err(Error::LimitExceeded {
                field: "map_ids".into(),
                count: ids.len(),
                max: MAX_PERMITTED_MAPS,
            });
        }
        self.map_ids = [-1; MAX_PERMITTED_MAPS];
        self.map_ids[..ids.len()].copy_from_slice(ids);
        Ok(())
    }
}

impl Default for MapPermissions {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Serializable for MapPermissions {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_bool(&mut self.allow_listed_only)?;
        s.stream_array(&mut self.map_ids)
    }
}

/// Skill rating tuning: 15 weights and a flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRatingParameters {
    pub values: [f32; 15],
    pub flag: bool,
}

impl Serializable for PlayerRatingParameters {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        for value in self.values.iter_mut() {
            s.stream_f32(value)?;
        }
        s.stream_bool(&mut self.flag)
    }
}

/// Whether players may switch teams mid-game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeamChanging {
    #[default]
    Disabled = 0,
    Enabled = 1,
    BalancingOnly = 2,
}

impl TeamChanging {
    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Disabled,
            1 => Self::Enabled,
            2 => Self::BalancingOnly,
            _ => return Err(Error::invalid_enum(code.into())),
        })
    }
}

/// Round, scoring and respawn settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalGameOptions {
    pub score_to_win: i16,
    pub round_time_limit: u8,
    pub round_limit: u8,
    pub early_victory_win_count: u8,
    pub sudden_death_time_limit: u8,
    pub lives_per_round: u8,
    pub team_lives_per_round: u8,
    pub respawn_time: u8,
    pub suicide_penalty: u8,
    pub betrayal_penalty: u8,
    pub teams_enabled: bool,
    pub friendly_fire: bool,
    pub betrayal_booting: bool,
    pub perfection_enabled: bool,
    pub team_changing: TeamChanging,
}

impl Serializable for GlobalGameOptions {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_full(&mut self.score_to_win)?;
        s.stream_full(&mut self.round_time_limit)?;
        s.stream(&mut self.round_limit, 5).map_err(|e| e.in_field("round_limit"))?;
        s.stream(&mut self.early_victory_win_count, 4)
            .map_err(|e| e.in_field("early_victory_win_count"))?;
        s.stream(&mut self.sudden_death_time_limit, 7)
            .map_err(|e| e.in_field("sudden_death_time_limit"))?;
        s.stream(&mut self.lives_per_round, 6).map_err(|e| e.in_field("lives_per_round"))?;
        s.stream(&mut self.team_lives_per_round, 7)
            .map_err(|e| e.in_field("team_lives_per_round"))?;
        s.stream_full(&mut self.respawn_time)?;
        s.stream_full(&mut self.suicide_penalty)?;
        s.stream_full(&mut self.betrayal_penalty)?;
        s.stream_bool(&mut self.teams_enabled)?;
        s.stream_bool(&mut self.friendly_fire)?;
        s.stream_bool(&mut self.betrayal_booting)?;
        s.stream_bool(&mut self.perfection_enabled)?;

        let mut code = self.team_changing as u8;
        s.stream(&mut code, 2)?;
        self.team_changing = TeamChanging::from_code(code).map_err(|e| e.in_field("team_changing"))?;
        Ok(())
    }
}

/// A spawn loadout. Weapon and ability indices use -1 for "none".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLoadout {
    pub hidden: bool,
    /// Plus-one encoded in 7 bits.
    pub name_index: i8,
    pub primary_weapon: i8,
    pub secondary_weapon: i8,
    pub armor_ability: i8,
    pub grenade_count: u8,
}

impl Default for MapLoadout {
    fn default() -> Self {
        Self {
            hidden: false,
            name_index: -1,
            primary_weapon: -1,
            secondary_weapon: -1,
            armor_ability: -1,
            grenade_count: 0,
        }
    }
}

impl Serializable for MapLoadout {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_bool(&mut self.hidden)?;
        s.stream_plus_one(&mut self.name_index, 7).map_err(|e| e.in_field("name_index"))?;
        s.stream_full(&mut self.primary_weapon)?;
        s.stream_full(&mut self.secondary_weapon)?;
        s.stream_full(&mut self.armor_ability)?;
        s.stream(&mut self.grenade_count, 4).map_err(|e| e.in_field("grenade_count"))
    }
}

/// A 6-bit emblem palette index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EmblemColor(u8);

impl EmblemColor {
    pub const BITS: u8 = 6;
    pub const MAX: u8 = (1 << Self::BITS) - 1;

    /// Fails with [`Error::CapacityExceeded`] above [`MAX`](Self::MAX).
    pub fn new(index: u8) -> Result<Self> {
        if index > Self::MAX {
            return Err(Error::capacity(index.into(), Self::BITS));
        }
        Ok(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// A team emblem: two layer images, three toggles and three colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamEmblem {
    foreground: u8,
    background: u8,
    unknown_flag: bool,
    background_toggle: bool,
    foreground_toggle: bool,
    primary_color: EmblemColor,
    secondary_color: EmblemColor,
    background_color: EmblemColor,
}

impl TeamEmblem {
    pub fn foreground(&self) -> u8 {
        self.foreground
    }

    pub fn set_foreground(&mut self, value: u8) {
        self.foreground = value;
    }

    pub fn background(&self) -> u8 {
        self.background
    }

    pub fn set_background(&mut self, value: u8) {
        self.background = value;
    }

    pub fn unknown_flag(&self) -> bool {
        self.unknown_flag
    }

    pub fn set_unknown_flag(&mut self, value: bool) {
        self.unknown_flag = value;
    }

    pub fn foreground_toggle(&self) -> bool {
        self.foreground_toggle
    }

    pub fn set_foreground_toggle(&mut self, value: bool) {
        self.foreground_toggle = value;
    }

    pub fn background_toggle(&self) -> bool {
        self.background_toggle
    }

    pub fn set_background_toggle(&mut self, value: bool) {
        self.background_toggle = value;
    }

    pub fn primary_color(&self) -> EmblemColor {
        self.primary_color
    }

    pub fn set_primary_color(&mut self, color: EmblemColor) {
        self.primary_color = color;
    }

    pub fn secondary_color(&self) -> EmblemColor {
        self.secondary_color
    }

    pub fn set_secondary_color(&mut self, color: EmblemColor) {
        self.secondary_color = color;
    }

    pub fn background_color(&self) -> EmblemColor {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: EmblemColor) {
        self.background_color = color;
    }
}

impl Serializable for TeamEmblem {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_full(&mut self.foreground)?;
        s.stream_full(&mut self.background)?;
        s.stream_bool(&mut self.unknown_flag)?;
        s.stream_bool(&mut self.background_toggle)?;
        s.stream_bool(&mut self.foreground_toggle)?;
        for (color, name) in [
            (&mut self.primary_color, "primary_color"),
            (&mut self.secondary_color, "secondary_color"),
            (&mut self.background_color, "background_color"),
        ] {
            s.stream(&mut color.0, EmblemColor::BITS).map_err(|e| e.in_field(name))?;
        }
        Ok(())
    }
}
