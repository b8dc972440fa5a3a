//! The Megalo script data block and the top-level encode/decode entry points.
//!
//! Field order on the wire:
//!
//! ```text
//!  1 traits                 5-bit count, at most 16
//!  2 user-defined options   5-bit count
//!  3 string pool            16/16/8
//!  4 base game type name    8-bit signed string index
//!  5 name                   11/11/1
//!  6 description            13/13/1
//!  7 intro description      13/13/1
//!  8 category name          10/10/1
//!  9 icon index             plus-one, 5 bits
//! 10 category index         plus-one, 5 bits
//! 11 map permissions       mode bit + 32 × 16-bit map ids
//! 12 rating parameters
//! 13 global game options
//! 14 loadouts               32-bit count
//! 15 disabled options       26 × 32 bits
//! 16 hidden options         26 × 32 bits
//! 17 disabled user options  32 bits
//! 18 hidden user options    32 bits
//! 19 conditions             10-bit count
//! 20 actions                11-bit count
//! 21 triggers               8-bit count
//! 22 statistics             3-bit count
//! 23 variables              global, player, object, team
//! ```
//!
//! The widths above are [`MegaloLayout::STANDARD`]; a block built with another
//! layout uses that layout's widths in the same order.

use log::{debug, trace};

use crate::bitstream::BitStream;
use crate::definition::ScriptDatabase;
use crate::layout::MegaloLayout;
use crate::leaf::{
    GlobalGameOptions, MapLoadout, MapPermissions, PlayerRatingParameters, UserDefinedOption,
    UserDefinedTraits,
};
use crate::script::{Action, Condition, Statistic, Trigger};
use crate::serialize::{serialize_sequence, serialize_sequence_with, Serializable};
use crate::string_pool::{StringPool, StringSlot};
use crate::variables::{VariableScope, VariableTable};
use crate::{Error, Result};

/// Upper bound for user-defined trait sets, below what the count field allows.
pub const MAX_TRAITS: usize = 16;

/// Number of 32-bit words in the disabled/hidden option masks.
pub const OPTION_MASK_WORDS: usize = 26;

/// Script data shared by all titles.
#[derive(Debug, Clone, PartialEq)]
pub struct MegaloData {
    layout: MegaloLayout,
    traits: Vec<UserDefinedTraits>,
    pub user_options: Vec<UserDefinedOption>,
    strings: StringPool,
    /// Index into the string pool, -1 for none.
    pub base_game_type_name_index: i8,
    name: StringSlot,
    description: StringSlot,
    intro_description: StringSlot,
    category_name: StringSlot,
    pub icon_index: i8,
    pub category_index: i8,
    pub permissions: MapPermissions,
    pub rating: PlayerRatingParameters,
    pub options: GlobalGameOptions,
    pub loadouts: Vec<MapLoadout>,
    pub disabled_options: [u32; OPTION_MASK_WORDS],
    pub hidden_options: [u32; OPTION_MASK_WORDS],
    pub disabled_user_options: u32,
    pub hidden_user_options: u32,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    pub triggers: Vec<Trigger>,
    pub statistics: Vec<Statistic>,
    variables: [VariableTable; 4],
}

impl MegaloData {
    /// Empty block with the standard layout.
    pub fn new() -> Self {
        Self::with_layout(MegaloLayout::STANDARD)
    }

    /// Empty block with a custom layout.
    ///
    /// # Panics
    ///
    /// Panics if [`MegaloLayout::validate`] rejects `layout`; check it first
    /// when the widths come from outside the program.
    pub fn with_layout(layout: MegaloLayout) -> Self {
        if let Err(e) = layout.validate() {
            panic!("invalid Megalo layout: {e}");
        }
        Self {
            layout,
            traits: Vec::new(),
            user_options: Vec::new(),
            strings: StringPool::new(layout.strings),
            base_game_type_name_index: -1,
            name: StringSlot::new(layout.name),
            description: StringSlot::new(layout.description),
            intro_description: StringSlot::new(layout.intro_description),
            category_name: StringSlot::new(layout.category_name),
            icon_index: -1,
            category_index: -1,
            permissions: MapPermissions::default(),
            rating: PlayerRatingParameters::default(),
            options: GlobalGameOptions::default(),
            loadouts: Vec::new(),
            disabled_options: [0; OPTION_MASK_WORDS],
            hidden_options: [0; OPTION_MASK_WORDS],
            disabled_user_options: 0,
            hidden_user_options: 0,
            conditions: Vec::new(),
            actions: Vec::new(),
            triggers: Vec::new(),
            statistics: Vec::new(),
            variables: [
                VariableTable::with_widths(VariableScope::Global, layout.global_variables),
                VariableTable::with_widths(VariableScope::Player, layout.player_variables),
                VariableTable::with_widths(VariableScope::Object, layout.object_variables),
                VariableTable::with_widths(VariableScope::Team, layout.team_variables),
            ],
        }
    }

    pub fn layout(&self) -> &MegaloLayout {
        &self.layout
    }

    pub fn traits(&self) -> &[UserDefinedTraits] {
        &self.traits
    }

    /// Replaces the trait sets. Fails with [`Error::LimitExceeded`] above
    /// [`MAX_TRAITS`].
    pub fn set_traits(&mut self, traits: Vec<UserDefinedTraits>) -> Result<()> {
        check_trait_limit(traits.len())?;
        self.traits = traits;
        Ok(())
    }

    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    pub fn strings_mut(&mut self) -> &mut StringPool {
        &mut self.strings
    }

    pub fn name(&self) -> Option<&str> {
        self.name.get()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name.set(name);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.get()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description.set(description);
    }

    pub fn intro_description(&self) -> Option<&str> {
        self.intro_description.get()
    }

    pub fn set_intro_description(&mut self, text: Option<String>) {
        self.intro_description.set(text);
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_name.get()
    }

    pub fn set_category_name(&mut self, name: Option<String>) {
        self.category_name.set(name);
    }

    pub fn variables(&self, scope: VariableScope) -> &VariableTable {
        &self.variables[scope as usize]
    }

    pub fn variables_mut(&mut self, scope: VariableScope) -> &mut VariableTable {
        &mut self.variables[scope as usize]
    }

    /// Streams the block in either direction. Any failure aborts the pass;
    /// the error carries the path of the failing field.
    pub fn serialize(&mut self, s: &mut BitStream<'_>, db: &ScriptDatabase) -> Result<()> {
        let layout = self.layout;

        field(s, "traits", |s| {
            if !s.is_decoding() {
                check_trait_limit(self.traits.len())?;
            }
            serialize_sequence(s, &mut self.traits, layout.trait_count_bits)?;
            check_trait_limit(self.traits.len())
        })?;
        field(s, "user_options", |s| {
            serialize_sequence(s, &mut self.user_options, layout.option_count_bits)
        })?;
        field(s, "strings", |s| self.strings.serialize(s))?;
        field(s, "base_game_type_name_index", |s| {
            s.stream_full(&mut self.base_game_type_name_index)
        })?;
        field(s, "name", |s| self.name.serialize(s))?;
        field(s, "description", |s| self.description.serialize(s))?;
        field(s, "intro_description", |s| self.intro_description.serialize(s))?;
        field(s, "category_name", |s| self.category_name.serialize(s))?;
        field(s, "icon_index", |s| s.stream_plus_one(&mut self.icon_index, layout.icon_index_bits))?;
        field(s, "category_index", |s| {
            s.stream_plus_one(&mut self.category_index, layout.category_index_bits)
        })?;
        field(s, "permissions", |s| self.permissions.serialize(s))?;
        field(s, "rating", |s| self.rating.serialize(s))?;
        field(s, "options", |s| self.options.serialize(s))?;
        field(s, "loadouts", |s| {
            serialize_sequence(s, &mut self.loadouts, layout.loadout_count_bits)
        })?;
        field(s, "disabled_options", |s| s.stream_array(&mut self.disabled_options))?;
        field(s, "hidden_options", |s| s.stream_array(&mut self.hidden_options))?;
        field(s, "disabled_user_options", |s| s.stream_full(&mut self.disabled_user_options))?;
        field(s, "hidden_user_options", |s| s.stream_full(&mut self.hidden_user_options))?;
        field(s, "conditions", |s| {
            serialize_sequence_with(s, &mut self.conditions, layout.condition_count_bits, |c, s| {
                c.serialize(s, db)
            })
        })?;
        field(s, "actions", |s| {
            serialize_sequence_with(s, &mut self.actions, layout.action_count_bits, |a, s| {
                a.serialize(s, db)
            })
        })?;
        field(s, "triggers", |s| {
            serialize_sequence(s, &mut self.triggers, layout.trigger_count_bits)
        })?;
        field(s, "statistics", |s| {
            serialize_sequence(s, &mut self.statistics, layout.statistic_count_bits)
        })?;
        for table in self.variables.iter_mut() {
            field(s, table.scope().name(), |s| table.serialize(s))?;
        }
        Ok(())
    }
}

impl Default for MegaloData {
    fn default() -> Self {
        Self::new()
    }
}

fn check_trait_limit(count: usize) -> Result<()> {
    if count > MAX_TRAITS {
        return Err(Error::LimitExceeded { field: "".into(), count, max: MAX_TRAITS });
    }
    Ok(())
}

fn field<F>(s: &mut BitStream<'_>, name: &'static str, f: F) -> Result<()>
where
    F: FnOnce(&mut BitStream<'_>) -> Result<()>,
{
    trace!("{name} at bit {}", s.bit_position());
    f(s).map_err(|e| e.in_field(name))
}

/// Encodes `data` with the layout it was built with.
pub fn encode(data: &MegaloData, db: &ScriptDatabase) -> Result<Vec<u8>> {
    let mut data = data.clone();
    let mut s = BitStream::encoder();
    data.serialize(&mut s, db)?;
    let bits = s.bit_position();
    let bytes = s.into_bytes();
    debug!(
        "encoded Megalo block: {bits} bits, {} conditions, {} actions, {} triggers",
        data.conditions.len(),
        data.actions.len(),
        data.triggers.len()
    );
    Ok(bytes)
}

/// Decodes a block with the standard layout.
///
/// Bits after the block are ignored; title-specific fields may follow.
pub fn decode(bytes: &[u8], db: &ScriptDatabase) -> Result<MegaloData> {
    decode_with_layout(bytes, db, MegaloLayout::STANDARD)
}

/// Decodes a block with a custom layout.
///
/// Fails with [`Error::InvalidWidth`] before reading if the layout has a
/// width the stream cannot handle.
pub fn decode_with_layout(bytes: &[u8], db: &ScriptDatabase, layout: MegaloLayout) -> Result<MegaloData> {
    layout.validate().map_err(|e| e.in_field("layout"))?;
    debug!("decoding Megalo block from {} bytes", bytes.len());
    let mut data = MegaloData::with_layout(layout);
    let mut s = BitStream::decoder(bytes);
    data.serialize(&mut s, db)?;
    debug!(
        "decoded Megalo block: {} bits, {} conditions, {} actions, {} triggers",
        s.bit_position(),
        data.conditions.len(),
        data.actions.len(),
        data.triggers.len()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Definition;
    use crate::layout::PoolLayout;
    use crate::parameter::{Parameter, ParameterKind};
    use crate::variables::VariableCategory;

    fn database() -> ScriptDatabase {
        let mut db = ScriptDatabase::new();
        db.conditions.insert(Definition::new(3, vec![ParameterKind::Integer]).named("is_alive"));
        db.actions.insert(Definition::new(20, vec![ParameterKind::Float]).named("set_gravity"));
        db
    }

    fn standalone_bits<T: Serializable + Clone>(value: &T) -> usize {
        let mut copy = value.clone();
        let mut s = BitStream::encoder();
        copy.serialize(&mut s).unwrap();
        s.bit_position()
    }

    #[test]
    fn empty_block_bit_length() {
        let data = MegaloData::new();
        let mut copy = data.clone();
        let mut s = BitStream::encoder();
        copy.serialize(&mut s, &ScriptDatabase::new()).unwrap();

        let fixed = standalone_bits(&data.permissions)
            + standalone_bits(&data.rating)
            + standalone_bits(&data.options)
            + VariableScope::ALL.iter().map(|&scope| data.variables(scope).bit_length()).sum::<usize>();
        // Zähler: 5 + 5 + 8 + 32 + 10 + 11 + 8 + 3, Slots: 4 × 1
        let counts = 5 + 5 + 8 + 32 + 10 + 11 + 8 + 3 + 4;
        let scalars = 8 + 5 + 5 + 2 * 26 * 32 + 2 * 32;
        assert_eq!(s.bit_position(), counts + scalars + fixed);
        assert_eq!(s.bit_position(), 2978);
    }

    #[test]
    fn empty_block_round_trip() {
        let db = ScriptDatabase::new();
        let bytes = encode(&MegaloData::new(), &db).unwrap();
        assert_eq!(bytes.len(), 373);
        let decoded = decode(&bytes, &db).unwrap();
        assert_eq!(decoded, MegaloData::new());
        assert_eq!(decoded.icon_index, -1);
        assert!(decoded.name().is_none());
    }

    #[test]
    fn populated_round_trip() {
        let db = database();
        let mut data = MegaloData::new();
        data.set_traits(vec![UserDefinedTraits { name_index: 1, ..UserDefinedTraits::default() }])
            .unwrap();
        data.strings_mut().push("Flag").unwrap();
        data.set_name(Some("Capture".into()));
        data.icon_index = 4;
        data.conditions.push(Condition::new(3, vec![Parameter::Integer(-2)]));
        data.actions.push(Action::new(20, vec![Parameter::Float(0.5)]));
        data.triggers.push(Trigger { action_count: 1, condition_count: 1, ..Trigger::default() });
        data.variables_mut(VariableScope::Team).set_count(VariableCategory::Number, 2).unwrap();
        data.disabled_options[25] = u32::MAX;

        let bytes = encode(&data, &db).unwrap();
        assert_eq!(decode(&bytes, &db).unwrap(), data);
    }

    #[test]
    fn set_traits_limit() {
        let mut data = MegaloData::new();
        let err = data.set_traits(vec![UserDefinedTraits::default(); 17]).unwrap_err();
        assert_eq!(err, Error::LimitExceeded { field: "".into(), count: 17, max: 16 });
        assert!(data.traits().is_empty());
        assert!(data.set_traits(vec![UserDefinedTraits::default(); 16]).is_ok());
    }

    #[test]
    fn decode_rejects_too_many_traits() {
        // 17 Traits im 5-Bit-Zähler
        let mut s = BitStream::encoder();
        s.write_bits(17, 5);
        for _ in 0..17 {
            UserDefinedTraits::default().serialize(&mut s).unwrap();
        }
        let bytes = s.into_bytes();
        let err = decode(&bytes, &ScriptDatabase::new()).unwrap_err();
        assert_eq!(err, Error::LimitExceeded { field: "traits".into(), count: 17, max: 16 });
    }

    #[test]
    fn nested_error_carries_field_path() {
        let db = database();
        let mut data = MegaloData::new();
        data.category_index = 40;
        let err = encode(&data, &db).unwrap_err();
        assert_eq!(err, Error::ValueOutOfRange { field: "category_index".into(), value: 40, bits: 5 });

        let mut data = MegaloData::new();
        data.loadouts.push(MapLoadout { grenade_count: 200, ..MapLoadout::default() });
        assert_eq!(encode(&data, &db).unwrap_err().field(), "loadouts.grenade_count");
    }

    #[test]
    fn instruction_failure_aborts_pass() {
        let db = database();
        let mut data = MegaloData::new();
        data.actions.push(Action::new(20, vec![Parameter::Integer(1)]));
        let err = encode(&data, &db).unwrap_err();
        assert!(matches!(err, Error::ParameterKindMismatch { index: 0, .. }), "{err:?}");
        assert_eq!(err.field(), "actions.parameters");
    }

    #[test]
    fn custom_layout_is_checked_before_decoding() {
        let bytes = encode(&MegaloData::new(), &ScriptDatabase::new()).unwrap();
        let layout = MegaloLayout { trigger_count_bits: 0, ..MegaloLayout::STANDARD };
        let err = decode_with_layout(&bytes, &ScriptDatabase::new(), layout).unwrap_err();
        assert_eq!(err, Error::InvalidWidth { field: "layout.trigger_count_bits".into(), bits: 0 });

        let layout = MegaloLayout { description: PoolLayout::new(13, 13, 8), ..MegaloLayout::STANDARD };
        let err = decode_with_layout(&bytes, &ScriptDatabase::new(), layout).unwrap_err();
        assert_eq!(err.field(), "layout.description.count_bits");
    }

    #[test]
    #[should_panic(expected = "invalid Megalo layout")]
    fn with_layout_rejects_invalid_widths() {
        MegaloData::with_layout(MegaloLayout { icon_index_bits: 0, ..MegaloLayout::STANDARD });
    }

    #[test]
    fn truncated_block() {
        let bytes = encode(&MegaloData::new(), &ScriptDatabase::new()).unwrap();
        let err = decode(&bytes[..100], &ScriptDatabase::new()).unwrap_err();
        assert!(matches!(err, Error::TruncatedStream { .. }), "{err:?}");
        // 800 Bits enden mitten im Rating
        assert_eq!(err.field(), "rating");
    }

    #[test]
    fn custom_layout_round_trip() {
        let mut layout = MegaloLayout::STANDARD;
        layout.loadout_count_bits = 4;
        layout.icon_index_bits = 7;
        let mut data = MegaloData::with_layout(layout);
        data.icon_index = 100;
        data.loadouts.push(MapLoadout::default());

        let db = ScriptDatabase::new();
        let bytes = encode(&data, &db).unwrap();
        let decoded = decode_with_layout(&bytes, &db, layout).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(decoded.layout().loadout_count_bits, 4);
    }
}
