//! megalo – bit-packed codec for Megalo game variant script data
//!
//! One `serialize` method per type handles both directions; the
//! [`BitStream`] decides whether a field is read or written. Condition and
//! action parameters carry no type tags, their shape comes from a
//! [`ScriptDatabase`] supplied by the caller.
//!
//! # Beispiel
//!
//! ```
//! use megalo::{decode, encode, Action, Definition, MegaloData, Parameter, ParameterKind, ScriptDatabase};
//!
//! let mut db = ScriptDatabase::new();
//! db.actions.insert(Definition::new(7, vec![ParameterKind::Integer]).named("set_score"));
//!
//! let mut data = MegaloData::new();
//! data.set_name(Some("Slayer".into()));
//! data.actions.push(Action::new(7, vec![Parameter::Integer(50)]));
//!
//! let bytes = encode(&data, &db).unwrap();
//! let decoded = decode(&bytes, &db).unwrap();
//! assert_eq!(decoded, data);
//! assert_eq!(decoded.name(), Some("Slayer"));
//! ```

pub mod bitstream;
pub mod campaign;
pub mod definition;
pub mod error;
pub mod layout;
pub mod leaf;
pub mod megalo;
pub mod parameter;
pub mod script;
pub mod serialize;
pub mod string_pool;
pub mod variables;
pub mod variant;

pub use error::{Error, Result};

/// HashMap mit ahash (schnell, nicht DoS-resistent, nur für interne Tabellen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Stream
pub use bitstream::{BitStream, Direction};
pub use serialize::{serialize_sequence, serialize_sequence_with, Serializable, DEFAULT_COUNT_BITS};

// Public API: Layout
pub use layout::{MegaloLayout, PoolLayout, ScopeWidths};

// Public API: Script
pub use definition::{Definition, DefinitionTable, ScriptDatabase};
pub use parameter::{Parameter, ParameterKind};
pub use script::{Action, Condition, Execution, Statistic, Trigger, TriggerKind};

// Public API: Data
pub use campaign::CampaignMapList;
pub use leaf::{
    EmblemColor, GlobalGameOptions, MapLoadout, MapPermissions, OptionValue, OptionValues,
    PlayerRatingParameters, PlayerTraits, TeamEmblem, UserDefinedOption, UserDefinedTraits,
};
pub use megalo::{decode, decode_with_layout, encode, MegaloData};
pub use string_pool::{StringPool, StringSlot};
pub use variables::{VariableCategory, VariableScope, VariableTable};
pub use variant::{Halo4GameVariant, RequisitionData, RequisitionSettings};
