//! Title-specific game variants.
//!
//! A title variant owns the shared [`MegaloData`] block and streams it first,
//! then its own trailing fields.

use log::debug;

use crate::bitstream::BitStream;
use crate::definition::ScriptDatabase;
use crate::megalo::MegaloData;
use crate::serialize::{serialize_sequence, Serializable};
use crate::Result;

/// One requisition entry. Field meanings are undocumented.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequisitionData {
    pub unknown0: i32,
    pub unknown1: f32,
    pub unknown2: i32,
}

impl Serializable for RequisitionData {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_full(&mut self.unknown0)?;
        s.stream_f32(&mut self.unknown1)?;
        s.stream_full(&mut self.unknown2)
    }
}

/// Requisition settings trailing the Halo 4 variant (unused by the shipped game).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequisitionSettings {
    pub unknown0: f32,
    pub unknown1: i32,
    pub entries: Vec<RequisitionData>,
    pub unknown2: i32,
}

impl RequisitionSettings {
    pub const COUNT_BITS: u8 = 7;
}

impl Serializable for RequisitionSettings {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_f32(&mut self.unknown0)?;
        s.stream_full(&mut self.unknown1)?;
        serialize_sequence(s, &mut self.entries, Self::COUNT_BITS).map_err(|e| e.in_field("entries"))?;
        s.stream_full(&mut self.unknown2)
    }
}

/// Halo 4 game variant: the shared Megalo block plus requisition settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Halo4GameVariant {
    pub megalo: MegaloData,
    pub requisitions: RequisitionSettings,
}

impl Halo4GameVariant {
    pub fn serialize(&mut self, s: &mut BitStream<'_>, db: &ScriptDatabase) -> Result<()> {
        self.megalo.serialize(s, db)?;
        self.requisitions.serialize(s).map_err(|e| e.in_field("requisitions"))
    }

    pub fn encode(&self, db: &ScriptDatabase) -> Result<Vec<u8>> {
        let mut variant = self.clone();
        let mut s = BitStream::encoder();
        variant.serialize(&mut s, db)?;
        debug!("encoded Halo 4 variant: {} bits", s.bit_position());
        Ok(s.into_bytes())
    }

    pub fn decode(bytes: &[u8], db: &ScriptDatabase) -> Result<Self> {
        debug!("decoding Halo 4 variant from {} bytes", bytes.len());
        let mut variant = Self::default();
        variant.serialize(&mut BitStream::decoder(bytes), db)?;
        Ok(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::megalo;

    fn settings() -> RequisitionSettings {
        RequisitionSettings {
            unknown0: 1.25,
            unknown1: -7,
            entries: vec![
                RequisitionData { unknown0: 3, unknown1: 50.0, unknown2: 2 },
                RequisitionData { unknown0: -1, unknown1: 0.0, unknown2: 0 },
            ],
            unknown2: 99,
        }
    }

    #[test]
    fn requisitions_round_trip() {
        let mut value = settings();
        let mut s = BitStream::encoder();
        value.serialize(&mut s).unwrap();
        assert_eq!(s.bit_position(), 32 + 32 + 7 + 2 * 96 + 32);
        let bytes = s.into_bytes();

        let mut decoded = RequisitionSettings::default();
        decoded.serialize(&mut BitStream::decoder(&bytes)).unwrap();
        assert_eq!(decoded, settings());
    }

    #[test]
    fn requisition_record_layout() {
        let mut record = RequisitionData { unknown0: 1, unknown1: 1.0, unknown2: -2 };
        let mut s = BitStream::encoder();
        record.serialize(&mut s).unwrap();
        let bytes = s.into_bytes();

        let mut s = BitStream::decoder(&bytes);
        assert_eq!(s.read_bits(32).unwrap(), 1);
        assert_eq!(s.read_bits(32).unwrap(), u64::from(1.0f32.to_bits()));
        assert_eq!(s.read_bits(32).unwrap(), 0xFFFF_FFFE);
    }

    #[test]
    fn requisition_count_capacity() {
        let mut value = RequisitionSettings { entries: vec![RequisitionData::default(); 128], ..RequisitionSettings::default() };
        let err = value.serialize(&mut BitStream::encoder()).unwrap_err();
        assert_eq!(err.field(), "entries");
    }

    #[test]
    fn shared_block_comes_first() {
        let db = ScriptDatabase::new();
        let mut variant = Halo4GameVariant::default();
        variant.megalo.icon_index = 2;
        variant.requisitions = settings();

        let bytes = variant.encode(&db).unwrap();
        // Der gemeinsame Block ist ein Präfix der Variante
        let shared = megalo::encode(&variant.megalo, &db).unwrap();
        let full = shared.len() - 1;
        assert_eq!(&bytes[..full], &shared[..full]);
        // Letztes Byte: nur die 2978 % 8 = 2 Blockbits vergleichen
        assert_eq!(bytes[full] & 0xC0, shared[full] & 0xC0);
        assert_eq!(megalo::decode(&bytes, &db).unwrap(), variant.megalo);

        assert_eq!(Halo4GameVariant::decode(&bytes, &db).unwrap(), variant);
    }
}
