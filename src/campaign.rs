//! Campaign map list.

use crate::bitstream::BitStream;
use crate::serialize::Serializable;
use crate::{Error, Result};

/// Maximum number of levels in a campaign.
pub const MAX_LEVELS: usize = 64;

/// Ordered map ids of a campaign; unused slots hold -1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignMapList {
    map_ids: [i32; MAX_LEVELS],
    pub unknown: i32,
}

impl CampaignMapList {
    pub fn new() -> Self {
        Self { map_ids: [-1; MAX_LEVELS], unknown: 0 }
    }

    pub fn map_ids(&self) -> &[i32; MAX_LEVELS] {
        &self.map_ids
    }

    /// Used slots, up to the first -1.
    pub fn levels(&self) -> impl Iterator<Item = i32> + '_ {
        self.map_ids.iter().copied().take_while(|&id| id != -1)
    }

    /// Replaces the list; remaining slots are reset to -1.
    pub fn set_levels(&mut self, ids: &[i32]) -> Result<()> {
        if ids.len() > MAX_LEVELS {
            return Err(Error::LimitExceeded { field: "map_ids".into(), count: ids.len(), max: MAX_LEVELS });
        }
        self.map_ids = [-1; MAX_LEVELS];
        self.map_ids[..ids.len()].copy_from_slice(ids);
        Ok(())
    }
}

impl Default for CampaignMapList {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializable for CampaignMapList {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        s.stream_array(&mut self.map_ids)?;
        s.stream_full(&mut self.unknown)
    }
}
