//! String pools: an (offset, length) header table plus one shared character region.
//!
//! Wire layout:
//!
//! ```text
//! count                       count_bits
//! (offset, length) × count    offset_bits, length_bits
//! character region            8 bits per byte, max(offset + length) bytes
//! ```
//!
//! Offsets are byte positions into the region. On encode the region is the
//! concatenation of all entries in order, so offsets are running totals.
//! Text is stored as UTF-8 without terminators.

use crate::bitstream::BitStream;
use crate::layout::PoolLayout;
use crate::serialize::{max_count, stream_count, Serializable};
use crate::{Error, Result};

/// View of one pool entry with its computed header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringPoolEntry<'a> {
    pub offset: usize,
    pub length: usize,
    pub text: &'a str,
}

/// An ordered table of strings sharing one character region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPool {
    layout: PoolLayout,
    entries: Vec<String>,
}

impl StringPool {
    /// Creates an empty pool with the given header widths.
    pub fn new(layout: PoolLayout) -> Self {
        Self { layout, entries: Vec::new() }
    }

    pub fn layout(&self) -> PoolLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Index of the first entry equal to `text`.
    pub fn position(&self, text: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == text)
    }

    /// Appends an entry and returns its index.
    ///
    /// Fails with [`Error::LimitExceeded`] when the count field is full.
    pub fn push(&mut self, text: impl Into<String>) -> Result<usize> {
        let max = max_count(self.layout.count_bits) as usize;
        if self.entries.len() >= max {
            return Err(Error::LimitExceeded {
                field: "".into(),
                count: self.entries.len() + 1,
                max,
            });
        }
        self.entries.push(text.into());
        Ok(self.entries.len() - 1)
    }

    /// Replaces all entries.
    pub fn set_entries(&mut self, entries: Vec<String>) -> Result<()> {
        let max = max_count(self.layout.count_bits) as usize;
        if entries.len() > max {
            return Err(Error::LimitExceeded { field: "".into(), count: entries.len(), max });
        }
        self.entries = entries;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries with the offsets and lengths an encode pass would write.
    pub fn entries_with_offsets(&self) -> Vec<StringPoolEntry<'_>> {
        let mut offset = 0;
        self.entries
            .iter()
            .map(|text| {
                let entry = StringPoolEntry { offset, length: text.len(), text };
                offset += text.len();
                entry
            })
            .collect()
    }
}

impl Serializable for StringPool {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        serialize_entries(s, self.layout, &mut self.entries)
    }
}

/// A pool that holds at most one entry (`count_bits = 1`), exposed as
/// present or absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSlot {
    layout: PoolLayout,
    value: Option<String>,
}

impl StringSlot {
    /// # Panics
    ///
    /// Panics if `layout.count_bits` is not 1.
    pub fn new(layout: PoolLayout) -> Self {
        assert_eq!(layout.count_bits, 1, "a string slot needs a 1-bit count");
        Self { layout, value: None }
    }

    pub fn layout(&self) -> PoolLayout {
        self.layout
    }

    pub fn get(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set(&mut self, value: Option<String>) {
        self.value = value;
    }
}

impl Serializable for StringSlot {
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()> {
        let mut entries: Vec<String> = self.value.take().into_iter().collect();
        let result = serialize_entries(s, self.layout, &mut entries);
        self.value = entries.pop();
        result
    }
}

fn serialize_entries(s: &mut BitStream<'_>, layout: PoolLayout, entries: &mut Vec<String>) -> Result<()> {
    let mut count = entries.len();
    stream_count(s, &mut count, layout.count_bits).map_err(|e| e.in_field("count"))?;

    if s.is_decoding() {
        let mut header = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            let mut offset = 0u64;
            let mut length = 0u64;
            s.stream(&mut offset, layout.offset_bits)?;
            s.stream(&mut length, layout.length_bits)?;
            header.push((offset as usize, length as usize));
        }

        let region_len = header.iter().map(|&(o, l)| o.saturating_add(l)).max().unwrap_or(0);
        let mut region = Vec::new();
        s.stream_bytes(&mut region, region_len)?;

        entries.clear();
        for (index, (offset, length)) in header.into_iter().enumerate() {
            let text = std::str::from_utf8(&region[offset..offset + length])
                .map_err(|_| Error::InvalidUtf8 { field: "".into(), index })?;
            entries.push(text.to_owned());
        }
    } else {
        let mut offset = 0u64;
        for entry in entries.iter() {
            let mut length = entry.len() as u64;
            let mut start = offset;
            s.stream(&mut start, layout.offset_bits).map_err(|e| e.in_field("offset"))?;
            s.stream(&mut length, layout.length_bits).map_err(|e| e.in_field("length"))?;
            offset += length;
        }

        let mut region: Vec<u8> = entries.iter().flat_map(|e| e.bytes()).collect();
        let len = region.len();
        s.stream_bytes(&mut region, len)?;
    }
    Ok(())
}
