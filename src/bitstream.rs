//! Bit-level stream reader and writer.
//!
//! Bits are packed MSB first: bit 7 of each byte is written/read first. A
//! byte-aligned run of 8-bit fields therefore reads like a big-endian byte
//! string.
//!
//! [`BitStream`] is the single entry point for structured values: it is fixed
//! to one [`Direction`] for its lifetime and exposes `stream_*` primitives that
//! read into a `&mut` value on decode and write that value on encode. One
//! `serialize` method per type therefore describes both layouts.

use crate::{Error, Result};

/// Writes individual bits into a growable byte buffer, MSB first.
///
/// Intern wird ein u64-Akkumulator verwendet: Bits werden zuerst in `accum`
/// gesammelt und erst bei >= 8 akkumulierten Bits als volle Bytes in `buf`
/// geflusht.
pub struct BitWriter {
    buf: Vec<u8>,
    /// Akkumulator: enthält die nächsten `accum_bits` Bits (MSB = ältestes Bit).
    accum: u64,
    /// Anzahl gültiger Bits im Akkumulator (0..7 nach Flush).
    accum_bits: u8,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    pub fn new() -> Self {
        Self { buf: Vec::new(), accum: 0, accum_bits: 0 }
    }

    #[inline(always)]
    fn flush_to_buf(&mut self) {
        while self.accum_bits >= 8 {
            self.accum_bits -= 8;
            self.buf.push((self.accum >> self.accum_bits) as u8);
        }
        if self.accum_bits > 0 {
            self.accum &= (1u64 << self.accum_bits) - 1;
        } else {
            self.accum = 0;
        }
    }

    /// Writes a single bit. `true` = 1, `false` = 0.
    #[inline(always)]
    pub fn write_bit(&mut self, val: bool) {
        self.accum = (self.accum << 1) | u64::from(val);
        self.accum_bits += 1;
        if self.accum_bits >= 8 {
            self.flush_to_buf();
        }
    }

    /// Writes the lower `n` bits of `val`, MSB first. Higher bits are ignored.
    /// When `n` is 0 this is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `n > 64`.
    #[inline]
    pub fn write_bits(&mut self, val: u64, n: u8) {
        assert!(n <= 64, "bit count must be 0..=64, got {n}");
        if n == 0 {
            return;
        }
        let total = self.accum_bits as u16 + n as u16;
        if total <= 64 {
            if n < 64 {
                self.accum = (self.accum << n) | (val & ((1u64 << n) - 1));
            } else {
                // n == 64, accum_bits muss 0 sein
                self.accum = val;
            }
            self.accum_bits = total as u8;
        } else {
            // n > 57: splitten
            let first = 64 - self.accum_bits;
            let rest = n - first;
            self.accum = (self.accum << first) | ((val >> rest) & ((1u64 << first) - 1));
            self.accum_bits = 64;
            self.flush_to_buf();
            self.accum = val & ((1u64 << rest) - 1);
            self.accum_bits = rest;
        }
        if self.accum_bits >= 8 {
            self.flush_to_buf();
        }
    }

    /// Pads with zero bits until the current position is byte-aligned.
    pub fn align_to_byte(&mut self) {
        if self.accum_bits > 0 {
            self.buf.push((self.accum << (8 - self.accum_bits)) as u8);
            self.accum = 0;
            self.accum_bits = 0;
        }
    }

    /// Schreibt ein Byte-Slice. Bei byte-aligned: direkt `extend_from_slice`,
    /// sonst Loop über `write_bits(8)`.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.accum_bits == 0 {
            self.buf.extend_from_slice(bytes);
        } else {
            for &b in bytes {
                self.write_bits(u64::from(b), 8);
            }
        }
    }

    /// Returns the current bit position (number of bits written so far).
    pub fn bit_position(&self) -> usize {
        self.buf.len() * 8 + self.accum_bits as usize
    }

    /// Finalises the writer, padding the last byte with zero bits, and returns the buffer.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.buf
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads individual bits from a byte slice, MSB first.
///
/// Bits werden batch-weise aus `data` in einen u64-Akkumulator geladen
/// und per Shift/Mask extrahiert.
#[derive(Clone, Copy)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Nächstes ungelesenes Byte in data.
    byte_pos: usize,
    /// Linksbündig (Bit 63 = ältestes). Die rechten (64 - accum_bits) Bits sind immer 0.
    accum: u64,
    accum_bits: u8,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, byte_pos: 0, accum: 0, accum_bits: 0 }
    }

    /// Füllt den Akkumulator byteweise nach, solange accum_bits <= 56.
    #[inline(always)]
    fn refill(&mut self) {
        while self.accum_bits <= 56 && self.byte_pos < self.data.len() {
            self.accum |= (self.data[self.byte_pos] as u64) << (56 - self.accum_bits);
            self.byte_pos += 1;
            self.accum_bits += 8;
        }
    }

    fn truncated(&self, requested: usize) -> Error {
        Error::truncated(self.bit_position(), requested)
    }

    /// Reads a single bit. Returns `true` for 1, `false` for 0.
    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool> {
        self.refill();
        if self.accum_bits == 0 {
            return Err(self.truncated(1));
        }
        let val = (self.accum >> 63) != 0;
        self.accum <<= 1;
        self.accum_bits -= 1;
        Ok(val)
    }

    /// Reads `n` bits and returns them as a `u64`, MSB first.
    /// When `n` is 0 this is a no-op returning 0. The position does not move
    /// when the stream is too short.
    ///
    /// # Panics
    ///
    /// Panics if `n > 64`.
    #[inline]
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        assert!(n <= 64, "bit count must be 0..=64, got {n}");
        if n == 0 {
            return Ok(0);
        }
        if (n as usize) > self.remaining_bits() {
            return Err(self.truncated(n as usize));
        }

        self.refill();
        if self.accum_bits >= n {
            let val = self.accum >> (64 - n);
            self.accum = if n < 64 { self.accum << n } else { 0 };
            self.accum_bits -= n;
            Ok(val)
        } else {
            // Zweistufig (nur n > 56): erst Akkumulator leeren, dann nachladen
            let first = self.accum_bits;
            let val_high = self.accum >> (64 - first);
            self.accum = 0;
            self.accum_bits = 0;

            let remaining = n - first;
            self.refill();
            let val_low = self.accum >> (64 - remaining);
            self.accum <<= remaining;
            self.accum_bits -= remaining;

            Ok((val_high << remaining) | val_low)
        }
    }

    /// Liest `buf.len()` Bytes. Prüft die Länge vorab, damit bei Fehler nichts
    /// konsumiert wird.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        let requested = buf.len().saturating_mul(8);
        if requested > self.remaining_bits() {
            return Err(self.truncated(requested));
        }
        if self.accum_bits == 0 {
            let end = self.byte_pos + buf.len();
            buf.copy_from_slice(&self.data[self.byte_pos..end]);
            self.byte_pos = end;
        } else {
            for slot in buf.iter_mut() {
                *slot = self.read_bits(8)? as u8;
            }
        }
        Ok(())
    }

    /// Returns the current bit position.
    pub fn bit_position(&self) -> usize {
        self.byte_pos * 8 - self.accum_bits as usize
    }

    /// Returns the number of bits remaining to be read.
    pub fn remaining_bits(&self) -> usize {
        (self.data.len() - self.byte_pos) * 8 + self.accum_bits as usize
    }
}

/// Direction of a [`BitStream`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bytes → values.
    Decode,
    /// Values → bytes.
    Encode,
}

enum Inner<'a> {
    Decode(BitReader<'a>),
    Encode(BitWriter),
}

/// A bit cursor bound to one direction for its whole lifetime.
///
/// One stream backs exactly one serialization pass. Calling a
/// write-shaped operation on a decode stream (or vice versa) is a bug in the
/// calling code and panics.
pub struct BitStream<'a> {
    inner: Inner<'a>,
}

impl<'a> BitStream<'a> {
    /// Creates a decode-direction stream over `data`.
    pub fn decoder(data: &'a [u8]) -> Self {
        Self { inner: Inner::Decode(BitReader::new(data)) }
    }

    /// Creates an encode-direction stream over an empty buffer.
    pub fn encoder() -> BitStream<'static> {
        BitStream { inner: Inner::Encode(BitWriter::new()) }
    }

    /// The direction this stream was created with.
    pub fn direction(&self) -> Direction {
        match self.inner {
            Inner::Decode(_) => Direction::Decode,
            Inner::Encode(_) => Direction::Encode,
        }
    }

    #[inline]
    pub fn is_decoding(&self) -> bool {
        matches!(self.inner, Inner::Decode(_))
    }

    /// Bits consumed (decode) or produced (encode) so far.
    pub fn bit_position(&self) -> usize {
        match &self.inner {
            Inner::Decode(r) => r.bit_position(),
            Inner::Encode(w) => w.bit_position(),
        }
    }

    /// Bits left to read. Always 0 on an encode stream.
    pub fn remaining_bits(&self) -> usize {
        match &self.inner {
            Inner::Decode(r) => r.remaining_bits(),
            Inner::Encode(_) => 0,
        }
    }

    /// Reads `n` bits, `1 <= n <= 64`.
    ///
    /// # Panics
    ///
    /// Panics on an encode stream or if `n` is outside `1..=64`.
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        assert!((1..=64).contains(&n), "bit count must be 1..=64, got {n}");
        match &mut self.inner {
            Inner::Decode(r) => r.read_bits(n),
            Inner::Encode(_) => panic!("read_bits on an encode-direction stream"),
        }
    }

    /// Writes the lower `n` bits of `value`, `1 <= n <= 64`.
    ///
    /// # Panics
    ///
    /// Panics on a decode stream or if `n` is outside `1..=64`.
    pub fn write_bits(&mut self, value: u64, n: u8) {
        assert!((1..=64).contains(&n), "bit count must be 1..=64, got {n}");
        match &mut self.inner {
            Inner::Encode(w) => w.write_bits(value, n),
            Inner::Decode(_) => panic!("write_bits on a decode-direction stream"),
        }
    }

    /// Finishes an encode pass and returns the bytes (last byte zero-padded).
    ///
    /// # Panics
    ///
    /// Panics on a decode stream.
    pub fn into_bytes(self) -> Vec<u8> {
        match self.inner {
            Inner::Encode(w) => w.into_vec(),
            Inner::Decode(_) => panic!("into_bytes on a decode-direction stream"),
        }
    }

    /// Streams a single bit.
    pub fn stream_bool(&mut self, value: &mut bool) -> Result<()> {
        match &mut self.inner {
            Inner::Decode(r) => *value = r.read_bit()?,
            Inner::Encode(w) => w.write_bit(*value),
        }
        Ok(())
    }

    /// Streams an integer in exactly `n` bits.
    ///
    /// Unsigned values that do not fit fail with [`Error::CapacityExceeded`].
    /// Signed values are truncated to `n` bits (two's complement) on encode and
    /// sign-extended from bit `n - 1` on decode.
    ///
    /// # Panics
    ///
    /// Panics if `n` is 0 or wider than `T`.
    pub fn stream<T: BitField>(&mut self, value: &mut T, n: u8) -> Result<()> {
        assert!(
            n >= 1 && n <= T::BITS,
            "bit count {n} outside 1..={} for this type",
            T::BITS
        );
        match &mut self.inner {
            Inner::Decode(r) => *value = T::from_field(r.read_bits(n)?, n),
            Inner::Encode(w) => w.write_bits(value.to_field(n)?, n),
        }
        Ok(())
    }

    /// Streams an integer in its natural width (`u8` → 8 bits, `i32` → 32 bits, ...).
    pub fn stream_full<T: BitField>(&mut self, value: &mut T) -> Result<()> {
        self.stream(value, T::BITS)
    }

    /// Streams a fixed-length array of integers, each in its natural width.
    pub fn stream_array<T: BitField, const N: usize>(&mut self, values: &mut [T; N]) -> Result<()> {
        for value in values.iter_mut() {
            self.stream_full(value)?;
        }
        Ok(())
    }

    /// Streams an IEEE-754 single as its 32 raw bits.
    pub fn stream_f32(&mut self, value: &mut f32) -> Result<()> {
        let mut raw = value.to_bits();
        self.stream_full(&mut raw)?;
        *value = f32::from_bits(raw);
        Ok(())
    }

    /// Streams `len` raw bytes. On encode `bytes` is written as is and must
    /// hold exactly `len` bytes; on decode it is replaced.
    pub fn stream_bytes(&mut self, bytes: &mut Vec<u8>, len: usize) -> Result<()> {
        match &mut self.inner {
            Inner::Decode(r) => {
                if len.saturating_mul(8) > r.remaining_bits() {
                    return Err(Error::truncated(r.bit_position(), len.saturating_mul(8)));
                }
                let mut buf = vec![0u8; len];
                r.read_bytes(&mut buf)?;
                *bytes = buf;
            }
            Inner::Encode(w) => {
                assert_eq!(bytes.len(), len, "stream_bytes: buffer length differs from len");
                w.write_bytes(bytes);
            }
        }
        Ok(())
    }

    /// Streams an "index or -1" value as `value + 1` in `n` bits; 0 means -1.
    ///
    /// Encode fails with [`Error::ValueOutOfRange`] for values below -1 or
    /// when `value + 1` needs more than `n` bits.
    pub fn stream_plus_one<T>(&mut self, value: &mut T, n: u8) -> Result<()>
    where
        T: Copy + Into<i64> + TryFrom<i64>,
    {
        assert!((1..=32).contains(&n), "plus-one width must be 1..=32, got {n}");
        match &mut self.inner {
            Inner::Decode(r) => {
                let decoded = r.read_bits(n)? as i64 - 1;
                *value = T::try_from(decoded).map_err(|_| Error::ValueOutOfRange {
                    field: "".into(),
                    value: decoded,
                    bits: n,
                })?;
            }
            Inner::Encode(w) => {
                let v: i64 = (*value).into();
                if v < -1 || v.checked_add(1).map_or(true, |raw| raw >> n != 0) {
                    return Err(Error::ValueOutOfRange { field: "".into(), value: v, bits: n });
                }
                w.write_bits((v + 1) as u64, n);
            }
        }
        Ok(())
    }
}

/// Integer types that can be packed into an n-bit field.
pub trait BitField: Copy {
    /// Natural width of the type.
    const BITS: u8;

    /// Converts to the raw field value for an `n`-bit slot.
    fn to_field(self, n: u8) -> Result<u64>;

    /// Converts a raw `n`-bit field back.
    fn from_field(raw: u64, n: u8) -> Self;
}

macro_rules! unsigned_field {
    ($($t:ty),*) => {$(
        impl BitField for $t {
            const BITS: u8 = <$t>::BITS as u8;

            #[inline]
            fn to_field(self, n: u8) -> Result<u64> {
                let raw = self as u64;
                if n < 64 && raw >> n != 0 {
                    return Err(Error::capacity(raw, n));
                }
                Ok(raw)
            }

            #[inline]
            fn from_field(raw: u64, _n: u8) -> Self {
                raw as $t
            }
        }
    )*};
}

macro_rules! signed_field {
    ($($t:ty),*) => {$(
        impl BitField for $t {
            const BITS: u8 = <$t>::BITS as u8;

            #[inline]
            fn to_field(self, n: u8) -> Result<u64> {
                let raw = self as i64 as u64;
                Ok(if n < 64 { raw & ((1u64 << n) - 1) } else { raw })
            }

            #[inline]
            fn from_field(raw: u64, n: u8) -> Self {
                let shift = 64 - u32::from(n);
                (((raw << shift) as i64) >> shift) as $t
            }
        }
    )*};
}

unsigned_field!(u8, u16, u32, u64);
signed_field!(i8, i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_with(f: impl FnOnce(&mut BitStream<'static>)) -> Vec<u8> {
        let mut s = BitStream::encoder();
        f(&mut s);
        s.into_bytes()
    }

    #[test]
    fn writer_default() {
        let w = BitWriter::default();
        assert_eq!(w.bit_position(), 0);
        assert_eq!(w.into_vec(), Vec::<u8>::new());
    }

    #[test]
    fn write_read_3_bits() {
        let mut w = BitWriter::new();
        w.write_bits(0b101, 3);
        let data = w.into_vec();
        assert_eq!(data, vec![0b1010_0000]);

        let mut r = BitReader::new(&data);
        assert_eq!(r.read_bits(3).unwrap(), 0b101);
    }

    #[test]
    fn write_read_64_bits_unaligned() {
        let val: u64 = 0xDEAD_BEEF_CAFE_BABE;
        let mut w = BitWriter::new();
        w.write_bits(0b101, 3);
        w.write_bits(val, 64);
        let data = w.into_vec();
        assert_eq!(data.len(), 9);

        let mut r = BitReader::new(&data);
        assert_eq!(r.read_bits(3).unwrap(), 0b101);
        assert_eq!(r.read_bits(64).unwrap(), val);
    }

    #[test]
    fn cross_byte_boundary() {
        let mut w = BitWriter::new();
        w.write_bits(0b11, 2);
        w.write_bits(0b10_1010_1010, 10);
        let data = w.into_vec();
        assert_eq!(data, vec![0b1110_1010, 0b1010_0000]);
    }

    #[test]
    fn unaligned_bytes_round_trip() {
        let mut w = BitWriter::new();
        w.write_bit(true);
        w.write_bytes(b"FFA");
        let data = w.into_vec();
        assert_eq!(data.len(), 4);

        let mut r = BitReader::new(&data);
        assert!(r.read_bit().unwrap());
        let mut buf = [0u8; 3];
        r.read_bytes(&mut buf).unwrap();
        assert_eq!(&buf, b"FFA");
    }

    #[test]
    fn truncated_read_keeps_position() {
        let mut r = BitReader::new(&[0xFF]);
        assert_eq!(r.read_bits(4).unwrap(), 0xF);
        let err = r.read_bits(8).unwrap_err();
        assert_eq!(err, Error::truncated(4, 8));
        assert_eq!(r.bit_position(), 4);
    }

    #[test]
    fn direction_is_fixed() {
        let s = BitStream::decoder(&[]);
        assert_eq!(s.direction(), Direction::Decode);
        assert!(s.is_decoding());
        let s = BitStream::encoder();
        assert_eq!(s.direction(), Direction::Encode);
        assert!(!s.is_decoding());
    }

    #[test]
    #[should_panic(expected = "write_bits on a decode-direction stream")]
    fn write_on_decoder_panics() {
        let mut s = BitStream::decoder(&[0]);
        s.write_bits(1, 1);
    }

    #[test]
    #[should_panic(expected = "read_bits on an encode-direction stream")]
    fn read_on_encoder_panics() {
        let mut s = BitStream::encoder();
        let _ = s.read_bits(1);
    }

    #[test]
    #[should_panic(expected = "bit count must be 1..=64")]
    fn zero_width_read_panics() {
        let mut s = BitStream::decoder(&[0]);
        let _ = s.read_bits(0);
    }

    #[test]
    fn signed_sign_extension() {
        let data = encode_with(|s| {
            let mut v: i8 = -3;
            s.stream(&mut v, 4).unwrap();
        });
        // -3 in 4 bits = 0b1101
        assert_eq!(data, vec![0b1101_0000]);

        let mut s = BitStream::decoder(&data);
        let mut v: i8 = 0;
        s.stream(&mut v, 4).unwrap();
        assert_eq!(v, -3);
    }

    #[test]
    fn signed_truncates_on_encode() {
        let data = encode_with(|s| {
            let mut v: i16 = 0x0123;
            s.stream(&mut v, 4).unwrap();
        });
        assert_eq!(data, vec![0b0011_0000]);
    }

    #[test]
    fn unsigned_overflow_is_capacity_error() {
        let mut s = BitStream::encoder();
        let mut v: u8 = 32;
        let err = s.stream(&mut v, 5).unwrap_err();
        assert_eq!(err, Error::capacity(32, 5));
        assert_eq!(s.bit_position(), 0);
    }

    #[test]
    #[should_panic(expected = "outside 1..=8")]
    fn width_wider_than_type_panics() {
        let mut s = BitStream::encoder();
        let mut v: u8 = 1;
        let _ = s.stream(&mut v, 9);
    }

    #[test]
    fn bool_consumes_one_bit() {
        let mut s = BitStream::encoder();
        s.stream_bool(&mut true).unwrap();
        s.stream_bool(&mut false).unwrap();
        assert_eq!(s.bit_position(), 2);
        assert_eq!(s.into_bytes(), vec![0b1000_0000]);
    }

    #[test]
    fn full_width_is_big_endian_when_aligned() {
        let data = encode_with(|s| {
            let mut v: i32 = -1;
            s.stream_full(&mut v).unwrap();
            let mut w: u16 = 0xCAFE;
            s.stream_full(&mut w).unwrap();
        });
        assert_eq!(data, vec![0xFF, 0xFF, 0xFF, 0xFF, 0xCA, 0xFE]);
    }

    #[test]
    fn f32_round_trip() {
        let data = encode_with(|s| {
            s.stream_bool(&mut true).unwrap();
            s.stream_f32(&mut 1.5).unwrap();
        });
        let mut s = BitStream::decoder(&data);
        let mut flag = false;
        let mut v = 0.0f32;
        s.stream_bool(&mut flag).unwrap();
        s.stream_f32(&mut v).unwrap();
        assert!(flag);
        assert_eq!(v, 1.5);
    }

    #[test]
    fn plus_one_sentinel() {
        let data = encode_with(|s| {
            s.stream_plus_one(&mut -1i8, 5).unwrap();
            s.stream_plus_one(&mut 0i8, 5).unwrap();
            s.stream_plus_one(&mut 30i8, 5).unwrap();
        });
        // 00000 00001 11111
        assert_eq!(data, vec![0b0000_0000, 0b0111_1110]);

        let mut s = BitStream::decoder(&data);
        let mut v = 7i8;
        s.stream_plus_one(&mut v, 5).unwrap();
        assert_eq!(v, -1);
        s.stream_plus_one(&mut v, 5).unwrap();
        assert_eq!(v, 0);
        s.stream_plus_one(&mut v, 5).unwrap();
        assert_eq!(v, 30);
    }

    #[test]
    fn plus_one_all_values_round_trip() {
        for n in [1u8, 3, 5, 8] {
            for v in -1..(1i32 << (n - 1)) {
                let data = encode_with(|s| s.stream_plus_one(&mut v.clone(), n).unwrap());
                let mut s = BitStream::decoder(&data);
                let mut out = i32::MIN;
                s.stream_plus_one(&mut out, n).unwrap();
                assert_eq!(out, v, "n={n}");
            }
        }
    }

    #[test]
    fn plus_one_rejects_unrepresentable() {
        let mut s = BitStream::encoder();
        let err = s.stream_plus_one(&mut 31i8, 5).unwrap_err();
        assert_eq!(err, Error::ValueOutOfRange { field: "".into(), value: 31, bits: 5 });
        let err = s.stream_plus_one(&mut -2i8, 5).unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange { value: -2, .. }));
    }

    #[test]
    fn plus_one_decode_out_of_type_range() {
        // 8 Bits = 255 → 254 passt nicht in i8
        let mut s = BitStream::decoder(&[0xFF]);
        let mut v = 0i8;
        let err = s.stream_plus_one(&mut v, 8).unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange { value: 254, .. }));
    }

    #[test]
    fn stream_bytes_truncated() {
        let mut s = BitStream::decoder(&[1, 2]);
        let mut buf = Vec::new();
        let err = s.stream_bytes(&mut buf, 3).unwrap_err();
        assert_eq!(err, Error::truncated(0, 24));
        s.stream_bytes(&mut buf, 2).unwrap();
        assert_eq!(buf, vec![1, 2]);
    }

    #[test]
    fn array_round_trip() {
        let data = encode_with(|s| s.stream_array(&mut [1i32, -2, 3]).unwrap());
        assert_eq!(data.len(), 12);
        let mut s = BitStream::decoder(&data);
        let mut out = [0i32; 3];
        s.stream_array(&mut out).unwrap();
        assert_eq!(out, [1, -2, 3]);
    }
}
