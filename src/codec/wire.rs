//! Little-endian primitive writer/reader and the [`Wire`] trait every encoded type implements.
//!
//! Layout rules: fixed-width LE integers and floats, `u32` length prefixes for strings,
//! sequences and nested messages, one tag byte for options, bools and enum discriminants.

use std::sync::Arc;

use crate::foundation::core::{Affine, Color, Point, Size, Vec2};
use crate::foundation::error::FormatError;

/// Append-only byte writer.
#[derive(Debug, Default)]
pub(crate) struct WireWriter {
    buf: Vec<u8>,
    oversized: Option<usize>,
}

impl WireWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Raw bytes, even if a length overflowed. Only for fingerprints.
    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// The written bytes, or the first length that did not fit its `u32` prefix.
    pub(crate) fn finish(self) -> Result<Vec<u8>, FormatError> {
        match self.oversized {
            Some(len) => Err(FormatError::LengthOverflow { len }),
            None => Ok(self.buf),
        }
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn write_len(&mut self, len: usize) {
        match u32::try_from(len) {
            Ok(v) => self.write_u32(v),
            Err(_) => {
                self.oversized.get_or_insert(len);
                self.write_u32(u32::MAX);
            }
        }
    }

    /// Write `f`'s output as a length-prefixed nested message.
    pub(crate) fn message(&mut self, f: impl FnOnce(&mut WireWriter)) {
        let mut inner = WireWriter::new();
        f(&mut inner);
        if let Some(len) = inner.oversized {
            self.oversized.get_or_insert(len);
        }
        self.write_len(inner.buf.len());
        self.buf.extend_from_slice(&inner.buf);
    }

    pub(crate) fn put<T: Wire>(&mut self, v: &T) {
        v.write(self);
    }
}

/// Position-tracking reader over a borrowed byte slice.
#[derive(Debug)]
pub(crate) struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], FormatError> {
        if self.remaining() < n {
            return Err(FormatError::Truncated {
                context,
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, context)?);
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self, context: &'static str) -> Result<u8, FormatError> {
        Ok(self.take_array::<1>(context)?[0])
    }

    pub(crate) fn read_u32(&mut self, context: &'static str) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.take_array(context)?))
    }

    pub(crate) fn read_u64(&mut self, context: &'static str) -> Result<u64, FormatError> {
        Ok(u64::from_le_bytes(self.take_array(context)?))
    }

    pub(crate) fn read_len(&mut self, context: &'static str) -> Result<usize, FormatError> {
        Ok(self.read_u32(context)? as usize)
    }

    /// Read a length-prefixed nested message; `f` must consume exactly the declared length.
    pub(crate) fn message<T>(
        &mut self,
        context: &'static str,
        f: impl FnOnce(&mut WireReader<'a>) -> Result<T, FormatError>,
    ) -> Result<T, FormatError> {
        let declared = self.read_len(context)?;
        let body = self.take(declared, context)?;
        let mut inner = WireReader::new(body);
        let out = f(&mut inner)?;
        if inner.pos != declared {
            return Err(FormatError::LengthMismatch {
                context,
                declared,
                consumed: inner.pos,
            });
        }
        Ok(out)
    }

    pub(crate) fn get<T: Wire>(&mut self) -> Result<T, FormatError> {
        T::read(self)
    }
}

/// A value with a fixed binary encoding.
pub(crate) trait Wire: Sized {
    fn write(&self, w: &mut WireWriter);
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError>;
}

impl Wire for u8 {
    fn write(&self, w: &mut WireWriter) {
        w.write_u8(*self);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        r.read_u8("u8")
    }
}

impl Wire for u32 {
    fn write(&self, w: &mut WireWriter) {
        w.write_u32(*self);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        r.read_u32("u32")
    }
}

impl Wire for i32 {
    fn write(&self, w: &mut WireWriter) {
        w.write_raw(&self.to_le_bytes());
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(i32::from_le_bytes(r.take_array("i32")?))
    }
}

impl Wire for f32 {
    fn write(&self, w: &mut WireWriter) {
        w.write_u32(self.to_bits());
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(f32::from_bits(r.read_u32("f32")?))
    }
}

impl Wire for f64 {
    fn write(&self, w: &mut WireWriter) {
        w.write_u64(self.to_bits());
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(f64::from_bits(r.read_u64("f64")?))
    }
}

impl Wire for bool {
    fn write(&self, w: &mut WireWriter) {
        w.write_u8(u8::from(*self));
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("bool")? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(FormatError::UnknownTag {
                context: "bool",
                tag,
            }),
        }
    }
}

impl Wire for String {
    fn write(&self, w: &mut WireWriter) {
        w.write_len(self.len());
        w.write_raw(self.as_bytes());
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        let len = r.read_len("string length")?;
        let bytes = r.take(len, "string")?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8 { context: "string" })
    }
}

impl<T: Wire> Wire for Option<T> {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Some(v) => {
                w.write_u8(1);
                v.write(w);
            }
            None => w.write_u8(0),
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("option")? {
            0 => Ok(None),
            1 => Ok(Some(T::read(r)?)),
            tag => Err(FormatError::UnknownTag {
                context: "option",
                tag,
            }),
        }
    }
}

impl<T: Wire> Wire for Vec<T> {
    fn write(&self, w: &mut WireWriter) {
        w.write_len(self.len());
        for v in self {
            v.write(w);
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        let count = r.read_len("sequence length")?;
        // Every element takes at least one byte, so cap the reservation by what is left.
        let mut out = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            out.push(T::read(r)?);
        }
        Ok(out)
    }
}

impl<T: Wire> Wire for Arc<T> {
    fn write(&self, w: &mut WireWriter) {
        (**self).write(w);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(Arc::new(T::read(r)?))
    }
}

impl Wire for [f32; 4] {
    fn write(&self, w: &mut WireWriter) {
        for v in self {
            v.write(w);
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok([r.get()?, r.get()?, r.get()?, r.get()?])
    }
}

impl Wire for Color {
    fn write(&self, w: &mut WireWriter) {
        w.write_raw(&[self.r, self.g, self.b, self.a]);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        let [r_, g, b, a] = r.take_array::<4>("color")?;
        Ok(Color::rgba(r_, g, b, a))
    }
}

impl Wire for Point {
    fn write(&self, w: &mut WireWriter) {
        w.put(&self.x);
        w.put(&self.y);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(Point::new(r.get()?, r.get()?))
    }
}

impl Wire for Vec2 {
    fn write(&self, w: &mut WireWriter) {
        w.put(&self.x);
        w.put(&self.y);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(Vec2::new(r.get()?, r.get()?))
    }
}

impl Wire for Size {
    fn write(&self, w: &mut WireWriter) {
        w.put(&self.width);
        w.put(&self.height);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(Size::new(r.get()?, r.get()?))
    }
}

impl Wire for Affine {
    fn write(&self, w: &mut WireWriter) {
        for c in self.as_coeffs() {
            w.put(&c);
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        let mut coeffs = [0.0f64; 6];
        for c in &mut coeffs {
            *c = r.get()?;
        }
        Ok(Affine::new(coeffs))
    }
}

/// Implements [`Wire`] for a fieldless enum as one tag byte.
macro_rules! wire_unit_enum {
    ($ty:ident, $context:literal { $($tag:literal => $variant:ident),* $(,)? }) => {
        impl $crate::codec::wire::Wire for $ty {
            fn write(&self, w: &mut $crate::codec::wire::WireWriter) {
                w.write_u8(match self {
                    $($ty::$variant => $tag,)*
                });
            }
            fn read(
                r: &mut $crate::codec::wire::WireReader<'_>,
            ) -> Result<Self, $crate::foundation::error::FormatError> {
                match r.read_u8($context)? {
                    $($tag => Ok($ty::$variant),)*
                    tag => Err($crate::foundation::error::FormatError::UnknownTag {
                        context: $context,
                        tag,
                    }),
                }
            }
        }
    };
}

/// Implements [`Wire`] for a struct by writing its fields in declaration order.
macro_rules! wire_struct {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::codec::wire::Wire for $ty {
            fn write(&self, w: &mut $crate::codec::wire::WireWriter) {
                $(w.put(&self.$field);)*
            }
            fn read(
                r: &mut $crate::codec::wire::WireReader<'_>,
            ) -> Result<Self, $crate::foundation::error::FormatError> {
                Ok($ty {
                    $($field: r.get()?,)*
                })
            }
        }
    };
}

pub(crate) use {wire_struct, wire_unit_enum};

#[cfg(test)]
#[path = "../../tests/unit/codec/wire.rs"]
mod tests;
