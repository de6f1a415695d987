use std::borrow::Cow;

use crate::error::WireError;

/// A Kiwi byte buffer meant for reading.
///
/// ```
/// use std::borrow::Cow;
/// let mut bb = brine_equal_schema::ByteBuffer::new(&[240, 159, 141, 149, 0, 133, 242, 210, 237]);
/// assert_eq!(bb.read_string(), Ok(Cow::Borrowed("🍕")));
/// assert_eq!(bb.read_var_float(), Ok(123.456));
/// ```
pub struct ByteBuffer<'a> {
    data:  &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Wraps `data` for reading from the start.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0 }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Current read position. Equals `self.data().len()` once everything
    /// has been consumed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index >= self.data.len()
    }

    fn eof(&self) -> WireError {
        WireError::UnexpectedEof { index: self.index }
    }

    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WireError::InvalidBool(other)),
        }
    }

    pub fn read_byte(&mut self) -> Result<u8, WireError> {
        let value = *self.data.get(self.index).ok_or_else(|| self.eof())?;
        self.index += 1;
        Ok(value)
    }

    /// Reads exactly `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let end = self.index.checked_add(len).ok_or_else(|| self.eof())?;
        let value = self.data.get(self.index..end).ok_or_else(|| self.eof())?;
        self.index = end;
        Ok(value)
    }

    /// Reads a length-prefixed byte sequence (the `bytes` type).
    pub fn read_byte_array(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_var_uint()? as usize;
        self.read_bytes(len)
    }

    pub fn read_var_int(&mut self) -> Result<i32, WireError> {
        let value = self.read_var_uint()?;
        Ok((if (value & 1) != 0 { !(value >> 1) } else { value >> 1 }) as i32)
    }

    pub fn read_var_uint(&mut self) -> Result<u32, WireError> {
        let mut shift: u8 = 0;
        let mut result: u32 = 0;

        loop {
            let byte = self.read_byte()?;
            result |= ((byte & 127) as u32) << shift;
            shift += 7;

            if (byte & 128) == 0 || shift >= 35 {
                break;
            }
        }

        Ok(result)
    }

    /// Zero and denormals are stored as a single zero byte; everything else
    /// takes four bytes with the exponent rotated to the front.
    pub fn read_var_float(&mut self) -> Result<f32, WireError> {
        let first = self.read_byte()?;
        if first == 0 {
            return Ok(0.0);
        }

        let rest = self.read_bytes(3)?;
        let mut bits: u32 = first as u32
            | ((rest[0] as u32) << 8)
            | ((rest[1] as u32) << 16)
            | ((rest[2] as u32) << 24);
        bits = (bits << 23) | (bits >> 9);

        Ok(f32::from_bits(bits))
    }

    /// Reads a zero-terminated UTF-8 string, borrowing from the buffer when
    /// the bytes are valid UTF-8.
    pub fn read_string(&mut self) -> Result<Cow<'a, str>, WireError> {
        let start = self.index;
        let len = self.data[start.min(self.data.len())..]
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(WireError::UnexpectedEof { index: self.data.len() })?;
        self.index = start + len + 1;
        Ok(String::from_utf8_lossy(&self.data[start..start + len]))
    }

    pub fn read_var_int64(&mut self) -> Result<i64, WireError> {
        let value = self.read_var_uint64()?;
        Ok((if (value & 1) != 0 { !(value >> 1) } else { value >> 1 }) as i64)
    }

    pub fn read_var_uint64(&mut self) -> Result<u64, WireError> {
        let mut shift: u8 = 0;
        let mut result: u64 = 0;

        loop {
            let byte = self.read_byte()?;
            if (byte & 128) == 0 || shift >= 56 {
                result |= (byte as u64) << shift;
                break;
            }
            result |= ((byte & 127) as u64) << shift;
            shift += 7;
        }

        Ok(result)
    }
}

/// A Kiwi byte buffer meant for writing.
///
/// ```
/// let mut bb = brine_equal_schema::ByteBufferMut::new();
/// bb.write_string("🍕");
/// bb.write_var_float(123.456);
/// assert_eq!(bb.data(), [240, 159, 141, 149, 0, 133, 242, 210, 237]);
/// ```
#[derive(Debug, Default)]
pub struct ByteBufferMut {
    data: Vec<u8>,
}

impl ByteBufferMut {
    pub fn new() -> ByteBufferMut {
        ByteBufferMut { data: vec![] }
    }

    /// Consumes the buffer and returns everything written so far.
    pub fn data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.data.push(u8::from(value));
    }

    pub fn write_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    /// Appends raw bytes without a length prefix.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
    }

    /// Appends a length-prefixed byte sequence (the `bytes` type).
    pub fn write_byte_array(&mut self, value: &[u8]) {
        self.write_var_uint(value.len() as u32);
        self.write_bytes(value);
    }

    pub fn write_var_int(&mut self, value: i32) {
        self.write_var_uint(((value << 1) ^ (value >> 31)) as u32);
    }

    pub fn write_var_uint(&mut self, mut value: u32) {
        loop {
            let byte = value as u8 & 127;
            value >>= 7;

            if value == 0 {
                self.write_byte(byte);
                return;
            }

            self.write_byte(byte | 128);
        }
    }

    pub fn write_var_float(&mut self, value: f32) {
        let mut bits = value.to_bits();

        // exponent first
        bits = (bits >> 23) | (bits << 9);

        if (bits & 255) == 0 {
            self.data.push(0);
            return;
        }

        self.data.extend_from_slice(&bits.to_le_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
    }

    pub fn write_var_int64(&mut self, value: i64) {
        self.write_var_uint64(((value << 1) ^ (value >> 63)) as u64);
    }

    pub fn write_var_uint64(&mut self, mut value: u64) {
        let mut i = 0;
        while value > 127 && i < 8 {
            self.write_byte((value as u8 & 127) | 128);
            value >>= 7;
            i += 1;
        }
        self.write_byte(value as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_once(cb: impl FnOnce(&mut ByteBufferMut)) -> Vec<u8> {
        let mut bb = ByteBufferMut::new();
        cb(&mut bb);
        bb.data()
    }

    #[test]
    fn read_bool_rejects_other_bytes() {
        let read = |bytes: &[u8]| ByteBuffer::new(bytes).read_bool();
        assert_eq!(read(&[]), Err(WireError::UnexpectedEof { index: 0 }));
        assert_eq!(read(&[0]), Ok(false));
        assert_eq!(read(&[1]), Ok(true));
        assert_eq!(read(&[2]), Err(WireError::InvalidBool(2)));
    }

    #[test]
    fn read_bytes_checks_bounds() {
        let mut bb = ByteBuffer::new(&[1, 2, 3]);
        assert_eq!(bb.read_bytes(2), Ok(&[1u8, 2][..]));
        assert_eq!(bb.read_bytes(2), Err(WireError::UnexpectedEof { index: 2 }));
        assert_eq!(bb.index(), 2);
    }

    #[test]
    fn var_uint_encoding() {
        assert_eq!(write_once(|bb| bb.write_var_uint(0)), [0]);
        assert_eq!(write_once(|bb| bb.write_var_uint(127)), [127]);
        assert_eq!(write_once(|bb| bb.write_var_uint(128)), [128, 1]);
        assert_eq!(write_once(|bb| bb.write_var_uint(300)), [172, 2]);

        assert_eq!(ByteBuffer::new(&[172, 2]).read_var_uint(), Ok(300));
        assert_eq!(
            ByteBuffer::new(&[128]).read_var_uint(),
            Err(WireError::UnexpectedEof { index: 1 })
        );
    }

    #[test]
    fn var_int_is_zigzag() {
        assert_eq!(write_once(|bb| bb.write_var_int(0)), [0]);
        assert_eq!(write_once(|bb| bb.write_var_int(-1)), [1]);
        assert_eq!(write_once(|bb| bb.write_var_int(1)), [2]);
        assert_eq!(write_once(|bb| bb.write_var_int(-2)), [3]);

        assert_eq!(ByteBuffer::new(&[3]).read_var_int(), Ok(-2));
        assert_eq!(ByteBuffer::new(&[2]).read_var_int(), Ok(1));
    }

    #[test]
    fn var_float_matches_reference_bytes() {
        assert_eq!(write_once(|bb| bb.write_var_float(0.0)), [0]);
        assert_eq!(write_once(|bb| bb.write_var_float(0.5)), [126, 0, 0, 0]);
        assert_eq!(write_once(|bb| bb.write_var_float(-0.5)), [126, 1, 0, 0]);
        assert_eq!(ByteBuffer::new(&[126, 1, 0, 0]).read_var_float(), Ok(-0.5));
        assert_eq!(
            ByteBuffer::new(&[126, 1]).read_var_float(),
            Err(WireError::UnexpectedEof { index: 1 })
        );
    }

    #[test]
    fn string_requires_terminator() {
        assert_eq!(write_once(|bb| bb.write_string("abc")), [97, 98, 99, 0]);
        assert_eq!(
            ByteBuffer::new(&[97, 98]).read_string(),
            Err(WireError::UnexpectedEof { index: 2 })
        );
    }

    #[test]
    fn byte_array_is_length_prefixed() {
        let data = write_once(|bb| bb.write_byte_array(&[9, 8, 7]));
        assert_eq!(data, [3, 9, 8, 7]);

        let mut bb = ByteBuffer::new(&data);
        assert_eq!(bb.read_byte_array(), Ok(&[9u8, 8, 7][..]));
        assert!(bb.is_empty());
    }

    #[test]
    fn var_uint64_round_trips_extremes() {
        for value in [0u64, 1, 127, 128, u32::MAX as u64, u64::MAX] {
            let data = write_once(|bb| bb.write_var_uint64(value));
            assert_eq!(ByteBuffer::new(&data).read_var_uint64(), Ok(value));
        }
        for value in [0i64, -1, 1, i64::MIN, i64::MAX] {
            let data = write_once(|bb| bb.write_var_int64(value));
            assert_eq!(ByteBuffer::new(&data).read_var_int64(), Ok(value));
        }
    }

    #[test]
    fn sequence_reads_back_in_order() {
        let data = write_once(|bb| {
            bb.write_var_float(0.0);
            bb.write_var_float(123.456);
            bb.write_string("🍕");
            bb.write_var_uint(123456789);
        });

        let mut bb = ByteBuffer::new(&data);
        assert_eq!(bb.read_var_float(), Ok(0.0));
        assert_eq!(bb.read_var_float(), Ok(123.456));
        assert_eq!(bb.read_string(), Ok(Cow::Borrowed("🍕")));
        assert_eq!(bb.read_var_uint(), Ok(123456789));
        assert!(bb.is_empty());
    }
}
