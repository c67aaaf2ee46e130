//! Buffered character encoder.

use std::fmt;

use bytes::BytesMut;

use pathfs_core::{Error, Resource, CHARSET};

use crate::{ByteSink, Charset};

/// Capacity of the internal byte buffer.
pub const BUFFER_SIZE: usize = 512;

/// Encodes characters into a [`ByteSink`].
///
/// Each append call encodes into a bounded buffer, flushing it into the sink
/// whenever the next character would not fit and once more at the end of
/// the call. The buffer is therefore empty between calls and the sink never
/// receives more than [`BUFFER_SIZE`] bytes at once.
///
/// Characters the charset cannot represent are skipped.
#[derive(Debug)]
pub struct EncodingStream<S> {
    sink: S,
    charset: Charset,
    buffer: Vec<u8>,
}

impl<S: ByteSink> EncodingStream<S> {
    pub fn new(sink: S, charset: Charset) -> Self {
        Self {
            sink,
            charset,
            buffer: Vec::with_capacity(BUFFER_SIZE),
        }
    }

    /// A stream for the charset called `name`.
    pub fn for_charset(sink: S, name: &str) -> Result<Self, Error> {
        Ok(Self::new(sink, name.parse()?))
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn append_char(&mut self, c: char) -> Result<(), Error> {
        self.encode(std::iter::once(c))
    }

    pub fn append_str(&mut self, s: &str) -> Result<(), Error> {
        self.encode(s.chars())
    }

    /// Append UTF-16 code units.
    ///
    /// Lone surrogates inside `units` are dropped. A high surrogate in the
    /// last position would need the next call's first unit to complete it;
    /// everything before it is still written, then the call fails with
    /// [`Error::Unsupported`].
    pub fn append_utf16(&mut self, units: &[u16]) -> Result<(), Error> {
        let (units, split) = match units.split_last() {
            Some((last, rest)) if is_high_surrogate(*last) => (rest, true),
            _ => (units, false),
        };
        self.encode(char::decode_utf16(units.iter().copied()).filter_map(Result::ok))?;
        if split {
            return Err(Error::unsupported(
                "character split across appends: trailing high surrogate",
            ));
        }
        Ok(())
    }

    /// Pass raw bytes through to the sink.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.flush()?;
        self.sink.append_bytes(bytes)
    }

    fn encode<I: IntoIterator<Item = char>>(&mut self, chars: I) -> Result<(), Error> {
        let mut scratch = [0u8; Charset::MAX_CHAR_LEN];
        for c in chars {
            let Some(len) = self.charset.encode(c, &mut scratch) else {
                log::trace!("Skipping {:?}: not representable in {}", c, self.charset);
                continue;
            };
            if self.buffer.len() + len > BUFFER_SIZE {
                self.flush()?;
            }
            self.buffer.extend_from_slice(&scratch[..len]);
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let result = self.sink.append_bytes(&self.buffer);
        self.buffer.clear();
        result
    }
}

impl EncodingStream<BytesMut> {
    /// The encoded bytes as a resource tagged with this stream's charset.
    pub fn into_resource(self) -> Resource {
        let charset = self.charset.name();
        Resource::new(self.sink.freeze()).with_metadata(CHARSET, charset)
    }
}

impl<S: ByteSink> fmt::Write for EncodingStream<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s).map_err(|_| fmt::Error)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.append_char(c).map_err(|_| fmt::Error)
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    /// Records every chunk it receives.
    #[derive(Default)]
    struct Chunks(Vec<Vec<u8>>);

    impl ByteSink for Chunks {
        fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
            self.0.push(bytes.to_vec());
            Ok(())
        }
    }

    struct Failing;

    impl ByteSink for Failing {
        fn append_bytes(&mut self, _bytes: &[u8]) -> Result<(), Error> {
            Err(Error::unsupported("sink closed"))
        }
    }

    #[test]
    fn encodes_utf8_text() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf8);
        stream.append_str("héllo ").unwrap();
        stream.append_char('😀').unwrap();
        assert_eq!(stream.into_inner(), "héllo 😀".as_bytes());
    }

    #[test]
    fn flushes_in_bounded_chunks() {
        let text = "x".repeat(BUFFER_SIZE * 2 + 10);
        let mut stream = EncodingStream::new(Chunks::default(), Charset::Ascii);
        stream.append_str(&text).unwrap();

        let chunks = stream.into_inner().0;
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![BUFFER_SIZE, BUFFER_SIZE, 10]);
    }

    #[test]
    fn multibyte_characters_never_straddle_a_flush() {
        // 3-byte characters: 170 fit in the buffer, the 171st forces a flush.
        let text = "€".repeat(171);
        let mut stream = EncodingStream::new(Chunks::default(), Charset::Utf8);
        stream.append_str(&text).unwrap();

        let chunks = stream.into_inner().0;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 510);
        assert_eq!(chunks[1].len(), 3);
        assert_eq!(chunks.concat(), text.as_bytes());
    }

    #[test]
    fn each_call_flushes() {
        let mut stream = EncodingStream::new(Chunks::default(), Charset::Utf8);
        stream.append_str("ab").unwrap();
        stream.append_str("").unwrap();
        stream.append_char('c').unwrap();
        assert_eq!(stream.sink().0, vec![b"ab".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn skips_unmappable_characters() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Latin1);
        stream.append_str("café €5").unwrap();
        assert_eq!(stream.into_inner(), b"caf\xe9 5");
    }

    #[test]
    fn utf16_pairs_decode() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf8);
        stream.append_utf16(&[0x0061, 0xD83D, 0xDE00]).unwrap();
        assert_eq!(stream.into_inner(), "a😀".as_bytes());
    }

    #[test]
    fn utf16_lone_low_surrogate_is_ignored() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf8);
        stream.append_utf16(&[0x0061, 0xDE00, 0x0062]).unwrap();
        assert_eq!(stream.into_inner(), b"ab");
    }

    #[test]
    fn utf16_split_pair_fails_after_writing_prefix() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf8);
        let err = stream.append_utf16(&[0x0061, 0xD83D]).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
        assert_eq!(stream.into_inner(), b"a");
    }

    #[test]
    fn utf16_output_charset() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf16Le);
        stream.append_str("hi").unwrap();
        assert_eq!(stream.into_inner(), vec![b'h', 0, b'i', 0]);
    }

    #[test]
    fn raw_bytes_pass_through() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf8);
        stream.append_str("a").unwrap();
        stream.append_bytes(&[0xff]).unwrap();
        stream.append_str("b").unwrap();
        assert_eq!(stream.into_inner(), vec![b'a', 0xff, b'b']);
    }

    #[test]
    fn formats_through_fmt_write() {
        let mut stream = EncodingStream::new(Vec::new(), Charset::Utf8);
        write!(stream, "{}-{:03}", "id", 7).unwrap();
        assert_eq!(stream.into_inner(), b"id-007");
    }

    #[test]
    fn sink_errors_propagate() {
        let mut stream = EncodingStream::new(Failing, Charset::Utf8);
        assert!(stream.append_str("x").is_err());
        assert!(write!(stream, "x").is_err());
        // Nothing buffered means nothing to flush.
        assert!(stream.append_str("").is_ok());
    }

    #[test]
    fn unknown_charset_name() {
        let err = EncodingStream::for_charset(Vec::new(), "klingon").unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn builds_resource_with_charset() {
        let mut stream = EncodingStream::for_charset(BytesMut::new(), "latin1").unwrap();
        stream.append_str("é").unwrap();
        let resource = stream.into_resource();
        assert_eq!(&resource.content[..], &[0xe9]);
        assert_eq!(resource.charset(), Some("ISO-8859-1"));
    }
}
