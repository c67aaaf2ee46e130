//! The character sets an encoding stream can produce.

use std::fmt;
use std::str::FromStr;

use pathfs_core::Error;

/// A supported character set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Utf16Be,
    Utf16Le,
    Latin1,
    Ascii,
}

impl Charset {
    /// Longest encoding of a single character, in bytes.
    pub const MAX_CHAR_LEN: usize = 4;

    /// Canonical name, as used in resource metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "US-ASCII",
        }
    }

    /// Encode `c` into `out`, returning the number of bytes written.
    ///
    /// `None` when `c` cannot be represented in this charset.
    pub fn encode(&self, c: char, out: &mut [u8; Self::MAX_CHAR_LEN]) -> Option<usize> {
        match self {
            Charset::Utf8 => Some(c.encode_utf8(out).len()),
            Charset::Utf16Be | Charset::Utf16Le => {
                let mut units = [0u16; 2];
                let units = c.encode_utf16(&mut units);
                for (i, unit) in units.iter().enumerate() {
                    let bytes = if *self == Charset::Utf16Be {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    out[i * 2..i * 2 + 2].copy_from_slice(&bytes);
                }
                Some(units.len() * 2)
            }
            Charset::Latin1 => u8::try_from(u32::from(c)).ok().map(|b| {
                out[0] = b;
                1
            }),
            Charset::Ascii => c.is_ascii().then(|| {
                out[0] = c as u8;
                1
            }),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            "UTF-16BE" | "UTF16BE" => Ok(Charset::Utf16Be),
            "UTF-16LE" | "UTF16LE" => Ok(Charset::Utf16Le),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Ok(Charset::Latin1),
            "US-ASCII" | "ASCII" => Ok(Charset::Ascii),
            _ => Err(Error::unsupported(format!("unknown charset '{}'", s))),
        }
    }
}
