//! Character-to-byte encoding for building resource content.
//!
//! An [`EncodingStream`] turns text (as `&str`, single `char`s, or raw UTF-16
//! code units) into bytes in a chosen [`Charset`] and hands them to a
//! [`ByteSink`] in bounded chunks.
//!
//! ```
//! use std::fmt::Write;
//!
//! use bytes::BytesMut;
//! use pathfs_stream::{Charset, EncodingStream};
//!
//! let mut stream = EncodingStream::new(BytesMut::new(), Charset::Utf8);
//! write!(stream, "{} items", 3).unwrap();
//! let resource = stream.into_resource();
//! assert_eq!(resource.text(), Some("3 items"));
//! ```

mod charset;
mod sink;
mod stream;

pub use charset::Charset;
pub use sink::ByteSink;
pub use stream::{EncodingStream, BUFFER_SIZE};
