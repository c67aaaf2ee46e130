use bytes::{BufMut, BytesMut};

use pathfs_core::Error;

/// Destination for encoded bytes.
pub trait ByteSink {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

impl ByteSink for Vec<u8> {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl ByteSink for BytesMut {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.put_slice(bytes);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        (**self).append_bytes(bytes)
    }
}
