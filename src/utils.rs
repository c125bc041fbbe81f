use std::{io::Read, net::TcpStream};

use crate::errors::Result;

use std::net::SocketAddr;

pub trait StreamHandler {
    fn read_stream(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn peer_addr(&self) -> Result<SocketAddr>;
}

impl StreamHandler for TcpStream {
    fn read_stream(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.read(buf)?)
    }
    fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.peer_addr()?)
    }
}

pub mod chunk_handling {
    use super::*;
    use crate::errors::Error;

    /// One blocking read of up to `buf.len()` bytes.
    ///
    /// A zero-byte read means the peer closed the stream and is surfaced as
    /// `Error::StreamClosed` so the caller can leave its read loop.
    pub fn receive_chunk<T: StreamHandler>(stream: &mut T, buf: &mut [u8]) -> Result<usize> {
        let bytes_read = stream.read_stream(buf)?;

        if bytes_read == 0 {
            return Err(Error::StreamClosed);
        }

        let source = stream.peer_addr()?;

        log::debug!("Read {bytes_read} bytes from addr: {source}");

        Ok(bytes_read)
    }
}
