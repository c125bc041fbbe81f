use std::io::{self, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::decode::Reassembler;
use crate::errors::{Error, Result};
use crate::utils::chunk_handling::receive_chunk;
use crate::{ConnectionState, Endpoint, READ_BUF_SIZE};

const READ_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub struct StreamClient {
    pub endpoint: Endpoint,
    stream: TcpStream,
    status: ConnectionState,
}

impl StreamClient {
    /// Opens the one outbound connection this client will ever hold.
    pub fn connect(endpoint: Endpoint) -> Result<Self> {
        let addr = endpoint.to_string();

        let stream =
            TcpStream::connect(&addr).map_err(|e| Error::Connection(addr.clone(), e))?;

        stream
            .set_read_timeout(Some(READ_TIMEOUT))
            .map_err(Error::IO)?;

        log::info!("Connected to server at {endpoint}");

        Ok(StreamClient {
            endpoint,
            stream,
            status: ConnectionState::Connected,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.status
    }

    /// Reads until the peer closes the stream, printing each decoded chunk
    /// to stdout.
    pub fn run(&mut self) -> Result<()> {
        self.run_with(&mut io::stdout())
    }

    /// Same as [`run`](Self::run) but with an explicit output sink.
    pub fn run_with<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        let mut buf = [0u8; READ_BUF_SIZE];
        let mut reassembler = Reassembler::new();

        //Main client loop
        loop {
            log::debug!("Status: {:?}", self.status);

            match self.status {
                ConnectionState::Disconnected => {
                    return Err("client was never connected".into());
                }
                ConnectionState::Connected => {
                    let bytes_read = match receive_chunk(&mut self.stream, &mut buf) {
                        Ok(n) => n,
                        Err(Error::StreamClosed) => {
                            log::info!("Server {} closed the stream", self.endpoint);
                            if reassembler.finish().is_err() {
                                log::warn!(
                                    "Stream closed mid-character, dropping trailing bytes"
                                );
                            }
                            self.status = ConnectionState::Closed;
                            continue;
                        }
                        Err(Error::IO(e)) if is_read_timeout(&e) => {
                            // Nothing arrived within READ_TIMEOUT, keep waiting
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    match reassembler.push(&buf[..bytes_read]) {
                        Ok(chunk) if !chunk.is_empty() => consume(sink, &chunk),
                        Ok(_) => {}
                        Err(e) => log::warn!("Skipping malformed chunk: {e}"),
                    }
                }
                ConnectionState::Closed => {
                    return Ok(());
                }
            }
        }
    }
}

/// Writes one decoded chunk to the sink. Sink failures are not surfaced.
fn consume<W: Write>(sink: &mut W, chunk: &str) {
    let _ = writeln!(sink, "{chunk}");
}

fn is_read_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    fn local_listener() -> (TcpListener, Endpoint) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, Endpoint::new("127.0.0.1", port).unwrap())
    }

    #[test]
    fn connect_succeeds_against_live_listener() {
        let (listener, endpoint) = local_listener();

        let client = StreamClient::connect(endpoint).unwrap();
        assert_eq!(client.state(), ConnectionState::Connected);

        drop(listener);
    }

    #[test]
    fn connect_fails_when_nobody_listens() {
        let (listener, endpoint) = local_listener();
        drop(listener);

        let err = StreamClient::connect(endpoint).unwrap_err();
        assert!(matches!(err, Error::Connection(_, _)));
    }

    #[test]
    fn single_write_emits_single_chunk() {
        let (listener, endpoint) = local_listener();

        let feed = thread::spawn(move || {
            let (mut peer, _) = listener.accept().unwrap();
            peer.write_all(b"Tracker Pos: 1.0, 2.0, 3.0").unwrap();
        });

        let mut client = StreamClient::connect(endpoint).unwrap();
        let mut sink = Vec::new();
        client.run_with(&mut sink).unwrap();

        feed.join().unwrap();

        // One chunk, one line in the sink
        assert_eq!(sink, b"Tracker Pos: 1.0, 2.0, 3.0\n");
        assert_eq!(client.state(), ConnectionState::Closed);
    }

    #[test]
    fn code_point_split_across_writes_survives() {
        let (listener, endpoint) = local_listener();

        let feed = thread::spawn(move || {
            let (mut peer, _) = listener.accept().unwrap();
            // 'é' is 0xC3 0xA9, send it half per write
            peer.write_all(b"caf\xC3").unwrap();
            peer.flush().unwrap();
            thread::sleep(Duration::from_millis(50));
            peer.write_all(b"\xA9").unwrap();
        });

        let mut client = StreamClient::connect(endpoint).unwrap();
        let mut sink = Vec::new();
        client.run_with(&mut sink).unwrap();

        feed.join().unwrap();

        let printed = String::from_utf8(sink).unwrap();
        assert_eq!(printed.replace('\n', ""), "caf\u{e9}");
        assert!(!printed.contains('\u{fffd}'));
    }

    #[test]
    fn invalid_bytes_are_skipped_not_fatal() {
        let (listener, endpoint) = local_listener();

        let feed = thread::spawn(move || {
            let (mut peer, _) = listener.accept().unwrap();
            peer.write_all(b"\xFF\xFE").unwrap();
            peer.flush().unwrap();
            thread::sleep(Duration::from_millis(50));
            peer.write_all(b"still alive").unwrap();
        });

        let mut client = StreamClient::connect(endpoint).unwrap();
        let mut sink = Vec::new();
        client.run_with(&mut sink).unwrap();

        feed.join().unwrap();

        assert_eq!(sink, b"still alive\n");
    }

    #[test]
    fn peer_close_terminates_the_loop() {
        let (listener, endpoint) = local_listener();

        let feed = thread::spawn(move || {
            let (peer, _) = listener.accept().unwrap();
            drop(peer);
        });

        let mut client = StreamClient::connect(endpoint).unwrap();
        let mut sink = Vec::new();
        client.run_with(&mut sink).unwrap();

        feed.join().unwrap();

        assert_eq!(client.state(), ConnectionState::Closed);
        // Empty reads never reach the sink
        assert!(sink.is_empty());
    }
}
