//! A blocking, line-based TCP client.
//!
//! Used by the terminal client and as a testing utility.

use anyhow::{Error, bail};
use std::{
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpStream},
    thread,
    time::Duration,
};

/// Default timeout for reading from the server.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for writing to the server.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct Client {
    reader: BufReader<TcpStream>,
    pub stream: TcpStream,
}

impl Client {
    /// Connect to a blackjack server, retrying a few times with shrinking
    /// timeouts (1s, 500ms, 100ms).
    pub fn connect(addr: &SocketAddr) -> Result<Self, Error> {
        let mut connect_timeouts = vec![
            Duration::from_millis(100),
            Duration::from_millis(500),
            Duration::from_secs(1),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(READ_TIMEOUT))?;
                    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
                    let reader = BufReader::new(stream.try_clone()?);
                    return Ok(Self { reader, stream });
                }
                _ => thread::sleep(connect_timeout),
            }
        }
        bail!("couldn't connect to {addr}")
    }

    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), Error> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    pub fn send_line(&mut self, line: &str) -> Result<(), Error> {
        self.stream.write_all(format!("{line}\n").as_bytes())?;
        Ok(())
    }

    /// Next line from the server, or `None` once the server hangs up.
    pub fn recv_line(&mut self) -> Result<Option<String>, Error> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }

    /// Read lines until one contains `needle`, returning everything read.
    pub fn recv_until(&mut self, needle: &str) -> Result<Vec<String>, Error> {
        let mut lines = Vec::new();
        loop {
            match self.recv_line()? {
                Some(line) => {
                    let found = line.contains(needle);
                    lines.push(line);
                    if found {
                        return Ok(lines);
                    }
                }
                None => bail!("server hung up before sending {needle:?}"),
            }
        }
    }
}
