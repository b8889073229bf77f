//! Scripted transport for driver tests

use std::collections::VecDeque;
use std::time::Duration;

use embedded_io::{ErrorKind, ErrorType, Write};
use lcdm_hal::SerialTransport;
use lcdm_protocol::frame::encode_response;
use lcdm_protocol::{ACK, NAK};

/// What the next read call sees
#[derive(Debug, Clone)]
pub enum Reply {
    /// Bytes delivered over as many reads as the caller needs
    Bytes(Vec<u8>),
    /// Read deadline passes with nothing
    Silence,
    /// Read fails
    Fail(ErrorKind),
    /// Read panics while the transport is locked
    Panic,
}

/// Mock transport: replays scripted replies and records every write
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: VecDeque<Reply>,
    pub writes: Vec<Vec<u8>>,
    pub fail_writes: Option<ErrorKind>,
    pub read_timeouts: Vec<Duration>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Writes that were not ACK or NAK
    pub fn command_writes(&self) -> Vec<&Vec<u8>> {
        self.writes
            .iter()
            .filter(|w| w.as_slice() != [ACK] && w.as_slice() != [NAK])
            .collect()
    }

    pub fn count_writes(&self, byte: u8) -> usize {
        self.writes.iter().filter(|w| w.as_slice() == [byte]).count()
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.len()
    }
}

impl ErrorType for ScriptedTransport {
    type Error = ErrorKind;
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if let Some(kind) = self.fail_writes {
            return Err(kind);
        }
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerialTransport for ScriptedTransport {
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
        self.read_timeouts.push(timeout);
        match self.replies.pop_front() {
            None | Some(Reply::Silence) => Ok(0),
            Some(Reply::Fail(kind)) => Err(kind),
            Some(Reply::Panic) => panic!("transport fault"),
            Some(Reply::Bytes(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.replies.push_front(Reply::Bytes(bytes[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }
}

pub fn ack() -> Reply {
    Reply::Bytes(vec![ACK])
}

/// Well-formed response frame
pub fn response(rsp_code: u8, body: &[u8]) -> Reply {
    match encode_response(rsp_code, body) {
        Ok(frame) => Reply::Bytes(frame.to_vec()),
        Err(err) => panic!("bad test frame: {err}"),
    }
}

/// Response frame with its BCC flipped
pub fn corrupt_response(rsp_code: u8, body: &[u8]) -> Reply {
    let Reply::Bytes(mut frame) = response(rsp_code, body) else {
        unreachable!()
    };
    if let Some(last) = frame.last_mut() {
        *last ^= 0xFF;
    }
    Reply::Bytes(frame)
}
