//! TCP Client
//!
//! Blocking client that issues control calls to a kdict server.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{KdictError, Result};
use crate::protocol::{
    read_response, write_request, Pair, Request, Response, Status, GET_CODE, PAIR_SIZE, SET_CODE,
};

/// A connection to a kdict server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to `addr`
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Bound how long a call waits for the server's response
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// Issue a raw control call and return the server's response
    ///
    /// No status interpretation happens here; see [`control`](Self::control).
    pub fn call(&mut self, code: u32, payload: &[u8]) -> Result<Response> {
        write_request(&mut self.writer, &Request::new(code, payload))?;
        read_response(&mut self.reader)
    }

    /// Issue a raw control call, mapping any non-OK status to an error
    pub fn control(&mut self, code: u32, payload: &[u8]) -> Result<Option<Vec<u8>>> {
        let response = self.call(code, payload)?;
        match response.status {
            Status::Ok => Ok(response.payload),
            status => Err(KdictError::from_status(
                status,
                code,
                response.payload.as_deref(),
            )),
        }
    }

    /// Store `value` under `key`
    ///
    /// Input beyond the field capacities is cut off client-side; the server
    /// then truncates and terminates it.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.control(SET_CODE, &Pair::new(key, value).to_bytes())?;
        Ok(())
    }

    /// Fetch the value stored under `key`
    pub fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let payload = self
            .control(GET_CODE, &Pair::with_key(key).to_bytes())?
            .unwrap_or_default();

        let record: &[u8; PAIR_SIZE] = payload.as_slice().try_into().map_err(|_| {
            KdictError::Protocol(format!(
                "GET response carries {} bytes, expected {}",
                payload.len(),
                PAIR_SIZE
            ))
        })?;

        Ok(Pair::from_bytes(record).value().as_bytes().to_vec())
    }
}
