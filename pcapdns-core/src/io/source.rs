//! The packet source abstraction consumed by the record reader.

use bytes::Bytes;

use crate::error::Error;

/// One captured frame, as handed out by a [`PacketReader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPacket {
    /// Frame number (1-indexed, matching Wireshark)
    pub frame_number: u64,
    /// Capture time in microseconds since the Unix epoch
    pub timestamp_us: i64,
    /// Captured length (may be less than original)
    pub captured_len: u32,
    /// Original packet length on the wire
    pub original_len: u32,
    /// Link-layer type of the interface the frame was captured on
    pub link_type: u16,
    /// Frame bytes starting at the link-layer header
    pub data: Bytes,
}

impl RawPacket {
    /// Whole seconds since the epoch, floored.
    ///
    /// Frames captured before 1970 get a negative key rounded towards
    /// negative infinity, so `-1.5s` maps to `-2`.
    #[inline]
    pub fn key(&self) -> i64 {
        self.timestamp_us.div_euclid(1_000_000)
    }

    /// Whole seconds part of the timestamp.
    #[inline]
    pub fn ts_sec(&self) -> i64 {
        self.key()
    }

    /// Sub-second part of the timestamp in microseconds.
    #[inline]
    pub fn ts_usec(&self) -> u32 {
        self.timestamp_us.rem_euclid(1_000_000) as u32
    }
}

/// Sequential reader of captured frames.
///
/// `Ok(None)` signals a clean end of input. An `Err` is a failure of the
/// underlying source; callers should not expect further frames after one.
pub trait PacketReader: Send {
    /// Read the next frame.
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error>;

    /// Link type announced by the most recently read header.
    fn link_type(&self) -> u16;

    /// Number of frames handed out so far.
    fn frame_count(&self) -> u64;
}

impl<T: PacketReader + ?Sized> PacketReader for Box<T> {
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        (**self).next_packet()
    }

    fn link_type(&self) -> u16 {
        (**self).link_type()
    }

    fn frame_count(&self) -> u64 {
        (**self).frame_count()
    }
}
