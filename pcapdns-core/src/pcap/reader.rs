//! Capture file reader with automatic compression handling.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, PcapError};
use crate::io::{Compression, FileDecoder, GenericPcapReader, PacketReader, PcapFormat, RawPacket};

/// Reader for PCAP and PCAPNG files, optionally gzip-compressed.
///
/// ```no_run
/// use pcapdns_core::pcap::PcapReader;
///
/// let mut reader = PcapReader::open("capture.pcap.gz")?;
/// while let Some(packet) = reader.next_packet()? {
///     println!("frame {}: {} bytes", packet.frame_number, packet.data.len());
/// }
/// # Ok::<(), pcapdns_core::Error>(())
/// ```
pub struct PcapReader {
    inner: GenericPcapReader<FileDecoder>,
    compression: Compression,
}

impl PcapReader {
    /// Open a capture file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        let mut file = open_file(path)?;
        let mut header = [0u8; 4];
        let bytes_read = read_up_to(&mut file, &mut header)?;
        if bytes_read < 2 {
            return Err(PcapError::InvalidFormat {
                reason: "file too short".to_string(),
            }
            .into());
        }

        let compression = Compression::detect(&header[..bytes_read]);

        // The capture magic sits behind the compression layer, so sniff it
        // through a throwaway decoder and start over with a fresh one.
        file.seek(SeekFrom::Start(0))?;
        let mut sniffer = FileDecoder::new(file, compression);
        let mut magic = [0u8; 4];
        sniffer.read_exact(&mut magic).map_err(|_| PcapError::InvalidFormat {
            reason: "file too short to read magic number".to_string(),
        })?;
        let format = PcapFormat::detect(&magic)?;
        drop(sniffer);

        debug!(path = %path.display(), %compression, ?format, "opening capture");

        let decoder = FileDecoder::new(open_file(path)?, compression);
        let inner = GenericPcapReader::with_format(decoder, format)?;

        Ok(Self { inner, compression })
    }

    /// Compression detected when the file was opened.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Capture format detected when the file was opened.
    pub fn format(&self) -> PcapFormat {
        self.inner.format()
    }

    /// Read the next frame. Returns `Ok(None)` at end of file.
    #[inline]
    pub fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        self.inner.next_packet()
    }
}

impl std::fmt::Debug for PcapReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcapReader")
            .field("compression", &self.compression)
            .field("format", &self.inner.format())
            .field("frames", &PacketReader::frame_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl PacketReader for PcapReader {
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        self.inner.next_packet()
    }

    fn link_type(&self) -> u16 {
        PacketReader::link_type(&self.inner)
    }

    fn frame_count(&self) -> u64 {
        PacketReader::frame_count(&self.inner)
    }
}

impl Iterator for PcapReader {
    type Item = Result<RawPacket, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}

fn open_file(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PcapError::FileNotFound {
            path: path.display().to_string(),
        }
        .into(),
        _ => Error::Io(e),
    })
}

/// Fill as much of `buf` as the file allows.
fn read_up_to(file: &mut File, buf: &mut [u8]) -> Result<usize, Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
