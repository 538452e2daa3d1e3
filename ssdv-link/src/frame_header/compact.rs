//! 紧凑主头部

use ssdv_core::{PrimaryHeader, ProtocolError};

use super::bit_reader::BitReader;

/// 紧凑主头部，4字节：版本号(2) + 航天器ID(8) + 虚拟信道ID(6) + 帧计数(16)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactPrimaryHeader {
    pub version: u8,
    pub spacecraft_id: u8,
    pub virtual_channel_id: u8,
    pub frame_count: u16,
}

impl PrimaryHeader for CompactPrimaryHeader {
    const WIDTH: usize = 4;

    fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        let Some(bytes) = frame.get(..Self::WIDTH) else {
            return Err(ProtocolError::LengthError(format!(
                "compact primary header needs {} bytes, frame has {}",
                Self::WIDTH,
                frame.len()
            )));
        };

        let mut reader = BitReader::new(bytes);
        Ok(Self {
            version: reader.read(2)? as u8,
            spacecraft_id: reader.read(8)? as u8,
            virtual_channel_id: reader.read(6)? as u8,
            frame_count: reader.read(16)? as u16,
        })
    }

    fn virtual_channel_id(&self) -> u8 {
        self.virtual_channel_id
    }
}
