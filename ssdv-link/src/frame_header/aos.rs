//! AOS传输帧主头部（CCSDS 732.0-B）

use ssdv_core::{PrimaryHeader, ProtocolError};

use super::bit_reader::BitReader;

/// AOS主头部，6字节
///
/// | 字段 | 位宽 |
/// |------|------|
/// | 版本号 | 2 |
/// | 航天器ID | 8 |
/// | 虚拟信道ID | 6 |
/// | 虚拟信道帧计数 | 24 |
/// | 信令域 | 8 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AosPrimaryHeader {
    pub version: u8,
    pub spacecraft_id: u8,
    pub virtual_channel_id: u8,
    pub frame_count: u32,
    pub signalling: u8,
}

impl PrimaryHeader for AosPrimaryHeader {
    const WIDTH: usize = 6;

    fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        if frame.len() < Self::WIDTH {
            return Err(ProtocolError::LengthError(format!(
                "AOS primary header needs {} bytes, frame has {}",
                Self::WIDTH,
                frame.len()
            )));
        }

        let mut reader = BitReader::new(&frame[..Self::WIDTH]);
        Ok(Self {
            version: reader.read(2)? as u8,
            spacecraft_id: reader.read(8)? as u8,
            virtual_channel_id: reader.read(6)? as u8,
            frame_count: reader.read(24)?,
            signalling: reader.read(8)? as u8,
        })
    }

    fn virtual_channel_id(&self) -> u8 {
        self.virtual_channel_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        // 版本1，SCID 0xAB，VCID 4
        // 01 10101011 000100 = 0x6A 0xC4
        let frame = [0x6A, 0xC4, 0x01, 0x02, 0x03, 0x80, 0xFF, 0xFF];
        let header = AosPrimaryHeader::parse(&frame).unwrap();

        assert_eq!(header.version, 1);
        assert_eq!(header.spacecraft_id, 0xAB);
        assert_eq!(header.virtual_channel_id(), 4);
        assert_eq!(header.frame_count, 0x010203);
        assert_eq!(header.signalling, 0x80);
    }

    #[test]
    fn test_vcid_uses_low_six_bits() {
        let header = AosPrimaryHeader::parse(&[0x40, 0x3F, 0, 0, 0, 0]).unwrap();
        assert_eq!(header.virtual_channel_id, 63);
        assert_eq!(header.spacecraft_id, 0);
    }

    #[test]
    fn test_too_short() {
        let result = AosPrimaryHeader::parse(&[0x6A, 0xC4, 0x01]);
        assert!(matches!(result, Err(ProtocolError::LengthError(_))));
    }
}
