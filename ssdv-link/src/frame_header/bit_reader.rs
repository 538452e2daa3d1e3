//! 位读取器
//!
//! 按MSB优先的顺序从字节数组中顺序读取任意位宽（不超过32位）的字段

use ssdv_core::ProtocolError;

/// 位读取器
///
/// # 示例
/// ```
/// use ssdv_link::frame_header::BitReader;
///
/// // 0x4A 0x84 = 01 00101010 000100
/// let mut reader = BitReader::new(&[0x4A, 0x84]);
/// assert_eq!(reader.read(2).unwrap(), 0b01);
/// assert_eq!(reader.read(8).unwrap(), 0x2A);
/// assert_eq!(reader.read(6).unwrap(), 0x04);
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// 当前bit位置
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// 读取`bits`位并前移读取位置
    pub fn read(&mut self, bits: usize) -> Result<u32, ProtocolError> {
        if bits == 0 || bits > 32 {
            return Err(ProtocolError::InvalidFrameFormat(format!(
                "Invalid bit length: {bits}"
            )));
        }
        let end = self.position + bits;
        if end > self.data.len() * 8 {
            return Err(ProtocolError::LengthError(format!(
                "Bit field exceeds buffer: bit_offset={}, bit_length={}, buffer_size={}",
                self.position,
                bits,
                self.data.len()
            )));
        }

        let mut value = 0u32;
        while self.position < end {
            let byte = self.data[self.position / 8];
            // 当前字节内剩余可读的位数
            let available = 8 - self.position % 8;
            let take = available.min(end - self.position);
            let shift = available - take;
            let chunk = (byte >> shift) & ((1u16 << take) - 1) as u8;

            value = (value << take) | chunk as u32;
            self.position += take;
        }

        Ok(value)
    }

    /// 已读取的位数
    pub fn position(&self) -> usize {
        self.position
    }
}
