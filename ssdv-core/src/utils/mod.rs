//! 工具模块
//!
//! 提供字节读取与日志输出用的小工具

use crate::ProtocolError;

/// 读取指定偏移处的大端16位无符号数
pub fn read_u16_be(data: &[u8], offset: usize) -> Result<u16, ProtocolError> {
    match data.get(offset..offset + 2) {
        Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(ProtocolError::LengthError(format!(
            "u16 at offset {} exceeds {} byte buffer",
            offset,
            data.len()
        ))),
    }
}

/// 将字节数组的前`max_len`字节转换为十六进制字符串（用于日志）
pub fn hex_preview(bytes: &[u8], max_len: usize) -> String {
    if bytes.len() <= max_len {
        hex::encode_upper(bytes)
    } else {
        format!("{}..(+{})", hex::encode_upper(&bytes[..max_len]), bytes.len() - max_len)
    }
}
