//! KISS编码器

use bytes::{BufMut, Bytes, BytesMut};

use super::{FEND, FESC, TFEND, TFESC};

/// 对数据进行KISS转义，追加到输出缓冲区
pub fn escape(data: &[u8], out: &mut BytesMut) {
    for &byte in data {
        match byte {
            FEND => out.put_slice(&[FESC, TFEND]),
            FESC => out.put_slice(&[FESC, TFESC]),
            _ => out.put_u8(byte),
        }
    }
}

/// 编码一个完整的KISS帧：`C0 <命令字节> <转义后的数据> C0`
pub fn encode_frame(command: u8, payload: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(payload.len() + 4);
    out.put_u8(FEND);
    escape(&[command], &mut out);
    escape(payload, &mut out);
    out.put_u8(FEND);
    out.freeze()
}

/// 编码指定端口的数据帧（命令码0）
///
/// # 示例
/// ```
/// use ssdv_link::kiss::encode_data_frame;
///
/// let frame = encode_data_frame(0, &[0x01, 0xC0]);
/// assert_eq!(&frame[..], &[0xC0, 0x00, 0x01, 0xDB, 0xDC, 0xC0]);
/// ```
pub fn encode_data_frame(port: u8, payload: &[u8]) -> Bytes {
    encode_frame((port & 0x0F) << 4, payload)
}
