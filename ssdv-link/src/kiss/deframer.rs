//! KISS解帧器
//!
//! 逐字节扫描输入，还原转义序列，在帧结束标记处输出完整数据帧

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use ssdv_core::utils::hex_preview;
use tracing::{debug, trace};

use super::{FEND, FESC, TFEND, TFESC};

/// 解帧统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeframeStatistics {
    /// 接受的数据帧数
    pub frames_accepted: u64,
    /// 长度不符被丢弃的帧数
    pub rejected_size: u64,
    /// 控制帧（命令字节低4位非0）
    pub rejected_control: u64,
    /// 只有命令字节的帧
    pub rejected_runt: u64,
    /// 非法转义序列数
    pub malformed_escapes: u64,
    /// 输入末尾未结束帧中被丢弃的字节数
    pub trailing_bytes_discarded: u64,
}

/// KISS解帧器
///
/// 支持分块输入，帧可以跨越多次`push`调用
#[derive(Debug)]
pub struct KissDeframer {
    /// 当前帧缓冲区（含命令字节）
    buffer: BytesMut,
    /// 上一个字节是转义标记
    escape_pending: bool,
    /// 期望的帧净荷长度（不含命令字节）
    expected_frame_size: Option<usize>,
    stats: DeframeStatistics,
}

impl KissDeframer {
    /// 创建新的解帧器
    ///
    /// # 参数
    /// - `expected_frame_size`: 期望的帧净荷长度，`None`表示不限制
    pub fn new(expected_frame_size: Option<usize>) -> Self {
        Self {
            buffer: BytesMut::new(),
            escape_pending: false,
            expected_frame_size,
            stats: DeframeStatistics::default(),
        }
    }

    /// 追加输入数据，返回本次完成的数据帧（已去掉命令字节）
    ///
    /// # 示例
    /// ```
    /// use ssdv_link::kiss::KissDeframer;
    ///
    /// let mut deframer = KissDeframer::new(None);
    ///
    /// // 帧跨越两次输入
    /// assert!(deframer.push(&[0xC0, 0x00, 0x01]).is_empty());
    /// let frames = deframer.push(&[0xDB, 0xDC, 0x02, 0xC0]);
    ///
    /// assert_eq!(frames.len(), 1);
    /// assert_eq!(&frames[0][..], &[0x01, 0xC0, 0x02]);
    /// ```
    pub fn push(&mut self, data: &[u8]) -> Vec<Bytes> {
        let mut frames = Vec::new();

        for &byte in data {
            if byte == FEND {
                // 转义状态不随帧结束清除，由下一个非FEND字节消费
                if let Some(frame) = self.end_of_frame() {
                    frames.push(frame);
                }
            } else if self.escape_pending {
                match byte {
                    TFEND => self.buffer.put_u8(FEND),
                    TFESC => self.buffer.put_u8(FESC),
                    other => {
                        trace!("dropping malformed escape 0x{other:02X}");
                        self.stats.malformed_escapes += 1;
                    }
                }
                self.escape_pending = false;
            } else if byte == FESC {
                self.escape_pending = true;
            } else {
                self.buffer.put_u8(byte);
            }
        }

        frames
    }

    /// 处理帧结束标记：校验缓冲区中的帧，并总是清空缓冲区
    fn end_of_frame(&mut self) -> Option<Bytes> {
        let frame = self.buffer.split().freeze();

        if frame.is_empty() {
            // 连续的帧结束标记（帧起始分隔）
            return None;
        }
        if frame.len() == 1 {
            self.stats.rejected_runt += 1;
            return None;
        }
        if frame[0] & 0x0F != 0 {
            debug!("dropping KISS control frame, command 0x{:02X}", frame[0]);
            self.stats.rejected_control += 1;
            return None;
        }
        if let Some(size) = self.expected_frame_size {
            if frame.len() != size + 1 {
                debug!(
                    "dropping KISS frame of {} bytes (expected {}): {}",
                    frame.len() - 1,
                    size,
                    hex_preview(&frame[1..], 16)
                );
                self.stats.rejected_size += 1;
                return None;
            }
        }

        self.stats.frames_accepted += 1;
        Some(frame.slice(1..))
    }

    /// 当前未结束帧中已缓冲的字节数
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// 结束输入：丢弃未结束的帧并返回最终统计
    pub fn finish(mut self) -> DeframeStatistics {
        if !self.buffer.is_empty() {
            debug!(
                "discarding {} bytes of unterminated trailing frame",
                self.buffer.len()
            );
            self.stats.trailing_bytes_discarded += self.buffer.len() as u64;
        }
        self.stats
    }
}

/// 对完整输入进行解帧
///
/// # 参数
/// - `raw`: 录制文件的全部字节
/// - `expected_frame_size`: 期望的帧净荷长度，`None`表示不限制
///
/// # 返回
/// - 按出现顺序排列的数据帧（已去掉命令字节）
pub fn deframe(raw: &[u8], expected_frame_size: Option<usize>) -> Vec<Bytes> {
    deframe_with_statistics(raw, expected_frame_size).0
}

/// 同`deframe`，同时返回解帧统计
pub fn deframe_with_statistics(
    raw: &[u8],
    expected_frame_size: Option<usize>,
) -> (Vec<Bytes>, DeframeStatistics) {
    let mut deframer = KissDeframer::new(expected_frame_size);
    let frames = deframer.push(raw);
    (frames, deframer.finish())
}
