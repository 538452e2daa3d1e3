//! 卫星解复接器实现
//!
//! 按卫星变体剥离外层头部、按VCID过滤，得到候选SSDV记录

use bytes::Bytes;
use serde::Serialize;
use ssdv_core::{PrimaryHeader, Satellite};
use tracing::{debug, info};

use crate::frame_header::{AosPrimaryHeader, CompactPrimaryHeader};

/// 变体A：接受的首字节
pub const A_FIRST_BYTES: [u8; 2] = [0x15, 0x16];
/// 变体A：要求的第二字节
pub const A_SECOND_BYTE: u8 = 0x01;
/// 变体A：外层传输头长度
pub const A_OUTER_HEADER_LEN: usize = 56;
/// 变体A：SSDV记录起始标记
pub const A_SSDV_MARKER: [u8; 2] = [0x55, 0x68];

/// 变体B：承载SSDV的虚拟信道
pub const B_VCID: u8 = 4;
/// 变体B：主头部之后的M_PDU头部长度
pub const B_MPDU_HEADER_LEN: usize = 2;

/// 变体C：承载SSDV的虚拟信道
pub const C_VCID: u8 = 1;

/// 帧被丢弃的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 首字节不在接受集合中
    FirstByte(u8),
    /// 第二字节不匹配
    SecondByte(u8),
    /// 剥离头部后缺少SSDV标记
    MissingMarker,
    /// 虚拟信道不匹配
    VirtualChannel(u8),
    /// 帧太短无法剥离头部，或剥离后的记录太短无法读取图像ID/序列号；携带对应长度
    Truncated(usize),
}

/// 单帧选择规则：返回剥离头部后的记录或丢弃原因
pub type SelectRule = fn(&Bytes) -> Result<Bytes, Rejection>;

/// 按`Satellite`判别值索引的规则表
static DEMUX_RULES: [SelectRule; 3] = [select_a, select_b, select_c];

fn select_a(frame: &Bytes) -> Result<Bytes, Rejection> {
    let (first, second) = match frame.get(..2) {
        Some(&[first, second]) => (first, second),
        _ => return Err(Rejection::Truncated(frame.len())),
    };
    if !A_FIRST_BYTES.contains(&first) {
        return Err(Rejection::FirstByte(first));
    }
    if second != A_SECOND_BYTE {
        return Err(Rejection::SecondByte(second));
    }
    if frame.len() < A_OUTER_HEADER_LEN {
        return Err(Rejection::Truncated(frame.len()));
    }

    let record = frame.slice(A_OUTER_HEADER_LEN..);
    if !record.starts_with(&A_SSDV_MARKER) {
        return Err(Rejection::MissingMarker);
    }
    Ok(record)
}

/// 解析主头部，VCID匹配时剥离头部及其后`extra`字节
fn strip_primary_header<H: PrimaryHeader>(
    frame: &Bytes,
    vcid: u8,
    extra: usize,
) -> Result<Bytes, Rejection> {
    let header = H::parse(frame).map_err(|_| Rejection::Truncated(frame.len()))?;
    if header.virtual_channel_id() != vcid {
        return Err(Rejection::VirtualChannel(header.virtual_channel_id()));
    }

    let start = H::WIDTH + extra;
    if frame.len() < start {
        return Err(Rejection::Truncated(frame.len()));
    }
    Ok(frame.slice(start..))
}

fn select_b(frame: &Bytes) -> Result<Bytes, Rejection> {
    strip_primary_header::<AosPrimaryHeader>(frame, B_VCID, B_MPDU_HEADER_LEN)
}

fn select_c(frame: &Bytes) -> Result<Bytes, Rejection> {
    strip_primary_header::<CompactPrimaryHeader>(frame, C_VCID, 0)
}

/// 获取卫星变体的选择规则
pub fn rule_for(satellite: Satellite) -> SelectRule {
    DEMUX_RULES[satellite as usize]
}

/// 解复接统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemuxStatistics {
    pub frames_seen: u64,
    pub records_kept: u64,
    pub rejected_first_byte: u64,
    pub rejected_second_byte: u64,
    pub rejected_marker: u64,
    pub rejected_vcid: u64,
    pub rejected_truncated: u64,
}

impl DemuxStatistics {
    fn record_rejection(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::FirstByte(_) => self.rejected_first_byte += 1,
            Rejection::SecondByte(_) => self.rejected_second_byte += 1,
            Rejection::MissingMarker => self.rejected_marker += 1,
            Rejection::VirtualChannel(_) => self.rejected_vcid += 1,
            Rejection::Truncated(_) => self.rejected_truncated += 1,
        }
    }
}

/// 卫星解复接器
///
/// 对每一帧应用所选变体的规则，输出新的记录序列，不修改输入帧
pub struct Demultiplexer {
    satellite: Satellite,
    rule: SelectRule,
    /// 记录至少需要的长度（能读出图像ID和序列号）
    min_record_len: usize,
    stats: DemuxStatistics,
}

impl Demultiplexer {
    /// 创建指定卫星变体的解复接器
    pub fn new(satellite: Satellite) -> Self {
        Self {
            satellite,
            rule: rule_for(satellite),
            min_record_len: satellite.profile().min_record_len(),
            stats: DemuxStatistics::default(),
        }
    }

    /// 对单帧应用规则
    ///
    /// # 返回
    /// - `Ok(record)`: 剥离头部后的记录（与原帧共享内存）
    /// - `Err(Rejection)`: 丢弃原因
    pub fn select(&mut self, frame: &Bytes) -> Result<Bytes, Rejection> {
        self.stats.frames_seen += 1;

        let result = (self.rule)(frame).and_then(|record| {
            if record.len() < self.min_record_len {
                Err(Rejection::Truncated(record.len()))
            } else {
                Ok(record)
            }
        });

        match result {
            Ok(record) => {
                self.stats.records_kept += 1;
                Ok(record)
            }
            Err(rejection) => {
                debug!("satellite {}: frame rejected: {:?}", self.satellite, rejection);
                self.stats.record_rejection(rejection);
                Err(rejection)
            }
        }
    }

    /// 对全部帧解复接
    ///
    /// # 返回
    /// - 通过过滤的记录，保持帧的原始顺序；可能为空
    pub fn demultiplex(&mut self, frames: &[Bytes]) -> Vec<Bytes> {
        let records: Vec<Bytes> = frames
            .iter()
            .filter_map(|frame| self.select(frame).ok())
            .collect();

        info!(
            "satellite {}: kept {} of {} frames",
            self.satellite,
            records.len(),
            frames.len()
        );
        records
    }

    /// 获取统计信息
    pub fn get_statistics(&self) -> &DemuxStatistics {
        &self.stats
    }
}

/// 按卫星变体对帧序列解复接
pub fn demux(frames: &[Bytes], satellite: Satellite) -> Vec<Bytes> {
    Demultiplexer::new(satellite).demultiplex(frames)
}
