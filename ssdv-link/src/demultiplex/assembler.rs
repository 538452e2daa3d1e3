//! 图像分组与排序
//!
//! 按图像ID字节对记录分组，组内按大端16位序列号稳定排序

use bytes::{Bytes, BytesMut};
use ssdv_core::utils::read_u16_be;
use ssdv_core::{ProtocolError, Satellite};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 校验所有帧/记录宽度一致
///
/// # 返回
/// - `Ok(Some(width))`: 统一宽度
/// - `Ok(None)`: 输入为空
/// - `Err(ProtocolError::InconsistentWidth)`: 第一个宽度不同的元素
pub fn uniform_width(
    items: &[Bytes],
    stage: &'static str,
) -> Result<Option<usize>, ProtocolError> {
    let Some(first) = items.first() else {
        return Ok(None);
    };
    let expected = first.len();

    match items.iter().position(|item| item.len() != expected) {
        Some(index) => Err(ProtocolError::InconsistentWidth {
            stage,
            expected,
            found: items[index].len(),
            index,
        }),
        None => Ok(Some(expected)),
    }
}

/// 同一图像ID的记录集合，按序列号升序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    pub image_id: u8,
    /// 与`records`一一对应的序列号
    sequences: Vec<u16>,
    records: Vec<Bytes>,
}

impl ImageGroup {
    pub fn records(&self) -> &[Bytes] {
        &self.records
    }

    pub fn sequence_numbers(&self) -> &[u16] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 单条记录的字节宽度
    pub fn record_width(&self) -> usize {
        self.records.first().map_or(0, |r| r.len())
    }

    /// 按顺序拼接全部记录
    pub fn to_blob(&self) -> Bytes {
        let mut blob = BytesMut::with_capacity(self.record_width() * self.records.len());
        for record in &self.records {
            blob.extend_from_slice(record);
        }
        blob.freeze()
    }

    /// 出现多次的序列号（保留全部副本，交由解码器处理）
    pub fn duplicate_sequences(&self) -> Vec<u16> {
        let mut duplicates: Vec<u16> = self
            .sequences
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }

    /// 首尾序列号之间缺失的区间（闭区间）
    pub fn missing_sequences(&self) -> Vec<(u16, u16)> {
        self.sequences
            .windows(2)
            .filter(|pair| pair[1] > pair[0].saturating_add(1))
            .map(|pair| (pair[0] + 1, pair[1] - 1))
            .collect()
    }

    /// 缺失的包数
    pub fn missing_count(&self) -> usize {
        self.missing_sequences()
            .iter()
            .map(|(start, end)| (end - start) as usize + 1)
            .sum()
    }
}

/// 按图像ID分组并排序
///
/// # 参数
/// - `records`: 解复接后的记录，宽度必须一致
/// - `satellite`: 决定图像ID与序列号偏移
///
/// # 返回
/// - 图像ID升序的分组表
///
/// # 示例
/// ```
/// use bytes::Bytes;
/// use ssdv_core::Satellite;
/// use ssdv_link::demultiplex::assemble;
///
/// // 变体C：图像ID在偏移0，序列号在偏移1
/// let records = [
///     Bytes::from_static(&[0x01, 0x00, 0x05]),
///     Bytes::from_static(&[0x01, 0x00, 0x01]),
///     Bytes::from_static(&[0x01, 0x00, 0x03]),
/// ];
/// let groups = assemble(&records, Satellite::C).unwrap();
///
/// assert_eq!(groups[&1].sequence_numbers(), &[1, 3, 5]);
/// ```
pub fn assemble(
    records: &[Bytes],
    satellite: Satellite,
) -> Result<BTreeMap<u8, ImageGroup>, ProtocolError> {
    uniform_width(records, "record")?;

    let profile = satellite.profile();
    let mut keyed: BTreeMap<u8, Vec<(u16, Bytes)>> = BTreeMap::new();

    for record in records {
        let image_id = *record.get(profile.image_id_offset).ok_or_else(|| {
            ProtocolError::LengthError(format!(
                "image id at offset {} exceeds {} byte record",
                profile.image_id_offset,
                record.len()
            ))
        })?;
        let sequence = read_u16_be(record, profile.sequence_offset)?;
        keyed
            .entry(image_id)
            .or_default()
            .push((sequence, record.clone()));
    }

    let groups = keyed
        .into_iter()
        .map(|(image_id, mut entries)| {
            // 稳定排序：相同序列号保持原始相对顺序
            entries.sort_by_key(|(sequence, _)| *sequence);
            let (sequences, records) = entries.into_iter().unzip();
            let group = ImageGroup {
                image_id,
                sequences,
                records,
            };

            debug!("image {}: {} packets", image_id, group.len());
            let duplicates = group.duplicate_sequences();
            if !duplicates.is_empty() {
                warn!(
                    "image {}: duplicate packet sequence numbers {:?}",
                    image_id, duplicates
                );
            }
            let missing = group.missing_sequences();
            if !missing.is_empty() {
                warn!("image {}: missing packet ranges {:?}", image_id, missing);
            }

            (image_id, group)
        })
        .collect();

    Ok(groups)
}
