//! 卫星变体表
//!
//! 每个卫星变体携带一组常量：期望帧长、图像ID偏移、序列号偏移与解码器参数。
//! 新增卫星只需扩展此表和对应的解复接规则，不改动共享逻辑。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 支持的卫星变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Satellite {
    /// 256字节KISS帧，56字节外层传输头，净荷以SSDV标记开头
    A,
    /// AOS主头部 + M_PDU头部，VCID 4
    B,
    /// 紧凑主头部，VCID 1
    C,
}

impl Satellite {
    pub const ALL: [Satellite; 3] = [Satellite::A, Satellite::B, Satellite::C];

    /// 获取该变体的常量表
    pub fn profile(self) -> &'static SatelliteProfile {
        &SATELLITE_PROFILES[self as usize]
    }
}

impl fmt::Display for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Satellite::A => "A",
            Satellite::B => "B",
            Satellite::C => "C",
        };
        f.write_str(name)
    }
}

/// 外部SSDV解码器的工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoderMode {
    /// `-J`
    Jy1Sat,
    /// `-l <记录字节宽度>`
    FixedLength,
    /// `-D`
    Dslwp,
}

impl DecoderMode {
    /// 生成解码器命令行参数
    ///
    /// # 参数
    /// - `record_width`: 单条记录的字节宽度（仅`FixedLength`模式使用）
    pub fn args(self, record_width: usize) -> Vec<String> {
        match self {
            DecoderMode::Jy1Sat => vec!["-J".to_string()],
            DecoderMode::FixedLength => vec!["-l".to_string(), record_width.to_string()],
            DecoderMode::Dslwp => vec!["-D".to_string()],
        }
    }
}

/// 单个卫星变体的常量表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatelliteProfile {
    pub satellite: Satellite,
    /// 期望的KISS帧净荷长度（不含命令字节），`None`表示不限制
    pub frame_size: Option<usize>,
    /// 记录内图像ID字节的偏移
    pub image_id_offset: usize,
    /// 记录内大端16位序列号的偏移
    pub sequence_offset: usize,
    pub decoder_mode: DecoderMode,
}

impl SatelliteProfile {
    /// 一条记录至少需要的字节数，才能读出图像ID和序列号
    pub fn min_record_len(&self) -> usize {
        (self.image_id_offset + 1).max(self.sequence_offset + 2)
    }
}

/// 按`Satellite`判别值索引
pub static SATELLITE_PROFILES: [SatelliteProfile; 3] = [
    SatelliteProfile {
        satellite: Satellite::A,
        frame_size: Some(256),
        image_id_offset: 2,
        sequence_offset: 3,
        decoder_mode: DecoderMode::Jy1Sat,
    },
    SatelliteProfile {
        satellite: Satellite::B,
        frame_size: None,
        image_id_offset: 6,
        sequence_offset: 8,
        decoder_mode: DecoderMode::FixedLength,
    },
    SatelliteProfile {
        satellite: Satellite::C,
        frame_size: None,
        image_id_offset: 0,
        sequence_offset: 1,
        decoder_mode: DecoderMode::Dslwp,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table_indexed_by_variant() {
        for satellite in Satellite::ALL {
            assert_eq!(satellite.profile().satellite, satellite);
        }
    }

    #[test]
    fn test_profile_offsets() {
        let a = Satellite::A.profile();
        assert_eq!(a.frame_size, Some(256));
        assert_eq!((a.image_id_offset, a.sequence_offset), (2, 3));

        let b = Satellite::B.profile();
        assert_eq!(b.frame_size, None);
        assert_eq!((b.image_id_offset, b.sequence_offset), (6, 8));

        let c = Satellite::C.profile();
        assert_eq!(c.frame_size, None);
        assert_eq!((c.image_id_offset, c.sequence_offset), (0, 1));
    }

    #[test]
    fn test_decoder_args() {
        assert_eq!(DecoderMode::Jy1Sat.args(200), vec!["-J"]);
        assert_eq!(DecoderMode::FixedLength.args(214), vec!["-l", "214"]);
        assert_eq!(DecoderMode::Dslwp.args(0), vec!["-D"]);
    }

    #[test]
    fn test_min_record_len() {
        assert_eq!(Satellite::A.profile().min_record_len(), 5);
        assert_eq!(Satellite::B.profile().min_record_len(), 10);
        assert_eq!(Satellite::C.profile().min_record_len(), 3);
    }

    #[test]
    fn test_profile_serializes() {
        let json = serde_json::to_value(Satellite::B.profile()).unwrap();
        assert_eq!(json["satellite"], "B");
        assert_eq!(json["decoder_mode"], "FixedLength");
        assert!(json["frame_size"].is_null());
    }

    #[test]
    fn test_display() {
        let names: Vec<String> = Satellite::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
