//! KISS帧处理模块
//!
//! 提供录制文件中KISS帧的解帧（含转义还原）与编码功能

pub mod deframer;
pub mod encoder;

pub use deframer::{deframe, deframe_with_statistics, DeframeStatistics, KissDeframer};
pub use encoder::{encode_data_frame, encode_frame, escape};

/// 帧结束标记
pub const FEND: u8 = 0xC0;
/// 转义标记
pub const FESC: u8 = 0xDB;
/// 转义后的帧结束标记
pub const TFEND: u8 = 0xDC;
/// 转义后的转义标记
pub const TFESC: u8 = 0xDD;
