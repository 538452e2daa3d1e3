//! SSDV Extraction Core Library
//!
//! This crate provides the shared types for the KISS/SSDV extraction system:
//! the error taxonomy, the per-satellite variant table and the narrow
//! primary-header capability consumed by the demultiplexer.

pub mod error;
pub mod satellite;
pub mod utils;

// 导出错误类型
pub use error::ProtocolError;

// 导出卫星变体表，便于其他模块使用
pub use satellite::*;

/// 主头部视图接口 - 解复接器只依赖VCID与头部宽度
///
/// 实现者是对帧前若干字节的只读视图，不持有也不修改帧数据
pub trait PrimaryHeader: Sized {
    /// 头部字节宽度
    const WIDTH: usize;

    /// 从帧起始位置解析头部字段
    fn parse(frame: &[u8]) -> Result<Self, ProtocolError>;

    /// 虚拟信道标识
    fn virtual_channel_id(&self) -> u8;
}
