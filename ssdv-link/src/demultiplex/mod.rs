//! 解复接模块
//!
//! 提供按卫星变体的帧过滤、头部剥离，以及按图像ID分组和序列号排序功能

pub mod assembler;
pub mod demultiplexer;

pub use assembler::{assemble, uniform_width, ImageGroup};
pub use demultiplexer::{demux, rule_for, DemuxStatistics, Demultiplexer, Rejection};
