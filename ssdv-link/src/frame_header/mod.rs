//! 主头部视图模块
//!
//! B、C两种卫星变体的固定格式主头部，以只读视图方式解析。
//! 解复接器只通过`ssdv_core::PrimaryHeader`读取VCID和头部宽度。

pub mod aos;
pub mod bit_reader;
pub mod compact;

pub use aos::AosPrimaryHeader;
pub use bit_reader::BitReader;
pub use compact::CompactPrimaryHeader;
