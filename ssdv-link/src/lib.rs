//! SSDV Link Processing Kernel
//!
//! This crate turns a recorded KISS capture into ordered SSDV image blobs:
//! KISS deframing, per-satellite demultiplexing, grouping by image id and
//! sequence ordering, and the boundary to the external SSDV decoder.

pub mod decoder;
pub mod demultiplex;
pub mod frame_header;
pub mod kiss;
pub mod pipeline;

pub use decoder::{DecoderError, ExternalDecoder, SsdvDecoder};
pub use demultiplex::{assemble, demux, Demultiplexer, ImageGroup};
pub use kiss::{deframe, KissDeframer};
pub use pipeline::{ExtractionPipeline, ExtractionReport, ImageReport, PipelineError};
