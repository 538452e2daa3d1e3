//! SSDV提取流水线
//!
//! 录制文件 → KISS解帧 → 卫星解复接 → 分组排序 → 写出`.ssdv` → 外部解码为`.jpg`

use bytes::Bytes;
use serde::Serialize;
use ssdv_core::{ProtocolError, Satellite, SatelliteProfile};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decoder::SsdvDecoder;
use crate::demultiplex::{assemble, uniform_width, DemuxStatistics, Demultiplexer, ImageGroup};
use crate::kiss::{deframe_with_statistics, DeframeStatistics};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read capture {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// 生成输出文件路径：`<base>_<image_id>.<extension>`
pub fn artifact_path(base: &Path, image_id: u8, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!("_{image_id}.{extension}"));
    PathBuf::from(name)
}

/// 单幅图像的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub image_id: u8,
    pub packets: usize,
    pub first_sequence: Option<u16>,
    pub last_sequence: Option<u16>,
    pub duplicate_sequences: Vec<u16>,
    pub missing_sequences: Vec<(u16, u16)>,
    pub ssdv_path: PathBuf,
    /// 仅在解码成功时存在
    pub jpeg_path: Option<PathBuf>,
    pub decode_error: Option<String>,
}

impl ImageReport {
    fn new(group: &ImageGroup, ssdv_path: PathBuf) -> Self {
        let sequences = group.sequence_numbers();
        Self {
            image_id: group.image_id,
            packets: group.len(),
            first_sequence: sequences.first().copied(),
            last_sequence: sequences.last().copied(),
            duplicate_sequences: group.duplicate_sequences(),
            missing_sequences: group.missing_sequences(),
            ssdv_path,
            jpeg_path: None,
            decode_error: None,
        }
    }
}

/// 一次运行的完整报告
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub satellite: Satellite,
    pub profile: SatelliteProfile,
    pub deframe: DeframeStatistics,
    pub demux: DemuxStatistics,
    pub images: Vec<ImageReport>,
}

impl ExtractionReport {
    /// 成功解码的图像数
    pub fn decoded_count(&self) -> usize {
        self.images.iter().filter(|i| i.jpeg_path.is_some()).count()
    }

    /// 以JSON格式写出报告
    pub fn write_json(&self, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json).map_err(|source| PipelineError::WriteArtifact {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 解帧、解复接、分组后的中间结果
#[derive(Debug, Clone)]
pub struct Extraction {
    pub groups: BTreeMap<u8, ImageGroup>,
    pub deframe: DeframeStatistics,
    pub demux: DemuxStatistics,
}

/// SSDV提取流水线
pub struct ExtractionPipeline {
    satellite: Satellite,
    /// 为`None`时只写出`.ssdv`文件
    decoder: Option<Box<dyn SsdvDecoder>>,
}

impl ExtractionPipeline {
    /// 创建不调用解码器的流水线
    pub fn new(satellite: Satellite) -> Self {
        Self {
            satellite,
            decoder: None,
        }
    }

    /// 设置外部解码器
    pub fn with_decoder(mut self, decoder: Box<dyn SsdvDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// 纯内存处理：解帧、解复接、分组排序
    pub fn extract(&self, raw: &[u8]) -> Result<Extraction, ProtocolError> {
        let profile = self.satellite.profile();

        let (frames, deframe) = deframe_with_statistics(raw, profile.frame_size);
        info!(
            "deframed {} KISS frames from {} bytes",
            frames.len(),
            raw.len()
        );
        uniform_width(&frames, "frame")?;

        let mut demultiplexer = Demultiplexer::new(self.satellite);
        let records: Vec<Bytes> = demultiplexer.demultiplex(&frames);
        let demux = demultiplexer.get_statistics().clone();

        if records.is_empty() {
            info!("no SSDV records found for satellite {}", self.satellite);
            return Ok(Extraction {
                groups: BTreeMap::new(),
                deframe,
                demux,
            });
        }

        let groups = assemble(&records, self.satellite)?;
        info!("found {} images", groups.len());

        Ok(Extraction {
            groups,
            deframe,
            demux,
        })
    }

    /// 处理录制文件
    pub fn run_file(
        &self,
        input: &Path,
        output_base: &Path,
    ) -> Result<ExtractionReport, PipelineError> {
        let raw = fs::read(input).map_err(|source| PipelineError::ReadInput {
            path: input.to_path_buf(),
            source,
        })?;
        self.run(&raw, output_base)
    }

    /// 处理内存中的录制数据，写出每幅图像的产物
    pub fn run(&self, raw: &[u8], output_base: &Path) -> Result<ExtractionReport, PipelineError> {
        let extraction = self.extract(raw)?;

        let mut images = Vec::with_capacity(extraction.groups.len());
        for group in extraction.groups.values() {
            images.push(self.write_group(group, output_base)?);
        }

        let report = ExtractionReport {
            satellite: self.satellite,
            profile: self.satellite.profile().clone(),
            deframe: extraction.deframe,
            demux: extraction.demux,
            images,
        };
        info!(
            "wrote {} images, {} decoded",
            report.images.len(),
            report.decoded_count()
        );
        Ok(report)
    }

    /// 写出单组`.ssdv`文件并调用解码器；解码失败只记录，不中断
    fn write_group(
        &self,
        group: &ImageGroup,
        output_base: &Path,
    ) -> Result<ImageReport, PipelineError> {
        let ssdv_path = artifact_path(output_base, group.image_id, "ssdv");
        fs::write(&ssdv_path, &group.to_blob()[..]).map_err(|source| {
            PipelineError::WriteArtifact {
                path: ssdv_path.clone(),
                source,
            }
        })?;
        debug!("image {}: wrote {}", group.image_id, ssdv_path.display());

        let mut report = ImageReport::new(group, ssdv_path);
        let Some(decoder) = &self.decoder else {
            return Ok(report);
        };

        let jpeg_path = artifact_path(output_base, group.image_id, "jpg");
        let flags = self
            .satellite
            .profile()
            .decoder_mode
            .args(group.record_width());

        match decoder.invoke(&flags, &report.ssdv_path, &jpeg_path) {
            Ok(()) => {
                info!("image {}: decoded {}", group.image_id, jpeg_path.display());
                report.jpeg_path = Some(jpeg_path);
            }
            Err(err) => {
                warn!("image {}: decode failed: {}", group.image_id, err);
                remove_partial_output(&jpeg_path);
                report.decode_error = Some(err.to_string());
            }
        }

        Ok(report)
    }
}

/// 解码失败时删除可能残留的不完整JPEG
fn remove_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("removed partial output {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("failed to remove {}: {}", path.display(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path() {
        let path = artifact_path(Path::new("out/pass1"), 3, "ssdv");
        assert_eq!(path, PathBuf::from("out/pass1_3.ssdv"));

        let path = artifact_path(Path::new("img"), 255, "jpg");
        assert_eq!(path, PathBuf::from("img_255.jpg"));
    }

    #[test]
    fn test_extract_empty_input() {
        for satellite in Satellite::ALL {
            let extraction = ExtractionPipeline::new(satellite).extract(&[]).unwrap();
            assert!(extraction.groups.is_empty());
            assert_eq!(extraction.demux.frames_seen, 0);
        }
    }

    #[test]
    fn test_extract_rejects_mixed_frame_widths() {
        let raw = [
            0xC0, 0x00, 0x00, 0x01, 0x00, 0x01, 0xC0, //
            0xC0, 0x00, 0x00, 0x01, 0x00, 0xC0,
        ];
        let err = ExtractionPipeline::new(Satellite::C).extract(&raw).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InconsistentWidth { stage: "frame", .. }
        ));
    }
}
