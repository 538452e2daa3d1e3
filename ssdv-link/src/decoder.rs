//! 外部SSDV解码器接口
//!
//! 解码步骤被隔离在`SsdvDecoder`之后，核心逻辑无需外部程序即可测试

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DecoderError {
    /// 无法启动解码器（如程序不存在）
    #[error("failed to launch decoder {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 解码器返回非零状态
    #[error("decoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// SSDV解码器接口
pub trait SsdvDecoder {
    /// 调用解码器将`input`中的SSDV数据解码为`output`处的JPEG
    fn invoke(&self, flags: &[String], input: &Path, output: &Path) -> Result<(), DecoderError>;
}

/// 以子进程方式调用的外部`ssdv`程序
#[derive(Debug, Clone)]
pub struct ExternalDecoder {
    program: PathBuf,
}

impl ExternalDecoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ExternalDecoder {
    fn default() -> Self {
        Self::new("ssdv")
    }
}

impl SsdvDecoder for ExternalDecoder {
    fn invoke(&self, flags: &[String], input: &Path, output: &Path) -> Result<(), DecoderError> {
        debug!(
            "running {} {} {} {}",
            self.program.display(),
            flags.join(" "),
            input.display(),
            output.display()
        );

        let result = Command::new(&self.program)
            .args(flags)
            .arg(input)
            .arg(output)
            .output()
            .map_err(|source| DecoderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(DecoderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }
}
