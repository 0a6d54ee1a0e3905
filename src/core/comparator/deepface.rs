// src/core/comparator/deepface.rs
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::core::comparator::{ComparatorError, FaceComparator, FaceComparison};
use crate::utils::config::ComparatorConfig;

const VERIFY_SCRIPT: &str = include_str!("../../../scripts/deepface_verify.py");
const STDERR_TAIL: usize = 400;

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Verdict {
    Success {
        verified: bool,
        distance: f64,
        threshold: f64,
    },
    NoFace {
        message: String,
    },
    Error {
        message: String,
    },
}

/// Runs DeepFace in a Python subprocess, one process per comparison.
#[derive(Debug, Clone)]
pub struct DeepFaceComparator {
    python: String,
    script_path: Option<PathBuf>,
    model: String,
    detector_backend: String,
    distance_metric: String,
    enforce_detection: bool,
    timeout: Duration,
}

impl DeepFaceComparator {
    pub fn new(config: &ComparatorConfig) -> Self {
        Self {
            python: config.python.clone(),
            script_path: config.script_path.clone(),
            model: config.model.clone(),
            detector_backend: config.detector_backend.clone(),
            distance_metric: config.distance_metric.clone(),
            enforce_detection: config.enforce_detection,
            timeout: config.get_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, captured: &Path, reference: &Path) -> Command {
        let mut command = Command::new(&self.python);
        match &self.script_path {
            Some(script) => command.arg(script),
            None => command.arg("-c").arg(VERIFY_SCRIPT),
        };
        command
            .arg(captured)
            .arg(reference)
            .arg("--model")
            .arg(&self.model)
            .arg("--detector")
            .arg(&self.detector_backend)
            .arg("--distance-metric")
            .arg(&self.distance_metric);
        if !self.enforce_detection {
            command.arg("--no-enforce-detection");
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl FaceComparator for DeepFaceComparator {
    async fn compare(
        &self,
        captured: &Path,
        reference: &Path,
    ) -> Result<FaceComparison, ComparatorError> {
        debug!(
            model = %self.model,
            detector = %self.detector_backend,
            "Running DeepFace comparison"
        );

        let output = tokio::time::timeout(self.timeout, self.command(captured, reference).output())
            .await
            .map_err(|_| {
                ComparatorError::Failed(format!(
                    "Face comparison timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| {
                ComparatorError::Failed(format!("Failed to launch {}: {}", self.python, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match last_verdict(&stdout) {
            Some(Verdict::Success {
                verified,
                distance,
                threshold,
            }) => Ok(FaceComparison {
                verified,
                distance,
                threshold,
            }),
            Some(Verdict::NoFace { message }) => Err(ComparatorError::NoFaceDetected(message)),
            Some(Verdict::Error { message }) => Err(ComparatorError::Failed(message)),
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let tail = tail(stderr.trim(), STDERR_TAIL);
                warn!(status = %output.status, stderr = %tail, "Comparator produced no verdict");
                Err(ComparatorError::Failed(format!(
                    "Face comparator exited with {} without a verdict: {}",
                    output.status, tail
                )))
            }
        }
    }
}

/// Finds the last stdout line that parses as a verdict; earlier lines may be
/// model download progress or other library chatter.
fn last_verdict(stdout: &str) -> Option<Verdict> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str(line).ok())
}

fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
