//! Audio upload to the pipeline bucket (Imperative Shell).

use std::path::{Path, PathBuf};
use std::time::Duration;

use aws_sdk_s3::primitives::ByteStream;

use super::deploy::sdk_error;
use super::error::{PipelineError, Result};
use crate::prelude::*;

/// List the files to upload: regular, non-hidden files sorted by name.
pub fn collect_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::AudioDirMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}

/// Object key for an uploaded file: its file name.
pub fn object_key(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Upload every audio file, waiting `delay` between consecutive uploads.
///
/// Each upload triggers one pipeline run, so the delay keeps the function
/// from transcribing a whole directory at once. A failed upload does not stop
/// the rest; the count of failures is returned as an error at the end.
pub async fn upload_audio(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    dir: &Path,
    delay: Duration,
    global: &crate::Global,
) -> Result<usize> {
    let files = collect_audio_files(dir)?;
    let mut failed = 0;

    for (index, path) in files.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            if global.is_verbose() {
                aprintln!("    waiting {}s", delay.as_secs());
            }
            tokio::time::sleep(delay).await;
        }

        let Some(key) = object_key(path) else {
            continue;
        };

        match upload_file(client, bucket, &key, path).await {
            Ok(()) => {
                if !global.is_silent() {
                    aprintln!("    {} s3://{}/{}", p_g("↑"), bucket, key);
                }
            }
            Err(err) => {
                failed += 1;
                if !global.is_silent() {
                    aprintln!("    {} {}: {}", p_r("✗"), key, err);
                }
            }
        }
    }

    if failed > 0 {
        return Err(PipelineError::UploadIncomplete {
            failed,
            total: files.len(),
        });
    }

    Ok(files.len())
}

async fn upload_file(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    path: &Path,
) -> Result<()> {
    let body = ByteStream::from_path(path)
        .await
        .map_err(|e| PipelineError::AwsSdk(e.to_string()))?;

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body)
        .send()
        .await
        .map_err(sdk_error)?;

    Ok(())
}
