//! Writing generated views to disk.

use crate::{
    encoder::decode_data_url,
    error::{Result, ViewsError},
    models::GenerationRun,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/avif" => "avif",
        "image/heic" | "image/heif" => "heic",
        _ => "bin",
    }
}

fn decode_view(uri: &str) -> Result<(Vec<u8>, String)> {
    let image = decode_data_url(uri)?;
    let bytes = STANDARD
        .decode(&image.payload)
        .map_err(|e| ViewsError::DecodeError(format!("invalid base64 payload: {}", e)))?;
    Ok((bytes, image.mime_type))
}

/// Save every populated view as `<stem>_<view>.<ext>` under `dir`. Failed
/// views and views whose data does not decode are skipped; only filesystem
/// errors abort. Returns the written paths in catalog order.
pub fn save_run(run: &GenerationRun, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for result in run {
        let Some(uri) = &result.image_data_uri else {
            continue;
        };

        let (bytes, mime_type) = match decode_view(uri) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::error!("Skipping {} view: {}", result.label, e);
                continue;
            }
        };

        let path = dir.join(format!(
            "{}_{}.{}",
            stem,
            result.label.slug(),
            extension_for_mime(&mime_type)
        ));
        fs::write(&path, bytes)?;
        log::info!("💾 {} view saved to: {}", result.label, path.display());
        written.push(path);
    }

    Ok(written)
}
