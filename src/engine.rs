use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::types::{ConversionJob, ProgressMessage};

const TARGET_HEIGHT: u32 = 1080;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("HEIC decode failed: {0}")]
    Heif(#[from] libheif_rs::HeifError),
    #[error("decoded image has no interleaved pixel plane")]
    MissingPixelData,
    #[error("JPEG encode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct ConversionEngine {
    lib_heif: LibHeif,
}

impl ConversionEngine {
    pub fn new() -> Self {
        Self {
            lib_heif: LibHeif::new(),
        }
    }

    /// Runs one batch to completion. Every file gets a progress message,
    /// converted or not, and `Completed` is always the final message.
    pub fn convert_batch(&self, job: ConversionJob, progress_tx: Sender<ProgressMessage>) {
        let files = match list_heic_files(&job.folder) {
            Ok(files) => files,
            Err(e) => {
                error!("Failed to list {}: {}", job.folder.display(), e);
                let _ = progress_tx.send(ProgressMessage::Completed);
                return;
            }
        };

        let total = files.len();
        if total == 0 {
            let _ = progress_tx.send(ProgressMessage::Completed);
            return;
        }

        for (idx, input_file) in files.iter().enumerate() {
            match self.convert_single(input_file, job.reduce_to_1080p) {
                Ok(output) => {
                    debug!("{} -> {}", input_file.display(), output.display());
                }
                Err(e) => {
                    warn!("Skipping {}: {}", input_file.display(), e);
                }
            }

            let percent = ((idx + 1) * 100 / total) as u8;
            let file = input_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let _ = progress_tx.send(ProgressMessage::Progress { percent, file });
        }

        let _ = progress_tx.send(ProgressMessage::Completed);
    }

    fn convert_single(&self, input_file: &Path, reduce: bool) -> Result<PathBuf, ConvertError> {
        let output_path = output_path_for(input_file);
        let img = self.decode_heic(input_file)?;
        process_image(img, reduce, &output_path)?;
        Ok(output_path)
    }

    fn decode_heic(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
        let bytes = fs::read(path)?;
        let ctx = HeifContext::read_from_bytes(&bytes)?;
        let handle = ctx.primary_image_handle()?;
        let decoded = self
            .lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)?;

        let planes = decoded.planes();
        let plane = planes.interleaved.ok_or(ConvertError::MissingPixelData)?;

        // libheif rows are stride-padded; repack into a tight RGB buffer.
        let row_len = plane.width as usize * 3;
        let mut buf = Vec::with_capacity(row_len * plane.height as usize);
        for y in 0..plane.height as usize {
            let start = y * plane.stride;
            buf.extend_from_slice(&plane.data[start..start + row_len]);
        }

        let rgb = RgbImage::from_raw(plane.width, plane.height, buf)
            .ok_or(ConvertError::MissingPixelData)?;
        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

/// Non-recursive listing of `.heic` files (any case) in `folder`.
/// Order is whatever the directory yields.
pub fn list_heic_files(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_heic = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("heic"))
            .unwrap_or(false);
        if is_heic {
            files.push(path);
        }
    }
    Ok(files)
}

/// Same folder, same base name, `.jpg` extension. An existing output is
/// overwritten (last write wins).
fn output_path_for(input_file: &Path) -> PathBuf {
    input_file.with_extension("jpg")
}

/// Optionally downscales, then strips alpha and writes a JPEG.
fn process_image(img: DynamicImage, reduce: bool, output_path: &Path) -> Result<(), ConvertError> {
    let img = if reduce { downscale_to_1080p(img) } else { img };
    img.to_rgb8().save(output_path)?;
    Ok(())
}

/// Resizes to 1080 pixels high with Lanczos, preserving aspect ratio.
/// Images at or below 1080 are left untouched.
fn downscale_to_1080p(img: DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    if height <= TARGET_HEIGHT {
        return img;
    }
    let target_width = scaled_width(width, height);
    img.resize_exact(target_width, TARGET_HEIGHT, FilterType::Lanczos3)
}

fn scaled_width(width: u32, height: u32) -> u32 {
    (TARGET_HEIGHT as f64 * width as f64 / height as f64).round() as u32
}
