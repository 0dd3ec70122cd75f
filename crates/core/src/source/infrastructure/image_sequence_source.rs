use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::color_format::ColorFormat;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::source::domain::frame_source::FrameSource;

/// Frame source over a still image or a directory of image frames.
///
/// A single image file is treated as a one-frame video. A directory is an
/// image-sequence video whose frames are its image files in file-name
/// order. Frames are decoded on demand with the `image` crate and always
/// come out as RGB; only the first frame's header is read at open time.
pub struct ImageSequenceSource {
    metadata: SourceMetadata,
    frame_paths: Vec<PathBuf>,
}

impl ImageSequenceSource {
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let frame_paths = if path.is_dir() {
            list_frames(path)?
        } else {
            fs::metadata(path).map_err(|source| DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if is_image(path) {
                vec![path.to_path_buf()]
            } else {
                Vec::new()
            }
        };

        let first = frame_paths.first().ok_or_else(|| DatasetError::EmptySource {
            path: path.to_path_buf(),
        })?;
        let (width, height) =
            image::image_dimensions(first).map_err(|source| DatasetError::Decode {
                path: first.clone(),
                source,
            })?;

        let name = if path.is_dir() {
            path.file_name()
        } else {
            path.file_stem()
        }
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

        log::debug!(
            "Opened {} ({} frames, {}x{})",
            path.display(),
            frame_paths.len(),
            width,
            height
        );

        Ok(Self {
            metadata: SourceMetadata {
                name,
                width,
                height,
                total_frames: frame_paths.len(),
                source_path: Some(path.to_path_buf()),
            },
            frame_paths,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn read_frame(&self, index: usize) -> Result<Frame, DatasetError> {
        let path = self
            .frame_paths
            .get(index)
            .ok_or_else(|| DatasetError::FrameOutOfRange {
                source_name: self.metadata.name.clone(),
                frame: index,
                total: self.frame_paths.len(),
            })?;
        let rgb = image::open(path)
            .map_err(|source| DatasetError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(
            rgb.into_raw(),
            width,
            height,
            ColorFormat::Rgb,
            index,
        ))
    }
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| DatasetError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
