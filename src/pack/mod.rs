//! Channel packing
//!
//! Builds a new image per bundle whose R, G, B and A channels are taken from
//! different members of the bundle, e.g. ambient occlusion, roughness and
//! metalness combined into one "ORM" texture.

mod pipeline;
pub mod presets;
mod settings;

pub use pipeline::{Layer, pack_channels};
pub use presets::{PackPreset, list_presets, load_preset, remove_preset, save_preset};
pub use settings::{Channel, ChannelSource, PackSettings};

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba32FImage};
use log::{debug, info};
use thiserror::Error;

use crate::bundle::Bundle;
use crate::export::{ExportContext, ExportError, TagContext, resolve_path};
use crate::{ImageAnnotation, ImageRecord};

/// Channel packing errors
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Image packing requires Bundles to be enabled.")]
    BundlesDisabled,

    /// The output location could not be resolved
    #[error("{0}")]
    OutputPath(#[from] ExportError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pack preset '{0}' not found")]
    PresetNotFound(String),

    #[error("Invalid pack preset name '{0}'")]
    InvalidPresetName(String),

    #[error("Failed to read pack preset: {0}")]
    PresetFormat(#[from] config::ConfigError),

    #[error("Failed to write pack preset: {0}")]
    PresetWrite(#[from] toml::ser::Error),
}

/// Outcome of a pack run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Packed images written for the first time
    pub new_images: Vec<PathBuf>,
    /// Packed images that replaced an existing file
    pub updated_images: Vec<PathBuf>,
    /// Bundles with no member matching any channel source
    pub not_found: usize,
    /// Bundles skipped because the packed image exists and overwrite is off
    pub not_overwritten: usize,
}

impl PackReport {
    #[must_use]
    pub fn packed_count(&self) -> usize {
        self.new_images.len() + self.updated_images.len()
    }
}

/// First bundle member whose file name ends with one of `tokens`
fn find_source<'a>(bundle: &Bundle, images: &'a [ImageRecord], tokens: &[String]) -> Option<&'a ImageRecord> {
    if tokens.is_empty() {
        return None;
    }
    bundle.members.iter().find_map(|member| {
        let image = images.iter().find(|i| &i.name == member)?;
        let stem = image.stem();
        tokens.iter().any(|t| stem.ends_with(t.as_str())).then_some(image)
    })
}

/// Pack the bundles at `indices`
///
/// New images are appended to `images` and to their bundle when
/// `settings.add_to_bundle` is set and they were written into the project
/// source directory; they inherit the export switch and location of the
/// bundle's first member.
///
/// # Errors
///
/// Returns `PackError::BundlesDisabled` when bundling is off. Decoding,
/// encoding and path errors abort the run.
pub fn pack_bundles(
    bundles: &mut [Bundle],
    images: &mut Vec<ImageRecord>,
    indices: &[usize],
    settings: &PackSettings,
    bundling_enabled: bool,
    context: &ExportContext<'_>,
) -> Result<PackReport, PackError> {
    if !bundling_enabled {
        return Err(PackError::BundlesDisabled);
    }

    let mut report = PackReport::default();
    for &index in indices {
        let Some(bundle) = bundles.get(index) else {
            continue;
        };

        let tags = TagContext {
            bundle_name: &bundle.name,
            project_name: context.project_name,
            base_dir: context.base_dir,
            now: context.now,
        };
        let directory = resolve_path(&settings.output_path, &tags, context.replace_invalid_chars)?;
        let file_name = format!("{}{}.png", bundle.name, settings.packed_suffix);
        let path = directory.join(&file_name);

        let exists = path.exists();
        if exists && !settings.overwrite {
            debug!("{} exists, not overwriting", path.display());
            report.not_overwritten += 1;
            continue;
        }

        let mut loaded: [Option<(Rgba32FImage, &ChannelSource)>; 4] = [None, None, None, None];
        for (slot, output) in loaded.iter_mut().zip(Channel::ALL) {
            let source = settings.source(output);
            if let Some(image) = find_source(bundle, images, &source.sources) {
                *slot = Some((image::open(&image.path)?.to_rgba32f(), source));
            }
        }

        let layers = [0, 1, 2, 3].map(|i| {
            loaded[i].as_ref().map(|(image, source)| Layer {
                image,
                channel: source.channel,
                invert: source.invert,
            })
        });
        let Some(packed) = pack_channels(layers) else {
            debug!("No channel sources found in bundle {}", bundle.name);
            report.not_found += 1;
            continue;
        };

        DynamicImage::ImageRgba32F(packed)
            .to_rgba8()
            .save_with_format(&path, ImageFormat::Png)?;
        info!("Packed {} into {}", bundle.name, path.display());

        if exists {
            report.updated_images.push(path);
            continue;
        }

        let inside_source = path.parent().is_some_and(|p| same_dir(p, context.base_dir));
        if settings.add_to_bundle && inside_source && !images.iter().any(|i| i.name == file_name) {
            let inherited = bundle
                .members
                .first()
                .and_then(|m| images.iter().find(|i| &i.name == m))
                .map(|first| ImageAnnotation {
                    enable_export: first.annotation.enable_export,
                    export_location: first.annotation.export_location,
                    export_format: None,
                })
                .unwrap_or_default();

            let mut record = ImageRecord::new(file_name.clone(), path.clone());
            record.annotation = inherited;
            images.push(record);
            bundles[index].members.push(file_name);
        }
        report.new_images.push(path);
    }

    Ok(report)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
