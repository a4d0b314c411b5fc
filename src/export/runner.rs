//! Writes resolved export targets to disk

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{info, warn};

use super::formats::ExportFormat;
use super::paths::{TagContext, resolve_path, sanitize_name};
use super::resolver::Resolution;
use super::{ExportError, ExportLocation};
use crate::ImageRecord;
use crate::lists::PresetList;

/// Project values used while filling location templates
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    pub project_name: &'a str,
    /// Project source directory, base of `//` templates
    pub base_dir: &'a Path,
    pub now: DateTime<Local>,
    pub replace_invalid_chars: bool,
}

/// Outcome of an export run
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Files written
    pub exported: Vec<PathBuf>,
    pub skipped_disabled: usize,
    pub skipped_no_location: usize,
    /// Image name and the error that stopped it
    pub failures: Vec<(String, ExportError)>,
}

impl ExportReport {
    #[must_use]
    pub fn exported_count(&self) -> usize {
        self.exported.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Export every resolved target
///
/// Targets whose location no longer exists count as skipped. A failing image
/// is recorded in the report and the run continues.
///
/// # Errors
///
/// Returns `ExportError::EmptyLocationPath` as soon as a used location has no
/// path; nothing after that point is written.
pub fn export_targets(
    resolution: &Resolution,
    images: &[ImageRecord],
    locations: &PresetList<ExportLocation>,
    formats: &PresetList<ExportFormat>,
    context: &ExportContext<'_>,
) -> Result<ExportReport, ExportError> {
    let mut report = ExportReport {
        skipped_disabled: resolution.skipped_disabled,
        skipped_no_location: resolution.skipped_no_location,
        ..Default::default()
    };

    let by_name: HashMap<&str, &ImageRecord> =
        images.iter().map(|i| (i.name.as_str(), i)).collect();
    let mut directories: HashMap<(crate::LocationId, &str), PathBuf> = HashMap::new();

    for target in &resolution.targets {
        let Some(location) = locations.iter().find(|l| l.id == target.location) else {
            warn!("Export location of {} no longer exists", target.image);
            report.skipped_no_location += 1;
            continue;
        };
        let Some(image) = by_name.get(target.image.as_str()) else {
            warn!("Image {} is no longer in the library", target.image);
            continue;
        };

        let key = (location.id, target.bundle.as_str());
        let dir = match directories.get(&key) {
            Some(dir) => dir.clone(),
            None => {
                let tags = TagContext {
                    bundle_name: &target.bundle,
                    project_name: context.project_name,
                    base_dir: context.base_dir,
                    now: context.now,
                };
                let dir = match resolve_path(&location.path, &tags, context.replace_invalid_chars) {
                    Ok(dir) => dir,
                    Err(ExportError::EmptyLocationPath) => return Err(ExportError::EmptyLocationPath),
                    Err(e) => {
                        report.failures.push((image.name.clone(), e));
                        continue;
                    }
                };
                directories.insert(key, dir.clone());
                dir
            }
        };

        let format = target
            .format
            .and_then(|id| formats.iter().find(|f| f.id == id));
        match write_image(image, &dir, format, context.replace_invalid_chars) {
            Ok(path) => {
                info!("Exported {} to {}", image.name, path.display());
                report.exported.push(path);
            }
            Err(e) => {
                warn!("Failed to export {}: {e}", image.name);
                report.failures.push((image.name.clone(), e));
            }
        }
    }

    Ok(report)
}

/// Copy or re-encode one image into `dir`, returning the written path
fn write_image(
    image: &ImageRecord,
    dir: &Path,
    format: Option<&ExportFormat>,
    replace_invalid_chars: bool,
) -> Result<PathBuf, ExportError> {
    let clean = |name: &str| {
        if replace_invalid_chars {
            sanitize_name(name)
        } else {
            name.to_string()
        }
    };

    match format {
        None => {
            let path = dir.join(clean(&image.name));
            fs::copy(&image.path, &path)?;
            Ok(path)
        }
        Some(format) => {
            let path = dir.join(format.file_name(&clean(image.stem())));
            let decoded = image::open(&image.path)?;
            format.encode(&decoded, &path)?;
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::formats::FileFormat;
    use crate::export::resolver::ExportTarget;
    use crate::testing::write_png;
    use crate::{FormatId, LocationId};
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
        images: Vec<ImageRecord>,
        locations: PresetList<ExportLocation>,
        formats: PresetList<ExportFormat>,
    }

    impl Fixture {
        fn new(names: &[&str]) -> Self {
            let tmp = TempDir::new().unwrap();
            let src = tmp.path().join("src");
            fs::create_dir_all(&src).unwrap();
            let images = names
                .iter()
                .map(|n| {
                    let path = src.join(n);
                    write_png(&path, 4, 4, [10, 20, 30, 255]);
                    ImageRecord::new(*n, path)
                })
                .collect();
            let out = format!("{}/out/^bundle_name^", tmp.path().display());
            Self {
                tmp,
                images,
                locations: PresetList::from_items(vec![ExportLocation::new("Out", out)]),
                formats: PresetList::new(),
            }
        }

        fn context(&self) -> ExportContext<'_> {
            ExportContext {
                project_name: "castle",
                base_dir: self.tmp.path(),
                now: Local::now(),
                replace_invalid_chars: true,
            }
        }

        fn target(&self, image: &str, bundle: &str, format: Option<FormatId>) -> ExportTarget {
            ExportTarget {
                image: image.to_string(),
                bundle: bundle.to_string(),
                location: self.locations.items()[0].id,
                format,
            }
        }
    }

    #[test]
    fn test_copy_without_format() {
        let fx = Fixture::new(&["Rock_BaseColor.png"]);
        let resolution = Resolution {
            targets: vec![fx.target("Rock_BaseColor.png", "Rock", None)],
            ..Default::default()
        };

        let report = export_targets(&resolution, &fx.images, &fx.locations, &fx.formats, &fx.context()).unwrap();

        let expected = fx.tmp.path().join("out").join("Rock").join("Rock_BaseColor.png");
        assert_eq!(report.exported, vec![expected.clone()]);
        assert_eq!(fs::read(&expected).unwrap(), fs::read(&fx.images[0].path).unwrap());
    }

    #[test]
    fn test_reencode_with_format() {
        let mut fx = Fixture::new(&["Rock_Normal.png"]);
        let mut format = ExportFormat::new("Jpeg");
        format.file_format = FileFormat::Jpeg;
        format.normalize();
        let id = format.id;
        fx.formats.push(format);

        let resolution = Resolution {
            targets: vec![fx.target("Rock_Normal.png", "Rock", Some(id))],
            ..Default::default()
        };
        let report = export_targets(&resolution, &fx.images, &fx.locations, &fx.formats, &fx.context()).unwrap();

        let expected = fx.tmp.path().join("out").join("Rock").join("Rock_Normal.jpg");
        assert_eq!(report.exported, vec![expected.clone()]);
        let decoded = image::open(&expected).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[test]
    fn test_unsupported_format_is_a_failure_not_an_abort() {
        let mut fx = Fixture::new(&["A.png", "B.png"]);
        let mut format = ExportFormat::new("J2K");
        format.file_format = FileFormat::Jpeg2000;
        let id = format.id;
        fx.formats.push(format);

        let resolution = Resolution {
            targets: vec![fx.target("A.png", "A.png", Some(id)), fx.target("B.png", "B.png", None)],
            ..Default::default()
        };
        let report = export_targets(&resolution, &fx.images, &fx.locations, &fx.formats, &fx.context()).unwrap();

        assert_eq!(report.exported_count(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].1, ExportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_empty_location_path_aborts() {
        let mut fx = Fixture::new(&["A.png"]);
        fx.locations.get_mut(0).unwrap().path.clear();
        let resolution = Resolution {
            targets: vec![fx.target("A.png", "A.png", None)],
            ..Default::default()
        };

        let result = export_targets(&resolution, &fx.images, &fx.locations, &fx.formats, &fx.context());
        assert!(matches!(result, Err(ExportError::EmptyLocationPath)));
    }

    #[test]
    fn test_deleted_location_counts_as_skipped() {
        let fx = Fixture::new(&["A.png"]);
        let resolution = Resolution {
            targets: vec![ExportTarget {
                image: "A.png".into(),
                bundle: "A.png".into(),
                location: LocationId::new(),
                format: None,
            }],
            skipped_no_location: 2,
            skipped_disabled: 1,
        };

        let report = export_targets(&resolution, &fx.images, &fx.locations, &fx.formats, &fx.context()).unwrap();
        assert_eq!(report.exported_count(), 0);
        assert_eq!(report.skipped_no_location, 3);
        assert_eq!(report.skipped_disabled, 1);
    }
}
