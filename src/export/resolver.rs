//! Export target resolution
//!
//! Decides which images are written, to which location and with which
//! format. With bundling enabled the bundle's aggregate settings apply to all
//! of its members; without bundling every image carries its own.

use std::collections::HashMap;

use log::{debug, warn};

use crate::bundle::Bundle;
use crate::selection::SelectionState;
use crate::{FormatId, ImageAnnotation, ImageRecord, LocationId};

/// Which bundles are considered for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Every bundle in the list
    #[default]
    All,
    /// Only the current selection
    Selected,
}

/// One image to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Image name as found in the library
    pub image: String,
    /// Name of the bundle the image is exported with
    pub bundle: String,
    pub location: LocationId,
    /// `None` copies the source file unchanged
    pub format: Option<FormatId>,
}

/// Targets plus the number of images left out and why
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub targets: Vec<ExportTarget>,
    /// Images whose export switch is off
    pub skipped_disabled: usize,
    /// Images with export enabled but no location
    pub skipped_no_location: usize,
}

impl Resolution {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn consider(&mut self, image: &ImageRecord, bundle: &str, settings: &ImageAnnotation) {
        if !settings.enable_export {
            self.skipped_disabled += 1;
            return;
        }
        let Some(location) = settings.export_location else {
            debug!("Skipping {}: no export location", image.name);
            self.skipped_no_location += 1;
            return;
        };
        self.targets.push(ExportTarget {
            image: image.name.clone(),
            bundle: bundle.to_string(),
            location,
            format: settings.export_format,
        });
    }
}

/// Resolve the images to export from the bundle list
///
/// Bundle members that are no longer in `images` are ignored.
#[must_use]
pub fn resolve_export_targets(
    bundles: &[Bundle],
    images: &[ImageRecord],
    mode: ExportMode,
    selection: &SelectionState,
    bundling_enabled: bool,
) -> Resolution {
    let by_name: HashMap<&str, &ImageRecord> =
        images.iter().map(|i| (i.name.as_str(), i)).collect();

    let candidates: Vec<&Bundle> = match mode {
        ExportMode::All => bundles.iter().collect(),
        ExportMode::Selected => selection
            .selected_indices(bundles)
            .into_iter()
            .map(|i| &bundles[i])
            .collect(),
    };

    let mut resolution = Resolution::default();
    for bundle in candidates {
        for member in &bundle.members {
            let Some(image) = by_name.get(member.as_str()) else {
                warn!("Bundle '{}' refers to missing image '{member}'", bundle.name);
                continue;
            };

            if bundling_enabled {
                let settings = ImageAnnotation {
                    enable_export: bundle.enable_export,
                    export_location: bundle.export_location,
                    export_format: bundle.export_format.or(image.annotation.export_format),
                };
                resolution.consider(image, &bundle.name, &settings);
            } else {
                resolution.consider(image, &bundle.name, &image.annotation);
            }
        }
    }

    debug!(
        "Resolved {} export target(s), {} disabled, {} without location",
        resolution.targets.len(),
        resolution.skipped_disabled,
        resolution.skipped_no_location
    );
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{BundleOptions, build_bundles};
    use crate::testing::images;

    fn bundled(imgs: &[ImageRecord], enabled: bool) -> Vec<Bundle> {
        let options = BundleOptions {
            bundling_enabled: enabled,
            case_sensitive: true,
            include_hidden: false,
        };
        build_bundles(imgs, &["BaseColor", "Normal"], options)
    }

    #[test]
    fn test_bundle_settings_apply_to_all_members() {
        let imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let mut bundles = bundled(&imgs, true);
        let location = LocationId::new();
        bundles[0].enable_export = true;
        bundles[0].export_location = Some(location);

        let res = resolve_export_targets(&bundles, &imgs, ExportMode::All, &SelectionState::default(), true);

        assert_eq!(res.targets.len(), 2);
        assert!(res.targets.iter().all(|t| t.location == location && t.bundle == "Rock"));
        assert!(res.targets.iter().all(|t| t.format.is_none()));
    }

    #[test]
    fn test_bundle_format_falls_back_to_image_format() {
        let mut imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let own = FormatId::new();
        imgs[1].annotation.export_format = Some(own);
        let mut bundles = bundled(&imgs, true);
        bundles[0].enable_export = true;
        bundles[0].export_location = Some(LocationId::new());

        let res = resolve_export_targets(&bundles, &imgs, ExportMode::All, &SelectionState::default(), true);
        assert_eq!(res.targets[0].format, None);
        assert_eq!(res.targets[1].format, Some(own));

        let shared = FormatId::new();
        bundles[0].export_format = Some(shared);
        let res = resolve_export_targets(&bundles, &imgs, ExportMode::All, &SelectionState::default(), true);
        assert!(res.targets.iter().all(|t| t.format == Some(shared)));
    }

    #[test]
    fn test_unbundled_uses_image_annotations() {
        let mut imgs = images(&["A.png", "B.png", "C.png"]);
        let location = LocationId::new();
        imgs[0].annotation.enable_export = true;
        imgs[0].annotation.export_location = Some(location);
        imgs[1].annotation.enable_export = true;
        let bundles = bundled(&imgs, false);

        let res = resolve_export_targets(&bundles, &imgs, ExportMode::All, &SelectionState::default(), false);

        assert_eq!(res.targets.len(), 1);
        assert_eq!(res.targets[0].image, "A.png");
        assert_eq!(res.skipped_no_location, 1);
        assert_eq!(res.skipped_disabled, 1);
    }

    #[test]
    fn test_enabled_without_location_is_counted() {
        let imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png", "Sky.png"]);
        let mut bundles = bundled(&imgs, true);
        bundles[0].enable_export = true;

        let res = resolve_export_targets(&bundles, &imgs, ExportMode::All, &SelectionState::default(), true);

        assert!(res.is_empty());
        assert_eq!(res.skipped_no_location, 2);
        assert_eq!(res.skipped_disabled, 1);
    }

    #[test]
    fn test_selected_mode_limits_candidates() {
        let imgs = images(&["Rock_BaseColor.png", "Metal_BaseColor.png", "Sky.png"]);
        let mut bundles = bundled(&imgs, true);
        for b in &mut bundles {
            b.enable_export = true;
            b.export_location = Some(LocationId::new());
        }
        let selection = SelectionState { cursor: 1, ..Default::default() };

        let res = resolve_export_targets(&bundles, &imgs, ExportMode::Selected, &selection, true);
        assert_eq!(res.targets.len(), 1);
        assert_eq!(res.targets[0].bundle, "Metal");

        let multi = SelectionState { multi_select_enabled: true, ..Default::default() };
        bundles[0].is_selected = true;
        bundles[2].is_selected = true;
        let res = resolve_export_targets(&bundles, &imgs, ExportMode::Selected, &multi, true);
        let names: Vec<&str> = res.targets.iter().map(|t| t.image.as_str()).collect();
        assert_eq!(names, ["Rock_BaseColor.png", "Sky.png"]);
    }

    #[test]
    fn test_missing_member_is_ignored() {
        let imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let mut bundles = bundled(&imgs, true);
        bundles[0].enable_export = true;
        bundles[0].export_location = Some(LocationId::new());

        let res = resolve_export_targets(&bundles, &imgs[..1], ExportMode::All, &SelectionState::default(), true);
        assert_eq!(res.targets.len(), 1);
    }

    #[test]
    fn test_nothing_to_export() {
        let res = resolve_export_targets(&[], &[], ExportMode::All, &SelectionState::default(), true);
        assert_eq!(res, Resolution::default());
    }
}
