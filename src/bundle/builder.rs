use indexmap::IndexMap;
use log::debug;

use super::Bundle;
use super::matching::find_suffix_match;
use crate::ImageRecord;

/// Switches controlling how images are grouped into bundles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleOptions {
    /// Group images by base name; when off every image is its own bundle
    pub bundling_enabled: bool,
    /// Match suffix tokens at the end of the name only, respecting case
    pub case_sensitive: bool,
    /// Keep images whose name starts with the hidden prefix
    pub include_hidden: bool,
}

/// Build the bundle list for `images`
///
/// Bundles keep the order in which their first member appears. A group with a
/// single member is named after that member's full name so names like `Rock`
/// only show up when there is actually something grouped under them. Each
/// bundle starts with the export settings of its first member.
#[must_use]
pub fn build_bundles<S: AsRef<str>>(
    images: &[ImageRecord],
    suffix_tokens: &[S],
    options: BundleOptions,
) -> Vec<Bundle> {
    let visible = images
        .iter()
        .filter(|image| options.include_hidden || !image.is_hidden());

    if !options.bundling_enabled {
        return visible.map(singleton).collect();
    }

    let mut groups: IndexMap<String, Vec<&ImageRecord>> = IndexMap::new();
    for image in visible {
        let filename = image.stem();
        // Unmatched images keep their full name so same-stem files stay apart
        let key = find_suffix_match(filename, suffix_tokens, options.case_sensitive)
            .map_or_else(|| image.name.clone(), |m| m.residual(filename));
        groups.entry(key).or_default().push(image);
    }

    debug!("Grouped {} image(s) into {} bundle(s)", images.len(), groups.len());

    groups
        .into_iter()
        .map(|(name, members)| match members.as_slice() {
            [only] => singleton(only),
            _ => {
                let mut bundle = inherit(Bundle::new(name), members[0]);
                bundle.members = members.iter().map(|m| m.name.clone()).collect();
                bundle
            }
        })
        .collect()
}

fn singleton(image: &ImageRecord) -> Bundle {
    let mut bundle = inherit(Bundle::new(image.name.clone()), image);
    bundle.members.push(image.name.clone());
    bundle
}

fn inherit(mut bundle: Bundle, first: &ImageRecord) -> Bundle {
    bundle.enable_export = first.annotation.enable_export;
    bundle.export_location = first.annotation.export_location;
    bundle.export_format = first.annotation.export_format;
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::images;
    use crate::LocationId;
    use std::collections::HashSet;

    const ENABLED: BundleOptions = BundleOptions {
        bundling_enabled: true,
        case_sensitive: true,
        include_hidden: false,
    };

    fn names(bundles: &[Bundle]) -> Vec<&str> {
        bundles.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_rock_and_metal_scenario() {
        let imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png", "Metal_BaseColor.png"]);
        let bundles = build_bundles(&imgs, &["BaseColor", "Normal"], ENABLED);

        assert_eq!(names(&bundles), vec!["Rock", "Metal_BaseColor.png"]);
        assert_eq!(bundles[0].members, vec!["Rock_BaseColor.png", "Rock_Normal.png"]);
        assert_eq!(bundles[1].members, vec!["Metal_BaseColor.png"]);
    }

    #[test]
    fn test_bundling_disabled_gives_one_bundle_per_image() {
        let imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let options = BundleOptions { bundling_enabled: false, ..ENABLED };
        let bundles = build_bundles(&imgs, &["BaseColor", "Normal"], options);

        assert_eq!(names(&bundles), vec!["Rock_BaseColor.png", "Rock_Normal.png"]);
        assert!(bundles.iter().all(|b| b.len() == 1));
    }

    #[test]
    fn test_hidden_images_filtered_unless_included() {
        let imgs = images(&[".Viewer Node.png", "Rock_Normal.png"]);
        let tokens = ["Normal"];

        let bundles = build_bundles(&imgs, &tokens, ENABLED);
        assert_eq!(names(&bundles), vec!["Rock_Normal.png"]);

        let options = BundleOptions { include_hidden: true, ..ENABLED };
        let bundles = build_bundles(&imgs, &tokens, options);
        assert_eq!(names(&bundles), vec![".Viewer Node.png", "Rock_Normal.png"]);
    }

    #[test]
    fn test_empty_tokens_degenerate_to_singletons() {
        let imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png", "Metal.png"]);
        let none: [&str; 0] = [];
        let bundles = build_bundles(&imgs, &none, ENABLED);

        assert_eq!(
            names(&bundles),
            vec!["Rock_BaseColor.png", "Rock_Normal.png", "Metal.png"]
        );
    }

    #[test]
    fn test_unmatched_images_keep_their_name() {
        let imgs = images(&["Sky.png", "Rock_Normal.png", "Decal.jpg"]);
        let bundles = build_bundles(&imgs, &["BaseColor"], ENABLED);

        for (bundle, image) in bundles.iter().zip(&imgs) {
            assert_eq!(bundle.name, image.name);
            assert_eq!(bundle.members, vec![image.name.clone()]);
        }
    }

    #[test]
    fn test_same_stem_different_extension_stay_apart() {
        let imgs = images(&["Rock.png", "Rock.tga"]);
        let none: [&str; 0] = [];

        for bundles in [
            build_bundles(&imgs, &none, ENABLED),
            build_bundles(&imgs, &["Normal"], ENABLED),
        ] {
            assert_eq!(names(&bundles), vec!["Rock.png", "Rock.tga"]);
            assert!(bundles.iter().all(|b| b.len() == 1));
        }
    }

    #[test]
    fn test_unmatched_image_does_not_join_residual_group() {
        let imgs = images(&["B.png", "B_Height.png", "B_Normal.png"]);
        let bundles = build_bundles(&imgs, &["Normal", "Height"], ENABLED);

        assert_eq!(names(&bundles), vec!["B.png", "B"]);
        assert_eq!(bundles[1].members, vec!["B_Height.png", "B_Normal.png"]);
    }

    #[test]
    fn test_token_order_changes_grouping() {
        let imgs = images(&["Wall_BaseColor.png", "Wall_Base_Height.png", "Wall_Height.png"]);

        let color_first = build_bundles(&imgs, &["Color", "BaseColor", "Height"], ENABLED);
        let base_first = build_bundles(&imgs, &["BaseColor", "Color", "Height"], ENABLED);

        // "Color" leaves "Wall_Base", which pairs with "Wall_Base_Height"
        assert_eq!(names(&color_first), vec!["Wall_Base", "Wall_Height.png"]);
        assert_eq!(names(&base_first), vec!["Wall", "Wall_Base_Height.png"]);
    }

    #[test]
    fn test_case_insensitive_grouping() {
        let imgs = images(&["rock_basecolor.png", "rock_NORMAL.png", "Rock_Normal_detail.png"]);
        let options = BundleOptions { case_sensitive: false, ..ENABLED };
        let bundles = build_bundles(&imgs, &["BaseColor", "Normal"], options);

        assert_eq!(names(&bundles), vec!["rock", "Rock_Normal_detail.png"]);
        assert_eq!(bundles[0].members, vec!["rock_basecolor.png", "rock_NORMAL.png"]);
    }

    #[test]
    fn test_bundle_inherits_first_member_settings() {
        let mut imgs = images(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let location = LocationId::new();
        imgs[0].annotation.enable_export = true;
        imgs[0].annotation.export_location = Some(location);

        let bundles = build_bundles(&imgs, &["BaseColor", "Normal"], ENABLED);
        assert_eq!(bundles.len(), 1);
        assert!(bundles[0].enable_export);
        assert_eq!(bundles[0].export_location, Some(location));
        assert!(!bundles[0].is_selected);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let imgs = images(&["A_Normal.png", "B.png", "A_Height.png", ".hidden.png"]);
        let tokens = ["Normal", "Height"];

        assert_eq!(
            build_bundles(&imgs, &tokens, ENABLED),
            build_bundles(&imgs, &tokens, ENABLED)
        );
    }

    #[test]
    fn test_partition_invariant() {
        let imgs = images(&[
            "A_Normal.png", "B.png", "A_Height.png", "C_Normal.tga", ".hidden.png", "B_Height.png",
        ]);
        let bundles = build_bundles(&imgs, &["Normal", "Height"], ENABLED);

        let members: Vec<&String> = bundles.iter().flat_map(|b| &b.members).collect();
        let unique: HashSet<&String> = members.iter().copied().collect();
        assert_eq!(members.len(), unique.len());

        let expected: HashSet<&String> = imgs
            .iter()
            .filter(|i| !i.is_hidden())
            .map(|i| &i.name)
            .collect();
        assert_eq!(unique, expected);
    }
}
