//! Project session
//!
//! A [`Session`] holds the project's [`FileData`], the images found in the
//! library and the suffix tokens, and is the only place that mutates them.
//! Commands load a session, apply one operation and persist it again.

mod data;

pub use data::FileData;

use std::collections::HashSet;

use chrono::Local;
use log::{debug, info};

use crate::bundle::{Bundle, BundleOptions, build_bundles, find_suffix_match};
use crate::export::{
    ExportContext, ExportFormat, ExportLocation, ExportMode, ExportReport, PathTag,
    append_path_tag, export_targets, resolve_export_targets,
};
use crate::lists::{Move, PresetList};
use crate::pack::{Channel, PackReport, pack_bundles};
use crate::selection::ExportField;
use crate::{FormatId, ImageRecord, LocationId, PakError, split_extension};

type Result<T> = std::result::Result<T, PakError>;

/// Keyword accepted in place of a location or format name
pub const NONE_KEYWORD: &str = "none";

/// A planned image rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// In-memory project state
#[derive(Debug, Clone)]
pub struct Session {
    pub data: FileData,
    pub images: Vec<ImageRecord>,
    suffix_tokens: PresetList<String>,
}

fn bad_index(kind: &str, index: usize, len: usize) -> PakError {
    PakError::InvalidInput(format!("No {kind} at index {index} (the list has {len} entries)"))
}

impl Session {
    #[must_use]
    pub fn new(data: FileData, images: Vec<ImageRecord>, suffix_tokens: PresetList<String>) -> Self {
        Self {
            data,
            images,
            suffix_tokens,
        }
    }

    #[must_use]
    pub const fn suffix_tokens(&self) -> &PresetList<String> {
        &self.suffix_tokens
    }

    #[must_use]
    pub const fn bundle_options(&self) -> BundleOptions {
        BundleOptions {
            bundling_enabled: self.data.enable_bundles,
            case_sensitive: self.data.case_sensitive_matching,
            include_hidden: self.data.enable_hidden,
        }
    }

    /// Run `f` with the internal update flag set
    ///
    /// Proxy and bundle writes made while the flag is set do not fan out.
    pub fn with_internal_update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.data.selection.internal_update = true;
        let result = f(self);
        self.data.selection.internal_update = false;
        result
    }

    /// Rebuild the bundle list from the images
    pub fn refresh(&mut self) {
        self.with_internal_update(|s| {
            s.data.bundles = build_bundles(&s.images, s.suffix_tokens.items(), s.bundle_options());
            s.data.selection.clamp_cursor(s.data.bundles.len());
            s.data.selection.proxy.reset();
        });
        debug!("Refreshed {} bundle(s)", self.data.bundles.len());
    }

    /// Flip bundling and rebuild; returns the new state
    pub fn toggle_bundles(&mut self) -> bool {
        self.data.enable_bundles = !self.data.enable_bundles;
        self.refresh();
        self.data.enable_bundles
    }

    /// Flip hidden images and rebuild; returns the new state
    pub fn toggle_hidden(&mut self) -> bool {
        self.data.enable_hidden = !self.data.enable_hidden;
        self.refresh();
        self.data.enable_hidden
    }

    /// Flip case sensitive matching and rebuild; returns the new state
    pub fn toggle_case_sensitive(&mut self) -> bool {
        self.data.case_sensitive_matching = !self.data.case_sensitive_matching;
        self.refresh();
        self.data.case_sensitive_matching
    }

    /// Flip multi-select; returns the new state
    pub fn toggle_multiselect(&mut self) -> bool {
        self.data.selection.toggle_multi_select();
        self.data.selection.multi_select_enabled
    }

    /// Move the bundle cursor
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the bundle list.
    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        let len = self.data.bundles.len();
        if self.data.selection.set_cursor(index, len) {
            Ok(())
        } else {
            Err(bad_index("bundle", index, len))
        }
    }

    /// Check or uncheck a bundle for multi-select
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the bundle list.
    pub fn set_selected(&mut self, index: usize, checked: bool) -> Result<()> {
        let len = self.data.bundles.len();
        if self.data.selection.set_checked(&mut self.data.bundles, index, checked) {
            Ok(())
        } else {
            Err(bad_index("bundle", index, len))
        }
    }

    /// Write a selection proxy field; returns the number of images updated
    pub fn write_proxy(&mut self, field: ExportField) -> usize {
        self.data
            .selection
            .write_proxy(field, &mut self.data.bundles, &mut self.images)
    }

    /// Write an export setting on one bundle row
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the bundle list.
    pub fn set_bundle_field(&mut self, index: usize, field: ExportField) -> Result<usize> {
        let len = self.data.bundles.len();
        if index >= len {
            return Err(bad_index("bundle", index, len));
        }
        Ok(self
            .data
            .selection
            .write_bundle(index, field, &mut self.data.bundles, &mut self.images))
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the bundle list.
    pub fn set_bundle_enable_export(&mut self, index: usize, enable: bool) -> Result<usize> {
        self.set_bundle_field(index, ExportField::EnableExport(enable))
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the bundle list.
    pub fn set_bundle_location(&mut self, index: usize, location: Option<LocationId>) -> Result<usize> {
        self.set_bundle_field(index, ExportField::ExportLocation(location))
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the bundle list.
    pub fn set_bundle_format(&mut self, index: usize, format: Option<FormatId>) -> Result<usize> {
        self.set_bundle_field(index, ExportField::ExportFormat(format))
    }

    /// The selected bundles
    #[must_use]
    pub fn selection(&self) -> Vec<&Bundle> {
        self.data
            .selection
            .selected_indices(&self.data.bundles)
            .into_iter()
            .map(|i| &self.data.bundles[i])
            .collect()
    }

    /// Number of distinct images in the selection
    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.data.selection.selection_count(&self.data.bundles)
    }

    /// Plan the image renames for renaming a bundle
    ///
    /// Without bundling the image takes the new name (keeping its extension
    /// if the new name has none). With bundling every member keeps its
    /// suffix token, separator and extension: renaming `Rock` to `Stone`
    /// turns `Rock_Normal.png` into `Stone_Normal.png`.
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` for a bad index, an empty name, or
    /// when the renames would collide with each other or an existing image.
    pub fn rename_bundle(&self, index: usize, new_name: &str) -> Result<Vec<Rename>> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(PakError::InvalidInput("The new name cannot be empty".into()));
        }
        let bundle = self
            .data
            .bundles
            .get(index)
            .ok_or_else(|| bad_index("bundle", index, self.data.bundles.len()))?;

        let mut plan = Vec::new();
        for member in &bundle.members {
            let (stem, extension) = split_extension(member);
            let to = if self.data.enable_bundles {
                match find_suffix_match(stem, self.suffix_tokens.items(), self.data.case_sensitive_matching) {
                    Some(m) => format!(
                        "{new_name}{}{}{}{extension}",
                        m.separator(stem),
                        m.matched(stem),
                        m.tail(stem)
                    ),
                    None => format!("{new_name}{extension}"),
                }
            } else if split_extension(new_name).1.is_empty() {
                format!("{new_name}{extension}")
            } else {
                new_name.to_string()
            };

            if &to != member {
                plan.push(Rename { from: member.clone(), to });
            }
        }

        let sources: HashSet<&str> = plan.iter().map(|r| r.from.as_str()).collect();
        let mut targets = HashSet::new();
        for rename in &plan {
            if !targets.insert(rename.to.as_str()) {
                return Err(PakError::InvalidInput(format!(
                    "Renaming would give two images the name '{}'",
                    rename.to
                )));
            }
            if !sources.contains(rename.to.as_str()) && self.images.iter().any(|i| i.name == rename.to) {
                return Err(PakError::InvalidInput(format!(
                    "An image named '{}' already exists",
                    rename.to
                )));
            }
        }
        Ok(plan)
    }

    /// Point the image records at their new names and rebuild
    ///
    /// Annotations travel with the records.
    pub fn apply_renames(&mut self, plan: &[Rename]) {
        let targets: Vec<(usize, &Rename)> = plan
            .iter()
            .filter_map(|r| self.images.iter().position(|i| i.name == r.from).map(|i| (i, r)))
            .collect();
        for (index, rename) in targets {
            let image = &mut self.images[index];
            image.path.set_file_name(&rename.to);
            image.name.clone_from(&rename.to);
        }
        self.refresh();
    }

    /// Remove the selected bundles and their images from the session
    ///
    /// Returns the removed image records so their files can be deleted; an
    /// empty list means nothing was selected and nothing changed. The cursor
    /// steps back once for every removed bundle at or before it.
    pub fn delete_selection(&mut self) -> Vec<ImageRecord> {
        let indices = self.data.selection.selected_indices(&self.data.bundles);
        if indices.is_empty() {
            return Vec::new();
        }

        let doomed: HashSet<String> = indices
            .iter()
            .flat_map(|&i| self.data.bundles[i].members.iter().cloned())
            .collect();

        let cursor = self.data.selection.cursor;
        let mut subtract = 0;
        for (removed_so_far, &index) in indices.iter().enumerate() {
            let current = index - removed_so_far;
            self.data.bundles.remove(current);
            if current <= cursor {
                subtract += 1;
            }
        }
        self.data.selection.cursor = cursor.saturating_sub(subtract);

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.images)
            .into_iter()
            .partition(|image| doomed.contains(&image.name));
        self.images = kept;
        info!("Removed {} bundle(s) with {} image(s)", indices.len(), removed.len());
        removed
    }

    /// Clear every annotation and empty the bundle, location and format lists
    pub fn reset_properties(&mut self) {
        for image in &mut self.images {
            image.annotation = crate::ImageAnnotation::default();
        }
        self.data.bundles.clear();
        self.data.selection.cursor = 0;
        self.data.selection.proxy.reset();
        self.data.locations.clear();
        self.data.formats.clear();
    }

    fn clear_location_refs(&mut self, id: LocationId) {
        for image in &mut self.images {
            if image.annotation.export_location == Some(id) {
                image.annotation.export_location = None;
            }
        }
        for bundle in &mut self.data.bundles {
            if bundle.export_location == Some(id) {
                bundle.export_location = None;
            }
        }
        if self.data.selection.proxy.export_location == Some(id) {
            self.data.selection.proxy.export_location = None;
        }
    }

    fn clear_format_refs(&mut self, id: FormatId) {
        for image in &mut self.images {
            if image.annotation.export_format == Some(id) {
                image.annotation.export_format = None;
            }
        }
        for bundle in &mut self.data.bundles {
            if bundle.export_format == Some(id) {
                bundle.export_format = None;
            }
        }
        if self.data.selection.proxy.export_format == Some(id) {
            self.data.selection.proxy.export_format = None;
        }
    }

    /// Append a location named "Location N" with an empty path
    pub fn add_location(&mut self) -> &ExportLocation {
        self.data
            .locations
            .add_with(|n| ExportLocation::new(format!("Location {n}"), ""))
    }

    /// Remove the active location and reset everything that used it
    pub fn remove_location(&mut self) -> Option<ExportLocation> {
        let removed = self.data.locations.remove_selected()?;
        self.clear_location_refs(removed.id);
        Some(removed)
    }

    pub fn move_location(&mut self, direction: Move) -> bool {
        self.data.locations.move_selected(direction)
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the location list.
    pub fn select_location(&mut self, index: usize) -> Result<()> {
        if self.data.locations.select(index) {
            Ok(())
        } else {
            Err(bad_index("location", index, self.data.locations.len()))
        }
    }

    fn active_location(&mut self) -> Result<&mut ExportLocation> {
        self.data
            .locations
            .selected_mut()
            .ok_or_else(|| PakError::InvalidInput("There are no export locations".into()))
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when there is no active location.
    pub fn set_location_name(&mut self, name: &str) -> Result<()> {
        self.active_location()?.name = name.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when there is no active location.
    pub fn set_location_path(&mut self, path: &str) -> Result<()> {
        self.active_location()?.path = path.to_string();
        Ok(())
    }

    /// Append a path tag to the active location; returns the new path
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when there is no active location.
    pub fn tag_location(&mut self, tag: PathTag) -> Result<String> {
        let location = self.active_location()?;
        location.path = append_path_tag(&location.path, tag);
        Ok(location.path.clone())
    }

    /// Look up a location by name; `none` means no location
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` for unknown names.
    pub fn location_id(&self, name: &str) -> Result<Option<LocationId>> {
        if name.eq_ignore_ascii_case(NONE_KEYWORD) {
            return Ok(None);
        }
        self.data
            .locations
            .iter()
            .find(|l| l.name == name)
            .map(|l| Some(l.id))
            .ok_or_else(|| PakError::InvalidInput(format!("No export location named '{name}'")))
    }

    /// Append a PNG format named "Format N"
    pub fn add_format(&mut self) -> &ExportFormat {
        self.data
            .formats
            .add_with(|n| ExportFormat::new(format!("Format {n}")))
    }

    /// Remove the active format and reset everything that used it
    pub fn remove_format(&mut self) -> Option<ExportFormat> {
        let removed = self.data.formats.remove_selected()?;
        self.clear_format_refs(removed.id);
        Some(removed)
    }

    pub fn move_format(&mut self, direction: Move) -> bool {
        self.data.formats.move_selected(direction)
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the format list.
    pub fn select_format(&mut self, index: usize) -> Result<()> {
        if self.data.formats.select(index) {
            Ok(())
        } else {
            Err(bad_index("format", index, self.data.formats.len()))
        }
    }

    /// Edit the active format; the result is normalized for its file type
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when there is no active format.
    pub fn update_format(&mut self, edit: impl FnOnce(&mut ExportFormat)) -> Result<&ExportFormat> {
        let format = self
            .data
            .formats
            .selected_mut()
            .ok_or_else(|| PakError::InvalidInput("There are no export formats".into()))?;
        edit(format);
        format.normalize();
        Ok(&*format)
    }

    /// Look up a format by name; `none` means copy the source file
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` for unknown names.
    pub fn format_id(&self, name: &str) -> Result<Option<FormatId>> {
        if name.eq_ignore_ascii_case(NONE_KEYWORD) {
            return Ok(None);
        }
        self.data
            .formats
            .iter()
            .find(|f| f.name == name)
            .map(|f| Some(f.id))
            .ok_or_else(|| PakError::InvalidInput(format!("No export format named '{name}'")))
    }

    /// Append a suffix token named "MaterialSlotN" and rebuild
    pub fn add_slot(&mut self) -> String {
        let name = self.suffix_tokens.add_with(|n| format!("MaterialSlot{n}")).clone();
        self.refresh();
        name
    }

    /// Remove the active suffix token and rebuild
    pub fn remove_slot(&mut self) -> Option<String> {
        let removed = self.suffix_tokens.remove_selected()?;
        self.refresh();
        Some(removed)
    }

    /// Move the active suffix token; token order decides matching ties
    pub fn move_slot(&mut self, direction: Move) -> bool {
        let moved = self.suffix_tokens.move_selected(direction);
        if moved {
            self.refresh();
        }
        moved
    }

    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` if `index` is outside the token list.
    pub fn select_slot(&mut self, index: usize) -> Result<()> {
        if self.suffix_tokens.select(index) {
            Ok(())
        } else {
            Err(bad_index("suffix token", index, self.suffix_tokens.len()))
        }
    }

    /// Rename the active suffix token and rebuild
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when the name is empty or there is
    /// no active token.
    pub fn rename_slot(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PakError::InvalidInput("A suffix token cannot be empty".into()));
        }
        let token = self
            .suffix_tokens
            .selected_mut()
            .ok_or_else(|| PakError::InvalidInput("There are no suffix tokens".into()))?;
        *token = name.to_string();
        self.refresh();
        Ok(())
    }

    /// Add one of the suffix tokens to the sources of an output channel
    ///
    /// Returns false when the channel already lists the token.
    ///
    /// # Errors
    ///
    /// Returns `PakError::InvalidInput` when `token` is not a suffix token.
    pub fn add_pack_source(&mut self, channel: Channel, token: &str) -> Result<bool> {
        let token = token.trim();
        if !self.suffix_tokens.iter().any(|t| t == token) {
            return Err(PakError::InvalidInput(format!(
                "'{token}' is not a suffix token. See `pakpal slot list`"
            )));
        }
        let source = self.data.pack.source_mut(channel);
        let before = source.sources.len();
        source.add_source(token);
        Ok(source.sources.len() > before)
    }

    /// Export all bundles or only the selection
    ///
    /// # Errors
    ///
    /// Returns `PakError::ExportError` when a used location has no path.
    pub fn export(&self, mode: ExportMode, replace_invalid_chars: bool) -> Result<ExportReport> {
        let resolution = resolve_export_targets(
            &self.data.bundles,
            &self.images,
            mode,
            &self.data.selection,
            self.data.enable_bundles,
        );
        let context = ExportContext {
            project_name: &self.data.project_name,
            base_dir: &self.data.source_dir,
            now: Local::now(),
            replace_invalid_chars,
        };
        Ok(export_targets(
            &resolution,
            &self.images,
            &self.data.locations,
            &self.data.formats,
            &context,
        )?)
    }

    /// Channel pack the selected bundles
    ///
    /// # Errors
    ///
    /// Returns `PakError::PackError` when bundling is disabled or packing fails.
    pub fn pack(&mut self, replace_invalid_chars: bool) -> Result<PackReport> {
        let indices = self.data.selection.selected_indices(&self.data.bundles);
        let context = ExportContext {
            project_name: &self.data.project_name,
            base_dir: &self.data.source_dir,
            now: Local::now(),
            replace_invalid_chars,
        };
        Ok(pack_bundles(
            &mut self.data.bundles,
            &mut self.images,
            &indices,
            &self.data.pack,
            self.data.enable_bundles,
            &context,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SUFFIX_TOKENS;
    use crate::testing::images;
    use std::path::PathBuf;

    fn tokens(list: &[&str]) -> PresetList<String> {
        PresetList::from_items(list.iter().map(ToString::to_string).collect())
    }

    fn session(names: &[&str]) -> Session {
        let mut s = Session::new(
            FileData::new("castle", "/library"),
            images(names),
            tokens(&DEFAULT_SUFFIX_TOKENS),
        );
        s.refresh();
        s
    }

    fn bundle_names(s: &Session) -> Vec<&str> {
        s.data.bundles.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_refresh_builds_bundles() {
        let s = session(&["Rock_BaseColor.png", "Rock_Normal.png", "Metal_BaseColor.png"]);
        assert_eq!(bundle_names(&s), ["Rock", "Metal_BaseColor.png"]);
        assert!(!s.data.selection.internal_update);
    }

    #[test]
    fn test_toggle_bundles_rebuilds_and_clamps_cursor() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png", "Sky.png"]);
        s.toggle_bundles();
        assert_eq!(s.data.bundles.len(), 3);
        s.set_cursor(2).unwrap();

        assert!(s.toggle_bundles());
        assert_eq!(bundle_names(&s), ["Rock", "Sky.png"]);
        assert_eq!(s.data.selection.cursor, 1);
    }

    #[test]
    fn test_toggle_hidden() {
        let mut s = session(&[".Viewer.png", "Sky.png"]);
        assert_eq!(bundle_names(&s), ["Sky.png"]);
        assert!(s.toggle_hidden());
        assert_eq!(bundle_names(&s), [".Viewer.png", "Sky.png"]);
    }

    #[test]
    fn test_toggle_case_sensitive() {
        let mut s = session(&["rock_basecolor.png", "rock_normal.png"]);
        assert_eq!(s.data.bundles.len(), 2);
        assert!(!s.toggle_case_sensitive());
        assert_eq!(bundle_names(&s), ["rock"]);
    }

    #[test]
    fn test_refresh_does_not_fan_out_inherited_values() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        s.images[0].annotation.enable_export = true;
        s.refresh();

        assert!(s.data.bundles[0].enable_export);
        assert!(!s.images[1].annotation.enable_export);
    }

    #[test]
    fn test_out_of_range_indices_are_errors() {
        let mut s = session(&["Sky.png"]);
        assert!(matches!(s.set_cursor(4), Err(PakError::InvalidInput(_))));
        assert!(s.set_selected(1, true).is_err());
        assert!(s.set_bundle_enable_export(1, true).is_err());
        assert!(s.select_location(0).is_err());
        assert!(s.select_format(0).is_err());
    }

    #[test]
    fn test_bundle_row_edit_fans_out() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png", "Sky.png"]);
        let id = s.add_location().id;

        assert_eq!(s.set_bundle_location(0, Some(id)).unwrap(), 2);
        assert_eq!(s.images[0].annotation.export_location, Some(id));
        assert_eq!(s.images[1].annotation.export_location, Some(id));
        assert_eq!(s.images[2].annotation.export_location, None);
    }

    #[test]
    fn test_rename_bundle_keeps_suffixes() {
        let s = session(&["Rock_BaseColor.png", "Rock-Normal.tga", "Metal_BaseColor.png"]);
        let plan = s.rename_bundle(0, "Stone").unwrap();
        assert_eq!(
            plan,
            [
                Rename { from: "Rock_BaseColor.png".into(), to: "Stone_BaseColor.png".into() },
                Rename { from: "Rock-Normal.tga".into(), to: "Stone-Normal.tga".into() },
            ]
        );

        let plan = s.rename_bundle(1, "Iron").unwrap();
        assert_eq!(plan[0].to, "Iron_BaseColor.png");
    }

    #[test]
    fn test_rename_without_bundles() {
        let mut s = session(&["Sky.png", "Ground.png"]);
        s.toggle_bundles();
        assert_eq!(s.rename_bundle(0, "Clouds").unwrap()[0].to, "Clouds.png");
        assert_eq!(s.rename_bundle(0, "Clouds.jpg").unwrap()[0].to, "Clouds.jpg");
        assert!(s.rename_bundle(0, "Sky").unwrap().is_empty());
    }

    #[test]
    fn test_rename_rejects_collisions() {
        let s = session(&["Rock_BaseColor.png", "Rock_Normal.png", "Stone_Normal.png"]);
        assert!(s.rename_bundle(0, "Stone").is_err());
        assert!(s.rename_bundle(0, "  ").is_err());
        assert!(s.rename_bundle(7, "X").is_err());
    }

    #[test]
    fn test_apply_renames_moves_records() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        s.images[1].annotation.enable_export = true;
        let plan = s.rename_bundle(0, "Stone").unwrap();

        s.apply_renames(&plan);
        assert_eq!(bundle_names(&s), ["Stone"]);
        assert_eq!(s.images[1].name, "Stone_Normal.png");
        assert_eq!(s.images[1].path, PathBuf::from("/library/Stone_Normal.png"));
        assert!(s.images[1].annotation.enable_export);
    }

    #[test]
    fn test_delete_selection_single() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png", "Sky.png"]);
        let removed = s.delete_selection();

        assert_eq!(removed.len(), 2);
        assert_eq!(bundle_names(&s), ["Sky.png"]);
        assert_eq!(s.images.len(), 1);
        assert_eq!(s.data.selection.cursor, 0);
    }

    #[test]
    fn test_delete_selection_adjusts_cursor() {
        let mut s = session(&["A.png", "B.png", "C.png", "D.png", "E.png"]);
        s.set_cursor(3).unwrap();
        s.toggle_multiselect();
        s.set_selected(1, true).unwrap();
        s.set_selected(4, true).unwrap();

        let removed = s.delete_selection();
        assert_eq!(removed.len(), 2);
        assert_eq!(bundle_names(&s), ["A.png", "C.png", "D.png"]);
        // B sits before the cursor, E (at index 3 once B is gone) lands on it
        assert_eq!(s.data.selection.cursor, 1);
    }

    #[test]
    fn test_delete_with_nothing_selected_changes_nothing() {
        let mut s = session(&["A.png", "B.png"]);
        s.toggle_multiselect();
        assert_eq!(s.selection_count(), 0);
        assert!(s.delete_selection().is_empty());
        assert_eq!(s.data.bundles.len(), 2);
        assert_eq!(s.images.len(), 2);
    }

    #[test]
    fn test_remove_location_resets_references() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let first = s.add_location().id;
        let second = s.add_location().id;
        assert_eq!(s.data.locations.items()[1].name, "Location 2");

        s.write_proxy(ExportField::ExportLocation(Some(second)));
        s.select_location(1).unwrap();
        let removed = s.remove_location().unwrap();

        assert_eq!(removed.id, second);
        assert!(s.images.iter().all(|i| i.annotation.export_location.is_none()));
        assert_eq!(s.data.bundles[0].export_location, None);
        assert_eq!(s.data.selection.proxy.export_location, None);
        assert_eq!(s.data.locations.index(), 0);
        assert_eq!(s.location_id("Location 1").unwrap(), Some(first));
    }

    #[test]
    fn test_remove_format_resets_references() {
        let mut s = session(&["Sky.png"]);
        let id = s.add_format().id;
        s.set_bundle_format(0, Some(id)).unwrap();

        s.remove_format();
        assert!(s.data.formats.is_empty());
        assert_eq!(s.images[0].annotation.export_format, None);
        assert_eq!(s.data.bundles[0].export_format, None);
    }

    #[test]
    fn test_location_edits() {
        let mut s = session(&[]);
        assert!(s.set_location_path("/out").is_err());

        s.add_location();
        s.set_location_name("Textures").unwrap();
        s.set_location_path("/out").unwrap();
        let path = s.tag_location(PathTag::BundleName).unwrap();

        assert!(path.starts_with("/out"));
        assert!(path.contains("^bundle_name^"));
        assert!(s.location_id("Textures").unwrap().is_some());
        assert_eq!(s.location_id("none").unwrap(), None);
        assert!(s.location_id("Elsewhere").is_err());
    }

    #[test]
    fn test_update_format_normalizes() {
        let mut s = session(&[]);
        s.add_format();
        let format = s
            .update_format(|f| {
                f.file_format = crate::export::FileFormat::Jpeg;
                f.quality = 90;
            })
            .unwrap();

        assert_eq!(format.name, "Format 1");
        assert_eq!(format.color_mode, crate::export::ColorMode::Rgb);
        assert_eq!(format.quality, 90);
        assert!(s.format_id("Format 1").unwrap().is_some());
    }

    #[test]
    fn test_slot_edits_rebuild_bundles() {
        let mut s = session(&["Rock_AO.png", "Rock_Normal.png"]);
        assert_eq!(bundle_names(&s), ["Rock_AO.png", "Rock_Normal.png"]);

        assert_eq!(s.add_slot(), "MaterialSlot6");
        s.select_slot(5).unwrap();
        s.rename_slot("AO").unwrap();
        assert_eq!(bundle_names(&s), ["Rock"]);

        s.remove_slot();
        assert_eq!(s.suffix_tokens().len(), 5);
        assert_eq!(s.suffix_tokens().index(), 4);
        assert_eq!(bundle_names(&s), ["Rock_AO.png", "Rock_Normal.png"]);
    }

    #[test]
    fn test_add_pack_source_requires_suffix_token() {
        let mut s = session(&["Rock_Metallic.png"]);

        assert!(s.add_pack_source(Channel::B, "Metallic").unwrap());
        assert!(!s.add_pack_source(Channel::B, " Metallic ").unwrap());
        assert_eq!(s.data.pack.b.sources, ["Metallic"]);

        assert!(matches!(s.add_pack_source(Channel::R, "AO"), Err(PakError::InvalidInput(_))));
        assert!(s.data.pack.r.is_empty());
    }

    #[test]
    fn test_reset_properties() {
        let mut s = session(&["Rock_BaseColor.png", "Rock_Normal.png"]);
        let id = s.add_location().id;
        s.add_format();
        s.write_proxy(ExportField::ExportLocation(Some(id)));
        s.write_proxy(ExportField::EnableExport(true));

        s.reset_properties();
        assert!(s.data.bundles.is_empty());
        assert!(s.data.locations.is_empty());
        assert!(s.data.formats.is_empty());
        assert!(s.images.iter().all(|i| i.annotation == crate::ImageAnnotation::default()));
    }

    #[test]
    fn test_pack_requires_bundles() {
        let mut s = session(&["Rock_AO.png"]);
        s.toggle_bundles();
        assert!(matches!(
            s.pack(true),
            Err(PakError::PackError(crate::pack::PackError::BundlesDisabled))
        ));
    }
}
