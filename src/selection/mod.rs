//! Selection and the selection proxy
//!
//! The bundle list has a cursor and, while multi-select is enabled, a
//! checkbox per bundle. The [`SelectionProxy`] stands in for whatever is
//! selected: writing one of its fields copies the value to every selected
//! bundle and on to every image inside those bundles.
//!
//! Refreshing the bundle list runs with `internal_update` set, which turns
//! proxy and bundle writes into no-ops so a rebuild never fans values out.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bundle::Bundle;
use crate::{FormatId, ImageAnnotation, ImageRecord, LocationId};

/// Aggregate export settings shown for the current selection
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionProxy {
    pub enable_export: bool,
    pub export_location: Option<LocationId>,
    pub export_format: Option<FormatId>,
}

impl SelectionProxy {
    /// Back to export disabled, location and format "none"
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A single export setting written through the proxy or a bundle row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportField {
    EnableExport(bool),
    ExportLocation(Option<LocationId>),
    ExportFormat(Option<FormatId>),
}

impl ExportField {
    fn apply_to_bundle(self, bundle: &mut Bundle) {
        match self {
            Self::EnableExport(v) => bundle.enable_export = v,
            Self::ExportLocation(v) => bundle.export_location = v,
            Self::ExportFormat(v) => bundle.export_format = v,
        }
    }

    fn apply_to_annotation(self, annotation: &mut ImageAnnotation) {
        match self {
            Self::EnableExport(v) => annotation.enable_export = v,
            Self::ExportLocation(v) => annotation.export_location = v,
            Self::ExportFormat(v) => annotation.export_format = v,
        }
    }

    fn apply_to_proxy(self, proxy: &mut SelectionProxy) {
        match self {
            Self::EnableExport(v) => proxy.enable_export = v,
            Self::ExportLocation(v) => proxy.export_location = v,
            Self::ExportFormat(v) => proxy.export_format = v,
        }
    }
}

/// Cursor, multi-select switch, proxy values and the reentrancy flag
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub multi_select_enabled: bool,
    /// Index of the bundle under the cursor
    pub cursor: usize,
    pub proxy: SelectionProxy,
    /// Set while the bundle list is being rebuilt
    #[serde(skip)]
    pub internal_update: bool,
}

impl SelectionState {
    /// Indices of the selected bundles
    ///
    /// With multi-select every checked bundle, otherwise the bundle under the
    /// cursor (if the list is not empty).
    #[must_use]
    pub fn selected_indices(&self, bundles: &[Bundle]) -> Vec<usize> {
        if self.multi_select_enabled {
            bundles
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_selected)
                .map(|(i, _)| i)
                .collect()
        } else if self.cursor < bundles.len() {
            vec![self.cursor]
        } else {
            Vec::new()
        }
    }

    /// Number of distinct images inside the selected bundles
    #[must_use]
    pub fn selection_count(&self, bundles: &[Bundle]) -> usize {
        self.selected_indices(bundles)
            .into_iter()
            .flat_map(|i| bundles[i].members.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Write a proxy field and fan it out to the selection
    ///
    /// Returns the number of images updated; always zero while an internal
    /// update is running.
    pub fn write_proxy(
        &mut self,
        field: ExportField,
        bundles: &mut [Bundle],
        images: &mut [ImageRecord],
    ) -> usize {
        if self.internal_update {
            return 0;
        }
        field.apply_to_proxy(&mut self.proxy);

        let mut updated = 0;
        for index in self.selected_indices(bundles) {
            updated += self.write_bundle(index, field, bundles, images);
        }
        debug!("Proxy write {field:?} updated {updated} image(s)");
        updated
    }

    /// Write an export setting on one bundle row and all of its images
    ///
    /// Returns the number of images updated.
    pub fn write_bundle(
        &self,
        index: usize,
        field: ExportField,
        bundles: &mut [Bundle],
        images: &mut [ImageRecord],
    ) -> usize {
        if self.internal_update {
            return 0;
        }
        let Some(bundle) = bundles.get_mut(index) else {
            return 0;
        };
        field.apply_to_bundle(bundle);

        let mut updated = 0;
        for image in images.iter_mut().filter(|i| bundle.contains(&i.name)) {
            field.apply_to_annotation(&mut image.annotation);
            updated += 1;
        }
        updated
    }

    /// Flip multi-select; the proxy goes back to neutral values
    pub fn toggle_multi_select(&mut self) {
        self.multi_select_enabled = !self.multi_select_enabled;
        self.proxy.reset();
    }

    /// Move the cursor; the proxy goes back to neutral values
    ///
    /// Returns false when `index` is outside the bundle list.
    pub fn set_cursor(&mut self, index: usize, bundle_count: usize) -> bool {
        if index >= bundle_count {
            return false;
        }
        self.cursor = index;
        self.proxy.reset();
        true
    }

    /// Check or uncheck a bundle; the proxy goes back to neutral values
    pub fn set_checked(&mut self, bundles: &mut [Bundle], index: usize, checked: bool) -> bool {
        let Some(bundle) = bundles.get_mut(index) else {
            return false;
        };
        bundle.is_selected = checked;
        self.proxy.reset();
        true
    }

    /// Clamp the cursor into a list of `bundle_count` bundles
    pub fn clamp_cursor(&mut self, bundle_count: usize) {
        self.cursor = self.cursor.min(bundle_count.saturating_sub(1));
    }
}
