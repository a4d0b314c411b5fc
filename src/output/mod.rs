//! Output formatting for CLI display
//!
//! Status banners, warnings and the table rows printed for bundles and the
//! preset lists.

use colored::Colorize;
use serde::Serialize;

use crate::bundle::Bundle;
use crate::export::{ExportFormat, ExportLocation, ExportReport};
use crate::pack::PackReport;
use crate::session::Session;
use crate::{FormatId, LocationId};

/// Print an informational line unless quiet
pub fn info(message: &str, quiet: bool) {
    if !quiet {
        println!("{message}");
    }
}

/// Print a warning banner; warnings are shown even when quiet
pub fn warning(message: &str) {
    eprintln!("{} {message}", "Warning:".yellow().bold());
}

/// Print an error banner
pub fn error(message: &str) {
    eprintln!("{} {message}", "Error:".red().bold());
}

fn location_name(session: &Session, id: Option<LocationId>) -> String {
    id.and_then(|id| session.data.locations.iter().find(|l| l.id == id))
        .map_or_else(|| "none".to_string(), |l| l.name.clone())
}

fn format_name(session: &Session, id: Option<FormatId>) -> String {
    id.and_then(|id| session.data.formats.iter().find(|f| f.id == id))
        .map_or_else(|| "none".to_string(), |f| f.name.clone())
}

/// One row of the bundle table
#[must_use]
pub fn bundle_row(session: &Session, index: usize, bundle: &Bundle) -> String {
    let selection = &session.data.selection;
    let marker = if selection.multi_select_enabled {
        if bundle.is_selected { "[x]" } else { "[ ]" }
    } else if index == selection.cursor {
        " > "
    } else {
        "   "
    };
    let export = if bundle.enable_export {
        "export".green().to_string()
    } else {
        "skip".dimmed().to_string()
    };
    let count = if bundle.len() > 1 {
        format!(" ({} images)", bundle.len())
    } else {
        String::new()
    };

    format!(
        "{marker} {index:>3}  {}{count}  {export}  {} / {}",
        bundle.name.bold(),
        location_name(session, bundle.export_location).cyan(),
        format_name(session, bundle.export_format).cyan(),
    )
}

/// Bundle entry of `pakpal list --json`
#[derive(Serialize)]
pub struct BundleJson<'a> {
    pub index: usize,
    pub name: &'a str,
    pub members: &'a [String],
    pub enable_export: bool,
    pub export_location: String,
    pub export_format: String,
    pub is_selected: bool,
}

/// The bundle list as pretty JSON
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn bundles_json(session: &Session) -> Result<String, serde_json::Error> {
    let selected = session.data.selection.selected_indices(&session.data.bundles);
    let rows: Vec<BundleJson<'_>> = session
        .data
        .bundles
        .iter()
        .enumerate()
        .map(|(index, bundle)| BundleJson {
            index,
            name: &bundle.name,
            members: &bundle.members,
            enable_export: bundle.enable_export,
            export_location: location_name(session, bundle.export_location),
            export_format: format_name(session, bundle.export_format),
            is_selected: selected.contains(&index),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

/// One row of the location list
#[must_use]
pub fn location_row(index: usize, active: bool, location: &ExportLocation) -> String {
    let marker = if active { ">" } else { " " };
    let path = if location.path.is_empty() {
        "(no path)".red().to_string()
    } else {
        location.path.clone()
    };
    format!("{marker} {index:>3}  {}  {path}", location.name.bold())
}

/// One row of the format list
#[must_use]
pub fn format_row(index: usize, active: bool, format: &ExportFormat) -> String {
    let marker = if active { ">" } else { " " };
    let mut details = format!(
        "{} {:?} {}-bit",
        format.file_format,
        format.color_mode,
        format.color_depth.bits()
    );
    match format.file_format {
        crate::export::FileFormat::Png => details.push_str(&format!(", compression {}%", format.compression)),
        crate::export::FileFormat::Jpeg | crate::export::FileFormat::Webp => {
            details.push_str(&format!(", quality {}%", format.quality));
        }
        crate::export::FileFormat::Tiff => details.push_str(&format!(", {:?}", format.tiff_codec)),
        _ => {}
    }
    format!("{marker} {index:>3}  {}  {details}", format.name.bold())
}

/// Banner printed after an export
pub fn export_banner(report: &ExportReport, quiet: bool) {
    let count = report.exported_count();
    if count == 0 {
        warning("PakPal exported no images.");
    } else if !quiet {
        println!("{}", format!("PakPal exported {count} image(s).").green().bold());
        for path in &report.exported {
            println!("  {}", path.display());
        }
    }
    if report.skipped_no_location > 0 {
        warning(&format!(
            "{} image(s) were not exported because no export location was set.",
            report.skipped_no_location
        ));
    }
    for (name, err) in &report.failures {
        error(&format!("{name}: {err}"));
    }
}

/// Banner printed after channel packing
pub fn pack_banner(report: &PackReport, quiet: bool) {
    if report.packed_count() == 0 {
        warning("PakPal packed no images.");
    } else if !quiet {
        let new = report.new_images.len();
        let updated = report.updated_images.len();
        println!(
            "{}",
            format!("PakPal packed {new} new and updated {updated} image(s).").green().bold()
        );
        for path in report.new_images.iter().chain(&report.updated_images) {
            println!("  {}", path.display());
        }
    }
    if report.not_found > 0 {
        warning(&format!(
            "{} bundle(s) had no image matching any channel source.",
            report.not_found
        ));
    }
    if report.not_overwritten > 0 {
        warning(&format!(
            "{} packed image(s) already exist and were not overwritten.",
            report.not_overwritten
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FileData;
    use crate::testing::images;
    use crate::lists::PresetList;

    fn session() -> Session {
        let tokens = PresetList::from_items(vec!["BaseColor".to_string(), "Normal".to_string()]);
        let mut s = Session::new(
            FileData::new("castle", "/library"),
            images(&["Rock_BaseColor.png", "Rock_Normal.png", "Sky.png"]),
            tokens,
        );
        s.refresh();
        s
    }

    #[test]
    fn test_bundle_row() {
        colored::control::set_override(false);
        let s = session();
        let row = bundle_row(&s, 0, &s.data.bundles[0]);
        assert!(row.starts_with(" > "));
        assert!(row.contains("Rock (2 images)"));
        assert!(row.contains("none / none"));
    }

    #[test]
    fn test_bundles_json() {
        let mut s = session();
        s.add_location();
        let id = s.location_id("Location 1").unwrap();
        s.set_bundle_location(1, id).unwrap();

        let json: serde_json::Value = serde_json::from_str(&bundles_json(&s).unwrap()).unwrap();
        assert_eq!(json[0]["name"], "Rock");
        assert_eq!(json[0]["is_selected"], true);
        assert_eq!(json[1]["export_location"], "Location 1");
        assert_eq!(json[1]["members"][0], "Sky.png");
    }

    #[test]
    fn test_format_row() {
        colored::control::set_override(false);
        let mut format = ExportFormat::new("Web");
        format.file_format = crate::export::FileFormat::Jpeg;
        format.normalize();
        let row = format_row(0, true, &format);
        assert!(row.starts_with(">"));
        assert!(row.contains("JPEG Rgb 8-bit, quality 50%"));
    }
}
