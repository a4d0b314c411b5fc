//! Project switches

use crate::cli::ToggleTarget;
use crate::commands::Project;
use crate::output;

/// Flip a switch; bundling, hidden images and case sensitivity rebuild the
/// bundle list
pub fn execute(project: &mut Project, target: ToggleTarget, quiet: bool) {
    let session = &mut project.session;
    let (label, on) = match target {
        ToggleTarget::Bundles => ("Bundles", session.toggle_bundles()),
        ToggleTarget::Multiselect => ("Multi-select", session.toggle_multiselect()),
        ToggleTarget::Hidden => ("Hidden images", session.toggle_hidden()),
        ToggleTarget::CaseSensitive => ("Case sensitive matching", session.toggle_case_sensitive()),
    };
    let state = if on { "enabled" } else { "disabled" };
    output::info(&format!("{label} {state}"), quiet);
}
