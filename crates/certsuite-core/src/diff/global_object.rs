//! Global-object membership comparison for a single privilege context.

use crate::model::{Context, GlobalObjectDiffResult, GlobalObjectSet};

/// Device-only paths are `added`, reference-only paths are `missing`.
///
/// Presence is binary: a path in both sets is never reported. Both lists are
/// in lexicographic order.
pub fn diff_global_objects(
    context: Context,
    reference: &GlobalObjectSet,
    device: &GlobalObjectSet,
) -> GlobalObjectDiffResult {
    GlobalObjectDiffResult {
        context,
        added: device
            .iter()
            .filter(|p| !reference.contains(p))
            .map(str::to_string)
            .collect(),
        missing: reference
            .iter()
            .filter(|p| !device.contains(p))
            .map(str::to_string)
            .collect(),
    }
}
