use anyhow::{bail, Result};

/// One unit of the curriculum. Immutable once built; the ordered lesson list
/// is fixed for a session.
#[derive(Debug, Clone)]
pub struct Lesson {
    /// Internal id, also the label the model is expected to emit
    pub id: String,
    /// User-facing name
    pub display_name: String,
    /// Label the classifier must report for a correct sample
    pub expected_label: String,
    /// Opaque handle to the reference media shown for this lesson
    pub reference_media: String,
}

/// Build the ordered lesson list from the parallel configuration lists.
/// Display names normalize into ids the way the model's classes are named:
/// trimmed, lowercased, spaces replaced with underscores.
pub fn build_lessons(names: &[String], reference_media: &[String]) -> Result<Vec<Lesson>> {
    if names.is_empty() || names.len() != reference_media.len() {
        bail!("lesson names and reference media must have the same non-zero length");
    }

    Ok(names
        .iter()
        .zip(reference_media)
        .map(|(name, media)| {
            let id = name.trim().to_lowercase().replace(' ', "_");
            Lesson {
                expected_label: id.clone(),
                id,
                display_name: name.clone(),
                reference_media: media.clone(),
            }
        })
        .collect())
}
