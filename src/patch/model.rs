use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Mutation kind applied to the scene document.
pub enum PatchOp {
    /// Insert a new node (or append, for `/-` paths).
    Add,
    /// Replace an existing node.
    Replace,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One ordered scene-document mutation.
///
/// Patches are pure data: the rendering runtime applies them to a live scene
/// document keyed by [`Patch::at_ms`] for playback scheduling. The compiler
/// guarantees `at_ms >= start_ms` of the stroke that produced the patch.
pub struct Patch {
    /// Mutation kind.
    pub op: PatchOp,
    /// Slash-delimited pointer into the scene document.
    pub path: String,
    /// Op-specific payload.
    pub value: Value,
    /// Absolute activation time in milliseconds.
    pub at_ms: u64,
}

impl Patch {
    /// Build an `add` patch.
    pub fn add(path: impl Into<String>, value: Value, at_ms: u64) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value,
            at_ms,
        }
    }

    /// Build a `replace` patch.
    pub fn replace(path: impl Into<String>, value: Value, at_ms: u64) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value,
            at_ms,
        }
    }

    /// Build the appended warning annotation used by every degrade path.
    pub fn warning(text: impl Into<String>, at_ms: u64) -> Self {
        Self::add(
            "/annotations/-",
            json!({ "text": text.into(), "style": "warning" }),
            at_ms,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/patch/model.rs"]
mod tests;
