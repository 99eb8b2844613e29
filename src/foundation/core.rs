#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Stage dimensions used to scale relative `[0, 1]` coordinates into pixels.
pub struct Stage {
    /// Stage width in pixels.
    pub width: f64,
    /// Stage height in pixels.
    pub height: f64,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 360.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Explicit compiler configuration.
///
/// Anything that used to be ambient in earlier renditions of the engine is a
/// field here, so two callers with different settings can share a process.
pub struct CompileOptions {
    /// Stage dimensions for relative-coordinate scaling.
    #[serde(default)]
    pub stage: Stage,
}

/// Round to `decimals` decimal places.
pub(crate) fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}
