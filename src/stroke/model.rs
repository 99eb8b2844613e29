use serde_json::{Map, Value, json};

use crate::foundation::{
    coerce::{f64_or, field, i64_or, string_or},
    error::{BrushError, BrushResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Timing envelope of a stroke; the baseline for every patch it produces.
pub struct Timing {
    /// Absolute start time in milliseconds.
    #[serde(default)]
    pub start_ms: u64,
    /// Nominal duration in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Easing curve name, consumer-specific default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

fn default_duration_ms() -> u64 {
    600
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start_ms: 0,
            duration_ms: default_duration_ms(),
            easing: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One instruction unit in the input batch, as it arrives on the wire.
///
/// `params` stays loose on purpose: every kind-specific field is optional and
/// untrusted. [`StrokeOp::from_wire`] turns `kind` + `params` into a typed
/// operation, defaulting or dropping anything malformed.
pub struct Stroke {
    /// Opaque identifier; ordering within a batch is positional.
    #[serde(default)]
    pub stroke_id: String,
    /// Builder selector, e.g. `spawnCharacter` or `runScreenScript`.
    #[serde(default)]
    pub kind: String,
    /// Kind-specific attribute bag.
    #[serde(default)]
    pub params: Value,
    /// Timing envelope.
    #[serde(default)]
    pub timing: Timing,
}

/// Decode a JSON array of strokes. This is the one fallible boundary: a
/// payload that is not a stroke array is rejected here, while per-field
/// garbage inside `params` is tolerated downstream.
pub fn decode_batch(json: &str) -> BrushResult<Vec<Stroke>> {
    serde_json::from_str(json).map_err(|e| BrushError::serde(format!("invalid stroke batch: {e}")))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Scene render mode; anything unrecognized falls back to 2D.
pub enum RenderMode {
    /// Flat two-dimensional rendering.
    TwoD,
    /// Perspective three-dimensional rendering.
    ThreeD,
}

impl RenderMode {
    /// Wire representation (`"2d"` / `"3d"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// `spawnCharacter` parameters.
pub struct SpawnCharacter {
    /// Target actor id.
    pub actor_id: String,
    /// Spawn x position.
    pub x: f64,
    /// Spawn y position.
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// `animateMoonwalk` parameters.
pub struct AnimateMoonwalk {
    /// Target actor id.
    pub actor_id: String,
}

#[derive(Clone, Debug, PartialEq)]
/// `orbitGlobe` parameters.
pub struct OrbitGlobe {
    /// Orbit radius for the ufo actor.
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// `drawAdoptionCurve` parameters.
pub struct DrawAdoptionCurve {
    /// Trend label, lowercased and trimmed; empty means neutral.
    pub trend: String,
    /// Candidate curve rows, still loose; the normalizer validates them.
    pub points: Value,
    /// Series tag passed through to the chart value.
    pub series: Value,
}

#[derive(Clone, Debug, PartialEq)]
/// `drawPieSaturation` parameters.
pub struct DrawPieSaturation {
    /// Candidate slice rows, still loose; the normalizer validates them.
    pub slices: Value,
}

#[derive(Clone, Debug, PartialEq)]
/// `drawSegmentedAttachBars` parameters.
pub struct DrawSegmentedAttachBars {
    /// Trend label passed through to the chart value.
    pub trend: String,
    /// Candidate segment rows, still loose; the normalizer validates them.
    pub segments: Value,
}

#[derive(Clone, Debug, PartialEq)]
/// `setLyricsTrack` parameters.
pub struct SetLyricsTrack {
    /// Candidate word list, still loose; the normalizer validates it.
    pub words: Value,
    /// Explicit first-word time; `None` falls back to the stroke start.
    pub start_ms: Option<u64>,
    /// Per-word spacing in milliseconds, already clamped to >= 120.
    pub step_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
/// `annotateInsight` parameters.
pub struct AnnotateInsight {
    /// Callout text.
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
/// `spawnSceneActor` parameters.
pub struct SpawnSceneActor {
    /// Target actor id.
    pub actor_id: String,
    /// Actor type tag.
    pub actor_type: String,
    /// Spawn x position.
    pub x: f64,
    /// Spawn y position.
    pub y: f64,
    /// Style bag passed through to the actor value.
    pub style: Value,
}

#[derive(Clone, Debug, PartialEq)]
/// `setActorMotion` parameters.
pub struct SetActorMotion {
    /// Target actor id.
    pub actor_id: String,
    /// Motion descriptor, passed through (and augmented for `swim-cycle`).
    pub motion: Value,
}

#[derive(Clone, Debug, PartialEq)]
/// `setActorAnimation` parameters.
pub struct SetActorAnimation {
    /// Target actor id.
    pub actor_id: String,
    /// Animation descriptor passed through to the actor.
    pub animation: Value,
}

#[derive(Clone, Debug, PartialEq)]
/// `emitFx` parameters.
pub struct EmitFx {
    /// Effect id; `bubble_emitter` and `caustic_pattern` get extra treatment.
    pub fx_id: String,
    /// Particle seed (`bubble_emitter`).
    pub seed: u64,
    /// Particle count (`bubble_emitter`).
    pub count: usize,
    /// Shimmer period in milliseconds (`caustic_pattern`).
    pub shimmer_period_ms: u64,
    /// Full original params object, merged into the effect value.
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
/// `applyMaterialFx` parameters.
pub struct ApplyMaterialFx {
    /// Target material id.
    pub material_id: String,
    /// Requested shader id, validated by the geometry provider.
    pub shader_id: String,
    /// Requested shader uniforms, sanitized by the geometry provider.
    pub uniforms: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
/// Strongly-typed stroke operation, one variant per supported `kind`.
///
/// The dispatcher matches exhaustively on this enum; unsupported kinds carry
/// their original tag so the warning annotation can name them.
pub enum StrokeOp {
    /// Spawn the narrator character.
    SpawnCharacter(SpawnCharacter),
    /// Attach the moonwalk animation to an actor.
    AnimateMoonwalk(AnimateMoonwalk),
    /// Spawn the globe plus an orbiting ufo.
    OrbitGlobe(OrbitGlobe),
    /// Switch the ufo into its landing motion.
    UfoLandingBeat,
    /// Draw the adoption line chart.
    DrawAdoptionCurve(DrawAdoptionCurve),
    /// Draw the saturation pie chart.
    DrawPieSaturation(DrawPieSaturation),
    /// Draw the segmented attach-rate bars.
    DrawSegmentedAttachBars(DrawSegmentedAttachBars),
    /// Lay out the timed lyrics track.
    SetLyricsTrack(SetLyricsTrack),
    /// Append a callout annotation.
    AnnotateInsight(AnnotateInsight),
    /// Trigger the scene morph transition.
    SceneMorph,
    /// Switch between 2D and 3D rendering.
    SetRenderMode(RenderMode),
    /// Run a nested screen-script program.
    RunScreenScript {
        /// Ordered command list of the nested program.
        commands: Vec<Value>,
    },
    /// Spawn a generic scene actor.
    SpawnSceneActor(SpawnSceneActor),
    /// Replace an actor's motion descriptor.
    SetActorMotion(SetActorMotion),
    /// Replace an actor's animation descriptor.
    SetActorAnimation(SetActorAnimation),
    /// Emit a visual effect.
    EmitFx(EmitFx),
    /// Replace the environment mood descriptor.
    SetEnvironmentMood {
        /// Mood descriptor passed through.
        mood: Value,
    },
    /// Replace the camera motion descriptor.
    SetCameraMove {
        /// Camera parameters passed through.
        params: Value,
    },
    /// Validate and apply a material shader.
    ApplyMaterialFx(ApplyMaterialFx),
    /// Catch-all for unrecognized kinds; degrades to a warning patch.
    Unsupported {
        /// The unrecognized kind tag.
        kind: String,
    },
}

impl StrokeOp {
    /// Parse a wire `kind` + `params` pair into a typed operation.
    ///
    /// Never fails: unknown kinds become [`StrokeOp::Unsupported`] and every
    /// malformed field takes its documented default.
    pub fn from_wire(kind: &str, params: &Value) -> Self {
        match kind {
            "spawnCharacter" => Self::SpawnCharacter(SpawnCharacter {
                actor_id: string_or(field(params, &["actor_id"]), "guide").value,
                x: f64_or(field(params, &["x"]), 180.0).value,
                y: f64_or(field(params, &["y"]), 190.0).value,
            }),
            "animateMoonwalk" => Self::AnimateMoonwalk(AnimateMoonwalk {
                actor_id: string_or(field(params, &["actor_id"]), "guide").value,
            }),
            "orbitGlobe" => Self::OrbitGlobe(OrbitGlobe {
                radius: f64_or(field(params, &["radius"]), 75.0).value,
            }),
            "ufoLandingBeat" => Self::UfoLandingBeat,
            "drawAdoptionCurve" => Self::DrawAdoptionCurve(DrawAdoptionCurve {
                trend: string_or(field(params, &["trend"]), "")
                    .value
                    .trim()
                    .to_ascii_lowercase(),
                points: field(params, &["points"]).cloned().unwrap_or(Value::Null),
                series: field(params, &["series"])
                    .cloned()
                    .unwrap_or_else(|| json!("adoption")),
            }),
            "drawPieSaturation" => Self::DrawPieSaturation(DrawPieSaturation {
                slices: field(params, &["slices"]).cloned().unwrap_or(Value::Null),
            }),
            "drawSegmentedAttachBars" => Self::DrawSegmentedAttachBars(DrawSegmentedAttachBars {
                trend: string_or(field(params, &["trend"]), "growth").value,
                segments: field(params, &["segments"]).cloned().unwrap_or(Value::Null),
            }),
            "setLyricsTrack" => Self::SetLyricsTrack(SetLyricsTrack {
                words: field(params, &["words"]).cloned().unwrap_or(Value::Null),
                start_ms: field(params, &["start_ms"]).and_then(|v| {
                    let c = i64_or(Some(v), 0);
                    (!c.defaulted).then_some(c.value.max(0) as u64)
                }),
                step_ms: i64_or(field(params, &["step_ms"]), 420).value.max(120) as u64,
            }),
            "annotateInsight" => Self::AnnotateInsight(AnnotateInsight {
                text: string_or(field(params, &["text"]), "Insight").value,
            }),
            "sceneMorph" => Self::SceneMorph,
            "setRenderMode" => {
                let mode = string_or(field(params, &["mode"]), "2d")
                    .value
                    .to_ascii_lowercase();
                Self::SetRenderMode(match mode.as_str() {
                    "3d" => RenderMode::ThreeD,
                    _ => RenderMode::TwoD,
                })
            }
            "runScreenScript" => {
                let commands = params
                    .get("program")
                    .and_then(|p| p.get("commands"))
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                Self::RunScreenScript { commands }
            }
            "spawnSceneActor" => Self::SpawnSceneActor(SpawnSceneActor {
                actor_id: string_or(field(params, &["actor_id"]), "actor").value,
                actor_type: string_or(field(params, &["actor_type"]), "shape").value,
                x: f64_or(field(params, &["x"]), 180.0).value,
                y: f64_or(field(params, &["y"]), 180.0).value,
                style: field(params, &["style"])
                    .cloned()
                    .unwrap_or_else(|| json!({})),
            }),
            "setActorMotion" => Self::SetActorMotion(SetActorMotion {
                actor_id: string_or(field(params, &["actor_id"]), "actor").value,
                motion: field(params, &["motion"])
                    .cloned()
                    .unwrap_or_else(|| json!({})),
            }),
            "setActorAnimation" => Self::SetActorAnimation(SetActorAnimation {
                actor_id: string_or(field(params, &["actor_id"]), "actor").value,
                animation: field(params, &["animation"])
                    .cloned()
                    .unwrap_or_else(|| json!({ "name": "idle" })),
            }),
            "emitFx" => Self::EmitFx(EmitFx {
                fx_id: string_or(field(params, &["fx_id"]), "effect").value,
                seed: i64_or(field(params, &["seed"]), 42).value.max(0) as u64,
                count: i64_or(field(params, &["count"]), 18).value.max(0) as usize,
                shimmer_period_ms: i64_or(field(params, &["shimmer_period_ms"]), 2300)
                    .value
                    .max(0) as u64,
                extra: params.as_object().cloned().unwrap_or_default(),
            }),
            "setEnvironmentMood" => Self::SetEnvironmentMood {
                mood: field(params, &["mood"])
                    .cloned()
                    .unwrap_or_else(|| json!({})),
            },
            "setCameraMove" => Self::SetCameraMove {
                params: if params.is_null() {
                    json!({})
                } else {
                    params.clone()
                },
            },
            "applyMaterialFx" => Self::ApplyMaterialFx(ApplyMaterialFx {
                material_id: string_or(field(params, &["material_id"]), "material").value,
                shader_id: string_or(field(params, &["shader_id"]), "").value,
                uniforms: field(params, &["uniforms"])
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
            }),
            other => Self::Unsupported {
                kind: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/model.rs"]
mod tests;
