//! Brushplan turns an ordered batch of abstract animation instructions
//! ("strokes") into a deterministic, time-ordered sequence of scene-document
//! patches for a separate rendering runtime to apply.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: JSON wire payload -> `Vec<Stroke>` ([`decode_batch`])
//! 2. **Type**: `kind` + loose `params` -> [`StrokeOp`] (per-field defaulting)
//! 3. **Compile**: `&[Stroke] -> Vec<Patch>` ([`compile_batch`]), dispatching
//!    chart strokes through the normalizers and `runScreenScript` strokes
//!    through the screen-script interpreter
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: compilation is pure and stable for a given
//!   input and [`GeometryProvider`].
//! - **Fail soft, fail visibly**: malformed or unsupported strokes never
//!   abort the batch; they degrade into warning annotation patches.
//! - **No IO**: the compiler knows nothing about HTTP, audio, or files.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compile;
mod foundation;
mod geometry;
mod normalize;
mod patch;
mod script;
mod stroke;

pub use compile::batch::{compile_batch, compile_batch_with};
pub use foundation::coerce::{Coerced, bool_or, f64_or, i64_or, string_or};
pub use foundation::core::{CompileOptions, Stage};
pub use foundation::error::{BrushError, BrushResult};
pub use geometry::provider::{GeometryProvider, Particle, SceneGeometry, ShaderValidation};
pub use normalize::charts::{
    DEFAULT_SEGMENT_COLOR, PieSlice, SegmentBar, normalize_curve_points, normalize_lyrics_words,
    normalize_pie_slices, normalize_segment_bars,
};
pub use patch::model::{Patch, PatchOp};
pub use stroke::model::{
    AnimateMoonwalk, AnnotateInsight, ApplyMaterialFx, DrawAdoptionCurve, DrawPieSaturation,
    DrawSegmentedAttachBars, EmitFx, OrbitGlobe, RenderMode, SetActorAnimation, SetActorMotion,
    SetLyricsTrack, SpawnCharacter, SpawnSceneActor, Stroke, StrokeOp, Timing, decode_batch,
};
