//! Stroke dispatcher and patch emitter.
//!
//! The top-level entry point iterates the batch in input order, turns each
//! stroke's `kind` + `params` into a typed [`StrokeOp`], and hands it to the
//! matching builder. Compilation never fails: malformed strokes degrade into
//! warning annotation patches and the batch keeps going.

use serde_json::{Value, json};

use crate::{
    foundation::coerce::f64_or,
    foundation::core::{CompileOptions, round_to},
    geometry::provider::GeometryProvider,
    normalize::charts::{
        PieSlice, normalize_curve_points, normalize_lyrics_words, normalize_pie_slices,
        normalize_segment_bars,
    },
    patch::model::Patch,
    script::interpreter::run_screen_script,
    stroke::model::{
        ApplyMaterialFx, EmitFx, SetActorMotion, SetLyricsTrack, Stroke, StrokeOp, Timing,
    },
};

/// Fallback adoption-curve points used when the stroke carries no usable ones.
const CURVE_FALLBACK: [[f64; 2]; 6] = [
    [0.0, 90.0],
    [20.0, 80.0],
    [40.0, 61.0],
    [60.0, 48.0],
    [80.0, 30.0],
    [100.0, 15.0],
];

/// Shader id substituted when uniform validation rejects a material.
const FALLBACK_SHADER_ID: &str = "flat_fallback";

/// Compile a stroke batch into a flat, time-tagged patch sequence using the
/// default stage dimensions.
pub fn compile_batch(strokes: &[Stroke], geometry: &dyn GeometryProvider) -> Vec<Patch> {
    compile_batch_with(strokes, geometry, &CompileOptions::default())
}

/// Compile a stroke batch with explicit options.
///
/// Patches are emitted in stroke order; every patch's `at_ms` is at least the
/// owning stroke's `start_ms`. The output is deterministic as long as
/// `geometry` is.
#[tracing::instrument(skip(strokes, geometry, options), fields(strokes = strokes.len()))]
pub fn compile_batch_with(
    strokes: &[Stroke],
    geometry: &dyn GeometryProvider,
    options: &CompileOptions,
) -> Vec<Patch> {
    let mut patches = Vec::new();

    for stroke in strokes {
        let op = StrokeOp::from_wire(&stroke.kind, &stroke.params);
        let timing = &stroke.timing;
        let start = timing.start_ms;
        let duration = timing.duration_ms;

        match op {
            StrokeOp::SpawnCharacter(p) => patches.push(Patch::add(
                format!("/actors/{}", p.actor_id),
                json!({ "type": "character", "x": p.x, "y": p.y }),
                start,
            )),

            StrokeOp::AnimateMoonwalk(p) => patches.push(Patch::replace(
                format!("/actors/{}/animation", p.actor_id),
                json!({
                    "name": "moonwalk",
                    "duration_ms": duration,
                    "easing": easing_or(timing, "easeInOutCubic"),
                }),
                start,
            )),

            StrokeOp::OrbitGlobe(p) => {
                patches.push(Patch::add(
                    "/actors/globe",
                    json!({ "type": "globe", "x": 410, "y": 150 }),
                    start,
                ));
                patches.push(Patch::add(
                    "/actors/ufo",
                    json!({ "type": "ufo", "motion": "orbit", "radius": p.radius }),
                    start + 40,
                ));
            }

            StrokeOp::UfoLandingBeat => patches.push(Patch::replace(
                "/actors/ufo/motion",
                json!({ "name": "landing", "duration_ms": duration, "beam": true }),
                start,
            )),

            StrokeOp::DrawAdoptionCurve(p) => {
                let points = normalize_curve_points(&p.points, &CURVE_FALLBACK, &p.trend);
                patches.push(Patch::add(
                    "/charts/adoption_curve",
                    json!({
                        "type": "line",
                        "label": "Adoption",
                        "trend": if p.trend.is_empty() { "neutral" } else { p.trend.as_str() },
                        "points": points,
                        "at_ms": start,
                        "duration_ms": duration,
                        "series": p.series,
                    }),
                    start,
                ));
            }

            StrokeOp::DrawPieSaturation(p) => {
                let fallback = [PieSlice::new("Adopted", 68), PieSlice::new("Remaining", 32)];
                let slices = normalize_pie_slices(&p.slices, &fallback);
                patches.push(Patch::add(
                    "/charts/saturation_pie",
                    json!({
                        "type": "pie",
                        "slices": slices,
                        "at_ms": start,
                        "duration_ms": duration,
                    }),
                    start,
                ));
            }

            StrokeOp::DrawSegmentedAttachBars(p) => patches.push(Patch::add(
                "/charts/segmented_attach",
                json!({
                    "type": "bar-segmented",
                    "trend": p.trend,
                    "segments": normalize_segment_bars(&p.segments),
                    "at_ms": start,
                    "duration_ms": duration,
                }),
                start,
            )),

            StrokeOp::SetLyricsTrack(p) => patches.push(build_lyrics_track(&p, start)),

            StrokeOp::AnnotateInsight(p) => patches.push(Patch::add(
                "/annotations/-",
                json!({ "text": p.text, "style": "callout" }),
                start,
            )),

            StrokeOp::SceneMorph => patches.push(Patch::replace(
                "/scene/transition",
                json!({
                    "name": "morph",
                    "duration_ms": duration,
                    "easing": easing_or(timing, "easeInOutQuart"),
                }),
                start,
            )),

            StrokeOp::SetRenderMode(mode) => {
                patches.push(Patch::replace("/render/mode", json!(mode.as_str()), start));
            }

            StrokeOp::RunScreenScript { commands } => {
                patches.extend(run_screen_script(&commands, start, options.stage));
            }

            StrokeOp::SpawnSceneActor(p) => patches.push(Patch::add(
                format!("/actors/{}", p.actor_id),
                json!({ "type": p.actor_type, "x": p.x, "y": p.y, "style": p.style }),
                start,
            )),

            StrokeOp::SetActorMotion(p) => patches.push(build_actor_motion(&p, start, geometry)),

            StrokeOp::SetActorAnimation(p) => patches.push(Patch::replace(
                format!("/actors/{}/animation", p.actor_id),
                p.animation,
                start,
            )),

            StrokeOp::EmitFx(p) => patches.push(build_fx(&p, start, geometry)),

            StrokeOp::SetEnvironmentMood { mood } => {
                patches.push(Patch::replace("/environment/mood", mood, start));
            }

            StrokeOp::SetCameraMove { params } => {
                patches.push(Patch::replace("/camera/motion", params, start));
            }

            StrokeOp::ApplyMaterialFx(p) => {
                build_material_fx(&p, start, geometry, &mut patches);
            }

            StrokeOp::Unsupported { kind } => {
                tracing::warn!(kind, stroke_id = %stroke.stroke_id, "unsupported stroke kind");
                patches.push(Patch::warning(
                    format!("Unsupported stroke kind: {kind}"),
                    start,
                ));
            }
        }
    }

    patches
}

fn easing_or(timing: &Timing, default: &str) -> String {
    timing
        .easing
        .clone()
        .unwrap_or_else(|| default.to_string())
}

fn build_lyrics_track(p: &SetLyricsTrack, stroke_start: u64) -> Patch {
    let words = normalize_lyrics_words(&p.words);
    let start = p.start_ms.unwrap_or(stroke_start);
    let items: Vec<Value> = words
        .iter()
        .enumerate()
        .map(|(idx, text)| json!({ "text": text, "at_ms": start + idx as u64 * p.step_ms }))
        .collect();
    Patch::replace(
        "/lyrics/words",
        json!({ "items": items, "start_ms": start, "step_ms": p.step_ms }),
        stroke_start,
    )
}

/// Default swim-cycle path when the motion descriptor carries none.
const SWIM_CYCLE_FALLBACK: [[f64; 2]; 4] =
    [[280.0, 210.0], [322.0, 182.0], [380.0, 205.0], [338.0, 234.0]];

fn build_actor_motion(p: &SetActorMotion, start: u64, geometry: &dyn GeometryProvider) -> Patch {
    let mut motion = p.motion.clone();
    if let Some(map) = motion.as_object_mut()
        && map.get("name").and_then(Value::as_str) == Some("swim-cycle")
    {
        let control = match map.get("path_points") {
            None => SWIM_CYCLE_FALLBACK.to_vec(),
            Some(raw) => raw
                .as_array()
                .map(|rows| {
                    rows.iter()
                        .filter_map(|row| {
                            let pair = row.as_array()?;
                            if pair.len() < 2 {
                                return None;
                            }
                            let x = f64_or(Some(&pair[0]), 0.0);
                            let y = f64_or(Some(&pair[1]), 0.0);
                            (!x.defaulted && !y.defaulted).then_some([x.value, y.value])
                        })
                        .collect::<Vec<[f64; 2]>>()
                })
                .unwrap_or_default(),
        };

        let samples: Vec<[f64; 2]> = if control.len() >= 2 {
            (0..8)
                .map(|i| {
                    let [x, y] = geometry.spline_point_at(&control, i as f64 / 7.0);
                    [round_to(x, 2), round_to(y, 2)]
                })
                .collect()
        } else {
            vec![[310.0, 205.0]]
        };
        map.insert("sample_points".to_string(), json!(samples));
    }
    Patch::replace(format!("/actors/{}/motion", p.actor_id), motion, start)
}

fn build_fx(p: &EmitFx, start: u64, geometry: &dyn GeometryProvider) -> Patch {
    let mut value = p.extra.clone();
    value.insert("type".to_string(), json!(p.fx_id));
    match p.fx_id.as_str() {
        "bubble_emitter" => {
            let particles = geometry.particles_from(p.seed, p.count);
            value.insert("particles".to_string(), json!(particles));
        }
        "caustic_pattern" => {
            let phase = geometry.phase_at(start, p.shimmer_period_ms);
            value.insert("phase".to_string(), json!(round_to(phase, 5)));
        }
        _ => {}
    }
    Patch::add(format!("/fx/{}", p.fx_id), Value::Object(value), start)
}

/// The two-path material protocol: a valid shader replaces the material with
/// sanitized uniforms; a rejected one emits both a safe `flat_fallback`
/// replacement and a warning annotation naming the material and the reason.
fn build_material_fx(
    p: &ApplyMaterialFx,
    start: u64,
    geometry: &dyn GeometryProvider,
    patches: &mut Vec<Patch>,
) {
    let validation = geometry.validate_shader_uniforms(&p.shader_id, &p.uniforms);
    if validation.ok {
        patches.push(Patch::replace(
            format!("/materials/{}", p.material_id),
            json!({
                "shader_id": p.shader_id,
                "uniforms": validation.sanitized,
                "fallback": false,
            }),
            start,
        ));
        return;
    }

    let reason = validation
        .reason
        .unwrap_or_else(|| "shader_validation_failed".to_string());
    tracing::warn!(
        material_id = %p.material_id,
        shader_id = %p.shader_id,
        reason = %reason,
        "material shader rejected, applying fallback"
    );
    patches.push(Patch::replace(
        format!("/materials/{}", p.material_id),
        json!({
            "shader_id": FALLBACK_SHADER_ID,
            "uniforms": {},
            "fallback": true,
            "reason": reason,
        }),
        start,
    ));
    patches.push(Patch::warning(
        format!("Material fallback for {}: {reason}", p.material_id),
        start,
    ));
}

#[cfg(test)]
#[path = "../../tests/unit/compile/batch.rs"]
mod tests;
