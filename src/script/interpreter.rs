//! Screen-script interpreter.
//!
//! A `runScreenScript` stroke carries a nested program: an ordered list of
//! drawing and motion primitives. Each command emits at most one patch.
//! Commands with insufficient geometry are skipped; unrecognized ops degrade
//! to a warning annotation so the rest of the program keeps compiling.

use serde_json::{Value, json};

use crate::{
    foundation::coerce::{bool_or, f64_or, field, i64_or, string_or},
    foundation::core::{Stage, round_to},
    patch::model::Patch,
};

/// Spacing of the default command schedule when no `at_ms` is supplied.
const DEFAULT_COMMAND_SPACING_MS: u64 = 90;

/// Run one nested program, emitting patches in command order.
///
/// `start_ms` is the owning stroke's start; each command lands at
/// `start_ms + max(0, at_ms)` where `at_ms` defaults to `index * 90`, so an
/// untimed program still gets a stable monotonically-increasing schedule.
pub(crate) fn run_screen_script(commands: &[Value], start_ms: u64, stage: Stage) -> Vec<Patch> {
    let mut patches = Vec::new();

    for (idx, command) in commands.iter().enumerate() {
        if !command.is_object() {
            continue;
        }
        let op = string_or(field(command, &["op"]), "")
            .value
            .trim()
            .to_ascii_lowercase();
        if op.is_empty() {
            continue;
        }

        let default_offset = idx as u64 * DEFAULT_COMMAND_SPACING_MS;
        let offset = i64_or(field(command, &["at_ms"]), default_offset as i64)
            .value
            .max(0) as u64;
        let at_ms = start_ms + offset;
        let relative = bool_or(field(command, &["relative"]), false).value;
        let actor_id = string_or(
            field(command, &["id", "actor_id"]),
            &format!("script_actor_{idx}"),
        )
        .value;

        match op.as_str() {
            "dot" | "circle" => {
                let Some(point) = point_or_fields(command, &["x"], &["y"], 180.0, relative, stage)
                else {
                    continue;
                };
                let default_radius = if op == "dot" { 8 } else { 42 };
                let style = json!({
                    "fill": string_or(field(command, &["color", "fill"]), "#22d3ee").value,
                    "stroke": string_or(field(command, &["stroke"]), "#e2e8f0").value,
                    "line_width": line_width(command, 2),
                    "radius": i64_or(field(command, &["radius"]), default_radius).value.max(1),
                    "z": point[2],
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": op, "x": point[0], "y": point[1], "style": style }),
                    at_ms,
                ));
            }

            "line" => {
                let points = match field(command, &["points"]) {
                    Some(raw) => script_points(raw, relative, stage),
                    None => endpoints_from_fields(command, relative, stage),
                };
                if points.len() < 2 {
                    continue;
                }
                let (p1, p2) = (points[0], points[1]);
                let style = json!({
                    "stroke": string_or(field(command, &["color", "stroke"]), "#22d3ee").value,
                    "line_width": line_width(command, 4),
                    "x2": p2[0],
                    "y2": p2[1],
                    "z": round_to((p1[2] + p2[2]) / 2.0, 3),
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": "line", "x": p1[0], "y": p1[1], "style": style }),
                    at_ms,
                ));
            }

            "polyline" | "path" => {
                let points = coerce_points_field(command, relative, stage);
                if points.len() < 2 {
                    continue;
                }
                let style = json!({
                    "stroke": string_or(field(command, &["color", "stroke"]), "#22d3ee").value,
                    "line_width": line_width(command, 4),
                    "points": points,
                    "z": z_average(&points),
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": "polyline", "x": points[0][0], "y": points[0][1], "style": style }),
                    at_ms,
                ));
            }

            "polygon" | "fillpolygon" => {
                let points = coerce_points_field(command, relative, stage);
                if points.len() < 3 {
                    continue;
                }
                let style = json!({
                    "fill": string_or(field(command, &["fill", "color"]), "#22d3ee").value,
                    "stroke": string_or(field(command, &["stroke"]), "#e2e8f0").value,
                    "line_width": line_width(command, 2),
                    "points": points,
                    "z": z_average(&points),
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": "polygon", "x": points[0][0], "y": points[0][1], "style": style }),
                    at_ms,
                ));
            }

            "move" | "motion" => {
                let target_id = string_or(field(command, &["target_id", "id"]), "").value;
                let target_id = target_id.trim();
                if target_id.is_empty() {
                    continue;
                }
                let path_points = field(command, &["path_points"])
                    .map(|raw| script_points(raw, relative, stage))
                    .unwrap_or_default();
                if path_points.len() < 2 {
                    continue;
                }
                let flat: Vec<[f64; 2]> = path_points.iter().map(|p| [p[0], p[1]]).collect();
                patches.push(Patch::replace(
                    format!("/actors/{target_id}/motion"),
                    json!({
                        "name": string_or(field(command, &["name"]), "script-path").value,
                        "loop": bool_or(field(command, &["loop"]), true).value,
                        "duration_ms": i64_or(field(command, &["duration_ms"]), 3200).value.max(200),
                        "path_points": flat,
                        "path_points_3d": path_points,
                    }),
                    at_ms,
                ));
            }

            "annotate" => {
                let text = string_or(field(command, &["text"]), "").value;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                patches.push(Patch::add(
                    "/annotations/-",
                    json!({ "text": text, "style": "callout" }),
                    at_ms,
                ));
            }

            "rect" => {
                let Some(point) = point_or_fields(command, &["x"], &["y"], 180.0, relative, stage)
                else {
                    continue;
                };
                let style = json!({
                    "fill": string_or(field(command, &["fill", "color"]), "#22d3ee").value,
                    "stroke": string_or(field(command, &["stroke"]), "#e2e8f0").value,
                    "line_width": line_width(command, 2),
                    "width": i64_or(field(command, &["width"]), 60).value.max(1),
                    "height": i64_or(field(command, &["height"]), 40).value.max(1),
                    "z": point[2],
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": "rect", "x": point[0], "y": point[1], "style": style }),
                    at_ms,
                ));
            }

            "ellipse" => {
                let Some(point) =
                    point_or_fields(command, &["cx", "x"], &["cy", "y"], 180.0, relative, stage)
                else {
                    continue;
                };
                // "fill": "none" is valid SVG for an outline-only ring.
                let fill = string_or(field(command, &["fill", "color"]), "#22d3ee").value;
                let style = json!({
                    "fill": if fill.is_empty() { "#22d3ee".to_string() } else { fill },
                    "stroke": string_or(field(command, &["stroke"]), "#e2e8f0").value,
                    "line_width": line_width(command, 2),
                    "rx": i64_or(field(command, &["rx", "r"]), 40).value.max(1),
                    "ry": i64_or(field(command, &["ry", "r"]), 26).value.max(1),
                    "z": point[2],
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": "ellipse", "x": point[0], "y": point[1], "style": style }),
                    at_ms,
                ));
            }

            "text" => {
                let Some(point) = point_or_fields(command, &["x"], &["y"], 180.0, relative, stage)
                else {
                    continue;
                };
                let text = string_or(field(command, &["text"]), "").value;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                let style = json!({
                    "fill": string_or(field(command, &["fill", "color"]), "#f8fafc").value,
                    "font_size": i64_or(field(command, &["font_size", "size"]), 16).value.max(8),
                    "anchor": string_or(field(command, &["anchor", "text_anchor"]), "middle").value,
                    "text": text,
                    "z": point[2],
                });
                patches.push(Patch::add(
                    format!("/actors/{actor_id}"),
                    json!({ "type": "text", "x": point[0], "y": point[1], "style": style }),
                    at_ms,
                ));
            }

            other => {
                tracing::debug!(op = other, index = idx, "unsupported script op");
                patches.push(Patch::warning(format!("Unsupported script op: {other}"), at_ms));
            }
        }
    }

    patches
}

/// Coerce one `[x, y]` or `[x, y, z]` triple; missing components default to
/// zero. Relative coordinates clamp to `[0, 1]` and scale by the stage; z is
/// never scaled. All components round to 3 decimals.
fn script_point(raw: &Value, relative: bool, stage: Stage) -> Option<[f64; 3]> {
    let parts = raw.as_array()?;
    if parts.len() < 2 {
        return None;
    }
    let x = f64_or(Some(&parts[0]), 0.0).value;
    let y = f64_or(Some(&parts[1]), 0.0).value;
    let z = parts.get(2).map_or(0.0, |v| f64_or(Some(v), 0.0).value);
    Some(finish_point(x, y, z, relative, stage))
}

fn finish_point(x: f64, y: f64, z: f64, relative: bool, stage: Stage) -> [f64; 3] {
    let (x, y) = if relative {
        (
            x.clamp(0.0, 1.0) * stage.width,
            y.clamp(0.0, 1.0) * stage.height,
        )
    } else {
        (x, y)
    };
    [round_to(x, 3), round_to(y, 3), round_to(z, 3)]
}

fn script_points(raw: &Value, relative: bool, stage: Stage) -> Vec<[f64; 3]> {
    let Some(rows) = raw.as_array() else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| script_point(row, relative, stage))
        .collect()
}

/// An explicit `point` field wins; otherwise the point assembles from the
/// aliased scalar fields with the given default for x and y.
fn point_or_fields(
    command: &Value,
    x_keys: &[&str],
    y_keys: &[&str],
    default_xy: f64,
    relative: bool,
    stage: Stage,
) -> Option<[f64; 3]> {
    if let Some(raw) = field(command, &["point"]) {
        return script_point(raw, relative, stage);
    }
    let x = f64_or(field(command, x_keys), default_xy).value;
    let y = f64_or(field(command, y_keys), default_xy).value;
    let z = f64_or(field(command, &["z"]), 0.0).value;
    Some(finish_point(x, y, z, relative, stage))
}

/// Line endpoints assembled from `x1/y1/x2/y2` when no `points` list exists.
fn endpoints_from_fields(command: &Value, relative: bool, stage: Stage) -> Vec<[f64; 3]> {
    let x1 = f64_or(field(command, &["x1"]), 120.0).value;
    let y1 = f64_or(field(command, &["y1"]), 180.0).value;
    let x2 = f64_or(field(command, &["x2"]), 280.0).value;
    let y2 = f64_or(field(command, &["y2"]), 180.0).value;
    vec![
        finish_point(x1, y1, 0.0, relative, stage),
        finish_point(x2, y2, 0.0, relative, stage),
    ]
}

fn coerce_points_field(command: &Value, relative: bool, stage: Stage) -> Vec<[f64; 3]> {
    field(command, &["points"])
        .map(|raw| script_points(raw, relative, stage))
        .unwrap_or_default()
}

fn line_width(command: &Value, default: i64) -> i64 {
    i64_or(field(command, &["line_width"]), default).value.max(1)
}

fn z_average(points: &[[f64; 3]]) -> f64 {
    round_to(
        points.iter().map(|p| p[2]).sum::<f64>() / points.len() as f64,
        3,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/script/interpreter.rs"]
mod tests;
