//! Chart-data normalizers.
//!
//! Each normalizer takes a loose candidate value straight off the wire and a
//! fallback, and produces strictly-validated output. None of them can fail;
//! hopeless input collapses to the fallback.

use serde_json::Value;

use crate::foundation::{
    coerce::{f64_or, field, string_or},
    core::round_to,
};

/// Default segment color when a row does not carry one.
pub const DEFAULT_SEGMENT_COLOR: &str = "#22d3ee";

/// Minimum x-distance between two curve points before they collapse into one.
const CURVE_DEDUP_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One pie slice with an integer percentage value.
pub struct PieSlice {
    /// Slice label.
    pub label: String,
    /// Integer percentage; a normalized set sums to exactly 100.
    pub value: i64,
}

impl PieSlice {
    /// Convenience constructor.
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One segmented-bar entry with a clamped target.
pub struct SegmentBar {
    /// Bar label.
    pub label: String,
    /// Target value in `[0, 100]`, rounded to 3 decimals.
    pub target: f64,
    /// Bar color.
    pub color: String,
}

/// Normalize candidate curve rows into ordered, clamped `[x, y]` points.
///
/// Rows that do not resolve to a finite coercible pair are dropped; surviving
/// coordinates clamp to `[0, 100]`. Fewer than two valid points (before or
/// after x-deduplication) replaces the whole set with `fallback`; an empty
/// fallback yields an empty result. Under the
/// `"growth"` trend label, y is rewritten as a running minimum over ascending
/// x. The label is historical; see the chart consumer before renaming it.
pub fn normalize_curve_points(raw: &Value, fallback: &[[f64; 2]], trend: &str) -> Vec<[f64; 2]> {
    let mut points = Vec::new();
    if let Some(rows) = raw.as_array() {
        for row in rows {
            if let Some(point) = curve_row(row) {
                points.push(point);
            }
        }
    } else {
        points = fallback.to_vec();
    }

    if points.len() < 2 {
        points = fallback.to_vec();
    }

    points.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut deduped: Vec<[f64; 2]> = Vec::with_capacity(points.len());
    for [x, y] in points {
        match deduped.last_mut() {
            Some(last) if (last[0] - x).abs() < CURVE_DEDUP_EPSILON => last[1] = y,
            _ => deduped.push([x, y]),
        }
    }
    if deduped.len() < 2 {
        deduped = fallback.to_vec();
    }
    if deduped.is_empty() {
        return deduped;
    }

    if trend == "growth" {
        let mut floor = deduped[0][1];
        for point in &mut deduped {
            floor = floor.min(point[1]);
            point[1] = floor;
        }
    }

    for point in &mut deduped {
        point[0] = round_to(point[0], 3);
        point[1] = round_to(point[1], 3);
    }
    deduped
}

fn curve_row(row: &Value) -> Option<[f64; 2]> {
    let pair = row.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    let x = f64_or(Some(&pair[0]), 0.0);
    let y = f64_or(Some(&pair[1]), 0.0);
    if x.defaulted || y.defaulted {
        return None;
    }
    Some([x.value.clamp(0.0, 100.0), y.value.clamp(0.0, 100.0)])
}

/// Normalize candidate slice rows into integer percentages summing to 100.
///
/// Non-object rows and non-coercible values are dropped; negatives clamp to
/// zero. An empty result or a non-positive total returns `fallback`
/// unchanged. Otherwise every slice but the last converts to
/// `round(value * 100 / total)` and the last absorbs the rounding remainder.
pub fn normalize_pie_slices(raw: &Value, fallback: &[PieSlice]) -> Vec<PieSlice> {
    let mut slices: Vec<(String, f64)> = Vec::new();
    let candidate_rows = raw.as_array();
    let rows: Vec<Value> = match candidate_rows {
        Some(rows) => rows.clone(),
        None => fallback
            .iter()
            .map(|s| serde_json::json!({ "label": s.label, "value": s.value }))
            .collect(),
    };
    for row in &rows {
        if !row.is_object() {
            continue;
        }
        let value = f64_or(field(row, &["value"]), 0.0);
        if value.defaulted && field(row, &["value"]).is_some() {
            continue;
        }
        slices.push((slice_label(row), value.value.max(0.0)));
    }

    if slices.is_empty() {
        return fallback.to_vec();
    }
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return fallback.to_vec();
    }

    let mut normalized = Vec::with_capacity(slices.len());
    let mut running: i64 = 0;
    let last = slices.len() - 1;
    for (idx, (label, value)) in slices.into_iter().enumerate() {
        let pct = if idx == last {
            (100 - running).max(0)
        } else {
            let pct = (value * 100.0 / total).round() as i64;
            running += pct;
            pct
        };
        normalized.push(PieSlice { label, value: pct });
    }
    normalized
}

fn slice_label(row: &Value) -> String {
    let label = string_or(field(row, &["label"]), "").value;
    let trimmed = label.trim();
    if trimmed.is_empty() {
        "Segment".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize candidate segment rows into labeled, clamped bar targets.
///
/// Non-object rows and non-coercible targets are skipped; targets clamp to
/// `[0, 100]` and round to 3 decimals. An empty result reverts to the fixed
/// three-segment fallback.
pub fn normalize_segment_bars(raw: &Value) -> Vec<SegmentBar> {
    let fallback = || {
        vec![
            SegmentBar {
                label: "Enterprise".to_string(),
                target: 78.0,
                color: DEFAULT_SEGMENT_COLOR.to_string(),
            },
            SegmentBar {
                label: "Mid-Market".to_string(),
                target: 63.0,
                color: "#34d399".to_string(),
            },
            SegmentBar {
                label: "SMB".to_string(),
                target: 49.0,
                color: "#f59e0b".to_string(),
            },
        ]
    };

    let Some(rows) = raw.as_array() else {
        return fallback();
    };

    let mut segments = Vec::new();
    for row in rows {
        if !row.is_object() {
            continue;
        }
        let target = f64_or(field(row, &["target"]), 0.0);
        if target.defaulted && field(row, &["target"]).is_some() {
            continue;
        }
        let color = string_or(field(row, &["color"]), DEFAULT_SEGMENT_COLOR).value;
        let color = color.trim();
        segments.push(SegmentBar {
            label: slice_label(row),
            target: round_to(target.value.clamp(0.0, 100.0), 3),
            color: if color.is_empty() {
                DEFAULT_SEGMENT_COLOR.to_string()
            } else {
                color.to_string()
            },
        });
    }

    if segments.is_empty() {
        fallback()
    } else {
        segments
    }
}

/// Normalize a lyrics word list: stringify, trim, drop empties, fall back to
/// a fixed six-word phrase, truncate to 24 words.
pub fn normalize_lyrics_words(raw: &Value) -> Vec<String> {
    let mut words = Vec::new();
    if let Some(items) = raw.as_array() {
        for item in items {
            let word = string_or(Some(item), "").value;
            let word = word.trim();
            if !word.is_empty() {
                words.push(word.to_string());
            }
        }
    }
    if words.is_empty() {
        words = ["The", "cow", "jumps", "over", "the", "moon"]
            .into_iter()
            .map(str::to_string)
            .collect();
    }
    words.truncate(24);
    words
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/charts.rs"]
mod tests;
