//! Geometry and effects provider.
//!
//! The compiler delegates parametric path sampling, seeded particle
//! generation, periodic phase computation, and shader-uniform validation to a
//! [`GeometryProvider`]. Determinism is part of the contract: the same inputs
//! must always produce the same outputs, since repeated compilations of the
//! same batch are expected to be byte-identical (for caching and diffing).

use serde_json::{Map, Number, Value};

use crate::foundation::core::{Stage, round_to};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One procedurally generated particle.
pub struct Particle {
    /// Horizontal position in stage pixels.
    pub x: f64,
    /// Vertical position in stage pixels.
    pub y: f64,
    /// Particle radius in pixels.
    pub radius: f64,
    /// Upward drift speed factor.
    pub drift: f64,
    /// Render opacity in `[0, 1]`.
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Outcome of shader-uniform validation.
pub struct ShaderValidation {
    /// Whether the shader id and all declared uniforms were accepted.
    pub ok: bool,
    /// Rejection reason when `ok` is false.
    pub reason: Option<String>,
    /// Accepted uniforms only; undeclared keys are dropped.
    pub sanitized: Map<String, Value>,
}

impl ShaderValidation {
    fn reject(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
            sanitized: Map::new(),
        }
    }
}

/// External geometry and effects functions consumed by the compiler.
///
/// Implementations must be referentially transparent; any memoization has to
/// be keyed purely by input values.
pub trait GeometryProvider {
    /// Sample a parametric path through `control` at `t` in `[0, 1]`.
    fn spline_point_at(&self, control: &[[f64; 2]], t: f64) -> [f64; 2];

    /// Produce a deterministic pseudo-random particle set for `seed`.
    fn particles_from(&self, seed: u64, count: usize) -> Vec<Particle>;

    /// Periodic phase in `[0, 1)` for an elapsed time and period.
    fn phase_at(&self, elapsed_ms: u64, period_ms: u64) -> f64;

    /// Validate shader uniforms, returning accept/reject plus a sanitized map.
    fn validate_shader_uniforms(
        &self,
        shader_id: &str,
        uniforms: &Map<String, Value>,
    ) -> ShaderValidation;
}

/// Accepted range for one declared shader uniform.
struct UniformRange {
    name: &'static str,
    min: f64,
    max: f64,
}

/// Shader registry: id plus the uniforms it declares.
const SHADER_REGISTRY: &[(&str, &[UniformRange])] = &[
    (
        "glass_refraction_like",
        &[
            UniformRange {
                name: "ior",
                min: 1.0,
                max: 2.5,
            },
            UniformRange {
                name: "opacity",
                min: 0.0,
                max: 1.0,
            },
            UniformRange {
                name: "tint_strength",
                min: 0.0,
                max: 1.0,
            },
        ],
    ),
    (
        "water_caustics_like",
        &[
            UniformRange {
                name: "intensity",
                min: 0.0,
                max: 1.0,
            },
            UniformRange {
                name: "period_ms",
                min: 200.0,
                max: 10_000.0,
            },
        ],
    ),
    (
        "toon_rim_like",
        &[UniformRange {
            name: "rim_power",
            min: 0.1,
            max: 8.0,
        }],
    ),
];

#[derive(Clone, Copy, Debug, Default)]
/// Default deterministic provider: Catmull-Rom path sampling, SplitMix64
/// particles bounded to the stage, and a registry-backed shader validator.
pub struct SceneGeometry {
    /// Stage bounds for generated particles.
    pub stage: Stage,
}

impl GeometryProvider for SceneGeometry {
    fn spline_point_at(&self, control: &[[f64; 2]], t: f64) -> [f64; 2] {
        match control.len() {
            0 => [0.0, 0.0],
            1 => control[0],
            _ => catmull_rom(control, t.clamp(0.0, 1.0)),
        }
    }

    fn particles_from(&self, seed: u64, count: usize) -> Vec<Particle> {
        let mut rng = Rng64::new(seed);
        (0..count)
            .map(|_| Particle {
                x: round_to(rng.next_f64_01() * self.stage.width, 2),
                y: round_to(rng.next_f64_01() * self.stage.height, 2),
                radius: round_to(1.5 + rng.next_f64_01() * 4.5, 2),
                drift: round_to(0.2 + rng.next_f64_01() * 0.8, 3),
                opacity: round_to(0.3 + rng.next_f64_01() * 0.7, 3),
            })
            .collect()
    }

    fn phase_at(&self, elapsed_ms: u64, period_ms: u64) -> f64 {
        let period = period_ms.max(1);
        (elapsed_ms % period) as f64 / period as f64
    }

    fn validate_shader_uniforms(
        &self,
        shader_id: &str,
        uniforms: &Map<String, Value>,
    ) -> ShaderValidation {
        let Some((_, ranges)) = SHADER_REGISTRY.iter().find(|(id, _)| *id == shader_id) else {
            return ShaderValidation::reject(format!("unknown shader '{shader_id}'"));
        };

        let mut sanitized = Map::new();
        for (key, value) in uniforms {
            let Some(range) = ranges.iter().find(|r| r.name == key) else {
                tracing::debug!(shader_id, uniform = %key, "dropping undeclared uniform");
                continue;
            };
            let Some(n) = value.as_f64().filter(|n| n.is_finite()) else {
                return ShaderValidation::reject(format!("uniform '{key}' must be a number"));
            };
            if n < range.min || n > range.max {
                return ShaderValidation::reject(format!(
                    "uniform '{key}' out of range [{}, {}]",
                    range.min, range.max
                ));
            }
            sanitized.insert(
                key.clone(),
                Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null),
            );
        }

        ShaderValidation {
            ok: true,
            reason: None,
            sanitized,
        }
    }
}

/// Uniform Catmull-Rom sample through the control points, endpoints clamped.
fn catmull_rom(control: &[[f64; 2]], t: f64) -> [f64; 2] {
    let segments = control.len() - 1;
    let scaled = t * segments as f64;
    let i = (scaled.floor() as usize).min(segments - 1);
    let u = scaled - i as f64;

    let p0 = control[i.saturating_sub(1)];
    let p1 = control[i];
    let p2 = control[i + 1];
    let p3 = control[(i + 2).min(control.len() - 1)];

    let axis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (c - a) * u
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * u * u
            + (3.0 * b - a - 3.0 * c + d) * u * u * u)
    };
    [
        axis(p0[0], p1[0], p2[0], p3[0]),
        axis(p0[1], p1[1], p2[1], p3[1]),
    ]
}

#[derive(Clone, Copy, Debug)]
struct Rng64 {
    state: u64,
}

impl Rng64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/provider.rs"]
mod tests;
