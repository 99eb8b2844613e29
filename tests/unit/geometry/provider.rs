use super::*;
use serde_json::json;

fn geometry() -> SceneGeometry {
    SceneGeometry::default()
}

#[test]
fn spline_hits_the_endpoints() {
    let control = [[280.0, 210.0], [322.0, 182.0], [380.0, 205.0]];
    assert_eq!(geometry().spline_point_at(&control, 0.0), [280.0, 210.0]);
    assert_eq!(geometry().spline_point_at(&control, 1.0), [380.0, 205.0]);
}

#[test]
fn spline_is_linear_between_two_points() {
    let control = [[0.0, 0.0], [10.0, 10.0]];
    let [x, y] = geometry().spline_point_at(&control, 0.5);
    assert!((x - 5.0).abs() < 1e-9);
    assert!((y - 5.0).abs() < 1e-9);
}

#[test]
fn spline_degenerate_inputs_do_not_panic() {
    assert_eq!(geometry().spline_point_at(&[], 0.5), [0.0, 0.0]);
    assert_eq!(geometry().spline_point_at(&[[3.0, 4.0]], 0.9), [3.0, 4.0]);
    // out-of-range t clamps
    let control = [[0.0, 0.0], [10.0, 10.0]];
    assert_eq!(geometry().spline_point_at(&control, 7.0), [10.0, 10.0]);
}

#[test]
fn particles_are_deterministic_per_seed() {
    let g = geometry();
    assert_eq!(g.particles_from(11, 6), g.particles_from(11, 6));
    assert_ne!(g.particles_from(11, 6), g.particles_from(12, 6));
    assert_eq!(g.particles_from(11, 0).len(), 0);
}

#[test]
fn particles_stay_inside_the_stage() {
    for p in geometry().particles_from(99, 64) {
        assert!(p.x >= 0.0 && p.x <= 720.0);
        assert!(p.y >= 0.0 && p.y <= 360.0);
        assert!(p.radius >= 1.5 && p.radius <= 6.0);
        assert!(p.opacity >= 0.3 && p.opacity <= 1.0);
    }
}

#[test]
fn phase_wraps_within_the_period() {
    let g = geometry();
    assert_eq!(g.phase_at(0, 2300), 0.0);
    assert_eq!(g.phase_at(1150, 2300), 0.5);
    assert_eq!(g.phase_at(2300, 2300), 0.0);
    assert_eq!(g.phase_at(100, 0), 0.0); // zero period clamps instead of dividing
    let v = g.phase_at(987_654, 2300);
    assert!((0.0..1.0).contains(&v));
}

#[test]
fn validator_accepts_in_range_uniforms_and_drops_undeclared_keys() {
    let uniforms = json!({ "ior": 1.4, "sparkles": 3 });
    let result = geometry()
        .validate_shader_uniforms("glass_refraction_like", uniforms.as_object().unwrap());
    assert!(result.ok);
    assert_eq!(result.reason, None);
    assert_eq!(result.sanitized.get("ior").and_then(|v| v.as_f64()), Some(1.4));
    assert!(result.sanitized.get("sparkles").is_none());
}

#[test]
fn validator_rejects_out_of_range_and_non_numeric_uniforms() {
    let g = geometry();
    let out_of_range = json!({ "ior": 9.0 });
    let result =
        g.validate_shader_uniforms("glass_refraction_like", out_of_range.as_object().unwrap());
    assert!(!result.ok);
    assert!(result.reason.as_deref().unwrap().contains("ior"));

    let not_a_number = json!({ "ior": "glassy" });
    let result =
        g.validate_shader_uniforms("glass_refraction_like", not_a_number.as_object().unwrap());
    assert!(!result.ok);
}

#[test]
fn validator_rejects_unknown_shaders() {
    let uniforms = json!({});
    let result = geometry().validate_shader_uniforms("chrome_warp", uniforms.as_object().unwrap());
    assert!(!result.ok);
    assert!(result.reason.as_deref().unwrap().contains("chrome_warp"));
}
