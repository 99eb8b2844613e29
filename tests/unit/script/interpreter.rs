use super::*;
use crate::patch::model::PatchOp;

fn run(commands: serde_json::Value, start_ms: u64) -> Vec<Patch> {
    run_screen_script(commands.as_array().unwrap(), start_ms, Stage::default())
}

#[test]
fn rect_command_creates_a_rect_actor() {
    let patches = run(
        json!([{
            "op": "rect",
            "id": "house_walls",
            "point": [270, 168],
            "width": 180,
            "height": 130,
            "fill": "#f59e0b",
            "stroke": "#e2e8f0",
            "line_width": 2,
        }]),
        0,
    );
    assert_eq!(patches.len(), 1);
    let actor = &patches[0];
    assert_eq!(actor.path, "/actors/house_walls");
    assert_eq!(actor.value["type"], json!("rect"));
    assert_eq!(actor.value["x"].as_f64(), Some(270.0));
    assert_eq!(actor.value["y"].as_f64(), Some(168.0));
    assert_eq!(actor.value["style"]["width"], json!(180));
    assert_eq!(actor.value["style"]["height"], json!(130));
    assert_eq!(actor.value["style"]["fill"], json!("#f59e0b"));
}

#[test]
fn relative_points_scale_to_the_stage() {
    let patches = run(
        json!([{
            "op": "polygon",
            "id": "shape_1",
            "relative": true,
            "points": [[0.2, 0.2, 0.1], [0.5, 0.2, 0.2], [0.4, 0.5, 0.3]],
            "fill": "#22d3ee",
        }]),
        100,
    );
    let polygon = &patches[0];
    assert_eq!(polygon.value["type"], json!("polygon"));
    let points = polygon.value["style"]["points"].as_array().unwrap();
    assert_eq!(points[0][0].as_f64(), Some(144.0)); // 0.2 * 720
    assert_eq!(points[0][1].as_f64(), Some(72.0)); // 0.2 * 360
    assert_eq!(points[0][2].as_f64(), Some(0.1)); // z never scales
}

#[test]
fn relative_points_clamp_before_scaling() {
    let patches = run(
        json!([{ "op": "dot", "relative": true, "point": [4.0, -1.0] }]),
        0,
    );
    let dot = &patches[0];
    assert_eq!(dot.value["x"].as_f64(), Some(720.0));
    assert_eq!(dot.value["y"].as_f64(), Some(0.0));
}

#[test]
fn untimed_commands_get_a_stable_default_schedule() {
    let patches = run(
        json!([
            { "op": "dot", "point": [10, 10] },
            { "op": "dot", "point": [20, 20] },
            { "op": "dot", "point": [30, 30] },
        ]),
        1000,
    );
    let at: Vec<u64> = patches.iter().map(|p| p.at_ms).collect();
    assert_eq!(at, vec![1000, 1090, 1180]);
}

#[test]
fn explicit_at_ms_offsets_from_the_stroke_start() {
    let patches = run(json!([{ "op": "dot", "point": [1, 1], "at_ms": 500 }]), 100);
    assert_eq!(patches[0].at_ms, 600);
    let patches = run(json!([{ "op": "dot", "point": [1, 1], "at_ms": -50 }]), 100);
    assert_eq!(patches[0].at_ms, 100);
}

#[test]
fn dot_and_circle_differ_only_in_default_radius() {
    let patches = run(json!([{ "op": "dot" }, { "op": "circle" }]), 0);
    assert_eq!(patches[0].value["style"]["radius"], json!(8));
    assert_eq!(patches[1].value["style"]["radius"], json!(42));
    assert_eq!(patches[0].value["x"].as_f64(), Some(180.0));
    assert_eq!(patches[0].path, "/actors/script_actor_0");
    assert_eq!(patches[1].path, "/actors/script_actor_1");
}

#[test]
fn line_defaults_and_midpoint_z() {
    let patches = run(
        json!([{ "op": "line", "points": [[0, 0, 1], [10, 10, 2]] }]),
        0,
    );
    let line = &patches[0];
    assert_eq!(line.value["type"], json!("line"));
    assert_eq!(line.value["style"]["x2"].as_f64(), Some(10.0));
    assert_eq!(line.value["style"]["z"].as_f64(), Some(1.5));

    let patches = run(json!([{ "op": "line" }]), 0);
    assert_eq!(patches[0].value["x"].as_f64(), Some(120.0));
    assert_eq!(patches[0].value["style"]["x2"].as_f64(), Some(280.0));
}

#[test]
fn move_requires_a_target_and_two_path_points() {
    let none = run(
        json!([
            { "op": "move", "path_points": [[0, 0], [1, 1]] },
            { "op": "move", "target_id": "a", "path_points": [[0, 0]] },
        ]),
        0,
    );
    assert!(none.is_empty());

    let patches = run(
        json!([{
            "op": "move",
            "target_id": "shape_1",
            "duration_ms": 2800,
            "path_points": [[0, 0, 1], [5, 5, 2], [0, 0, 1]],
        }]),
        100,
    );
    let motion = &patches[0];
    assert_eq!(motion.op, PatchOp::Replace);
    assert_eq!(motion.path, "/actors/shape_1/motion");
    assert_eq!(motion.value["loop"], json!(true));
    assert_eq!(motion.value["duration_ms"], json!(2800));
    assert_eq!(motion.value["path_points"].as_array().unwrap().len(), 3);
    assert_eq!(motion.value["path_points"][0].as_array().unwrap().len(), 2);
    assert_eq!(motion.value["path_points_3d"][0].as_array().unwrap().len(), 3);
}

#[test]
fn ellipse_preserves_the_literal_none_fill() {
    let patches = run(
        json!([{
            "op": "ellipse",
            "id": "planet_ring",
            "point": [360, 180],
            "rx": 92,
            "ry": 22,
            "fill": "none",
            "stroke": "#f59e0b",
            "line_width": 4,
        }]),
        0,
    );
    let ring = &patches[0];
    assert_eq!(ring.value["style"]["fill"], json!("none"));
    assert_eq!(ring.value["style"]["rx"], json!(92));
    assert_eq!(ring.value["style"]["ry"], json!(22));
}

#[test]
fn ellipse_r_feeds_both_radii_and_empty_fill_defaults() {
    let patches = run(json!([{ "op": "ellipse", "r": 30, "fill": "" }]), 0);
    let e = &patches[0];
    assert_eq!(e.value["style"]["rx"], json!(30));
    assert_eq!(e.value["style"]["ry"], json!(30));
    assert_eq!(e.value["style"]["fill"], json!("#22d3ee"));
}

#[test]
fn text_requires_non_empty_content() {
    assert!(run(json!([{ "op": "text", "text": "   " }]), 0).is_empty());
    let patches = run(
        json!([{ "op": "text", "text": " Hello ", "size": 24, "point": [360, 50] }]),
        0,
    );
    let t = &patches[0];
    assert_eq!(t.value["style"]["text"], json!("Hello"));
    assert_eq!(t.value["style"]["font_size"], json!(24));
    assert_eq!(t.value["style"]["anchor"], json!("middle"));
}

#[test]
fn malformed_scalars_take_the_documented_defaults() {
    let patches = run(json!([{ "op": "dot", "x": "abc", "y": {} }]), 0);
    assert_eq!(patches[0].value["x"].as_f64(), Some(180.0));
    assert_eq!(patches[0].value["y"].as_f64(), Some(180.0));

    let patches = run(json!([{ "op": "line", "points": null }]), 0);
    assert_eq!(patches[0].value["x"].as_f64(), Some(120.0));
    assert_eq!(patches[0].value["style"]["x2"].as_f64(), Some(280.0));
}

#[test]
fn insufficient_geometry_silently_skips() {
    let patches = run(
        json!([
            { "op": "polyline", "points": [[1, 1]] },
            { "op": "polygon", "points": [[1, 1], [2, 2]] },
            { "op": "line", "points": [[1, 1]] },
        ]),
        0,
    );
    assert!(patches.is_empty());
}

#[test]
fn unknown_op_degrades_to_a_warning() {
    let patches = run(json!([{ "op": "sparkle" }]), 40);
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].path, "/annotations/-");
    assert_eq!(patches[0].value["style"], json!("warning"));
    assert!(
        patches[0].value["text"]
            .as_str()
            .unwrap()
            .contains("sparkle")
    );
}

#[test]
fn annotate_emits_a_callout() {
    let patches = run(json!([{ "op": "annotate", "text": "look here" }]), 10);
    assert_eq!(patches[0].path, "/annotations/-");
    assert_eq!(patches[0].value["style"], json!("callout"));
}

#[test]
fn non_object_and_empty_op_commands_are_skipped() {
    let patches = run(json!(["nope", 42, { "op": "  " }, {}]), 0);
    assert!(patches.is_empty());
}
