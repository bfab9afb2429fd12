use super::*;
use serde_json::json;
use crate::foundation::core::Vec2;

fn comp(v: serde_json::Value) -> LottieResult<Composition> {
    Composition::from_slice(v.to_string().as_bytes())
}

fn square_layer(ind: i64, color: [f64; 4], x: f64) -> serde_json::Value {
    json!({
        "ty": 4, "ind": ind, "nm": format!("sq{ind}"),
        "ks": {"p": {"k": [x, 0]}},
        "shapes": [
            {"ty": "rc", "p": {"k": [0, 0]}, "s": {"k": [10, 10]}},
            {"ty": "fl", "c": {"k": color}, "o": {"k": 100}}
        ]
    })
}

fn fill_colors(list: &DisplayList) -> Vec<[u8; 4]> {
    list.items
        .iter()
        .filter_map(|i| match i {
            DrawItem::Fill { color, .. } => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn frame_count_and_duration_follow_in_out_points() {
    let c = comp(json!({"fr": 60, "ip": 0, "op": 180, "w": 100, "h": 50, "layers": []})).unwrap();
    assert_eq!(c.frame_count(), 180);
    assert!((c.duration_secs() - 3.0).abs() < 1e-9);
    assert_eq!(c.size, Size::new(100.0, 50.0));

    let odd = comp(json!({"fr": 30, "ip": 10, "op": 20.5, "w": 1, "h": 1})).unwrap();
    assert_eq!(odd.frame_count(), 10);
    assert_eq!(odd.frame_time(3), 13.0);

    let empty = comp(json!({"fr": 30, "ip": 10, "op": 5, "w": 1, "h": 1})).unwrap();
    assert_eq!(empty.frame_count(), 0);
}

#[test]
fn invalid_headers_are_rejected() {
    for bad in [
        json!({"fr": 0, "ip": 0, "op": 10, "w": 1, "h": 1}),
        json!({"fr": 30, "ip": 0, "op": 10, "w": 0, "h": 1}),
        json!({"ip": 0, "op": 10, "w": 1, "h": 1}),
        json!([1, 2, 3]),
    ] {
        assert!(matches!(comp(bad), Err(LottieError::ResourceLoad(_))));
    }
    assert!(Composition::from_slice(b"{not json").is_err());
}

#[test]
fn display_list_is_bottom_first() {
    let c = comp(json!({
        "fr": 30, "ip": 0, "op": 10, "w": 100, "h": 100,
        "layers": [
            square_layer(1, [1.0, 0.0, 0.0, 1.0], 0.0),
            square_layer(2, [0.0, 0.0, 1.0, 1.0], 0.0)
        ]
    }))
    .unwrap();
    let list = c.display_list(0);
    // Red is listed first in the document, so it is on top and painted last.
    assert_eq!(
        fill_colors(&list),
        vec![[0, 0, 255, 255], [255, 0, 0, 255]]
    );
}

#[test]
fn layer_in_out_points_gate_visibility() {
    let mut layer = square_layer(1, [1.0, 0.0, 0.0, 1.0], 0.0);
    layer["ip"] = json!(5);
    layer["op"] = json!(8);
    let c = comp(json!({"fr": 30, "ip": 0, "op": 10, "w": 10, "h": 10, "layers": [layer]})).unwrap();
    assert!(c.display_list(4).is_empty());
    assert_eq!(c.display_list(5).len(), 1);
    assert_eq!(c.display_list(7).len(), 1);
    assert!(c.display_list(8).is_empty());
}

#[test]
fn parent_transform_is_applied() {
    let parent = json!({"ty": 3, "ind": 10, "ks": {"p": {"k": [100, 50]}}});
    let mut child = square_layer(1, [1.0, 0.0, 0.0, 1.0], 5.0);
    child["parent"] = json!(10);
    let c = comp(json!({"fr": 30, "ip": 0, "op": 10, "w": 10, "h": 10, "layers": [child, parent]}))
        .unwrap();
    let list = c.display_list(0);
    let Some(DrawItem::Fill { transform, .. }) = list.items.first() else {
        panic!("expected a fill");
    };
    assert_eq!(transform.translation(), Vec2::new(105.0, 50.0));
}

#[test]
fn parent_cycles_are_rejected() {
    let mut a = square_layer(1, [1.0, 0.0, 0.0, 1.0], 0.0);
    let mut b = square_layer(2, [1.0, 0.0, 0.0, 1.0], 0.0);
    a["parent"] = json!(2);
    b["parent"] = json!(1);
    let err = comp(json!({"fr": 30, "ip": 0, "op": 10, "w": 10, "h": 10, "layers": [a, b]}))
        .unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn solid_layer_fills_its_rect() {
    let c = comp(json!({
        "fr": 30, "ip": 0, "op": 10, "w": 10, "h": 10,
        "layers": [{"ty": 1, "sc": "#00ff00", "sw": 10, "sh": 10, "ks": {"o": {"k": 50}}}]
    }))
    .unwrap();
    assert_eq!(fill_colors(&c.display_list(0)), vec![[0, 255, 0, 128]]);
}

#[test]
fn unsupported_and_hidden_layers_draw_nothing() {
    let mut hidden = square_layer(1, [1.0, 0.0, 0.0, 1.0], 0.0);
    hidden["hd"] = json!(true);
    let c = comp(json!({
        "fr": 30, "ip": 0, "op": 10, "w": 10, "h": 10,
        "layers": [hidden, {"ty": 2, "nm": "image"}, {"ty": 5, "nm": "text"}]
    }))
    .unwrap();
    assert_eq!(c.layers.len(), 3);
    assert!(c.display_list(0).is_empty());
}

#[test]
fn start_time_offsets_layer_animation() {
    let layer = json!({
        "ty": 4, "st": 10,
        "ks": {"p": {"a": 1, "k": [
            {"t": 0, "s": [0, 0]},
            {"t": 10, "s": [100, 0]}
        ]}},
        "shapes": [
            {"ty": "rc", "p": {"k": [0, 0]}, "s": {"k": [1, 1]}},
            {"ty": "fl", "c": {"k": [1, 1, 1, 1]}}
        ]
    });
    let c = comp(json!({"fr": 30, "ip": 0, "op": 30, "w": 10, "h": 10, "layers": [layer]})).unwrap();
    let at = |i: u32| match c.display_list(i).items.first() {
        Some(DrawItem::Fill { transform, .. }) => transform.translation().x,
        _ => f64::NAN,
    };
    assert_eq!(at(10), 0.0);
    assert_eq!(at(15), 50.0);
}
