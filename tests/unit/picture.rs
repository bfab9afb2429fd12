use super::*;
use crate::engine::lottie::Composition;
use crate::foundation::core::Point;

fn picture(w: f64, h: f64) -> Picture {
    let json = format!(r#"{{"fr": 30, "ip": 0, "op": 10, "w": {w}, "h": {h}, "layers": []}}"#);
    let comp = Composition::from_slice(json.as_bytes()).unwrap();
    Picture::new(Arc::new(Content::Lottie(comp)))
}

#[test]
fn starts_at_native_size_with_identity() {
    let p = picture(200.0, 100.0);
    assert_eq!(p.size(), Size::new(200.0, 100.0));
    assert_eq!(p.native_size(), p.size());
    assert_eq!(p.transform(), Affine::IDENTITY);
    assert!(p.clip().is_none());
}

#[test]
fn ids_are_unique() {
    assert_ne!(picture(1.0, 1.0).id(), picture(1.0, 1.0).id());
}

#[test]
fn size_stretches_each_axis_independently() {
    let mut p = picture(200.0, 100.0);
    p.set_size(Size::new(400.0, 50.0));
    let snap = p.snapshot();
    let corner = snap.content_transform * Point::new(200.0, 100.0);
    assert_eq!(corner, Point::new(400.0, 50.0));
}

#[test]
fn transform_applies_after_size_fit() {
    let mut p = picture(100.0, 100.0);
    p.set_size(Size::new(200.0, 200.0));
    p.set_transform(Affine::translate((10.0, 0.0)));
    let snap = p.snapshot();
    assert_eq!(snap.content_transform * Point::new(1.0, 1.0), Point::new(12.0, 2.0));
}

#[test]
fn snapshot_captures_frame_and_clip() {
    let mut p = picture(100.0, 100.0);
    p.set_frame(7);
    p.set_transform(Affine::scale(2.0));
    p.set_clip(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    let snap = p.snapshot();
    assert_eq!(snap.frame, 7);
    assert_eq!(snap.picture_id, p.id());
    let (rect, xf) = snap.clip.unwrap();
    assert_eq!(rect, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(xf, Affine::scale(2.0));
}
