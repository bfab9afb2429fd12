use super::*;
use crate::foundation::core::{Colorspace, Rect};

const ANIM: &str = r#"{
  "fr": 10, "ip": 0, "op": 4, "w": 4, "h": 4,
  "layers": [{
    "ty": 4,
    "shapes": [
      {"ty": "rc", "p": {"k": [2, 2]}, "s": {"k": [4, 4]}},
      {"ty": "fl", "c": {"k": [0, 1, 0, 1]}, "o": {"k": 100}}
    ]
  }]
}"#;

fn anim() -> Animation {
    Animation::from_data(ANIM, "lottie").unwrap()
}

#[test]
fn canvas_is_created_lazily() {
    let mut buf = vec![7u32; 16];
    let target = RenderTarget::new(&mut buf, 4, 4, 4, Colorspace::Argb8888).unwrap();
    let mut comp = FrameCompositor::new(anim(), target);
    assert!(matches!(comp.slot, Slot::Unbound(_)));
    assert_eq!(comp.buffer().unwrap(), &[7u32; 16]);

    comp.render_frame(0, &FrameOpts::default()).unwrap();
    assert!(matches!(comp.slot, Slot::Bound(_)));
    assert_eq!(comp.animation().current_frame(), 0);
    assert!(comp.buffer().unwrap().iter().all(|&p| p == 0xFF00_FF00));
}

#[test]
fn out_of_range_does_not_create_canvas() {
    let mut buf = vec![7u32; 16];
    let target = RenderTarget::new(&mut buf, 4, 4, 4, Colorspace::Argb8888).unwrap();
    let mut comp = FrameCompositor::new(anim(), target);
    for index in [-1, 4, i64::MAX] {
        let err = comp.render_frame(index, &FrameOpts::default()).unwrap_err();
        assert!(matches!(
            err,
            LottieError::FrameIndexOutOfRange { frame_count: 4, .. }
        ));
    }
    assert!(matches!(comp.slot, Slot::Unbound(_)));
}

#[test]
fn invalid_crop_leaves_playhead_and_picture_alone() {
    let mut buf = vec![0u32; 16];
    let target = RenderTarget::new(&mut buf, 4, 4, 4, Colorspace::Argb8888).unwrap();
    let mut comp = FrameCompositor::new(anim(), target);
    comp.render_frame(1, &FrameOpts::default()).unwrap();
    let before = comp.buffer().unwrap().to_vec();

    let opts = FrameOpts::default().with_crop(Rect::new(0.0, 0.0, 5.0, 1.0));
    let err = comp.render_frame(2, &opts).unwrap_err();
    assert!(matches!(err, LottieError::CropOutOfBounds(_)));
    assert_eq!(comp.animation().current_frame(), 1);
    assert_eq!(comp.buffer().unwrap(), before.as_slice());
}

#[test]
fn surface_failure_is_sticky() {
    let mut buf = vec![0u32; 70_000];
    let target = RenderTarget::new(&mut buf, 70_000, 70_000, 1, Colorspace::Argb8888).unwrap();
    let mut comp = FrameCompositor::new(anim(), target);
    for _ in 0..2 {
        let err = comp.render_frame(0, &FrameOpts::default()).unwrap_err();
        assert!(matches!(err, LottieError::SurfaceInit(_)));
    }
    assert!(comp.buffer().is_none());
}

#[test]
fn into_animation_returns_the_resource() {
    let mut buf = vec![0u32; 16];
    let target = RenderTarget::new(&mut buf, 4, 4, 4, Colorspace::Argb8888).unwrap();
    let mut comp = FrameCompositor::new(anim(), target);
    comp.render_frame(3, &FrameOpts::default()).unwrap();
    let anim = comp.into_animation();
    assert_eq!(anim.current_frame(), 3);
    assert_eq!(anim.picture().size(), Size::new(4.0, 4.0));
}
