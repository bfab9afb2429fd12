use super::*;
use crate::Animation;

const RED_SQUARE: &str = r#"{
  "fr": 30, "ip": 0, "op": 2, "w": 8, "h": 8,
  "layers": [{
    "ty": 4,
    "shapes": [
      {"ty": "rc", "p": {"k": [4, 4]}, "s": {"k": [8, 8]}},
      {"ty": "fl", "c": {"k": [1, 0, 0, 1]}, "o": {"k": 100}}
    ]
  }]
}"#;

const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8">
  <rect width="8" height="8" fill="#0000ff"/>
</svg>"##;

fn red() -> Animation {
    Animation::from_data(RED_SQUARE, "lottie").unwrap()
}

fn target(buf: &mut [u32]) -> RenderTarget<'_> {
    RenderTarget::new(buf, 8, 8, 8, Colorspace::Abgr8888).unwrap()
}

#[test]
fn full_cycle_writes_target() {
    let anim = red();
    let mut buf = vec![0xDEAD_BEEFu32; 64];
    {
        let mut canvas = Canvas::new(target(&mut buf)).unwrap();
        assert_eq!(canvas.state(), CanvasState::Created);
        assert!(canvas.is_empty());
        canvas.push(anim.picture()).unwrap();
        assert_eq!(canvas.state(), CanvasState::Pushed);
        canvas.update(anim.picture()).unwrap();
        canvas.clear();
        canvas.draw().unwrap();
        assert_eq!(canvas.state(), CanvasState::Drawing);
        canvas.sync().unwrap();
        assert_eq!(canvas.state(), CanvasState::Pushed);
    }
    assert_eq!(buf[4 * 8 + 4], 0xFF00_00FF);
}

#[test]
fn second_push_is_rejected() {
    let anim = red();
    let mut buf = vec![0u32; 64];
    let mut canvas = Canvas::new(target(&mut buf)).unwrap();
    canvas.push(anim.picture()).unwrap();
    assert!(matches!(
        canvas.push(anim.picture()),
        Err(LottieError::Validation(_))
    ));
}

#[test]
fn draw_needs_push_and_update() {
    let anim = red();
    let mut buf = vec![0u32; 64];
    let mut canvas = Canvas::new(target(&mut buf)).unwrap();
    assert!(matches!(canvas.draw(), Err(LottieError::Draw(_))));
    canvas.push(anim.picture()).unwrap();
    assert!(matches!(canvas.draw(), Err(LottieError::Draw(_))));
    assert!(matches!(canvas.sync(), Err(LottieError::Validation(_))));
}

#[test]
fn foreign_picture_update_is_rejected() {
    let a = red();
    let b = red();
    let mut buf = vec![0u32; 64];
    let mut canvas = Canvas::new(target(&mut buf)).unwrap();
    assert!(matches!(
        canvas.update(a.picture()),
        Err(LottieError::Validation(_))
    ));
    canvas.push(a.picture()).unwrap();
    assert!(matches!(
        canvas.update(b.picture()),
        Err(LottieError::Validation(_))
    ));
}

#[test]
fn oversized_target_fails_surface_init() {
    let mut buf = vec![0u32; 70_000];
    let t = RenderTarget::new(&mut buf, 70_000, 70_000, 1, Colorspace::Argb8888).unwrap();
    assert!(matches!(Canvas::new(t), Err(LottieError::SurfaceInit(_))));
}

#[test]
fn svg_raster_is_cached_across_draws() {
    let anim = Animation::from_data(SVG, "image/svg+xml").unwrap();
    let mut buf = vec![0u32; 64];
    let mut canvas = Canvas::new(target(&mut buf)).unwrap();
    canvas.push(anim.picture()).unwrap();
    for _ in 0..2 {
        canvas.update(anim.picture()).unwrap();
        canvas.clear();
        canvas.draw().unwrap();
        canvas.sync().unwrap();
    }
    assert_eq!(canvas.svg_cache_len(), 1);
    let px = canvas.target().buffer()[3 * 8 + 3];
    assert_eq!(Colorspace::Abgr8888.unpack_straight(px), [0, 0, 255, 255]);
}

#[test]
fn svg_cache_keeps_only_the_latest_raster() {
    let mut anim = Animation::from_data(SVG, "image/svg+xml").unwrap();
    let mut buf = vec![0u32; 64];
    let mut canvas = Canvas::new(target(&mut buf)).unwrap();
    canvas.push(anim.picture()).unwrap();
    for scale in [1.0, 2.0, 4.0, 64.0] {
        anim.picture_mut()
            .set_transform(crate::foundation::core::Affine::scale(scale));
        canvas.update(anim.picture()).unwrap();
        canvas.clear();
        canvas.draw().unwrap();
        canvas.sync().unwrap();
        assert_eq!(canvas.svg_cache_len(), 1);
    }
    let px = canvas.target().buffer()[7 * 8 + 7];
    assert_eq!(Colorspace::Abgr8888.unpack_straight(px), [0, 0, 255, 255]);
}
