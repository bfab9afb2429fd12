use super::*;
use crate::engine::display::DisplayList;

fn square(size: f64, color: [u8; 4]) -> DrawItem {
    DrawItem::Fill {
        path: Rect::new(0.0, 0.0, size, size).to_path(0.1),
        transform: Affine::IDENTITY,
        color,
        rule: FillRule::NonZero,
    }
}

fn snapshot(items: Vec<DrawItem>, content_transform: Affine, clip: Option<(Rect, Affine)>) -> PaintSnapshot {
    PaintSnapshot {
        picture_id: 1,
        frame: 0,
        display_list: DisplayList { items },
        content_transform,
        clip,
    }
}

fn render(snap: &PaintSnapshot) -> vello_cpu::Pixmap {
    let mut ctx = vello_cpu::RenderContext::new(16, 16);
    let mut cache = SvgRasterCache::default();
    encode_snapshot(&mut ctx, snap, &mut cache, 1024).unwrap();
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(16, 16);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap
}

fn px(pixmap: &vello_cpu::Pixmap, x: usize, y: usize) -> [u8; 4] {
    let i = (y * pixmap.width() as usize + x) * 4;
    let d = pixmap.data_as_u8_slice();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

#[test]
fn content_transform_scales_fills() {
    let snap = snapshot(vec![square(4.0, [255, 0, 0, 255])], Affine::scale(2.0), None);
    let pixmap = render(&snap);
    assert_eq!(px(&pixmap, 6, 6), [255, 0, 0, 255]);
    assert_eq!(px(&pixmap, 10, 10), [0, 0, 0, 0]);
}

#[test]
fn later_items_paint_over_earlier_ones() {
    let snap = snapshot(
        vec![square(8.0, [255, 0, 0, 255]), square(8.0, [0, 0, 255, 255])],
        Affine::IDENTITY,
        None,
    );
    assert_eq!(px(&render(&snap), 4, 4), [0, 0, 255, 255]);
}

#[test]
fn clip_limits_drawing() {
    let snap = snapshot(
        vec![square(16.0, [0, 255, 0, 255])],
        Affine::IDENTITY,
        Some((Rect::new(0.0, 0.0, 4.0, 4.0), Affine::IDENTITY)),
    );
    let pixmap = render(&snap);
    assert_eq!(px(&pixmap, 2, 2), [0, 255, 0, 255]);
    assert_eq!(px(&pixmap, 8, 8), [0, 0, 0, 0]);
}

#[test]
fn zero_area_clip_draws_nothing() {
    let snap = snapshot(
        vec![square(16.0, [0, 255, 0, 255])],
        Affine::IDENTITY,
        Some((Rect::new(4.0, 4.0, 4.0, 12.0), Affine::IDENTITY)),
    );
    let pixmap = render(&snap);
    assert!(pixmap.data_as_u8_slice().iter().all(|&b| b == 0));
}

#[test]
fn path_conversion_keeps_elements() {
    let mut p = BezPath::new();
    p.move_to((0.0, 0.0));
    p.line_to((1.0, 0.0));
    p.quad_to((2.0, 1.0), (2.0, 2.0));
    p.curve_to((1.0, 3.0), (0.0, 3.0), (0.0, 2.0));
    p.close_path();
    assert_eq!(bezpath_to_cpu(&p).elements().len(), p.elements().len());
    assert_eq!(
        affine_to_cpu(Affine::translate((3.0, 4.0))).as_coeffs(),
        [1.0, 0.0, 0.0, 1.0, 3.0, 4.0]
    );
}

#[test]
fn premul_bytes_must_match_size() {
    assert!(pixmap_from_premul_bytes(&[0; 16], 2, 2).is_ok());
    assert!(matches!(
        pixmap_from_premul_bytes(&[0; 12], 2, 2),
        Err(LottieError::Draw(_))
    ));
}
