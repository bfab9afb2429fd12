use super::*;

#[test]
fn premul_roundtrip_is_exact_for_opaque() {
    let p = Rgba8Premul::from_straight_rgba(12, 200, 99, 255);
    assert_eq!(p, Rgba8Premul { r: 12, g: 200, b: 99, a: 255 });
    assert_eq!(p.to_straight(), p);
}

#[test]
fn straight_of_transparent_is_black() {
    let p = Rgba8Premul {
        r: 3,
        g: 4,
        b: 5,
        a: 0,
    };
    assert_eq!(p.to_straight(), Rgba8Premul::transparent());
}

#[test]
fn half_alpha_unpremultiplies_close_to_source() {
    let p = Rgba8Premul::from_straight_rgba(255, 0, 128, 128);
    let s = p.to_straight();
    assert_eq!(s.a, 128);
    assert_eq!(s.r, 255);
    assert_eq!(s.g, 0);
    assert!((i16::from(s.b) - 128).abs() <= 1);
}

#[test]
fn pack_orders_channels_per_colorspace() {
    let red = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    assert_eq!(Colorspace::Argb8888.pack(red), 0xFFFF_0000);
    assert_eq!(Colorspace::Abgr8888.pack(red), 0xFF00_00FF);
    assert_eq!(Colorspace::Argb8888S.pack(red), 0xFFFF_0000);
    assert_eq!(Colorspace::Abgr8888S.pack(red), 0xFF00_00FF);
}

#[test]
fn straight_variants_unpremultiply_on_pack() {
    let half_blue = Rgba8Premul::from_straight_rgba(0, 0, 255, 128);
    assert_eq!(Colorspace::Argb8888.pack(half_blue), 0x8000_0080);
    assert_eq!(Colorspace::Argb8888S.pack(half_blue), 0x8000_00FF);
}

#[test]
fn unpack_straight_inverts_pack() {
    let px = Rgba8Premul::from_straight_rgba(10, 20, 30, 255);
    for cs in [
        Colorspace::Abgr8888,
        Colorspace::Argb8888,
        Colorspace::Abgr8888S,
        Colorspace::Argb8888S,
    ] {
        assert_eq!(cs.unpack_straight(cs.pack(px)), [10, 20, 30, 255]);
    }
}

#[test]
fn default_colorspace_is_argb_premultiplied() {
    assert_eq!(Colorspace::default(), Colorspace::Argb8888);
    assert!(Colorspace::default().is_premultiplied());
}
