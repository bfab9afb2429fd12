use super::*;

fn local_registry() -> &'static EngineRegistry {
    Box::leak(Box::new(EngineRegistry::new()))
}

fn no_fonts() -> EngineOpts {
    EngineOpts::default().with_system_fonts(false)
}

#[test]
fn first_acquire_initializes_once() {
    let reg = local_registry();
    assert!(!reg.is_initialized());

    let a = reg.acquire(no_fonts()).unwrap();
    let b = reg.acquire(no_fonts()).unwrap();
    assert!(reg.is_initialized());
    assert_eq!(reg.ref_count(), 2);
    assert_eq!(reg.init_count(), 1);

    drop(a);
    assert!(reg.is_initialized());
    drop(b);
    assert!(!reg.is_initialized());
    assert_eq!(reg.ref_count(), 0);
}

#[test]
fn reinitializes_after_full_release() {
    let reg = local_registry();
    drop(reg.acquire(no_fonts()).unwrap());
    let g = reg.acquire(no_fonts()).unwrap();
    assert_eq!(reg.init_count(), 2);
    drop(g);
}

#[test]
fn options_apply_only_on_first_init() {
    let reg = local_registry();
    let a = reg
        .acquire(no_fonts().with_svg_max_raster_dim(128))
        .unwrap();
    let b = reg.acquire(no_fonts().with_svg_max_raster_dim(4096)).unwrap();
    assert_eq!(a.opts().svg_max_raster_dim, 128);
    assert_eq!(b.opts().svg_max_raster_dim, 128);
}

#[test]
fn clone_counts_as_reference() {
    let reg = local_registry();
    let a = reg.acquire(no_fonts()).unwrap();
    let b = a.clone();
    assert_eq!(reg.ref_count(), 2);
    drop(a);
    assert!(reg.is_initialized());
    drop(b);
    assert!(!reg.is_initialized());
}

#[test]
fn concurrent_acquire_release_is_balanced() {
    let reg = local_registry();
    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..50 {
                    let g = reg.acquire(no_fonts()).unwrap();
                    drop(g);
                }
            });
        }
    });
    assert_eq!(reg.ref_count(), 0);
    assert!(!reg.is_initialized());
}

#[test]
fn opts_builders_override_defaults() {
    let opts = EngineOpts::default();
    assert!(opts.load_system_fonts);
    assert_eq!(opts.svg_max_raster_dim, 16_384);
    let tweaked = opts.with_system_fonts(false).with_svg_max_raster_dim(64);
    assert!(!tweaked.load_system_fonts);
    assert_eq!(tweaked.svg_max_raster_dim, 64);
}
