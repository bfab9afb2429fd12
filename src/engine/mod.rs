//! Built-in vector engine.
//!
//! The engine owns everything the compositor treats as an external collaborator: parsing Lottie
//! and SVG sources, evaluating a frame into a display list, and the process-wide state shared by
//! every loaded animation and canvas (font database, options).
//!
//! Global state is reference counted behind a single mutex. [`Engine::acquire`] initializes it on
//! the first reference; dropping the last [`EngineGuard`] tears it down.

use std::sync::{Arc, Mutex};

use crate::foundation::error::{LottieError, LottieResult};

pub(crate) mod content;
pub(crate) mod display;
pub(crate) mod lottie;
pub(crate) mod svg;

/// Engine configuration, applied when the process-wide engine is first initialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOpts {
    /// Load system fonts into the shared font database (used by SVG `<text>`).
    pub load_system_fonts: bool,
    /// Largest width/height, in pixels, an SVG may be rasterized at.
    pub svg_max_raster_dim: u32,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            svg_max_raster_dim: 16_384,
        }
    }
}

impl EngineOpts {
    /// Defaults overridden by `LOTTIE_COMPOSITOR_SYSTEM_FONTS` and `LOTTIE_COMPOSITOR_SVG_MAX_DIM`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let load_system_fonts = std::env::var("LOTTIE_COMPOSITOR_SYSTEM_FONTS")
            .ok()
            .map(|v| !matches!(v.trim(), "0" | "false" | "off" | "no"))
            .unwrap_or(defaults.load_system_fonts);
        let svg_max_raster_dim = std::env::var("LOTTIE_COMPOSITOR_SVG_MAX_DIM")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.svg_max_raster_dim);
        Self {
            load_system_fonts,
            svg_max_raster_dim,
        }
    }

    /// Return options with system font loading toggled.
    pub fn with_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }

    /// Return options with a different SVG raster size cap.
    pub fn with_svg_max_raster_dim(mut self, dim: u32) -> Self {
        self.svg_max_raster_dim = dim;
        self
    }
}

/// State shared by every holder of an [`EngineGuard`].
pub(crate) struct EngineShared {
    pub(crate) opts: EngineOpts,
    pub(crate) fontdb: Arc<usvg::fontdb::Database>,
}

impl EngineShared {
    fn init(opts: EngineOpts) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if opts.load_system_fonts {
            db.load_system_fonts();
        }
        tracing::debug!(faces = db.len(), "engine initialized");
        Self {
            opts,
            fontdb: Arc::new(db),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    refs: usize,
    inits: u64,
    shared: Option<Arc<EngineShared>>,
}

/// Reference-counted owner of the engine state.
pub(crate) struct EngineRegistry {
    state: Mutex<RegistryState>,
}

impl EngineRegistry {
    pub(crate) const fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                refs: 0,
                inits: 0,
                shared: None,
            }),
        }
    }

    pub(crate) fn acquire(&'static self, opts: EngineOpts) -> LottieResult<EngineGuard> {
        let mut st = self
            .state
            .lock()
            .map_err(|_| LottieError::surface_init("engine registry mutex poisoned"))?;
        let shared = match &st.shared {
            Some(shared) => shared.clone(),
            None => {
                let shared = Arc::new(EngineShared::init(opts));
                st.shared = Some(shared.clone());
                st.inits += 1;
                tracing::debug!(generation = st.inits, "engine state created");
                shared
            }
        };
        st.refs += 1;
        Ok(EngineGuard {
            registry: self,
            shared,
        })
    }

    fn release(&self) {
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.refs = st.refs.saturating_sub(1);
        if st.refs == 0 && st.shared.take().is_some() {
            tracing::debug!("engine terminated");
        }
    }

    pub(crate) fn ref_count(&self) -> usize {
        self.state.lock().map(|st| st.refs).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn init_count(&self) -> u64 {
        self.state.lock().map(|st| st.inits).unwrap_or(0)
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.state
            .lock()
            .map(|st| st.shared.is_some())
            .unwrap_or(false)
    }
}

static ENGINE: EngineRegistry = EngineRegistry::new();

/// Entry point to the process-wide engine.
pub struct Engine;

impl Engine {
    /// Acquire a reference to the engine, initializing it with [`EngineOpts::from_env`] if needed.
    pub fn acquire() -> LottieResult<EngineGuard> {
        ENGINE.acquire(EngineOpts::from_env())
    }

    /// Acquire a reference, initializing with `opts` if this is the first live reference.
    ///
    /// Options are ignored while the engine is already initialized.
    pub fn acquire_with(opts: EngineOpts) -> LottieResult<EngineGuard> {
        ENGINE.acquire(opts)
    }

    /// Number of live guards.
    pub fn ref_count() -> usize {
        ENGINE.ref_count()
    }

    /// Return `true` while at least one guard is alive.
    pub fn is_initialized() -> bool {
        ENGINE.is_initialized()
    }
}

/// A live reference to the engine. Releases the reference on drop.
pub struct EngineGuard {
    registry: &'static EngineRegistry,
    shared: Arc<EngineShared>,
}

impl EngineGuard {
    /// Options the engine was initialized with.
    pub fn opts(&self) -> EngineOpts {
        self.shared.opts
    }

    pub(crate) fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.shared.fontdb.clone()
    }
}

impl Clone for EngineGuard {
    fn clone(&self) -> Self {
        let mut st = self.registry.state.lock().unwrap_or_else(|e| e.into_inner());
        st.refs += 1;
        Self {
            registry: self.registry,
            shared: self.shared.clone(),
        }
    }
}

impl Drop for EngineGuard {
    fn drop(&mut self) {
        self.registry.release();
    }
}

impl std::fmt::Debug for EngineGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineGuard")
            .field("opts", &self.shared.opts)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/registry.rs"]
mod tests;
