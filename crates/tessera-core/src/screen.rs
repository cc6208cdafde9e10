//! The screen orchestrator.

use crate::buffer::VirtualBuffer;
use crate::compositor::Compositor;
use crate::error::ScreenError;
use crate::geometry::{Position, Size};
use crate::layer::{Layer, LayerStack};
use crate::registry::{Registration, ScreenId, ScreenRegistry};
use crate::store::TileStore;
use crate::surface::TileSurface;
use crate::tile::Tile;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Produces the current set of layers for rendered components.
///
/// This is the widget-tree snapshot seam: when attached to a screen, every
/// flush rebuilds the layer stack from [`LayerSource::layers`] before
/// compositing, so layer content never persists across cycles by accident.
pub trait LayerSource: Send + Sync {
    /// The layers to composite, bottom-to-top.
    fn layers(&self) -> Vec<Arc<Layer>>;
}

/// A double buffer in front of a [`TileSurface`].
///
/// Drawing calls accumulate in the owned [`VirtualBuffer`]; nothing reaches
/// the surface until [`Screen::display`] (full redraw, makes this screen the
/// active one) or [`Screen::refresh`] (incremental redraw of the dirty set,
/// meaningful only while active). At most one flush is in flight per screen:
/// a second `display`/`refresh` blocks until the first completes rather than
/// interleaving with its drain.
pub struct Screen<S: TileSurface> {
    registration: Registration,
    buffer: VirtualBuffer,
    layers: RwLock<LayerStack>,
    layer_source: Option<Box<dyn LayerSource>>,
    surface: Mutex<S>,
    /// Tiles as last pushed to the surface, for skipping writes that would
    /// restore what is already shown.
    front: Mutex<TileStore>,
    flush_lock: Mutex<()>,
    /// Set after a resize or a surface failure; the next flush runs full.
    needs_full_redraw: AtomicBool,
}

impl<S: TileSurface> std::fmt::Debug for Screen<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.id())
            .field("size", &self.size())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl<S: TileSurface> Screen<S> {
    /// Create a screen bound to a surface, sized to match it.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidResize`] when the surface reports a
    /// degenerate bound.
    pub fn new(surface: S, registry: &Arc<ScreenRegistry>) -> Result<Self, ScreenError> {
        let buffer = VirtualBuffer::new(surface.size())?;
        Ok(Self {
            registration: registry.register(),
            buffer,
            layers: RwLock::new(LayerStack::new()),
            layer_source: None,
            surface: Mutex::new(surface),
            front: Mutex::new(TileStore::new()),
            flush_lock: Mutex::new(()),
            needs_full_redraw: AtomicBool::new(false),
        })
    }

    /// This screen's process-unique identity.
    #[must_use]
    pub fn id(&self) -> ScreenId {
        self.registration.id()
    }

    /// Whether this screen's output is the visible one.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registration.is_active()
    }

    /// The current bound.
    #[must_use]
    pub fn size(&self) -> Size {
        self.buffer.size()
    }

    /// The back-buffer drawing calls land in.
    #[must_use]
    pub fn buffer(&self) -> &VirtualBuffer {
        &self.buffer
    }

    /// Write a tile into the back-buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] for a coordinate outside the
    /// current bound.
    pub fn write(&self, position: Position, tile: Tile) -> Result<(), ScreenError> {
        self.buffer.write(position, tile)
    }

    /// Read a tile from the back-buffer.
    #[must_use]
    pub fn read(&self, position: Position) -> Tile {
        self.buffer.read(position)
    }

    /// Attach the widget-tree snapshot source. Each flush rebuilds the layer
    /// stack from it.
    pub fn set_layer_source(&mut self, source: impl LayerSource + 'static) {
        self.layer_source = Some(Box::new(source));
    }

    /// Push a layer on top of the stack.
    ///
    /// Only meaningful without a [`LayerSource`]; with one attached the stack
    /// is rebuilt from the source on every flush.
    pub fn push_layer(&self, layer: Arc<Layer>) {
        self.layers.write().push(layer);
    }

    /// Remove all layers.
    pub fn clear_layers(&self) {
        self.layers.write().clear();
    }

    /// Resize the back-buffer after the surface reported a new bound.
    ///
    /// Forces the next flush to redraw the full new bound.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidResize`] for a degenerate bound; the
    /// prior state is retained.
    pub fn resize(&self, size: Size) -> Result<(), ScreenError> {
        self.buffer.resize(size)?;
        self.front.lock().clear();
        self.needs_full_redraw.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Switch to this screen: full redraw, then activate.
    ///
    /// Resets the cursor to its default (hidden, at the origin), writes every
    /// coordinate in the current bound regardless of dirty state, commits,
    /// and finally marks this screen active — deactivating all others through
    /// the registry.
    ///
    /// # Errors
    ///
    /// Propagates surface failures; the flush aborts, activation does not
    /// happen, and the next flush runs full.
    pub fn display(&self) -> Result<(), ScreenError> {
        let _flush = self.flush_lock.lock();
        debug!(screen = %self.id(), "display requested");
        let result = (|| {
            {
                let mut surface = self.surface.lock();
                surface.set_cursor_visibility(false)?;
                surface.put_cursor_at(Position::ORIGIN)?;
            }
            self.flush_cells(true)
        })();
        match result {
            Ok(()) => {
                self.needs_full_redraw.store(false, Ordering::SeqCst);
                self.registration.activate();
                Ok(())
            }
            Err(err) => {
                self.needs_full_redraw.store(true, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// Push accumulated changes to the surface.
    ///
    /// Drains the dirty tracker and writes only coordinates whose resolved
    /// tile differs from what the surface last received. A safe no-op while
    /// this screen is inactive — it never corrupts another screen's output.
    /// After a resize or a surface failure the next refresh escalates to a
    /// full redraw.
    ///
    /// # Errors
    ///
    /// Propagates surface failures; the flush aborts and the next flush runs
    /// full.
    pub fn refresh(&self) -> Result<(), ScreenError> {
        let _flush = self.flush_lock.lock();
        if !self.is_active() {
            trace!(screen = %self.id(), "refresh skipped: inactive");
            return Ok(());
        }
        let force = self.needs_full_redraw.swap(false, Ordering::SeqCst);
        match self.flush_cells(force) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.needs_full_redraw.store(true, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// React to a component-change notification: refresh if active.
    ///
    /// # Errors
    ///
    /// Same as [`Screen::refresh`].
    pub fn component_changed(&self) -> Result<(), ScreenError> {
        trace!(screen = %self.id(), "component change notification");
        self.refresh()
    }

    /// Show the cursor at a position, if this screen is active.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn request_cursor_at(&self, position: Position) -> Result<(), ScreenError> {
        if !self.is_active() {
            return Ok(());
        }
        let mut surface = self.surface.lock();
        surface.set_cursor_visibility(true)?;
        surface.put_cursor_at(position)?;
        Ok(())
    }

    /// Hide the cursor, if this screen is active.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn hide_cursor(&self) -> Result<(), ScreenError> {
        if !self.is_active() {
            return Ok(());
        }
        self.surface.lock().set_cursor_visibility(false)?;
        Ok(())
    }

    /// Lock and borrow the underlying surface.
    pub fn surface(&self) -> MutexGuard<'_, S> {
        self.surface.lock()
    }

    /// Write resolved cells to the surface and commit.
    ///
    /// `force` redraws the entire bound unconditionally; otherwise only
    /// drained dirty coordinates whose resolved tile differs from the front
    /// copy are written. Always concludes with a surface flush so buffered
    /// writes become visible atomically.
    fn flush_cells(&self, force: bool) -> Result<(), ScreenError> {
        if let Some(source) = &self.layer_source {
            self.layers.write().replace(source.layers());
        }
        let layers = self.layers.read();
        let compositor = Compositor::new(&layers, &self.buffer);
        let bound = self.buffer.size();
        let mut front = self.front.lock();
        let mut surface = self.surface.lock();
        let mut written = 0usize;

        if force {
            // Everything marked so far is covered by the full pass; marks
            // landing mid-pass stay queued for the next drain.
            let _ = self.buffer.drain_dirty();
            front.clear();
            for position in bound.positions() {
                let tile = compositor.resolve(position);
                surface.set_tile_at(position, tile)?;
                front.set(position, tile);
                written += 1;
            }
        } else {
            for position in self.buffer.drain_dirty() {
                if !bound.contains(position) {
                    // Marked before a shrinking resize.
                    continue;
                }
                let tile = compositor.resolve(position);
                if front.get(position) == tile {
                    // Changed and changed back since the last flush.
                    continue;
                }
                surface.set_tile_at(position, tile)?;
                front.set(position, tile);
                written += 1;
            }
        }

        if surface.supports_layers() {
            surface.drain_layers();
            for layer in layers.iter_bottom_up() {
                surface.push_layer(Arc::clone(layer));
            }
        }
        surface.flush()?;
        debug!(screen = %self.id(), cells = written, force, "flush committed");
        Ok(())
    }
}
