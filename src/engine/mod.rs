//! Engine - the context object that owns every node.
//!
//! The engine holds the structures every node operation goes through:
//! - Tree: the node arena, behind one mutex
//! - Registry: key, name and z-index lookup tables
//! - EventBus: per-node callback slots
//! - Focus: the node that receives keystrokes
//! - Render scheduler and painter: debounced paint passes to the terminal
//!
//! # Locking
//!
//! Callbacks never run while the tree lock is held. Setters copy what they
//! need out of the arena, release it, and only then fire notifications, so a
//! callback may freely read or mutate any node (its own included). A paint
//! pass holds the tree lock for the whole walk and fires nothing.
//!
//! # Example
//!
//! ```ignore
//! use tml_core::{Engine, EngineConfig, Volume};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let panel = engine.create_node("panel");
//! panel.set_volume(Volume::new(20, 5))?;
//! engine.body().insert([&panel])?;
//! engine.start()?;
//! ```

mod node;
mod registry;
mod tree;

pub use node::Node;

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::event::{EventBus, propagation};
use crate::pipeline::listeners::{self, CrosstermKeys, CrosstermSize, KeySource, SizeSource};
use crate::pipeline::scheduler::{self, RenderScheduler};
use crate::pipeline::terminal::{Screen, ScreenSize};
use crate::renderer::{self, Painter};
use crate::state::{KeyboardEvent, focus};
use crate::types::{BODY_NAME, EventKind, NodeKey, NodeKind, Style, Volume};

pub(crate) use registry::Registry;
pub(crate) use tree::{NodeData, Tree};

// =============================================================================
// Shared State
// =============================================================================

pub(crate) struct Shared {
    pub(crate) config: EngineConfig,
    pub(crate) root: NodeKey,
    tree: Mutex<Tree>,
    pub(crate) registry: Registry,
    pub(crate) events: EventBus,
    pub(crate) screen: Screen,
    focus: Mutex<Option<NodeKey>>,
    scheduler: RenderScheduler,
    painter: Mutex<Painter>,
    started: AtomicBool,
}

impl Shared {
    pub(crate) fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn focus(&self) -> MutexGuard<'_, Option<NodeKey>> {
        self.focus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn node(self: &Arc<Self>, key: NodeKey) -> Node {
        Node::new(key, self.clone())
    }

    /// Build a node and enter it in the arena, the registries and the bus.
    fn create_node(&self, key: NodeKey, kind: NodeKind, name: &str) {
        let data = NodeData::new(key, kind, name);
        self.registry.register(&data.attr, data.position.z_index);
        self.tree().insert(data);
        self.events.create_slot(key);
        tracing::trace!(%key, name, kind = %kind, "node created");
    }

    /// Run the callbacks for `kind` on `target`.
    ///
    /// Returns false when the target has no slot or nothing is registered for
    /// the kind.
    pub(crate) fn trigger(self: &Arc<Self>, target: NodeKey, kind: EventKind, origin: NodeKey) -> bool {
        let Some(callbacks) = self.events.listeners(&target, kind) else {
            return false;
        };
        tracing::trace!(%target, %origin, ?kind, listeners = callbacks.len(), "trigger");
        let target = self.node(target);
        let origin = self.node(origin);
        for callback in callbacks {
            callback(&target, &origin);
        }
        true
    }

    /// Ask for a paint pass. Dropped while the terminal cannot be drawn on.
    pub(crate) fn request_render(&self) {
        if self.screen.size().is_renderable() {
            self.scheduler.request();
        }
    }

    /// Walk the tree into the output buffer and flush it to the sink.
    pub(crate) fn paint(&self) -> Result<Vec<u8>> {
        let mut painter = self.painter.lock().unwrap_or_else(PoisonError::into_inner);
        let screen = self.screen.size();
        {
            let mut tree = self.tree();
            renderer::paint_tree(&mut tree, self.root, screen, painter.buffer_mut())?;
        }
        Ok(painter.flush()?)
    }

    /// Apply a new terminal size. Returns false if nothing changed.
    pub(crate) fn resize(self: &Arc<Self>, width: i32, height: i32) -> bool {
        if !self.screen.set(ScreenSize { width, height }) {
            return false;
        }
        tracing::debug!(width, height, "terminal resized");
        self.request_render();
        propagation::layout_cascade(self, self.root, self.root, true);
        true
    }

    /// Remove a node and its whole subtree.
    ///
    /// One linear pass: detach from the parent, unregister every node of the
    /// subtree, take their event slots, fire `Removed` from those slots, then
    /// drop them from the arena.
    pub(crate) fn remove(self: &Arc<Self>, key: NodeKey) -> Result<()> {
        let doomed: Vec<(NodeKey, String, u32)> = {
            let mut tree = self.tree();
            let parent = tree.live(&key)?.parent;
            if key == self.root {
                return Err(Error::RemoveRoot);
            }
            if let Some(parent) = parent {
                if let Ok(parent) = tree.live_mut(&parent) {
                    parent.children.retain(|child| *child != key);
                }
            }
            tree.subtree(&key)
                .into_iter()
                .filter_map(|k| tree.live(&k).ok())
                .map(|n| (n.attr.key, n.attr.name.clone(), n.position.z_index))
                .collect()
        };

        let mut slots = Vec::with_capacity(doomed.len());
        for (k, name, z_index) in &doomed {
            self.registry.unregister(*k, name, *z_index);
            slots.push((*k, self.events.delete_slot(k)));
        }

        let origin = self.node(key);
        for (k, slot) in slots {
            let Some(callbacks) = slot.and_then(|s| s.callbacks(EventKind::Removed)) else {
                continue;
            };
            let target = self.node(k);
            for callback in callbacks {
                callback(&target, &origin);
            }
        }

        let focus = *self.focus();
        let keys: Vec<NodeKey> = doomed.iter().map(|(k, _, _)| *k).collect();
        self.tree().bury(&keys, focus);
        tracing::debug!(%key, removed = doomed.len(), "subtree removed");

        self.request_render();
        Ok(())
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Handle to one UI engine. Cheap to clone; all clones share the same tree.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    /// Build an engine drawing to stdout.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_output(config, Box::new(io::stdout()))
    }

    /// Build an engine drawing to `sink`.
    ///
    /// Creates the root node (adaptive, `Auto` volume, no background), focuses
    /// it and spawns the paint thread. Listeners are only spawned by `start`.
    pub fn with_output(config: EngineConfig, sink: Box<dyn Write + Send>) -> Result<Self> {
        let root = NodeKey::generate();
        let (scheduler, requests) = RenderScheduler::new();
        let debounce = config.render_debounce;

        let shared = Arc::new(Shared {
            config,
            root,
            tree: Mutex::new(Tree::new()),
            registry: Registry::new(),
            events: EventBus::new(),
            screen: Screen::new(),
            focus: Mutex::new(None),
            scheduler,
            painter: Mutex::new(Painter::new(sink)),
            started: AtomicBool::new(false),
        });

        shared.create_node(root, NodeKind::Quadrilateral, BODY_NAME);
        if let Ok(body) = shared.tree().live_mut(&root) {
            body.volume = Volume::AUTO;
            body.style = Style {
                auto_size: true,
                background: None,
                ..Style::default()
            };
        }
        *shared.focus() = Some(root);

        scheduler::spawn_painter(Arc::downgrade(&shared), requests, debounce)?;

        Ok(Self { shared })
    }

    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Spawn the configured listeners on the real terminal.
    pub fn start(&self) -> Result<()> {
        self.start_with(CrosstermSize, CrosstermKeys::new())
    }

    /// Spawn the configured listeners on custom input sources.
    ///
    /// Only the first call does anything.
    pub fn start_with<S, K>(&self, size: S, keys: K) -> Result<()>
    where
        S: SizeSource,
        K: KeySource,
    {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let config = &self.shared.config;
        if config.listen_window_size {
            listeners::spawn_size_poller(Arc::downgrade(&self.shared), size, config.poll_interval)?;
        }
        if config.listen_keyboard {
            listeners::spawn_key_reader(Arc::downgrade(&self.shared), keys)?;
        }
        tracing::info!(
            window_size = config.listen_window_size,
            keyboard = config.listen_keyboard,
            "engine started"
        );
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// The root node.
    pub fn body(&self) -> Node {
        self.shared.node(self.shared.root)
    }

    /// Create an unattached quadrilateral.
    pub fn create_node(&self, name: &str) -> Node {
        self.create(NodeKind::Quadrilateral, name)
    }

    /// Create an unattached node of the given kind.
    pub fn create(&self, kind: NodeKind, name: &str) -> Node {
        let key = NodeKey::generate();
        self.shared.create_node(key, kind, name);
        self.shared.node(key)
    }

    pub fn node_by_key(&self, key: NodeKey) -> Option<Node> {
        self.shared
            .registry
            .contains(&key)
            .then(|| self.shared.node(key))
    }

    /// Live nodes sharing `name`, in creation order.
    pub fn nodes_by_name(&self, name: &str) -> Vec<Node> {
        self.shared
            .registry
            .by_name(name)
            .into_iter()
            .map(|key| self.shared.node(key))
            .collect()
    }

    /// Live nodes currently at `z_index`.
    pub fn nodes_in_layer(&self, z_index: u32) -> Vec<Node> {
        self.shared
            .registry
            .layer(z_index)
            .into_iter()
            .map(|key| self.shared.node(key))
            .collect()
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.shared.registry.len()
    }

    /// Remove several nodes, skipping the ones that fail.
    pub fn remove_all<'a>(&self, nodes: impl IntoIterator<Item = &'a Node>) {
        for node in nodes {
            if let Err(err) = node.remove() {
                tracing::debug!(key = %node.key(), %err, "batch remove skipped node");
            }
        }
    }

    // =========================================================================
    // Focus & Input
    // =========================================================================

    /// Give `node` the focus and fire `Selected` on it (origin: previous focus).
    pub fn select(&self, node: &Node) {
        focus::select(&self.shared, node.key());
    }

    pub fn focused(&self) -> Option<Node> {
        focus::focused(&self.shared).map(|key| self.shared.node(key))
    }

    /// Deliver one keystroke to the focused node, rolling focus back on failure.
    pub fn dispatch_key(&self, event: KeyboardEvent) {
        focus::dispatch(&self.shared, event);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Schedule a debounced paint.
    pub fn render(&self) {
        self.shared.request_render();
    }

    /// Paint right away and return the bytes written to the sink.
    pub fn render_now(&self) -> Result<Vec<u8>> {
        self.shared.paint()
    }

    /// Feed a terminal size, as the poller does. Returns false if unchanged.
    pub fn resize(&self, width: i32, height: i32) -> bool {
        self.shared.resize(width, height)
    }

    pub fn terminal_size(&self) -> ScreenSize {
        self.shared.screen.size()
    }

    /// Render requests accepted so far.
    pub fn render_requests(&self) -> u64 {
        self.shared.scheduler.requests()
    }

    /// Paint passes that wrote a frame.
    pub fn frames_painted(&self) -> u64 {
        self.shared
            .painter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frames()
    }

    /// Drop every listener, registry entry and node.
    ///
    /// Listeners capturing node handles keep the engine alive; this breaks
    /// those cycles.
    pub fn teardown(&self) {
        let nodes = self.shared.registry.len();
        self.shared.events.clear();
        self.shared.registry.clear();
        self.shared.tree().clear();
        *self.shared.focus() = None;
        tracing::debug!(nodes, "engine torn down");
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("root", &self.shared.root)
            .field("nodes", &self.shared.registry.len())
            .finish()
    }
}
