//! The engine facade: owns the host and wires bindings to the media feed.
//!
//! ```rust
//! use flexout::{Document, FlexLayout};
//! use flexout_media::{MediaMonitor, MockMatchMedia};
//!
//! let mut doc = Document::new();
//! let row = doc.create_element("div");
//! doc.append_child(doc.root(), row);
//! doc.set_attribute(row, "layout", "row");
//! let cell = doc.create_element("div");
//! doc.append_child(row, cell);
//! doc.set_attribute(cell, "flex", "50");
//! doc.set_attribute(cell, "flex.gt-sm", "25");
//!
//! let monitor = MediaMonitor::new();
//! let mut media = MockMatchMedia::new(monitor.clone());
//! let mut layout = FlexLayout::new(doc, monitor);
//! layout.bind_all();
//!
//! assert_eq!(layout.host().style(cell, "max-width"), Some("50%"));
//!
//! media.activate("xl", Some(true)).unwrap();
//! assert_eq!(layout.host().style(cell, "max-width"), Some("25%"));
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use flexout_media::{Activation, BreakPointRegistry, MediaMonitor, Subscription};

use crate::binding::{FlexBinding, LayoutBinding};
use crate::config::LayoutConfig;
use crate::direction::DirectionResolver;
use crate::error::ConfigError;
use crate::host::{AttributeSink, Host, NodeId};
use crate::responsive::ActiveState;

struct Shared<H> {
    host: H,
    resolver: DirectionResolver,
}

/// Everything a subscription callback needs.
struct Context<H> {
    shared: Rc<RefCell<Shared<H>>>,
    registry: Rc<BreakPointRegistry>,
    config: Rc<LayoutConfig>,
}

impl<H: Host + 'static> Context<H> {
    fn subscribe_flex(&self, monitor: &MediaMonitor, binding: &Rc<RefCell<FlexBinding>>) -> Subscription {
        let shared = Rc::clone(&self.shared);
        let binding = Rc::clone(binding);
        let registry = Rc::clone(&self.registry);
        let config = Rc::clone(&self.config);
        monitor.subscribe(move |activation| {
            refresh_flex(&shared, &binding, activation, &registry, &config);
        })
    }

    fn subscribe_layout(&self, monitor: &MediaMonitor, binding: &Rc<RefCell<LayoutBinding>>) -> Subscription {
        let shared = Rc::clone(&self.shared);
        let binding = Rc::clone(binding);
        let registry = Rc::clone(&self.registry);
        monitor.subscribe(move |activation| {
            refresh_layout(&shared, &binding, activation, &registry);
        })
    }
}

struct Bound {
    layout: Option<Rc<RefCell<LayoutBinding>>>,
    flex: Option<Rc<RefCell<FlexBinding>>>,
    subscriptions: Vec<Subscription>,
}

/// Binds flex and layout attributes of a host's elements to a media feed.
///
/// Every publish on the monitor re-applies the styles of every bound
/// element, synchronously and in document order, so child elements see
/// their parent's updated direction within the same activation.
pub struct FlexLayout<H: Host + 'static> {
    ctx: Context<H>,
    monitor: MediaMonitor,
    bound: HashMap<NodeId, Bound>,
}

impl<H: Host + 'static> FlexLayout<H> {
    /// Creates an engine with the default configuration.
    pub fn new(host: H, monitor: MediaMonitor) -> Self {
        Self::build(host, monitor, LayoutConfig::default(), BreakPointRegistry::default())
    }

    /// Creates an engine from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Breakpoints`] if the configured table is invalid.
    pub fn with_config(host: H, monitor: MediaMonitor, config: LayoutConfig) -> Result<Self, ConfigError> {
        let registry = config.registry()?;
        Ok(Self::build(host, monitor, config, registry))
    }

    fn build(host: H, monitor: MediaMonitor, config: LayoutConfig, registry: BreakPointRegistry) -> Self {
        let resolver = DirectionResolver::new(config.attributes.layout.clone());
        Self {
            ctx: Context {
                shared: Rc::new(RefCell::new(Shared { host, resolver })),
                registry: Rc::new(registry),
                config: Rc::new(config),
            },
            monitor,
            bound: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &Rc<BreakPointRegistry> {
        &self.ctx.registry
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.ctx.config
    }

    pub fn monitor(&self) -> &MediaMonitor {
        &self.monitor
    }

    /// Borrows the host.
    ///
    /// Do not hold the guard across a publish on the monitor: bindings
    /// skip their refresh while the host is borrowed.
    pub fn host(&self) -> Ref<'_, H> {
        Ref::map(self.ctx.shared.borrow(), |s| &s.host)
    }

    pub fn host_mut(&self) -> RefMut<'_, H> {
        RefMut::map(self.ctx.shared.borrow_mut(), |s| &mut s.host)
    }

    /// Consumes the engine, dropping every binding, and returns the host.
    pub fn into_host(self) -> Option<H> {
        let FlexLayout { ctx, bound, .. } = self;
        drop(bound);
        Rc::try_unwrap(ctx.shared).ok().map(|cell| cell.into_inner().host)
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.bound.contains_key(&node)
    }

    /// Number of bound elements.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// State of the element's flex binding.
    pub fn flex_state(&self, node: NodeId) -> Option<ActiveState> {
        let flex = self.bound.get(&node)?.flex.as_ref()?;
        Some(flex.borrow().state().clone())
    }

    /// State of the element's layout binding.
    pub fn layout_state(&self, node: NodeId) -> Option<ActiveState> {
        let layout = self.bound.get(&node)?.layout.as_ref()?;
        Some(layout.borrow().state().clone())
    }

    /// Binds `node` if it declares flex or layout attributes, applying the
    /// current activation immediately. Returns `true` if a binding was made.
    ///
    /// Binding an already bound node rebinds it from its current attributes.
    pub fn bind(&mut self, node: NodeId) -> bool {
        let bound = self.bind_one(node);
        if bound {
            self.resubscribe();
        }
        bound
    }

    /// Binds every element of the host in document order. Returns the
    /// number of elements bound.
    pub fn bind_all(&mut self) -> usize {
        let nodes = self.ctx.shared.borrow().host.elements();
        let count = nodes.into_iter().filter(|node| self.bind_one(*node)).count();
        self.resubscribe();
        count
    }

    /// Stops updating `node`. Its current styles stay in place.
    ///
    /// Once a parent has no bound flex child left, the direction assumed
    /// for it is dropped from the resolver's cache.
    pub fn unbind(&mut self, node: NodeId) -> bool {
        let Some(removed) = self.bound.remove(&node) else {
            return false;
        };
        tracing::debug!(%node, "unbound element");
        if removed.flex.is_some() {
            self.release_parent(node);
        }
        true
    }

    fn release_parent(&self, node: NodeId) {
        let mut shared = self.ctx.shared.borrow_mut();
        let Some(parent) = shared.host.parent(node) else {
            return;
        };
        let in_use = self
            .bound
            .iter()
            .any(|(n, b)| b.flex.is_some() && shared.host.parent(*n) == Some(parent));
        if !in_use && shared.resolver.cache_mut().forget(parent).is_some() {
            tracing::debug!(%parent, "forgot assumed direction");
        }
    }

    fn bind_one(&mut self, node: NodeId) -> bool {
        let previous = self.bound.remove(&node);
        let (layout, flex) = {
            let shared = self.ctx.shared.borrow();
            let names = &self.ctx.config.attributes;
            (
                LayoutBinding::from_tree(&shared.host, node, &names.layout, &self.ctx.registry),
                FlexBinding::from_tree(&shared.host, node, &names.flex, &self.ctx.registry),
            )
        };
        if layout.is_none() && flex.is_none() {
            return false;
        }

        let current = self.monitor.current();
        let ctx = &self.ctx;
        let layout = layout.map(|mut binding| {
            if let Some(old) = previous.as_ref().and_then(|b| b.layout.as_ref()) {
                binding.inherit(&old.borrow());
            }
            let binding = Rc::new(RefCell::new(binding));
            refresh_layout(&ctx.shared, &binding, &current, &ctx.registry);
            binding
        });
        let flex = flex.map(|mut binding| {
            if let Some(old) = previous.as_ref().and_then(|b| b.flex.as_ref()) {
                binding.inherit(&old.borrow());
            }
            let binding = Rc::new(RefCell::new(binding));
            refresh_flex(&ctx.shared, &binding, &current, &ctx.registry, &ctx.config);
            binding
        });

        tracing::debug!(
            %node,
            layout = layout.is_some(),
            flex = flex.is_some(),
            "bound element"
        );
        self.bound.insert(
            node,
            Bound {
                layout,
                flex,
                subscriptions: Vec::new(),
            },
        );
        true
    }

    /// Re-creates every subscription in document order, parents first.
    /// Bound elements no longer attached to the tree go last.
    fn resubscribe(&mut self) {
        let mut order = self.ctx.shared.borrow().host.elements();
        let attached: HashSet<NodeId> = order.iter().copied().collect();
        let mut detached: Vec<NodeId> = self
            .bound
            .keys()
            .copied()
            .filter(|n| !attached.contains(n))
            .collect();
        detached.sort();
        order.extend(detached);

        for node in order {
            let Some(bound) = self.bound.get_mut(&node) else {
                continue;
            };
            bound.subscriptions.clear();
            if let Some(layout) = &bound.layout {
                bound
                    .subscriptions
                    .push(self.ctx.subscribe_layout(&self.monitor, layout));
            }
            if let Some(flex) = &bound.flex {
                bound
                    .subscriptions
                    .push(self.ctx.subscribe_flex(&self.monitor, flex));
            }
        }
    }

    /// Re-applies the current activation to the bound children of `parent`.
    fn refresh_children(&self, parent: NodeId) {
        let current = self.monitor.current();
        let children: Vec<NodeId> = {
            let shared = self.ctx.shared.borrow();
            self.bound
                .keys()
                .copied()
                .filter(|n| shared.host.parent(*n) == Some(parent))
                .collect()
        };
        for child in children {
            if let Some(flex) = self.bound.get(&child).and_then(|b| b.flex.as_ref()) {
                refresh_flex(&self.ctx.shared, flex, &current, &self.ctx.registry, &self.ctx.config);
            }
        }
    }
}

impl<H: Host + AttributeSink + 'static> FlexLayout<H> {
    /// Sets an attribute on `node`. Changes to flex or layout attributes
    /// rebind the element; a layout change also refreshes its bound children.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.host_mut().set_attribute(node, name, value);

        let names = &self.ctx.config.attributes;
        let is_flex = is_responsive_name(name, &names.flex);
        let is_layout = is_responsive_name(name, &names.layout);
        if !is_flex && !is_layout {
            return;
        }
        self.bind(node);
        if is_layout {
            self.refresh_children(node);
        }
    }
}

impl<H: Host + 'static> fmt::Debug for FlexLayout<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlexLayout")
            .field("bound", &self.bound.len())
            .field("current", &self.monitor.current())
            .field("config", &self.ctx.config)
            .finish()
    }
}

fn is_responsive_name(name: &str, attr: &str) -> bool {
    name == attr
        || name
            .strip_prefix(attr)
            .map_or(false, |rest| rest.starts_with('.'))
}

fn refresh_flex<H: Host>(
    shared: &RefCell<Shared<H>>,
    binding: &RefCell<FlexBinding>,
    activation: &Activation,
    registry: &BreakPointRegistry,
    config: &LayoutConfig,
) {
    let Ok(mut shared) = shared.try_borrow_mut() else {
        tracing::warn!("host is borrowed, skipping flex refresh");
        return;
    };
    let Shared { host, resolver } = &mut *shared;
    binding.borrow_mut().refresh(
        host,
        resolver,
        activation,
        registry,
        config.inject_default_direction,
    );
}

fn refresh_layout<H: Host>(
    shared: &RefCell<Shared<H>>,
    binding: &RefCell<LayoutBinding>,
    activation: &Activation,
    registry: &BreakPointRegistry,
) {
    let Ok(mut shared) = shared.try_borrow_mut() else {
        tracing::warn!("host is borrowed, skipping layout refresh");
        return;
    };
    binding
        .borrow_mut()
        .refresh(&mut shared.host, activation, registry);
}
