//! Components and the glue that connects them to the store
//!
//! A [`View`] is a presentation component: it renders and reacts to keys using
//! only the [`Props`] it is given. Wrapping it with [`Connected`] produces a
//! [`Component`] that projects props from the live [`AppState`] at every call
//! and remembers the state it last rendered, so the runner can skip frames
//! nothing subscribed to has changed.
//!
//! The dependency container stores [`Service`] values: raw views are registered
//! first and turned into connected components by the [`connected`] decorator.

use std::sync::{Arc, Mutex};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use shlink_app::connect::{Connect, Dispatcher, OwnProps, Props};
use shlink_app::container::Resolver;
use shlink_app::input_key::InputKey;
use shlink_app::state::AppState;
use shlink_core::prelude::*;
use shlink_core::ColorGenerator;

use crate::theme::palette::{self, Palette};

/// Everything a component needs for one call
#[derive(Clone)]
pub struct Context<'a> {
    pub state: &'a AppState,
    pub dispatcher: &'a Dispatcher,
    /// Props passed down by the parent
    pub own: OwnProps,
}

impl<'a> Context<'a> {
    pub fn new(state: &'a AppState, dispatcher: &'a Dispatcher) -> Self {
        Self {
            state,
            dispatcher,
            own: OwnProps::default(),
        }
    }

    pub fn with_own(&self, own: OwnProps) -> Context<'a> {
        Context {
            state: self.state,
            dispatcher: self.dispatcher,
            own,
        }
    }

    pub fn palette(&self) -> &'static Palette {
        palette::for_theme(self.state.resolved_theme())
    }
}

/// A component wired to the store
pub trait Component: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, ctx: &Context<'_>, area: Rect, buf: &mut Buffer);

    /// Returns true when the key was consumed
    fn handle_key(&self, ctx: &Context<'_>, key: InputKey) -> bool;

    fn mount(&self, ctx: &Context<'_>);

    fn unmount(&self, ctx: &Context<'_>);

    /// Runs after every processed message
    fn sync(&self, ctx: &Context<'_>);

    /// Whether anything this component (or a mounted child) reads has changed
    fn should_render(&self, state: &AppState) -> bool;
}

/// What a view sees during a call: its props, the palette and a way to reach
/// its mounted children
pub struct Scope<'a> {
    pub props: Props,
    pub palette: &'static Palette,
    ctx: Option<&'a Context<'a>>,
}

impl<'a> Scope<'a> {
    /// Scope without a store behind it; children are not reachable
    pub fn detached(props: Props, palette: &'static Palette) -> Self {
        Self {
            props,
            palette,
            ctx: None,
        }
    }

    fn child_ctx(&self, own: OwnProps) -> Option<Context<'a>> {
        self.ctx.map(|ctx| ctx.with_own(own))
    }

    pub fn render_child(&self, child: &dyn Component, own: OwnProps, area: Rect, buf: &mut Buffer) {
        if let Some(ctx) = self.child_ctx(own) {
            child.render(&ctx, area, buf);
        }
    }

    pub fn child_key(&self, child: &dyn Component, key: InputKey) -> bool {
        match self.child_ctx(OwnProps::default()) {
            Some(ctx) => child.handle_key(&ctx, key),
            None => false,
        }
    }

    pub fn mount_child(&self, child: &dyn Component) {
        if let Some(ctx) = self.child_ctx(OwnProps::default()) {
            trace!("Mounting {}", child.name());
            child.mount(&ctx);
        }
    }

    pub fn unmount_child(&self, child: &dyn Component) {
        if let Some(ctx) = self.child_ctx(OwnProps::default()) {
            trace!("Unmounting {}", child.name());
            child.unmount(&ctx);
        }
    }

    pub fn sync_child(&self, child: &dyn Component) {
        if let Some(ctx) = self.child_ctx(OwnProps::default()) {
            child.sync(&ctx);
        }
    }
}

/// A presentation component
pub trait View: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, scope: &Scope<'_>, area: Rect, buf: &mut Buffer);

    fn handle_key(&self, _scope: &Scope<'_>, _key: InputKey) -> bool {
        false
    }

    fn on_mount(&self, _scope: &Scope<'_>) {}

    fn on_unmount(&self, _scope: &Scope<'_>) {}

    fn on_update(&self, _scope: &Scope<'_>) {}

    /// Children currently mounted under this view
    fn children(&self) -> Vec<Arc<dyn Component>> {
        Vec::new()
    }
}

/// A view bound to the store through a [`Connect`] declaration
pub struct Connected {
    connect: Connect,
    view: Arc<dyn View>,
    last_rendered: Mutex<Option<AppState>>,
}

impl Connected {
    pub fn new(connect: Connect, view: Arc<dyn View>) -> Self {
        Self {
            connect,
            view,
            last_rendered: Mutex::new(None),
        }
    }

    pub fn connect(&self) -> &Connect {
        &self.connect
    }

    fn scope<'s>(&self, ctx: &'s Context<'s>) -> Scope<'s> {
        Scope {
            props: self
                .connect
                .project(ctx.state, ctx.dispatcher, ctx.own.clone()),
            palette: ctx.palette(),
            ctx: Some(ctx),
        }
    }
}

impl Component for Connected {
    fn name(&self) -> &'static str {
        self.view.name()
    }

    fn render(&self, ctx: &Context<'_>, area: Rect, buf: &mut Buffer) {
        self.view.render(&self.scope(ctx), area, buf);
        *self.last_rendered.lock().unwrap_or_else(|e| e.into_inner()) = Some(ctx.state.clone());
    }

    fn handle_key(&self, ctx: &Context<'_>, key: InputKey) -> bool {
        self.view.handle_key(&self.scope(ctx), key)
    }

    fn mount(&self, ctx: &Context<'_>) {
        self.view.on_mount(&self.scope(ctx));
    }

    fn unmount(&self, ctx: &Context<'_>) {
        self.view.on_unmount(&self.scope(ctx));
        *self.last_rendered.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn sync(&self, ctx: &Context<'_>) {
        self.view.on_update(&self.scope(ctx));
    }

    fn should_render(&self, state: &AppState) -> bool {
        let own = {
            let last = self.last_rendered.lock().unwrap_or_else(|e| e.into_inner());
            self.connect.should_render(last.as_ref(), state)
        };
        own || self
            .view
            .children()
            .iter()
            .any(|child| child.should_render(state))
    }
}

/// Child mounted in one place of a parent, swapped when its key changes
pub struct MountSlot<K> {
    current: Mutex<Option<(K, Arc<dyn Component>)>>,
}

impl<K> Default for MountSlot<K> {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }
}

impl<K: PartialEq + Send> MountSlot<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `next` the mounted child, unmounting the previous one if its key differs
    pub fn sync(&self, scope: &Scope<'_>, next: Option<(K, Arc<dyn Component>)>) {
        let previous = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            let same = match (current.as_ref(), next.as_ref()) {
                (Some((a, _)), Some((b, _))) => a == b,
                (None, None) => true,
                _ => false,
            };
            if same {
                return;
            }
            current.take()
        };
        if let Some((_, old)) = previous {
            scope.unmount_child(old.as_ref());
        }
        if let Some((key, child)) = next {
            scope.mount_child(child.as_ref());
            *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some((key, child));
        }
    }

    pub fn current(&self) -> Option<Arc<dyn Component>> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, child)| child.clone())
    }

    pub fn clear(&self, scope: &Scope<'_>) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some((_, old)) = previous {
            scope.unmount_child(old.as_ref());
        }
    }
}

/// Entries of the component container
pub enum Service {
    Colors(Arc<ColorGenerator>),
    /// Registered presentation component, not yet connected
    View(Arc<dyn View>),
    Component(Arc<dyn Component>),
}

impl Service {
    fn kind(&self) -> &'static str {
        match self {
            Service::Colors(_) => "color service",
            Service::View(_) => "view",
            Service::Component(_) => "component",
        }
    }
}

/// Connected component registered under `key`
pub fn component(r: &Resolver<'_, Service>, key: &str) -> Result<Arc<dyn Component>> {
    match r.get(key)?.as_ref() {
        Service::Component(c) => Ok(c.clone()),
        other => Err(Error::WrongKind {
            key: format!("{key} ({})", other.kind()),
            expected: "connected component",
        }),
    }
}

/// Color service registered under `key`
pub fn colors(r: &Resolver<'_, Service>, key: &str) -> Result<Arc<ColorGenerator>> {
    match r.get(key)?.as_ref() {
        Service::Colors(c) => Ok(c.clone()),
        other => Err(Error::WrongKind {
            key: format!("{key} ({})", other.kind()),
            expected: "color service",
        }),
    }
}

/// Decorator connecting a registered view to the store
pub fn connected(connect: Connect) -> impl Fn(Arc<Service>) -> Arc<Service> + Send + Sync {
    move |service| match service.as_ref() {
        Service::View(view) => Arc::new(Service::Component(Arc::new(Connected::new(
            connect.clone(),
            view.clone(),
        )))),
        other => {
            warn!("Cannot connect a {}", other.kind());
            service
        }
    }
}
