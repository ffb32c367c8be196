//! Navigation controller - the session stack of renderer instances
//!
//! Every opened renderer is pushed onto a stack, oldest first. One entry is
//! active at a time and owns the mount surface; the others are suspended and
//! can be brought back without recomputation. Opening a renderer from a
//! non-tip position discards the forward history, like following a link.
//!
//! The controller is driven from the host loop only. It never awaits a
//! renderer; asynchronous work started by `display`/`wake_up` reports back
//! through [`HostEvent`]s.

use super::context::{
    ContextSnapshot, HostContext, HostEvent, HostEventSender, Navigator, Notifier, ReadySignal,
    RendererContext,
};
use super::contract::{Handled, Renderer};
use super::policy::SelectionPolicy;
use super::registry::{Registry, RendererDescriptor};
use super::surface::{Generation, MountSurface};
use crate::data::DataSource;
use crossterm::event::KeyEvent;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of one stack entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Constructed, never shown
    Fresh,
    /// Owns the surface
    Active,
    /// Slept, model retained
    Suspended,
    /// Removed from the stack
    Destroyed,
}

/// One renderer instance on the stack
struct RendererInstance {
    descriptor_name: String,
    generation: Generation,
    state: InstanceState,
    renderer: Box<dyn Renderer>,
}

impl RendererInstance {
    fn destroy(mut self) {
        self.state = InstanceState::Destroyed;
        tracing::debug!(
            renderer = %self.descriptor_name,
            generation = %self.generation,
            state = ?self.state,
            "renderer instance destroyed"
        );
    }
}

/// Names on the stack plus the active position, for the host chrome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    pub entries: Vec<String>,
    pub active: Option<usize>,
}

impl Breadcrumb {
    pub fn active_name(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    /// `Table › Curve` style label of the whole trail
    pub fn label(&self) -> String {
        self.entries.join(" › ")
    }
}

/// Host-provided collaborators injected into every renderer context
#[derive(Clone)]
pub struct EngineServices {
    pub events: HostEventSender,
    pub data: Arc<dyn DataSource>,
    pub surface: MountSurface,
}

type RefreshHook = Box<dyn FnMut(&Breadcrumb) + Send>;

/// Owns the session stack and drives renderer lifecycles
pub struct NavigationController {
    registry: Arc<Registry>,
    policy: SelectionPolicy,
    services: EngineServices,
    host: HostContext,
    stack: Vec<RendererInstance>,
    active: Option<usize>,
    next_generation: Generation,
    refresh: Option<RefreshHook>,
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("stack", &self.breadcrumb())
            .field("next_generation", &self.next_generation)
            .finish_non_exhaustive()
    }
}

impl NavigationController {
    pub fn new(registry: Arc<Registry>, policy: SelectionPolicy, services: EngineServices) -> Self {
        Self {
            registry,
            policy,
            services,
            host: HostContext::default(),
            stack: Vec::new(),
            active: None,
            next_generation: Generation::new(1),
            refresh: None,
        }
    }

    /// Install the hook invoked after every change of the active instance
    pub fn on_refresh(&mut self, hook: impl FnMut(&Breadcrumb) + Send + 'static) {
        self.refresh = Some(Box::new(hook));
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn surface(&self) -> &MountSurface {
        &self.services.surface
    }

    /// Replace the host context that future instances snapshot from
    pub fn set_host_context(&mut self, host: HostContext) {
        self.host = host;
    }

    /// Mutable access to the live host context
    ///
    /// Existing instances keep the snapshot they were created with.
    #[cfg(test)]
    pub fn host_context_mut(&mut self) -> &mut HostContext {
        &mut self.host
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session stack
    // ─────────────────────────────────────────────────────────────────────────

    /// Activate the instance at `index`, suspending the current one
    ///
    /// `display` runs only for a first display of a fresh instance; every
    /// other activation goes through `wake_up`.
    pub fn show(&mut self, index: usize, is_first_display: bool) {
        if index >= self.stack.len() {
            tracing::warn!(index, len = self.stack.len(), "show: index out of range");
            return;
        }

        self.suspend_active();

        let instance = &mut self.stack[index];
        self.services.surface.claim(instance.generation);

        let first = is_first_display && instance.state == InstanceState::Fresh;
        if is_first_display && !first {
            tracing::warn!(
                renderer = %instance.descriptor_name,
                state = ?instance.state,
                "first display requested for an instance already shown, waking up instead"
            );
        }

        instance.state = InstanceState::Active;
        if first {
            tracing::debug!(renderer = %instance.descriptor_name, index, "display");
            instance.renderer.display();
        } else {
            tracing::debug!(renderer = %instance.descriptor_name, index, "wake up");
            instance.renderer.wake_up();
        }

        self.active = Some(index);
        self.notify_refresh();
    }

    /// Open renderer `name` on `payload`
    ///
    /// With `force_new_session` the whole stack is discarded first; otherwise
    /// only the history beyond the active position is. Returns false, with
    /// the stack untouched, when no renderer has that name.
    pub fn add_visualization(&mut self, name: &str, payload: Value, force_new_session: bool) -> bool {
        let registry = Arc::clone(&self.registry);
        let Some(descriptor) = registry.lookup_by_name(name) else {
            tracing::warn!(renderer = name, "add_visualization: unknown renderer");
            self.services.surface.clear();
            self.toast(format!("No renderer named \"{name}\""));
            return false;
        };

        if force_new_session {
            self.suspend_active();
            self.truncate(0);
        } else {
            let keep = self.active.map_or(0, |i| i + 1);
            self.truncate(keep);
        }

        let ctx = self.context_for(descriptor);
        let generation = ctx.generation();
        let renderer = descriptor.instantiate(ctx, payload);
        tracing::debug!(renderer = name, %generation, force_new_session, "renderer instance created");

        self.stack.push(RendererInstance {
            descriptor_name: descriptor.name.clone(),
            generation,
            state: InstanceState::Fresh,
            renderer,
        });

        self.show(self.stack.len() - 1, true);
        true
    }

    /// Open whatever the selection policy picks for `result_type`
    pub fn open_default(&mut self, result_type: &str, payload: Value, force_new_session: bool) -> bool {
        let Some(name) = self.default_renderer_for(result_type).map(|d| d.name.clone()) else {
            tracing::warn!(result_type, "no renderer accepts this result type");
            self.toast(format!("No renderer can display \"{result_type}\" results"));
            return false;
        };
        self.add_visualization(&name, payload, force_new_session)
    }

    /// Destroy every instance at position `index` and above
    ///
    /// The surviving tip is woken up; removing from 0 leaves no active
    /// instance and an empty surface.
    pub fn remove_from_stack(&mut self, index: usize) {
        if index > self.stack.len() {
            tracing::warn!(index, len = self.stack.len(), "remove_from_stack: index out of range");
            return;
        }

        if matches!(self.active, Some(active) if active >= index) {
            self.suspend_active();
        }
        self.truncate(index);

        if index == 0 {
            self.services.surface.release();
            self.active = None;
            self.notify_refresh();
        } else {
            self.show(index - 1, false);
        }
    }

    /// Step to the previous entry, keeping forward history
    pub fn back(&mut self) -> bool {
        match self.active {
            Some(active) if active > 0 => {
                self.show(active - 1, false);
                true
            }
            _ => false,
        }
    }

    /// Step to the next entry of the forward history
    pub fn forward(&mut self) -> bool {
        match self.active {
            Some(active) if active + 1 < self.stack.len() => {
                self.show(active + 1, false);
                true
            }
            _ => false,
        }
    }

    /// Offer a key to the active renderer
    pub fn dispatch_key(&mut self, key: KeyEvent) -> Handled {
        match self.active.and_then(|i| self.stack.get_mut(i)) {
            Some(instance) => instance.renderer.handle_key(key),
            None => Handled::No,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn available_renderers(&self, result_type: &str) -> Vec<&RendererDescriptor> {
        self.policy.available(&self.registry, result_type)
    }

    pub fn default_renderer_for(&self, result_type: &str) -> Option<&RendererDescriptor> {
        self.policy.default_renderer_for(&self.registry, result_type)
    }

    pub fn describe(&self, name: &str) -> Option<&str> {
        self.registry.describe(name)
    }

    pub fn controls_of(&self, name: &str) -> Option<Vec<(&str, &str)>> {
        self.registry.controls_of(name)
    }

    pub fn breadcrumb(&self) -> Breadcrumb {
        Breadcrumb {
            entries: self
                .stack
                .iter()
                .map(|i| i.descriptor_name.clone())
                .collect(),
            active: self.active,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.stack.get(i))
            .map(|i| i.descriptor_name.as_str())
    }

    /// Whether `generation` is the instance currently on screen
    pub fn is_active_generation(&self, generation: Generation) -> bool {
        self.active
            .and_then(|i| self.stack.get(i))
            .is_some_and(|i| i.generation == generation)
    }

    #[cfg(test)]
    pub fn state_of(&self, index: usize) -> Option<InstanceState> {
        self.stack.get(index).map(|i| i.state)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Sleep the active instance and hand back the surface
    fn suspend_active(&mut self) {
        let Some(index) = self.active.take() else {
            return;
        };
        if let Some(instance) = self.stack.get_mut(index) {
            if instance.state == InstanceState::Active {
                tracing::debug!(renderer = %instance.descriptor_name, index, "sleep");
                instance.renderer.sleep();
                instance.state = InstanceState::Suspended;
            }
        }
        self.services.surface.release();
    }

    /// Drop every instance at `len` and above
    fn truncate(&mut self, len: usize) {
        if len >= self.stack.len() {
            return;
        }
        if matches!(self.active, Some(active) if active >= len) {
            self.active = None;
        }
        for instance in self.stack.drain(len..) {
            instance.destroy();
        }
    }

    fn context_for(&mut self, descriptor: &RendererDescriptor) -> RendererContext {
        let generation = self.next_generation;
        self.next_generation = generation.next();

        let events = &self.services.events;
        RendererContext {
            snapshot: ContextSnapshot::capture(&self.host, &descriptor.required_context),
            navigator: Navigator::new(events.clone()),
            notifier: Notifier::new(events.clone()),
            ready: ReadySignal::new(events.clone(), generation, descriptor.name.clone()),
            pen: self.services.surface.pen(generation),
            data: Arc::clone(&self.services.data),
        }
    }

    fn toast(&self, message: String) {
        let _ = self.services.events.send(HostEvent::Toast(message));
    }

    fn notify_refresh(&mut self) {
        let breadcrumb = self.breadcrumb();
        if let Some(hook) = self.refresh.as_mut() {
            hook(&breadcrumb);
        }
    }
}
