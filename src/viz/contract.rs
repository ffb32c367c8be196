//! Renderer contract - the capability set every visualization plugin implements
//!
//! The engine only ever talks to a renderer through this trait. Anything else
//! a renderer needs (drawing, drilling into related data, user-facing errors,
//! data access) arrives through the [`RendererContext`] it was constructed with.

use super::context::RendererContext;
use crossterm::event::KeyEvent;
use serde_json::Value;
use std::sync::Arc;

/// Result of offering a key event to a renderer
///
/// Tells the host whether the renderer consumed the event or if it should
/// fall through to host navigation (scrolling the surface, breadcrumb keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the renderer
    Yes,
    /// Event was not handled, host may act on it
    No,
}

impl Handled {
    pub fn was_handled(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// A pluggable visualization
///
/// # Lifecycle
///
/// The controller calls [`display`](Renderer::display) exactly once, when the
/// instance is first activated. Every later activation goes through
/// [`wake_up`](Renderer::wake_up). Before an instance stops being the active
/// one, [`sleep`](Renderer::sleep) is called.
///
/// # Example
///
/// ```ignore
/// struct Banner {
///     ctx: RendererContext,
///     text: String,
/// }
///
/// impl Renderer for Banner {
///     fn display(&mut self) {
///         self.ctx.pen.draw(vec![Line::raw(self.text.clone())]);
///     }
///
///     fn wake_up(&mut self) {
///         self.display();
///     }
/// }
/// ```
pub trait Renderer {
    /// First-time initialization: collect auxiliary data, draw, wire up interaction.
    ///
    /// May return before the view is complete; asynchronous continuations draw
    /// through the context's pen and fire the ready signal when done.
    fn display(&mut self);

    /// Restore the view after a `sleep`, reusing the renderer's own data model.
    fn wake_up(&mut self);

    /// Release transient resources: abort in-flight requests, stop timers.
    ///
    /// Must keep the data model, `wake_up` may follow.
    fn sleep(&mut self) {}

    /// Offer a key event to the renderer while it is active.
    fn handle_key(&mut self, _key: KeyEvent) -> Handled {
        Handled::No
    }
}

/// Constructor stored in a descriptor: `(context, payload) -> renderer`
pub type RendererFactory = Arc<dyn Fn(RendererContext, Value) -> Box<dyn Renderer> + Send + Sync>;
