//! Visualization plugin engine
//!
//! Renderers are pluggable components that turn one result payload into an
//! interactive view on the mount surface. The engine decides which renderer
//! handles a result and keeps the history of opened renderers as a session
//! stack, driving each instance through its lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  NavigationController                       │
//! │   session stack · active index · lifecycle transitions      │
//! └─────────────────────────────────────────────────────────────┘
//!            │                    │                    │
//!            ▼                    ▼                    ▼
//!     ┌────────────┐      ┌──────────────┐      ┌────────────┐
//!     │  Registry  │◄─────│  Selection   │      │   Mount    │
//!     │ (immutable)│      │   Policy     │      │  Surface   │
//!     └────────────┘      └──────────────┘      └────────────┘
//!            │                                         ▲
//!            ▼                                         │ pen (by generation)
//!     RendererDescriptor ──factory──► Box<dyn Renderer>┘
//! ```
//!
//! # Lifecycle
//!
//! `Fresh → Active → Suspended → Active → … → Destroyed`
//!
//! - [`Renderer::display`] runs once, on the first activation
//! - [`Renderer::wake_up`] runs on every later activation
//! - [`Renderer::sleep`] runs every time an instance stops being active
//!
//! Instances dropped from the stack are destroyed without a second `sleep`.

pub mod context;
pub mod contract;
pub mod contrib;
pub mod controller;
pub mod policy;
pub mod registry;
pub mod surface;

pub use context::{ContextKind, HostContext, HostEvent, OperatorParameter, RendererContext};
pub use contract::{Handled, Renderer, RendererFactory};
pub use contrib::{ContributedRenderer, ImplementationTable};
pub use controller::{Breadcrumb, EngineServices, NavigationController};
pub use policy::{Mode, ModeFlag, SelectionPolicy};
pub use registry::{Registry, RegistryError, RendererDescriptor};
pub use surface::MountSurface;
