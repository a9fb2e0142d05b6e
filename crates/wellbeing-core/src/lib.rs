//! Selection state, derived data and view orchestration for the well-being
//! dashboard.
//!
//! A [`Dashboard`] owns the immutable [`DatasetStore`], the single
//! [`SelectionState`] and a [`ViewRegistry`]. Interaction events go through
//! [`Dashboard::dispatch`]; each accepted change runs one synchronous refresh
//! pass over every registered view.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod registry;
pub mod selection;
pub mod store;
pub mod views;

pub use config::{DashboardConfig, Palette};
pub use dashboard::Dashboard;
pub use error::{ConfigError, RegistryError, SelectionError};
pub use events::{ClickTarget, DispatchOutcome, InteractionEvent};
pub use registry::{RefreshReport, ViewRegistry};
pub use selection::{BrushRect, Highlight, Projection, RegionSelection, SelectionState};
pub use store::DatasetStore;
pub use views::{
    AggregateBoard, AggregateKey, DerivedData, Frame, NullRenderer, RecordingRenderer, Renderer,
    View, ViewContext,
};
