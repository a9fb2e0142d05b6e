use wellbeing_model::CountryId;

use crate::config::DashboardConfig;
use crate::error::{RegistryError, SelectionError};
use crate::events::{ClickTarget, DispatchOutcome, InteractionEvent};
use crate::registry::{RefreshReport, ViewRegistry};
use crate::selection::SelectionState;
use crate::store::DatasetStore;
use crate::views::{NullRenderer, Renderer, View, ViewContext, brushed_ids, default_views};

/// Store, selection, views and renderer wired together.
///
/// Every accepted event that changes the selection triggers exactly one
/// refresh pass before `dispatch` returns.
pub struct Dashboard {
    store: DatasetStore,
    config: DashboardConfig,
    state: SelectionState,
    registry: ViewRegistry,
    renderer: Box<dyn Renderer>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.state)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// A dashboard with no views that draws nothing.
    pub fn new(store: DatasetStore, config: DashboardConfig) -> Self {
        let state = SelectionState::new(&store, &config);
        Self {
            store,
            config,
            state,
            registry: ViewRegistry::new(),
            renderer: Box::new(NullRenderer),
        }
    }

    /// Register the standard views and draw them with `renderer`.
    pub fn with_default_views(
        mut self,
        renderer: impl Renderer + 'static,
    ) -> Result<Self, RegistryError> {
        self.renderer = Box::new(renderer);
        for view in default_views() {
            self.registry.register(view)?;
        }
        Ok(self)
    }

    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.renderer = Box::new(renderer);
    }

    pub fn register(&mut self, view: Box<dyn View>) -> Result<(), RegistryError> {
        self.registry.register(view)
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn view_order(&self) -> Vec<&str> {
        self.registry.order()
    }

    /// Recompute and draw every view from the current state.
    pub fn refresh_all(&mut self) -> RefreshReport {
        let ctx = ViewContext {
            store: &self.store,
            state: &self.state,
            config: &self.config,
        };
        self.registry.refresh_all(&ctx, self.renderer.as_mut())
    }

    /// Apply one interaction and refresh if it changed the selection.
    pub fn dispatch(&mut self, event: &InteractionEvent) -> DispatchOutcome {
        tracing::debug!(event = event.name(), "dispatch");
        match self.apply(event) {
            Ok(true) => DispatchOutcome::Refreshed(self.refresh_all()),
            Ok(false) => DispatchOutcome::Unchanged,
            Err(err) => DispatchOutcome::Rejected(err),
        }
    }

    fn apply(&mut self, event: &InteractionEvent) -> Result<bool, SelectionError> {
        match event {
            InteractionEvent::SetYear { year } => self.state.set_year(*year),
            InteractionEvent::Click { target, country } => Ok(self.click(*target, *country)),
            InteractionEvent::SetPrimary { country } => Ok(self.state.set_primary(*country)),
            InteractionEvent::SetRegion {
                classification,
                value,
            } => self
                .state
                .set_region_filter(&self.store, classification, value),
            InteractionEvent::SetMetric { metric } => Ok(self.state.set_active_metric(*metric)),
            InteractionEvent::SetConfidence { percent } => {
                self.state.set_confidence_level(*percent)
            }
            InteractionEvent::SetBins { count: Some(count) } => self.state.set_bin_size(*count),
            InteractionEvent::SetBins { count: None } => Ok(self.state.clear_bin_size()),
            InteractionEvent::SetProjection { projection } => {
                Ok(self.state.set_projection(*projection))
            }
            InteractionEvent::BrushStart => Ok(self.state.begin_brush()),
            InteractionEvent::BrushMove { rect } => {
                let ctx = ViewContext {
                    store: &self.store,
                    state: &self.state,
                    config: &self.config,
                };
                let ids = brushed_ids(&ctx, *rect);
                Ok(self.state.update_brush(*rect, ids))
            }
            InteractionEvent::BrushEnd => Ok(self.state.end_brush()),
        }
    }

    /// Route a map click. The comparison map toggles valid countries other
    /// than the primary; the selector only accepts countries with a record
    /// for the selected year.
    fn click(&mut self, target: ClickTarget, country: CountryId) -> bool {
        match target {
            ClickTarget::Map => {
                if !self.store.is_valid(country) {
                    tracing::debug!(%country, "click on country without data ignored");
                    return false;
                }
                self.state.toggle_entity(country)
            }
            ClickTarget::Selector => {
                if !self.store.has_record(country, self.state.year()) {
                    tracing::debug!(
                        %country,
                        year = self.state.year(),
                        "selector click on country without a record this year ignored"
                    );
                    return false;
                }
                self.state.set_primary(Some(country))
            }
        }
    }
}
