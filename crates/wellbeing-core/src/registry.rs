//! View registry and refresh orchestration.
//!
//! Views are refreshed in dependency order: a view that consumes an
//! aggregate runs after the view producing it. Ties keep registration order.
//! The order is recomputed on every registration, so a refresh never sorts.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::RegistryError;
use crate::views::{AggregateBoard, AggregateKey, Renderer, View, ViewContext};

/// Summary of one refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub pass: u64,
    /// View names in the order they were recomputed and drawn.
    pub views: Vec<String>,
    /// Aggregates published during the pass.
    pub aggregates: Vec<AggregateKey>,
}

#[derive(Default)]
pub struct ViewRegistry {
    views: Vec<Box<dyn View>>,
    order: Vec<usize>,
    passes: u64,
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("order", &self.order())
            .field("passes", &self.passes)
            .finish()
    }
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view. Fails, leaving the registry unchanged, on a duplicate
    /// name, a second producer of the same aggregate, or a cycle.
    pub fn register(&mut self, view: Box<dyn View>) -> Result<(), RegistryError> {
        if self.views.iter().any(|existing| existing.name() == view.name()) {
            return Err(RegistryError::DuplicateView(view.name().to_string()));
        }
        for key in view.produces() {
            if let Some(first) = self
                .views
                .iter()
                .find(|existing| existing.produces().contains(key))
            {
                return Err(RegistryError::DuplicateProducer {
                    key: *key,
                    first: first.name().to_string(),
                    second: view.name().to_string(),
                });
            }
        }
        self.views.push(view);
        match sort_views(&self.views) {
            Ok(order) => {
                self.order = order;
                Ok(())
            }
            Err(err) => {
                self.views.pop();
                Err(err)
            }
        }
    }

    /// View names in refresh order.
    pub fn order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&idx| self.views[idx].name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Recompute and draw every view once, producers first.
    pub fn refresh_all(
        &mut self,
        ctx: &ViewContext<'_>,
        renderer: &mut dyn Renderer,
    ) -> RefreshReport {
        self.passes += 1;
        let pass = self.passes;
        let span = tracing::info_span!("refresh", pass);
        let _guard = span.enter();

        renderer.begin_pass(pass);
        let mut board = AggregateBoard::default();
        let mut names = Vec::with_capacity(self.order.len());
        for &idx in &self.order {
            let view = &mut self.views[idx];
            let view_span = tracing::debug_span!("view", name = view.name());
            let _view_guard = view_span.enter();
            let data = view.recompute(ctx, &mut board);
            view.draw(&data, renderer);
            tracing::debug!("view refreshed");
            names.push(view.name().to_string());
        }
        let aggregates: Vec<AggregateKey> = AggregateKey::ALL
            .into_iter()
            .filter(|key| board.get(*key).is_some())
            .collect();
        tracing::debug!(views = names.len(), aggregates = aggregates.len(), "refresh complete");
        RefreshReport {
            pass,
            views: names,
            aggregates,
        }
    }
}

/// Kahn's algorithm, always taking the earliest-registered ready view.
fn sort_views(views: &[Box<dyn View>]) -> Result<Vec<usize>, RegistryError> {
    let producers: BTreeMap<AggregateKey, usize> = views
        .iter()
        .enumerate()
        .flat_map(|(idx, view)| view.produces().iter().map(move |key| (*key, idx)))
        .collect();

    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); views.len()];
    let mut indegree = vec![0usize; views.len()];
    for (idx, view) in views.iter().enumerate() {
        let upstream: BTreeSet<usize> = view
            .consumes()
            .iter()
            .filter_map(|key| producers.get(key).copied())
            .collect();
        for producer in upstream {
            if producer == idx {
                continue;
            }
            dependents[producer].insert(idx);
            indegree[idx] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..views.len()).filter(|&idx| indegree[idx] == 0).collect();
    let mut order = Vec::with_capacity(views.len());
    while let Some(idx) = ready.pop_first() {
        order.push(idx);
        for &next in &dependents[idx] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() < views.len() {
        let views = (0..views.len())
            .filter(|idx| !order.contains(idx))
            .map(|idx| views[idx].name().to_string())
            .collect();
        return Err(RegistryError::DependencyCycle { views });
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{Aggregate, DerivedData, NullRenderer, RegionAggregate};

    struct Stub {
        name: &'static str,
        produces: Vec<AggregateKey>,
        consumes: Vec<AggregateKey>,
    }

    impl Stub {
        fn boxed(
            name: &'static str,
            produces: &[AggregateKey],
            consumes: &[AggregateKey],
        ) -> Box<dyn View> {
            Box::new(Self {
                name,
                produces: produces.to_vec(),
                consumes: consumes.to_vec(),
            })
        }
    }

    impl View for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn produces(&self) -> &[AggregateKey] {
            &self.produces
        }

        fn consumes(&self) -> &[AggregateKey] {
            &self.consumes
        }

        fn recompute(&mut self, _ctx: &ViewContext<'_>, _board: &mut AggregateBoard) -> DerivedData {
            DerivedData::RegionSummary(empty_summary())
        }
    }

    fn empty_summary() -> RegionAggregate {
        RegionAggregate {
            label: None,
            year: 2020,
            members: 0,
            means: Default::default(),
            percentiles: Default::default(),
        }
    }

    /// Publishes on its first recompute only.
    struct FirstPassOnly {
        published: bool,
    }

    impl View for FirstPassOnly {
        fn name(&self) -> &str {
            "first-pass-only"
        }

        fn produces(&self) -> &[AggregateKey] {
            &[SUMMARY]
        }

        fn recompute(&mut self, _ctx: &ViewContext<'_>, board: &mut AggregateBoard) -> DerivedData {
            if !self.published {
                board.publish(Aggregate::RegionSummary(empty_summary()));
                self.published = true;
            }
            DerivedData::RegionSummary(empty_summary())
        }
    }

    const SUMMARY: AggregateKey = AggregateKey::RegionSummary;
    const SERIES: AggregateKey = AggregateKey::RegionSeries;

    #[test]
    fn consumers_move_after_producers() {
        let mut registry = ViewRegistry::new();
        registry.register(Stub::boxed("radar", &[], &[SUMMARY])).unwrap();
        registry.register(Stub::boxed("scatter", &[], &[])).unwrap();
        registry.register(Stub::boxed("region", &[SUMMARY], &[])).unwrap();
        assert_eq!(registry.order(), vec!["scatter", "region", "radar"]);
    }

    #[test]
    fn unproduced_aggregates_do_not_block() {
        let mut registry = ViewRegistry::new();
        registry.register(Stub::boxed("lines", &[], &[SERIES])).unwrap();
        registry.register(Stub::boxed("map", &[], &[])).unwrap();
        assert_eq!(registry.order(), vec!["lines", "map"]);
    }

    #[test]
    fn rejects_cycles_and_duplicates() {
        let mut registry = ViewRegistry::new();
        registry.register(Stub::boxed("a", &[SUMMARY], &[SERIES])).unwrap();
        let err = registry
            .register(Stub::boxed("b", &[SERIES], &[SUMMARY]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DependencyCycle {
                views: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert_eq!(registry.len(), 1);

        let err = registry.register(Stub::boxed("a", &[], &[])).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateView("a".to_string()));

        let err = registry.register(Stub::boxed("c", &[SUMMARY], &[])).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateProducer { .. }));
    }

    #[test]
    fn refresh_counts_passes() {
        let store = crate::store::DatasetStore::default();
        let config = crate::config::DashboardConfig::default();
        let state = crate::selection::SelectionState::new(&store, &config);
        let ctx = ViewContext {
            store: &store,
            state: &state,
            config: &config,
        };
        let mut registry = ViewRegistry::new();
        registry.register(Stub::boxed("only", &[], &[])).unwrap();
        let first = registry.refresh_all(&ctx, &mut NullRenderer);
        let second = registry.refresh_all(&ctx, &mut NullRenderer);
        assert_eq!((first.pass, second.pass), (1, 2));
        assert_eq!(second.views, vec!["only"]);
        assert!(second.aggregates.is_empty());
    }

    #[test]
    fn aggregates_do_not_outlive_their_pass() {
        let store = crate::store::DatasetStore::default();
        let config = crate::config::DashboardConfig::default();
        let state = crate::selection::SelectionState::new(&store, &config);
        let ctx = ViewContext {
            store: &store,
            state: &state,
            config: &config,
        };
        let mut registry = ViewRegistry::new();
        registry
            .register(Box::new(FirstPassOnly { published: false }))
            .unwrap();
        let first = registry.refresh_all(&ctx, &mut NullRenderer);
        let second = registry.refresh_all(&ctx, &mut NullRenderer);
        assert_eq!(first.aggregates, vec![SUMMARY]);
        assert!(second.aggregates.is_empty());
    }
}
