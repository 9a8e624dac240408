//! Filtered view over the narration engine's voice catalog.

use tokio::sync::watch;
use tracing::{debug, info};

use audioleaf_core::{NarrationEngine, VoiceFilter, VoiceProfile};

/// The voices a session offers, kept in step with the engine's catalog.
///
/// The registry holds a catalog subscription between [`start`] and
/// [`stop`]. Catalog changes are picked up on the next [`refresh`].
///
/// [`start`]: VoiceRegistry::start
/// [`stop`]: VoiceRegistry::stop
/// [`refresh`]: VoiceRegistry::refresh
#[derive(Debug)]
pub struct VoiceRegistry {
    filter: VoiceFilter,
    catalog: Option<watch::Receiver<Vec<VoiceProfile>>>,
    voices: Vec<VoiceProfile>,
    selected: Option<VoiceProfile>,
}

impl VoiceRegistry {
    pub fn new(filter: VoiceFilter) -> Self {
        Self {
            filter,
            catalog: None,
            voices: Vec::new(),
            selected: None,
        }
    }

    /// Subscribe to `engine`'s catalog and load the current voices.
    pub fn start(&mut self, engine: &dyn NarrationEngine) {
        let mut catalog = engine.voices();
        let current = catalog.borrow_and_update().clone();
        self.catalog = Some(catalog);
        self.apply(&current);
    }

    /// Re-filter if the catalog changed since the last look.
    ///
    /// Returns whether the voice list was reloaded.
    pub fn refresh(&mut self) -> bool {
        let Some(catalog) = self.catalog.as_mut() else {
            return false;
        };
        // A closed catalog keeps the last known voices.
        if !catalog.has_changed().unwrap_or(false) {
            return false;
        }
        let current = catalog.borrow_and_update().clone();
        self.apply(&current);
        true
    }

    /// Drop the catalog subscription. The current list is kept.
    pub fn stop(&mut self) {
        if self.catalog.take().is_some() {
            debug!("Voice catalog subscription dropped");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn voices(&self) -> &[VoiceProfile] {
        &self.voices
    }

    pub fn selected(&self) -> Option<&VoiceProfile> {
        self.selected.as_ref()
    }

    /// Select a listed voice by name.
    pub fn select(&mut self, name: &str) -> bool {
        match self.voices.iter().find(|v| v.name == name) {
            Some(voice) => {
                self.selected = Some(voice.clone());
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, catalog: &[VoiceProfile]) {
        self.voices = self.filter.select(catalog);

        let still_listed = self
            .selected
            .as_ref()
            .is_some_and(|selected| self.voices.contains(selected));
        if !still_listed {
            self.selected = self.voices.first().cloned();
        }

        info!(
            catalog = catalog.len(),
            offered = self.voices.len(),
            selected = self.selected.as_ref().map(|v| v.name.as_str()),
            "Voice list updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audioleaf_core::NarrationRequest;

    struct CatalogEngine {
        catalog: watch::Sender<Vec<VoiceProfile>>,
    }

    impl NarrationEngine for CatalogEngine {
        fn speak(&self, _request: NarrationRequest) {}
        fn pause(&self) {}
        fn resume(&self) {}
        fn cancel(&self) {}
        fn is_paused(&self) -> bool {
            false
        }
        fn voices(&self) -> watch::Receiver<Vec<VoiceProfile>> {
            self.catalog.subscribe()
        }
    }

    fn engine(voices: Vec<VoiceProfile>) -> CatalogEngine {
        let (catalog, _) = watch::channel(voices);
        CatalogEngine { catalog }
    }

    #[test]
    fn test_start_filters_and_selects_first() {
        let engine = engine(vec![
            VoiceProfile::new("Samantha", "en-US"),
            VoiceProfile::new("Lekha", "hi-IN"),
            VoiceProfile::new("Google हिंदी", "hi-IN"),
        ]);
        let mut registry = VoiceRegistry::new(VoiceFilter::default());
        registry.start(&engine);

        assert!(registry.is_subscribed());
        assert_eq!(registry.voices().len(), 2);
        assert_eq!(registry.selected().map(|v| v.name.as_str()), Some("Lekha"));
        assert!(!registry.refresh());
    }

    #[test]
    fn test_refresh_replaces_vanished_selection() {
        let engine = engine(vec![
            VoiceProfile::new("Lekha", "hi-IN"),
            VoiceProfile::new("Rishi India", "en-IN"),
        ]);
        let mut registry = VoiceRegistry::new(VoiceFilter::default());
        registry.start(&engine);
        assert!(registry.select("Rishi India"));
        assert!(!registry.select("Samantha"));

        engine
            .catalog
            .send_replace(vec![VoiceProfile::new("Kalpana", "hi-IN")]);
        assert!(registry.refresh());
        assert_eq!(registry.selected().map(|v| v.name.as_str()), Some("Kalpana"));
    }

    #[test]
    fn test_refresh_keeps_listed_selection() {
        let engine = engine(vec![
            VoiceProfile::new("Lekha", "hi-IN"),
            VoiceProfile::new("Rishi India", "en-IN"),
        ]);
        let mut registry = VoiceRegistry::new(VoiceFilter::default());
        registry.start(&engine);
        registry.select("Rishi India");

        engine.catalog.send_modify(|voices| {
            voices.push(VoiceProfile::new("Neel", "hi-IN"));
        });
        assert!(registry.refresh());
        assert_eq!(registry.voices().len(), 3);
        assert_eq!(registry.selected().map(|v| v.name.as_str()), Some("Rishi India"));
    }

    #[test]
    fn test_stop_unsubscribes() {
        let engine = engine(vec![VoiceProfile::new("Lekha", "hi-IN")]);
        let mut registry = VoiceRegistry::new(VoiceFilter::default());
        registry.start(&engine);
        registry.stop();

        engine.catalog.send_replace(Vec::new());
        assert!(!registry.refresh());
        assert!(!registry.is_subscribed());
        assert_eq!(registry.voices().len(), 1);
        assert_eq!(engine.catalog.receiver_count(), 0);
    }
}
