use std::sync::Arc;

use crate::error::SliderError;
use crate::navigation::NavigationState;
use crate::slide::{SlideDataSource, SlideRepository};
use crate::template::TemplateRegistry;

use super::coordinator::SliderCoordinator;
use super::options::SliderOptions;

/// Builder wiring a [`SliderCoordinator`] from its collaborators.
///
/// A data source (or a ready-made repository) is required. Navigation state
/// and the template registry are created from the options when not given.
///
/// ```rust,no_run
/// use slide_carousel::{HttpSlideSource, SliderBuilder, DEFAULT_API_PATH, DEFAULT_DATA_PATH};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = HttpSlideSource::new("http://127.0.0.1:3000", DEFAULT_DATA_PATH, DEFAULT_API_PATH)?;
/// let slider = SliderBuilder::new().source(source).build()?;
/// # let _ = slider;
/// # Ok(())
/// # }
/// ```
pub struct SliderBuilder<S: SlideDataSource> {
    source: Option<S>,
    repository: Option<Arc<SlideRepository<S>>>,
    navigation: Option<NavigationState>,
    templates: Option<Arc<TemplateRegistry>>,
    options: SliderOptions,
}

impl<S: SlideDataSource + 'static> SliderBuilder<S> {
    pub fn new() -> Self {
        Self {
            source: None,
            repository: None,
            navigation: None,
            templates: None,
            options: SliderOptions::default(),
        }
    }

    /// Data source for a new repository sized by `options.cache_capacity`.
    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    /// Use an existing repository. Takes precedence over [`source`](Self::source).
    pub fn repository(mut self, repository: Arc<SlideRepository<S>>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn navigation(mut self, navigation: NavigationState) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn templates(mut self, templates: Arc<TemplateRegistry>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn options(mut self, options: SliderOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the coordinator.
    ///
    /// Fails with [`SliderError::DependencyUnavailable`] when neither a
    /// repository nor a data source was supplied.
    pub fn build(self) -> Result<SliderCoordinator<S>, SliderError> {
        let options = self.options;

        let repository = match (self.repository, self.source) {
            (Some(repository), _) => repository,
            (None, Some(source)) => Arc::new(SlideRepository::with_capacity(
                source,
                options.cache_capacity,
            )),
            (None, None) => return Err(SliderError::DependencyUnavailable("SlideDataSource")),
        };

        let navigation = self
            .navigation
            .unwrap_or_else(|| NavigationState::with_queue_options(options.queue.clone()));
        let templates = self.templates.unwrap_or_default();

        Ok(SliderCoordinator::new(repository, navigation, templates, options))
    }
}

impl<S: SlideDataSource + 'static> Default for SliderBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
