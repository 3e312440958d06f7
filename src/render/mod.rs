// Render Module - The Accessible Rendering Pipeline
//
// normalize → cache key → lookup
//   hit:  return the stored bundle, record a hit
//   miss: score + convert the original fragment outside the cache lock,
//         store the bundle, record a miss
//
// The renderer owns its cache; hosts construct one renderer at startup and
// share it (it is `Send + Sync`) across request handlers.

use crate::alix::{ComplexityScore, WeightTable, count_elements, score};
use crate::cache::{CacheStats, RecencyCache, ScoringConfiguration, cache_key};
use crate::common::Config;
use crate::linear::{LinearText, to_linear_text};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// How the host presents the expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Inline with surrounding text
    #[default]
    Inline,
    /// Set apart as a block (figure)
    Block,
}

/// Which renderings the host should include, derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub show_image: bool,
    pub show_text: bool,
}

impl Presentation {
    /// Apply the configured thresholds to a score.
    ///
    /// The image is suppressed when the score is above
    /// `suppress_image_above`; the text is suppressed when the score is
    /// below `suppress_text_below`. Missing thresholds suppress nothing.
    pub fn decide(complexity: ComplexityScore, scoring: &ScoringConfiguration) -> Self {
        let show_image = !matches!(scoring.suppress_image_above(), Some(limit) if complexity > limit);
        let show_text = !matches!(scoring.suppress_text_below(), Some(limit) if complexity < limit);
        Self {
            show_image,
            show_text,
        }
    }
}

/// Cached result of rendering one fragment under one scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub linear_text: LinearText,
    pub complexity: ComplexityScore,
    /// Whether a linear form was produced
    pub success: bool,
    /// The fragment as first received
    pub fragment: String,
    pub presentation: Presentation,
}

/// One rendering request
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub fragment: &'a str,
    pub scoring: &'a ScoringConfiguration,
    pub display: DisplayMode,
    /// Spoken-language variant, passed through to the host's templates
    pub language: &'a str,
}

impl<'a> RenderRequest<'a> {
    /// Use different scoring thresholds
    pub fn with_scoring(mut self, scoring: &'a ScoringConfiguration) -> Self {
        self.scoring = scoring;
        self
    }

    /// Use a different display mode
    pub fn with_display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }

    /// Use a different spoken-language variant
    pub fn with_language(mut self, language: &'a str) -> Self {
        self.language = language;
        self
    }
}

/// Result of a render call: the shared bundle plus the request's
/// pass-through presentation fields
#[derive(Debug, Clone)]
pub struct Rendering {
    pub bundle: Arc<ResultBundle>,
    pub display: DisplayMode,
    pub language: String,
    /// Whether the bundle came from the cache
    pub cached: bool,
}

impl Rendering {
    /// The linear form, or `""` when none is available
    #[inline]
    pub fn linear_text(&self) -> &str {
        self.bundle.linear_text.as_str()
    }

    #[inline]
    pub fn complexity(&self) -> ComplexityScore {
        self.bundle.complexity
    }
}

/// The rendering pipeline with its recency cache
///
/// # Example
/// ```
/// use mathalt::render::MathRenderer;
///
/// let renderer = MathRenderer::new(100);
/// let first = renderer.render_fragment("<msup><mi>x</mi><mn>2</mn></msup>");
/// assert_eq!(first.linear_text(), "x^2");
/// assert!(!first.cached);
///
/// let again = renderer.render_fragment("<msup>\n  <mi>x</mi>\n  <mn>2</mn>\n</msup>");
/// assert!(again.cached);
/// assert_eq!(renderer.stats().hit_rate, 0.5);
/// ```
#[derive(Debug)]
pub struct MathRenderer {
    cache: RecencyCache<Arc<ResultBundle>>,
    weights: WeightTable,
    defaults: Config,
}

impl MathRenderer {
    /// Create a renderer with default settings and the given cache capacity
    pub fn new(cache_capacity: usize) -> Self {
        Self::from_config(Config::default().with_cache_capacity(cache_capacity))
    }

    /// Create a renderer from configuration
    pub fn from_config(config: Config) -> Self {
        info!(
            cache_capacity = config.cache_capacity,
            language = %config.language,
            "math renderer ready"
        );
        Self {
            cache: RecencyCache::new(config.cache_capacity),
            weights: WeightTable::standard(),
            defaults: config,
        }
    }

    /// The configuration this renderer was built with
    #[inline]
    pub fn config(&self) -> &Config {
        &self.defaults
    }

    /// Start a request for `fragment` with the configured defaults
    pub fn request<'a>(&'a self, fragment: &'a str) -> RenderRequest<'a> {
        RenderRequest {
            fragment,
            scoring: &self.defaults.scoring,
            display: self.defaults.display,
            language: &self.defaults.language,
        }
    }

    /// Render `fragment` with the configured defaults
    pub fn render_fragment(&self, fragment: &str) -> Rendering {
        self.render(&self.request(fragment))
    }

    /// Render a request, serving it from the cache when possible
    pub fn render(&self, request: &RenderRequest<'_>) -> Rendering {
        let key = cache_key(request.fragment, request.scoring);
        let (bundle, cached) = self.cache.get_or_insert_with(&key, || {
            Arc::new(self.compute(request.fragment, request.scoring))
        });

        debug!(
            cached,
            complexity = bundle.complexity,
            success = bundle.success,
            "rendered fragment"
        );

        Rendering {
            bundle,
            display: request.display,
            language: request.language.to_string(),
            cached,
        }
    }

    fn compute(&self, fragment: &str, scoring: &ScoringConfiguration) -> ResultBundle {
        let complexity = score(&count_elements(fragment), &self.weights);
        let linear_text = to_linear_text(fragment);
        let success = linear_text.is_available();
        if !success {
            debug!(complexity, "fragment has no linear form");
        }

        ResultBundle {
            linear_text,
            complexity,
            success,
            fragment: fragment.to_string(),
            presentation: Presentation::decide(complexity, scoring),
        }
    }

    /// Cache occupancy and hit statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached bundle and reset the statistics
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("render cache cleared");
    }
}

impl Default for MathRenderer {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}
