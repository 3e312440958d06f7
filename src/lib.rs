//! Mathalt - Accessible alternatives for MathML expressions
//!
//! This library turns MathML fragments into the material a host needs to
//! present an expression accessibly: a structural complexity score and a
//! linear text form, cached per canonical fragment.
//!
//! # Features
//!
//! - **Normalization**: Canonical key form that ignores whitespace layout,
//!   the legacy `m:` prefix, and namespace declaration placement
//! - **ALIX scoring**: Weighted tag counts over a closed MathML tag set
//! - **Linear text**: ASCII-math style rendering of common shapes
//!   (`x^2`, `1/2`, `sqrt(a+b)`)
//! - **Recency cache**: Bounded, thread-safe LRU of result bundles with
//!   hit/miss statistics
//!
//! # Example - Rendering a fragment
//!
//! ```
//! use mathalt::MathRenderer;
//!
//! let renderer = MathRenderer::new(1000);
//! let rendering = renderer.render_fragment(
//!     "<math><mfrac><mn>1</mn><mn>2</mn></mfrac></math>",
//! );
//!
//! assert_eq!(rendering.linear_text(), "1/2");
//! assert!((rendering.complexity() - 22.0).abs() < 1e-9);
//! ```
//!
//! # Example - Scoring thresholds
//!
//! ```
//! use mathalt::{MathRenderer, ScoringConfiguration};
//! use mathalt::cache::SUPPRESS_IMAGE_ABOVE;
//!
//! let renderer = MathRenderer::default();
//! let strict = ScoringConfiguration::new().with(SUPPRESS_IMAGE_ABOVE, 10.0);
//! let fragment = "<mfrac><mi>a</mi><mi>b</mi></mfrac>";
//!
//! let rendering = renderer.render(&renderer.request(fragment).with_scoring(&strict));
//! assert!(!rendering.bundle.presentation.show_image);
//! ```
//!
//! # Example - Using the pieces directly
//!
//! ```
//! use mathalt::{alix, linear, mathml};
//!
//! let fragment = "<m:msup><m:mi>x</m:mi><m:mn>2</m:mn></m:msup>";
//! assert_eq!(
//!     mathml::normalize(fragment),
//!     r#"<msup xmlns="http://www.w3.org/1998/Math/MathML"><mi>x</mi><mn>2</mn></msup>"#,
//! );
//! assert!((alix::complexity(fragment) - 19.0).abs() < 1e-9);
//! assert_eq!(linear::to_linear_text(fragment).as_str(), "x^2");
//! ```

/// ALIX complexity scoring
pub mod alix;
/// Recency cache and cache keys
pub mod cache;
/// Common types: errors and configuration
pub mod common;
/// Linear text conversion
pub mod linear;
/// MathML normalization, parsing and lookup tables
pub mod mathml;
/// The rendering pipeline
pub mod render;

pub use alix::{ComplexityScore, ElementCountTable, WeightTable};
pub use cache::{CacheStats, RecencyCache, ScoringConfiguration};
pub use common::{Config, Error, Result};
pub use linear::LinearText;
pub use render::{DisplayMode, MathRenderer, Presentation, RenderRequest, Rendering, ResultBundle};
