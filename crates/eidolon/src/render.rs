#![forbid(unsafe_code)]

//! The rendering surface: plan, materialize, assemble `<img>` attributes.
//!
//! Error policy: configuration and source-resolution problems fail loudly;
//! generation-path problems degrade to "serve the original image, no
//! responsive hints". A broken variant pipeline must never break page
//! rendering.

use std::{fmt, sync::Arc};

use eidolon_cache::{CacheCoordinator, Resizer};
use eidolon_core::SourceImage;
use eidolon_plan::{ConfigTable, PlanOverrides, plan_variants, resolve};
use eidolon_store::{BlobStore, StateCache};
use tracing::warn;

use crate::{
    FitWidthResizer, RenderError,
    source::{ImageSource, SourceProvider},
    svg::svg_dimensions,
};

/// One `srcset` entry: variant URL and its intrinsic width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SrcsetEntry {
    pub url: String,
    pub width: u32,
}

impl fmt::Display for SrcsetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}w", self.url, self.width)
    }
}

/// Everything an `<img>` tag needs.
///
/// The degraded form — feature disabled, vector source, or a failed
/// pipeline — carries `src`/`width`/`height` only, with empty `srcset` and
/// `sizes`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    pub src: String,
    /// Variant entries, widest first. Empty in degraded output.
    pub srcset: Vec<SrcsetEntry>,
    /// `sizes` hints, breakpoint-ascending with the default entry last.
    pub sizes: Vec<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Set for vector sources; `html_attrs` then adds `role="img"`.
    pub vector: bool,
}

impl RenderedImage {
    /// `srcset` attribute value: entries joined with `", "`.
    #[must_use]
    pub fn srcset_attr(&self) -> String {
        self.srcset
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `sizes` attribute value.
    #[must_use]
    pub fn sizes_attr(&self) -> String {
        self.sizes.join(", ")
    }

    /// Full attribute string for direct template interpolation.
    #[must_use]
    pub fn html_attrs(&self) -> String {
        let mut attrs = vec![format!("src=\"{}\"", self.src)];
        if self.vector {
            attrs.push("role=\"img\"".to_string());
        }
        if !self.srcset.is_empty() {
            attrs.push(format!("srcset=\"{}\"", self.srcset_attr()));
        }
        if !self.sizes.is_empty() {
            attrs.push(format!("sizes=\"{}\"", self.sizes_attr()));
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            attrs.push(format!("width=\"{width}\""));
            attrs.push(format!("height=\"{height}\""));
        }
        attrs.join(" ")
    }
}

/// The facade service: configuration table, source provider and cache
/// coordinator behind one render call.
pub struct Srcset {
    configs: ConfigTable,
    provider: Arc<dyn SourceProvider>,
    coordinator: CacheCoordinator,
    enabled: bool,
}

impl Srcset {
    #[must_use]
    pub fn builder() -> SrcsetBuilder {
        SrcsetBuilder::new()
    }

    /// Plan and materialize variants for an image, returning the attribute
    /// set for an `<img>` tag.
    ///
    /// Vector sources divert to the SVG path. When the feature is disabled
    /// or the pipeline degrades, the original image is served without
    /// responsive hints; only a missing source is an error.
    pub async fn plan_and_render(
        &self,
        source: impl Into<ImageSource>,
        overrides: &PlanOverrides,
    ) -> Result<RenderedImage, RenderError> {
        let source = self.resolve(source.into()).await?;
        if source.kind.is_vector() {
            return Ok(vector_output(&source));
        }
        if !self.enabled {
            return Ok(source_only(&source));
        }
        let Some((source_width, _)) = source.dimensions() else {
            return Err(RenderError::MissingSource(format!(
                "{}: missing dimensions",
                source.name
            )));
        };

        let config = resolve(&self.configs, overrides);
        let plan = plan_variants(source_width, &config);
        let results = self.coordinator.materialize(&plan, &source, &config).await;

        // A variant vanishing mid-call means the collector is ahead of us;
        // the whole call degrades rather than serving a half-coherent set.
        if results
            .iter()
            .any(|r| matches!(r, Err(e) if e.is_race()))
        {
            warn!(source = %source.name, "variant vanished mid-render; serving original");
            return Ok(source_only(&source));
        }

        let mut results = results.into_iter();
        let base = match results.next() {
            Some(Ok(handle)) => handle,
            Some(Err(e)) => {
                warn!(source = %source.name, error = %e, "base variant failed; serving original");
                return Ok(source_only(&source));
            }
            None => return Ok(source_only(&source)),
        };

        let mut srcset = vec![SrcsetEntry {
            url: base.url.clone(),
            width: base.width,
        }];
        for result in results {
            match result {
                Ok(handle) => srcset.push(SrcsetEntry {
                    url: handle.url,
                    width: handle.width,
                }),
                // Scoped failure: drop the width, keep the partial plan.
                Err(e) => warn!(source = %source.name, error = %e, "dropping failed variant"),
            }
        }

        Ok(RenderedImage {
            src: base.url,
            srcset,
            sizes: plan.sizes,
            width: Some(base.width),
            height: Some(base.height),
            vector: false,
        })
    }

    /// The render path used when the feature is globally off: original
    /// image only, no planning, no generation.
    pub async fn plan_and_render_disabled(
        &self,
        source: impl Into<ImageSource>,
    ) -> Result<RenderedImage, RenderError> {
        let source = self.resolve(source.into()).await?;
        if source.kind.is_vector() {
            return Ok(vector_output(&source));
        }
        Ok(source_only(&source))
    }

    /// Render a vector source: `src` plus dimensions read from the XML
    /// `width`/`height` attributes or the `viewBox`.
    pub async fn svg_render(
        &self,
        source: impl Into<ImageSource>,
    ) -> Result<RenderedImage, RenderError> {
        let source = self.resolve(source.into()).await?;
        Ok(vector_output(&source))
    }

    async fn resolve(&self, source: ImageSource) -> Result<SourceImage, RenderError> {
        match source {
            ImageSource::Handle(image) => Ok(image),
            ImageSource::Reference(reference) => self.provider.resolve(&reference).await,
        }
    }
}

fn source_only(source: &SourceImage) -> RenderedImage {
    RenderedImage {
        src: source.url.clone(),
        srcset: Vec::new(),
        sizes: Vec::new(),
        width: source.width,
        height: source.height,
        vector: false,
    }
}

fn vector_output(source: &SourceImage) -> RenderedImage {
    let (probed_width, probed_height) = if source.width.is_none() || source.height.is_none() {
        svg_dimensions(&source.data)
    } else {
        (None, None)
    };
    RenderedImage {
        src: source.url.clone(),
        srcset: Vec::new(),
        sizes: Vec::new(),
        width: source.width.or(probed_width),
        height: source.height.or(probed_height),
        vector: true,
    }
}

/// Constructor for [`Srcset`].
///
/// Configuration table, resizer, URL base and the enabled flag have
/// defaults; provider, blob store and state cache must be supplied.
pub struct SrcsetBuilder {
    configs: ConfigTable,
    provider: Option<Arc<dyn SourceProvider>>,
    blobs: Option<Arc<dyn BlobStore>>,
    state: Option<Arc<dyn StateCache>>,
    resizer: Arc<dyn Resizer>,
    url_base: String,
    enabled: bool,
}

impl SrcsetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            configs: ConfigTable::default(),
            provider: None,
            blobs: None,
            state: None,
            resizer: Arc::new(FitWidthResizer::new()),
            url_base: "/cache".to_string(),
            enabled: true,
        }
    }

    /// Replace the stock configuration table.
    #[must_use]
    pub fn configs(mut self, configs: ConfigTable) -> Self {
        self.configs = configs;
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn SourceProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Blob store holding the variant cache tree.
    #[must_use]
    pub fn blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    #[must_use]
    pub fn state(mut self, state: Arc<dyn StateCache>) -> Self {
        self.state = Some(state);
        self
    }

    /// Replace the default [`FitWidthResizer`].
    #[must_use]
    pub fn resizer(mut self, resizer: Arc<dyn Resizer>) -> Self {
        self.resizer = resizer;
        self
    }

    /// Public URL prefix variants are served under. Default `/cache`.
    #[must_use]
    pub fn url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    /// Turn variant generation off globally; renders degrade to the
    /// original image. Default on.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Build the service.
    ///
    /// # Panics
    /// Panics if provider, blobs or state were not supplied.
    #[must_use]
    pub fn build(self) -> Srcset {
        let provider = self.provider.expect("provider is required for Srcset");
        let blobs = self.blobs.expect("blobs store is required for Srcset");
        let state = self.state.expect("state cache is required for Srcset");

        Srcset {
            configs: self.configs,
            provider,
            coordinator: CacheCoordinator::new(blobs, state, self.resizer, self.url_base),
            enabled: self.enabled,
        }
    }
}

impl Default for SrcsetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
