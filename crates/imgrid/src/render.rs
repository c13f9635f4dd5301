//! Widget rendering: image collections in, HTML out.
//!
//! [`Renderer`] ties the pieces together: images are resolved to tile
//! sources (linked or base64-embedded), labels and texts are attached,
//! and the markup layer assembles the widget. The `*_html` methods
//! return markup; the `plot_*` methods hand it to a [`DisplaySink`].

use imgrid_export::{IdGenerator, RandomIds, Tab, Tile, TileImage, grid_html, html_viewer, tabs_html};
use imgrid_io::{DisplaySink, FsLoader, paths};
use imgrid_pipeline::{
    Encoder, ImageBatch, ImageLoader, ImageRef, Label, LabeledCollection, PipelineError,
    ensure_same_len,
};

use crate::config::PlotConfig;
use crate::error::RenderError;

/// Renders image grids, class tabs and class representatives.
pub struct Renderer {
    config: PlotConfig,
    loader: Box<dyn ImageLoader>,
    ids: Box<dyn IdGenerator>,
}

impl Renderer {
    /// Renderer reading images from disk with random element ids.
    #[must_use]
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            loader: Box::new(FsLoader::default()),
            ids: Box::new(RandomIds),
        }
    }

    /// Resolve path images through `loader` instead of the filesystem.
    #[must_use]
    pub fn with_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Mint element ids from `ids`, e.g. [`SequentialIds`](imgrid_export::SequentialIds)
    /// for reproducible output.
    #[must_use]
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// The active settings.
    #[must_use]
    pub const fn config(&self) -> &PlotConfig {
        &self.config
    }

    // ---- HTML ----

    /// Grid of up to `max_images` images.
    ///
    /// `labels` default to the positions `0..n`. `custom_texts`, when
    /// given, add a second heading to each tile.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LengthMismatch`] if `labels` or
    /// `custom_texts` differ in length from `images`, or any error from
    /// embedding an image.
    pub fn images_html(
        &mut self,
        images: &ImageBatch,
        labels: Option<&[Label]>,
        custom_texts: Option<&[String]>,
    ) -> Result<String, RenderError> {
        if let Some(labels) = labels {
            ensure_same_len("labels", images.len(), labels.len())?;
        }
        if let Some(texts) = custom_texts {
            ensure_same_len("custom texts", images.len(), texts.len())?;
        }
        tracing::debug!(
            kind = %images.kind(),
            count = images.len(),
            shown = images.len().min(self.config.max_images),
            "rendering image grid"
        );

        let tiles = self.tiles(
            images.items(),
            |i| labels.map_or_else(|| Label::from(i), |labels| labels[i].clone()),
            custom_texts,
            self.config.max_images,
        )?;
        Ok(grid_html(&tiles, &self.config.grid_style(), &mut *self.ids))
    }

    /// One tab per label, each holding up to `max_imgs_per_tab` of that
    /// label's images captioned by their position in the tab.
    ///
    /// Tabs follow `tabs_order` when given (which also filters the
    /// tabs), otherwise ascending label order. A listed label without
    /// images gets an empty tab.
    ///
    /// # Errors
    ///
    /// Returns any error from embedding an image.
    pub fn class_tabs_html(
        &mut self,
        collection: &LabeledCollection<ImageRef>,
        tabs_order: Option<&[Label]>,
    ) -> Result<String, RenderError> {
        let tab_labels = collection.tab_labels(tabs_order);
        tracing::debug!(
            count = collection.len(),
            tabs = tab_labels.len(),
            "rendering class tabs"
        );

        let mut tabs = Vec::with_capacity(tab_labels.len());
        for label in tab_labels {
            let members = collection.items_with_label(&label);
            let tiles = self.tiles(
                members.items(),
                Label::from,
                members.texts(),
                self.config.max_imgs_per_tab,
            )?;
            tabs.push(Tab {
                label: label.to_string(),
                tiles,
            });
        }
        Ok(tabs_html(&tabs, &self.config.grid_style(), &mut *self.ids))
    }

    /// Grid of one representative image per label.
    ///
    /// See [`LabeledCollection::representatives`] for how `ignore_labels`
    /// and `labels_order` select and order the result. Every
    /// representative is shown regardless of `max_images`.
    ///
    /// # Errors
    ///
    /// Returns any error from embedding an image.
    pub fn class_representations_html(
        &mut self,
        collection: &LabeledCollection<ImageRef>,
        ignore_labels: Option<&[Label]>,
        labels_order: Option<&[Label]>,
    ) -> Result<String, RenderError> {
        let chosen = collection.representatives(ignore_labels, labels_order);
        let tiles = self.tiles(
            chosen.items(),
            |i| chosen.labels()[i].clone(),
            chosen.texts(),
            chosen.len(),
        )?;
        Ok(grid_html(&tiles, &self.config.grid_style(), &mut *self.ids))
    }

    // ---- Display ----

    /// Render [`images_html`](Self::images_html) and display it.
    ///
    /// # Errors
    ///
    /// Returns rendering errors, or [`RenderError::Display`] if the sink
    /// fails.
    pub fn plot_images(
        &mut self,
        sink: &mut dyn DisplaySink,
        images: &ImageBatch,
        labels: Option<&[Label]>,
        custom_texts: Option<&[String]>,
    ) -> Result<(), RenderError> {
        let html = self.images_html(images, labels, custom_texts)?;
        self.display(sink, &html)
    }

    /// Render [`class_tabs_html`](Self::class_tabs_html) and display it.
    ///
    /// # Errors
    ///
    /// Returns rendering errors, or [`RenderError::Display`] if the sink
    /// fails.
    pub fn plot_class_tabs(
        &mut self,
        sink: &mut dyn DisplaySink,
        collection: &LabeledCollection<ImageRef>,
        tabs_order: Option<&[Label]>,
    ) -> Result<(), RenderError> {
        let html = self.class_tabs_html(collection, tabs_order)?;
        self.display(sink, &html)
    }

    /// Render [`class_representations_html`](Self::class_representations_html)
    /// and display it.
    ///
    /// # Errors
    ///
    /// Returns rendering errors, or [`RenderError::Display`] if the sink
    /// fails.
    pub fn plot_class_representations(
        &mut self,
        sink: &mut dyn DisplaySink,
        collection: &LabeledCollection<ImageRef>,
        ignore_labels: Option<&[Label]>,
        labels_order: Option<&[Label]>,
    ) -> Result<(), RenderError> {
        let html = self.class_representations_html(collection, ignore_labels, labels_order)?;
        self.display(sink, &html)
    }

    /// Show the source viewer (when enabled), then the widget.
    fn display(&mut self, sink: &mut dyn DisplaySink, html: &str) -> Result<(), RenderError> {
        if self.config.show_html_viewer {
            sink.display_html(&html_viewer(html, &mut *self.ids))?;
        }
        sink.display_html(html)?;
        Ok(())
    }

    // ---- Tiles ----

    /// Build tiles for the first `limit` of `items`.
    fn tiles(
        &self,
        items: &[ImageRef],
        label_at: impl Fn(usize) -> Label,
        texts: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<Tile>, PipelineError> {
        let encoder = Encoder::new(&*self.loader).with_filter(self.config.resize_filter);
        items
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, image)| {
                let (image, caption) = self.tile_image(&encoder, image)?;
                Ok(Tile {
                    label: label_at(i).to_string(),
                    custom_text: texts.map(|texts| texts[i].clone()),
                    caption,
                    image,
                })
            })
            .collect()
    }

    /// Decide how one image is shown, plus its URL caption.
    ///
    /// Path strings are linked unless `force_b64` is set; local paths are
    /// rewritten relative to the working directory. HTTP(S) URLs are
    /// always linked. Everything else is embedded as base64 PNG.
    fn tile_image(
        &self,
        encoder: &Encoder<'_>,
        image: &ImageRef,
    ) -> Result<(TileImage, Option<String>), PipelineError> {
        let mut caption = None;
        if let ImageRef::Path(location) = image {
            let location = paths::relative_to_cwd(location);
            if self.config.show_url {
                caption = Some(location.clone());
            }
            if !self.config.force_b64 {
                return Ok((TileImage::Url(location), caption));
            }
            if paths::is_http(&location) {
                tracing::warn!(
                    url = %location,
                    "force_b64 cannot embed remote URLs; linking the URL instead"
                );
                return Ok((TileImage::Url(location), caption));
            }
        }
        let b64 = encoder.encode(image, self.config.target_width())?;
        Ok((TileImage::Base64Png(b64), caption))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(PlotConfig::default())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
