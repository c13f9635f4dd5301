//! Display settings shared by every widget.

use imgrid_export::GridStyle;
use imgrid_pipeline::ResizeFilter;
use serde::{Deserialize, Serialize};

/// Settings for [`Renderer`](crate::Renderer).
///
/// Missing fields take their defaults when deserializing, so a partial
/// JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Tile width in CSS pixels. Also the target width when
    /// `resize_image` is set.
    pub img_width: u32,

    /// Scale applied to a tile when clicked. Values between 1.0 and 5.0
    /// work best.
    pub zoom_scale: f64,

    /// Show the path or URL under each path-based image.
    pub show_url: bool,

    /// Embed path-based images as base64 instead of linking them.
    ///
    /// Needed where the notebook front-end cannot reach local files
    /// (e.g. Colab). HTTP(S) URLs are still linked.
    pub force_b64: bool,

    /// Downscale embedded images to `img_width` before encoding.
    /// Linked images are never resized.
    pub resize_image: bool,

    /// Resampling filter for `resize_image`.
    pub resize_filter: ResizeFilter,

    /// Display a collapsible view of the generated HTML before each
    /// widget.
    pub show_html_viewer: bool,

    /// Most tiles rendered by the grid widget.
    pub max_images: usize,

    /// Most tiles rendered in each tab of the tabs widget.
    pub max_imgs_per_tab: usize,
}

impl PlotConfig {
    /// Default for [`img_width`](Self::img_width).
    pub const DEFAULT_IMG_WIDTH: u32 = 150;
    /// Default for [`zoom_scale`](Self::zoom_scale).
    pub const DEFAULT_ZOOM_SCALE: f64 = 2.5;
    /// Default for [`show_url`](Self::show_url).
    pub const DEFAULT_SHOW_URL: bool = true;
    /// Default for [`force_b64`](Self::force_b64).
    pub const DEFAULT_FORCE_B64: bool = false;
    /// Default for [`resize_image`](Self::resize_image).
    pub const DEFAULT_RESIZE_IMAGE: bool = false;
    /// Default for [`resize_filter`](Self::resize_filter).
    pub const DEFAULT_RESIZE_FILTER: ResizeFilter = ResizeFilter::CatmullRom;
    /// Default for [`show_html_viewer`](Self::show_html_viewer).
    pub const DEFAULT_SHOW_HTML_VIEWER: bool = true;
    /// Default for [`max_images`](Self::max_images).
    pub const DEFAULT_MAX_IMAGES: usize = 30;
    /// Default for [`max_imgs_per_tab`](Self::max_imgs_per_tab).
    pub const DEFAULT_MAX_IMGS_PER_TAB: usize = 30;

    /// Size and zoom settings for the markup layer.
    #[must_use]
    pub const fn grid_style(&self) -> GridStyle {
        GridStyle {
            img_width: self.img_width,
            zoom_scale: self.zoom_scale,
        }
    }

    /// Target width for embedded images, if resizing is enabled.
    #[must_use]
    pub const fn target_width(&self) -> Option<u32> {
        if self.resize_image {
            Some(self.img_width)
        } else {
            None
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            img_width: Self::DEFAULT_IMG_WIDTH,
            zoom_scale: Self::DEFAULT_ZOOM_SCALE,
            show_url: Self::DEFAULT_SHOW_URL,
            force_b64: Self::DEFAULT_FORCE_B64,
            resize_image: Self::DEFAULT_RESIZE_IMAGE,
            resize_filter: Self::DEFAULT_RESIZE_FILTER,
            show_html_viewer: Self::DEFAULT_SHOW_HTML_VIEWER,
            max_images: Self::DEFAULT_MAX_IMAGES,
            max_imgs_per_tab: Self::DEFAULT_MAX_IMGS_PER_TAB,
        }
    }
}
