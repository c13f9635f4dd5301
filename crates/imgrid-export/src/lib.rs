//! imgrid-export: Pure HTML/CSS markup builders (sans-IO)
//!
//! Turns resolved tiles into notebook-ready markup: image grids with
//! click-to-zoom, radio-button class tabs, and a collapsible source
//! viewer. Element ids come from an [`IdGenerator`] so output can be made
//! deterministic.

pub mod html;
pub mod ids;

pub use html::{
    GridStyle, Tab, Tile, TileImage, grid_html, grid_style, html_escape, html_viewer,
    standalone_document, tabs_html, tile_html,
};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
