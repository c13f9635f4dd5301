//! HTML/CSS markup for image grids, class tabs and the source viewer.
//!
//! All widgets are pure CSS: tabs are hidden radio buttons with
//! `:checked` sibling selectors, and click-to-zoom uses the `:target`
//! pseudo-class on each tile. No script runs, so the output displays in
//! notebook front-ends that sanitize JavaScript.
//!
//! Every style block is scoped with an id from an [`IdGenerator`], and
//! all caller text is escaped before it is embedded.
//!
//! These are pure functions with no I/O -- they return `String`s.

use std::fmt::Write;

use crate::ids::IdGenerator;

/// Where a tile's `<img>` gets its pixels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileImage {
    /// Path or URL used verbatim as the `src` attribute.
    Url(String),
    /// Base64 PNG payload, embedded as a `data:` URI.
    Base64Png(String),
}

impl TileImage {
    /// Value for the `src` attribute (unescaped).
    #[must_use]
    pub fn src(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Base64Png(b64) => format!("data:image/png;base64,{b64}"),
        }
    }
}

/// One image cell of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Heading shown above the image.
    pub label: String,
    /// Optional second heading below the label.
    pub custom_text: Option<String>,
    /// Optional small caption, typically the image path or URL.
    pub caption: Option<String>,
    /// Image source.
    pub image: TileImage,
}

/// One tab of a tab layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Tab button text.
    pub label: String,
    /// Tiles shown when the tab is selected.
    pub tiles: Vec<Tile>,
}

/// Size and zoom settings shared by every tile of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Tile and image width in CSS pixels.
    pub img_width: u32,
    /// Scale applied to a tile when it is clicked.
    pub zoom_scale: f64,
}

/// Escape `&`, `<`, `>`, `"` and `'` for element text and attribute values.
#[must_use]
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Style sheet for one grid, scoped by `style_id`.
#[must_use]
pub fn grid_style(style_id: &str, style: &GridStyle) -> String {
    let id = style_id;
    let width = style.img_width;
    let zoom = style.zoom_scale;
    format!(
        r"
<style>
#imgrid-imgs-container-div-{id} {{
    width: 100%;
    height: 100%;
    margin: 0%;
    overflow: auto;
    position: relative;
    overflow-y: scroll;
}}
div.imgrid-placeholder-div-{id} {{
    width: {width}px;
    display: inline-block;
    margin: 3px;
    position: relative;
}}
div.imgrid-content-div-{id} {{
    width: {width}px;
    background: white;
    display: inline-block;
    vertical-align: top;
    text-align: center;
    position: relative;
    border: 2px solid #ddd;
    top: 0;
    left: 0;
}}
div.imgrid-content-div-{id} span.imgrid-img-close {{
    display: none;
}}
div.imgrid-content-div-{id} span {{
    width: 100%;
    height: 100%;
    position: absolute;
    top: 0;
    left: 0;
}}
div.imgrid-content-div-{id} img {{
    width: {width}px;
}}
div.imgrid-content-div-{id} span.imgrid-img-close:hover {{
    cursor: zoom-out;
}}
div.imgrid-content-div-{id} span.imgrid-img-expand:hover {{
    cursor: zoom-in;
}}
div[id^=imgrid-content-div-{id}]:target {{
    transform: scale({zoom});
    transform-origin: left top;
    z-index: 5000;
    top: 0;
    left: 0;
    position: absolute;
}}
div[id^=imgrid-content-div-{id}]:target span.imgrid-img-close {{
    display: block;
}}
div[id^=imgrid-content-div-{id}]:target span.imgrid-img-expand {{
    display: none;
}}
</style>
"
    )
}

/// Markup for a single tile belonging to the grid styled by `grid_id`.
#[must_use]
pub fn tile_html(tile: &Tile, grid_id: &str, tile_id: &str) -> String {
    let mut body = String::new();
    if let Some(text) = &tile.custom_text {
        let _ = write!(
            body,
            r#"<h4 style="font-size: 12px; word-wrap: break-word;">{}</h4>"#,
            html_escape(text)
        );
    }
    if let Some(caption) = &tile.caption {
        let _ = write!(
            body,
            r#"<h4 style="font-size: 9px; padding-left: 10px; padding-right: 10px; width: 95%; word-wrap: break-word; white-space: normal;">{}</h4>"#,
            html_escape(caption)
        );
    }
    let _ = write!(body, r#"<img src="{}"/>"#, html_escape(&tile.image.src()));

    let label = html_escape(&tile.label);
    format!(
        r##"
<div class="imgrid-placeholder-div-{grid_id}">
    <div id="imgrid-content-div-{grid_id}-{tile_id}" class="imgrid-content-div-{grid_id}">
        <h4 style="font-size: 12px; word-wrap: break-word;">{label}</h4>
        {body}
        <a href="#!">
            <span class="imgrid-img-close"></span>
        </a>
        <a href="#imgrid-content-div-{grid_id}-{tile_id}">
            <span class="imgrid-img-expand"></span>
        </a>
    </div>
</div>
"##
    )
}

/// A grid of `tiles` preceded by its scoped style sheet.
///
/// Callers truncate `tiles` to the number they want shown.
#[must_use]
pub fn grid_html(tiles: &[Tile], style: &GridStyle, ids: &mut dyn IdGenerator) -> String {
    let grid_id = ids.next_id();
    let mut html = grid_style(&grid_id, style);
    let _ = write!(html, r#"<div id="imgrid-imgs-container-div-{grid_id}">"#);
    for tile in tiles {
        let tile_id = ids.next_id();
        html.push_str(&tile_html(tile, &grid_id, &tile_id));
    }
    html.push_str("</div>");
    html
}

/// Radio-button tab layout, one grid per tab. The first tab starts
/// selected.
#[must_use]
pub fn tabs_html(tabs: &[Tab], style: &GridStyle, ids: &mut dyn IdGenerator) -> String {
    let layout_id = ids.next_id();
    let tab_ids: Vec<String> = tabs.iter().map(|_| ids.next_id()).collect();

    let mut html = String::from("<div>");
    html.push_str(&tabs_style(&layout_id, &tab_ids));

    for (i, (tab_id, tab)) in tab_ids.iter().zip(tabs).enumerate() {
        let checked = if i == 0 { " checked " } else { "" };
        let _ = write!(
            html,
            r#"<input class="imgrid-tab-{layout_id}" type="radio" name="tabs-{layout_id}" id="tab{tab_id}"{checked}/>"#
        );
        let _ = write!(
            html,
            r#"<label class="imgrid-tab-label-{layout_id}" for="tab{tab_id}">{}</label>"#,
            html_escape(&tab.label)
        );
    }

    for (tab_id, tab) in tab_ids.iter().zip(tabs) {
        let _ = write!(html, r#"<div class="tab content{tab_id}">"#);
        html.push_str(&grid_html(&tab.tiles, style, ids));
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

/// Style block for a tab layout: hides the radio inputs, styles the
/// labels, and shows only the content div whose radio is checked.
fn tabs_style(layout_id: &str, tab_ids: &[String]) -> String {
    let id = layout_id;
    let mut css = format!(
        r"
<style>
input.imgrid-tab-{id} {{
    display: none;
}}
input.imgrid-tab-{id} + label.imgrid-tab-label-{id} {{
    border: 1px solid #999;
    background: #EEE;
    padding: 4px 12px;
    border-radius: 4px 4px 0 0;
    position: relative;
    top: 1px;
}}
input.imgrid-tab-{id}:checked + label.imgrid-tab-label-{id} {{
    background: #FFF;
    border-bottom: 1px solid transparent;
}}
input.imgrid-tab-{id} ~ .tab {{
    border-top: 1px solid #999;
    padding: 12px;
}}
input.imgrid-tab-{id} ~ .tab {{
    display: none
}}
"
    );
    if !tab_ids.is_empty() {
        let selectors: Vec<String> = tab_ids
            .iter()
            .map(|t| format!("#tab{t}:checked ~ .tab.content{t}"))
            .collect();
        let _ = write!(css, "{}{{ display: block; }}", selectors.join(","));
    }
    css.push_str("</style>");
    css
}

/// Collapsible read-only view of `html`'s source, toggled by a
/// "show html" / "hide html" link.
#[must_use]
pub fn html_viewer(html: &str, ids: &mut dyn IdGenerator) -> String {
    let id = ids.next_id();
    let source = html_escape(html);
    format!(
        r#"
<style>
    #imgrid-html-viewer-toggle-{id} {{
        position: absolute;
        top: -9999px;
        left: -9999px;
        visibility: hidden;
    }}
    #imgrid-html-viewer-label-{id} {{
        position: relative;
        display: inline-block;
        cursor: pointer;
        color: blue;
        text-decoration: underline;
    }}
    #imgrid-html-viewer-textarea-{id} {{
        background: lightgrey;
        width: 100%;
        height: 0px;
        display: none;
    }}
    #imgrid-html-viewer-toggle-{id}:checked ~ #imgrid-html-viewer-textarea-{id} {{
        height: 200px;
        display: block;
    }}
    #imgrid-html-viewer-toggle-{id}:checked + #imgrid-html-viewer-label-{id}:after {{
        content: "hide html";
        position: absolute;
        top: 0;
        left: 0;
        right: 0;
        bottom: 0;
        background: white;
        cursor: pointer;
        color: blue;
        text-decoration: underline;
    }}
</style>
<div>
    <input type="checkbox" id="imgrid-html-viewer-toggle-{id}">
    <label id="imgrid-html-viewer-label-{id}" for="imgrid-html-viewer-toggle-{id}">show html</label>
    <textarea id="imgrid-html-viewer-textarea-{id}" readonly>{source}</textarea>
</div>
"#
    )
}

/// Wrap fragments into a standalone HTML5 document.
#[must_use]
pub fn standalone_document(title: &str, fragments: &[String]) -> String {
    let mut doc = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(doc, "<title>{}</title>", html_escape(title));
    doc.push_str("</head>\n<body>\n");
    for fragment in fragments {
        doc.push_str(fragment);
        doc.push('\n');
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn style() -> GridStyle {
        GridStyle {
            img_width: 150,
            zoom_scale: 2.5,
        }
    }

    fn tile(label: &str) -> Tile {
        Tile {
            label: label.to_owned(),
            custom_text: None,
            caption: None,
            image: TileImage::Url(format!("{label}.png")),
        }
    }

    #[test]
    fn escape_handles_all_specials() {
        assert_eq!(
            html_escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn base64_src_is_data_uri() {
        let img = TileImage::Base64Png("iVBORw0=".into());
        assert_eq!(img.src(), "data:image/png;base64,iVBORw0=");
    }

    #[test]
    fn style_embeds_width_and_zoom() {
        let css = grid_style("g", &style());
        assert!(css.contains("width: 150px;"));
        assert!(css.contains("transform: scale(2.5);"));
        assert!(css.contains("div[id^=imgrid-content-div-g]:target"));
        assert!(css.contains("#imgrid-imgs-container-div-g {"));
    }

    #[test]
    fn whole_number_zoom_formats_without_fraction() {
        let css = grid_style(
            "g",
            &GridStyle {
                img_width: 10,
                zoom_scale: 2.0,
            },
        );
        assert!(css.contains("scale(2)"));
    }

    #[test]
    fn tile_contains_zoom_anchors_and_escaped_text() {
        let t = Tile {
            label: "<cat>".into(),
            custom_text: Some("A & B".into()),
            caption: Some("imgs/cat.png".into()),
            image: TileImage::Url("imgs/cat.png".into()),
        };
        let html = tile_html(&t, "g", "t1");
        assert!(html.contains("&lt;cat&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(html.contains(r#"<img src="imgs/cat.png"/>"#));
        assert!(html.contains(r##"<a href="#imgrid-content-div-g-t1">"##));
        assert!(html.contains(r##"<a href="#!">"##));
        assert!(html.contains(r#"id="imgrid-content-div-g-t1""#));
    }

    #[test]
    fn tile_without_optional_headings_has_one_heading() {
        let html = tile_html(&tile("a"), "g", "t");
        assert_eq!(html.matches("<h4").count(), 1);
    }

    #[test]
    fn grid_renders_every_tile_in_order() {
        let mut ids = SequentialIds::new("i");
        let html = grid_html(&[tile("a"), tile("b"), tile("c")], &style(), &mut ids);
        assert_eq!(html.matches("imgrid-placeholder-div-i0\"").count(), 3);
        let a = html.find("a.png").unwrap_or(usize::MAX);
        let c = html.find("c.png").unwrap_or(0);
        assert!(a < c);
        assert!(html.contains(r#"id="imgrid-content-div-i0-i3""#));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn tabs_check_only_first_and_wire_content() {
        let mut ids = SequentialIds::new("t");
        let tabs = vec![
            Tab {
                label: "cats".into(),
                tiles: vec![tile("c1")],
            },
            Tab {
                label: "dogs".into(),
                tiles: vec![tile("d1"), tile("d2")],
            },
        ];
        let html = tabs_html(&tabs, &style(), &mut ids);

        // t0 is the layout, t1/t2 the tabs.
        assert_eq!(html.matches(" checked ").count(), 1);
        assert!(html.contains(r#"id="tabt1" checked />"#));
        assert!(html.contains(r#"id="tabt2"/>"#));
        assert!(html.contains(r#"<label class="imgrid-tab-label-t0" for="tabt2">dogs</label>"#));
        assert!(html.contains(
            "#tabt1:checked ~ .tab.contentt1,#tabt2:checked ~ .tab.contentt2{ display: block; }"
        ));
        assert!(html.contains(r#"<div class="tab contentt2">"#));
        assert_eq!(html.matches("<img ").count(), 3);
    }

    #[test]
    fn empty_tabs_still_produce_valid_style() {
        let mut ids = SequentialIds::default();
        let html = tabs_html(&[], &style(), &mut ids);
        assert!(html.starts_with("<div>"));
        assert!(html.contains("</style>"));
        assert!(!html.contains("display: block;"));
    }

    #[test]
    fn viewer_escapes_source() {
        let mut ids = SequentialIds::new("v");
        let html = html_viewer("<div>x</div>", &mut ids);
        assert!(html.contains("&lt;div&gt;x&lt;/div&gt;</textarea>"));
        assert!(html.contains(r#"content: "hide html";"#));
        assert!(html.contains(">show html</label>"));
    }

    #[test]
    fn document_wraps_fragments() {
        let doc = standalone_document("a < b", &["<p>1</p>".into(), "<p>2</p>".into()]);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>a &lt; b</title>"));
        assert!(doc.contains("<p>1</p>\n<p>2</p>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }
}
