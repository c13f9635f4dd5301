#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use std::path::{Path, PathBuf};

use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use imgrid::{
    HtmlFileSink, ImageBatch, ImageRef, LabeledCollection, PlotConfig, Renderer, SequentialIds,
    labels_from,
};

/// Write a `width x height` gradient image to `dir/name` in `format`.
fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90])
    });
    let path = dir.join(name);
    DynamicImage::ImageRgb8(img)
        .save_with_format(&path, format)
        .unwrap();
    path
}

fn renderer(config: PlotConfig) -> Renderer {
    Renderer::new(config).with_ids(SequentialIds::new("r"))
}

/// Decode every embedded base64 PNG in `html`.
fn embedded_images(html: &str) -> Vec<DynamicImage> {
    html.split("data:image/png;base64,")
        .skip(1)
        .map(|rest| {
            let b64 = &rest[..rest.find('"').unwrap()];
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(b64)
                .unwrap();
            image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap()
        })
        .collect()
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_owned()
}

// --- grid ---

#[test]
fn force_b64_embeds_files_at_original_size() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_image(dir.path(), "a.png", 64, 32, ImageFormat::Png);
    let jpg = write_image(dir.path(), "b.jpg", 30, 40, ImageFormat::Jpeg);

    let batch = ImageBatch::from_path_bufs([png, jpg]);
    let config = PlotConfig {
        force_b64: true,
        ..PlotConfig::default()
    };
    let html = renderer(config).images_html(&batch, None, None).unwrap();

    let decoded = embedded_images(&html);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].dimensions(), (64, 32));
    assert_eq!(decoded[1].dimensions(), (30, 40));
}

#[test]
fn resize_image_scales_embedded_files_to_width() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_image(dir.path(), "wide.png", 300, 101, ImageFormat::Png);

    let batch = ImageBatch::from_path_bufs([png]);
    let config = PlotConfig {
        force_b64: true,
        resize_image: true,
        img_width: 150,
        ..PlotConfig::default()
    };
    let html = renderer(config).images_html(&batch, None, None).unwrap();

    let decoded = embedded_images(&html);
    // 101 * 0.5 = 50.5, truncated.
    assert_eq!(decoded[0].dimensions(), (150, 50));
}

#[test]
fn linked_files_keep_their_path_and_caption() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_image(dir.path(), "linked.png", 8, 8, ImageFormat::Png);
    let relative = imgrid_io::paths::relative_to_cwd(&path_str(&png));

    let batch = ImageBatch::from_path_bufs([png]);
    let html = renderer(PlotConfig::default())
        .images_html(&batch, None, None)
        .unwrap();

    assert!(html.contains(&format!(r#"<img src="{relative}"/>"#)));
    assert!(html.contains(&format!("white-space: normal;\">{relative}</h4>")));
    assert!(embedded_images(&html).is_empty());
}

#[test]
fn pixel_and_decoded_images_mix_in_one_grid() {
    let decoded = DynamicImage::ImageRgb8(RgbImage::new(12, 6));
    let batch = ImageBatch::from_refs(vec![
        ImageRef::from(decoded),
        ImageRef::Pixels(
            imgrid::PixelArray::new(3, 2, 1, imgrid::PixelData::F32(vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]))
                .unwrap(),
        ),
    ]);
    let texts = vec!["first".to_owned(), "second".to_owned()];
    let html = renderer(PlotConfig::default())
        .images_html(&batch, None, Some(&texts))
        .unwrap();

    let images = embedded_images(&html);
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].dimensions(), (12, 6));
    assert_eq!(images[1].dimensions(), (3, 2));
    assert!(html.contains(">first</h4>"));
    assert!(html.contains(">second</h4>"));
}

#[test]
fn unreadable_file_fails_with_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.png");
    let batch = ImageBatch::from_path_bufs([missing]);
    let config = PlotConfig {
        force_b64: true,
        ..PlotConfig::default()
    };
    let err = renderer(config).images_html(&batch, None, None).unwrap_err();
    assert!(err.to_string().starts_with("failed to load "));
}

#[test]
fn corrupt_file_fails_with_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.png");
    std::fs::write(&path, b"not an image").unwrap();
    let batch = ImageBatch::from_path_bufs([path]);
    let config = PlotConfig {
        force_b64: true,
        ..PlotConfig::default()
    };
    let err = renderer(config).images_html(&batch, None, None).unwrap_err();
    assert!(matches!(
        err,
        imgrid::RenderError::Pipeline(imgrid::PipelineError::ImageDecode(_))
    ));
}

// --- tabs and representatives ---

#[test]
fn tabs_and_representatives_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<ImageRef> = ["c.png", "b.png", "a.png", "d.png"]
        .iter()
        .map(|name| ImageRef::from(path_str(&write_image(dir.path(), name, 10, 10, ImageFormat::Png))))
        .collect();
    let collection = LabeledCollection::new(files, labels_from([3, 2, 1, 3])).unwrap();
    let mut r = renderer(PlotConfig::default());

    let tabs = r.class_tabs_html(&collection, None).unwrap();
    let one = tabs.find(">1</label>").unwrap();
    let two = tabs.find(">2</label>").unwrap();
    let three = tabs.find(">3</label>").unwrap();
    assert!(one < two && two < three);
    assert_eq!(tabs.matches("<img ").count(), 4);

    let order = labels_from([2, 1, 3, 9]);
    let reps = r
        .class_representations_html(&collection, None, Some(&order))
        .unwrap();
    let b = reps.find("b.png\"/>").unwrap();
    let a = reps.find("a.png\"/>").unwrap();
    let c = reps.find("c.png\"/>").unwrap();
    assert!(b < a && a < c);
    assert!(!reps.contains("d.png\"/>"));
    assert_eq!(reps.matches("<img ").count(), 3);
}

// --- file sink ---

#[test]
fn html_file_sink_collects_viewer_and_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_image(dir.path(), "x.png", 4, 4, ImageFormat::Png);
    let out = dir.path().join("report.html");

    let mut sink = HtmlFileSink::new(&out);
    let mut r = renderer(PlotConfig::default());
    let batch = ImageBatch::from_path_bufs([png.clone()]);
    r.plot_images(&mut sink, &batch, None, None).unwrap();

    let collection =
        LabeledCollection::new(vec![ImageRef::from(path_str(&png))], labels_from(["x"])).unwrap();
    r.plot_class_tabs(&mut sink, &collection, None).unwrap();
    assert_eq!(sink.fragments().len(), 4);

    sink.finish().unwrap();
    let doc = std::fs::read_to_string(&out).unwrap();
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert_eq!(doc.matches(">show html</label>").count(), 2);
    assert!(doc.contains("<title>report</title>"));
}
