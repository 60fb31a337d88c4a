use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Read;
use tempfile::TempDir;
use zalo_kit::app::{StickerSettings, StickerTool};
use zalo_kit::core::batch::BatchPolicy;
use zalo_kit::core::sticker::{process_image, Letterbox, STICKER_SIZE};
use zalo_kit::{LocalStorage, ToolEngine, ZaloError};

fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]))
        .save_with_format(dir.path().join(name), ImageFormat::Png)
        .unwrap();
}

fn write_jpeg(dir: &TempDir, name: &str, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([0, 200, 0]))
        .save_with_format(dir.path().join(name), ImageFormat::Jpeg)
        .unwrap();
}

fn sticker_tool(
    input: &TempDir,
    output: &TempDir,
    inputs: &[&str],
    policy: BatchPolicy,
    separate: bool,
) -> StickerTool<LocalStorage> {
    let output_path = output.path().to_str().unwrap().to_string();
    StickerTool::new(
        StickerSettings {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output_path: output_path.clone(),
            policy,
            separate,
        },
        LocalStorage::new(input.path().to_str().unwrap().to_string()),
        LocalStorage::new(output_path),
    )
}

#[test]
fn test_documented_geometry_example() {
    let layout = Letterbox::fit(800, 400);
    assert!((layout.scale - 0.45).abs() < 1e-9);
    assert_eq!(layout.pixel_rect(), (0, 90, 360, 180));
}

#[test]
fn test_output_is_always_square() {
    for (w, h) in [(800, 400), (400, 800), (17, 3), (1000, 1000), (1, 1)] {
        let img = RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        let sticker = process_image("x.png", "image/png", buf.into_inner()).unwrap();
        let out = image::load_from_memory(&sticker.encoded_png).unwrap();
        assert_eq!(
            (out.width(), out.height()),
            (STICKER_SIZE, STICKER_SIZE),
            "input {}x{}",
            w,
            h
        );
    }
}

#[tokio::test]
async fn test_single_image_produces_one_png() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input, "logo.png", 800, 400);

    let engine = ToolEngine::new(sticker_tool(
        &input,
        &output,
        &["logo.png"],
        BatchPolicy::Isolate,
        false,
    ));
    let written = engine.run().await.unwrap();

    assert_eq!(written.len(), 1);
    let path = output.path().join("sticker-logo.png");
    assert!(path.exists());

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (360, 360));
    assert_eq!(img.get_pixel(180, 45)[3], 0);
    let center = img.get_pixel(180, 180);
    assert_eq!(center[3], 255);
    assert!(center[0] > 250 && center[1] < 5);
}

#[tokio::test]
async fn test_multiple_images_produce_archive_with_n_entries() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input, "a.png", 100, 50);
    write_jpeg(&input, "b.jpg", 50, 100);
    std::fs::write(input.path().join("readme.txt"), "not an image").unwrap();

    let engine = ToolEngine::new(sticker_tool(
        &input,
        &output,
        &["a.png", "b.jpg", "readme.txt"],
        BatchPolicy::Isolate,
        false,
    ));
    let written = engine.run().await.unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("zalo-stickers.zip"));

    let zip_data = std::fs::read(output.path().join("zalo-stickers.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 2);

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        file_names,
        vec!["zalo-stickers/sticker-1-a.png", "zalo-stickers/sticker-2-b.png"]
    );

    let mut entry = archive.by_name("zalo-stickers/sticker-2-b.png").unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (360, 360));
}

#[tokio::test]
async fn test_isolate_policy_keeps_valid_images() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input, "good.png", 30, 30);
    std::fs::write(input.path().join("corrupt.png"), b"\x89PNG\r\n\x1a\nbroken").unwrap();

    let engine = ToolEngine::new(sticker_tool(
        &input,
        &output,
        &["good.png", "corrupt.png"],
        BatchPolicy::Isolate,
        false,
    ));
    let written = engine.run().await.unwrap();

    assert_eq!(written.len(), 1);
    assert!(output.path().join("sticker-good.png").exists());
    assert_eq!(engine.tool().collection().len(), 1);
}

#[tokio::test]
async fn test_fail_fast_policy_drops_whole_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input, "good.png", 30, 30);
    std::fs::write(input.path().join("corrupt.png"), b"garbage").unwrap();

    let engine = ToolEngine::new(sticker_tool(
        &input,
        &output,
        &["good.png", "corrupt.png"],
        BatchPolicy::FailFast,
        false,
    ));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, ZaloError::DecodeError { .. }));
    assert!(engine.tool().collection().is_empty());
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_separate_writes_one_png_per_sticker() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(&input, "one.png", 10, 10);
    write_png(&input, "two.png", 20, 10);

    let engine = ToolEngine::new(sticker_tool(
        &input,
        &output,
        &["one.png", "two.png"],
        BatchPolicy::Isolate,
        true,
    ));
    let written = engine.run().await.unwrap();

    assert_eq!(written.len(), 2);
    assert!(output.path().join("sticker-one.png").exists());
    assert!(output.path().join("sticker-two.png").exists());
}
