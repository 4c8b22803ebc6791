use image::{ColorType, GenericImageView, Rgb};
use placeholder_icons::{
    capability::{self, Capability},
    font::{FontSource, BITMAP_HEIGHT, BITMAP_WIDTH},
    icon_gen::{
        self, background_color, glyph_font_size, place_glyph, render_icon, GlyphPlacement,
        Outcome, ICON_SIZES,
    },
};
use std::path::Path;
use tempfile::TempDir;

fn run_builtin(out_dir: &Path) -> Outcome {
    icon_gen::run(&capability::detect(), &FontSource::builtin(), out_dir)
}

/// Bounding box of every pixel that differs from the background
fn ink_box(img: &image::RgbImage) -> Option<(u32, u32, u32, u32)> {
    let bg = background_color();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if *pixel != bg {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

#[test]
fn test_writes_all_sizes_as_rgb_png() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("extension").join("icons");

    let outcome = run_builtin(&out_dir);
    assert!(matches!(outcome, Outcome::Created(_)), "{outcome:?}");
    assert_eq!(outcome.created().len(), 4);

    for size in ICON_SIZES {
        let path = out_dir.join(format!("icon{size}.png"));
        assert!(path.exists(), "{} should exist", path.display());

        let icon = image::open(&path).expect("Failed to load generated icon");
        assert_eq!(icon.dimensions(), (size, size));
        assert_eq!(icon.color(), ColorType::Rgb8);
    }
}

#[test]
fn test_background_outside_glyph() {
    let fonts = FontSource::discover(None);

    for size in ICON_SIZES {
        let handle = fonts.resolve(glyph_font_size(size));
        let extent = handle.extent(icon_gen::LABEL);
        let GlyphPlacement { x, y } = place_glyph(size, extent);

        let img = render_icon(size, &fonts);
        for (px, py, pixel) in img.enumerate_pixels() {
            let (px, py) = (px as i32, py as i32);
            let inside = px >= x
                && py >= y
                && px < x + extent.width as i32
                && py < y + extent.height as i32;
            if !inside {
                assert_eq!(*pixel, Rgb([0x42, 0x85, 0xf4]), "pixel ({px}, {py}) at {size}px");
            }
        }
    }
}

#[test]
fn test_builtin_glyph_is_centered() {
    let fonts = FontSource::builtin();

    for size in ICON_SIZES {
        let img = render_icon(size, &fonts);
        let (x0, y0, x1, y1) = ink_box(&img).expect("glyph should be drawn");

        assert_eq!(x0, (size - BITMAP_WIDTH) / 2);
        assert_eq!(y0, (size - BITMAP_HEIGHT) / 2);
        assert_eq!(x1 - x0 + 1, BITMAP_WIDTH);
        assert_eq!(y1 - y0 + 1, BITMAP_HEIGHT);
        assert_eq!(*img.get_pixel(x0, y1), Rgb([255, 255, 255]));
    }
}

/// Whichever face is found, the glyph's ink starts exactly at its placement
#[test]
fn test_glyph_ink_starts_at_placement() {
    let fonts = FontSource::discover(None);

    for size in ICON_SIZES {
        let extent = fonts.resolve(glyph_font_size(size)).extent(icon_gen::LABEL);
        assert!(extent.measured, "{size}px glyph should be measured");
        let placement = place_glyph(size, extent);

        let img = render_icon(size, &fonts);
        let (x0, y0, _, _) = ink_box(&img).expect("glyph should be drawn");
        assert_eq!(
            (x0 as i32, y0 as i32),
            (placement.x, placement.y),
            "{size}px ink top-left"
        );
    }
}

#[test]
fn test_second_run_overwrites() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    assert!(matches!(run_builtin(&out_dir), Outcome::Created(_)));
    let first: Vec<Vec<u8>> = ICON_SIZES
        .iter()
        .map(|size| std::fs::read(out_dir.join(format!("icon{size}.png"))).unwrap())
        .collect();

    assert!(matches!(run_builtin(&out_dir), Outcome::Created(_)));
    let entries = std::fs::read_dir(&out_dir).unwrap().count();
    assert_eq!(entries, 4);

    for (size, before) in ICON_SIZES.iter().zip(first) {
        let after = std::fs::read(out_dir.join(format!("icon{size}.png"))).unwrap();
        assert_eq!(before, after, "icon{size}.png changed between runs");
    }
}

#[test]
fn test_missing_capability_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    let capability = Capability::Unavailable {
        reason: "png feature disabled".to_string(),
    };
    let outcome = icon_gen::run(&capability, &FontSource::builtin(), &out_dir);

    match &outcome {
        Outcome::Unavailable { reason } => assert_eq!(reason, "png feature disabled"),
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert!(!out_dir.exists());
    assert!(outcome.created().is_empty());

    let steps = outcome.remediation();
    assert_eq!(steps.len(), 4);
    assert!(steps[1].contains("icon16.png") && steps[1].contains("icon128.png"));
    assert!(steps[3].contains("manifest.json"));
    assert_eq!(outcome.exit_code(), 2);
}

#[test]
fn test_failure_on_third_icon_keeps_first_two() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("icons");

    // A directory where icon48.png should go makes that write fail
    std::fs::create_dir_all(out_dir.join("icon48.png")).unwrap();

    let outcome = run_builtin(&out_dir);
    let err = match &outcome {
        Outcome::Failed(err) => err,
        other => panic!("expected Failed, got {other:?}"),
    };

    assert_eq!(err.size, 48);
    assert_eq!(err.created.len(), 2);
    assert!(err.to_string().contains("icon48.png"));
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.remediation().len(), 1);

    assert!(out_dir.join("icon16.png").is_file());
    assert!(out_dir.join("icon32.png").is_file());
    assert!(!out_dir.join("icon128.png").exists());
}
