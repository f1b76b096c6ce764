use super::*;

const OVERLAY: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2" viewBox="0 0 4 2">
  <path id="sp1" d="M0 0 L2 0 L2 2 L0 2 Z" fill="#ff0000" style="stroke-width: 0; opacity: 1;"/>
</svg>"##;

#[test]
fn hex_colors_parse() {
    assert_eq!(parse_hex_color("#000").unwrap(), [0, 0, 0, 255]);
    assert_eq!(parse_hex_color("#f80").unwrap(), [255, 136, 0, 255]);
    assert_eq!(parse_hex_color("#102030").unwrap(), [16, 32, 48, 255]);
    assert_eq!(parse_hex_color("#10203040").unwrap(), [16, 32, 48, 64]);
    assert!(parse_hex_color("red").is_err());
    assert!(parse_hex_color("#12345").is_err());
    assert!(parse_hex_color("#zzzzzz").is_err());
}

#[test]
fn overlay_paints_over_background() {
    let img = rasterize_overlay(OVERLAY, &RasterOpts::default()).unwrap();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(3, 1).0, [0, 0, 0, 255]);
}

#[test]
fn scale_multiplies_output_size() {
    let opts = RasterOpts {
        scale: 2.0,
        background: [0, 0, 0, 0],
    };
    let img = rasterize_overlay(OVERLAY, &opts).unwrap();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.get_pixel(7, 3).0[3], 0);
}

#[test]
fn png_is_written() {
    let dir = std::env::temp_dir().join(format!("segcanvas_png_{}", std::process::id()));
    let path = dir.join("nested").join("overlay.png");
    let img = rasterize_overlay(OVERLAY, &RasterOpts::default()).unwrap();
    write_png(&img, &path).unwrap();
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (4, 2));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn garbage_overlay_is_an_error() {
    assert!(rasterize_overlay("<nope", &RasterOpts::default()).is_err());
}
