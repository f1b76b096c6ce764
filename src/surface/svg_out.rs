use std::fmt::Write as _;

use crate::{
    foundation::core::{EMPTY_TAG, Size},
    paint::style::PaintStyle,
    surface::index::ShapeIndex,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
/// How shape paint is written out.
pub enum SvgExportMode {
    /// Current paint attributes, as displayed.
    #[default]
    Painted,
    /// Every shape reset to the untagged style (a blank partition).
    Empty,
    /// Current fill and tag, fully opaque and unstroked (image export).
    Opaque,
}

/// Serialize the overlay as a standalone SVG document.
///
/// `extra` is appended verbatim before the closing tag (used for the grid layer).
pub fn overlay_to_svg(
    index: &ShapeIndex,
    style: &PaintStyle,
    mode: SvgExportMode,
    extra: Option<&str>,
) -> String {
    let Size { width, height } = index.size();
    let mut out = String::with_capacity(128 + index.len() * 96);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt_num(width),
        h = fmt_num(height),
    );

    for shape in index.iter() {
        let (fill, tag, name, opacity, stroke) = match mode {
            SvgExportMode::Painted => (
                shape.paint.fill.as_str(),
                shape.paint.tag.as_str(),
                shape.paint.name.as_str(),
                shape.paint.opacity,
                shape.paint.stroke_width,
            ),
            SvgExportMode::Opaque => (
                shape.paint.fill.as_str(),
                shape.paint.tag.as_str(),
                shape.paint.name.as_str(),
                1.0,
                0.0,
            ),
            SvgExportMode::Empty => (
                style.default_color.as_str(),
                EMPTY_TAG,
                EMPTY_TAG,
                style.default_opacity,
                style.default_line_width,
            ),
        };
        let _ = writeln!(
            out,
            r#"  <path id="{id}" d="{d}" fill="{fill}" tag="{tag}" name="{name}" area="{area}" style="stroke-width: {stroke}; opacity: {opacity};"/>"#,
            id = shape.id(),
            d = shape.path().to_svg(),
            fill = escape_attr(fill),
            tag = escape_attr(tag),
            name = escape_attr(name),
            area = fmt_num(shape.area()),
            stroke = fmt_num(stroke),
            opacity = fmt_num(opacity),
        );
    }

    if let Some(extra) = extra {
        out.push_str(extra);
        if !extra.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str("</svg>\n");
    out
}

/// File name for an exported overlay: last path component of `asset_name` up to its first
/// `.`, plus `.{ext}`.
pub fn export_file_name(asset_name: &str, ext: &str) -> String {
    let last = asset_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(asset_name);
    let stem = last.split('.').next().unwrap_or(last);
    format!("{stem}.{ext}")
}

pub(crate) fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

pub(crate) fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/svg_out.rs"]
mod tests;
