// src/sprite/render.rs

use std::fmt::Write;

use super::layout::SpriteLayout;
use super::svg::SvgIcon;

/// `12` for whole numbers, `12.5` otherwise.
pub fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn px(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}px", fmt_num(value))
    }
}

/// Sprite sheet with one nested `<svg>` per icon.
pub fn render_sprite(icons: &[SvgIcon], layout: &SpriteLayout) -> String {
    let (w, h) = (fmt_num(layout.width), fmt_num(layout.height));
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );

    for (index, icon) in icons.iter().enumerate() {
        let Some((x, y)) = layout.glyph_origin(index) else {
            continue;
        };
        let view_box = icon.view_box.clone().unwrap_or_else(|| {
            format!("0 0 {} {}", fmt_num(icon.width), fmt_num(icon.height))
        });
        let _ = write!(
            out,
            "\n  <svg width=\"{}\" height=\"{}\" viewBox=\"{}\" x=\"{}\" y=\"{}\">{}</svg>",
            fmt_num(icon.width),
            fmt_num(icon.height),
            view_box,
            fmt_num(x),
            fmt_num(y),
            icon.inner
        );
    }

    out.push_str("\n</svg>\n");
    out
}

/// Inputs of the generated SCSS partial besides the layout itself.
#[derive(Debug, Clone)]
pub struct PartialOptions<'a> {
    /// Sprite URL as seen from the compiled stylesheets.
    pub sprite_url: &'a str,
    pub class_prefix: &'a str,
    /// Build timestamp in milliseconds.
    pub now: u64,
}

pub fn render_scss(icons: &[SvgIcon], layout: &SpriteLayout, opts: &PartialOptions<'_>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "// Generated by labrun. Do not edit.");
    let _ = writeln!(out, "$sprite-now: {};", opts.now);
    let _ = writeln!(out, "$sprite-url: \"{}\";", opts.sprite_url);
    let _ = writeln!(out, "$sprite-width: {};", px(layout.width));
    let _ = writeln!(out, "$sprite-height: {};", px(layout.height));
    out.push('\n');

    out.push_str("$sprite-icons: (\n");
    for (icon, rect) in icons.iter().zip(&layout.boxes) {
        let _ = writeln!(
            out,
            "  \"{}\": (x: {}, y: {}, width: {}, height: {}),",
            icon.name,
            px(rect.x),
            px(rect.y),
            px(rect.width),
            px(rect.height)
        );
    }
    out.push_str(");\n\n");

    out.push_str(
        "%sprite {\n  display: inline-block;\n  background-image: url($sprite-url);\n  \
         background-repeat: no-repeat;\n  background-size: $sprite-width $sprite-height;\n}\n",
    );

    for (icon, rect) in icons.iter().zip(&layout.boxes) {
        let _ = write!(
            out,
            "\n.{}{} {{\n  @extend %sprite;\n  background-position: {} {};\n  width: {};\n  height: {};\n}}\n",
            opts.class_prefix,
            icon.name,
            px(-rect.x),
            px(-rect.y),
            px(rect.width),
            px(rect.height)
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::layout::diagonal_layout;

    fn icon(name: &str, w: f64, h: f64) -> SvgIcon {
        SvgIcon {
            name: name.to_string(),
            width: w,
            height: h,
            view_box: None,
            inner: "<g/>".to_string(),
        }
    }

    #[test]
    fn scss_lists_every_icon_with_padded_box() {
        let icons = vec![icon("arrow", 10.0, 10.0), icon("close", 4.0, 6.0)];
        let layout = diagonal_layout(&[(10.0, 10.0), (4.0, 6.0)], 1.0);
        let scss = render_scss(
            &icons,
            &layout,
            &PartialOptions {
                sprite_url: "../images/sprite.svg",
                class_prefix: "svg-",
                now: 42,
            },
        );

        assert!(scss.contains("$sprite-now: 42;"));
        assert!(scss.contains("$sprite-width: 18px;"));
        assert!(scss.contains("\"close\": (x: 12px, y: 12px, width: 6px, height: 8px),"));
        assert!(scss.contains(".svg-close {\n  @extend %sprite;\n  background-position: -12px -12px;"));
    }

    #[test]
    fn sprite_places_glyphs_inside_padding() {
        let icons = vec![icon("a", 10.0, 10.0)];
        let layout = diagonal_layout(&[(10.0, 10.0)], 2.0);
        let svg = render_sprite(&icons, &layout);
        assert!(svg.contains("width=\"14\" height=\"14\""));
        assert!(svg.contains("viewBox=\"0 0 10 10\" x=\"2\" y=\"2\"><g/></svg>"));
    }
}
