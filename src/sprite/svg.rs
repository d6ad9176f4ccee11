// src/sprite/svg.rs

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::SpriteError;

static ROOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<svg\b([^>]*?)/?>(.*)</svg>").expect("valid svg regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attr regex")
});

/// One icon ready to be placed on the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgIcon {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub view_box: Option<String>,
    /// Markup between the root `<svg>` tags.
    pub inner: String,
}

pub fn parse_svg(name: &str, content: &str) -> Result<SvgIcon, SpriteError> {
    let invalid = |reason: &str| SpriteError::InvalidSvg {
        file: name.to_string(),
        reason: reason.to_string(),
    };

    let caps = ROOT_RE
        .captures(content)
        .ok_or_else(|| invalid("no <svg> root element"))?;
    let attrs = parse_attributes(caps.get(1).map_or("", |m| m.as_str()));
    let inner = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();

    let view_box = attrs.get("viewBox").cloned();
    let from_view_box = view_box.as_deref().and_then(view_box_size);

    let width = attrs
        .get("width")
        .and_then(|w| parse_length(w))
        .or(from_view_box.map(|(w, _)| w));
    let height = attrs
        .get("height")
        .and_then(|h| parse_length(h))
        .or(from_view_box.map(|(_, h)| h));

    match (width, height) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => Ok(SvgIcon {
            name: name.to_string(),
            width,
            height,
            view_box,
            inner,
        }),
        _ => Err(SpriteError::MissingDimensions {
            file: name.to_string(),
        }),
    }
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
            Some((key, value))
        })
        .collect()
}

/// `"24"`, `"24px"`, `"12.5"`; relative units are not supported.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse::<f64>().ok()
}

fn view_box_size(view_box: &str) -> Option<(f64, f64)> {
    let parts: Vec<f64> = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [_, _, w, h] => Some((*w, *h)),
        _ => None,
    }
}
