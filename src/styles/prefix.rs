// src/styles/prefix.rs

//! Vendor prefixing via `lightningcss`.
//!
//! Prefixes are added by lightningcss's minify pass, which also merges
//! adjacent duplicate rules and shortens values (`blue` becomes `#00f`).
//! Output is printed unminified. The compiler's source map is chained
//! through the rewrite, so the written map still points at the Sass sources.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use tracing::warn;

use crate::errors::{LabrunError, Result};

const MAP_ROOT: &str = "/";

/// Resolve a browserslist query list (`"Safari >= 8"`, `"last 2 versions"`)
/// into lightningcss targets. `None` means no prefixing.
pub fn browsers_from_queries<S: AsRef<str>>(queries: &[S]) -> Result<Option<Browsers>> {
    Browsers::from_browserslist(queries.iter().map(AsRef::as_ref)).map_err(|err| {
        let list: Vec<&str> = queries.iter().map(AsRef::as_ref).collect();
        LabrunError::ConfigError(format!("unsupported browser list {list:?}: {err}"))
    })
}

/// Prefixed CSS plus, when an input map was given, a data URL for the
/// source map from the written CSS back to the compiler's sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixed {
    pub code: String,
    pub source_map: Option<String>,
}

/// Add the vendor prefixes `browsers` need.
///
/// `input_map` is the compiler's source map as a data URL. An unreadable map
/// is dropped with a warning rather than failing the entry.
pub fn prefix_css(
    css: &str,
    filename: &str,
    browsers: Option<Browsers>,
    input_map: Option<&str>,
) -> std::result::Result<Prefixed, String> {
    let targets = Targets {
        browsers,
        ..Targets::default()
    };

    let mut sheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| e.to_string())?;

    sheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let mut original = input_map.and_then(|url| match SourceMap::from_data_url(MAP_ROOT, url) {
        Ok(map) => Some(map),
        Err(err) => {
            warn!(file = %filename, error = ?err, "unreadable source map; writing CSS without one");
            None
        }
    });

    let mut map = SourceMap::new(MAP_ROOT);
    map.add_source(filename);

    let output = sheet
        .to_css(PrinterOptions {
            targets,
            source_map: original.is_some().then_some(&mut map),
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let source_map = match original.as_mut() {
        Some(original) => {
            map.extends(original).map_err(|e| format!("chaining source map: {e:?}"))?;
            Some(
                map.to_data_url(None)
                    .map_err(|e| format!("encoding source map: {e:?}"))?,
            )
        }
        None => None,
    };

    Ok(Prefixed {
        code: output.code,
        source_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_sourcemap::OriginalLocation;

    /// Map every generated line onto the same line of `style.scss`.
    fn line_for_line_map(css: &str) -> String {
        let mut map = SourceMap::new(MAP_ROOT);
        let source = map.add_source("style.scss");
        for line in 0..css.lines().count() as u32 {
            map.add_mapping(
                line,
                0,
                Some(OriginalLocation {
                    original_line: line,
                    original_column: 0,
                    source,
                    name: None,
                }),
            );
        }
        map.to_data_url(None).unwrap()
    }

    fn line_of(css: &str, needle: &str) -> u32 {
        css.lines().position(|l| l.starts_with(needle)).unwrap() as u32
    }

    #[test]
    fn browserslist_queries_become_targets() {
        let browsers = browsers_from_queries(&["Safari >= 8", "iOS >= 8.4"])
            .unwrap()
            .unwrap();
        assert_eq!(browsers.safari, Some(8 << 16));
        assert_eq!(browsers.ios_saf, Some(8 << 16 | 4 << 8));
        assert!(browsers_from_queries(&["last 2 versions"]).unwrap().is_some());
    }

    #[test]
    fn unknown_browsers_are_rejected() {
        let err = browsers_from_queries(&["Netscape >= 4"]).unwrap_err();
        assert!(matches!(err, LabrunError::ConfigError(_)));
    }

    #[test]
    fn prefixes_follow_targets() {
        let css = ".a { user-select: none; }\n";
        let old = browsers_from_queries(&["Safari >= 8"]).unwrap();
        let out = prefix_css(css, "style.css", old, None).unwrap();
        assert!(out.code.contains("-webkit-user-select"), "{}", out.code);
        assert_eq!(out.source_map, None);
    }

    #[test]
    fn chained_map_points_at_the_original_lines() {
        let css = ".a {\n  color: red;\n}\n.b {\n  user-select: none;\n}\n";
        let browsers = browsers_from_queries(&["Safari >= 8", "ie >= 9"]).unwrap();

        let out = prefix_css(css, "style.css", browsers, Some(&line_for_line_map(css))).unwrap();

        let written_line = line_of(&out.code, ".b");
        assert_ne!(written_line, line_of(css, ".b"), "{}", out.code);

        let mut map = SourceMap::from_data_url(MAP_ROOT, &out.source_map.unwrap()).unwrap();
        let mapping = map.find_closest_mapping(written_line, 0).unwrap();
        assert_eq!(mapping.original.unwrap().original_line, line_of(css, ".b"));
    }

    #[test]
    fn unreadable_map_is_dropped() {
        let out = prefix_css(".a { color: red; }", "style.css", None, Some("data:nonsense")).unwrap();
        assert_eq!(out.source_map, None);
    }
}
