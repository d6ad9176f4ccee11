// src/server/snippet.rs

//! Browser-side live-reload client and its injection into HTML responses.

/// Server-Sent Events endpoint the client script connects to.
pub const EVENTS_PATH: &str = "/__labrun/events";

const CLIENT_SCRIPT: &str = r#"<script id="__labrun">
(function () {
  if (!window.EventSource) { return; }
  var source = new EventSource("__EVENTS__");
  source.addEventListener("reload", function () { window.location.reload(); });
  source.addEventListener("css", function (e) {
    var names = [];
    try { names = JSON.parse(e.data); } catch (err) {}
    var links = document.querySelectorAll('link[rel="stylesheet"]');
    for (var i = 0; i < links.length; i++) {
      var href = links[i].href.split("?")[0];
      var file = href.substring(href.lastIndexOf("/") + 1);
      if (names.length === 0 || names.indexOf(file) !== -1) {
        links[i].href = href + "?labrun=" + Date.now();
      }
    }
  });
})();
</script>"#;

pub fn client_script() -> String {
    CLIENT_SCRIPT.replace("__EVENTS__", EVENTS_PATH)
}

/// Insert the client script before the last `</body>` (case-insensitive),
/// or append it when the document has none.
pub fn inject_snippet(html: &str) -> String {
    let script = client_script();
    let lower = html.to_ascii_lowercase();

    match lower.rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..idx]);
            out.push_str(&script);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}{script}"),
    }
}

/// Exact match, or prefix match for entries ending in `*`.
pub fn is_blacklisted(target: &str, blacklist: &[String]) -> bool {
    blacklist.iter().any(|pattern| match pattern.strip_suffix('*') {
        Some(prefix) => target.starts_with(prefix),
        None => target == pattern,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["/index.html".into(), "/".into(), "/?*".into()]
    }

    #[test]
    fn blacklist_covers_the_shell_only() {
        assert!(is_blacklisted("/", &defaults()));
        assert!(is_blacklisted("/index.html", &defaults()));
        assert!(is_blacklisted("/?p=atoms-button", &defaults()));
        assert!(!is_blacklisted("/patterns/atoms-button/atoms-button.html", &defaults()));
    }

    #[test]
    fn snippet_goes_before_closing_body() {
        let html = inject_snippet("<html><BODY><p>x</p></BODY></html>");
        assert!(html.contains("</script></BODY></html>"));
        assert_eq!(html.matches("__labrun").count(), 2);
    }
}
