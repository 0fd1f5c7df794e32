//! Standalone HTML page wrapping a rendered document.
//!
//! Used for print/PDF export: the page is opened in the system browser, which
//! owns the actual print dialog.

use crate::config::Theme;

const LIGHT_VARS: &str = "--bg:#ffffff;--fg:#1f2328;--muted:#59636e;--accent:#0969da;--code-bg:#f6f8fa;--border:#d1d9e0;";
const DARK_VARS: &str = "--bg:#0d1117;--fg:#e6edf3;--muted:#9198a1;--accent:#4493f8;--code-bg:#151b23;--border:#3d444d;";

const BASE_CSS: &str = r"
body { margin: 0; background: var(--bg); color: var(--fg);
  font: 16px/1.6 -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; }
main { max-width: 880px; margin: 0 auto; padding: 32px; }
a { color: var(--accent); }
h1, h2 { border-bottom: 1px solid var(--border); padding-bottom: .3em; }
pre, code { background: var(--code-bg); border-radius: 6px;
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
pre { padding: 16px; overflow: auto; }
code { padding: .2em .4em; }
pre code { padding: 0; }
blockquote { margin: 0; padding: 0 1em; color: var(--muted); border-left: .25em solid var(--border); }
table { border-collapse: collapse; }
th, td { border: 1px solid var(--border); padding: 6px 13px; }
img { max-width: 100%; }
";

/// Build a complete page around sanitized HTML.
///
/// With `auto_print` the page opens the print dialog once loaded.
pub fn standalone_page(title: &str, body_html: &str, theme: Theme, auto_print: bool) -> String {
    let vars = match theme {
        Theme::Light => LIGHT_VARS,
        Theme::Dark => DARK_VARS,
    };
    let print_script = if auto_print {
        "<script>window.addEventListener('load', function () { window.print(); });</script>\n"
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html>\n<html data-theme=\"{theme}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>:root{{{vars}}}{BASE_CSS}</style>\n{print_script}</head>\n\
         <body>\n<main class=\"markdown-body\">\n{body_html}</main>\n</body>\n</html>\n",
        theme = theme.as_str(),
        title = escape_text(title),
    )
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_body_and_theme() {
        let page = standalone_page("notes.md", "<p>hi</p>", Theme::Dark, false);
        assert!(page.contains("<p>hi</p>"));
        assert!(page.contains("data-theme=\"dark\""));
        assert!(page.contains("--bg:#0d1117"));
        assert!(!page.contains("window.print"));
    }

    #[test]
    fn test_title_is_escaped() {
        let page = standalone_page("<b>x</b>.md", "", Theme::Light, false);
        assert!(page.contains("<title>&lt;b&gt;x&lt;/b&gt;.md</title>"));
    }

    #[test]
    fn test_auto_print_adds_trigger() {
        let page = standalone_page("a.md", "", Theme::Light, true);
        assert!(page.contains("window.print()"));
    }
}
