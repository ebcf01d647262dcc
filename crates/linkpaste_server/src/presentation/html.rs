//! Server-rendered HTML for the view, embed and error pages.
//!
//! Every user-supplied string passes through [`escape_html`] before it is
//! interpolated. Syntax highlighting is left to the client: code blocks only
//! carry a `language-…` class hint.

use super::ShareLinks;
use chrono::{DateTime, Utc};
use linkpaste_core::models::paste::PasteView;

const BASE_STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; background: #0f1115; color: #e6e6e6; }
main { max-width: 960px; margin: 0 auto; padding: 24px; }
a { color: #7aa2f7; }
h1 { font-size: 1.4rem; margin: 0 0 8px; }
.meta { display: flex; flex-wrap: wrap; gap: 12px; font-size: 0.85rem; color: #9aa0aa; margin-bottom: 16px; }
.badge { background: #2a2f3a; border-radius: 4px; padding: 2px 8px; color: #e6e6e6; }
.actions { display: flex; gap: 12px; align-items: center; margin-bottom: 12px; }
button { background: #2a2f3a; color: #e6e6e6; border: 1px solid #3b4252; border-radius: 4px; padding: 4px 12px; cursor: pointer; }
pre { margin: 0; background: #161922; border: 1px solid #2a2f3a; border-radius: 6px; overflow-x: auto; padding: 12px 0; }
code { display: block; font-family: "JetBrains Mono", Consolas, monospace; font-size: 0.9rem; counter-reset: line; }
.line { display: block; padding: 0 16px 0 0; white-space: pre; }
.line::before { content: attr(data-line); display: inline-block; width: 3.5em; margin-right: 16px; text-align: right; color: #5c6370; user-select: none; }
.error { text-align: center; padding-top: 15vh; }
.error .code { font-size: 4rem; color: #5c6370; }
"#;

const EMBED_STYLE: &str = r#"
main { padding: 0; }
pre { border-radius: 0; border: none; }
.embed-footer { font-size: 0.75rem; padding: 4px 8px; background: #161922; border-top: 1px solid #2a2f3a; }
"#;

const COPY_SCRIPT: &str = r#"
document.getElementById('copy-button').addEventListener('click', function () {
  var button = this;
  var text = document.getElementById('raw-content').value;
  navigator.clipboard.writeText(text).then(function () {
    button.textContent = 'Copied';
    setTimeout(function () { button.textContent = 'Copy'; }, 1500);
  });
});
"#;

/// Escape text for safe interpolation into HTML element and attribute
/// content.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Restrict a language hint to characters usable in a CSS class name.
fn language_class(language: &str) -> String {
    let cleaned: String = language
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+' | '#'))
        .map(|ch| ch.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        "plaintext".to_string()
    } else {
        cleaned
    }
}

/// Render escaped content as one `<span class="line">` per source line.
pub fn numbered_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + content.len() / 2);
    for (index, line) in content.lines().enumerate() {
        out.push_str(&format!(
            "<span class=\"line\" data-line=\"{}\">{}</span>",
            index + 1,
            escape_html(line)
        ));
    }
    out
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn display_title(view: &PasteView) -> String {
    escape_html(view.title.as_deref().unwrap_or("Untitled paste"))
}

fn code_block(view: &PasteView) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        language_class(&view.language),
        numbered_lines(&view.content)
    )
}

fn document(title: &str, extra_style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{BASE_STYLE}{extra_style}</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n"
    )
}

/// Full view page with metadata, share links and a copy button.
pub fn render_view_page(view: &PasteView, links: &ShareLinks) -> String {
    let title = display_title(view);
    let expires = match view.expires_at {
        Some(at) => format!("<span>Expires {}</span>", format_timestamp(at)),
        None => "<span>Never expires</span>".to_string(),
    };
    let edit = match &links.edit {
        Some(edit) => format!("<a href=\"{}\">Edit link</a>", escape_html(edit)),
        None => String::new(),
    };
    let body = format!(
        "<main>\n<h1>{title}</h1>\n\
         <div class=\"meta\"><span class=\"badge\">{language}</span>\
         <span class=\"badge\">{privacy}</span>\
         <span>{views} views</span>\
         <span>Created {created}</span>{expires}</div>\n\
         <div class=\"actions\"><button id=\"copy-button\" type=\"button\">Copy</button>\
         <a href=\"{raw}\">Raw</a><a href=\"{embed}\">Embed</a>{edit}</div>\n\
         {code}\n\
         <textarea id=\"raw-content\" hidden>{content}</textarea>\n\
         <script>{COPY_SCRIPT}</script>\n</main>",
        language = escape_html(&view.language),
        privacy = view.privacy,
        views = view.views,
        created = format_timestamp(view.created_at),
        raw = escape_html(&links.raw),
        embed = escape_html(&links.embed),
        code = code_block(view),
        content = escape_html(&view.content),
    );
    document(&title, "", &body)
}

/// Minimal page intended for `<iframe>` embedding.
pub fn render_embed_page(view: &PasteView, links: &ShareLinks) -> String {
    let title = display_title(view);
    let body = format!(
        "<main>\n{code}\n<div class=\"embed-footer\">\
         <a href=\"{view_link}\" target=\"_blank\" rel=\"noopener\">{title}</a> · {language}</div>\n</main>",
        code = code_block(view),
        view_link = escape_html(&links.view),
        language = escape_html(&view.language),
    );
    document(&title, EMBED_STYLE, &body)
}

/// Error page for display routes.
pub fn render_error_page(status: u16, message: &str) -> String {
    let message = escape_html(message);
    let body = format!(
        "<main class=\"error\">\n<div class=\"code\">{status}</div>\n<p>{message}</p>\n</main>"
    );
    document(&message, "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use linkpaste_core::models::paste::Privacy;

    fn view(content: &str) -> PasteView {
        PasteView {
            slug: "AbCdEfGh".to_string(),
            title: Some("<b>notes</b>".to_string()),
            content: content.to_string(),
            language: "rust".to_string(),
            privacy: Privacy::Public,
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 0).unwrap(),
            expires_at: None,
            views: 7,
        }
    }

    fn links() -> ShareLinks {
        ShareLinks::for_paste("http://localhost:38480", "AbCdEfGh", Privacy::Public, None)
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn numbered_lines_emits_one_span_per_line() {
        let html = numbered_lines("one\ntwo\n<three>");
        assert_eq!(html.matches("class=\"line\"").count(), 3);
        assert!(html.contains("data-line=\"3\">&lt;three&gt;</span>"));
    }

    #[test]
    fn view_page_escapes_user_content() {
        let page = render_view_page(&view("<script>alert(1)</script>"), &links());
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(!page.contains("<b>notes</b>"));
        assert!(page.contains("&lt;b&gt;notes&lt;/b&gt;"));
        assert!(page.contains("class=\"language-rust\""));
        assert!(page.contains("7 views"));
        assert!(page.contains("Created 2024-03-04 05:06 UTC"));
        assert!(page.contains("id=\"copy-button\""));
        assert!(page.contains("href=\"http://localhost:38480/raw/AbCdEfGh\""));
    }

    #[test]
    fn language_class_strips_attribute_breaking_characters() {
        let mut paste = view("x");
        paste.language = "c\" onmouseover=\"x".to_string();
        let page = render_embed_page(&paste, &links());
        assert!(page.contains("class=\"language-conmouseoverx\""));
    }

    #[test]
    fn error_page_shows_status_and_message() {
        let page = render_error_page(410, "Paste has expired");
        assert!(page.contains("<div class=\"code\">410</div>"));
        assert!(page.contains("<p>Paste has expired</p>"));
    }
}
