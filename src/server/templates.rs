//! HTML template functions for the server-rendered views.

use axum::http::StatusCode;

use crate::types::{History, Page};

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Shared HTML shell. MathJax picks up the `$`/`$$` delimiters the
/// preprocessor leaves in place.
fn layout(title: &str, content: &str) -> String {
    format!(
        concat!(
            "<!doctype html><html lang=\"en\"><head>",
            "<meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            "<title>{title}</title>",
            "<style>",
            "body{{max-width:46rem;margin:2rem auto;padding:0 1rem;",
            "font-family:system-ui,sans-serif;line-height:1.5}}",
            ".preview{{color:#666}}",
            ".block-formula{{margin:1rem 0}}",
            "textarea{{width:100%;font-family:monospace}}",
            ".history-entry pre{{background:#f6f6f6;padding:.5rem;overflow-x:auto}}",
            "</style>",
            "<script>window.MathJax={{tex:{{inlineMath:[[\"$\",\"$\"]],",
            "displayMath:[[\"$$\",\"$$\"]]}}}};</script>",
            "<script async src=\"https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js\"></script>",
            "</head><body><main>{content}</main></body></html>",
        ),
        title = escape_html(title),
        content = content,
    )
}

pub fn index(pages: &[Page]) -> String {
    let mut content = String::new();
    content.push_str("<h1>Pages</h1>\n");
    content.push_str("<p><a href='/pages/edit/'>Create New</a></p>\n");

    if !pages.is_empty() {
        content.push_str("<ul class=\"page-list\">\n");
        for page in pages {
            content.push_str(&format!(
                "<li><a href='/pages/{key}/'>{title}</a> <span class=\"preview\">{preview}...</span></li>\n",
                key = page.created_ts,
                title = escape_html(&page.title),
                preview = escape_html(&page.preview),
            ));
        }
        content.push_str("</ul>\n");
    }

    layout("Pages", &content)
}

pub fn page(page: &Page, content_html: &str, attachments: &[String]) -> String {
    let key = page.created_ts;
    let mut content = String::new();

    content.push_str("<p><a href='/'>index</a> · ");
    content.push_str(&format!("<a href='/pages/edit/{key}/'>edit</a> · "));
    content.push_str(&format!("<a href='/pages/{key}/history/'>history</a></p>\n"));

    content.push_str("<div class='page-content'>\n");
    content.push_str(content_html);
    content.push_str("</div>\n");

    if !attachments.is_empty() {
        content.push_str("<h2>Attachments</h2>\n<ul class=\"attachments\">\n");
        for file_name in attachments {
            let encoded = urlencoding::encode(file_name);
            content.push_str(&format!(
                concat!(
                    "<li><a href=\"/pages/{key}/{encoded}\">{name}</a> ",
                    "<form action=\"/pages/edit/{key}/attachments/{encoded}/delete\" method=\"POST\" ",
                    "style=\"display:inline\"><input type=\"submit\" value=\"delete\"></form></li>\n",
                ),
                key = key,
                encoded = encoded,
                name = escape_html(file_name),
            ));
        }
        content.push_str("</ul>\n");
    }

    content.push_str(&format!(
        concat!(
            "<form action=\"/pages/edit/{key}/attachments/\" method=\"POST\" ",
            "enctype=\"multipart/form-data\">\n",
            "<input type=\"hidden\" name=\"page\" value=\"{id}\">\n",
            "<input type=\"file\" name=\"file\" id=\"file\">\n",
            "<input type=\"submit\" value=\"Upload\">\n",
            "</form>\n",
        ),
        key = key,
        id = page.id,
    ));

    layout(&page.title, &content)
}

/// Editor form. Posts back to the URL it was served from, so the same
/// template covers both new pages and edits.
pub fn edit(page: Option<&Page>) -> String {
    let body = page.map(|p| p.body.as_str()).unwrap_or("");
    let mut content = String::new();

    content.push_str("<p><a href='/'>index</a></p>\n");
    content.push_str(&format!(
        concat!(
            "<form method=\"POST\">\n",
            "<textarea name=\"body\" rows=\"24\">{body}</textarea>\n",
            "<input type=\"submit\">\n",
            "</form>\n",
        ),
        body = escape_html(body),
    ));

    if let Some(p) = page {
        content.push_str(&format!(
            concat!(
                "<form action=\"/pages/edit/{key}/delete\" method=\"POST\">",
                "<input type=\"submit\" value=\"Delete page\"></form>\n",
            ),
            key = p.created_ts,
        ));
    }

    layout(page.map(|p| p.title.as_str()).unwrap_or("New page"), &content)
}

pub fn history(page: &Page, entries: &[History]) -> String {
    let mut content = String::new();
    content.push_str(&format!("<h1>History: {}</h1>\n", escape_html(&page.title)));
    content.push_str(&format!(
        "<p><a href='/pages/{}/'>back to page</a></p>\n",
        page.created_ts
    ));

    if entries.is_empty() {
        content.push_str("<p>No earlier revisions.</p>\n");
    }
    for entry in entries {
        content.push_str(&format!(
            concat!(
                "<article class=\"history-entry\">\n",
                "<h2>{ts}</h2>\n",
                "<pre>{body}</pre>\n",
                "</article>\n",
            ),
            ts = entry.updated_at.to_rfc3339(),
            body = escape_html(&entry.body),
        ));
    }

    layout(&format!("History: {}", page.title), &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let content = format!(
        "<h1>{code} {reason}</h1>\n<p>{message}</p>\n<p><a href='/'>index</a></p>\n",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or(""),
        message = escape_html(message),
    );
    layout(&status.to_string(), &content)
}
