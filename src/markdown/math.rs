use regex_lite::Regex;

/// Prepare raw markdown for rendering by marking up math delimiters.
///
/// Two passes, in this order: `$$...$$` spans are wrapped in a block marker
/// element, then underscores inside inline `$...$` spans are escaped so the
/// markdown renderer does not read them as emphasis. Unbalanced or
/// overlapping delimiters fail to pair and pass through as literal text.
#[must_use]
pub fn preprocess(text: &str) -> String {
    escape_inline_math(&wrap_block_math(text))
}

/// Wrap each `$$...$$` span (content free of `$`) in a block-formula div.
/// Surrounding text is carried over verbatim.
fn wrap_block_math(text: &str) -> String {
    let re = Regex::new(r"\$\$[^$]+\$\$").unwrap();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push_str("<div class=\"block-formula\">");
        out.push_str(m.as_str());
        out.push_str("</div>\n");
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Escape underscores inside inline `$...$` spans. A span only counts when
/// neither delimiter touches another `$`; rejected candidates are re-scanned
/// from one character further, so `$$` runs never produce inline spans.
fn escape_inline_math(text: &str) -> String {
    let re = Regex::new(r"\$[^$]+\$").unwrap();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while let Some(m) = re.find(&text[pos..]) {
        let start = pos + m.start();
        let end = pos + m.end();

        let adjacent_before = text[..start].ends_with('$');
        let adjacent_after = text[end..].starts_with('$');
        if adjacent_before || adjacent_after {
            pos = start + 1;
            continue;
        }

        out.push_str(&text[last..start]);
        out.push_str(&text[start..end].replace('_', "\\_"));
        last = end;
        pos = end;
    }
    out.push_str(&text[last..]);
    out
}
