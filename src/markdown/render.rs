use pulldown_cmark::{Options, Parser, html};

use super::math;

/// Render a page body to HTML: math preprocessing, then markdown conversion.
#[must_use]
pub fn render(body: &str) -> String {
    let source = math::preprocess(body);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(&source, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
