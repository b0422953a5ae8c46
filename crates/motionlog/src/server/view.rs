//! HTML rendering for the motion log page.

use crate::entry::MotionLogEntry;

/// Render the listing page. Entries are shown in the order given.
#[must_use]
pub fn render_listing(entries: &[MotionLogEntry]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Motion Logs</title>\n\
         <style>\n\
         body { font-family: sans-serif; margin: 2rem; }\n\
         table { border-collapse: collapse; }\n\
         th, td { border: 1px solid #ccc; padding: 0.3rem 0.8rem; text-align: left; }\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <h1>Motion Logs</h1>\n",
    );

    if entries.is_empty() {
        html.push_str("<p class=\"empty\">No motion events recorded yet.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr><th>ID</th><th>Timestamp</th></tr></thead>\n<tbody>\n");
        let rows: String = entries.iter().map(render_row).collect();
        html.push_str(&rows);
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_row(entry: &MotionLogEntry) -> String {
    format!(
        "<tr class=\"entry\" data-id=\"{id}\"><td>{id}</td><td>{timestamp}</td></tr>\n",
        id = entry.id,
        timestamp = escape_html(&entry.timestamp.to_string()),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
