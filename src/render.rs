//! HTML pages for the browser interface.

use crate::listing::{EntryRecord, Listing};

/// Escape HTML entities
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse}\
td,th{padding:.25em 1em;text-align:left}\
tr:nth-child(even){background:#f4f4f4}\
.error{color:#b00020}";

fn page(title: &str, header: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{header}</h1>\n{content}\n</body>\n</html>\n",
        title = html_escape(title),
        header = html_escape(header),
    )
}

fn files_href(virtual_path: &str) -> String {
    format!("/files?path={}", urlencoding::encode(virtual_path))
}

/// Landing page linking to the root listing.
pub fn index_page(title: &str) -> String {
    let content = format!(
        "<p><a href=\"{}\">Browse files</a></p>",
        html_escape(&files_href("/"))
    );
    page(title, "/", &content)
}

fn entry_row(entry: &EntryRecord) -> String {
    let label = if entry.is_dir && !entry.is_parent() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };
    let size = entry.size_display.as_deref().unwrap_or("-");
    let modified = entry
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    format!(
        "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
        html_escape(&files_href(&entry.path)),
        html_escape(&label),
        size,
        modified,
    )
}

/// Directory listing table.
pub fn listing_page(title: &str, listing: &Listing) -> String {
    let rows: String = listing.entries.iter().map(entry_row).collect();
    let content = format!(
        "<table>\n<tr><th>Name</th><th>Size</th><th>Modified</th></tr>\n{rows}</table>"
    );
    page(title, &listing.path, &content)
}

pub fn error_page(title: &str, header: &str, message: &str) -> String {
    let content = format!("<p class=\"error\">{}</p>", html_escape(message));
    page(title, header, &content)
}
