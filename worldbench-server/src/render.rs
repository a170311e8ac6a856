//! Fortunes page markup

use std::fmt::Write;

use crate::models::Fortune;

const PAGE_HEAD: &str = "<!DOCTYPE html><html><head><title>Fortunes</title></head><body>\
<table><tr><th>id</th><th>message</th></tr>";
const PAGE_TAIL: &str = "</table></body></html>";

/// Render the fortunes table. Rows are written in the given order.
pub fn fortunes_html(fortunes: &[Fortune]) -> String {
    let mut out = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + fortunes.len() * 96);
    out.push_str(PAGE_HEAD);
    for fortune in fortunes {
        // Writing to a String cannot fail.
        let _ = write!(out, "<tr><td>{}</td><td>", fortune.id);
        escape_into(&mut out, &fortune.message);
        out.push_str("</td></tr>");
    }
    out.push_str(PAGE_TAIL);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
