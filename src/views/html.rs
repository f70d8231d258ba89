//! HTML building blocks

/// Escape text for element content and quoted attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const NAV: [(&str, &str); 5] = [
    ("/books", "Books"),
    ("/authors", "Authors"),
    ("/years", "Years"),
    ("/search", "Search"),
    ("/create", "Add a book"),
];

/// Wrap a body fragment in the shared page chrome.
///
/// `body` must already be escaped.
pub fn layout(title: &str, body: &str) -> String {
    let mut nav = String::new();
    for (href, label) in NAV {
        nav.push_str(&format!("<a href=\"{}\">{}</a>\n", href, label));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title} | Bookstore</title>\n\
         <link rel=\"stylesheet\" href=\"/css/style.css\">\n\
         </head>\n\
         <body>\n\
         <header><a class=\"brand\" href=\"/\">Bookstore</a>\n<nav>\n{nav}</nav></header>\n\
         <main>\n<h1>{title}</h1>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        nav = nav,
        body = body,
    )
}

/// A table with a header row; cells are escaped
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for header in headers {
        out.push_str(&format!("<th>{}</th>", escape(header)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// Bulleted list; items are escaped
pub fn list(items: &[String]) -> String {
    let mut out = String::from("<ul>");
    for item in items {
        out.push_str(&format!("<li>{}</li>", escape(item)));
    }
    out.push_str("</ul>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_layout_escapes_title() {
        let page = layout("A & B", "<p>ok</p>");
        assert!(page.contains("<title>A &amp; B | Bookstore</title>"));
        assert!(page.contains("<p>ok</p>"));
        assert!(page.contains("href=\"/css/style.css\""));
    }

    #[test]
    fn test_table_escapes_cells() {
        let html = table(&["Title"], &[vec!["<b>".to_string()]]);
        assert!(html.contains("<th>Title</th>"));
        assert!(html.contains("<td>&lt;b&gt;</td>"));
    }
}
