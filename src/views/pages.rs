//! Server-rendered pages

use crate::catalog::{AuthorGroup, Book, YearGroup};

use super::html::{escape, layout, list, table};

pub fn index() -> String {
    layout(
        "Welcome",
        "<p>Browse the catalog by <a href=\"/books\">title</a>, \
         <a href=\"/authors\">author</a>, or <a href=\"/years\">year</a>, \
         <a href=\"/search\">search</a> it, or <a href=\"/create\">add a book</a>.</p>\n",
    )
}

/// Catalog rows without the page chrome
pub fn book_table(books: &[Book]) -> String {
    if books.is_empty() {
        return "<p class=\"empty\">No books found.</p>\n".to_string();
    }

    let rows: Vec<Vec<String>> = books
        .iter()
        .map(|b| {
            vec![
                b.id.clone(),
                b.title.clone(),
                b.author.clone(),
                b.isbn.clone(),
                b.pages.to_string(),
                b.year.to_string(),
            ]
        })
        .collect();

    table(&["ID", "Title", "Author", "ISBN", "Pages", "Year"], &rows)
}

pub fn books(books: &[Book]) -> String {
    layout("Books", &book_table(books))
}

pub fn author_table(groups: &[AuthorGroup]) -> String {
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|g| vec![g.author.clone(), g.titles.join(", ")])
        .collect();
    table(&["Author", "Titles"], &rows)
}

pub fn authors(groups: &[AuthorGroup]) -> String {
    layout("Authors", &author_table(groups))
}

pub fn year_table(groups: &[YearGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("<h2>{}</h2>\n", escape(&group.year)));
        out.push_str(&list(&group.titles));
        out.push('\n');
    }
    out
}

pub fn years(groups: &[YearGroup]) -> String {
    layout("Years", &year_table(groups))
}

/// Search form, followed by results when a query was run
pub fn search(query: &str, results: Option<&[Book]>) -> String {
    let mut body = format!(
        "<form method=\"get\" action=\"/search\">\n\
         <input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"Title, author, or ISBN\" required>\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n",
        escape(query)
    );

    if let Some(books) = results {
        body.push_str(&format!(
            "<p>{} result(s) for &ldquo;{}&rdquo;</p>\n",
            books.len(),
            escape(query)
        ));
        body.push_str(&book_table(books));
    }

    layout("Search", &body)
}

pub fn create_form() -> String {
    let mut body = String::from("<form method=\"post\" action=\"/api/books\">\n");
    for (name, label, kind, required) in [
        ("title", "Title", "text", true),
        ("author", "Author", "text", true),
        ("edition", "ISBN", "text", false),
        ("pages", "Pages", "number", false),
        ("year", "Year", "number", false),
    ] {
        body.push_str(&format!(
            "<label>{label}<input type=\"{kind}\" name=\"{name}\"{req}></label>\n",
            label = label,
            kind = kind,
            name = name,
            req = if required { " required" } else { "" },
        ));
    }
    body.push_str("<button type=\"submit\">Create</button>\n</form>\n");

    layout("Add a book", &body)
}

/// Error page for failed page requests
pub fn error(status: u16, message: &str) -> String {
    layout(
        &format!("Error {}", status),
        &format!("<p class=\"error\">{}</p>\n", escape(message)),
    )
}
