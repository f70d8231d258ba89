//! Starter catalog inserted on first boot

use super::book::BookFields;

pub fn starter_books() -> Vec<BookFields> {
    vec![
        BookFields::new("The Vortex", "José Eustasio Rivera", "958-30-0804-4", 292, 1924),
        BookFields::new("Frankenstein", "Mary Shelley", "978-3-649-64609-9", 280, 1818),
        BookFields::new("The Black Cat", "Edgar Allan Poe", "978-3-99168-238-7", 280, 1843),
    ]
}
