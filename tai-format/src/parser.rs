//! Format string parser

use crate::directive::{Directive, Item};
use crate::FormatError;

/// Split a format string into literal runs and directives
///
/// Literals borrow from `format`. A `%` with nothing after it is an error.
pub fn parse(format: &str) -> Result<Vec<Item<'_>>, FormatError> {
    let mut items = Vec::new();
    let mut literal_start = 0;
    let mut chars = format.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '%' {
            continue;
        }
        if literal_start < i {
            items.push(Item::Literal(&format[literal_start..i]));
        }
        let (j, d) = chars.next().ok_or(FormatError::TrailingEscape)?;
        items.push(Item::Directive(Directive::from_char(d)?));
        literal_start = j + d.len_utf8();
    }

    if literal_start < format.len() {
        items.push(Item::Literal(&format[literal_start..]));
    }
    Ok(items)
}
