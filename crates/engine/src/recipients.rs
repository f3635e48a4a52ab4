//! Recipient extraction for the email step.

use crate::header::{field_at, find_column_containing};
use crate::rows::RowSequence;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientError {
    /// Nothing loaded (or nothing enriched yet).
    NoData,
    /// No header contains "email".
    NoEmailColumn,
    /// The email column exists but every value is blank.
    NoRecipients,
}

impl std::fmt::Display for RecipientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipientError::NoData => write!(f, "no enriched data to email"),
            RecipientError::NoEmailColumn => write!(f, "no email column found in the data"),
            RecipientError::NoRecipients => write!(f, "no emails found to send"),
        }
    }
}

impl std::error::Error for RecipientError {}

/// Addresses from the first column whose header mentions "email".
///
/// Values are trimmed and blanks skipped. The first matching column wins,
/// so `Apollo Email` beats `ContactOut Email` when both exist.
pub fn collect_recipients(rows: &RowSequence) -> Result<Vec<String>, RecipientError> {
    if rows.is_empty() {
        return Err(RecipientError::NoData);
    }
    let index = find_column_containing(&rows.header(), "email")
        .ok_or(RecipientError::NoEmailColumn)?;

    let emails: Vec<String> = rows
        .data_rows()
        .iter()
        .filter_map(|row| field_at(row, index))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    if emails.is_empty() {
        return Err(RecipientError::NoRecipients);
    }
    Ok(emails)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::parse;

    #[test]
    fn collects_from_first_email_column() {
        let rows = parse("Name,Apollo Email,ContactOut Email\nA,a@x.io,c@x.io\nB,,d@x.io\nC, e@x.io ");
        assert_eq!(collect_recipients(&rows).unwrap(), ["a@x.io", "e@x.io"]);
    }

    #[test]
    fn errors() {
        assert_eq!(collect_recipients(&RowSequence::default()), Err(RecipientError::NoData));
        assert_eq!(
            collect_recipients(&parse("Name,Org\nA,B")),
            Err(RecipientError::NoEmailColumn)
        );
        assert_eq!(
            collect_recipients(&parse("Name,Email\nA,\nB, ")),
            Err(RecipientError::NoRecipients)
        );
    }
}
