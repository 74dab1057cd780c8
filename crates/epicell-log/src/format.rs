//! Constants shared by the log writer and reader.

use epicell_core::CellId;

use crate::error::LogError;

/// Field separator.
pub const SEPARATOR: char = ';';

/// First line of every log; tells spreadsheet tools which separator to use.
pub const SEPARATOR_LINE: &str = "sep=;";

/// Column header, the second line of every log.
pub const HEADER: &str = "time;model_id;model_name;port_name;data";

/// Number of fields in a data row.
pub(crate) const FIELD_COUNT: usize = 5;

/// `true` if `id` can be written as a `model_name` field without
/// breaking the row structure.
pub(crate) fn is_representable(id: &str) -> bool {
    !id.contains([SEPARATOR, '\n', '\r'])
}

/// Check up front that every id in `ids` can be logged.
///
/// Lets a caller reject a network before creating any output, instead
/// of discovering the first bad id from [`CsvStateLogger::finish`].
///
/// [`CsvStateLogger::finish`]: crate::CsvStateLogger::finish
///
/// # Errors
///
/// [`LogError::UnrepresentableId`] naming the first offending id.
pub fn check_ids<'a>(ids: impl IntoIterator<Item = &'a CellId>) -> Result<(), LogError> {
    match ids.into_iter().find(|id| !is_representable(id.as_str())) {
        Some(cell) => Err(LogError::UnrepresentableId { cell: cell.clone() }),
        None => Ok(()),
    }
}
