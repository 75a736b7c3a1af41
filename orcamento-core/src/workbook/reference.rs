//! A1-style cell and range references.
//!
//! Only the subset needed to address template cells and data-validation
//! sources is supported: single cells (`B3`, `$B$3`), rectangles
//! (`A1:C10`), whole columns (`D:D`) and whole rows (`1:3`).

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

/// Largest column index in an OOXML worksheet (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;
/// Largest row index in an OOXML worksheet.
pub const MAX_ROW: u32 = 1_048_576;

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+)$").expect("valid cell regex"));
static COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})$").expect("valid column regex"));
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([0-9]+)$").expect("valid row regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("invalid cell reference '{0}'")]
    InvalidCell(String),

    #[error("invalid range reference '{0}'")]
    InvalidRange(String),
}

/// A single cell address, 1-based in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    pub const fn new(
        col: u32,
        row: u32,
    ) -> Self {
        Self { col, row }
    }
}

impl FromStr for CellRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReferenceError::InvalidCell(s.to_string());
        let caps = CELL_RE.captures(s.trim()).ok_or_else(invalid)?;
        let col = column_index(&caps[1]).ok_or_else(invalid)?;
        let row = parse_row(&caps[2]).ok_or_else(invalid)?;
        Ok(Self { col, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

/// Rectangles up to this many cells are read without consulting the sheet's
/// used extent.
pub const UNCLIPPED_CELL_LIMIT: u64 = 65_536;

/// A rectangular area of a sheet.
///
/// Whole-column and whole-row forms stay open-ended until they are clipped
/// against the used extent of a concrete sheet with [`RangeRef::bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRef {
    Cells { start: CellRef, end: CellRef },
    Columns { first: u32, last: u32 },
    Rows { first: u32, last: u32 },
}

impl RangeRef {
    pub fn contains(
        &self,
        cell: CellRef,
    ) -> bool {
        match *self {
            Self::Cells { start, end } => {
                (start.col..=end.col).contains(&cell.col) && (start.row..=end.row).contains(&cell.row)
            }
            Self::Columns { first, last } => (first..=last).contains(&cell.col),
            Self::Rows { first, last } => (first..=last).contains(&cell.row),
        }
    }

    /// Returns the top-left and bottom-right corners of the range.
    ///
    /// `extent` yields the highest used cell of the sheet and is only called
    /// for open-ended ranges and for rectangles larger than
    /// [`UNCLIPPED_CELL_LIMIT`]. Those are clipped to it, giving `None` when
    /// nothing of the range lies inside the used area.
    pub fn bounds(
        &self,
        extent: impl FnOnce() -> Option<CellRef>,
    ) -> Option<(CellRef, CellRef)> {
        let (start, end) = match *self {
            Self::Cells { start, end } => {
                let area = u64::from(end.col - start.col + 1) * u64::from(end.row - start.row + 1);
                if area <= UNCLIPPED_CELL_LIMIT {
                    return Some((start, end));
                }
                (start, end)
            }
            Self::Columns { first, last } => (CellRef::new(first, 1), CellRef::new(last, MAX_ROW)),
            Self::Rows { first, last } => (CellRef::new(1, first), CellRef::new(MAX_COLUMN, last)),
        };

        let extent = extent()?;
        let end = CellRef::new(end.col.min(extent.col), end.row.min(extent.row));
        (start.col <= end.col && start.row <= end.row).then_some((start, end))
    }
}

impl FromStr for RangeRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ReferenceError::InvalidRange(s.to_string());

        let Some((left, right)) = text.split_once(':') else {
            let cell: CellRef = text.parse().map_err(|_| invalid())?;
            return Ok(Self::Cells {
                start: cell,
                end: cell,
            });
        };

        if let (Ok(a), Ok(b)) = (left.parse::<CellRef>(), right.parse::<CellRef>()) {
            return Ok(Self::Cells {
                start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
                end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
            });
        }

        if let (Some(a), Some(b)) = (COLUMN_RE.captures(left), COLUMN_RE.captures(right)) {
            let a = column_index(&a[1]).ok_or_else(invalid)?;
            let b = column_index(&b[1]).ok_or_else(invalid)?;
            return Ok(Self::Columns {
                first: a.min(b),
                last: a.max(b),
            });
        }

        if let (Some(a), Some(b)) = (ROW_RE.captures(left), ROW_RE.captures(right)) {
            let a = parse_row(&a[1]).ok_or_else(invalid)?;
            let b = parse_row(&b[1]).ok_or_else(invalid)?;
            return Ok(Self::Rows {
                first: a.min(b),
                last: a.max(b),
            });
        }

        Err(invalid())
    }
}

/// Parses a space-separated sqref (`"B3 D1:D9"`), skipping malformed parts.
pub fn parse_sqref(sqref: &str) -> Vec<RangeRef> {
    sqref
        .split_whitespace()
        .filter_map(|part| match part.parse() {
            Ok(range) => Some(range),
            Err(error) => {
                tracing::debug!(%error, "skipping sqref part");
                None
            }
        })
        .collect()
}

/// Converts column letters (`"A"`, `"xfd"`) to a 1-based index.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    (index <= MAX_COLUMN).then_some(index)
}

/// Converts a 1-based column index to letters (`28` → `"AB"`).
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn parse_row(digits: &str) -> Option<u32> {
    digits
        .parse::<u32>()
        .ok()
        .filter(|row| (1..=MAX_ROW).contains(row))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_plain_and_anchored_cells() {
        assert_eq!("B3".parse::<CellRef>().unwrap(), CellRef::new(2, 3));
        assert_eq!("$B$3".parse::<CellRef>().unwrap(), CellRef::new(2, 3));
        assert_eq!("i4".parse::<CellRef>().unwrap(), CellRef::new(9, 4));
        assert_eq!("XFD1048576".parse::<CellRef>().unwrap(), CellRef::new(16_384, 1_048_576));
    }

    #[test]
    fn rejects_out_of_bounds_cells() {
        assert!("B0".parse::<CellRef>().is_err());
        assert!("XFE1".parse::<CellRef>().is_err());
        assert!("A1048577".parse::<CellRef>().is_err());
        assert!("3B".parse::<CellRef>().is_err());
        assert!("".parse::<CellRef>().is_err());
    }

    #[test]
    fn displays_as_a1() {
        assert_eq!(CellRef::new(9, 4).to_string(), "I4");
        assert_eq!(CellRef::new(28, 10).to_string(), "AB10");
        assert_eq!(column_letters(16_384), "XFD");
    }

    #[test]
    fn range_bounds_are_normalised() {
        let range: RangeRef = "B2:A1".parse().unwrap();

        assert_eq!(
            range,
            RangeRef::Cells {
                start: CellRef::new(1, 1),
                end: CellRef::new(2, 2),
            }
        );
    }

    #[test]
    fn single_cell_is_a_one_by_one_range() {
        let range: RangeRef = "$D$7".parse().unwrap();

        assert!(range.contains(CellRef::new(4, 7)));
        assert!(!range.contains(CellRef::new(4, 8)));
    }

    #[test]
    fn whole_column_is_clipped_to_extent() {
        let range: RangeRef = "D:D".parse().unwrap();

        assert!(range.contains(CellRef::new(4, 900)));
        assert_eq!(
            range.bounds(|| Some(CellRef::new(6, 12))),
            Some((CellRef::new(4, 1), CellRef::new(4, 12)))
        );
        assert_eq!(range.bounds(|| None), None);
        assert_eq!(range.bounds(|| Some(CellRef::new(3, 12))), None);
    }

    #[test]
    fn whole_row_is_clipped_to_extent() {
        let range: RangeRef = "$2:3".parse().unwrap();

        assert_eq!(
            range.bounds(|| Some(CellRef::new(5, 40))),
            Some((CellRef::new(1, 2), CellRef::new(5, 3)))
        );
    }

    #[test]
    fn small_rectangle_ignores_extent() {
        let range: RangeRef = "$K$1:$K$20".parse().unwrap();

        let bounds = range.bounds(|| panic!("extent not needed for a small rectangle"));

        assert_eq!(bounds, Some((CellRef::new(11, 1), CellRef::new(11, 20))));
    }

    #[test]
    fn huge_rectangle_is_clipped_to_extent() {
        let range: RangeRef = "$A$1:$XFD$1048576".parse().unwrap();

        assert_eq!(
            range.bounds(|| Some(CellRef::new(3, 7))),
            Some((CellRef::new(1, 1), CellRef::new(3, 7)))
        );
        assert_eq!(range.bounds(|| None), None);
    }

    #[test]
    fn huge_rectangle_outside_used_area_is_empty() {
        let range: RangeRef = "Z100:XFD1048576".parse().unwrap();

        assert_eq!(range.bounds(|| Some(CellRef::new(3, 7))), None);
    }

    #[test]
    fn malformed_ranges_are_errors() {
        assert!("A1:".parse::<RangeRef>().is_err());
        assert!("A1:B".parse::<RangeRef>().is_err());
        assert!("Lists".parse::<RangeRef>().is_err());
        assert!("A1:B2:C3".parse::<RangeRef>().is_err());
    }

    #[test]
    fn sqref_skips_malformed_parts() {
        let ranges = parse_sqref("B3  D1:D3 junk!");

        assert_eq!(ranges.len(), 2);
        assert!(ranges[0].contains(CellRef::new(2, 3)));
        assert!(ranges[1].contains(CellRef::new(4, 2)));
    }
}
