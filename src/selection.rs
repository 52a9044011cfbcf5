//! Choosing which detected chapters to export

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid selection token: {0:?}")]
    InvalidToken(String),

    #[error("Chapter {number} is out of range (1-{total})")]
    OutOfRange { number: usize, total: usize },

    #[error("Reversed range: {start}-{end}")]
    ReversedRange { start: usize, end: usize },
}

/// A set of chapters, stored as ascending 0-based indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
    total: usize,
}

impl Selection {
    pub fn all(total: usize) -> Self {
        Self {
            indices: (0..total).collect(),
            total,
        }
    }

    pub fn none(total: usize) -> Self {
        Self {
            indices: Vec::new(),
            total,
        }
    }

    /// Parse a selection over `total` chapters
    ///
    /// Accepts `all`, `none`, or a comma-separated list of 1-based chapter
    /// numbers and inclusive ranges, e.g. `1-3, 7, 10~12`.
    pub fn parse(expr: &str, total: usize) -> Result<Self, SelectionError> {
        let expr = expr.trim();
        match expr.to_lowercase().as_str() {
            "all" | "*" => return Ok(Self::all(total)),
            "none" | "" => return Ok(Self::none(total)),
            _ => {}
        }

        let mut chosen = vec![false; total];
        for token in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (start, end) = match token.split_once(['-', '~']) {
                Some((start, end)) => (parse_number(start, token)?, parse_number(end, token)?),
                None => {
                    let number = parse_number(token, token)?;
                    (number, number)
                }
            };

            if start > end {
                return Err(SelectionError::ReversedRange { start, end });
            }
            for number in [start, end] {
                if number == 0 || number > total {
                    return Err(SelectionError::OutOfRange { number, total });
                }
            }

            chosen[start - 1..end].iter_mut().for_each(|slot| *slot = true);
        }

        let indices = chosen
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect();

        Ok(Self { indices, total })
    }

    /// Every chapter not currently selected
    pub fn invert(&self) -> Self {
        let indices = (0..self.total)
            .filter(|i| self.indices.binary_search(i).is_err())
            .collect();
        Self {
            indices,
            total: self.total,
        }
    }

    /// Selected 0-based indices, ascending
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn parse_number(raw: &str, token: &str) -> Result<usize, SelectionError> {
    raw.trim()
        .parse()
        .map_err(|_| SelectionError::InvalidToken(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_and_none() {
        assert_eq!(Selection::parse("all", 3).unwrap().indices(), &[0, 1, 2]);
        assert_eq!(Selection::parse(" ALL ", 2).unwrap().len(), 2);
        assert!(Selection::parse("none", 3).unwrap().is_empty());
        assert!(Selection::parse("", 3).unwrap().is_empty());
    }

    #[test]
    fn test_numbers_and_ranges() {
        let selection = Selection::parse("7, 1-3,10~11", 12).unwrap();
        assert_eq!(selection.indices(), &[0, 1, 2, 6, 9, 10]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let selection = Selection::parse("2,2,1-3", 5).unwrap();
        assert_eq!(selection.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_invert() {
        let selection = Selection::parse("2,4", 5).unwrap().invert();
        assert_eq!(selection.indices(), &[0, 2, 4]);
        assert_eq!(Selection::all(3).invert(), Selection::none(3));
        assert_eq!(Selection::none(3).invert(), Selection::all(3));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            Selection::parse("0", 3).unwrap_err(),
            SelectionError::OutOfRange { number: 0, total: 3 }
        );
        assert_eq!(
            Selection::parse("2-9", 3).unwrap_err(),
            SelectionError::OutOfRange { number: 9, total: 3 }
        );
        assert_eq!(
            Selection::parse("3-1", 3).unwrap_err(),
            SelectionError::ReversedRange { start: 3, end: 1 }
        );
        assert!(matches!(
            Selection::parse("1,x", 3),
            Err(SelectionError::InvalidToken(_))
        ));
    }
}
