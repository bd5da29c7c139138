//! The pharmacy table and its rating sort.
//!
//! Rows hold the four displayable fields plus the map anchor used for
//! click-to-fly. The header is rendered by the table panel and is never
//! part of the sortable sequence.

use crate::data::PharmacyCollection;
use geo_types::Coord;

/// Column headers, in cell order.
pub const TABLE_HEADERS: [&str; 4] = ["Id", "Name", "Address", "Rating"];

/// One data row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Display text; parsed with `rating_value` when ordering.
    pub rating: String,
    /// Map anchor for click-to-fly. Travels with the row when sorted.
    pub coord: Coord<f64>,
}

impl TableRow {
    /// Rating used for ordering.
    pub fn rating_value(&self) -> f64 {
        rating_value(&self.rating)
    }
}

/// Ordered sequence of data rows.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub rows: Vec<TableRow>,
}

impl TableState {
    /// Rebuilds the rows from a freshly loaded collection, one row per
    /// point feature, in document order.
    pub fn populate(&mut self, collection: &PharmacyCollection) {
        self.rows = collection
            .features
            .iter()
            .map(|p| TableRow {
                id: p.id.clone(),
                name: p.name.clone(),
                address: p.address.clone(),
                rating: p.rating.clone(),
                coord: p.coord,
            })
            .collect();
    }

    /// Sorts the rows by rating, highest to lowest, in place.
    ///
    /// Adjacent-swap passes: any pair ordered ascending is swapped, and
    /// passes repeat until one completes with no swap. Swapping only on
    /// strictly-less keeps equal (and missing, coerced-to-zero) ratings
    /// in their prior relative order.
    pub fn sort_by_rating(&mut self) {
        if self.rows.len() < 2 {
            return;
        }

        let mut swapped = true;
        while swapped {
            swapped = false;
            for i in 0..self.rows.len() - 1 {
                if self.rows[i].rating_value() < self.rows[i + 1].rating_value() {
                    self.rows.swap(i, i + 1);
                    swapped = true;
                }
            }
        }
    }
}

/// Parses a rating for ordering. Missing, unparseable, and NaN values
/// all order as 0.
pub fn rating_value(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, rating: &str) -> TableRow {
        TableRow {
            id: id.to_string(),
            name: format!("Pharmacy {}", id),
            address: String::new(),
            rating: rating.to_string(),
            coord: Coord { x: 0.0, y: 0.0 },
        }
    }

    fn table(ratings: &[&str]) -> TableState {
        TableState {
            rows: ratings
                .iter()
                .enumerate()
                .map(|(i, r)| row(&i.to_string(), r))
                .collect(),
        }
    }

    fn ratings(table: &TableState) -> Vec<String> {
        table.rows.iter().map(|r| r.rating.clone()).collect()
    }

    #[test]
    fn test_sorts_descending() {
        let mut t = table(&["1.2", "4.7", "3.0", "4.9", "2.5"]);
        t.sort_by_rating();
        assert_eq!(ratings(&t), vec!["4.9", "4.7", "3.0", "2.5", "1.2"]);

        for pair in t.rows.windows(2) {
            assert!(pair[0].rating_value() >= pair[1].rating_value());
        }
    }

    #[test]
    fn test_sorted_input_is_unchanged() {
        let mut t = table(&["5.0", "4.0", "3.0"]);
        let before = t.rows.clone();
        t.sort_by_rating();
        assert_eq!(t.rows, before);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut t = table(&["1.0", "3.0", "2.0", "", "3.0"]);
        t.sort_by_rating();
        let once = t.rows.clone();
        t.sort_by_rating();
        assert_eq!(t.rows, once);
    }

    #[test]
    fn test_missing_and_garbage_ratings_sort_as_zero() {
        let mut t = table(&["3.5", "", "4.8", "2.1"]);
        t.sort_by_rating();
        assert_eq!(ratings(&t), vec!["4.8", "3.5", "2.1", ""]);

        let mut t = table(&["not a number", "0.1"]);
        t.sort_by_rating();
        assert_eq!(ratings(&t), vec!["0.1", "not a number"]);
    }

    #[test]
    fn test_empty_and_single_row_tables() {
        let mut t = table(&[]);
        t.sort_by_rating();
        assert!(t.rows.is_empty());

        let mut t = table(&["4.2"]);
        t.sort_by_rating();
        assert_eq!(ratings(&t), vec!["4.2"]);
    }

    #[test]
    fn test_equal_ratings_keep_their_order() {
        let mut t = table(&["3.0", "3.0", "3.0"]);
        t.rows[0].name = "first".to_string();
        t.rows[1].name = "second".to_string();
        t.rows[2].name = "third".to_string();
        t.sort_by_rating();
        let names: Vec<&str> = t.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ties_on_coerced_zero_keep_their_order() {
        let mut t = table(&["", "junk", "0", "5.0"]);
        t.sort_by_rating();
        assert_eq!(ratings(&t), vec!["5.0", "", "junk", "0"]);
    }

    #[test]
    fn test_rating_value_coercion() {
        assert_eq!(rating_value("4.5"), 4.5);
        assert_eq!(rating_value(" 3 "), 3.0);
        assert_eq!(rating_value(""), 0.0);
        assert_eq!(rating_value("four"), 0.0);
        assert_eq!(rating_value("NaN"), 0.0);
        assert_eq!(rating_value("-1.5"), -1.5);
    }

    #[test]
    fn test_populate_builds_one_row_per_feature() {
        use crate::data::Pharmacy;

        let collection = PharmacyCollection {
            features: vec![
                Pharmacy {
                    id: "7".to_string(),
                    name: "Northgate Rx".to_string(),
                    address: "400 5th Ave".to_string(),
                    rating: "4.1".to_string(),
                    coord: Coord { x: -122.32, y: 47.70 },
                },
                Pharmacy {
                    id: "8".to_string(),
                    name: "Harbor Drugs".to_string(),
                    address: String::new(),
                    rating: String::new(),
                    coord: Coord { x: -122.34, y: 47.61 },
                },
            ],
        };

        let mut t = TableState::default();
        t.populate(&collection);

        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].id, "7");
        assert_eq!(t.rows[0].rating, "4.1");
        assert_eq!(t.rows[1].coord, Coord { x: -122.34, y: 47.61 });
    }
}
