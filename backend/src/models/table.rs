//! Tabular representation shared by every exported artifact.

use chrono::NaiveDate;

/// A single typed value in an output table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(Cell::text).unwrap_or(Cell::Missing)
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map(Cell::Date).unwrap_or(Cell::Missing)
    }

    pub fn year(value: Option<i32>) -> Self {
        value.map(|y| Cell::Int(y as i64)).unwrap_or(Cell::Missing)
    }

    /// Text form written to delimited artifacts.
    ///
    /// NaN and missing values render empty, infinities as `inf` / `-inf`.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(value) => value.clone(),
            Cell::Int(value) => value.to_string(),
            Cell::Number(value) => format_number(*value),
            Cell::Date(value) => value.format("%Y-%m-%d").to_string(),
            Cell::Missing => String::new(),
        }
    }
}

/// Shortest round-trip decimal form of a float.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        value.to_string()
    }
}

/// A row type with a fixed, ordered column schema.
pub trait IntoTable {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

/// An ordered set of columns and rows ready to be exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_rows<T: IntoTable>(rows: &[T]) -> Self {
        Self {
            columns: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows.iter().map(IntoTable::cells).collect(),
        }
    }

    pub fn single<T: IntoTable>(row: &T) -> Self {
        Self::from_rows(std::slice::from_ref(row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Rendered text of every row, in column order.
    pub fn rendered_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::render).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numbers() {
        assert_eq!(Cell::Number(150.0).render(), "150");
        assert_eq!(Cell::Number(0.5).render(), "0.5");
        assert_eq!(Cell::Number(f64::NAN).render(), "");
        assert_eq!(Cell::Number(f64::INFINITY).render(), "inf");
        assert_eq!(Cell::Number(f64::NEG_INFINITY).render(), "-inf");
        assert_eq!(Cell::Int(2021).render(), "2021");
    }

    #[test]
    fn test_render_dates_and_missing() {
        let d = NaiveDate::from_ymd_opt(2022, 3, 1);
        assert_eq!(Cell::date(d).render(), "2022-03-01");
        assert_eq!(Cell::date(None).render(), "");
        assert_eq!(Cell::optional_text(None), Cell::Missing);
    }

    struct Pair(&'static str, i64);

    impl IntoTable for Pair {
        const COLUMNS: &'static [&'static str] = &["name", "value"];

        fn cells(&self) -> Vec<Cell> {
            vec![Cell::text(self.0), Cell::Int(self.1)]
        }
    }

    #[test]
    fn test_table_from_rows() {
        let table = Table::from_rows(&[Pair("a", 1), Pair("b", 2)]);
        assert_eq!(table.columns, vec!["name", "value"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("value"), Some(1));
        let rendered: Vec<Vec<String>> = table.rendered_rows().collect();
        assert_eq!(rendered[1], vec!["b", "2"]);
    }

    #[test]
    fn test_empty_table_keeps_columns() {
        let table = Table::from_rows::<Pair>(&[]);
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 2);
    }
}
