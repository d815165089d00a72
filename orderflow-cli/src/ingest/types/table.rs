//! Tabular view of a decoded worksheet

/// One data row of a worksheet, cells rendered to strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based row number in the sheet (header is row 1)
    pub number: usize,
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Row { number, cells }
    }

    /// Cell at `col`, or "" for ragged rows
    pub fn get(&self, col: usize) -> &str {
        self.cells.get(col).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Table { headers, rows }
    }

    /// Build from plain string rows; numbering starts after the header
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| Row::new(i + 2, cells.iter().map(|c| c.to_string()).collect()))
            .collect();
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column whose header equals `header`
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}
