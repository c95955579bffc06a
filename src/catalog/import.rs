use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use super::types::{CandidateInput, Catalog, RawValue};

/// Laptop fields a spreadsheet column can supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Price,
    Memory,
    Storage,
    Processor,
    Graphics,
    ScreenSize,
    Rating,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Price,
        Field::Memory,
        Field::Storage,
        Field::Processor,
        Field::Graphics,
        Field::ScreenSize,
        Field::Rating,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Memory => "memory",
            Field::Storage => "storage",
            Field::Processor => "processor",
            Field::Graphics => "graphics",
            Field::ScreenSize => "screen",
            Field::Rating => "rating",
        };
        f.write_str(name)
    }
}

/// Header patterns, matched against the lowercased header. Checked in
/// order; the first pattern that matches decides the field, so "graphics
/// memory" is a graphics column and "cpu name" a processor column.
pub const HEADER_PATTERNS: [(&str, Field); 8] = [
    (r"gpu|vga|graphic", Field::Graphics),
    (r"prosesor|processor|cpu", Field::Processor),
    (r"harga|price", Field::Price),
    (r"ram|memory", Field::Memory),
    (r"storage|ssd|hard.?disk", Field::Storage),
    (r"layar|screen|display", Field::ScreenSize),
    (r"rating|review", Field::Rating),
    (r"nama.*laptop|judul|name|model", Field::Name),
];

/// Column index per field
pub type ColumnMap = BTreeMap<Field, usize>;

/// Outcome of one import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    /// Ids of the laptops that were added, in file order
    pub inserted: Vec<u64>,
    /// Rows that matched an existing laptop and were left out
    pub duplicates: usize,
}

fn header_field(patterns: &[(Regex, Field)], header: &str) -> Option<Field> {
    let header = header.trim().to_lowercase();
    patterns
        .iter()
        .find(|(pattern, _)| pattern.is_match(&header))
        .map(|(_, field)| *field)
}

/// Map spreadsheet headers to laptop fields.
///
/// The first column that maps to a field wins; later columns for the same
/// field are ignored. Every field needs a column.
pub fn map_headers<'a, I>(headers: I) -> Result<ColumnMap>
where
    I: IntoIterator<Item = &'a str>,
{
    let patterns = HEADER_PATTERNS
        .iter()
        .map(|(pattern, field)| Regex::new(pattern).map(|re| (re, *field)))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid header pattern")?;

    let mut columns = ColumnMap::new();
    for (index, header) in headers.into_iter().enumerate() {
        match header_field(&patterns, header) {
            Some(field) => {
                columns.entry(field).or_insert(index);
            }
            None => tracing::debug!(header, "column not recognised, ignored"),
        }
    }

    let missing: Vec<String> = Field::ALL
        .iter()
        .filter(|f| !columns.contains_key(*f))
        .map(|f| f.to_string())
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("No column found for: {}", missing.join(", "));
    }
    Ok(columns)
}

fn row_input(columns: &ColumnMap, record: &csv::StringRecord) -> CandidateInput {
    let cell = |field: Field| {
        columns
            .get(&field)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .trim()
    };
    CandidateInput {
        name: cell(Field::Name).to_string(),
        price: RawValue::parse(cell(Field::Price)),
        memory: RawValue::parse(cell(Field::Memory)),
        storage: RawValue::parse(cell(Field::Storage)),
        processor: cell(Field::Processor).to_string(),
        graphics: cell(Field::Graphics).to_string(),
        screen_size: RawValue::parse(cell(Field::ScreenSize)),
        rating: RawValue::parse(cell(Field::Rating)),
    }
}

/// Read laptops from CSV and add the ones the owner does not have yet.
///
/// The whole file is read before anything is added, so a malformed file
/// leaves the catalog untouched. Blank rows are skipped.
pub fn import_csv<R: Read>(reader: R, catalog: &mut Catalog, owner: &str) -> Result<ImportSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV header")?
        .clone();
    let columns = map_headers(headers.iter())?;

    let mut inputs = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let record = record.with_context(|| format!("Failed to read CSV line {}", line + 2))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        inputs.push(row_input(&columns, &record));
    }

    let mut summary = ImportSummary::default();
    for input in inputs {
        match catalog.add_if_absent(owner, input) {
            Some(id) => summary.inserted.push(id),
            None => summary.duplicates += 1,
        }
    }

    tracing::debug!(
        inserted = summary.inserted.len(),
        duplicates = summary.duplicates,
        %owner,
        "import finished"
    );
    Ok(summary)
}

/// Import a CSV file into the owner's laptops
pub fn import_file(path: &Path, catalog: &mut Catalog, owner: &str) -> Result<ImportSummary> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    import_csv(file, catalog, owner).with_context(|| format!("Failed to import {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Nama Laptop,Harga,RAM,SSD,CPU,VGA,Screen Size,Review
Zenbook 14,1200,16,512,Intel Core i7,RTX 3050,14,4.5
Aspire 5,700,8,256,Ryzen 5,Integrated,15.6,4.1
";

    #[test]
    fn test_map_headers_with_aliases() {
        let headers = [
            "Nama Laptop",
            "Harga",
            "RAM",
            "SSD",
            "CPU",
            "VGA",
            "Screen Size",
            "Review",
        ];
        let columns = map_headers(headers).unwrap();

        assert_eq!(columns[&Field::Name], 0);
        assert_eq!(columns[&Field::Price], 1);
        assert_eq!(columns[&Field::Memory], 2);
        assert_eq!(columns[&Field::Storage], 3);
        assert_eq!(columns[&Field::Processor], 4);
        assert_eq!(columns[&Field::Graphics], 5);
        assert_eq!(columns[&Field::ScreenSize], 6);
        assert_eq!(columns[&Field::Rating], 7);
    }

    #[test]
    fn test_map_headers_english_and_hard_disk() {
        let headers = [
            "Model",
            "Price (USD)",
            "Memory",
            "Hard Disk",
            "Processor",
            "Graphics",
            "Display",
            "Rating",
        ];
        let columns = map_headers(headers).unwrap();
        assert_eq!(columns[&Field::Name], 0);
        assert_eq!(columns[&Field::Storage], 3);
        assert_eq!(columns[&Field::ScreenSize], 6);
    }

    #[test]
    fn test_map_headers_earlier_pattern_wins() {
        let patterns: Vec<_> = HEADER_PATTERNS
            .iter()
            .map(|(p, f)| (Regex::new(p).unwrap(), *f))
            .collect();
        assert_eq!(header_field(&patterns, "Graphics Memory"), Some(Field::Graphics));
        assert_eq!(header_field(&patterns, "CPU name"), Some(Field::Processor));
        assert_eq!(header_field(&patterns, "Weight"), None);
    }

    #[test]
    fn test_map_headers_missing_column() {
        let err = map_headers(["Nama Laptop", "Harga"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("memory"));
        assert!(message.contains("rating"));
        assert!(!message.contains("price"));
    }

    #[test]
    fn test_import_csv_adds_rows() {
        let mut catalog = Catalog::new();
        let summary = import_csv(SHEET.as_bytes(), &mut catalog, "alice").unwrap();

        assert_eq!(summary.inserted, vec![1, 2]);
        assert_eq!(summary.duplicates, 0);

        let laptops = catalog.list("alice");
        assert_eq!(laptops[0].name, "Zenbook 14");
        assert_eq!(laptops[0].price, RawValue::Number(1200.0));
        assert_eq!(laptops[0].storage, RawValue::Number(512.0));
        assert_eq!(laptops[0].processor_score(), 8);
        assert_eq!(laptops[1].screen_size, RawValue::Number(15.6));
    }

    #[test]
    fn test_import_csv_skips_duplicates() {
        let mut catalog = Catalog::new();
        import_csv(SHEET.as_bytes(), &mut catalog, "alice").unwrap();

        // Same file again: nothing new for alice, everything new for bob
        let again = import_csv(SHEET.as_bytes(), &mut catalog, "alice").unwrap();
        assert!(again.inserted.is_empty());
        assert_eq!(again.duplicates, 2);

        let bob = import_csv(SHEET.as_bytes(), &mut catalog, "bob").unwrap();
        assert_eq!(bob.inserted.len(), 2);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_import_csv_duplicate_rows_in_one_file() {
        let sheet = "\
name,price,ram,storage,cpu,gpu,screen,rating
Zenbook 14,1200,16,512,Intel Core i7,RTX 3050,14,4.5
Zenbook 14,1100,16,1024,Intel Core i7,RTX 3050,14,4.7

";
        let mut catalog = Catalog::new();
        let summary = import_csv(sheet.as_bytes(), &mut catalog, "alice").unwrap();
        assert_eq!(summary.inserted.len(), 1);
        assert_eq!(summary.duplicates, 1);
    }

    #[test]
    fn test_import_csv_keeps_bad_cells_as_text() {
        let sheet = "\
name,price,ram,storage,cpu,gpu,screen,rating
Mystery,call us,16,512,Intel Core i5,Intel Iris,14,4
";
        let mut catalog = Catalog::new();
        import_csv(sheet.as_bytes(), &mut catalog, "alice").unwrap();
        let laptop = &catalog.list("alice")[0];
        assert_eq!(laptop.price, RawValue::Text("call us".to_string()));
    }

    #[test]
    fn test_import_csv_bad_header_leaves_catalog_untouched() {
        let mut catalog = Catalog::new();
        let result = import_csv("foo,bar\n1,2\n".as_bytes(), &mut catalog, "alice");
        assert!(result.is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_import_file_missing() {
        let path = std::env::temp_dir().join("laptop_rank_test_no_such_sheet.csv");
        let _ = std::fs::remove_file(&path);

        let mut catalog = Catalog::new();
        let err = import_file(&path, &mut catalog, "alice").unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
