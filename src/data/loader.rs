use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{
    Dataset, RawRecord, COL_AWARD, COL_COUNTRY, COL_GDP, COL_HOUSEHOLD, COL_LATITUDE,
    COL_LONGITUDE, COL_NAME, COL_PRICE, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not resolve to a readable file.
    #[error("data file {} is unavailable: {source}", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("malformed CSV")]
    Csv(#[from] csv::Error),
    #[error("malformed Parquet")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("malformed Arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the restaurant table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`REQUIRED_COLUMNS`]
/// * `.parquet` – same columns, string and numeric Arrow types
///
/// Rows missing either economic indicator are dropped here and counted in
/// [`Dataset::dropped_rows`].
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let unavailable = |source| LoadError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unavailable)?;
    // Directories open fine on Unix but are not readable tables.
    if !file.metadata().map_err(unavailable)?.is_file() {
        return Err(unavailable(std::io::Error::other("not a regular file")));
    }

    let dataset = match ext.as_str() {
        "csv" => load_csv(file)?,
        "parquet" | "pq" => load_parquet(file)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    if dataset.is_empty() {
        log::warn!("{} contains no usable restaurant rows", path.display());
    }
    log::info!(
        "Loaded {} restaurants from {} ({} rows dropped for missing indicators)",
        dataset.len(),
        path.display(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

fn check_columns<'a>(present: impl Iterator<Item = &'a str> + Clone) -> Result<(), LoadError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.clone().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(file: File) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(file);
    let headers = reader.headers()?.clone();
    check_columns(headers.iter())?;

    let records = reader
        .deserialize::<RawRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(file: File) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    check_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let name = column(&batch, COL_NAME)?;
        let country = column(&batch, COL_COUNTRY)?;
        let award = column(&batch, COL_AWARD)?;
        let price = column(&batch, COL_PRICE)?;
        let latitude = column(&batch, COL_LATITUDE)?;
        let longitude = column(&batch, COL_LONGITUDE)?;
        let gdp = column(&batch, COL_GDP)?;
        let household = column(&batch, COL_HOUSEHOLD)?;

        for row in 0..batch.num_rows() {
            records.push(RawRecord {
                name: string_cell(name, row).unwrap_or_default(),
                country: string_cell(country, row).unwrap_or_default(),
                award: string_cell(award, row),
                price: string_cell(price, row),
                latitude: float_cell(latitude, row),
                longitude: float_cell(longitude, row),
                gdp_per_capita: float_cell(gdp, row),
                household_spending: float_cell(household, row),
            });
        }
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>, LoadError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumns(vec![name.to_string()]))?;
    Ok(batch.column(idx))
}

/// Read a string cell; non-string columns yield `None`.
fn string_cell(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Read a numeric cell as `f64`; anything else is treated as missing.
fn float_cell(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use crate::data::model::Award;

    const HEADER: &str = "Name,Address,Country,Award,Price,Latitude,Longitude,GDP per Capita (USD),Household Spending (Million US$)";

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        write!(file, "{body}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::DataUnavailable { .. }));
    }

    #[test]
    fn test_directory_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restaurants.csv");
        std::fs::create_dir(&path).unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::DataUnavailable { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn test_load_csv_drops_rows_and_derives() {
        let file = write_csv(
            "Le Nord,1 rue,France,3 Stars ,€€€€,48.8,2.3,40000,1500000\n\
             Taco,2 calle,Mexico,Bib Gourmand,$,19.4,-99.1,10000,\n\
             Sushi,3 chome,Japan, bib gourmand,,35.6,139.7,35000,2800000\n\
             Odd,4 road,Japan,Selected,$$,,,35000,2800000\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.dropped_rows, 1);

        let nord = &ds.restaurants[0];
        assert_eq!(nord.award, Some(Award::ThreeStars));
        assert_eq!(nord.star_numeric, Some(3));
        assert_eq!(nord.price_numeric, Some(4));

        let sushi = &ds.restaurants[1];
        assert_eq!(sushi.award_text, "bib gourmand");
        assert_eq!(sushi.star_numeric, None);
        assert_eq!(sushi.price_numeric, None);

        let odd = &ds.restaurants[2];
        assert_eq!(odd.award, None);
        assert_eq!(odd.latitude, None);
    }

    #[test]
    fn test_csv_missing_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Country,Award").unwrap();
        writeln!(file, "A,France,1 Star").unwrap();
        file.flush().unwrap();

        let err = load_file(file.path()).unwrap_err();
        match err {
            LoadError::MissingColumns(cols) => {
                assert!(cols.contains(&COL_GDP.to_string()));
                assert!(!cols.contains(&COL_NAME.to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_NAME, DataType::Utf8, false),
            Field::new(COL_COUNTRY, DataType::Utf8, false),
            Field::new(COL_AWARD, DataType::Utf8, true),
            Field::new(COL_PRICE, DataType::Utf8, true),
            Field::new(COL_LATITUDE, DataType::Float64, true),
            Field::new(COL_LONGITUDE, DataType::Float64, true),
            Field::new(COL_GDP, DataType::Int64, true),
            Field::new(COL_HOUSEHOLD, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec!["Italy", "Italy"])),
                Arc::new(StringArray::from(vec![Some("2 Stars"), None])),
                Arc::new(StringArray::from(vec![Some("$$$"), Some("$")])),
                Arc::new(Float64Array::from(vec![Some(41.9), None])),
                Arc::new(Float64Array::from(vec![Some(12.5), None])),
                Arc::new(Int64Array::from(vec![Some(34000), None])),
                Arc::new(Float64Array::from(vec![Some(1_200_000.0), Some(1.0)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(File::create(file.path()).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 1);
        let r = &ds.restaurants[0];
        assert_eq!(r.gdp_per_capita, 34000.0);
        assert_eq!(r.star_numeric, Some(2));
        assert_eq!(r.price_numeric, Some(3));
        assert_eq!(r.latitude, Some(41.9));
    }
}
