use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Country, GDP per capita (USD), household spending (million US$), centre lat/lon.
/// `None` indicators exercise the loader's drop rule.
const COUNTRIES: [(&str, Option<f64>, Option<f64>, f64, f64); 7] = [
    ("France", Some(40886.0), Some(1_539_000.0), 46.6, 2.4),
    ("Japan", Some(33815.0), Some(2_650_000.0), 36.2, 138.3),
    ("Italy", Some(34776.0), Some(1_170_000.0), 42.8, 12.6),
    ("United States", Some(76330.0), Some(15_902_575.0), 39.8, -98.6),
    ("Thailand", Some(6923.0), Some(276_000.0), 15.9, 100.9),
    ("Denmark", Some(67790.0), Some(179_000.0), 56.0, 9.5),
    ("Taiwan", None, None, 23.7, 121.0),
];

const AWARDS: [&str; 4] = ["3 Stars", "2 Stars", "1 Star", "Bib Gourmand"];
const PRICES: [&str; 5] = ["$", "$$", "$$$", "$$$$", ""];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Row {
    name: String,
    country: &'static str,
    award: &'static str,
    price: &'static str,
    latitude: f64,
    longitude: f64,
    gdp: Option<f64>,
    household: Option<f64>,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (i, &(country, gdp, household, lat, lon)) in COUNTRIES.iter().enumerate() {
        // Uneven counts per country so the regressions have something to fit.
        let count = 3 + (i * 7) % 11;
        for n in 0..count {
            rows.push(Row {
                name: format!("{country} Kitchen {}", n + 1),
                country,
                award: rng.pick(&AWARDS),
                price: rng.pick(&PRICES),
                latitude: lat + (rng.next_f64() - 0.5) * 4.0,
                longitude: lon + (rng.next_f64() - 0.5) * 4.0,
                gdp,
                household,
            });
        }
    }
    rows
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Name",
        "Country",
        "Award",
        "Price",
        "Latitude",
        "Longitude",
        "GDP per Capita (USD)",
        "Household Spending (Million US$)",
    ])?;
    for r in rows {
        writer.write_record([
            r.name.clone(),
            r.country.to_string(),
            r.award.to_string(),
            r.price.to_string(),
            format!("{:.5}", r.latitude),
            format!("{:.5}", r.longitude),
            fmt_opt(r.gdp),
            fmt_opt(r.household),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("Award", DataType::Utf8, true),
        Field::new("Price", DataType::Utf8, true),
        Field::new("Latitude", DataType::Float64, true),
        Field::new("Longitude", DataType::Float64, true),
        Field::new("GDP per Capita (USD)", DataType::Float64, true),
        Field::new("Household Spending (Million US$)", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.award))),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| (!r.price.is_empty()).then_some(r.price))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.gdp).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.household).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "sample_michelin.csv")?;
    write_parquet(&rows, "sample_michelin.parquet")?;

    println!(
        "Wrote {} restaurants across {} countries to sample_michelin.csv and sample_michelin.parquet",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
