use polars::prelude::*;
use std::env;
use std::fs::File;

// Melts the wide letters table (one column per recipient) into one
// `source,target,letters` row per cell, row order then column order.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "test-data.csv".to_string());
    let output = args.next().unwrap_or_else(|| "test-data-edges.csv".to_string());

    let df = CsvReader::from_path(&input)?
        .infer_schema(None)
        .has_header(true)
        .finish()?;

    let names = df.get_column_names();
    let (id_column, recipients) = names
        .split_first()
        .ok_or("letters table has no columns")?;

    // Keep every cell as text; letter counts are parsed downstream
    let writers = df.column(id_column)?.cast(&DataType::Utf8)?;
    let writers = writers.utf8()?;
    let columns = recipients
        .iter()
        .map(|name| -> PolarsResult<Utf8Chunked> {
            let column = df.column(name)?.cast(&DataType::Utf8)?;
            Ok(column.utf8()?.clone())
        })
        .collect::<PolarsResult<Vec<Utf8Chunked>>>()?;

    let mut sources: Vec<String> = Vec::new();
    let mut targets: Vec<String> = Vec::new();
    let mut letters: Vec<Option<String>> = Vec::new();

    for row in 0..df.height() {
        let writer = writers.get(row).unwrap_or_default();
        for (recipient, column) in recipients.iter().zip(&columns) {
            sources.push(writer.to_string());
            targets.push(recipient.to_string());
            letters.push(column.get(row).map(str::to_string));
        }
    }

    let mut edges = DataFrame::new(vec![
        Series::new("source", sources),
        Series::new("target", targets),
        Series::new("letters", letters),
    ])?;

    // print the first 5 rows
    println!("{:?}", edges.head(Some(5)));

    let mut file = File::create(&output)?;
    CsvWriter::new(&mut file).finish(&mut edges)?;
    println!("{} cells written to {}", edges.height(), output);

    Ok(())
}
