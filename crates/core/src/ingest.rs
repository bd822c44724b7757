use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::IngestError;
use crate::model::{Record, Scalar};

/// Records from a JSON array.
pub fn from_json(reader: impl Read) -> Result<Vec<Record>, IngestError> {
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    name: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    index: Option<String>,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        let text = |s: Option<String>| s.filter(|v| !v.is_empty()).map(Scalar::Text);
        Record {
            id: Scalar::Text(row.id),
            parent: text(row.parent),
            name: row.name,
            value: text(row.value),
            index: text(row.index),
        }
    }
}

/// Records from CSV with an `id,parent,name,value,index` header.
pub fn from_csv(reader: impl Read) -> Result<Vec<Record>, IngestError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        out.push(row?.into());
    }
    Ok(out)
}

/// Load by file extension: `.csv` is CSV, anything else JSON.
pub fn from_path(path: &Path) -> Result<Vec<Record>, IngestError> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        from_csv(file)
    } else {
        from_json(file)
    }
}
