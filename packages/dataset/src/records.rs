//! Delimited accident records reader.
//!
//! Checks the header row for every column the dashboard needs, then
//! deserializes each row and converts it into an [`AccidentRecord`]:
//! coordinates are normalized from comma decimals, severity labels are
//! parsed into [`Severity`], and ages are parsed when present.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use velo_map_accident_models::{AccidentRecord, Severity};

use crate::DatasetError;

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "annee",
    "mois",
    "jour",
    "hrmn",
    "lat",
    "long",
    "adresse",
    "gravite",
    "meteo",
    "collision",
    "situation",
    "trajet",
    "agglomeration",
    "voie_speciale",
    "intersection",
    "éclairage",
    "secu1",
    "secu2",
    "secu3",
    "sexe",
    "age",
];

/// A row exactly as it appears in the file, before normalization.
#[derive(Debug, Deserialize)]
struct RawAccidentRow {
    annee: i64,
    mois: i64,
    jour: i64,
    hrmn: String,
    date: Option<String>,
    lat: String,
    long: String,
    adresse: Option<String>,
    gravite: String,
    meteo: Option<String>,
    collision: Option<String>,
    situation: Option<String>,
    trajet: Option<String>,
    agglomeration: Option<String>,
    voie_speciale: Option<String>,
    intersection: Option<String>,
    #[serde(rename = "éclairage")]
    eclairage: Option<String>,
    secu1: Option<String>,
    secu2: Option<String>,
    secu3: Option<String>,
    sexe: Option<String>,
    age: Option<String>,
}

/// Reader for the accident records file.
#[derive(Debug, Clone)]
pub struct RecordsLoader {
    /// Field delimiter byte (defaults to `,`).
    delimiter: u8,
}

impl Default for RecordsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordsLoader {
    /// Creates a loader for comma-delimited files.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Sets the field delimiter (e.g. `b';'`).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns the configured field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Reads all records from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be opened, or any
    /// error from [`RecordsLoader::load_reader`].
    pub fn load_path(&self, path: &Path) -> Result<Vec<AccidentRecord>, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_reader(file)
    }

    /// Reads all records from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DataFormat`] if required columns are missing
    /// or any row holds a value that cannot be converted, and
    /// [`DatasetError::Csv`] if the input is not well-formed delimited text.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<AccidentRecord>, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        check_required_columns(&headers)?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<RawAccidentRow>().enumerate() {
            let row_number = index + 1;
            let raw = row.map_err(|e| row_error(&headers, row_number, e))?;
            records.push(convert_row(row_number, raw)?);
        }

        log::debug!("Parsed {} rows", records.len());

        Ok(records)
    }
}

/// Normalizes a locale-formatted coordinate (`"43,6045"`) and parses it.
///
/// # Errors
///
/// Returns [`DatasetError::DataFormat`] if the value is not a finite number
/// once `,` has been replaced with `.`.
pub fn normalize_lat_long(raw: &str) -> Result<f64, DatasetError> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DatasetError::DataFormat {
            message: format!("non-numeric coordinate '{raw}'"),
        })
}

fn check_required_columns(headers: &csv::StringRecord) -> Result<(), DatasetError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::DataFormat {
            message: format!("missing required columns: {}", missing.join(", ")),
        })
    }
}

fn row_error(headers: &csv::StringRecord, row_number: usize, error: csv::Error) -> DatasetError {
    // The csv field index is 0-based; report the header name instead.
    let located = match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => Some((
            err.field()
                .and_then(|index| usize::try_from(index).ok())
                .and_then(|index| headers.get(index))
                .map(str::to_string),
            err.kind().to_string(),
        )),
        _ => None,
    };
    match located {
        Some((Some(column), message)) => at_row(row_number, &column, &message),
        Some((None, message)) => DatasetError::DataFormat {
            message: format!("row {row_number}: {message}"),
        },
        None => DatasetError::Csv(error),
    }
}

fn at_row(row_number: usize, column: &str, error: &dyn std::fmt::Display) -> DatasetError {
    DatasetError::DataFormat {
        message: format!("row {row_number}, column `{column}`: {error}"),
    }
}

fn convert_row(row_number: usize, raw: RawAccidentRow) -> Result<AccidentRecord, DatasetError> {
    let lat = parse_coordinate(row_number, "lat", &raw.lat)?;
    let long = parse_coordinate(row_number, "long", &raw.long)?;
    let gravite =
        Severity::from_label(&raw.gravite).map_err(|e| at_row(row_number, "gravite", &e))?;
    let age = match raw.age.as_deref() {
        None => None,
        Some(value) => Some(
            value
                .parse::<f64>()
                .map_err(|e| at_row(row_number, "age", &format!("'{value}': {e}")))?,
        ),
    };

    Ok(AccidentRecord {
        annee: raw.annee,
        mois: raw.mois,
        jour: raw.jour,
        hrmn: raw.hrmn,
        date: raw.date,
        lat,
        long,
        adresse: raw.adresse,
        gravite,
        meteo: raw.meteo,
        collision: raw.collision,
        situation: raw.situation,
        trajet: raw.trajet,
        agglomeration: raw.agglomeration,
        voie_speciale: raw.voie_speciale,
        intersection: raw.intersection,
        eclairage: raw.eclairage,
        secu1: raw.secu1,
        secu2: raw.secu2,
        secu3: raw.secu3,
        sexe: raw.sexe,
        age,
    })
}

fn parse_coordinate(row_number: usize, column: &str, raw: &str) -> Result<f64, DatasetError> {
    normalize_lat_long(raw).map_err(|e| match e {
        DatasetError::DataFormat { message } => at_row(row_number, column, &message),
        other => other,
    })
}
