// Hotline / warmline directory loaded from CSV

use serde::Serialize;
use std::path::Path;

use crate::errors::DataError;

const TYPE_COLUMN: &str = "type";
const NAME_COLUMN: &str = "name";
const PHONE_COLUMN: &str = "phone number";
const DESCRIPTION_COLUMN: &str = "description";

/// One row of the support directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Normalized (trimmed, lowercase) `type` column, e.g. "hotline"
    pub kind: String,
    pub name: String,
    pub phone: String,
    pub description: Option<String>,
}

/// Load the directory, normalizing headers and `type` values
///
/// Header names are matched case-insensitively after trimming. Rows with
/// every field blank are skipped.
pub fn load_resources(path: &Path) -> Result<Vec<Resource>, DataError> {
    if !path.exists() {
        return Err(DataError::Missing {
            path: path.to_path_buf(),
        });
    }

    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column = |name: &str| -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };

    let type_idx = column(TYPE_COLUMN)?;
    let name_idx = column(NAME_COLUMN)?;
    let phone_idx = column(PHONE_COLUMN)?;
    let description_idx = headers.iter().position(|h| h == DESCRIPTION_COLUMN);

    let mut resources = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

        resources.push(Resource {
            kind: field(type_idx).to_lowercase(),
            name: field(name_idx),
            phone: field(phone_idx),
            description: description_idx.map(field).filter(|d| !d.is_empty()),
        });
    }

    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_headers_and_types_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.csv");
        fs::write(
            &path,
            " Type ,Name, Phone Number ,Description\n\
             \x20HOTLINE ,988 Lifeline,988,24/7 crisis line\n\
             Warmline,Peer Support,555-0100,\n",
        )
        .unwrap();

        let rows = load_resources(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "hotline");
        assert_eq!(rows[0].phone, "988");
        assert_eq!(rows[0].description.as_deref(), Some("24/7 crisis line"));
        assert_eq!(rows[1].kind, "warmline");
        assert_eq!(rows[1].description, None);
    }

    #[test]
    fn test_description_column_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.csv");
        fs::write(&path, "type,name,phone number\nhotline,Crisis Line,911\n,,\n").unwrap();

        let rows = load_resources(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Crisis Line");
    }

    #[test]
    fn test_missing_required_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.csv");
        fs::write(&path, "type,name\nhotline,Crisis Line\n").unwrap();

        let err = load_resources(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "phone number"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_resources(Path::new("/nonexistent/lines.csv")).unwrap_err();
        assert!(matches!(err, DataError::Missing { .. }));
    }
}
