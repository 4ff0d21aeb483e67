//! Raw dataset loading.
//!
//! Loads the prepared track CSV into memory, coercing every declared feature
//! column. A declared column absent from the source is synthesized with a
//! default (0 for numeric, "" for categorical) rather than failing; so is any
//! individual cell that fails to parse. Only an unreadable or structurally
//! malformed file aborts the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::{CatalogError, CATEGORICAL_FEATURES, NUMERIC_FEATURES};

/// One unscored catalog row, holding exactly the declared feature columns
/// plus the display attributes the API exposes.
#[derive(Debug, Clone)]
pub struct RawTrack {
    pub track_name: String,
    pub artist_name: String,
    /// Numeric features, indexed by position in [`NUMERIC_FEATURES`].
    pub numeric: [f32; NUMERIC_FEATURES.len()],
    /// Categorical features, indexed by position in [`CATEGORICAL_FEATURES`].
    pub categorical: [String; CATEGORICAL_FEATURES.len()],
}

/// The unscored catalog: one entry per dataset row, in file order. Row
/// position is the track's external id for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    pub tracks: Vec<RawTrack>,
}

impl RawCatalog {
    /// Load the catalog from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        info!(path = %path.display(), "Loading catalog dataset");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the catalog from any CSV source with a header row.
    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        // Resolve declared columns against the header once; missing columns
        // stay None and fall back to defaults for every row.
        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let track_name_idx = column("track_name");
        let artist_name_idx = column("artist_name");
        let numeric_idx: Vec<Option<usize>> = NUMERIC_FEATURES.iter().map(|n| column(n)).collect();
        let categorical_idx: Vec<Option<usize>> =
            CATEGORICAL_FEATURES.iter().map(|n| column(n)).collect();

        let mut tracks = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

            let mut numeric = [0.0f32; NUMERIC_FEATURES.len()];
            for (slot, idx) in numeric.iter_mut().zip(numeric_idx.iter()) {
                // Parse failures degrade to 0, never abort the load.
                *slot = field(*idx).trim().parse::<f32>().unwrap_or(0.0);
            }

            let mut categorical: [String; CATEGORICAL_FEATURES.len()] = Default::default();
            for (slot, idx) in categorical.iter_mut().zip(categorical_idx.iter()) {
                *slot = field(*idx).to_string();
            }

            tracks.push(RawTrack {
                track_name: field(track_name_idx).to_string(),
                artist_name: field(artist_name_idx).to_string(),
                numeric,
                categorical,
            });
        }

        debug!(rows = tracks.len(), "Catalog dataset parsed");
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CONTEXT_CLASS_IDX, GENRE_IDX};

    const FULL_CSV: &str = "\
track_name,artist_name,genre,base_ctx,context_class,key,mode,time_signature,acousticness,danceability,duration_ms,energy,instrumentalness,liveness,loudness,speechiness,tempo,valence
Yellow,Coldplay,rock,chill,focus,C,major,4,0.1,0.5,266000,0.7,0.0,0.2,-7.2,0.03,120.5,0.4
Lose Yourself,Eminem,hip hop,hype,workout,D,minor,4,0.01,0.8,320000,0.9,0.0,0.3,-4.1,0.25,171.0,0.6
";

    #[test]
    fn test_loads_all_rows_in_order() {
        let catalog = RawCatalog::from_reader(FULL_CSV.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tracks[0].track_name, "Yellow");
        assert_eq!(catalog.tracks[0].artist_name, "Coldplay");
        assert_eq!(catalog.tracks[1].track_name, "Lose Yourself");
    }

    #[test]
    fn test_feature_order_matches_declaration() {
        let catalog = RawCatalog::from_reader(FULL_CSV.as_bytes()).unwrap();
        let row = &catalog.tracks[0];
        // acousticness first, valence last
        assert!((row.numeric[0] - 0.1).abs() < 1e-6);
        assert!((row.numeric[9] - 0.4).abs() < 1e-6);
        assert_eq!(row.categorical[GENRE_IDX], "rock");
        assert_eq!(row.categorical[CONTEXT_CLASS_IDX], "focus");
        assert_eq!(row.categorical[5], "4");
    }

    #[test]
    fn test_missing_columns_default() {
        let csv = "track_name,tempo\nSong A,99.5\n";
        let catalog = RawCatalog::from_reader(csv.as_bytes()).unwrap();
        let row = &catalog.tracks[0];

        assert_eq!(row.artist_name, "");
        // tempo is position 8 in the declared numeric order
        assert!((row.numeric[8] - 99.5).abs() < 1e-6);
        assert_eq!(row.numeric[0], 0.0);
        assert!(row.categorical.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_unparsable_numeric_defaults_to_zero() {
        let csv = "track_name,energy,tempo\nSong A,not-a-number,\n";
        let catalog = RawCatalog::from_reader(csv.as_bytes()).unwrap();
        let row = &catalog.tracks[0];
        assert_eq!(row.numeric[3], 0.0); // energy
        assert_eq!(row.numeric[8], 0.0); // tempo (empty cell)
    }

    #[test]
    fn test_empty_dataset() {
        let csv = "track_name,artist_name,genre\n";
        let catalog = RawCatalog::from_reader(csv.as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }
}
