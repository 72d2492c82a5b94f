use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use tracing::{error, info, info_span};
use tracing_error::SpanTrace;

use crate::country::{Country, CountryData};
use crate::domain::CTVError;

/// Reads and parses the country data file.
pub fn load_countries(path: &Path) -> Result<Vec<Country>, CTVError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CTVError::FileNotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => CTVError::PermissionDenied(path.to_path_buf()),
        _ => CTVError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(CTVError::LoadingFailed(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)?;
    let data: CountryData = serde_json::from_str(&raw)?;
    Ok(data.countries)
}

/// A load running in the background. It reports exactly once.
pub struct PendingLoad {
    rx: Receiver<Result<Vec<Country>, CTVError>>,
}

impl PendingLoad {
    /// Non blocking. `None` while the load is still running.
    pub fn poll(&self) -> Option<Result<Vec<Country>, CTVError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CTVError::LoadingFailed(
                "loader stopped without a result".into(),
            ))),
        }
    }
}

pub struct Loader;

impl Loader {
    pub fn spawn(path: PathBuf) -> PendingLoad {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let span = info_span!("load", path = %path.display());
            let _guard = span.enter();
            let start_time = Instant::now();

            let result = load_countries(&path);
            match &result {
                Ok(countries) => info!(
                    "Loaded {} countries in {}ms",
                    countries.len(),
                    start_time.elapsed().as_millis()
                ),
                Err(e) => {
                    let trace = SpanTrace::capture();
                    error!("Loading failed: {e}\n{trace}");
                }
            }
            // The receiver is gone if the app quit while loading.
            let _ = tx.send(result);
        });
        PendingLoad { rx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn wait(pending: &PendingLoad) -> Result<Vec<Country>, CTVError> {
        for _ in 0..500 {
            if let Some(result) = pending.poll() {
                return result;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("loader did not report in time");
    }

    #[test]
    fn loads_fixture_in_file_order() {
        let countries = load_countries(&fixture("countries.json")).unwrap();
        assert_eq!(countries.len(), 12);
        assert_eq!(countries[0].code, "AF");
        assert_eq!(countries[0].continent, "AS");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_countries(&fixture("does_not_exist.json")).unwrap_err();
        assert!(matches!(err, CTVError::FileNotFound(_)));
    }

    #[test]
    fn directory_is_not_a_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_countries(dir.path()).unwrap_err();
        assert!(matches!(err, CTVError::LoadingFailed(_)));
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"countries\": [").unwrap();
        let err = load_countries(file.path()).unwrap_err();
        assert!(matches!(err, CTVError::JsonError(_)));
    }

    #[test]
    fn background_load_reports_success_once() {
        let pending = Loader::spawn(fixture("countries.json"));
        let countries = wait(&pending).unwrap();
        assert_eq!(countries.len(), 12);
    }

    #[test]
    fn background_load_reports_failure() {
        let pending = Loader::spawn(fixture("does_not_exist.json"));
        assert!(wait(&pending).is_err());
    }
}
