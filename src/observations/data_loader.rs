use crate::observations::error::ObservationDataError;
use crate::types::period::ObservationPeriod;
use chrono::Datelike;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

/// Iowa Environmental Mesonet ASOS/METAR download service.
pub const ASOS_URL: &str = "https://mesonet.agron.iastate.edu/cgi-bin/request/asos.py";

const DATA_FIELDS: [&str; 13] = [
    "vsby",
    "gust",
    "skyc1",
    "skyc2",
    "skyc3",
    "skyl1",
    "skyl2",
    "skyl3",
    "wxcodes",
    "peak_wind_gust",
    "peak_wind_gust_mph",
    "peak_wind_drct",
    "peak_wind_time",
];

/// Downloads raw observation CSV text per station and period, caching each response on disk.
pub struct ObservationLoader {
    cache_dir: PathBuf,
    base_url: String,
    download_client: Client,
}

impl ObservationLoader {
    pub fn new(cache_dir: &Path) -> ObservationLoader {
        ObservationLoader {
            cache_dir: cache_dir.to_path_buf(),
            base_url: ASOS_URL.to_string(),
            download_client: Client::new(),
        }
    }

    /// Points the loader at a different endpoint speaking the same query protocol.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Location of the cached response for `station` over `period`.
    pub fn cache_path(&self, station: &str, period: ObservationPeriod) -> PathBuf {
        self.cache_dir.join(format!(
            "asos-{}-{}-{}.csv",
            station,
            period.start().format("%Y%m%d"),
            period.end().format("%Y%m%d")
        ))
    }

    /// Returns the raw CSV text for a station, from cache when present, otherwise downloaded and cached.
    pub async fn get_text(
        &self,
        station: &str,
        period: ObservationPeriod,
    ) -> Result<String, ObservationDataError> {
        let cache_path = self.cache_path(station, period);

        let bytes = if fs::metadata(&cache_path).await.is_ok() {
            info!("Cache hit for station {} ({}) at {:?}", station, period, cache_path);
            fs::read(&cache_path)
                .await
                .map_err(|e| ObservationDataError::CacheRead(cache_path.clone(), e))?
        } else {
            warn!(
                "Cache miss for station {} ({}). Downloading.",
                station, period
            );
            let bytes = self.download(station, period).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| ObservationDataError::CacheDirCreation(self.cache_dir.clone(), e))?;
            fs::write(&cache_path, &bytes)
                .await
                .map_err(|e| ObservationDataError::CacheWrite(cache_path.clone(), e))?;
            info!("Cached station {} to {:?}", station, cache_path);
            bytes
        };

        String::from_utf8(bytes).map_err(|e| ObservationDataError::InvalidEncoding {
            station: station.to_string(),
            source: e,
        })
    }

    pub(crate) fn query_params(
        station: &str,
        period: ObservationPeriod,
    ) -> Vec<(&'static str, String)> {
        let start = period.start();
        let end = period.exclusive_end();

        let mut params: Vec<(&'static str, String)> = vec![("station", station.to_string())];
        params.extend(DATA_FIELDS.iter().map(|field| ("data", field.to_string())));
        params.extend([
            ("year1", start.year().to_string()),
            ("month1", start.month().to_string()),
            ("day1", start.day().to_string()),
            ("year2", end.year().to_string()),
            ("month2", end.month().to_string()),
            ("day2", end.day().to_string()),
            ("tz", "Etc/UTC".to_string()),
            ("format", "onlycomma".to_string()),
            ("latlon", "no".to_string()),
            ("elev", "no".to_string()),
            ("missing", "M".to_string()),
            ("trace", "T".to_string()),
            ("direct", "no".to_string()),
            ("report_type", "3".to_string()),
        ]);
        params
    }

    async fn download(
        &self,
        station: &str,
        period: ObservationPeriod,
    ) -> Result<Vec<u8>, ObservationDataError> {
        let url = format!("{}?station={}", self.base_url, station);
        info!("Downloading observations from {} for {}", self.base_url, period);

        let response = self
            .download_client
            .get(&self.base_url)
            .query(&Self::query_params(station, period))
            .send()
            .await
            .map_err(|e| ObservationDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ObservationDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ObservationDataError::NetworkRequest(url, e)
                });
            }
        };

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;
        info!("Downloaded {} bytes for station {}", body.len(), station);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::period::Year;
    use chrono::NaiveDate;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_query_params_request_all_fields_and_inclusive_end() {
        let period = ObservationPeriod::from_years(Year(2013), Year(2022)).unwrap();
        let params = ObservationLoader::query_params("KMLB", period);

        assert_eq!(param(&params, "station"), vec!["KMLB"]);
        assert_eq!(param(&params, "data").len(), DATA_FIELDS.len());
        assert!(param(&params, "data").contains(&"skyl3"));
        assert_eq!(param(&params, "year1"), vec!["2013"]);
        assert_eq!(param(&params, "day1"), vec!["1"]);
        // The service's end date is exclusive, so Dec 31st needs Jan 1st of the next year.
        assert_eq!(param(&params, "year2"), vec!["2023"]);
        assert_eq!(param(&params, "month2"), vec!["1"]);
        assert_eq!(param(&params, "day2"), vec!["1"]);
        assert_eq!(param(&params, "tz"), vec!["Etc/UTC"]);
        assert_eq!(param(&params, "missing"), vec!["M"]);
        assert_eq!(param(&params, "report_type"), vec!["3"]);
    }

    #[test]
    fn test_cache_path_is_per_station_and_period() {
        let loader = ObservationLoader::new(Path::new("/tmp/climo"));
        let period = ObservationPeriod::new(
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap(),
        )
        .unwrap();
        assert_eq!(
            loader.cache_path("EHAM", period),
            PathBuf::from("/tmp/climo/asos-EHAM-20200201-20200229.csv")
        );
    }

    #[tokio::test]
    async fn test_get_text_reads_cache_without_network() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        // Unroutable endpoint: any download attempt would fail the test.
        let loader = ObservationLoader::new(dir.path()).with_base_url("http://127.0.0.1:9/asos.py");
        let period = ObservationPeriod::from(Year(2021));
        let cached = "station,valid,vsby\nMLB,2021-01-01 00:53,10.00\n";
        std::fs::write(loader.cache_path("KMLB", period), cached)?;

        let text = loader.get_text("KMLB", period).await?;
        assert_eq!(text, cached);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_text_surfaces_network_failure() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let loader = ObservationLoader::new(dir.path()).with_base_url("http://127.0.0.1:9/asos.py");
        let result = loader.get_text("KMLB", ObservationPeriod::from(Year(2021))).await;
        assert!(matches!(
            result,
            Err(ObservationDataError::NetworkRequest(_, _))
        ));
        Ok(())
    }
}
