use serde_json::Value;
use std::sync::Arc;
use url::{ParseError, Url};

use crate::{
    error::Error,
    model::ForecastResponse,
    options::{InvalidOption, Output, Source, Units},
    transport::{ReqwestTransport, Transport},
};

pub const DEFAULT_ENDPOINT: &str = "https://weathermachine.io/forecast/";

/// Oldest advisories are dropped past this many.
pub const MAX_WARNINGS: usize = 16;

/// Forecast client for a single API key.
///
/// Setters mutate in place and return `&mut Self`, so configuration chains:
///
/// ```no_run
/// # async fn run() -> Result<(), weathermachine_core::Error> {
/// use weathermachine_core::WeatherClient;
///
/// let mut client = WeatherClient::new("API_KEY");
/// client.set_location(40.0, -105.0).set_source("open_weather").set_units("si");
/// let hourly = client.hourly().await?;
/// println!("{} hourly entries", hourly.len());
/// # Ok(())
/// # }
/// ```
///
/// Each request helper issues a fresh GET; nothing is cached between calls.
///
/// Rejected option values are kept until drained with
/// [`take_warnings`](Self::take_warnings); only the latest [`MAX_WARNINGS`]
/// are retained.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    endpoint: String,
    api_key: String,
    lat: Option<f64>,
    lon: Option<f64>,
    source: Source,
    units: Units,
    output: Output,
    params: Vec<(String, String)>,
    warnings: Vec<InvalidOption>,
    transport: Arc<dyn Transport>,
}

impl WeatherClient {
    pub fn new(api_key: impl AsRef<str>) -> Self {
        Self::with_transport(api_key, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(api_key: impl AsRef<str>, transport: Arc<dyn Transport>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, transport)
    }

    /// Points the client at a different host, e.g. a local mock server.
    /// The API key becomes the path segment after `base`.
    pub fn with_endpoint(
        base: impl Into<String>,
        api_key: impl AsRef<str>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            endpoint: base.into(),
            api_key: api_key.as_ref().to_string(),
            lat: None,
            lon: None,
            source: Source::default(),
            units: Units::default(),
            output: Output::default(),
            params: Vec::new(),
            warnings: Vec::new(),
            transport,
        }
    }

    /// No range check is applied to either coordinate.
    pub fn set_location(&mut self, lat: f64, lon: f64) -> &mut Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Unknown names fall back to `mock` with a warning.
    pub fn set_source(&mut self, name: &str) -> &mut Self {
        let source = self.accept(Source::try_from(name));
        self.source(source)
    }

    /// Unknown units fall back to `us` with a warning.
    pub fn set_units(&mut self, unit: &str) -> &mut Self {
        let units = self.accept(Units::try_from(unit));
        self.units(units)
    }

    /// Unknown outputs fall back to `base` with a warning.
    pub fn set_output(&mut self, output: &str) -> &mut Self {
        let output = self.accept(Output::try_from(output));
        self.output(output)
    }

    pub fn source(&mut self, source: Source) -> &mut Self {
        self.source = source;
        self
    }

    pub fn units(&mut self, units: Units) -> &mut Self {
        self.units = units;
        self
    }

    pub fn output(&mut self, output: Output) -> &mut Self {
        self.output = output;
        self
    }

    /// Adds an extra query parameter. `units`, `output` and `source` go through
    /// their validating setters instead of being stored raw.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();

        match key.as_str() {
            "units" => self.set_units(&value),
            "output" => self.set_output(&value),
            "source" => self.set_source(&value),
            _ => {
                match self.params.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => self.params.push((key, value)),
                }
                self
            }
        }
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }

    pub fn current_source(&self) -> Source {
        self.source
    }

    pub fn current_units(&self) -> Units {
        self.units
    }

    pub fn current_output(&self) -> Output {
        self.output
    }

    /// Drains the advisories recorded by rejected setter values.
    pub fn take_warnings(&mut self) -> Vec<InvalidOption> {
        std::mem::take(&mut self.warnings)
    }

    fn accept<T: Default>(&mut self, parsed: Result<T, InvalidOption>) -> T {
        parsed.unwrap_or_else(|invalid| {
            tracing::warn!(
                option = %invalid.kind,
                given = %invalid.given,
                fallback = invalid.fallback,
                "{invalid}"
            );
            if self.warnings.len() >= MAX_WARNINGS {
                self.warnings.remove(0);
            }
            self.warnings.push(invalid);
            T::default()
        })
    }

    /// Builds `<endpoint>/<api_key>/<lat>,<lon>?units=..&output=..&source=..&<extras>`.
    pub fn request_url(&self) -> Result<Url, Error> {
        let (lat, lon) = self.location().ok_or(Error::InvalidConfiguration)?;

        let mut url = Url::parse(&self.endpoint)?;
        url.path_segments_mut()
            .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&self.api_key)
            .push(&format!("{lat},{lon}"));

        url.query_pairs_mut()
            .append_pair("units", self.units.as_str())
            .append_pair("output", self.output.as_str())
            .append_pair("source", self.source.as_str())
            .extend_pairs(&self.params);

        Ok(url)
    }

    /// Sends the request and decodes the full payload.
    pub async fn fetch(&self) -> Result<ForecastResponse, Error> {
        let url = self.request_url()?;

        tracing::debug!(
            source = %self.source,
            units = %self.units,
            output = %self.output,
            "Requesting forecast"
        );

        let res = self.transport.get(url).await?;
        tracing::debug!(status = res.status, bytes = res.body.len(), "Forecast response received");

        if !res.is_success() {
            return Err(Error::Status { status: res.status, body: res.body });
        }

        Ok(serde_json::from_str(&res.body)?)
    }

    pub async fn currently(&self) -> Result<Value, Error> {
        self.fetch().await?.into_currently()
    }

    pub async fn minutely(&self) -> Result<Vec<Value>, Error> {
        self.fetch().await?.into_minutely()
    }

    pub async fn hourly(&self) -> Result<Vec<Value>, Error> {
        self.fetch().await?.into_hourly()
    }

    pub async fn daily(&self) -> Result<Vec<Value>, Error> {
        self.fetch().await?.into_daily()
    }

    /// Missing `alerts` or `alerts.data` yields an empty list rather than an error.
    pub async fn alerts(&self) -> Result<Vec<Value>, Error> {
        Ok(self.fetch().await?.into_alerts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionKind;

    fn client() -> WeatherClient {
        WeatherClient::new("K")
    }

    #[test]
    fn defaults_are_us_base_mock() {
        let mut c = client();
        c.set_location(40.0, -105.0);

        let url = c.request_url().expect("location is set");
        assert_eq!(
            url.as_str(),
            "https://weathermachine.io/forecast/K/40,-105?units=us&output=base&source=mock"
        );
    }

    #[test]
    fn request_url_requires_location() {
        let mut c = client();
        c.set_source("foreca").set_units("si").set_output("full");

        assert!(matches!(c.request_url(), Err(Error::InvalidConfiguration)));
    }

    #[test]
    fn zero_is_a_valid_coordinate() {
        let mut c = client();
        c.set_location(0.0, 0.0);

        let url = c.request_url().expect("location is set");
        assert_eq!(url.path(), "/forecast/K/0,0");
    }

    #[test]
    fn fractional_coordinates_keep_precision() {
        let mut c = client();
        c.set_location(47.6062, -122.3321);

        let url = c.request_url().expect("location is set");
        assert_eq!(url.path(), "/forecast/K/47.6062,-122.3321");
    }

    #[test]
    fn every_listed_source_is_accepted() {
        let mut c = client();
        for source in Source::all() {
            c.set_source(source.as_str());
            assert_eq!(c.current_source(), *source);
        }
        assert!(c.take_warnings().is_empty());
    }

    #[test]
    fn unknown_source_falls_back_to_mock_with_warning() {
        let mut c = client();
        c.set_source("pirate_weather").set_source("darksky");

        assert_eq!(c.current_source(), Source::Mock);
        let warnings = c.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, OptionKind::Source);
        assert_eq!(warnings[0].given, "darksky");
        assert!(c.take_warnings().is_empty());
    }

    #[test]
    fn invalid_units_override_previous_valid_value() {
        let mut c = client();
        c.set_units("si").set_units("bogus");

        assert_eq!(c.current_units(), Units::Us);
        assert_eq!(c.take_warnings()[0].fallback, "us");
    }

    #[test]
    fn invalid_output_falls_back_to_base() {
        let mut c = client();
        c.set_output("full").set_output("everything");

        assert_eq!(c.current_output(), Output::Base);
        assert_eq!(c.take_warnings()[0].kind, OptionKind::Output);
    }

    #[test]
    fn extra_params_follow_reserved_ones() {
        let mut c = client();
        c.set_location(1.5, 2.5)
            .set_param("lang", "de")
            .set_param("exclude", "minutely")
            .set_param("lang", "fr");

        let url = c.request_url().expect("location is set");
        assert_eq!(url.query(), Some("units=us&output=base&source=mock&lang=fr&exclude=minutely"));
    }

    #[test]
    fn reserved_params_are_validated() {
        let mut c = client();
        c.set_param("units", "ca").set_param("source", "nope");

        assert_eq!(c.current_units(), Units::Ca);
        assert_eq!(c.current_source(), Source::Mock);
        assert_eq!(c.take_warnings().len(), 1);
    }

    #[test]
    fn api_key_is_percent_encoded_as_one_segment() {
        let mut c = WeatherClient::new("a/b?c#d");
        c.set_location(40.0, -105.0);

        let url = c.request_url().expect("location is set");
        assert_eq!(url.path(), "/forecast/a%2Fb%3Fc%23d/40,-105");
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("units=us&output=base&source=mock"));
    }

    #[test]
    fn endpoint_without_trailing_slash() {
        let transport = Arc::new(ReqwestTransport::new());
        let mut c = WeatherClient::with_endpoint("http://localhost:8080/forecast", "K", transport);
        c.set_location(1.0, 2.0);

        let url = c.request_url().expect("location is set");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/forecast/K/1,2?units=us&output=base&source=mock"
        );
    }

    #[test]
    fn invalid_endpoint_is_a_url_error() {
        let transport = Arc::new(ReqwestTransport::new());
        let mut c = WeatherClient::with_endpoint("not a url", "K", transport);
        c.set_location(1.0, 2.0);

        assert!(matches!(c.request_url(), Err(Error::Url(_))));
    }

    #[test]
    fn warnings_keep_only_the_latest() {
        let mut c = client();
        for i in 0..MAX_WARNINGS + 5 {
            c.set_units(&format!("bogus{i}"));
        }

        let warnings = c.take_warnings();
        assert_eq!(warnings.len(), MAX_WARNINGS);
        assert_eq!(warnings[0].given, "bogus5");
        assert_eq!(warnings[MAX_WARNINGS - 1].given, format!("bogus{}", MAX_WARNINGS + 4));
    }

    #[test]
    fn latest_configuration_applies_at_request_time() {
        let mut c = client();
        c.set_location(10.0, 20.0).set_source("foreca");
        c.set_location(11.0, 21.0).set_source("weatherbit");

        let url = c.request_url().expect("location is set");
        assert_eq!(url.path(), "/forecast/K/11,21");
        assert!(url.query().unwrap_or_default().contains("source=weatherbit"));
    }
}
