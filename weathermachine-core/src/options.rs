use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

/// Upstream provider the forecast is pulled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Accuweather,
    AerisWeather,
    AppleWeather,
    CustomWeather,
    Foreca,
    #[default]
    Mock,
    OpenWeather,
    PirateWeather,
    TheWeatherCompany,
    TomorrowIo,
    VisualCrossing,
    Weatherbit,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Accuweather => "accuweather",
            Source::AerisWeather => "aeris_weather",
            Source::AppleWeather => "apple_weather",
            Source::CustomWeather => "custom_weather",
            Source::Foreca => "foreca",
            Source::Mock => "mock",
            Source::OpenWeather => "open_weather",
            Source::PirateWeather => "pirate_weather",
            Source::TheWeatherCompany => "the_weather_company",
            Source::TomorrowIo => "tomorrow_io",
            Source::VisualCrossing => "visual_crossing",
            Source::Weatherbit => "weatherbit",
        }
    }

    pub const fn all() -> &'static [Source] {
        &[
            Source::Accuweather,
            Source::AerisWeather,
            Source::AppleWeather,
            Source::CustomWeather,
            Source::Foreca,
            Source::Mock,
            Source::OpenWeather,
            Source::PirateWeather,
            Source::TheWeatherCompany,
            Source::TomorrowIo,
            Source::VisualCrossing,
            Source::Weatherbit,
        ]
    }
}

/// Measurement system of the returned values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Us,
    Si,
    Uk,
    Ca,
    M,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Us => "us",
            Units::Si => "si",
            Units::Uk => "uk",
            Units::Ca => "ca",
            Units::M => "m",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Us, Units::Si, Units::Uk, Units::Ca, Units::M]
    }
}

/// Verbosity of the returned payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Base,
    Full,
}

impl Output {
    pub fn as_str(&self) -> &'static str {
        match self {
            Output::Base => "base",
            Output::Full => "full",
        }
    }

    pub const fn all() -> &'static [Output] {
        &[Output::Base, Output::Full]
    }
}

/// Which option a rejected value was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Source,
    Units,
    Output,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Source => "source",
            OptionKind::Units => "units",
            OptionKind::Output => "output",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value outside the permitted set, together with the default that replaced it.
///
/// This is an advisory, not an error: the setter that produced it still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} '{given}' specified, setting to {fallback}.")]
pub struct InvalidOption {
    pub kind: OptionKind,
    pub given: String,
    pub fallback: &'static str,
}

macro_rules! impl_wire_str {
    ($ty:ident, $kind:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = InvalidOption;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                $ty::all()
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == value)
                    .ok_or_else(|| InvalidOption {
                        kind: $kind,
                        given: value.to_string(),
                        fallback: $ty::default().as_str(),
                    })
            }
        }

        impl FromStr for $ty {
            type Err = InvalidOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::try_from(s)
            }
        }
    };
}

impl_wire_str!(Source, OptionKind::Source);
impl_wire_str!(Units, OptionKind::Units);
impl_wire_str!(Output, OptionKind::Output);
