use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub const FINE_SEGMENTS: u32 = 180;
pub const COARSE_SEGMENTS: u32 = 81;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialise configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Stock ring variants; they differ only in segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Fine,
    Coarse,
}

impl Variant {
    pub fn segments(self) -> u32 {
        match self {
            Variant::Fine => FINE_SEGMENTS,
            Variant::Coarse => COARSE_SEGMENTS,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fine" | "180" => Ok(Variant::Fine),
            "coarse" | "81" => Ok(Variant::Coarse),
            other => Err(format!(
                "unknown ring variant '{other}'; expected fine or coarse"
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RingConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub ring: RingSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Explicit overrides of the ring constants; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_frequency: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_softness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_period: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputSection {
    #[serde(
        default,
        deserialize_with = "deserialize_size_opt",
        serialize_with = "serialize_size_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<(u32, u32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f32>,
    #[serde(
        default,
        deserialize_with = "deserialize_duration_opt",
        serialize_with = "serialize_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Duration>,
}

/// Fully resolved ring constants after applying the variant and overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRing {
    pub segments: u32,
    pub rotation_speed: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub edge_softness: f32,
    pub visible_period: u32,
}

impl Default for ResolvedRing {
    fn default() -> Self {
        Self {
            segments: FINE_SEGMENTS,
            rotation_speed: 0.1,
            wave_amplitude: 0.03,
            wave_frequency: 7.0,
            inner_radius: 0.25,
            outer_radius: 0.4,
            edge_softness: 0.01,
            visible_period: 3,
        }
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            version: 1,
            variant: Some(Variant::Fine),
            ring: RingSection::default(),
            output: OutputSection {
                size: Some((800, 600)),
                background: None,
                fps: Some(30.0),
                duration: Some(Duration::from_secs(5)),
            },
        }
    }
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() || v.is_infinite() {
                return Err(E::custom("duration must be a non-negative finite number"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration_opt<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(duration) => {
            serializer.serialize_str(&humantime::format_duration(*duration).to_string())
        }
        None => serializer.serialize_none(),
    }
}

fn deserialize_size_opt<'de, D>(deserializer: D) -> Result<Option<(u32, u32)>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Pair([u32; 2]),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    match helper {
        None => Ok(None),
        Some(Helper::Str(raw)) => parse_size(&raw).map(Some).map_err(de::Error::custom),
        Some(Helper::Pair([width, height])) => Ok(Some((width, height))),
    }
}

fn serialize_size_opt<S>(value: &Option<(u32, u32)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some((width, height)) => serializer.serialize_str(&format!("{width}x{height}")),
        None => serializer.serialize_none(),
    }
}

/// Parses `WIDTHxHEIGHT`; both dimensions must be non-zero.
pub fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{raw}'; expected WIDTHxHEIGHT"))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width in size '{raw}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height in size '{raw}'"))?;
    if width == 0 || height == 0 {
        return Err("size dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

impl RingConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RingConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Variant defaults first, then any explicit `[ring]` overrides.
    pub fn resolved_ring(&self) -> ResolvedRing {
        let defaults = ResolvedRing::default();
        let base_segments = self.variant.unwrap_or_default().segments();
        ResolvedRing {
            segments: self.ring.segments.unwrap_or(base_segments),
            rotation_speed: self.ring.rotation_speed.unwrap_or(defaults.rotation_speed),
            wave_amplitude: self.ring.wave_amplitude.unwrap_or(defaults.wave_amplitude),
            wave_frequency: self.ring.wave_frequency.unwrap_or(defaults.wave_frequency),
            inner_radius: self.ring.inner_radius.unwrap_or(defaults.inner_radius),
            outer_radius: self.ring.outer_radius.unwrap_or(defaults.outer_radius),
            edge_softness: self.ring.edge_softness.unwrap_or(defaults.edge_softness),
            visible_period: self.ring.visible_period.unwrap_or(defaults.visible_period),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        let ring = self.resolved_ring();
        if ring.segments == 0 {
            return Err(ConfigError::Invalid("ring.segments must be >= 1".into()));
        }
        if ring.visible_period == 0 {
            return Err(ConfigError::Invalid(
                "ring.visible_period must be >= 1".into(),
            ));
        }

        for (name, value) in [
            ("rotation_speed", ring.rotation_speed),
            ("wave_amplitude", ring.wave_amplitude),
            ("wave_frequency", ring.wave_frequency),
            ("inner_radius", ring.inner_radius),
            ("outer_radius", ring.outer_radius),
            ("edge_softness", ring.edge_softness),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "ring.{name} must be a finite number"
                )));
            }
        }

        if ring.inner_radius < 0.0 || ring.inner_radius >= ring.outer_radius {
            return Err(ConfigError::Invalid(format!(
                "ring radii must satisfy 0 <= inner < outer (got inner={} outer={})",
                ring.inner_radius, ring.outer_radius
            )));
        }

        if ring.edge_softness <= 0.0 {
            return Err(ConfigError::Invalid(
                "ring.edge_softness must be > 0".into(),
            ));
        }

        if let Some((width, height)) = self.output.size {
            if width == 0 || height == 0 {
                return Err(ConfigError::Invalid(
                    "output.size dimensions must be greater than zero".into(),
                ));
            }
        }

        if let Some(background) = self.output.background {
            if background
                .iter()
                .any(|channel| !channel.is_finite() || !(0.0..=1.0).contains(channel))
            {
                return Err(ConfigError::Invalid(
                    "output.background channels must lie in [0, 1]".into(),
                ));
            }
        }

        if let Some(fps) = self.output.fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(ConfigError::Invalid("output.fps must be > 0".into()));
            }
        }

        if let Some(duration) = self.output.duration {
            if duration.is_zero() {
                return Err(ConfigError::Invalid(
                    "output.duration must be greater than zero".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1
variant = "coarse"

[ring]
wave_amplitude = 0.05
visible_period = 3

[output]
size = "1280x720"
background = [0.1, 0.1, 0.1]
fps = 24
duration = "2s 500ms"
"#;

    #[test]
    fn parses_sample_config() {
        let config = RingConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.variant, Some(Variant::Coarse));
        assert_eq!(config.output.size, Some((1280, 720)));
        assert_eq!(config.output.fps, Some(24.0));
        assert_eq!(config.output.duration, Some(Duration::from_millis(2500)));

        let ring = config.resolved_ring();
        assert_eq!(ring.segments, COARSE_SEGMENTS);
        assert_eq!(ring.wave_amplitude, 0.05);
        assert_eq!(ring.inner_radius, 0.25);
    }

    #[test]
    fn explicit_segments_override_variant() {
        let config = RingConfig::from_toml_str(
            r#"
version = 1
variant = "coarse"

[ring]
segments = 90
"#,
        )
        .unwrap();
        assert_eq!(config.resolved_ring().segments, 90);
    }

    #[test]
    fn minimal_config_uses_fine_defaults() {
        let config = RingConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config.resolved_ring(), ResolvedRing::default());
        assert_eq!(config.output, OutputSection::default());
    }

    #[test]
    fn accepts_size_as_pair_and_duration_as_seconds() {
        let config = RingConfig::from_toml_str(
            r#"
version = 1

[output]
size = [640, 480]
duration = 3
"#,
        )
        .unwrap();
        assert_eq!(config.output.size, Some((640, 480)));
        assert_eq!(config.output.duration, Some(Duration::from_secs(3)));
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = RingConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_radii() {
        let err = RingConfig::from_toml_str(
            r#"
version = 1

[ring]
inner_radius = 0.5
outer_radius = 0.4
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_segments_and_period() {
        for body in ["[ring]\nsegments = 0", "[ring]\nvisible_period = 0"] {
            let err = RingConfig::from_toml_str(&format!("version = 1\n{body}\n")).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{body}");
        }
    }

    #[test]
    fn rejects_bad_output_values() {
        for body in [
            "size = \"0x10\"",
            "fps = 0",
            "background = [1.5, 0.0, 0.0]",
            "duration = \"0s\"",
        ] {
            let err =
                RingConfig::from_toml_str(&format!("version = 1\n[output]\n{body}\n")).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid(_) | ConfigError::Parse(_)),
                "{body}"
            );
        }
    }

    #[test]
    fn rejects_duration_too_large_to_represent() {
        let err = RingConfig::from_toml_str("version = 1\n[output]\nduration = 1e30\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("invalid duration"), "{err}");
    }

    #[test]
    fn rejects_unknown_variant() {
        let err = RingConfig::from_toml_str("version = 1\nvariant = \"medium\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn default_config_survives_serialisation() {
        let text = RingConfig::default().to_toml_string().unwrap();
        let parsed = RingConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.variant, Some(Variant::Fine));
        assert_eq!(parsed.output.size, Some((800, 600)));
        assert_eq!(parsed.output.duration, Some(Duration::from_secs(5)));
    }

    #[test]
    fn parses_variant_names() {
        assert_eq!(Variant::parse("Fine").unwrap(), Variant::Fine);
        assert_eq!(Variant::parse("81").unwrap(), Variant::Coarse);
        assert!(Variant::parse("huge").is_err());
        assert_eq!(parse_size("1920X1080").unwrap(), (1920, 1080));
        assert!(parse_size("1920").is_err());
    }
}
