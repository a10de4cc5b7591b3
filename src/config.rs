//! Widget configuration: builder defaults, TOML loading and validation.

use bon::Builder;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::geometry::{Point, Rect};

/// Shortest dash pattern, in pixels, that is drawn as dashes.
pub const MIN_DASH_PERIOD: f64 = 1.0;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const GREY: Color = Color::new(0x80, 0x80, 0x80);
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#FF0000" or "FF0000"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let named = match s.trim().to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "grey" | "gray" => Some(Color::GREY),
            "blue" => Some(Color::BLUE),
            "red" => Some(Color::new(0xff, 0x00, 0x00)),
            "green" => Some(Color::new(0x00, 0x80, 0x00)),
            "orange" => Some(Color::new(0xff, 0xa5, 0x00)),
            "yellow" => Some(Color::new(0xff, 0xff, 0x00)),
            "silver" => Some(Color::new(0xc0, 0xc0, 0xc0)),
            _ => None,
        };
        named
            .or_else(|| Color::from_hex(s.trim()))
            .ok_or_else(|| format!("unknown color `{s}`"))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style and spacing of one class of tick marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStyle {
    /// Angular distance between ticks of this class, in degrees.
    pub interval: f64,
    /// Inner end of the tick as a fraction of the radius (1.0 = zero length).
    pub factor: f64,
    pub color: Color,
    pub width: f64,
}

/// Keys set in a TOML tick table; the rest come from the class defaults.
#[derive(Debug, Deserialize)]
struct TickOverrides {
    interval: Option<f64>,
    factor: Option<f64>,
    color: Option<Color>,
    width: Option<f64>,
}

impl TickOverrides {
    fn over(self, base: TickStyle) -> TickStyle {
        TickStyle {
            interval: self.interval.unwrap_or(base.interval),
            factor: self.factor.unwrap_or(base.factor),
            color: self.color.unwrap_or(base.color),
            width: self.width.unwrap_or(base.width),
        }
    }
}

fn sub_ticks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TickStyle, D::Error> {
    Ok(TickOverrides::deserialize(deserializer)?.over(ScaleConfig::default().sub))
}

fn primary_ticks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TickStyle, D::Error> {
    Ok(TickOverrides::deserialize(deserializer)?.over(ScaleConfig::default().primary))
}

/// Configuration for the tick scale
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    #[serde(deserialize_with = "sub_ticks")]
    pub sub: TickStyle,
    #[serde(deserialize_with = "primary_ticks")]
    pub primary: TickStyle,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            sub: TickStyle {
                interval: 5.0,
                factor: 0.93,
                color: Color::BLACK,
                width: 1.0,
            },
            primary: TickStyle {
                interval: 45.0,
                factor: 0.9,
                color: Color::BLACK,
                width: 1.5,
            },
        }
    }
}

/// Configuration for the dashed cross-hair guide lines
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrossLightConfig {
    pub color: Color,
    /// Gap between the line ends and the dial outline.
    pub padding: f64,
    pub width: f64,
    /// Dash and gap lengths.
    pub dash: [f64; 2],
}

impl Default for CrossLightConfig {
    fn default() -> Self {
        Self {
            color: Color::GREY,
            padding: 10.0,
            width: 2.0,
            dash: [2.0, 2.0],
        }
    }
}

/// Configuration for the zero-direction indicator
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub color: Color,
    /// Defaults to a sixth of the dial radius.
    pub radius: Option<f64>,
    pub opacity: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            radius: None,
            opacity: 0.8,
        }
    }
}

/// Configuration for the numeric angle label
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub color: Color,
    pub opacity: f64,
    /// Defaults to a sixth of the dial radius.
    pub font_size: Option<f64>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 0.8,
            font_size: None,
        }
    }
}

/// Configuration for the histogram overlay
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub color: Color,
    pub factor: f64,
    pub width: f64,
    pub opacity: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            factor: 0.94,
            width: 2.0,
            opacity: 0.4,
        }
    }
}

/// Pointer model descriptor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub id: String,
    /// Asset for this model; falls back to the top-level `src`.
    pub src: Option<PathBuf>,
    /// Fraction of the dial bounding box the model occupies.
    #[serde(alias = "scaleFactor")]
    pub scale_factor: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: "model".to_string(),
            src: None,
            scale_factor: 0.6,
        }
    }
}

/// Complete widget configuration. Every field has a default, so an empty
/// builder or an empty TOML file yields the stock 70px full dial.
#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(default)]
pub struct AngleMeterConfig {
    /// Pointer model asset. `None` selects the built-in arrow.
    #[builder(into)]
    pub src: Option<PathBuf>,
    #[serde(alias = "strokeColor")]
    #[builder(default = Color::BLACK)]
    pub stroke_color: Color,
    #[serde(alias = "fillColor")]
    #[builder(default = Color::WHITE)]
    pub fill_color: Color,
    #[serde(alias = "bindTo")]
    #[builder(into, default = "anglemeter".to_string())]
    pub bind_to: String,
    #[builder(default = 70.0)]
    pub radius: f64,
    #[builder(default = false)]
    pub half: bool,
    #[serde(alias = "enableCrossLight")]
    #[builder(default = false)]
    pub enable_cross_light: bool,
    #[builder(default)]
    pub scale: ScaleConfig,
    #[serde(alias = "crosslight")]
    #[builder(default)]
    pub cross_light: CrossLightConfig,
    #[builder(default)]
    pub indicator: IndicatorConfig,
    #[serde(alias = "angleLabel")]
    #[builder(default)]
    pub angle_label: LabelConfig,
    #[builder(default)]
    pub histogram: HistogramConfig,
    /// Only the first descriptor is displayed.
    #[builder(default = vec![ModelConfig::default()])]
    pub models: Vec<ModelConfig>,

    // Window host
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// TrueType/OpenType font for the angle label; the label is not
    /// rasterized without one.
    #[serde(skip)]
    pub font_data: Option<Vec<u8>>,
}

impl Default for AngleMeterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AngleMeterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AngleMeterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        for (name, value) in [
            ("sub", self.scale.sub.interval),
            ("primary", self.scale.primary.interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidInterval { name, value });
            }
        }
        for (name, value) in [
            ("sub", self.scale.sub.factor),
            ("primary", self.scale.primary.factor),
            ("histogram", self.histogram.factor),
        ]
        .into_iter()
        .chain(self.models.iter().map(|m| ("model", m.scale_factor)))
        {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidFactor { name, value });
            }
        }
        for (name, value) in [
            ("indicator", self.indicator.opacity),
            ("label", self.angle_label.opacity),
            ("histogram", self.histogram.opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidOpacity { name, value });
            }
        }
        let lengths = [
            ("sub tick width", Some(self.scale.sub.width)),
            ("primary tick width", Some(self.scale.primary.width)),
            ("cross light width", Some(self.cross_light.width)),
            ("cross light padding", Some(self.cross_light.padding)),
            ("histogram width", Some(self.histogram.width)),
            ("indicator radius", self.indicator.radius),
            ("label font size", self.angle_label.font_size),
        ];
        for (name, value) in lengths {
            if let Some(value) = value {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ConfigError::InvalidLength { name, value });
                }
            }
        }
        let dash = self.cross_light.dash;
        let finite = dash.iter().all(|d| d.is_finite() && *d >= 0.0);
        if !finite || dash[0] + dash[1] < MIN_DASH_PERIOD {
            return Err(ConfigError::InvalidDash(dash));
        }
        if !(self.max_framerate.is_finite() && self.max_framerate > 0.0) {
            return Err(ConfigError::InvalidFramerate(self.max_framerate));
        }
        Ok(())
    }

    pub fn indicator_radius(&self) -> f64 {
        self.indicator.radius.unwrap_or(self.radius / 6.0)
    }

    pub fn label_font_size(&self) -> f64 {
        self.angle_label.font_size.unwrap_or(self.radius / 6.0)
    }

    /// Space left around the dial for the indicator and label.
    pub fn base_padding(&self) -> f64 {
        self.radius / 3.0
    }

    pub fn center(&self) -> Point {
        let offset = self.radius + self.base_padding();
        Point::new(offset, offset)
    }

    /// The displayed model: the first descriptor, with its asset resolved
    /// against the top-level `src`.
    pub fn model(&self) -> ModelConfig {
        let mut model = self.models.first().cloned().unwrap_or_default();
        if model.src.is_none() {
            model.src = self.src.clone();
        }
        model
    }

    /// Square the pointer model is fitted into.
    pub fn model_bounds(&self) -> Rect {
        Rect::square_around(self.center(), self.radius * 2.0)
    }

    /// Surface size that fits the whole dial including the padding.
    pub fn preferred_size(&self) -> (u32, u32) {
        let side = (2.0 * (self.radius + self.base_padding())).ceil() as u32;
        (side, side)
    }
}
