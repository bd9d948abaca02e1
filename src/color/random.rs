use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use super::{Color, ColorParseError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomOptionError {
    #[error("hue {0} is outside 0..=360")]
    HueOutOfRange(i64),
    #[error("unknown hue {0:?}; expected degrees, a color name or #RRGGBB")]
    UnknownHue(String),
    #[error("unknown luminosity {0:?}; expected bright, light, dark or random")]
    UnknownLuminosity(String),
    #[error("unknown color format {0:?}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedHue {
    Monochrome,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl NamedHue {
    const ALL: [NamedHue; 8] = [
        NamedHue::Monochrome,
        NamedHue::Red,
        NamedHue::Orange,
        NamedHue::Yellow,
        NamedHue::Green,
        NamedHue::Blue,
        NamedHue::Purple,
        NamedHue::Pink,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            NamedHue::Monochrome => "monochrome",
            NamedHue::Red => "red",
            NamedHue::Orange => "orange",
            NamedHue::Yellow => "yellow",
            NamedHue::Green => "green",
            NamedHue::Blue => "blue",
            NamedHue::Purple => "purple",
            NamedHue::Pink => "pink",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|hue| hue.as_str().eq_ignore_ascii_case(value))
    }
}

/// Hue constraint for the random color source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum HueSpec {
    Degrees(u16),
    Named(NamedHue),
    /// The hue of the given color is used as a fixed hue.
    Hex(Color),
}

impl FromStr for HueSpec {
    type Err = RandomOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(degrees) = value.parse::<i64>() {
            return u16::try_from(degrees)
                .ok()
                .filter(|degrees| *degrees <= 360)
                .map(HueSpec::Degrees)
                .ok_or(RandomOptionError::HueOutOfRange(degrees));
        }
        if let Some(named) = NamedHue::parse(value) {
            return Ok(HueSpec::Named(named));
        }
        Color::from_hex(value)
            .map(HueSpec::Hex)
            .map_err(|ColorParseError::InvalidHex(raw)| RandomOptionError::UnknownHue(raw))
    }
}

impl TryFrom<String> for HueSpec {
    type Error = RandomOptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Luminosity {
    Bright,
    Light,
    Dark,
    Random,
}

impl FromStr for Luminosity {
    type Err = RandomOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bright" => Ok(Luminosity::Bright),
            "light" => Ok(Luminosity::Light),
            "dark" => Ok(Luminosity::Dark),
            "random" => Ok(Luminosity::Random),
            _ => Err(RandomOptionError::UnknownLuminosity(value.to_string())),
        }
    }
}

/// Seed for reproducible output. Text seeds hash to the sum of their code points.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RandomSeed {
    Number(u64),
    Text(String),
}

impl RandomSeed {
    pub fn to_u64(&self) -> u64 {
        match self {
            RandomSeed::Number(value) => *value,
            RandomSeed::Text(text) => text.chars().map(|c| u64::from(u32::from(c))).sum(),
        }
    }

    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.to_u64())
    }
}

impl FromStr for RandomSeed {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(value
            .parse::<u64>()
            .map(RandomSeed::Number)
            .unwrap_or_else(|_| RandomSeed::Text(value.to_string())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    RgbArray,
    HslArray,
    HsvArray,
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
}

impl FromStr for ColorFormat {
    type Err = RandomOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "rgbarray" => Ok(ColorFormat::RgbArray),
            "hslarray" => Ok(ColorFormat::HslArray),
            "hsvarray" => Ok(ColorFormat::HsvArray),
            "hex" => Ok(ColorFormat::Hex),
            "rgb" => Ok(ColorFormat::Rgb),
            "rgba" => Ok(ColorFormat::Rgba),
            "hsl" => Ok(ColorFormat::Hsl),
            "hsla" => Ok(ColorFormat::Hsla),
            _ => Err(RandomOptionError::UnknownFormat(value.to_string())),
        }
    }
}

/// A generated color rendered in the requested format.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomValue {
    Rgb([u8; 3]),
    Hsl([f64; 3]),
    Hsv([u16; 3]),
    Text(String),
}

impl fmt::Display for RandomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomValue::Rgb([r, g, b]) => write!(f, "[{r}, {g}, {b}]"),
            RandomValue::Hsl([h, s, l]) => write!(f, "[{h}, {s}, {l}]"),
            RandomValue::Hsv([h, s, v]) => write!(f, "[{h}, {s}, {v}]"),
            RandomValue::Text(text) => f.write_str(text),
        }
    }
}

/// Hue in degrees, saturation and brightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvColor {
    pub hue: u16,
    pub saturation: u8,
    pub brightness: u8,
}

impl HsvColor {
    pub fn to_rgb(self) -> [u8; 3] {
        let hue = match self.hue {
            0 => 1,
            360 => 359,
            other => other,
        };
        let h = f64::from(hue) / 360.0;
        let s = f64::from(self.saturation) / 100.0;
        let v = f64::from(self.brightness) / 100.0;

        let sector = (h * 6.0).floor();
        let f = h * 6.0 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        [to_byte(r), to_byte(g), to_byte(b)]
    }

    /// `[hue, saturation %, lightness %]`, saturation rounded to two decimals.
    pub fn to_hsl(self) -> [f64; 3] {
        let s = f64::from(self.saturation) / 100.0;
        let v = f64::from(self.brightness) / 100.0;
        let k = (2.0 - s) * v;
        let divisor = if k < 1.0 { k } else { 2.0 - k };
        let saturation = if divisor == 0.0 {
            0.0
        } else {
            (s * v / divisor * 10_000.0).round() / 100.0
        };
        [f64::from(self.hue), saturation, k / 2.0 * 100.0]
    }

    pub fn format(self, format: ColorFormat, alpha: f64) -> RandomValue {
        let [r, g, b] = self.to_rgb();
        let [h, s, l] = self.to_hsl();
        match format {
            ColorFormat::RgbArray => RandomValue::Rgb([r, g, b]),
            ColorFormat::HslArray => RandomValue::Hsl([h, s, l]),
            ColorFormat::HsvArray => RandomValue::Hsv([
                self.hue,
                u16::from(self.saturation),
                u16::from(self.brightness),
            ]),
            ColorFormat::Hex => RandomValue::Text(Color::opaque(r, g, b).to_hex()),
            ColorFormat::Rgb => RandomValue::Text(format!("rgb({r}, {g}, {b})")),
            ColorFormat::Rgba => RandomValue::Text(format!("rgba({r}, {g}, {b}, {alpha})")),
            ColorFormat::Hsl => RandomValue::Text(format!("hsl({h}, {s}%, {l}%)")),
            ColorFormat::Hsla => RandomValue::Text(format!("hsla({h}, {s}%, {l}%, {alpha})")),
        }
    }
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).floor().clamp(0.0, 255.0) as u8
}

struct HueBounds {
    name: NamedHue,
    hue_range: Option<(i32, i32)>,
    lower_bounds: &'static [(i32, i32)],
}

impl HueBounds {
    fn saturation_range(&self) -> (i32, i32) {
        let first = self.lower_bounds[0];
        let last = self.lower_bounds[self.lower_bounds.len() - 1];
        (first.0, last.0)
    }
}

static HUE_TABLE: [HueBounds; 8] = [
    HueBounds {
        name: NamedHue::Monochrome,
        hue_range: None,
        lower_bounds: &[(0, 0), (100, 0)],
    },
    HueBounds {
        name: NamedHue::Red,
        hue_range: Some((-26, 18)),
        lower_bounds: &[
            (20, 100),
            (30, 92),
            (40, 89),
            (50, 85),
            (60, 78),
            (70, 70),
            (80, 60),
            (90, 55),
            (100, 50),
        ],
    },
    HueBounds {
        name: NamedHue::Orange,
        hue_range: Some((18, 46)),
        lower_bounds: &[
            (20, 100),
            (30, 93),
            (40, 88),
            (50, 86),
            (60, 85),
            (70, 70),
            (100, 70),
        ],
    },
    HueBounds {
        name: NamedHue::Yellow,
        hue_range: Some((46, 62)),
        lower_bounds: &[
            (25, 100),
            (40, 94),
            (50, 89),
            (60, 86),
            (70, 84),
            (80, 82),
            (90, 80),
            (100, 75),
        ],
    },
    HueBounds {
        name: NamedHue::Green,
        hue_range: Some((62, 178)),
        lower_bounds: &[
            (30, 100),
            (40, 90),
            (50, 85),
            (60, 81),
            (70, 74),
            (80, 64),
            (90, 50),
            (100, 40),
        ],
    },
    HueBounds {
        name: NamedHue::Blue,
        hue_range: Some((178, 257)),
        lower_bounds: &[
            (20, 100),
            (30, 86),
            (40, 80),
            (50, 74),
            (60, 60),
            (70, 52),
            (80, 44),
            (90, 39),
            (100, 35),
        ],
    },
    HueBounds {
        name: NamedHue::Purple,
        hue_range: Some((257, 282)),
        lower_bounds: &[
            (20, 100),
            (30, 87),
            (40, 79),
            (50, 70),
            (60, 65),
            (70, 59),
            (80, 52),
            (90, 45),
            (100, 42),
        ],
    },
    HueBounds {
        name: NamedHue::Pink,
        hue_range: Some((282, 334)),
        lower_bounds: &[(30, 90), (40, 86), (60, 84), (80, 80), (90, 75), (100, 73)],
    },
];

fn bounds_for_hue(hue: i32) -> Option<&'static HueBounds> {
    let hue = if (334..=360).contains(&hue) { hue - 360 } else { hue };
    HUE_TABLE.iter().find(|entry| {
        entry
            .hue_range
            .is_some_and(|(start, end)| hue >= start && hue <= end)
    })
}

fn bounds_for_name(name: NamedHue) -> Option<&'static HueBounds> {
    HUE_TABLE.iter().find(|entry| entry.name == name)
}

/// Uniform integer in `[min, max]`, also for fractional bounds.
fn random_within<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    (min + rng.gen::<f64>() * (max + 1.0 - min)).floor()
}

/// Random color source producing pleasant, optionally constrained colors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RandomColor {
    hue: Option<HueSpec>,
    luminosity: Option<Luminosity>,
    alpha: Option<f64>,
}

impl RandomColor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hue(mut self, hue: Option<HueSpec>) -> Self {
        self.hue = hue;
        self
    }

    pub fn with_luminosity(mut self, luminosity: Option<Luminosity>) -> Self {
        self.luminosity = luminosity;
        self
    }

    /// Fixed alpha for the `rgba`/`hsla` string formats; random otherwise.
    pub fn with_alpha(mut self, alpha: Option<f64>) -> Self {
        self.alpha = alpha.map(|alpha| alpha.clamp(0.0, 1.0));
        self
    }

    pub fn hsv<R: Rng + ?Sized>(&self, rng: &mut R) -> HsvColor {
        let hue = self.pick_hue(rng);
        let saturation = self.pick_saturation(hue, rng);
        let brightness = self.pick_brightness(hue, saturation, rng);
        HsvColor {
            hue: hue.clamp(0, 360) as u16,
            saturation: saturation.clamp(0, 100) as u8,
            brightness: brightness.clamp(0, 100) as u8,
        }
    }

    pub fn rgb<R: Rng + ?Sized>(&self, rng: &mut R) -> [u8; 3] {
        self.hsv(rng).to_rgb()
    }

    pub fn generate<R: Rng + ?Sized>(&self, format: ColorFormat, rng: &mut R) -> RandomValue {
        let hsv = self.hsv(rng);
        let alpha = self
            .alpha
            .unwrap_or_else(|| (rng.gen::<f64>() * 100.0).round() / 100.0);
        hsv.format(format, alpha)
    }

    fn hue_range(&self) -> (i32, i32) {
        match self.hue {
            Some(HueSpec::Degrees(degrees)) => (i32::from(degrees), i32::from(degrees)),
            Some(HueSpec::Named(name)) => bounds_for_name(name)
                .and_then(|entry| entry.hue_range)
                .unwrap_or((0, 360)),
            Some(HueSpec::Hex(color)) => {
                let hue = hue_of(color);
                (hue, hue)
            }
            None => (0, 360),
        }
    }

    fn pick_hue<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let (start, end) = self.hue_range();
        let hue = random_within(rng, f64::from(start), f64::from(end)) as i32;
        if hue < 0 {
            hue + 360
        } else {
            hue
        }
    }

    fn pick_saturation<R: Rng + ?Sized>(&self, hue: i32, rng: &mut R) -> i32 {
        if self.hue == Some(HueSpec::Named(NamedHue::Monochrome)) {
            return 0;
        }
        if self.luminosity == Some(Luminosity::Random) {
            return random_within(rng, 0.0, 100.0) as i32;
        }
        let (mut min, mut max) = bounds_for_hue(hue)
            .map(HueBounds::saturation_range)
            .unwrap_or((0, 100));
        match self.luminosity {
            Some(Luminosity::Bright) => min = 55,
            Some(Luminosity::Dark) => min = max - 10,
            Some(Luminosity::Light) => max = 55,
            _ => {}
        }
        random_within(rng, f64::from(min), f64::from(max)) as i32
    }

    fn pick_brightness<R: Rng + ?Sized>(&self, hue: i32, saturation: i32, rng: &mut R) -> i32 {
        let mut min = minimum_brightness(hue, saturation);
        let mut max = 100.0;
        match self.luminosity {
            Some(Luminosity::Dark) => max = min + 20.0,
            Some(Luminosity::Light) => min = (max + min) / 2.0,
            Some(Luminosity::Random) => {
                min = 0.0;
                max = 100.0;
            }
            _ => {}
        }
        random_within(rng, min, max) as i32
    }
}

fn minimum_brightness(hue: i32, saturation: i32) -> f64 {
    let Some(entry) = bounds_for_hue(hue) else {
        return 0.0;
    };
    entry
        .lower_bounds
        .windows(2)
        .find(|pair| saturation >= pair[0].0 && saturation <= pair[1].0)
        .map(|pair| {
            let (s1, v1) = (f64::from(pair[0].0), f64::from(pair[0].1));
            let (s2, v2) = (f64::from(pair[1].0), f64::from(pair[1].1));
            let slope = (v2 - v1) / (s2 - s1);
            let intercept = v1 - slope * s1;
            slope * f64::from(saturation) + intercept
        })
        .unwrap_or(0.0)
}

fn hue_of(color: Color) -> i32 {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta == 0.0 {
        return 0;
    }
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (sector * 60.0).round() as i32 % 360
}

/// Four fresh opaque corner colors.
pub fn random_corner_colors<R: Rng + ?Sized>(source: &RandomColor, rng: &mut R) -> [Color; 4] {
    std::array::from_fn(|_| Color::from(source.rgb(rng)))
}
