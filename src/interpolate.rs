//! Per-page style interpolation.
//!
//! A [`PageInterpolation`] maps style property names to an [`Interpolation`];
//! evaluating it against a page's offset from the focused position yields a
//! [`Style`]. Offsets are in pages: 0 is the focused page, -1 the page before
//! it, 1 the page after it.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Style key the pager lifts out of interpolated styles and applies to the
/// page container instead.
pub const Z_INDEX: &str = "z_index";

/// What to do with an offset outside the configured input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolate {
    /// Keep following the nearest segment's slope.
    #[default]
    Extend,
    /// Hold the nearest output value.
    Clamp,
    /// Output the offset itself.
    Identity,
}

/// Piecewise-linear mapping from `input_range` to `output_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub input_range: Vec<f32>,
    pub output_range: Vec<f32>,
    /// Policy for both sides unless overridden below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrapolate: Option<Extrapolate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrapolate_left: Option<Extrapolate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrapolate_right: Option<Extrapolate>,
}

impl RangeConfig {
    pub fn new(input_range: impl Into<Vec<f32>>, output_range: impl Into<Vec<f32>>) -> Self {
        Self {
            input_range: input_range.into(),
            output_range: output_range.into(),
            extrapolate: None,
            extrapolate_left: None,
            extrapolate_right: None,
        }
    }

    pub fn extrapolate(mut self, policy: Extrapolate) -> Self {
        self.extrapolate = Some(policy);
        self
    }

    pub fn extrapolate_left(mut self, policy: Extrapolate) -> Self {
        self.extrapolate_left = Some(policy);
        self
    }

    pub fn extrapolate_right(mut self, policy: Extrapolate) -> Self {
        self.extrapolate_right = Some(policy);
        self
    }

    fn left_policy(&self) -> Extrapolate {
        self.extrapolate_left.or(self.extrapolate).unwrap_or_default()
    }

    fn right_policy(&self) -> Extrapolate {
        self.extrapolate_right.or(self.extrapolate).unwrap_or_default()
    }

    /// Ranges must be the same length, at least two points long, and the
    /// input range must never decrease.
    pub fn is_valid(&self) -> bool {
        self.input_range.len() >= 2
            && self.input_range.len() == self.output_range.len()
            && self.input_range.windows(2).all(|w| w[0] <= w[1])
    }
}

/// A range whose result is rendered as text with a unit suffix, e.g. `"12deg"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRangeConfig {
    #[serde(flatten)]
    pub range: RangeConfig,
    pub unit: String,
}

/// Arbitrary function of the page offset.
#[derive(Clone)]
pub struct OffsetFn(Arc<dyn Fn(f32) -> StyleValue + Send + Sync>);

impl OffsetFn {
    pub fn call(&self, offset: f32) -> StyleValue {
        (self.0)(offset)
    }
}

impl fmt::Debug for OffsetFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OffsetFn(..)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Interpolation {
    /// Ordered list of nested configs, e.g. a transform stack.
    Composite(Vec<PageInterpolation>),
    Unit(UnitRangeConfig),
    Range(RangeConfig),
    #[serde(skip)]
    Function(OffsetFn),
    /// Anything that did not match a known shape. Evaluates to nothing.
    #[serde(skip_serializing)]
    Ignored(IgnoredAny),
}

impl Interpolation {
    pub fn range(input_range: impl Into<Vec<f32>>, output_range: impl Into<Vec<f32>>) -> Self {
        Interpolation::Range(RangeConfig::new(input_range, output_range))
    }

    pub fn unit(range: RangeConfig, unit: impl Into<String>) -> Self {
        Interpolation::Unit(UnitRangeConfig { range, unit: unit.into() })
    }

    pub fn function(f: impl Fn(f32) -> StyleValue + Send + Sync + 'static) -> Self {
        Interpolation::Function(OffsetFn(Arc::new(f)))
    }

    pub fn composite(items: impl Into<Vec<PageInterpolation>>) -> Self {
        Interpolation::Composite(items.into())
    }

    /// Evaluate for one offset. `None` means the property is left out.
    pub fn evaluate(&self, offset: f32) -> Option<StyleValue> {
        match self {
            Interpolation::Composite(items) => Some(StyleValue::List(
                items.iter().map(|item| interpolate_with_config(offset, item)).collect(),
            )),
            Interpolation::Unit(UnitRangeConfig { range, unit }) => {
                checked(offset, range).map(|v| StyleValue::Text(format!("{}{}", v, unit)))
            }
            Interpolation::Range(range) => checked(offset, range).map(StyleValue::Number),
            Interpolation::Function(f) => Some(f.call(offset)),
            Interpolation::Ignored(_) => None,
        }
    }
}

/// Named style properties to interpolate for every page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageInterpolation(BTreeMap<String, Interpolation>);

impl PageInterpolation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: impl Into<String>, interpolation: Interpolation) -> Self {
        self.insert(property, interpolation);
        self
    }

    pub fn insert(&mut self, property: impl Into<String>, interpolation: Interpolation) {
        self.0.insert(property.into(), interpolation);
    }

    pub fn get(&self, property: &str) -> Option<&Interpolation> {
        self.0.get(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Interpolation)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f32),
    Text(String),
    List(Vec<Style>),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Style]> {
        match self {
            StyleValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<f32> for StyleValue {
    fn from(n: f32) -> Self {
        StyleValue::Number(n)
    }
}

pub type Style = BTreeMap<String, StyleValue>;

/// Evaluate every property of `config` at `offset`.
pub fn interpolate_with_config(offset: f32, config: &PageInterpolation) -> Style {
    config
        .iter()
        .filter_map(|(key, interp)| interp.evaluate(offset).map(|v| (key.to_string(), v)))
        .collect()
}

/// Piecewise-linear interpolation with per-side extrapolation. `None` when
/// `config` fails [`RangeConfig::is_valid`].
pub fn interpolate(value: f32, config: &RangeConfig) -> Option<f32> {
    if !config.is_valid() {
        return None;
    }
    let input = &config.input_range;
    let output = &config.output_range;
    let last = input.len() - 1;

    if value < input[0] {
        match config.left_policy() {
            Extrapolate::Clamp => return Some(output[0]),
            Extrapolate::Identity => return Some(value),
            Extrapolate::Extend => {}
        }
    }
    if value > input[last] {
        match config.right_policy() {
            Extrapolate::Clamp => return Some(output[last]),
            Extrapolate::Identity => return Some(value),
            Extrapolate::Extend => {}
        }
    }

    let mut i = 0;
    while i + 1 < last && value >= input[i + 1] {
        i += 1;
    }
    let (in_s, in_e) = (input[i], input[i + 1]);
    let (out_s, out_e) = (output[i], output[i + 1]);
    let span = in_e - in_s;
    if span.abs() <= f32::EPSILON {
        return Some(if value < in_e { out_s } else { out_e });
    }
    Some(out_s + (value - in_s) / span * (out_e - out_s))
}

fn checked(offset: f32, range: &RangeConfig) -> Option<f32> {
    let Some(v) = interpolate(offset, range) else {
        log::debug!(
            "skipping interpolation with {} inputs / {} outputs",
            range.input_range.len(),
            range.output_range.len()
        );
        return None;
    };
    // Avoid "-0deg" and friends.
    Some(if v == 0.0 { 0.0 } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn at(value: f32, cfg: &RangeConfig) -> f32 {
        interpolate(value, cfg).unwrap()
    }

    fn fade() -> RangeConfig {
        RangeConfig::new([-1.0, 0.0, 1.0], [0.0, 1.0, 0.0])
    }

    // ── interpolate ─────────────────────────────────────────────────────

    #[test]
    fn inside_range_is_linear() {
        let cfg = fade();
        assert!(approx(at(0.0, &cfg), 1.0));
        assert!(approx(at(-0.5, &cfg), 0.5));
        assert!(approx(at(0.25, &cfg), 0.75));
        assert!(approx(at(1.0, &cfg), 0.0));
    }

    #[test]
    fn extend_is_default() {
        let cfg = RangeConfig::new([0.0, 1.0], [0.0, 10.0]);
        assert!(approx(at(2.0, &cfg), 20.0));
        assert!(approx(at(-1.0, &cfg), -10.0));
    }

    #[test]
    fn clamp_holds_edge_outputs() {
        let cfg = fade().extrapolate(Extrapolate::Clamp);
        assert!(approx(at(-3.0, &cfg), 0.0));
        assert!(approx(at(5.0, &cfg), 0.0));
    }

    #[test]
    fn identity_returns_offset() {
        let cfg = RangeConfig::new([0.0, 1.0], [5.0, 6.0]).extrapolate(Extrapolate::Identity);
        assert!(approx(at(-2.5, &cfg), -2.5));
        assert!(approx(at(3.0, &cfg), 3.0));
    }

    #[test]
    fn sides_are_independent() {
        let cfg = RangeConfig::new([0.0, 1.0], [0.0, 1.0])
            .extrapolate(Extrapolate::Clamp)
            .extrapolate_right(Extrapolate::Extend);
        assert!(approx(at(-1.0, &cfg), 0.0));
        assert!(approx(at(2.0, &cfg), 2.0));
    }

    #[test]
    fn picks_the_right_segment() {
        let cfg = RangeConfig::new([-1.0, 0.0, 1.0, 2.0], [0.0, 0.0, 10.0, -15.0]);
        assert!(approx(at(1.5, &cfg), -2.5));
        assert!(approx(at(0.5, &cfg), 5.0));
        // last segment slope continues past the end
        assert!(approx(at(3.0, &cfg), -40.0));
    }

    #[test]
    fn zero_width_segment_steps() {
        let cfg = RangeConfig::new([0.0, 1.0, 1.0, 2.0], [0.0, 1.0, 5.0, 6.0]);
        assert!(approx(at(0.99, &cfg), 0.99));
        assert!(approx(at(1.5, &cfg), 5.5));
    }

    #[test]
    fn degenerate_ranges_yield_nothing() {
        assert_eq!(interpolate(0.5, &RangeConfig::new(Vec::<f32>::new(), Vec::<f32>::new())), None);
        assert_eq!(interpolate(0.5, &RangeConfig::new([0.0], [1.0])), None);
        assert_eq!(interpolate(0.5, &RangeConfig::new([0.0, 1.0], [1.0])), None);
        assert_eq!(interpolate(-2.0, &RangeConfig::new([0.0], [1.0]).extrapolate(Extrapolate::Identity)), None);
    }

    // ── is_valid ────────────────────────────────────────────────────────

    #[test]
    fn validity_rules() {
        assert!(fade().is_valid());
        assert!(!RangeConfig::new([0.0], [1.0]).is_valid());
        assert!(!RangeConfig::new([0.0, 1.0], [1.0]).is_valid());
        assert!(!RangeConfig::new([1.0, 0.0], [0.0, 1.0]).is_valid());
    }

    // ── interpolate_with_config ─────────────────────────────────────────

    #[test]
    fn unit_suffix_is_appended() {
        let cfg = PageInterpolation::new().with(
            "rotate",
            Interpolation::unit(RangeConfig::new([-1.0, 0.0, 1.0], [-20.0, 0.0, 20.0]), "deg"),
        );
        let style = interpolate_with_config(-0.5, &cfg);
        assert_eq!(style["rotate"].as_text(), Some("-10deg"));
        let style = interpolate_with_config(0.0, &cfg);
        assert_eq!(style["rotate"].as_text(), Some("0deg"));
    }

    #[test]
    fn composite_keeps_order() {
        let cfg = PageInterpolation::new().with(
            "transform",
            Interpolation::composite(vec![
                PageInterpolation::new().with("scale", Interpolation::range([-1.0, 0.0, 1.0], [0.9, 1.0, 0.9])),
                PageInterpolation::new().with("translate_y", Interpolation::range([0.0, 1.0], [0.0, 10.0])),
            ]),
        );
        let style = interpolate_with_config(1.0, &cfg);
        let list = style["transform"].as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(approx(list[0]["scale"].as_number().unwrap(), 0.9));
        assert!(approx(list[1]["translate_y"].as_number().unwrap(), 10.0));
    }

    #[test]
    fn function_receives_offset() {
        let cfg = PageInterpolation::new()
            .with(Z_INDEX, Interpolation::function(|offset| StyleValue::Number(-offset.floor())));
        let style = interpolate_with_config(2.3, &cfg);
        assert_eq!(style[Z_INDEX], StyleValue::Number(-2.0));
    }

    #[test]
    fn malformed_entries_are_omitted() {
        let cfg = PageInterpolation::new()
            .with("opacity", Interpolation::range([0.0, 1.0], [1.0]))
            .with("junk", Interpolation::Ignored(IgnoredAny))
            .with("scale", Interpolation::range([0.0, 1.0], [1.0, 2.0]));
        let style = interpolate_with_config(0.5, &cfg);
        assert_eq!(style.len(), 1);
        assert!(style.contains_key("scale"));
    }

    #[test]
    fn unknown_shapes_deserialize_as_ignored() {
        let cfg: PageInterpolation = toml::from_str(
            "opacity = 4\ncolor = \"red\"\n[scale]\ninput_range = [0, 1]\noutput_range = [1, 2]\n",
        )
        .unwrap();
        assert!(matches!(cfg.get("opacity"), Some(Interpolation::Ignored(_))));
        assert!(matches!(cfg.get("color"), Some(Interpolation::Ignored(_))));
        assert!(matches!(cfg.get("scale"), Some(Interpolation::Range(_))));
        let style = interpolate_with_config(0.5, &cfg);
        assert_eq!(style.keys().collect::<Vec<_>>(), vec!["scale"]);
    }

    #[test]
    fn unit_table_deserializes_as_unit() {
        let cfg: PageInterpolation = toml::from_str(
            "[rotate]\ninput_range = [-1, 1]\noutput_range = [-5, 5]\nunit = \"deg\"\nextrapolate = \"clamp\"\n",
        )
        .unwrap();
        match cfg.get("rotate") {
            Some(Interpolation::Unit(u)) => {
                assert_eq!(u.unit, "deg");
                assert_eq!(u.range.extrapolate, Some(Extrapolate::Clamp));
            }
            other => panic!("expected unit config, got {other:?}"),
        }
    }
}
