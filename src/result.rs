//! Result types: per-method estimates and flat feature maps.

use std::fmt;
use std::str::FromStr;

/// Why a method produced no value.
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    /// Not more than `threshold` voiced frames were available.
    InsufficientVoicedData { threshold: usize, found: usize },
    /// Not more than `threshold` finite amplitude samples were available.
    InsufficientAmplitudes { threshold: usize, found: usize },
    /// Every evaluation point was skipped (no spectrum, no noise power).
    NoUsableFrames,
    /// The operand mean was zero, so the coefficient of variation is undefined.
    ZeroMean,
    /// The input signal or track was empty.
    EmptyInput,
    /// A backend capability failed.
    Upstream(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::InsufficientVoicedData { threshold, found } => {
                write!(f, "need more than {threshold} voiced frames, found {found}")
            }
            Reason::InsufficientAmplitudes { threshold, found } => {
                write!(f, "need more than {threshold} amplitude samples, found {found}")
            }
            Reason::NoUsableFrames => write!(f, "no evaluation point produced a value"),
            Reason::ZeroMean => write!(f, "operand mean is zero"),
            Reason::EmptyInput => write!(f, "input is empty"),
            Reason::Upstream(msg) => write!(f, "upstream failure: {msg}"),
        }
    }
}

/// Outcome of a single estimation method.
///
/// `Value(0.0)` is a real measurement; `NotComputed` means the method
/// could not produce one for this input.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    Value(f64),
    NotComputed(Reason),
}

impl Estimate {
    /// The measured value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Estimate::Value(v) => Some(*v),
            Estimate::NotComputed(_) => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Estimate::Value(_))
    }

    /// Why no value was produced, if applicable.
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Estimate::Value(_) => None,
            Estimate::NotComputed(r) => Some(r),
        }
    }
}

impl From<Estimate> for Option<f64> {
    fn from(e: Estimate) -> Self {
        e.value()
    }
}

impl From<crate::Error> for Estimate {
    fn from(err: crate::Error) -> Self {
        Estimate::NotComputed(Reason::Upstream(err.to_string()))
    }
}

/// Feature family a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    F0,
    Jitter,
    Shimmer,
    Hnr,
    Zcr,
    VoiceBreaks,
}

impl Family {
    pub const ALL: [Family; 6] = [
        Family::F0,
        Family::Jitter,
        Family::Shimmer,
        Family::Hnr,
        Family::Zcr,
        Family::VoiceBreaks,
    ];

    /// Short lowercase identifier, also the field-name prefix where one exists.
    pub fn name(self) -> &'static str {
        match self {
            Family::F0 => "f0",
            Family::Jitter => "jitter",
            Family::Shimmer => "shimmer",
            Family::Hnr => "hnr",
            Family::Zcr => "zcr",
            Family::VoiceBreaks => "voice-breaks",
        }
    }

    /// Human-readable title used in reports.
    pub fn title(self) -> &'static str {
        match self {
            Family::F0 => "F0",
            Family::Jitter => "Jitter",
            Family::Shimmer => "Shimmer",
            Family::Hnr => "HNR",
            Family::Zcr => "ZCR",
            Family::VoiceBreaks => "Voice Breaks",
        }
    }

    /// Whether the family is derived from the pitch track.
    pub fn needs_pitch(self) -> bool {
        !matches!(self, Family::Zcr)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f0" => Ok(Family::F0),
            "jitter" => Ok(Family::Jitter),
            "shimmer" => Ok(Family::Shimmer),
            "hnr" => Ok(Family::Hnr),
            "zcr" => Ok(Family::Zcr),
            "voice-breaks" | "voice_breaks" => Ok(Family::VoiceBreaks),
            _ => Err(crate::Error::InvalidParameter {
                name: "family",
                value: s.to_string(),
                reason: "expected one of f0, jitter, shimmer, hnr, zcr, voice-breaks".into(),
            }),
        }
    }
}

/// Ordered mapping from field name to optional value.
///
/// Insertion order is preserved so that tabular output has stable columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMap {
    entries: Vec<(String, Option<f64>)>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value of an existing field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// `None` if the field does not exist, `Some(None)` if it is absent.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// The field's value, treating unknown fields as absent.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append all fields of `other`.
    pub fn extend(&mut self, other: FeatureMap) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    /// Whether at least one field holds a value.
    pub fn any_present(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_some())
    }
}

impl<S: Into<String>> FromIterator<(S, Option<f64>)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (S, Option<f64>)>>(iter: I) -> Self {
        let mut map = FeatureMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Built-in and externally supplied estimates for one perturbation or
/// harmonicity family.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodEstimates {
    pub family: Family,
    /// Backend-provided methods in registration order
    pub external: Vec<(String, Estimate)>,
    /// The built-in estimate, reported as `<family>_manual`
    pub manual: Estimate,
}

impl MethodEstimates {
    pub fn new(family: Family, manual: Estimate) -> Self {
        Self {
            family,
            external: Vec::new(),
            manual,
        }
    }

    pub fn manual_field(&self) -> String {
        format!("{}_manual", self.family.name())
    }

    /// The built-in value if present, otherwise the first external value.
    pub fn best(&self) -> Option<f64> {
        self.manual
            .value()
            .or_else(|| self.external.iter().find_map(|(_, e)| e.value()))
    }

    /// Flatten into fields: external methods first, then the built-in one.
    pub fn to_map(&self) -> FeatureMap {
        let mut map: FeatureMap = self
            .external
            .iter()
            .map(|(name, e)| (name.clone(), e.value()))
            .collect();
        map.insert(self.manual_field(), self.manual.value());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_value() {
        assert_eq!(Estimate::Value(0.0).value(), Some(0.0));
        let absent = Estimate::NotComputed(Reason::NoUsableFrames);
        assert_eq!(absent.value(), None);
        assert_eq!(absent.reason(), Some(&Reason::NoUsableFrames));
    }

    #[test]
    fn test_estimate_from_error() {
        let e: Estimate = crate::Error::capability("spectrum provider", "boom").into();
        assert!(matches!(e, Estimate::NotComputed(Reason::Upstream(ref m)) if m.contains("boom")));
    }

    #[test]
    fn test_feature_map_preserves_order_and_replaces() {
        let mut map = FeatureMap::new();
        map.insert("b", Some(1.0));
        map.insert("a", None);
        map.insert("b", Some(2.0));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(Some(2.0)));
        assert_eq!(map.get("a"), Some(None));
        assert_eq!(map.get("c"), None);
        assert!(map.any_present());
    }

    #[test]
    fn test_family_round_trip_names() {
        for family in Family::ALL {
            assert_eq!(family.name().parse::<Family>().unwrap(), family);
        }
        assert!("loudness".parse::<Family>().is_err());
    }

    #[test]
    fn test_method_estimates_isolated_fields() {
        let mut est = MethodEstimates::new(Family::Jitter, Estimate::NotComputed(Reason::ZeroMean));
        est.external.push(("jitter_local".into(), Estimate::Value(0.01)));
        let map = est.to_map();
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["jitter_local", "jitter_manual"]);
        assert_eq!(map.value("jitter_local"), Some(0.01));
        assert_eq!(map.get("jitter_manual"), Some(None));
        assert_eq!(est.best(), Some(0.01));
    }

    #[test]
    fn test_reason_display() {
        let r = Reason::InsufficientVoicedData {
            threshold: 5,
            found: 3,
        };
        assert_eq!(r.to_string(), "need more than 5 voiced frames, found 3");
    }
}
