use serde::{Serialize, Serializer, ser::SerializeSeq};

/// Feature filter over a single string property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// `["in", key, values...]`
    In {
        key: &'static str,
        values: &'static [&'static str],
    },
    /// `["==", key, value]`
    Eq {
        key: &'static str,
        value: &'static str,
    },
}

impl Filter {
    pub const fn class_in(values: &'static [&'static str]) -> Self {
        Filter::In {
            key: "class",
            values,
        }
    }

    pub const fn class_eq(value: &'static str) -> Self {
        Filter::Eq {
            key: "class",
            value,
        }
    }

    pub fn matches(&self, class: &str) -> bool {
        match self {
            Filter::In { values, .. } => values.contains(&class),
            Filter::Eq { value, .. } => *value == class,
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::In { key, values } => {
                let mut seq = serializer.serialize_seq(Some(2 + values.len()))?;
                seq.serialize_element("in")?;
                seq.serialize_element(key)?;
                for value in values.iter() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Filter::Eq { key, value } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("==")?;
                seq.serialize_element(key)?;
                seq.serialize_element(value)?;
                seq.end()
            }
        }
    }
}

/// `["interpolate", ["linear"], ["zoom"], z0, v0, z1, v1, ...]`
///
/// Breakpoints must be strictly increasing in zoom. Outside the first and last
/// breakpoint the value is clamped, which is how the rendering engine evaluates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomInterpolation {
    pub stops: &'static [(f64, f64)],
}

impl ZoomInterpolation {
    pub const fn linear(stops: &'static [(f64, f64)]) -> Self {
        ZoomInterpolation { stops }
    }

    pub fn value_at(&self, zoom: f64) -> f64 {
        let Some(&(first_zoom, first_value)) = self.stops.first() else {
            return 0.0;
        };
        if zoom <= first_zoom {
            return first_value;
        }

        for pair in self.stops.windows(2) {
            let (z0, v0) = pair[0];
            let (z1, v1) = pair[1];

            if zoom <= z1 {
                let t = (zoom - z0) / (z1 - z0);
                return v0 + (v1 - v0) * t;
            }
        }

        self.stops.last().map_or(first_value, |&(_, value)| value)
    }

    pub fn has_increasing_breakpoints(&self) -> bool {
        self.stops.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.stops.windows(2).all(|pair| pair[0].1 <= pair[1].1)
    }
}

impl Serialize for ZoomInterpolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3 + self.stops.len() * 2))?;
        seq.serialize_element("interpolate")?;
        seq.serialize_element(&["linear"])?;
        seq.serialize_element(&["zoom"])?;
        for (zoom, value) in self.stops.iter() {
            seq.serialize_element(zoom)?;
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}
