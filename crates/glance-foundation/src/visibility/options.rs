use glance_ui_graphics::EdgeInsets;
use std::hash::{Hash, Hasher};

/// Default fraction of an element that must be visible before it counts as seen.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Visible-area fraction in `[0, 1]` required to report an element as visible.
///
/// Construction never fails: NaN falls back to [`DEFAULT_THRESHOLD`] and
/// out-of-range values are clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold(f32);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(DEFAULT_THRESHOLD);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            log::warn!("visibility threshold is NaN, using {DEFAULT_THRESHOLD}");
            return Self::DEFAULT;
        }
        if !(0.0..=1.0).contains(&value) {
            let clamped = value.clamp(0.0, 1.0);
            log::warn!("visibility threshold {value} outside [0, 1], clamped to {clamped}");
            return Self(clamped);
        }
        Self(value)
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Whether a measured intersection ratio satisfies this threshold.
    ///
    /// A zero threshold is met by any intersection, including edge contact.
    pub fn is_met_by(self, ratio: f32, intersects: bool) -> bool {
        intersects && (self.0 == 0.0 || ratio >= self.0)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f32> for Threshold {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

// Never NaN after construction.
impl Eq for Threshold {}

impl Hash for Threshold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Options a visibility observer is created with.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObserverOptions {
    pub threshold: Threshold,
    /// Grows (or with negative values shrinks) the root before intersecting,
    /// so elements count as visible while they are near the viewport.
    pub root_margin: EdgeInsets,
}

impl ObserverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Threshold::new(threshold);
        self
    }

    pub fn root_margin(mut self, root_margin: EdgeInsets) -> Self {
        self.root_margin = root_margin;
        self
    }

    /// Hashable identity of these options; observers are recreated when it changes.
    pub fn key(&self) -> (u32, [u32; 4]) {
        let margin = self.root_margin;
        (
            self.threshold.value().to_bits(),
            [
                margin.left.to_bits(),
                margin.top.to_bits(),
                margin.right.to_bits(),
                margin.bottom.to_bits(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_one_tenth() {
        assert_eq!(Threshold::default().value(), 0.1);
    }

    #[test]
    fn out_of_range_thresholds_are_clamped() {
        assert_eq!(Threshold::new(-0.5).value(), 0.0);
        assert_eq!(Threshold::new(3.0).value(), 1.0);
        assert_eq!(Threshold::new(f32::NAN), Threshold::DEFAULT);
    }

    #[test]
    fn zero_threshold_accepts_edge_contact() {
        assert!(Threshold::new(0.0).is_met_by(0.0, true));
        assert!(!Threshold::new(0.0).is_met_by(0.0, false));
        assert!(!Threshold::new(0.1).is_met_by(0.0, true));
        assert!(Threshold::new(0.1).is_met_by(0.1, true));
    }

    #[test]
    fn option_keys_track_margin_changes() {
        let base = ObserverOptions::new();
        let near = base.root_margin(EdgeInsets::vertical(200.0));
        assert_ne!(base.key(), near.key());
        assert_eq!(base.key(), ObserverOptions::new().threshold(0.1).key());
    }
}
