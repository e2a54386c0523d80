use crate::animation::channel::CurveKey;
use crate::animation::schedule::Keyframe;

/// One animated channel of a bone, keyed on absolute frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FCurve {
    pub key: CurveKey,
    pub keyframes: Vec<Keyframe<f32>>,
}

impl FCurve {
    #[must_use]
    pub fn new(key: CurveKey) -> Self {
        Self {
            key,
            keyframes: Vec::new(),
        }
    }
}

/// The animation attached to an armature as it was found in a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Action {
    pub name: String,
    pub curves: Vec<FCurve>,
}

impl Action {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// The curve for `key`, created empty if missing.
    pub fn curve_mut(&mut self, key: CurveKey) -> &mut FCurve {
        match self.curves.iter().position(|c| c.key == key) {
            Some(i) => &mut self.curves[i],
            None => {
                self.curves.push(FCurve::new(key));
                let last = self.curves.len() - 1;
                &mut self.curves[last]
            }
        }
    }

    #[must_use]
    pub fn curve(&self, key: &CurveKey) -> Option<&FCurve> {
        self.curves.iter().find(|c| &c.key == key)
    }

    #[must_use]
    pub fn has_keyframes(&self) -> bool {
        self.curves.iter().any(|c| !c.keyframes.is_empty())
    }

    /// Drops every keyframe, keeping the curves themselves.
    pub fn clear_keyframes(&mut self) {
        for curve in &mut self.curves {
            curve.keyframes.clear();
        }
    }
}
