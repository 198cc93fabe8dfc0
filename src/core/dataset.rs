use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One labeled sample.
///
/// `aux` carries an optional second feature that is shown to the learner but never
/// fed to the update rules (e.g. BMI on the insurance data).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPoint {
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aux: Option<f64>,
    pub y: f64,
}

impl DataPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, aux: None, y }
    }

    pub const fn with_aux(x: f64, aux: f64, y: f64) -> Self {
        Self {
            x,
            aux: Some(aux),
            y,
        }
    }
}

/// Immutable, ordered sample set shared by a view, its update rule and its renderer.
///
/// Cloning is cheap (the points live behind an `Rc`), which keeps the "never mutated
/// while mounted" guarantee structural: there is no `&mut` access to the points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aux_label: Option<String>,
    points: Rc<[DataPoint]>,
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<DataPoint>,
    ) -> Self {
        let name = name.into();
        Self {
            name: if name.trim().is_empty() {
                "dataset".to_string()
            } else {
                name
            },
            x_label: x_label.into(),
            y_label: y_label.into(),
            aux_label: None,
            points: points.into(),
        }
    }

    pub fn with_aux_label(mut self, label: impl Into<String>) -> Self {
        self.aux_label = Some(label.into());
        self
    }

    /// Insurance charges by age (with BMI as the auxiliary feature).
    pub fn insurance_charges() -> Self {
        Self::new(
            "insurance_charges",
            "age",
            "charges",
            vec![
                DataPoint::with_aux(18.0, 20.0, 2000.0),
                DataPoint::with_aux(22.0, 25.0, 3000.0),
                DataPoint::with_aux(30.0, 27.0, 4500.0),
                DataPoint::with_aux(35.0, 30.0, 6000.0),
                DataPoint::with_aux(40.0, 32.0, 7200.0),
                DataPoint::with_aux(50.0, 35.0, 9000.0),
            ],
        )
        .with_aux_label("bmi")
    }

    /// Binary outcome that flips between x=2 and x=3.
    pub fn pass_fail() -> Self {
        Self::new(
            "pass_fail",
            "x",
            "y",
            vec![
                DataPoint::new(1.0, 0.0),
                DataPoint::new(2.0, 0.0),
                DataPoint::new(3.0, 1.0),
                DataPoint::new(4.0, 1.0),
                DataPoint::new(5.0, 1.0),
            ],
        )
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(min, max)` of `x`, or `None` for an empty set.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.x))
    }

    pub fn y_extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.y))
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_datasets_are_stable() {
        let ins = Dataset::insurance_charges();
        assert_eq!(ins.len(), 6);
        assert_eq!(ins.points()[0], DataPoint::with_aux(18.0, 20.0, 2000.0));
        assert_eq!(ins.aux_label.as_deref(), Some("bmi"));
        assert_eq!(ins.x_extent(), Some((18.0, 50.0)));
        assert_eq!(ins.y_extent(), Some((2000.0, 9000.0)));

        let pf = Dataset::pass_fail();
        assert_eq!(pf.len(), 5);
        assert!(pf.points().iter().all(|p| p.y == 0.0 || p.y == 1.0));
        assert!(pf.points().iter().all(|p| p.aux.is_none()));
    }

    #[test]
    fn clones_share_points() {
        let a = Dataset::pass_fail();
        let b = a.clone();
        assert!(std::ptr::eq(a.points().as_ptr(), b.points().as_ptr()));
    }

    #[test]
    fn empty_dataset_has_no_extent() {
        let d = Dataset::new("", "x", "y", Vec::new());
        assert!(d.is_empty());
        assert_eq!(d.name, "dataset");
        assert_eq!(d.x_extent(), None);
    }
}
