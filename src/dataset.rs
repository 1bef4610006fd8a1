use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{Error, Result};

/// Signed presence indicator of one class in one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosNeg {
    Positive,
    Negative,
}

impl PosNeg {
    pub fn value(self) -> i8 {
        match self {
            PosNeg::Positive => 1,
            PosNeg::Negative => -1,
        }
    }
}

/// Spacing of per-class index lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// `"id  1"` / `"id -1"`: labels right-aligned in a two-character column.
    Aligned,
    /// `"id 1"` / `"id -1"`.
    Compact,
}

impl LineStyle {
    pub fn format_line(self, base_id: &str, label: PosNeg) -> String {
        match self {
            LineStyle::Aligned => format!("{} {:>2}", base_id, label.value()),
            LineStyle::Compact => format!("{} {}", base_id, label.value()),
        }
    }
}

/// Which examples contain which classes.
///
/// Example ids are kept in insertion order, which is the order the shuffle
/// starts from; classes are kept sorted.
#[derive(Debug, Clone, Default)]
pub struct ClassLabelTable {
    ids: Vec<String>,
    known_ids: HashSet<String>,
    classes: BTreeMap<String, HashSet<String>>,
}

impl ClassLabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an example and the class names of its objects. Repeated class
    /// names collapse to a single positive label.
    pub fn insert<I, S>(&mut self, base_id: &str, class_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.known_ids.insert(base_id.to_string()) {
            self.ids.push(base_id.to_string());
        }
        for class_name in class_names {
            self.classes
                .entry(class_name.into())
                .or_default()
                .insert(base_id.to_string());
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn label(&self, class_name: &str, base_id: &str) -> PosNeg {
        match self.classes.get(class_name) {
            Some(ids) if ids.contains(base_id) => PosNeg::Positive,
            _ => PosNeg::Negative,
        }
    }

    /// One formatted line per id, in the order given.
    pub fn class_lines(&self, class_name: &str, ids: &[String], style: LineStyle) -> Vec<String> {
        ids.iter()
            .map(|id| style.format_line(id, self.label(class_name, id)))
            .collect()
    }
}

/// A disjoint train/val partition. Both sides are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Split {
    pub train: Vec<String>,
    pub val: Vec<String>,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} train / {} val", self.train.len(), self.val.len())
    }
}

/// Number of validation examples: `floor(total * val_portion)`.
pub fn val_count(total: usize, val_portion: f64) -> usize {
    (total as f64 * val_portion).floor() as usize
}

pub fn check_val_portion(val_portion: f64) -> Result<()> {
    if (0.0..1.0).contains(&val_portion) {
        Ok(())
    } else {
        Err(Error::InvalidValPortion(val_portion))
    }
}

/// Shuffle `ids` with `rng` and take the first `floor(N * val_portion)` as
/// validation, the rest as train.
pub fn split_ids<R>(ids: &[String], val_portion: f64, rng: &mut R) -> Split
where
    R: Rng + ?Sized,
{
    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);

    let val_size = val_count(shuffled.len(), val_portion);
    let mut train = shuffled.split_off(val_size);
    let mut val = shuffled;
    train.sort();
    val.sort();

    Split { train, val }
}

/// Lists produced by the global policy: one split shared by every class.
#[derive(Debug, Clone)]
pub struct GlobalImageSets {
    pub split: Split,
    /// `(class, train lines, val lines)` in class order.
    pub classes: Vec<(String, Vec<String>, Vec<String>)>,
}

pub fn global_image_sets<R>(table: &ClassLabelTable, val_portion: f64, rng: &mut R) -> GlobalImageSets
where
    R: Rng + ?Sized,
{
    let split = split_ids(table.ids(), val_portion, rng);
    let classes = table
        .class_names()
        .map(|class_name| {
            (
                class_name.to_string(),
                table.class_lines(class_name, &split.train, LineStyle::Aligned),
                table.class_lines(class_name, &split.val, LineStyle::Aligned),
            )
        })
        .collect();
    GlobalImageSets { split, classes }
}

/// Lists produced by the per-class policy for one class.
#[derive(Debug, Clone)]
pub struct ClassImageSets {
    pub class_name: String,
    pub trainval: Vec<String>,
    /// Present only when a validation portion was requested.
    pub split: Option<(Split, Vec<String>, Vec<String>)>,
}

/// Per-class policy: each class draws its own validation subset from a
/// separately shuffled pool. Classes consume `rng` in sorted order.
pub fn per_class_image_sets<R>(
    table: &ClassLabelTable,
    val_portion: f64,
    rng: &mut R,
) -> (Vec<String>, Vec<ClassImageSets>)
where
    R: Rng + ?Sized,
{
    let mut trainval = table.ids().to_vec();
    trainval.sort();

    let classes = table
        .class_names()
        .map(|class_name| {
            let lines = table.class_lines(class_name, &trainval, LineStyle::Compact);
            let split = if val_portion > 0.0 {
                let split = split_ids(&trainval, val_portion, rng);
                let train = table.class_lines(class_name, &split.train, LineStyle::Compact);
                let val = table.class_lines(class_name, &split.val, LineStyle::Compact);
                Some((split, train, val))
            } else {
                None
            };
            ClassImageSets {
                class_name: class_name.to_string(),
                trainval: lines,
                split,
            }
        })
        .collect();

    (trainval, classes)
}
