//! Labeled collections and class-representative selection.
//!
//! A [`LabeledCollection`] pairs items with labels (and optionally
//! per-item display texts) and guarantees the sequences stay the same
//! length. Selection never mutates the collection; every operation
//! returns a new one.
//!
//! Representative selection keeps the first occurrence of each label:
//!
//! - without an explicit order, output follows ascending label order;
//! - with an explicit order, output follows that order and labels not
//!   listed are dropped. Listed labels with no items are skipped
//!   without error.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Label, PipelineError, ensure_same_len};

/// Items with parallel labels and optional parallel custom texts.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledCollection<T> {
    items: Vec<T>,
    labels: Vec<Label>,
    texts: Option<Vec<String>>,
}

impl<T> LabeledCollection<T> {
    /// Pair `items` with `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LengthMismatch`] if the lengths differ.
    pub fn new(items: Vec<T>, labels: Vec<Label>) -> Result<Self, PipelineError> {
        ensure_same_len("labels", items.len(), labels.len())?;
        Ok(Self {
            items,
            labels,
            texts: None,
        })
    }

    /// Attach one custom display text per item.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LengthMismatch`] if `texts` is not the
    /// same length as the items.
    pub fn with_texts(mut self, texts: Vec<String>) -> Result<Self, PipelineError> {
        ensure_same_len("custom texts", self.items.len(), texts.len())?;
        self.texts = Some(texts);
        Ok(self)
    }

    /// The items in order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The labels, parallel to [`items`](Self::items).
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The custom texts, parallel to [`items`](Self::items), if attached.
    #[must_use]
    pub fn texts(&self) -> Option<&[String]> {
        self.texts.as_deref()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the collection and return `(items, labels, texts)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Vec<Label>, Option<Vec<String>>) {
        (self.items, self.labels, self.texts)
    }

    /// Labels for a tab layout: `order` when given (as-is, including
    /// labels that have no items), otherwise the distinct labels in
    /// ascending order.
    #[must_use]
    pub fn tab_labels(&self, order: Option<&[Label]>) -> Vec<Label> {
        order.map_or_else(|| unique_sorted_labels(&self.labels), <[Label]>::to_vec)
    }

    /// Indices of entries whose label is not in `ignore`.
    fn kept_indices(&self, ignore: Option<&[Label]>) -> Vec<usize> {
        let ignored: BTreeSet<&Label> = ignore.into_iter().flatten().collect();
        (0..self.labels.len())
            .filter(|&i| !ignored.contains(&self.labels[i]))
            .collect()
    }
}

impl<T: Clone> LabeledCollection<T> {
    /// New collection made of the entries at `indices`, in that order.
    fn pick(&self, indices: &[usize]) -> Self {
        Self {
            items: indices.iter().map(|&i| self.items[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
            texts: self
                .texts
                .as_ref()
                .map(|texts| indices.iter().map(|&i| texts[i].clone()).collect()),
        }
    }

    /// Drop every entry whose label is in `ignore`.
    #[must_use]
    pub fn without_labels(&self, ignore: &[Label]) -> Self {
        self.pick(&self.kept_indices(Some(ignore)))
    }

    /// All entries carrying `label`, in original order.
    #[must_use]
    pub fn items_with_label(&self, label: &Label) -> Self {
        let indices: Vec<usize> = (0..self.labels.len())
            .filter(|&i| &self.labels[i] == label)
            .collect();
        self.pick(&indices)
    }

    /// First `n` entries (or all of them if there are fewer).
    #[must_use]
    pub fn take(&self, n: usize) -> Self {
        let indices: Vec<usize> = (0..self.len().min(n)).collect();
        self.pick(&indices)
    }

    /// One representative entry per label.
    ///
    /// Entries whose label is in `ignore` are removed first. Then:
    ///
    /// - `order == None`: one entry per distinct label, the first
    ///   occurrence, in ascending label order;
    /// - `order == Some(..)`: for each listed label, its first
    ///   occurrence, in the listed order. Labels with no remaining
    ///   entries are skipped silently. A label listed twice yields the
    ///   same entry twice.
    #[must_use]
    pub fn representatives(&self, ignore: Option<&[Label]>, order: Option<&[Label]>) -> Self {
        let kept = self.kept_indices(ignore);

        let chosen: Vec<usize> = match order {
            None => {
                let mut first: BTreeMap<&Label, usize> = BTreeMap::new();
                for &i in &kept {
                    first.entry(&self.labels[i]).or_insert(i);
                }
                first.into_values().collect()
            }
            Some(order) => order
                .iter()
                .filter_map(|wanted| kept.iter().copied().find(|&i| &self.labels[i] == wanted))
                .collect(),
        };

        tracing::debug!(
            input = self.len(),
            after_ignore = kept.len(),
            selected = chosen.len(),
            ordered = order.is_some(),
            "selected class representatives"
        );
        self.pick(&chosen)
    }
}

/// Distinct labels in ascending order.
#[must_use]
pub fn unique_sorted_labels(labels: &[Label]) -> Vec<Label> {
    labels
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

/// Select one item per label from parallel `items` / `labels` slices.
///
/// See [`LabeledCollection::representatives`] for the rules.
///
/// # Errors
///
/// Returns [`PipelineError::LengthMismatch`] if `items` and `labels`
/// differ in length.
pub fn class_representatives<T: Clone>(
    items: &[T],
    labels: &[Label],
    ignore: Option<&[Label]>,
    order: Option<&[Label]>,
) -> Result<(Vec<T>, Vec<Label>), PipelineError> {
    let collection = LabeledCollection::new(items.to_vec(), labels.to_vec())?;
    let (items, labels, _) = collection.representatives(ignore, order).into_parts();
    Ok((items, labels))
}
