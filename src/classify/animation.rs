use std::collections::{BTreeMap, HashMap};

use crate::document::svg::LayerDocument;
use crate::foundation::core::LayerId;
use crate::foundation::error::{DeckError, DeckResult};

/// A label split into animation base name and step number (`<base>-<digits>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepLabel<'a> {
    /// Everything before the final `-<digits>` suffix. May be empty.
    pub base: &'a str,
    /// Numeric value of the suffix; leading zeros are ignored.
    pub step: u64,
}

/// Split `label` into `<base>-<digits>`, or `None` for a standalone label.
///
/// Pure function of the label. Suffixes too large for `u64` are treated as standalone.
pub fn parse_step(label: &str) -> Option<StepLabel<'_>> {
    let (base, digits) = label.rsplit_once('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u64>() {
        Ok(step) => Some(StepLabel { base, step }),
        Err(_) => {
            tracing::warn!(label, "animation step out of range, treating layer as standalone");
            None
        }
    }
}

/// Content layers sharing one base name, ordered by ascending step.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AnimationGroup {
    /// Shared base name.
    pub base: String,
    /// `(step, layer)` pairs, ascending by step. Steps are unique within a group.
    pub steps: Vec<(u64, LayerId)>,
}

/// Animation groups of a document's content layers.
#[derive(Clone, Debug, Default)]
pub struct AnimationGroups {
    groups: Vec<AnimationGroup>,
    membership: HashMap<LayerId, (usize, u64)>,
}

impl AnimationGroups {
    /// Group `content` layers by base name.
    ///
    /// Two layers with the same base and the same step number are rejected: there is no
    /// meaningful cumulative order between them.
    pub fn new(doc: &LayerDocument, content: &[LayerId]) -> DeckResult<Self> {
        let mut by_base: BTreeMap<&str, usize> = BTreeMap::new();
        let mut groups: Vec<AnimationGroup> = Vec::new();

        for &id in content {
            let Some(StepLabel { base, step }) = parse_step(doc.label(id)) else {
                continue;
            };
            let gi = *by_base.entry(base).or_insert_with(|| {
                groups.push(AnimationGroup {
                    base: base.to_owned(),
                    steps: Vec::new(),
                });
                groups.len() - 1
            });
            groups[gi].steps.push((step, id));
        }

        let mut membership = HashMap::new();
        for (gi, group) in groups.iter_mut().enumerate() {
            group.steps.sort_by_key(|&(step, _)| step);
            for pair in group.steps.windows(2) {
                let ((step, a), (next, b)) = (pair[0], pair[1]);
                if step == next {
                    return Err(DeckError::validation(format!(
                        "animation '{}' has two layers at step {step}: '{}' and '{}'",
                        group.base,
                        doc.label(a),
                        doc.label(b)
                    )));
                }
            }
            for &(step, id) in &group.steps {
                membership.insert(id, (gi, step));
            }
        }

        Ok(Self { groups, membership })
    }

    /// All groups, in order of first appearance.
    pub fn groups(&self) -> &[AnimationGroup] {
        &self.groups
    }

    /// The group containing `id`, if any.
    pub fn group_of(&self, id: LayerId) -> Option<&AnimationGroup> {
        self.membership.get(&id).map(|&(gi, _)| &self.groups[gi])
    }

    /// Step number of `id`, if it belongs to a group.
    pub fn step_of(&self, id: LayerId) -> Option<u64> {
        self.membership.get(&id).map(|&(_, step)| step)
    }

    /// Group members with a strictly smaller step than `id`, ascending by step.
    ///
    /// Empty for standalone layers and for the first step of a group.
    pub fn companions(&self, id: LayerId) -> Vec<LayerId> {
        let Some(&(gi, current)) = self.membership.get(&id) else {
            return Vec::new();
        };
        self.groups[gi]
            .steps
            .iter()
            .take_while(|&&(step, _)| step < current)
            .map(|&(_, layer)| layer)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/animation.rs"]
mod tests;
