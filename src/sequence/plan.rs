use crate::classify::animation::AnimationGroups;
use crate::classify::roles::{Classification, RoleNames};
use crate::document::svg::LayerDocument;
use crate::foundation::core::{LayerId, PageIndex, VisibilitySet};
use crate::foundation::error::DeckResult;

/// One output page, triggered by exactly one content layer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Page {
    /// Output position (0-based).
    pub index: PageIndex,
    /// Bookmark title: the triggering layer's label.
    pub title: String,
    /// Content layer this page exists for.
    pub trigger: LayerId,
    /// Animation step of the trigger, when it belongs to a group.
    pub step: Option<u64>,
    /// Every layer displayed on this page.
    pub visible: VisibilitySet,
}

/// Ordered page sequence for one document.
///
/// A pure function of layer labels and structural order: building it twice from the same
/// document yields the same plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PagePlan {
    pages: Vec<Page>,
}

impl PagePlan {
    /// Classify, group and sequence the layers of `doc`.
    #[tracing::instrument(skip(doc))]
    pub fn build(doc: &LayerDocument, names: &RoleNames) -> DeckResult<Self> {
        let classification = Classification::new(doc.layers(), names);
        let groups = AnimationGroups::new(doc, classification.content())?;
        Ok(Self::from_parts(doc, &classification, &groups))
    }

    /// Sequence pages from an existing classification and grouping.
    ///
    /// Content layers keep their structural order; hidden and always-visible layers produce no
    /// page of their own.
    pub fn from_parts(
        doc: &LayerDocument,
        classification: &Classification,
        groups: &AnimationGroups,
    ) -> Self {
        let mut pages = Vec::with_capacity(classification.content().len());
        let mut index = PageIndex(0);

        for &trigger in classification.content() {
            let mut visible = classification.always_visible().clone();
            visible.insert(trigger);
            for companion in groups.companions(trigger) {
                visible.insert(companion);
            }

            let title = doc.label(trigger).to_owned();
            tracing::trace!(page = index.number(), %title, visible = visible.len(), "planned page");
            pages.push(Page {
                index,
                title,
                trigger,
                step: groups.step_of(trigger),
                visible,
            });
            index = index.next();
        }

        Self { pages }
    }

    /// Pages in output order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the plan produces no page at all.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/plan.rs"]
mod tests;
