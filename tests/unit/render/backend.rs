use super::*;
use crate::foundation::core::{LayerId, VisibilitySet};

fn page(index: u32, title: &str) -> Page {
    Page {
        index: PageIndex(index),
        title: title.to_owned(),
        trigger: LayerId(0),
        step: None,
        visible: VisibilitySet::new(),
    }
}

#[test]
fn artifact_stems_sort_in_page_order() {
    assert_eq!(artifact_stem(&page(0, "slide1")), "page-001-slide1");
    assert_eq!(artifact_stem(&page(11, "demo-2")), "page-012-demo-2");
    assert!(artifact_stem(&page(1, "b")) < artifact_stem(&page(9, "a")));
}

#[test]
fn artifact_stems_replace_unsafe_characters() {
    assert_eq!(artifact_stem(&page(2, "my slide/1 é")), "page-003-my_slide_1__");
    assert_eq!(artifact_stem(&page(0, "")), "page-001-");
}
