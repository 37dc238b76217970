use super::*;

fn doc(labels: &[&str]) -> LayerDocument {
    let mut svg = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">"#,
    );
    for label in labels {
        svg.push_str(&format!(
            r#"<g inkscape:groupmode="layer" inkscape:label="{label}"/>"#
        ));
    }
    svg.push_str("</svg>");
    LayerDocument::from_svg_str(svg).unwrap()
}

fn all(doc: &LayerDocument) -> Vec<LayerId> {
    doc.layers().iter().map(|l| l.id).collect()
}

#[test]
fn parse_step_splits_on_final_numeric_suffix() {
    assert_eq!(
        parse_step("intro-3"),
        Some(StepLabel {
            base: "intro",
            step: 3
        })
    );
    assert_eq!(
        parse_step("a-1-2"),
        Some(StepLabel {
            base: "a-1",
            step: 2
        })
    );
    assert_eq!(
        parse_step("intro-007"),
        Some(StepLabel {
            base: "intro",
            step: 7
        })
    );
    assert_eq!(parse_step("-4"), Some(StepLabel { base: "", step: 4 }));
}

#[test]
fn parse_step_rejects_non_step_labels() {
    assert_eq!(parse_step("slide1"), None);
    assert_eq!(parse_step("intro-"), None);
    assert_eq!(parse_step("intro-1b"), None);
    assert_eq!(parse_step("a-1-b"), None);
    assert_eq!(parse_step("intro-+3"), None);
    assert_eq!(parse_step("intro-99999999999999999999999"), None);
}

#[test]
fn steps_order_numerically_not_lexically() {
    let d = doc(&["intro-10", "intro-3"]);
    let groups = AnimationGroups::new(&d, &all(&d)).unwrap();

    assert_eq!(groups.groups().len(), 1);
    assert_eq!(groups.groups()[0].base, "intro");
    assert_eq!(
        groups.groups()[0].steps,
        vec![(3, LayerId(1)), (10, LayerId(0))]
    );
    assert_eq!(groups.companions(LayerId(0)), vec![LayerId(1)]);
    assert!(groups.companions(LayerId(1)).is_empty());
}

#[test]
fn companions_are_strictly_lower_steps_of_the_same_base() {
    let d = doc(&["demo-0", "demo-1", "other-1", "demo-2", "demo"]);
    let groups = AnimationGroups::new(&d, &all(&d)).unwrap();

    assert_eq!(groups.companions(LayerId(3)), vec![LayerId(0), LayerId(1)]);
    assert_eq!(groups.companions(LayerId(1)), vec![LayerId(0)]);
    assert!(groups.companions(LayerId(0)).is_empty());
    assert!(groups.companions(LayerId(2)).is_empty());
    assert!(groups.companions(LayerId(4)).is_empty());
    assert_eq!(groups.step_of(LayerId(3)), Some(2));
    assert_eq!(groups.step_of(LayerId(4)), None);
    assert_eq!(groups.group_of(LayerId(2)).map(|g| g.base.as_str()), Some("other"));
}

#[test]
fn base_is_compared_literally() {
    let d = doc(&["a.b-1", "axb-2", "a.b-2"]);
    let groups = AnimationGroups::new(&d, &all(&d)).unwrap();
    assert!(groups.companions(LayerId(1)).is_empty());
    assert_eq!(groups.companions(LayerId(2)), vec![LayerId(0)]);
}

#[test]
fn lone_step_is_a_group_of_one() {
    let d = doc(&["solo-5"]);
    let groups = AnimationGroups::new(&d, &all(&d)).unwrap();
    assert_eq!(groups.groups().len(), 1);
    assert!(groups.companions(LayerId(0)).is_empty());
}

#[test]
fn only_given_layers_participate() {
    let d = doc(&["#demo-1", "demo-2"]);
    let groups = AnimationGroups::new(&d, &[LayerId(1)]).unwrap();
    assert!(groups.companions(LayerId(1)).is_empty());
}

#[test]
fn duplicate_steps_are_rejected() {
    let d = doc(&["demo-2", "demo-02"]);
    let err = AnimationGroups::new(&d, &all(&d)).unwrap_err();
    assert!(matches!(err, DeckError::Validation(_)));
    let msg = err.to_string();
    assert!(msg.contains("'demo'"), "{msg}");
    assert!(msg.contains("step 2"), "{msg}");
    assert!(msg.contains("'demo-2'") && msg.contains("'demo-02'"), "{msg}");
}
