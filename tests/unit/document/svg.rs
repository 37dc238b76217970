use super::*;

const DECK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     width="100" height="50">
  <g inkscape:groupmode="layer" inkscape:label="background" id="layer1" style="display:none">
    <rect width="100" height="50" fill="white"/>
  </g>
  <g inkscape:groupmode="layer" inkscape:label="slide1" id="layer2">
    <text x="5" y="20">Hello &amp; welcome</text>
    <g inkscape:groupmode="layer" inkscape:label="slide1-detail" style="opacity:0.5">
      <circle r="3"/>
    </g>
  </g>
  <g id="plain-group"><rect width="1" height="1"/></g>
</svg>
"#;

#[test]
fn layers_are_indexed_in_preorder() {
    let doc = LayerDocument::from_svg_str(DECK).unwrap();
    let labels: Vec<_> = doc.layers().iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["background", "slide1", "slide1-detail"]);
    assert_eq!(doc.layers()[2].id, LayerId(2));
    assert_eq!(doc.layers()[0].element_id.as_deref(), Some("layer1"));
    assert_eq!(doc.layers()[2].element_id, None);
    assert_eq!(doc.label(LayerId(1)), "slide1");
    assert_eq!(doc.label(LayerId(9)), "");
}

#[test]
fn snapshot_rewrites_only_layer_styles() {
    let doc = LayerDocument::from_svg_str(DECK).unwrap();
    let visible: VisibilitySet = [LayerId(0), LayerId(2)].into_iter().collect();
    let snap = doc.snapshot(&visible).unwrap();

    assert!(snap.contains(r#"id="layer1" style="display:inline""#), "{snap}");
    assert!(snap.contains(r#"<g style="display:none" inkscape:groupmode="layer" inkscape:label="slide1""#), "{snap}");
    assert!(snap.contains(r#"style="display:inline;opacity:0.5""#), "{snap}");
    assert!(snap.contains("Hello &amp; welcome"));
    assert!(snap.contains(r#"<g id="plain-group">"#));

    // The snapshot is itself a valid document with the same layers.
    let again = LayerDocument::from_svg_str(snap).unwrap();
    assert_eq!(again.layers().len(), 3);
}

#[test]
fn snapshot_is_deterministic() {
    let doc = LayerDocument::from_svg_str(DECK).unwrap();
    let visible: VisibilitySet = [LayerId(1)].into_iter().collect();
    assert_eq!(doc.snapshot(&visible).unwrap(), doc.snapshot(&visible).unwrap());
}

#[test]
fn unlabeled_layer_is_a_structure_error() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"
        xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
        <g inkscape:groupmode="layer" id="layer7"/>
    </svg>"#;
    let err = LayerDocument::from_svg_str(svg).unwrap_err();
    assert!(matches!(err, DeckError::Structure(_)));
    assert!(err.to_string().contains("layer7"), "{err}");
}

#[test]
fn invalid_xml_is_a_structure_error() {
    let err = LayerDocument::from_svg_str("<svg><g></svg>").unwrap_err();
    assert!(matches!(err, DeckError::Structure(_)));
}

#[test]
fn groups_in_foreign_namespaces_are_not_layers() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"
        xmlns:x="urn:other"
        xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
        <x:g inkscape:groupmode="layer" inkscape:label="nope"/>
        <g inkscape:groupmode="layer" inkscape:label="yes"/>
    </svg>"#;
    let doc = LayerDocument::from_svg_str(svg).unwrap();
    assert_eq!(doc.layers().len(), 1);
    assert_eq!(doc.layers()[0].label, "yes");
}

#[test]
fn from_path_records_resources_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.svg");
    std::fs::write(&path, DECK).unwrap();
    let doc = LayerDocument::from_path(&path).unwrap();
    assert_eq!(doc.resources_dir(), Some(dir.path()));
    assert_eq!(doc.source(), DECK);
}

#[test]
fn snapshot_keeps_quoted_font_names_intact() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:groupmode="layer" inkscape:label="a" style="font-family:'x; y';display:inline"/>
</svg>"#;
    let doc = LayerDocument::from_svg_str(svg).unwrap();
    let snap = doc.snapshot(&VisibilitySet::new()).unwrap();
    assert!(snap.contains(r#"style="font-family:'x; y';display:none""#), "{snap}");
}
