use super::*;
use crate::classify::roles::RoleNames;
use crate::document::svg::LayerDocument;
use crate::foundation::core::{LayerId, VisibilitySet};

fn plan(labels: &[&str]) -> PagePlan {
    let mut svg = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">"#,
    );
    for label in labels {
        svg.push_str(&format!(
            r#"<g inkscape:groupmode="layer" inkscape:label="{label}"/>"#
        ));
    }
    svg.push_str("</svg>");
    let doc = LayerDocument::from_svg_str(svg).unwrap();
    PagePlan::build(&doc, &RoleNames::default()).unwrap()
}

fn page(index: u32, title: &str) -> Page {
    Page {
        index: PageIndex(index),
        title: title.to_owned(),
        trigger: LayerId(index as usize),
        step: None,
        visible: VisibilitySet::new(),
    }
}

#[test]
fn reference_deck_stream() {
    let p = plan(&[
        "background",
        "foreground",
        "slide1",
        "demo-1",
        "demo-2",
        "#hidden",
    ]);
    let info = DocInfo {
        title: "Talk".to_owned(),
        ..Default::default()
    };
    let marks = render_marks(&info, &p).unwrap();
    assert_eq!(
        marks,
        "[ /Title (Talk)\n\
         \x20 /DOCINFO pdfmark\n\
         [/PageMode /UseOutlines /View [/Fit ] /Page 1 /DOCVIEW pdfmark\n\
         [/Title (slide1) /Page 1 /OUT pdfmark\n\
         [/Title (demo-1) /Page 2 /OUT pdfmark\n\
         [/Title (demo-2) /Page 3 /OUT pdfmark\n"
    );
}

#[test]
fn optional_fields_only_when_non_empty() {
    let info = DocInfo {
        title: String::new(),
        author: "Ada".to_owned(),
        subject: String::new(),
        keywords: "a,b".to_owned(),
    };
    let marks = render_marks(&info, &PagePlan::default()).unwrap();
    assert!(marks.starts_with("[ /Title ()\n  /Author (Ada)\n  /Keywords (a,b)\n  /DOCINFO pdfmark\n"));
    assert!(!marks.contains("/Subject"));
    assert!(!marks.contains("/OUT"));
}

#[test]
fn bookmarks_must_be_consecutive() {
    let mut emitter = AnnotationEmitter::begin(Vec::new(), &DocInfo::default()).unwrap();
    emitter.bookmark(&page(0, "a")).unwrap();
    let err = emitter.bookmark(&page(2, "c")).unwrap_err();
    assert!(matches!(err, DeckError::Annotation(_)));
    let err = emitter.bookmark(&page(0, "a")).unwrap_err();
    assert!(matches!(err, DeckError::Annotation(_)));
    emitter.bookmark(&page(1, "b")).unwrap();
    assert_eq!(emitter.bookmarks_written(), 2);

    let out = String::from_utf8(emitter.finish().unwrap()).unwrap();
    assert_eq!(out.matches("/OUT pdfmark").count(), 2);
    assert!(out.ends_with("[/Title (b) /Page 2 /OUT pdfmark\n"));
}

#[test]
fn stream_is_reproducible() {
    let p = plan(&["background", "a-1", "a-2", "b"]);
    let info = DocInfo {
        title: "T".to_owned(),
        author: "A".to_owned(),
        subject: "S".to_owned(),
        keywords: "K".to_owned(),
    };
    assert_eq!(render_marks(&info, &p).unwrap(), render_marks(&info, &p).unwrap());
}

#[test]
fn literal_strings_are_escaped() {
    assert_eq!(pdf_string("plain"), "(plain)");
    assert_eq!(pdf_string(r"a(b)\c"), r"(a\(b\)\\c)");
    assert_eq!(pdf_string("line\nbreak"), r"(line\nbreak)");
    assert_eq!(pdf_string("bell\x07"), r"(bell\007)");
    assert_eq!(pdf_string(""), "()");
}

#[test]
fn non_ascii_strings_are_utf16_hex() {
    assert_eq!(pdf_string("é"), "<FEFF00E9>");
    assert_eq!(pdf_string("a😀"), "<FEFF0061D83DDE00>");
}
