use super::*;
use crate::foundation::core::PageIndex;

fn pages() -> Vec<PageArtifact> {
    vec![
        PageArtifact {
            index: PageIndex(0),
            path: PathBuf::from("w/page-001-b.pdf"),
        },
        PageArtifact {
            index: PageIndex(1),
            path: PathBuf::from("w/page-002-a.pdf"),
        },
    ]
}

#[test]
fn command_keeps_page_order_and_appends_marks() {
    let gs = GhostscriptAssembler::default();
    let cmd = gs.command(&pages(), Path::new("w/pdfmarks"), Path::new("out/talk.pdf"));
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(cmd.get_program(), "gs");
    assert_eq!(
        args,
        vec![
            "-r120",
            "-dBATCH",
            "-dNOPAUSE",
            "-dPDFSETTINGS=/prepress",
            "-dAutoRotatePages=/None",
            "-sPAPERSIZE=a4",
            "-sDEVICE=pdfwrite",
            "-sOutputFile=out/talk.pdf",
            "w/page-001-b.pdf",
            "w/page-002-a.pdf",
            "w/pdfmarks",
        ]
    );
}

#[test]
fn empty_page_list_is_rejected() {
    let mut gs = GhostscriptAssembler::default();
    let err = gs
        .assemble(&[], Path::new("marks"), Path::new("out.pdf"))
        .unwrap_err();
    assert!(matches!(err, DeckError::Assembly(_)));
}

#[test]
fn missing_program_is_an_assembly_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut gs = GhostscriptAssembler::new(GhostscriptOpts {
        program: PathBuf::from("layerdeck-no-such-gs"),
        ..Default::default()
    });
    let err = gs
        .assemble(&pages(), Path::new("marks"), &dir.path().join("out.pdf"))
        .unwrap_err();
    assert!(err.to_string().contains("failed to spawn ghostscript"), "{err}");
    assert!(!is_ghostscript_on_path(Path::new("layerdeck-no-such-gs")));
}

#[cfg(unix)]
#[test]
fn successful_exit_without_output_is_an_assembly_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut gs = GhostscriptAssembler::new(GhostscriptOpts {
        program: PathBuf::from("true"),
        ..Default::default()
    });
    let err = gs
        .assemble(&pages(), Path::new("marks"), &dir.path().join("out.pdf"))
        .unwrap_err();
    assert!(err.to_string().contains("did not produce"), "{err}");
}
