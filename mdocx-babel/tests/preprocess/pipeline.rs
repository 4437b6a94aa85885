use crate::common::{fixture, Echo};
use mdocx_babel::error::PreprocessError;
use mdocx_babel::preprocess::{PreprocessOptions, Preprocessor};

#[test]
fn kitchensink_resolves_macros_tokens_and_commands() {
    let options = PreprocessOptions::default();
    let mut echo = Echo::default();
    let result = Preprocessor::new(&options)
        .run_with(&fixture("kitchensink.md"), "kitchensink.md", &mut echo)
        .expect("preprocess");

    assert_eq!(result.macros.get("__title__"), Some("Apollo Handbook"));
    assert_eq!(result.macros.len(), 3);

    let markdown = result.markdown();
    assert!(markdown.contains("# Apollo Handbook\n"));
    assert!(markdown.contains("Maintained by Flight Ops. Built on Tuesday."));
    assert!(markdown.contains("| stage | ready |"));
    assert!(!markdown.contains("{'__project__'"));
    assert!(markdown.contains("<!--\nMaCrOs\nEND_MaCrOs\n-->"));
}

#[test]
fn fenced_code_is_left_alone() {
    let options = PreprocessOptions::default();
    let mut echo = Echo::default();
    let result = Preprocessor::new(&options)
        .run_with(&fixture("kitchensink.md"), "kitchensink.md", &mut echo)
        .expect("preprocess");

    assert!(result
        .markdown()
        .contains("raw __project__ and ${echo untouched}"));
    assert!(!echo.calls.iter().any(|call| call == "echo untouched"));
    assert_eq!(echo.calls, vec!["echo Tuesday", "echo ready"]);
}

#[test]
fn undefined_token_names_file_and_token() {
    let source = "<!--\nMaCrOs\n{'__a__': 'see __missing__'}\nEND_MaCrOs\n-->\n";
    let options = PreprocessOptions::default();
    let err = Preprocessor::new(&options)
        .run_with(source, "notes.md", &mut Echo::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Undefined token __missing__ in notes.md");
}

#[test]
fn malformed_literal_reports_line_number() {
    let source = "# Doc\n<!--\nMaCrOs\n{'__a__': 'x'}\n{'__b__' 'y'}\nEND_MaCrOs\n-->\n";
    let options = PreprocessOptions::default();
    let err = Preprocessor::new(&options)
        .run_with(source, "notes.md", &mut Echo::default())
        .unwrap_err();
    assert_eq!(
        err,
        PreprocessError::MalformedMacro {
            file: "notes.md".to_string(),
            line: 5,
            text: "{'__b__' 'y'}".to_string(),
        }
    );
}

#[test]
fn two_level_chain_leaves_inner_token_in_body() {
    let source = "\
<!--
MaCrOs
{'__c__': 'C'}
{'__b__': 'B(__c__)'}
{'__a__': 'A(__b__)'}
END_MaCrOs
-->
__a__
";
    let options = PreprocessOptions::default();
    let result = Preprocessor::new(&options)
        .run_with(source, "chain.md", &mut Echo::default())
        .unwrap();
    assert_eq!(result.macros.get("__a__"), Some("A(B(__c__))"));
    assert_eq!(result.lines.last().unwrap().text, "A(B(__c__))");
}

#[test]
fn later_keys_still_apply_to_text_introduced_by_earlier_ones() {
    let source = "\
<!--
MaCrOs
{'__a__': 'A(__b__)'}
{'__b__': 'B(__c__)'}
{'__c__': 'C'}
END_MaCrOs
-->
__a__
";
    let options = PreprocessOptions::default();
    let result = Preprocessor::new(&options)
        .run_with(source, "chain.md", &mut Echo::default())
        .unwrap();
    // Body keys are applied in definition order, so `__c__` introduced by
    // `__a__` is still replaced afterwards.
    assert_eq!(result.lines.last().unwrap().text, "A(B(C))");
}

#[test]
fn custom_markers_are_honoured() {
    let options = PreprocessOptions {
        macro_start: "DEFS".to_string(),
        macro_end: "END_DEFS".to_string(),
        ..PreprocessOptions::default()
    };
    let source = "<!--\nDEFS\n{'__x__': '1'}\nEND_DEFS\n-->\nx=__x__\n";
    let result = Preprocessor::new(&options)
        .run_with(source, "m.md", &mut Echo::default())
        .unwrap();
    assert_eq!(result.lines.last().unwrap().text, "x=1");
}
