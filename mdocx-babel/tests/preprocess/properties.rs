use crate::common::Echo;
use mdocx_babel::preprocess::{
    CommandSubstitutor, MacroMap, MarkupLine, PreprocessOptions, Preprocessor, TokenResolver,
};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Body lines that can never be mistaken for delimiters, fences, tokens or commands.
fn plain_line() -> impl Strategy<Value = String> {
    "[a-z ]{0,24}"
}

proptest! {
    #[test]
    fn macro_block_interior_never_reaches_the_body(
        entries in prop::collection::vec((word(), word()), 1..6),
        before in prop::collection::vec(plain_line(), 0..4),
        after in prop::collection::vec(plain_line(), 0..4),
    ) {
        let mut source = String::new();
        for line in &before {
            source.push_str(line);
            source.push('\n');
        }
        source.push_str("<!--\nMaCrOs\n");
        for (key, value) in &entries {
            source.push_str(&format!("{{'__{key}__': '{value}'}}\n"));
        }
        source.push_str("END_MaCrOs\n-->\n");
        for line in &after {
            source.push_str(line);
            source.push('\n');
        }

        let options = PreprocessOptions::default();
        let result = Preprocessor::new(&options)
            .run_with(&source, "prop.md", &mut Echo::default())
            .unwrap();

        prop_assert_eq!(result.lines.len(), before.len() + after.len() + 4);
        let interior_dropped = result.lines.iter().all(|line| !line.text.starts_with('{'));
        prop_assert!(interior_dropped, "macro definition line reached the body");
        for (key, _) in &entries {
            let last = entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
            prop_assert_eq!(result.macros.get(&format!("__{key}__")), last);
        }
    }

    #[test]
    fn substitution_is_idempotent_without_tokens_in_values(
        values in prop::collection::vec(word(), 1..5),
        text in prop::collection::vec(plain_line(), 1..5),
    ) {
        let macros: MacroMap = values
            .iter()
            .enumerate()
            .map(|(index, value)| (format!("__k{index}__"), value.clone()))
            .collect();
        let mut lines: Vec<MarkupLine> = text
            .iter()
            .enumerate()
            .map(|(index, t)| MarkupLine::new(format!("{t} __k{}__", index % values.len())))
            .collect();

        TokenResolver::substitute_in_text(&mut lines, &macros);
        let once = lines.clone();
        TokenResolver::substitute_in_text(&mut lines, &macros);

        prop_assert_eq!(&once, &lines);
        prop_assert!(lines.iter().all(|line| TokenResolver::unresolved_tokens(&line.text).is_empty()));
    }

    #[test]
    fn commands_run_in_document_order(words in prop::collection::vec(word(), 1..6)) {
        let mut lines: Vec<MarkupLine> = words
            .chunks(2)
            .map(|chunk| {
                MarkupLine::new(
                    chunk
                        .iter()
                        .map(|w| format!("${{echo {w}}}"))
                        .collect::<Vec<_>>()
                        .join(" + "),
                )
            })
            .collect();

        let mut echo = Echo::default();
        let executed = CommandSubstitutor::new(&mut echo).substitute_commands(&mut lines);

        prop_assert_eq!(executed, words.len());
        let expected: Vec<String> = words.iter().map(|w| format!("echo {w}")).collect();
        prop_assert_eq!(&echo.calls, &expected);
        let rendered: Vec<String> = words
            .chunks(2)
            .map(|chunk| chunk.join(" + "))
            .collect();
        let actual: Vec<String> = lines.into_iter().map(|line| line.text).collect();
        prop_assert_eq!(actual, rendered);
    }
}
