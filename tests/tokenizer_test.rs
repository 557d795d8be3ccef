mod common;

use futures::future::join_all;
use pretty_assertions::assert_eq;
use tokenweave::tokenizer::{
    IconTransform, Token, TokenDefinition, TokenKind, Tokenizer, TransformError,
};

fn text() -> &'static str {
    "I learn in this letter that [[Don Pedro of Arragon | characters.pedro.don]] comes this night to [[places.messina]]."
}

const TEXT_BOOTSTRAP: &str = "Bootstrap Icons can be embedded : @(bi-patch-question-fill).";

fn identity(kind: &str, start: &str, end: &str) -> TokenDefinition {
    TokenDefinition::new(kind, start, end, |content: String| async move {
        Ok::<_, TransformError>(content)
    })
}

fn create_tokenizer() -> Tokenizer {
    let mut tokenizer = Tokenizer::new();
    tokenizer.register(identity("ref", "[[", "]]"));
    tokenizer
}

fn kinds(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|token| token.kind.as_str()).collect()
}

fn contents(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|token| token.content.as_str()).collect()
}

#[test]
fn test_definition_length() {
    assert_eq!(create_tokenizer().window_size(), 2);

    let mut only_ref = Tokenizer::empty();
    only_ref.register(identity("ref", "[[", "]]"));
    assert_eq!(only_ref.window_size(), 2);

    assert_eq!(Tokenizer::empty().window_size(), 0);
}

#[test]
fn test_references() {
    let tokens = create_tokenizer().get_tokens(text());

    assert_eq!(tokens.len(), 5);
    assert_eq!(kinds(&tokens), vec!["text", "ref", "text", "ref", "text"]);
    assert_eq!(
        contents(&tokens),
        vec![
            "I learn in this letter that ",
            "Don Pedro of Arragon | characters.pedro.don",
            " comes this night to ",
            "places.messina",
            ".",
        ]
    );
}

#[tokio::test]
async fn test_bootstrap_token() {
    let tokenizer = create_tokenizer();
    let mut tokens = tokenizer.get_tokens(TEXT_BOOTSTRAP);

    assert_eq!(kinds(&tokens), vec!["text", "bootstrap", "text"]);
    assert_eq!(
        contents(&tokens),
        vec![
            "Bootstrap Icons can be embedded : ",
            "bi-patch-question-fill",
            "."
        ]
    );

    let combined = tokenizer.combine(&mut tokens, true).await.unwrap();
    assert_eq!(
        combined,
        r#"Bootstrap Icons can be embedded : <i class="sidebar-icon"><i id="sidebar-icon" class="bi-patch-question-fill"></i></i>."#
    );
}

#[tokio::test]
async fn test_nested_span() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.register(identity("outer", "<<", ">>"));
    tokenizer.register(identity("inner", "[[", "]]"));

    let input = "a<<b[[c]]d>>e";
    let mut tokens = tokenizer.get_tokens(input);

    assert_eq!(kinds(&tokens), vec!["text", "outer", "text"]);
    assert_eq!(contents(&tokens), vec!["a", "b[[c]]d", "e"]);

    let children = &tokens[1].children;
    assert_eq!(kinds(children), vec!["text", "inner", "text"]);
    assert_eq!(contents(children), vec!["b", "c", "d"]);

    assert_eq!(tokenizer.combine(&mut tokens, false).await.unwrap(), input);
}

#[test]
fn test_unterminated_span() {
    let tokens = create_tokenizer().get_tokens("x[[y");

    assert_eq!(
        tokens,
        vec![
            Token::text("x"),
            Token::typed("ref", "[[", "", "", vec![Token::text("y")]),
        ]
    );
}

#[test]
fn test_empty_and_plain_input() {
    let tokenizer = create_tokenizer();
    assert!(tokenizer.get_tokens("").is_empty());
    assert_eq!(
        tokenizer.get_tokens("no delimiters here"),
        vec![Token::text("no delimiters here")]
    );
}

#[tokio::test]
async fn test_round_trip_without_transforms() {
    let tokenizer = create_tokenizer();
    for input in [text(), TEXT_BOOTSTRAP, "", "[[a]][[b]] @() tail"] {
        let mut tokens = tokenizer.get_tokens(input);
        assert_eq!(tokenizer.combine(&mut tokens, false).await.unwrap(), input);
    }
}

#[tokio::test]
async fn test_shallow_replace_sees_raw_nested_markup() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.register(TokenDefinition::new(
        "quote",
        "<<",
        ">>",
        |content: String| async move { Ok::<_, TransformError>(format!("«{}»", content)) },
    ));

    let mut tokens = tokenizer.get_tokens("<<see @(bi-star)>>");
    let combined = tokenizer.combine(&mut tokens, true).await.unwrap();

    assert_eq!(combined, "«see @(bi-star)»");
    assert_eq!(tokens[0].children[1].kind, TokenKind::Definition("bootstrap".into()));
    assert_eq!(tokens[0].children[1].content, "bi-star");
}

#[tokio::test]
async fn test_transform_can_expand_nested_spans_itself() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.register(TokenDefinition::new(
        "quote",
        "<<",
        ">>",
        |content: String| async move {
            let inner = Tokenizer::new();
            inner
                .expand(&content)
                .await
                .map_err(|e| TransformError::Failed(e.to_string()))
        },
    ));

    let result = tokenizer.expand("<<@(bi-star)>>").await.unwrap();
    assert_eq!(result, IconTransform::render("bi-star"));
}

#[tokio::test]
async fn test_failed_transform_propagates() {
    let mut tokenizer = Tokenizer::empty();
    tokenizer.register(TokenDefinition::new("ref", "[[", "]]", |content: String| async move {
        Err::<String, _>(TransformError::NotFound(content))
    }));

    let error = tokenizer.expand("go to [[nowhere]]").await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "Transform for 'ref' failed: Not found: nowhere"
    );
}

#[tokio::test]
async fn test_independent_concurrent_calls() {
    let tokenizer = create_tokenizer();
    let inputs: Vec<String> = (0..8).map(|i| format!("n{} @(bi-{}) [[x{}]]", i, i, i)).collect();

    let results = join_all(inputs.iter().map(|input| {
        let tokenizer = &tokenizer;
        async move {
            let mut tokens = tokenizer.get_tokens(input);
            tokenizer.combine(&mut tokens, true).await
        }
    }))
    .await;

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(
            result.unwrap(),
            format!("n{} {} x{}", i, IconTransform::render(&format!("bi-{}", i)), i)
        );
    }
}

#[tokio::test]
async fn test_tokenizer_is_shareable_across_tasks() {
    let tokenizer = std::sync::Arc::new(create_tokenizer());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tokenizer = tokenizer.clone();
            tokio::spawn(async move { tokenizer.expand(&format!("[[{}]]", i)).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), i.to_string());
    }
}
