use super::*;
use rq_core::SymbolKind;

fn loc() -> Location {
    Location::point("T.cs", 1, 1)
}

#[tokio::test]
async fn symbol_at_returns_seeded_handle_and_records_the_call() {
    let adapter = FakeAnalyzerAdapter::new();
    let handle = SymbolHandle(0);
    adapter.set_symbol_at("T.cs", 1, 24, handle);
    let cancel = CancellationToken::new();

    let found = adapter.symbol_at(&(), Path::new("T.cs"), 1, 24, &cancel).await;

    assert_eq!(found, Some(handle));
    assert_eq!(adapter.symbol_at_calls(), vec![(PathBuf::from("T.cs"), 1, 24)]);
}

#[tokio::test]
async fn unscripted_symbol_at_returns_none() {
    let adapter = FakeAnalyzerAdapter::new();
    let cancel = CancellationToken::new();

    let found = adapter.symbol_at(&(), Path::new("Other.cs"), 9, 9, &cancel).await;

    assert_eq!(found, None);
}

#[tokio::test]
async fn definition_returns_the_seeded_answer() {
    let adapter = FakeAnalyzerAdapter::new();
    let handle = SymbolHandle(1);
    adapter.set_definition(handle, (loc(), "M".to_string(), SymbolKind::Method));
    let cancel = CancellationToken::new();

    let answer = adapter.definition(&(), handle, &cancel).await;

    assert_eq!(answer, Some((loc(), "M".to_string(), SymbolKind::Method)));
}

#[tokio::test]
async fn describe_falls_back_to_an_empty_descriptor() {
    let adapter = FakeAnalyzerAdapter::new();
    let cancel = CancellationToken::new();

    let descriptor = adapter.describe(&(), SymbolHandle(5), &cancel).await;

    assert_eq!(descriptor.name, "");
    assert_eq!(descriptor.kind, SymbolKind::Other);
}

#[tokio::test]
async fn callees_returns_the_seeded_locations() {
    let adapter = FakeAnalyzerAdapter::new();
    let handle = SymbolHandle(2);
    adapter.set_callees(handle, vec![loc()]);
    let cancel = CancellationToken::new();

    let locations = adapter.callees(&(), handle, &cancel).await;

    assert_eq!(locations, vec![loc()]);
}
