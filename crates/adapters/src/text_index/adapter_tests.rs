use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::*;

const GREETER: &str = r#"public class Greeter
{
    public string Greet(string name)
    {
        var formatted = Format(name);
        return formatted;
    }

    private string Format(string name)
    {
        return name.Trim();
    }
}
"#;

fn state_with(root: &Path, files: &[(&str, &str)]) -> TextIndexState {
    let documents: HashMap<PathBuf, String> =
        files.iter().map(|(name, text)| (root.join(name), text.to_string())).collect();
    TextIndexState::build(&documents)
}

fn greet_handle(state: &TextIndexState) -> SymbolHandle {
    SymbolHandle(state.resolve("Greet").expect("Greet not indexed"))
}

#[tokio::test]
async fn load_initial_scans_cs_files_under_the_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Greeter.cs"), GREETER).unwrap();
    std::fs::create_dir_all(dir.path().join("bin")).unwrap();
    std::fs::write(dir.path().join("bin").join("Ignored.cs"), "class Ignored {}").unwrap();

    let adapter = TextIndexAdapter::new();
    let loaded = adapter.load_initial(dir.path()).await.unwrap();

    assert_eq!(loaded.documents.len(), 1);
    assert!(loaded.documents.contains_key(&dir.path().join("Greeter.cs")));
}

#[tokio::test]
async fn symbol_at_resolves_a_method_declaration_site() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let handle = adapter
        .symbol_at(&state, &dir.path().join("Greeter.cs"), 3, 19, &cancel)
        .await
        .expect("expected a symbol at the Greet declaration");

    assert_eq!(state.methods[handle.0].name, "Greet");
}

#[tokio::test]
async fn symbol_at_whitespace_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let handle = adapter.symbol_at(&state, &dir.path().join("Greeter.cs"), 1, 1, &cancel).await;
    assert!(handle.is_none());
}

#[tokio::test]
async fn definition_reports_the_absolute_declaration_path() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let handle = greet_handle(&state);
    let (location, name, kind) = adapter.definition(&state, handle, &cancel).await.unwrap();

    assert_eq!(name, "Greet");
    assert_eq!(kind, SymbolKind::Method);
    assert_eq!(location.file, dir.path().join("Greeter.cs").to_string_lossy());
}

#[tokio::test]
async fn callees_of_greet_includes_format() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let handle = greet_handle(&state);
    let callees = adapter.callees(&state, handle, &cancel).await;

    assert_eq!(callees.len(), 1);
    assert_eq!(callees[0].line, 9);
}

#[tokio::test]
async fn callers_of_format_includes_greet() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let format_handle = SymbolHandle(state.resolve("Format").unwrap());
    let callers = adapter.callers(&state, format_handle, &cancel).await;

    assert_eq!(callers.len(), 1);
    assert_eq!(callers[0].line, 5);
}

#[tokio::test]
async fn base_definition_and_implementations_are_empty_without_an_inheritance_model() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let handle = greet_handle(&state);
    assert!(adapter.base_definition(&state, handle, &cancel).await.is_none());
    assert!(adapter.implementations(&state, handle, &cancel).await.is_empty());
}

#[tokio::test]
async fn apply_edit_rebuilds_the_index_from_the_edited_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Greeter.cs");
    std::fs::write(&path, "class Greeter {}").unwrap();

    let loader: Arc<dyn rq_storage::WorkspaceLoader<TextIndexState>> = Arc::new(TextIndexAdapter::new());
    let manager = rq_storage::SnapshotManager::load_initial(dir.path().to_path_buf(), loader).await.unwrap();

    let changed = manager.apply_edit(&path, GREETER).await.unwrap();
    assert!(changed);
    assert!(manager.current().analyzer_state().resolve("Greet").is_some());
}

#[tokio::test]
async fn describe_reports_containing_type_and_signature() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with(dir.path(), &[("Greeter.cs", GREETER)]);
    let cancel = CancellationToken::new();
    let adapter = TextIndexAdapter::new();

    let handle = greet_handle(&state);
    let descriptor = adapter.describe(&state, handle, &cancel).await;

    assert_eq!(descriptor.full_name, "Greeter.Greet");
    assert_eq!(descriptor.containing_type.as_deref(), Some("Greeter"));
    assert!(descriptor.signature.is_some());
}
