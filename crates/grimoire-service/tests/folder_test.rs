//! Integration tests for folder hierarchy management.

mod helpers;

use grimoire_core::{ErrorKind, FolderId};
use grimoire_database::{FolderRepository, SpellRepository};
use grimoire_entity::{Convocation, DeletionStrategy};

use helpers::TestApp;

#[tokio::test]
async fn test_create_duplicate_sibling_conflicts() {
    let app = TestApp::new();

    let id = app
        .folders
        .create_folder("Elementalism", Some(FolderId::ROOT))
        .await
        .expect("first create");
    assert_ne!(id, FolderId::ROOT);

    let err = app
        .folders
        .create_folder("Elementalism", Some(FolderId::ROOT))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_create_without_parent_goes_under_root() {
    let app = TestApp::new();
    let id = app.folders.create_folder("  Wards ", None).await.unwrap();
    let folder = app.folders.get_folder(id).await.unwrap();
    assert_eq!(folder.parent_id, Some(FolderId::ROOT));
    assert_eq!(folder.name, "Wards");
}

#[tokio::test]
async fn test_create_validates_name_before_parent() {
    let app = TestApp::new();

    let err = app
        .folders
        .create_folder("  ", Some(FolderId(999)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .folders
        .create_folder("Fire/Bolts", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .folders
        .create_folder("Fire", Some(FolderId(999)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_same_name_allowed_under_different_parents() {
    let app = TestApp::new();
    let fire = app.folder("Fire", FolderId::ROOT).await;
    let water = app.folder("Water", FolderId::ROOT).await;
    app.folder("Walls", fire).await;
    app.folder("Walls", water).await;
}

#[tokio::test]
async fn test_rename() {
    let app = TestApp::new();
    let fire = app.folder("Fire", FolderId::ROOT).await;
    app.folder("Water", FolderId::ROOT).await;

    let renamed = app.folders.rename_folder(fire, "Flame").await.unwrap();
    assert_eq!(renamed.name, "Flame");

    let err = app.folders.rename_folder(fire, "Water").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = app
        .folders
        .rename_folder(FolderId(404), "Ghost")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_rename_to_same_name_is_noop() {
    let app = TestApp::new();
    let fire = app.folder("Fire", FolderId::ROOT).await;
    let before = app.folders.get_folder(fire).await.unwrap();

    let after = app.folders.rename_folder(fire, "Fire").await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_root_cannot_be_renamed_or_moved() {
    let app = TestApp::new();
    let fire = app.folder("Fire", FolderId::ROOT).await;

    let err = app
        .folders
        .rename_folder(FolderId::ROOT, "Top")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .folders
        .move_folder(FolderId::ROOT, fire)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let root = app.folders.get_folder(FolderId::ROOT).await.unwrap();
    assert!(root.parent_id.is_none());
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected() {
    let app = TestApp::new();
    let a = app.folder("A", FolderId::ROOT).await;
    let b = app.folder("B", a).await;
    let c = app.folder("C", b).await;

    let err = app.folders.move_folder(a, b).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app.folders.move_folder(a, c).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app.folders.move_folder(a, a).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let a_folder = app.folders.get_folder(a).await.unwrap();
    assert_eq!(a_folder.parent_id, Some(FolderId::ROOT));
}

#[tokio::test]
async fn test_move() {
    let app = TestApp::new();
    let a = app.folder("A", FolderId::ROOT).await;
    let b = app.folder("B", FolderId::ROOT).await;
    let c = app.folder("C", a).await;

    let moved = app.folders.move_folder(c, b).await.unwrap();
    assert_eq!(moved.parent_id, Some(b));

    let moved = app.folders.move_folder(c, FolderId::ROOT).await.unwrap();
    assert_eq!(moved.parent_id, Some(FolderId::ROOT));

    let err = app.folders.move_folder(c, FolderId(77)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app.folders.move_folder(FolderId(77), a).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_move_name_collision_conflicts() {
    let app = TestApp::new();
    let a = app.folder("A", FolderId::ROOT).await;
    let b = app.folder("B", FolderId::ROOT).await;
    app.folder("Shared", a).await;
    let shared_b = app.folder("Shared", b).await;

    let err = app.folders.move_folder(shared_b, a).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_delete_empty_only() {
    let app = TestApp::new();
    let f = app.folder("F", FolderId::ROOT).await;
    let spell = app.spell("Glimmer", Convocation::Neutral, f).await;

    let err = app
        .folders
        .delete_folder(f, DeletionStrategy::EmptyOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.store.exists(f).await.unwrap());

    let outcome = app
        .folders
        .delete_folder(f, DeletionStrategy::Recursive)
        .await
        .unwrap();
    assert_eq!(outcome.folders_removed, 1);
    assert_eq!(outcome.spells_removed, 1);
    assert!(!app.store.exists(f).await.unwrap());
    assert!(SpellRepository::find_by_id(app.store.as_ref(), spell)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_empty_folder() {
    let app = TestApp::new();
    let f = app.folder("F", FolderId::ROOT).await;

    let outcome = app
        .folders
        .delete_folder(f, DeletionStrategy::EmptyOnly)
        .await
        .unwrap();
    assert_eq!(outcome.folders_removed, 1);
    assert!(!app.store.exists(f).await.unwrap());
}

#[tokio::test]
async fn test_delete_empty_only_rejects_subfolders() {
    let app = TestApp::new();
    let f = app.folder("F", FolderId::ROOT).await;
    app.folder("Child", f).await;

    let err = app
        .folders
        .delete_folder(f, DeletionStrategy::EmptyOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("subfolders"));
}

#[tokio::test]
async fn test_delete_move_to_parent() {
    let app = TestApp::new();
    let outer = app.folder("Outer", FolderId::ROOT).await;
    let middle = app.folder("Middle", outer).await;
    let inner = app.folder("Inner", middle).await;
    let spell = app.spell("Flame Bolt", Convocation::Peleahn, middle).await;

    let outcome = app
        .folders
        .delete_folder(middle, DeletionStrategy::MoveToParent)
        .await
        .unwrap();
    assert_eq!(outcome.folders_reparented, 1);
    assert_eq!(outcome.spells_reparented, 1);

    assert!(!app.store.exists(middle).await.unwrap());
    let inner = app.folders.get_folder(inner).await.unwrap();
    assert_eq!(inner.parent_id, Some(outer));
    let spell = SpellRepository::find_by_id(app.store.as_ref(), spell)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(spell.folder_id, outer);
}

#[tokio::test]
async fn test_delete_move_to_parent_name_clash_changes_nothing() {
    let app = TestApp::new();
    let outer = app.folder("Outer", FolderId::ROOT).await;
    app.folder("Walls", outer).await;
    let middle = app.folder("Middle", outer).await;
    let walls = app.folder("Walls", middle).await;

    let err = app
        .folders
        .delete_folder(middle, DeletionStrategy::MoveToParent)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    assert!(app.store.exists(middle).await.unwrap());
    let walls = app.folders.get_folder(walls).await.unwrap();
    assert_eq!(walls.parent_id, Some(middle));
}

#[tokio::test]
async fn test_delete_move_to_parent_allows_child_named_like_deleted_folder() {
    let app = TestApp::new();
    let outer = app.folder("Outer", FolderId::ROOT).await;
    let middle = app.folder("Middle", outer).await;
    let child = app.folder("Middle", middle).await;

    app.folders
        .delete_folder(middle, DeletionStrategy::MoveToParent)
        .await
        .unwrap();

    let child = app.folders.get_folder(child).await.unwrap();
    assert_eq!(child.parent_id, Some(outer));
}

#[tokio::test]
async fn test_delete_recursive_removes_subtree() {
    let app = TestApp::new();
    let keep = app.folder("Keep", FolderId::ROOT).await;
    let kept_spell = app.spell("Keeper", Convocation::Odivshe, keep).await;

    let top = app.folder("Top", FolderId::ROOT).await;
    let mid = app.folder("Mid", top).await;
    let leaf = app.folder("Leaf", mid).await;
    app.spell("One", Convocation::Fyvria, top).await;
    app.spell("Two", Convocation::Fyvria, leaf).await;

    let outcome = app
        .folders
        .delete_folder(top, DeletionStrategy::Recursive)
        .await
        .unwrap();
    assert_eq!(outcome.folders_removed, 3);
    assert_eq!(outcome.spells_removed, 2);

    for id in [top, mid, leaf] {
        assert!(!app.store.exists(id).await.unwrap());
    }
    assert_eq!(app.store.spell_count().await, 1);
    assert!(SpellRepository::find_by_id(app.store.as_ref(), kept_spell)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_root_cannot_be_deleted_with_any_strategy() {
    let app = TestApp::new();
    app.folder("Fire", FolderId::ROOT).await;

    for strategy in [
        DeletionStrategy::EmptyOnly,
        DeletionStrategy::MoveToParent,
        DeletionStrategy::Recursive,
    ] {
        let err = app
            .folders
            .delete_folder(FolderId::ROOT, strategy)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
    assert!(app.store.exists(FolderId::ROOT).await.unwrap());
    assert_eq!(app.store.folder_count().await, 2);
}

#[tokio::test]
async fn test_delete_missing_folder_not_found() {
    let app = TestApp::new();
    let err = app
        .folders
        .delete_folder(FolderId(55), DeletionStrategy::Recursive)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_unknown_strategy_is_validation() {
    let err = "scorch".parse::<DeletionStrategy>().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_folder_contents() {
    let app = TestApp::new();
    let top = app.folder("Top", FolderId::ROOT).await;
    let a = app.folder("A", top).await;
    let b = app.folder("B", top).await;
    let deep = app.folder("Deep", a).await;
    app.spell("S1", Convocation::Neutral, top).await;
    app.spell("S2", Convocation::Neutral, a).await;
    app.spell("S3", Convocation::Neutral, deep).await;
    app.spell("S4", Convocation::Neutral, deep).await;

    let contents = app.folders.get_folder_contents(top).await.unwrap();
    assert_eq!(contents.spell_count, 1);
    assert_eq!(contents.subfolder_count, 2);
    let names: Vec<&str> = contents.subfolders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(contents.total_spell_count, 4);
    assert_eq!(contents.total_subfolder_count, 3);

    let empty = app.folders.get_folder_contents(b).await.unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.total_spell_count, 0);

    let err = app
        .folders
        .get_folder_contents(FolderId(404))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_move_spells() {
    let app = TestApp::new();
    let from = app.folder("From", FolderId::ROOT).await;
    let to = app.folder("To", FolderId::ROOT).await;
    app.spell("One", Convocation::Jmorvi, from).await;
    app.spell("Two", Convocation::Jmorvi, from).await;

    assert_eq!(app.folders.move_spells(from, to).await.unwrap(), 2);
    assert!(!app.store.has_spells(from).await.unwrap());
    assert!(app.store.has_spells(to).await.unwrap());

    let err = app.folders.move_spells(from, FolderId(99)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_tree_and_paths() {
    let app = TestApp::new();
    let fire = app.folder("Fire", FolderId::ROOT).await;
    let bolts = app.folder("Bolts", fire).await;
    app.folder("Walls", fire).await;
    app.spell("Flame Bolt", Convocation::Peleahn, bolts).await;

    let tree = app.trees.get_tree(FolderId::ROOT).await.unwrap();
    assert_eq!(tree.total_folders(), 4);
    assert_eq!(tree.total_spells(), 1);
    assert_eq!(tree.children[0].name, "Fire");
    assert_eq!(tree.children[0].child_count, 2);

    assert_eq!(app.trees.path_of(bolts).await.unwrap(), "/Fire/Bolts");
    assert_eq!(app.trees.path_of(FolderId::ROOT).await.unwrap(), "/");

    let resolved = app.trees.resolve_path("/Fire/Bolts/").await.unwrap();
    assert_eq!(resolved.map(|f| f.id), Some(bolts));
    assert!(app.trees.resolve_path("Fire/Ice").await.unwrap().is_none());

    let crumbs = app.trees.get_breadcrumbs(bolts).await.unwrap();
    assert_eq!(crumbs.len(), 3);
    assert!(crumbs[0].is_root());
}

#[tokio::test]
async fn test_no_folder_is_its_own_ancestor_after_moves() {
    let app = TestApp::new();
    let a = app.folder("A", FolderId::ROOT).await;
    let b = app.folder("B", FolderId::ROOT).await;
    let c = app.folder("C", a).await;

    app.folders.move_folder(b, c).await.unwrap();
    assert!(app.folders.move_folder(a, b).await.is_err());
    app.folders.move_folder(c, FolderId::ROOT).await.unwrap();
    app.folders.move_folder(a, b).await.unwrap();

    for folder in app.store.list_all().await.unwrap() {
        let crumbs = app.trees.get_breadcrumbs(folder.id).await.unwrap();
        let occurrences = crumbs.iter().filter(|f| f.id == folder.id).count();
        assert_eq!(occurrences, 1);
        assert!(crumbs[0].is_root());
    }
}

#[tokio::test]
async fn test_list_children_sorted_by_name() {
    let app = TestApp::new();
    let top = app.folder("Top", FolderId::ROOT).await;
    app.folder("Wards", top).await;
    app.folder("Bolts", top).await;
    let lances = app.folder("Lances", top).await;
    app.folder("Deep", lances).await;
    app.spell("Glimmer", Convocation::Neutral, top).await;

    let names: Vec<String> = app
        .folders
        .list_children(top)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["Bolts", "Lances", "Wards"]);

    assert_eq!(app.folders.list_children(lances).await.unwrap().len(), 1);

    let err = app
        .folders
        .list_children(FolderId(404))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_sibling_check_ignores_spell_names() {
    let app = TestApp::new();
    let top = app.folder("Top", FolderId::ROOT).await;
    app.spell("Bolts", Convocation::Peleahn, top).await;
    let walls = app.folder("Walls", top).await;

    app.folder("Bolts", top).await;
    let err = app.folders.rename_folder(walls, "Bolts").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}
