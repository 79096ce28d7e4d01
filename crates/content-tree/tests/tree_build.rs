//! 실제 패키지 형태의 입력으로 트리 구성 검증

use caretaker_tree::{
    AccessibilityRecord, ContentTree, FileKind, LibraryFacts, Manifest, MediaFacts, PackageFacts,
    build_tree,
};
use serde_json::{Value, json};

fn interactive_book() -> PackageFacts {
    let manifest = Manifest::from_value(&json!({
        "title": "Biology",
        "mainLibrary": "H5P.InteractiveBook",
        "license": "CC BY",
        "licenseVersion": "4.0",
        "authors": [{ "name": "Ada", "role": "Author" }],
        "preloadedDependencies": [
            { "machineName": "H5P.InteractiveBook", "majorVersion": 1, "minorVersion": 10 },
            { "machineName": "H5P.Column", "majorVersion": 1, "minorVersion": 16 },
            { "machineName": "H5P.Image", "majorVersion": 1, "minorVersion": 1 }
        ]
    }));
    let params = json!({
        "chapters": [
            {
                "library": "H5P.Column 1.16",
                "subContentId": "chapter-1",
                "metadata": { "title": "Cells" },
                "params": {
                    "content": [
                        {
                            "content": {
                                "library": "H5P.Image 1.1",
                                "subContentId": "image-1",
                                "metadata": { "title": "Cell", "license": "U" },
                                "params": {
                                    "file": {
                                        "path": "images/cell-1.png",
                                        "mime": "image/png",
                                        "width": 800,
                                        "height": 600
                                    }
                                }
                            }
                        }
                    ]
                }
            }
        ]
    });
    PackageFacts::new(manifest, params)
        .with_media(
            "images/cell-1.png",
            MediaFacts {
                size: Some(600_000),
                ..MediaFacts::default()
            },
        )
        .with_library(
            "H5P.Image",
            LibraryFacts {
                runnable: false,
                preloaded_js: vec!["scripts/image.js".to_owned()],
                ..LibraryFacts::default()
            },
        )
        .with_accessibility(
            "H5P.Column",
            AccessibilityRecord {
                kind: "wcag".to_owned(),
                description: "Column layout".to_owned(),
                status: "passed".to_owned(),
                url: "https://example.org/column".to_owned(),
            },
        )
}

#[test]
fn builds_three_level_tree() {
    let facts = interactive_book();
    let tree = build_tree(&facts).unwrap();

    assert_eq!(tree.root().versioned_library_id, "H5P.InteractiveBook 1.10");
    let chapter = tree.children(ContentTree::ROOT)[0];
    assert_eq!(tree[chapter].id, "chapter-1");
    assert_eq!(tree[chapter].semantics_path, "chapters[0].params");

    let image = tree.children(chapter)[0];
    assert_eq!(tree[image].id, "image-1");
    assert_eq!(
        tree[image].semantics_path,
        "chapters[0].params.content[0].content.params"
    );
    assert_eq!(tree.ancestors(image), vec![chapter, ContentTree::ROOT]);
}

#[test]
fn image_file_enriched_from_params_and_media_facts() {
    let facts = interactive_book();
    let tree = build_tree(&facts).unwrap();
    let image = &tree[tree.find_by_id("image-1").unwrap()];

    assert_eq!(image.files.len(), 1);
    let file = &image.files[0];
    assert_eq!(file.kind, FileKind::Image);
    assert_eq!(file.size, Some(600_000));
    assert_eq!((file.width, file.height), (Some(800), Some(600)));
    assert!(file.alt.is_none());
    assert!(!file.decorative);
    assert_eq!(
        file.semantics_path,
        "chapters[0].params.content[0].content.params.file"
    );
}

#[test]
fn accessibility_record_attached_by_machine_name() {
    let facts = interactive_book();
    let tree = build_tree(&facts).unwrap();
    let chapter = &tree[tree.find_by_id("chapter-1").unwrap()];
    assert_eq!(
        chapter.accessibility.as_ref().map(|r| r.status.as_str()),
        Some("passed")
    );
    assert!(chapter.library.is_none());
}

#[test]
fn view_serializes_nested_labels() {
    let facts = interactive_book();
    let tree = build_tree(&facts).unwrap();
    let view: Value = serde_json::to_value(tree.view()).unwrap();

    assert_eq!(view["label"], "Biology (H5P.InteractiveBook)");
    assert_eq!(view["children"][0]["label"], "Cells (H5P.Column)");
    assert_eq!(
        view["children"][0]["children"][0]["versionedLibraryId"],
        "H5P.Image 1.1"
    );
}

#[test]
fn building_twice_is_structurally_identical() {
    let facts = interactive_book();
    let first = build_tree(&facts).unwrap();
    let second = build_tree(&facts).unwrap();
    assert_eq!(first.view(), second.view());
}
