#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::json;

use caretaker_core::catalog::EnglishCatalog;
use caretaker_core::config::CaretakerConfig;
use caretaker_core::types::Category;
use caretaker_rules::Engine;
use caretaker_tree::{Manifest, PackageFacts};

fuzz_target!(|data: &[u8]| {
    let Ok(params) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let manifest = Manifest::from_value(&json!({
        "mainLibrary": "H5P.InteractiveBook",
        "license": "CC BY-SA",
        "preloadedDependencies": [
            { "machineName": "H5P.InteractiveBook", "majorVersion": 1, "minorVersion": 10 }
        ]
    }));
    let facts = PackageFacts::new(manifest, params);
    let Ok(engine) = Engine::new(CaretakerConfig::default()) else {
        return;
    };
    let Ok(analysis) = engine.run(&facts, &EnglishCatalog::new()) else {
        return;
    };

    // 어떤 입력에서도 모듈 실패 메시지가 나오면 안 됨
    assert_eq!(analysis.report.of_kind("moduleFailure").count(), 0);
    assert_eq!(analysis.report.messages_in(Category::Statistics).len(), 1);
});
