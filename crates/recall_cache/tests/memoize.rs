//! End-to-end memoization behavior against a real cache directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use recall_cache::{
    callable, CacheError, CacheStatus, CacheStore, FingerprintComputer, Invocation,
    MemoizingInvoker,
};

fn arg(x: i64) -> Invocation {
    Invocation::new().with_arg(&x).unwrap()
}

fn invoker_at(root: &std::path::Path) -> MemoizingInvoker {
    MemoizingInvoker::new(CacheStore::new(root))
}

#[test]
fn doubling_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(dir.path());
    let calls = AtomicUsize::new(0);
    let double = callable!("double", |inv| -> Result<i64, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(inv.positional::<i64>(0)? * 2)
    });

    assert_eq!(invoker.invoke(&double, &arg(3)).unwrap().value, 6);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(invoker.invoke(&double, &arg(3)).unwrap().value, 6);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(invoker.invoke(&double, &arg(4)).unwrap().value, 8);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(invoker.store().entries().unwrap().len(), 2);

    invoker.clear_cache(false).unwrap();

    assert_eq!(invoker.invoke(&double, &arg(3)).unwrap().value, 6);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn results_survive_a_new_invoker() {
    let dir = tempfile::tempdir().unwrap();
    let calls = AtomicUsize::new(0);
    let concat = callable!("concat", |inv| -> Result<String, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        let a: String = inv.positional(0)?;
        let sep: String = inv.named("sep")?;
        let b: String = inv.positional(1)?;
        Ok(format!("{a}{sep}{b}"))
    });
    let inv = Invocation::new()
        .with_arg("left")
        .unwrap()
        .with_arg("right")
        .unwrap()
        .with_named("sep", "-")
        .unwrap();

    let first = invoker_at(dir.path()).invoke(&concat, &inv).unwrap();
    let second = invoker_at(dir.path()).invoke(&concat, &inv).unwrap();

    assert_eq!(first.value, "left-right");
    assert_eq!(second.value, "left-right");
    assert!(second.is_hit());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn changed_body_misses() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(dir.path());
    let v1 = callable!("scale", |inv| -> Result<i64, CacheError> {
        Ok(inv.positional::<i64>(0)? * 10)
    });
    let v2 = callable!("scale", |inv| -> Result<i64, CacheError> {
        Ok(inv.positional::<i64>(0)? * 100)
    });

    assert_eq!(invoker.invoke(&v1, &arg(2)).unwrap().value, 20);
    let after_edit = invoker.invoke(&v2, &arg(2)).unwrap();
    assert_eq!(after_edit.value, 200);
    assert!(!after_edit.is_hit());
}

#[test]
fn version_tag_invalidates() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(dir.path());
    let calls = AtomicUsize::new(0);
    let tagged_a = callable!("load", |inv| -> Result<u32, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        let _ = inv;
        Ok(7)
    })
    .version("a");
    let tagged_b = callable!("load", |inv| -> Result<u32, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        let _ = inv;
        Ok(7)
    })
    .version("b");

    invoker.invoke(&tagged_a, &Invocation::new()).unwrap();
    invoker.invoke(&tagged_a, &Invocation::new()).unwrap();
    invoker.invoke(&tagged_b, &Invocation::new()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn clear_on_empty_root_is_safe() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(&dir.path().join("never-created"));
    assert!(!invoker.clear_cache(true).unwrap());
    assert!(!invoker.clear_cache(false).unwrap());
}

#[test]
fn entry_is_named_after_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(dir.path());
    let id = callable!("id", |inv| -> Result<i64, CacheError> { inv.positional(0) });

    invoker.invoke(&id, &arg(42)).unwrap();
    let fp = FingerprintComputer::compute(&id, &arg(42)).unwrap();
    let expected = dir.path().join("cache").join(format!("f{fp}.bin"));
    assert!(expected.is_file());
}

#[test]
fn concurrent_callers_agree() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(dir.path());
    let calls = AtomicUsize::new(0);
    let slow = callable!("slow", |inv| -> Result<i64, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(5));
        Ok(inv.positional::<i64>(0)? + 1)
    });

    let results: Vec<i64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| invoker.invoke(&slow, &arg(1)).unwrap().value))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|&v| v == 2));
    let n = calls.load(Ordering::SeqCst);
    assert!((1..=4).contains(&n), "unexpected call count {n}");
    assert_eq!(invoker.invoke(&slow, &arg(1)).unwrap().value, 2);
    assert_eq!(calls.load(Ordering::SeqCst), n);
}

#[cfg(unix)]
#[test]
fn write_failure_still_returns_value() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("root");
    std::fs::create_dir_all(&root).unwrap();
    // Dangling symlink: lookups see "not found", but the directory can't be created.
    std::os::unix::fs::symlink(dir.path().join("missing/target"), root.join("cache")).unwrap();

    let invoker = invoker_at(&root);
    let calls = AtomicUsize::new(0);
    let double = callable!("double", |inv| -> Result<i64, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(inv.positional::<i64>(0)? * 2)
    });

    let outcome = invoker.invoke(&double, &arg(5)).unwrap();
    assert_eq!(outcome.value, 10);
    assert!(matches!(outcome.status, CacheStatus::Unstored(CacheError::Io { .. })));

    let again = invoker.invoke(&double, &arg(5)).unwrap();
    assert!(again.into_stored().is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn same_body_with_other_output_type_misses() {
    let dir = tempfile::tempdir().unwrap();
    let invoker = invoker_at(dir.path());
    let signed = callable!("signed", |inv| -> Result<i64, CacheError> {
        let _ = inv;
        Ok(-1i64 as _)
    });
    let unsigned = callable!("unsigned", |inv| -> Result<u64, CacheError> {
        let _ = inv;
        Ok(-1i64 as _)
    });

    assert_eq!(invoker.invoke(&signed, &Invocation::new()).unwrap().value, -1);
    let outcome = invoker.invoke(&unsigned, &Invocation::new()).unwrap();
    assert!(!outcome.is_hit());
    assert_eq!(outcome.value, u64::MAX);
    assert_eq!(invoker.store().entries().unwrap().len(), 2);
}

#[test]
fn equal_hash_map_arguments_hit() {
    let dir = tempfile::tempdir().unwrap();
    let calls = AtomicUsize::new(0);
    let total = callable!("total", |inv| -> Result<i64, CacheError> {
        calls.fetch_add(1, Ordering::SeqCst);
        let weights: HashMap<String, i64> = inv.positional(0)?;
        Ok(weights.values().sum())
    });
    let build = |keys: Vec<i64>| -> Invocation {
        let weights: HashMap<String, i64> = keys.into_iter().map(|i| (format!("w{i}"), i)).collect();
        Invocation::new().with_arg(&weights).unwrap()
    };

    let first = invoker_at(dir.path())
        .invoke(&total, &build((0..16).collect()))
        .unwrap();
    let second = invoker_at(dir.path())
        .invoke(&total, &build((0..16).rev().collect()))
        .unwrap();

    assert_eq!(first.value, 120);
    assert_eq!(second.value, 120);
    assert!(second.is_hit());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
