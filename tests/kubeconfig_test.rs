//! Tests for kubeconfig export against a scripted node

mod helpers;

use helpers::*;
use installer::kubeconfig::{write_kubeconfig, KubeconfigError};

#[tokio::test]
async fn test_rewrites_server_and_terminates_lines() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("kubeconfig");
    let runner = ScriptedRunner::new().on(
        "cat",
        Reply::lines(&["[init] ...", "  server: https://172.17.0.2:6443", "  other: value"]),
    );

    write_kubeconfig(&runner, &dest, "127.0.0.1", 16443).await.unwrap();

    assert_eq!(
        read_to_string(&dest),
        "[init] ...\n  server: https://127.0.0.1:16443\n  other: value\n"
    );
    assert_private_file(&dest);
}

#[tokio::test]
async fn test_only_matching_line_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("kubeconfig");
    let runner = ScriptedRunner::new().on(
        "cat",
        Reply::lines(&[
            "clusters:",
            "- cluster:",
            "  server: https://1.2.3.4:6443",
            "  name: kubernetes",
            "users:",
            "- name: kubernetes-admin",
        ]),
    );

    write_kubeconfig(&runner, &dest, "10.0.0.5", 16443).await.unwrap();

    assert_eq!(
        read_to_string(&dest),
        "clusters:\n\
         - cluster:\n  \
         server: https://10.0.0.5:16443\n  \
         name: kubernetes\n\
         users:\n\
         - name: kubernetes-admin\n"
    );
}

#[tokio::test]
async fn test_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("home").join("user").join(".kube").join("config");
    let runner = ScriptedRunner::new().on("cat", Reply::lines(ADMIN_KUBECONFIG));

    write_kubeconfig(&runner, &dest, "10.0.0.9", 6443).await.unwrap();
    assert!(dest.is_file());

    // the directory now exists from the first run
    write_kubeconfig(&runner, &dest, "10.0.0.9", 6443).await.unwrap();
    assert!(dest.is_file());
}

#[tokio::test]
async fn test_overwrites_existing_file_with_private_mode() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("config");
    let stale = "stale contents that are much longer than the new kubeconfig\n".repeat(50);
    std::fs::write(&dest, stale).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o644)).unwrap();
    }

    let runner =
        ScriptedRunner::new().on("cat", Reply::lines(&["  server: https://172.17.0.2:6443"]));
    write_kubeconfig(&runner, &dest, "127.0.0.1", 6443).await.unwrap();

    assert_eq!(read_to_string(&dest), "  server: https://127.0.0.1:6443\n");
    assert_private_file(&dest);
    assert!(!dir.path().join("config.tmp").exists());
}

#[tokio::test]
async fn test_failed_write_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("config");
    std::fs::write(&dest, "  server: https://192.168.1.10:6443\n").unwrap();
    // the temp file cannot be created where a directory already sits
    std::fs::create_dir_all(dir.path().join("config.tmp").join("occupied")).unwrap();

    let runner = ScriptedRunner::new().on("cat", Reply::lines(ADMIN_KUBECONFIG));
    let err = write_kubeconfig(&runner, &dest, "10.0.0.5", 6443).await.unwrap_err();

    match err {
        KubeconfigError::Write { path, .. } => assert_eq!(path, dest),
        other => panic!("expected write error, got {:?}", other),
    }
    assert_eq!(read_to_string(&dest), "  server: https://192.168.1.10:6443\n");
}

#[tokio::test]
async fn test_exporting_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    let runner = ScriptedRunner::new().on("cat", Reply::lines(ADMIN_KUBECONFIG));
    write_kubeconfig(&runner, &first, "10.0.0.5", 16443).await.unwrap();
    let once = read_to_string(&first);

    // feed the already rewritten file back through the rewrite
    let rewritten: Vec<&str> = once.lines().collect();
    let runner = ScriptedRunner::new().on("cat", Reply::lines(&rewritten));
    write_kubeconfig(&runner, &second, "10.0.0.5", 16443).await.unwrap();

    assert_eq!(once, read_to_string(&second));
}

#[tokio::test]
async fn test_read_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("config");
    let runner = ScriptedRunner::new().on("cat", Reply::fail(1, &["cat: permission denied"]));

    let err = write_kubeconfig(&runner, &dest, "10.0.0.5", 6443).await.unwrap_err();

    assert!(matches!(err, KubeconfigError::Read(_)));
    assert!(!dest.exists());
    assert!(!dest.parent().unwrap().exists());
}

#[tokio::test]
async fn test_ipv6_address_is_bracketed() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("config");
    let runner =
        ScriptedRunner::new().on("cat", Reply::lines(&["    server: https://172.17.0.2:6443"]));

    write_kubeconfig(&runner, &dest, "fd00::5", 6443).await.unwrap();

    assert_eq!(read_to_string(&dest), "    server: https://[fd00::5]:6443\n");
}
