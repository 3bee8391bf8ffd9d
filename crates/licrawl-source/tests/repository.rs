use std::collections::BTreeMap;

use licrawl_source::repository::SourceLocator;

#[test]
fn test_known_domain_rewrite_takes_precedence() {
    let locator = SourceLocator::default();
    let url = locator.source_url("k8s.io/client-go");
    assert_eq!(url.url, "https://github.com/kubernetes/client-go");
    assert!(url.rewritten);
}

#[test]
fn test_plain_forge_path_gets_https_prefix() {
    let locator = SourceLocator::default();
    let url = locator.source_url("github.com/spf13/cobra");
    assert_eq!(url.url, "https://github.com/spf13/cobra");
    assert!(!url.rewritten);
}

#[test]
fn test_major_version_suffix_is_trimmed_on_forges() {
    let locator = SourceLocator::default();
    assert_eq!(
        locator.source_url("github.com/go-chi/chi/v5").url,
        "https://github.com/go-chi/chi"
    );
}

#[test]
fn test_sigs_k8s_io_is_not_confused_with_k8s_io() {
    let locator = SourceLocator::default();
    assert_eq!(
        locator.source_url("sigs.k8s.io/yaml").url,
        "https://github.com/kubernetes-sigs/yaml"
    );
}

#[test]
fn test_nested_google_cloud_module_clones_monorepo() {
    let locator = SourceLocator::default();
    assert_eq!(
        locator.source_url("cloud.google.com/go/storage").url,
        "https://github.com/googleapis/google-cloud-go"
    );
}

#[test]
fn test_unknown_vanity_domain_is_used_verbatim() {
    let locator = SourceLocator::default();
    let url = locator.source_url("go.uber.org/zap");
    assert_eq!(url.url, "https://go.uber.org/zap");
    assert!(!url.rewritten);
}

#[test]
fn test_extra_rewrites_layer_over_defaults() {
    let mut extra = BTreeMap::new();
    extra.insert("go.uber.org".to_string(), "github.com/uber-go/".to_string());
    let locator = SourceLocator::new(&extra);
    assert_eq!(
        locator.source_url("go.uber.org/zap").url,
        "https://github.com/uber-go/zap"
    );
    assert_eq!(
        locator.source_url("golang.org/x/sync").url,
        "https://github.com/golang/sync"
    );
}
