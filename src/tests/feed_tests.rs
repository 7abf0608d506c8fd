use super::*;
use crate::version::Version;

#[test]
fn feed_url_for_mercurial_uses_atom_tags() {
    let holder = FeedHolder::new("nginx/nginx", "hg.nginx.org", FeedFlavor::Mercurial);
    assert_eq!(
        holder.feed_url,
        Some("https://hg.nginx.org/nginx/nginx/atom-tags".to_string())
    );
}

#[test]
fn feed_url_for_gitea_uses_tags_dot_atom() {
    let holder = FeedHolder::new("owner/name", "codeberg.org", FeedFlavor::Gitea);
    assert_eq!(
        holder.feed_url,
        Some("https://codeberg.org/owner/name/tags.atom".to_string())
    );
}

#[test]
fn feed_url_for_sourceforge_uses_the_projects_rss_endpoint() {
    let holder = FeedHolder::new("myproject", "sourceforge.net", FeedFlavor::SourceForge);
    assert_eq!(
        holder.feed_url,
        Some("https://sourceforge.net/projects/myproject/rss?path=/".to_string())
    );
}

#[test]
fn feed_url_for_wikipedia_is_none_since_it_scrapes_instead() {
    let holder = FeedHolder::new("Some_Project", "en.wikipedia.org", FeedFlavor::Wikipedia);
    assert!(holder.feed_url.is_none());
}

#[test]
fn is_instance_true_for_wikipedia_regardless_of_feed_url() {
    let holder = FeedHolder::new("Some_Project", "en.wikipedia.org", FeedFlavor::Wikipedia);
    assert!(holder.is_instance());
}

#[test]
fn is_instance_reflects_whether_a_feed_url_was_found() {
    let holder = FeedHolder::new("owner/name", "codeberg.org", FeedFlavor::Gitea);
    assert!(holder.is_instance());
}

#[test]
fn rewrite_sourceforge_download_extracts_the_direct_download_path() {
    let holder = FeedHolder::new("myproject", "sourceforge.net", FeedFlavor::SourceForge);
    let link = "https://sourceforge.net/projects/myproject/files/myproject-1.2.3.tar.gz/download";
    let rewritten = holder
        .rewrite_sourceforge_download(link)
        .expect("must rewrite");
    assert_eq!(
        rewritten,
        "https://downloads.sourceforge.net/myproject/myproject-1.2.3.tar.gz"
    );
}

#[test]
fn resolve_href_leaves_absolute_urls_untouched() {
    assert_eq!(
        resolve_href("example.com", "https://cdn.example.com/feed.xml"),
        "https://cdn.example.com/feed.xml"
    );
}

#[test]
fn resolve_href_anchors_relative_paths_to_the_hostname() {
    assert_eq!(
        resolve_href("example.com", "/feed.xml"),
        "https://example.com/feed.xml"
    );
}

#[test]
fn release_download_url_is_only_built_for_mercurial() {
    let mercurial = FeedHolder::new("nginx/nginx", "hg.nginx.org", FeedFlavor::Mercurial);
    let version = Version::parse("1.2.3", false).unwrap();
    let release = Release::new("1.2.3", version.clone(), Utc::now());
    assert!(mercurial.release_download_url(&release, false).is_some());

    let sourceforge = FeedHolder::new("myproject", "sourceforge.net", FeedFlavor::SourceForge);
    assert!(sourceforge.release_download_url(&release, false).is_none());
}

#[test]
fn name_returns_only_the_last_path_segment() {
    let holder = FeedHolder::new("nginx/nginx", "hg.nginx.org", FeedFlavor::Mercurial);
    assert_eq!(holder.name(), "nginx");
}
