/// Parses the number ending a GitHub API URL, e.g. `150` for `.../repos/foo/bar/issues/150`.
pub(crate) fn trailing_number(url: &str) -> Option<u64> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}
