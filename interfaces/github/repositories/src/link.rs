/// Extracts the `rel="next"` target from a `Link` header value.
///
/// Entries look like `<https://api.github.com/...&page=2>; rel="next"` and are
/// separated by commas. Entries that do not parse are skipped.
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|entry| {
        let mut parts = entry.split(';').map(str::trim);

        let target = parts.next()?;
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });

        is_next.then(|| url.to_string())
    })
}
