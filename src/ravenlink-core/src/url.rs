use crate::config::ClientConfig;
use crate::models::DatabaseSelector;

pub const BULK_DOCS_ENDPOINT: &str = "bulk_docs";
pub const DOCS_ENDPOINT: &str = "docs";

/// Build `<server>/databases/<db>/<endpoint>[?id=..&id=..]`
///
/// Document ids are percent-encoded, so `docs/1` is sent as `docs%2F1`.
pub fn build_url(
    config: &ClientConfig,
    endpoint: &str,
    document_ids: &[impl AsRef<str>],
    database: DatabaseSelector,
) -> String {
    let mut url = format!(
        "{}/databases/{}/{}",
        config.base_url(),
        config.database_name(database),
        endpoint.trim_start_matches('/')
    );

    for (i, id) in document_ids.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str("id=");
        url.push_str(&urlencoding::encode(id.as_ref()));
    }

    url
}
