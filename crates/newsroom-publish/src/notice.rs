use url::Url;

use newsroom_types::models::NewsItem;

use crate::PublishError;

/// Public page of a news item: `<base>/news/<title>.<id>`.
pub fn permalink(base: &str, item: &NewsItem) -> Result<Url, PublishError> {
    let mut url = Url::parse(base).map_err(|e| PublishError::Permalink(format!("'{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| PublishError::Permalink(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .push("news")
        .push(&format!("{}.{}", item.title, item.id));
    Ok(url)
}

/// Notice text posted for a new item: `[TYPE] Title` followed by the permalink.
pub fn compose(base: &str, item: &NewsItem) -> Result<String, PublishError> {
    let link = permalink(base, item)?;
    Ok(format!("[{}] {}\n{}", item.kind.to_uppercase(), item.title, link))
}
