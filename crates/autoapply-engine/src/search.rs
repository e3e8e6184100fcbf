use crate::config::SearchConfig;
use url::Url;

/// Build the results-page URL for `search`.
///
/// Titles are quoted and joined with ` OR ` into the `keywords` parameter.
pub fn build_search_url(search: &SearchConfig) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&search.base_url)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("keywords", &keywords(&search.titles));
        if !search.location.trim().is_empty() {
            query.append_pair("location", search.location.trim());
        }
        if search.easy_apply_only {
            query.append_pair("f_AL", "true");
        }
        if let Some(secs) = search.posted_within_secs {
            query.append_pair("f_TPR", &format!("r{}", secs));
        }
    }
    Ok(url)
}

fn keywords(titles: &[String]) -> String {
    titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(" OR ")
}
