use reqwest::Url;

const EMBED_URL: &str = "https://www.google.com/maps/embed/v1/view";
const PLAIN_URL: &str = "https://www.google.com/maps";
const ZOOM: &str = "10";

/// Map view centred on a point. Uses the Maps Embed API when a key is
/// configured, otherwise a plain keyless Google Maps link.
pub fn map_embed_url(api_key: Option<&str>, lat: f64, lon: f64) -> String {
    let center = format!("{lat},{lon}");

    let url = match api_key {
        Some(key) => Url::parse_with_params(
            EMBED_URL,
            &[("key", key), ("center", center.as_str()), ("zoom", ZOOM)],
        ),
        None => Url::parse_with_params(PLAIN_URL, &[("q", center.as_str())]),
    };

    match url {
        Ok(url) => url.to_string(),
        // Both bases are constant and valid; keep a usable link regardless.
        Err(_) => format!("{PLAIN_URL}?q={center}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_url_with_key() {
        let url = map_embed_url(Some("MAPS"), 38.72, -9.14);
        assert_eq!(
            url,
            "https://www.google.com/maps/embed/v1/view?key=MAPS&center=38.72%2C-9.14&zoom=10"
        );
    }

    #[test]
    fn plain_link_without_key() {
        let url = map_embed_url(None, 37.77, -122.41);
        assert_eq!(url, "https://www.google.com/maps?q=37.77%2C-122.41");
    }
}
