//! Strict parsing of client-supplied query parameters.

/// Collects every integer id named by `ids` in a raw query string.
///
/// Accepts `ids=1,2`, `ids=[1,2]` and repeated `ids=1&ids=2`. Any element that is
/// not an integer rejects the whole list.
pub fn parse_ids(query_string: &str) -> Result<Vec<i64>, String> {
    let mut ids = Vec::new();

    for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        if key != "ids" {
            continue;
        }
        let list = value.trim();
        let list = list
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(list);

        for element in list.split(',') {
            let element = element.trim();
            if element.is_empty() {
                continue;
            }
            let id = element
                .parse::<i64>()
                .map_err(|_| format!("Invalid employee ID: {}", element))?;
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err("Invalid or missing employee IDs array".to_string());
    }
    Ok(ids)
}

/// Positive integer or `default` for anything missing or unparseable.
pub fn positive_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
