//! Request and response shapes for the HTTP API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::services::uptime::Uptime;

/// Query parameters for reading the point set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PointsQuery {
    /// `svg` selects the image presentation
    #[serde(default)]
    pub format: Option<String>,
    /// Older spelling of `format`
    #[serde(default)]
    pub img: Option<String>,
}

impl PointsQuery {
    /// Pick the known keys out of raw query parameters. Repeated keys have
    /// already collapsed to their last value, and unknown keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            format: params.get("format").cloned(),
            img: params.get("img").cloned(),
        }
    }

    pub fn wants_svg(&self) -> bool {
        self.format
            .as_deref()
            .or(self.img.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("svg"))
    }
}

/// Query parameters for the sample stream.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreamQuery {
    /// Session length in seconds; absent or `0` streams until disconnect
    #[serde(default)]
    pub t: Option<String>,
}

impl StreamQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            t: params.get("t").cloned(),
        }
    }
}

/// Uptime response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UptimeResponse {
    pub uptime: Uptime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_svg() {
        let query = |format: Option<&str>, img: Option<&str>| PointsQuery {
            format: format.map(String::from),
            img: img.map(String::from),
        };
        assert!(query(Some("svg"), None).wants_svg());
        assert!(query(None, Some("svg")).wants_svg());
        assert!(query(Some("SVG"), None).wants_svg());
        assert!(!query(Some("json"), None).wants_svg());
        assert!(!query(None, None).wants_svg());
    }

    #[test]
    fn test_from_params() {
        let params: HashMap<String, String> = [("format", "svg"), ("t", "0.5"), ("other", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(PointsQuery::from_params(&params).wants_svg());
        assert_eq!(StreamQuery::from_params(&params).t.as_deref(), Some("0.5"));
        assert!(!PointsQuery::from_params(&HashMap::new()).wants_svg());
        assert_eq!(StreamQuery::from_params(&HashMap::new()).t, None);
    }
}
