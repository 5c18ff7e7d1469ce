//! Built-in webhook-backed lookups against the licensing API.

use crate::datamap::DataMap;
use crate::http::HttpMethod;
use crate::types::ParamType;
use anyhow::Result;

/// `check_license` and `check_version`, rooted at `api_base`.
pub fn builtin_data_maps(api_base: &str) -> Result<Vec<DataMap>> {
    let api_base = api_base.trim_end_matches('/');

    let check_license = DataMap::builder("check_license")
        .description("Check customer license status by license key")
        .parameter(
            "license_key",
            ParamType::String,
            "Customer's license key",
            true,
        )
        .webhook(
            HttpMethod::Get,
            &format!("{}/licenses/${{args.license_key}}", api_base),
        )
        .output("License status: ${status}. Expires: ${expires}.")
        .fallback_output("I couldn't find that license key. Please verify and try again.")
        .build()?;

    let check_version = DataMap::builder("check_version")
        .description("Check if a software version is current")
        .parameter(
            "current_version",
            ParamType::String,
            "Customer's current version",
            true,
        )
        .webhook(HttpMethod::Get, &format!("{}/versions/latest", api_base))
        .output("Latest version is ${latest}. You have ${args.current_version}.")
        .fallback_output("Unable to check version information.")
        .build()?;

    Ok(vec![check_license, check_version])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_license_url_template() {
        let maps = builtin_data_maps("https://api.example.com/").unwrap();
        assert_eq!(maps[0].name, "check_license");
        assert_eq!(
            maps[0].webhook.url,
            "https://api.example.com/licenses/${args.license_key}"
        );
        let req = maps[0].build_request(&json!({"license_key": "ABC-123"}));
        assert_eq!(req.url, "https://api.example.com/licenses/ABC-123");
        assert_eq!(req.method, HttpMethod::Get);
    }

    #[test]
    fn test_version_map() {
        let maps = builtin_data_maps("https://api.example.com").unwrap();
        assert_eq!(maps[1].name, "check_version");
        assert_eq!(maps[1].webhook.url, "https://api.example.com/versions/latest");
        assert!(maps[1].parameters[0].required);
    }
}
