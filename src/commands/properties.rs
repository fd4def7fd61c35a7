//! Command: list the properties a platform asks for.
use anyhow::Result;

use crate::cli::PropertiesOpts;
use crate::config::{PropertyDescriptor, properties};
use crate::logging::Logger;

/// Descriptors for `opts`: the explicit list if given, else the schema's.
#[must_use]
pub fn descriptors(opts: &PropertiesOpts) -> Vec<PropertyDescriptor> {
    opts.properties.as_deref().map_or_else(
        || properties::from_schema(&opts.platform.schema()),
        properties::from_spec,
    )
}

/// One aligned `name : description` line per descriptor.
#[must_use]
pub fn render(descriptors: &[PropertyDescriptor]) -> String {
    descriptors
        .iter()
        .map(|p| format!("{:<12} : {}\n", p.name, p.description))
        .collect()
}

/// Run the properties command.
///
/// # Errors
///
/// Infallible today; returns `Result` like every other command.
pub fn run(opts: &PropertiesOpts, log: &Logger) -> Result<()> {
    let descriptors = descriptors(opts);
    log.stage(&format!("{} properties", opts.platform));
    for line in render(&descriptors).lines() {
        log.info(line);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    #[test]
    fn renders_android_schema_properties() {
        let opts = PropertiesOpts {
            platform: Platform::Android,
            properties: None,
        };
        insta::assert_snapshot!(render(&descriptors(&opts)).trim_end(), @r"
        AppId        : enter your application id (e.g. com.example.app):
        AppName      : enter your app name:
        SplashText   : enter your SplashText:
        WeexBundle   : enter your entry bundle (file name or http(s) url):
        ");
    }

    #[test]
    fn explicit_list_replaces_schema() {
        let opts = PropertiesOpts {
            platform: Platform::Ios,
            properties: Some("Ws|socket url".to_string()),
        };
        assert_eq!(render(&descriptors(&opts)), "Ws           : socket url\n");
    }
}
