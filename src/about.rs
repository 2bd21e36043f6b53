pub const WORKBENCH_DISPLAY_VERSION: &str = env!("WORKBENCH_DISPLAY_VERSION");
pub const WORKBENCH_BUILD_N: &str = env!("WORKBENCH_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "Workbench {}\nBuild {}\nScenario workbench for surrogate-model analysis",
        WORKBENCH_DISPLAY_VERSION, WORKBENCH_BUILD_N
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_text_names_the_build() {
        let text = version_cli_text();
        assert!(text.starts_with("Workbench "));
        assert!(text.contains(WORKBENCH_BUILD_N));
        assert!(WORKBENCH_DISPLAY_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
    }
}
