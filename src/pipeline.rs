use crate::config::Config;

type Step = Box<dyn Fn(String) -> String + Send + Sync>;

/// Ordered text transformations applied to input before conversion
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pre-processing steps enabled in `config`
    pub fn from_config(config: &Config) -> Self {
        let mut pipeline = Self::new();
        if config.input.strip_frontmatter {
            pipeline = pipeline.with_step(|text| strip_frontmatter(&text).to_string());
        }
        pipeline
    }

    pub fn with_step<F>(mut self, step: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, input: String) -> String {
        self.steps.iter().fold(input, |text, step| step(text))
    }
}

/// Drop a leading `---` ... `---` YAML block.
///
/// The opening marker must sit alone on the first line. Input without a
/// closed block comes back unchanged.
pub fn strip_frontmatter(markdown: &str) -> &str {
    let Some(rest) = markdown.strip_prefix("---") else {
        return markdown;
    };
    let Some(opener_end) = rest.find('\n') else {
        return markdown;
    };
    if !rest[..opener_end].trim().is_empty() {
        return markdown;
    }

    let mut offset = 3 + opener_end + 1;
    for line in markdown[offset..].split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "---" {
            return markdown[offset..].trim_start_matches(['\r', '\n']);
        }
    }
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn empty_pipeline_is_identity() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run("# Title".to_string()), "# Title");
    }

    #[test]
    fn steps_run_in_order() {
        let pipeline = Pipeline::new()
            .with_step(|text| format!("{text}a"))
            .with_step(|text| format!("{text}b"));

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.run(">".to_string()), ">ab");
    }

    #[test]
    fn strips_frontmatter() {
        assert_eq!(
            strip_frontmatter("---\ntitle: x\n---\n\n# Body"),
            "# Body"
        );
    }

    #[rstest]
    #[case("# Body\n---\n")]
    #[case("---\nunclosed")]
    #[case("----\nrule above\n---\n")]
    #[case("--- inline\n---\nText")]
    #[case("---")]
    fn leaves_text_without_frontmatter(#[case] input: &str) {
        assert_eq!(strip_frontmatter(input), input);
    }

    #[test]
    fn strips_crlf_frontmatter() {
        assert_eq!(
            strip_frontmatter("---\r\ntitle: x\r\n---\r\n\r\nBody"),
            "Body"
        );
    }

    #[test]
    fn strips_empty_frontmatter() {
        assert_eq!(strip_frontmatter("---\n---\nText"), "Text");
        assert_eq!(strip_frontmatter("---\nonly: meta\n---"), "");
    }

    #[test]
    fn from_config_enables_frontmatter_step() {
        let mut config = Config::default();
        assert!(Pipeline::from_config(&config).is_empty());

        config.input.strip_frontmatter = true;
        let pipeline = Pipeline::from_config(&config);
        assert_eq!(pipeline.run("---\na: 1\n---\nText".to_string()), "Text");
    }
}
